//! # Pagination Enumerator
//!
//! Generic cursor-driven listing as a lazy stream.
//!
//! Given a listing operation that accepts an optional cursor and returns a
//! page plus the next cursor, [`pages`] produces a finite stream of pages:
//! one listing call per page, pulled on demand, terminating the first time
//! the returned cursor is absent. Empty intermediate pages with a cursor
//! continue enumeration. A failed page request is yielded once and ends
//! the stream; the caller decides whether the partial result set is
//! acceptable. Streams restart from scratch only; there is no mid-stream
//! resume.

use std::future::Future;

use futures::stream::{self, Stream, TryStreamExt};

enum Cursor {
    Start,
    Next(String),
    Done,
}

/// Stream of pages from a cursor-paginated listing operation.
pub fn pages<T, E, F, Fut>(mut fetch: F) -> impl Stream<Item = Result<Vec<T>, E>>
where
    F: FnMut(Option<String>) -> Fut,
    Fut: Future<Output = Result<(Vec<T>, Option<String>), E>>,
{
    stream::try_unfold(Cursor::Start, move |state| {
        let call = match state {
            Cursor::Done => None,
            Cursor::Start => Some(fetch(None)),
            Cursor::Next(cursor) => Some(fetch(Some(cursor))),
        };
        async move {
            match call {
                None => Ok(None),
                Some(fut) => {
                    let (page, next) = fut.await?;
                    let state = match next {
                        Some(cursor) => Cursor::Next(cursor),
                        None => Cursor::Done,
                    };
                    Ok(Some((page, state)))
                }
            }
        }
    })
}

/// Stream of individual items, flattening the pages of [`pages`].
pub fn items<T, E, F, Fut>(fetch: F) -> impl Stream<Item = Result<T, E>>
where
    F: FnMut(Option<String>) -> Fut,
    Fut: Future<Output = Result<(Vec<T>, Option<String>), E>>,
{
    pages(fetch)
        .map_ok(|page| stream::iter(page.into_iter().map(Ok)))
        .try_flatten()
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::StreamExt;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    /// Scripted pager: each call pops the next scripted response.
    fn scripted(
        responses: Vec<Result<(Vec<&'static str>, Option<String>), String>>,
    ) -> impl FnMut(
        Option<String>,
    ) -> futures::future::Ready<Result<(Vec<&'static str>, Option<String>), String>> {
        let mut responses = responses.into_iter();
        move |_cursor| {
            futures::future::ready(responses.next().expect("fetched past the last page"))
        }
    }

    #[tokio::test]
    async fn test_empty_intermediate_page_does_not_terminate() {
        let stream = items(scripted(vec![
            Ok((vec!["a", "b"], Some("cursor1".into()))),
            Ok((vec![], Some("cursor2".into()))),
            Ok((vec!["c"], None)),
        ]));
        let collected: Vec<_> = stream.map(|r| r.unwrap()).collect().await;
        assert_eq!(collected, vec!["a", "b", "c"]);
    }

    #[tokio::test]
    async fn test_empty_final_page_terminates() {
        let stream = items(scripted(vec![
            Ok((vec!["a"], Some("cursor1".into()))),
            Ok((vec![], None)),
        ]));
        let collected: Vec<_> = stream.map(|r| r.unwrap()).collect().await;
        assert_eq!(collected, vec!["a"]);
    }

    #[tokio::test]
    async fn test_error_is_yielded_once_and_terminates() {
        let mut stream = Box::pin(items(scripted(vec![
            Ok((vec!["a"], Some("cursor1".into()))),
            Err("listing failed".to_string()),
        ])));

        assert_eq!(stream.next().await, Some(Ok("a")));
        assert_eq!(stream.next().await, Some(Err("listing failed".to_string())));
        assert_eq!(stream.next().await, None);
    }

    #[tokio::test]
    async fn test_pages_are_pulled_on_demand() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counted = {
            let calls = Arc::clone(&calls);
            move |cursor: Option<String>| {
                calls.fetch_add(1, Ordering::SeqCst);
                let page: Result<(Vec<u32>, Option<String>), String> = match cursor.as_deref() {
                    None => Ok((vec![1], Some("next".into()))),
                    Some(_) => Ok((vec![2], None)),
                };
                futures::future::ready(page)
            }
        };

        let mut stream = Box::pin(pages(counted));

        assert_eq!(calls.load(Ordering::SeqCst), 0);
        assert_eq!(stream.next().await, Some(Ok(vec![1])));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(stream.next().await, Some(Ok(vec![2])));
        assert_eq!(calls.load(Ordering::SeqCst), 2);
        assert_eq!(stream.next().await, None);
    }

    #[tokio::test]
    async fn test_cursor_is_threaded_between_calls() {
        let fetch = |cursor: Option<String>| {
            let response: Result<(Vec<String>, Option<String>), String> = match cursor.as_deref() {
                None => Ok((vec!["first".to_string()], Some("token-1".into()))),
                Some("token-1") => Ok((vec!["second".to_string()], None)),
                Some(other) => Err(format!("unexpected cursor {other}")),
            };
            futures::future::ready(response)
        };

        let collected: Vec<_> = items(fetch).map(|r| r.unwrap()).collect().await;
        assert_eq!(collected, vec!["first", "second"]);
    }
}
