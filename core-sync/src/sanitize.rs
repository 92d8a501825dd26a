//! Path-safe grouping names.

/// Turn a collection title into a safe directory name.
///
/// Path separators, characters that are reserved on common filesystems,
/// and control characters become underscores; leading/trailing dots and
/// whitespace are trimmed so names like `..` cannot escape the
/// destination root. An empty result falls back to `"untitled"`.
pub fn sanitize_grouping(title: &str) -> String {
    let mapped: String = title
        .chars()
        .map(|c| match c {
            '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|' => '_',
            c if c.is_control() => '_',
            c => c,
        })
        .collect();

    let trimmed = mapped.trim().trim_matches('.').trim();
    if trimmed.is_empty() {
        "untitled".to_string()
    } else {
        trimmed.to_string()
    }
}
