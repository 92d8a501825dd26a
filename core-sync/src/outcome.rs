//! Fetch outcomes and the end-of-pass summary.

/// Why an item was not submitted for download.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// The ledger already holds this item at the remote version
    UpToDate,
    /// Already submitted earlier in the same pass
    DuplicateInPass,
}

impl std::fmt::Display for SkipReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::UpToDate => write!(f, "up to date"),
            Self::DuplicateInPass => write!(f, "duplicate submission in this pass"),
        }
    }
}

/// Terminal classification of one item's sync attempt. Transient; consumed
/// by the orchestrator for aggregation, never persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchOutcome {
    Skipped(SkipReason),
    Fetched { bytes_written: u64 },
    Failed { cause: String, attempts: u32 },
}

/// A listing branch that could not be (fully) enumerated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BranchFailure {
    /// Branch scope: the collection list, one collection, or the pool
    pub scope: String,
    pub error: String,
}

/// Aggregated result of one synchronization pass.
///
/// A pass with failed items is a partial success, not a fatal run; a pass
/// where nothing could be enumerated is reported separately through
/// [`PassSummary::could_not_enumerate`].
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct PassSummary {
    pub fetched: u64,
    pub skipped: u64,
    pub failed: u64,
    pub failed_branches: Vec<BranchFailure>,
}

impl PassSummary {
    /// Record one item outcome.
    pub fn record(&mut self, outcome: &FetchOutcome) {
        match outcome {
            FetchOutcome::Skipped(_) => self.skipped += 1,
            FetchOutcome::Fetched { .. } => self.fetched += 1,
            FetchOutcome::Failed { .. } => self.failed += 1,
        }
    }

    /// Ran with no item failures and every branch fully enumerated.
    pub fn is_clean(&self) -> bool {
        self.failed == 0 && self.failed_branches.is_empty()
    }

    /// Both top-level listings (the collection list and the ungrouped
    /// pool) failed: the pass could not even enumerate.
    pub fn could_not_enumerate(&self) -> bool {
        let branch_failed =
            |scope: &str| self.failed_branches.iter().any(|b| b.scope == scope);
        branch_failed(crate::orchestrator::ALBUMS_GROUPING)
            && branch_failed(crate::orchestrator::POOL_GROUPING)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::orchestrator::{ALBUMS_GROUPING, POOL_GROUPING};

    #[test]
    fn test_record_counts_each_variant() {
        let mut summary = PassSummary::default();
        summary.record(&FetchOutcome::Skipped(SkipReason::UpToDate));
        summary.record(&FetchOutcome::Fetched { bytes_written: 10 });
        summary.record(&FetchOutcome::Failed {
            cause: "stream reset".into(),
            attempts: 3,
        });

        assert_eq!(summary.skipped, 1);
        assert_eq!(summary.fetched, 1);
        assert_eq!(summary.failed, 1);
        assert!(!summary.is_clean());
    }

    #[test]
    fn test_could_not_enumerate_requires_both_top_level_branches() {
        let mut summary = PassSummary::default();
        summary.failed_branches.push(BranchFailure {
            scope: ALBUMS_GROUPING.to_string(),
            error: "listing failed".into(),
        });
        assert!(!summary.could_not_enumerate());

        summary.failed_branches.push(BranchFailure {
            scope: POOL_GROUPING.to_string(),
            error: "listing failed".into(),
        });
        assert!(summary.could_not_enumerate());
    }
}
