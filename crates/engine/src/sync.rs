//! Reconciliation outcome types.

/// How the per-line migration of a guest cart went.
///
/// A report with failures still counts as a completed reconciliation: the
/// guest entry is erased either way, so the user is never asked to retry a
/// merge that can no longer be replayed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SyncReport {
    /// Guest lines found in local persistence.
    pub attempted: usize,

    /// Lines the remote service accepted.
    pub migrated: usize,

    /// Lines whose remote add failed (logged, not retried).
    pub failed: usize,
}

impl SyncReport {
    /// Returns true if at least one line failed to migrate.
    pub fn is_partial(&self) -> bool {
        self.failed > 0
    }
}

/// Result of a reconciliation trigger.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncOutcome {
    /// The merge ran to completion (possibly with per-line failures).
    Completed(SyncReport),

    /// Another reconciliation was already in flight; this trigger was a
    /// no-op.
    AlreadyInFlight,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_when_any_line_failed() {
        let clean = SyncReport {
            attempted: 3,
            migrated: 3,
            failed: 0,
        };
        assert!(!clean.is_partial());

        let partial = SyncReport {
            attempted: 3,
            migrated: 2,
            failed: 1,
        };
        assert!(partial.is_partial());
    }
}
