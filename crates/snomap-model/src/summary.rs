use serde::{Deserialize, Serialize};

use crate::MappingOutcome;

/// Counters accumulated over one batch run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchSummary {
    /// Every input code seen, including skipped ones.
    pub total: usize,
    /// Codes found in the ledger and not requested.
    pub skipped: usize,
    /// Codes written to the success table.
    pub succeeded: usize,
    /// Codes written to the failure table.
    pub failed: usize,
}

impl BatchSummary {
    pub fn record_skip(&mut self) {
        self.total += 1;
        self.skipped += 1;
    }

    pub fn record_outcome(&mut self, outcome: &MappingOutcome) {
        self.total += 1;
        if outcome.is_success() {
            self.succeeded += 1;
        } else {
            self.failed += 1;
        }
    }
}
