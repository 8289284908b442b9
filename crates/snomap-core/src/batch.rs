//! Incremental batch mapping.
//!
//! Codes are processed one at a time in input order. Outside a full refresh a
//! code already present in the ledger is skipped. Every other code is
//! translated, its raw response written as an artifact and its outcome
//! appended to the matching table.
//! A failed request is recorded as a failure row and never stops the batch;
//! ledger and artifact write errors do.

use serde_json::json;
use tracing::{info, info_span, warn};

use snomap_fhir::Translator;
use snomap_model::{BatchSummary, MappingOutcome, MappingRecord, SnomedCode};

use crate::artifacts::ArtifactStore;
use crate::error::Result;
use crate::layout::OutputLayout;
use crate::ledger::Ledger;

/// Progress notification emitted after each input code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BatchEvent<'a> {
    /// The code already had a ledger row and no request was made.
    Skipped { code: &'a SnomedCode },
    /// The server returned a target code, now in the success table.
    Mapped { code: &'a SnomedCode, icd10_code: &'a str },
    /// No mapping or a request error, now in the failure table.
    Failed { code: &'a SnomedCode, reason: &'a str },
}

impl BatchEvent<'_> {
    /// The input code this event is about.
    pub fn code(&self) -> &SnomedCode {
        match self {
            Self::Skipped { code } | Self::Mapped { code, .. } | Self::Failed { code, .. } => code,
        }
    }
}

/// Maps a list of codes through a [`Translator`] into the output layout.
pub struct BatchMapper<'t, T: Translator + ?Sized> {
    translator: &'t T,
    layout: OutputLayout,
}

impl<'t, T: Translator + ?Sized> BatchMapper<'t, T> {
    pub fn new(translator: &'t T, layout: OutputLayout) -> Self {
        Self { translator, layout }
    }

    /// Run the batch without progress notifications.
    pub fn run(&self, codes: &[SnomedCode], full_refresh: bool) -> Result<BatchSummary> {
        self.run_with_observer(codes, full_refresh, |_| {})
    }

    /// Run the batch, calling `observer` once per input code.
    pub fn run_with_observer<F>(
        &self,
        codes: &[SnomedCode],
        full_refresh: bool,
        mut observer: F,
    ) -> Result<BatchSummary>
    where
        F: FnMut(BatchEvent<'_>),
    {
        let span = info_span!("batch", codes = codes.len(), full_refresh);
        let _guard = span.enter();

        // Artifact directory first: a full refresh must not clear the tables
        // and then fail.
        let artifacts = ArtifactStore::create(self.layout.artifact_dir())?;
        let mut ledger = Ledger::open(&self.layout, full_refresh)?;
        let mut summary = BatchSummary::default();

        for code in codes {
            if !full_refresh && ledger.contains(code) {
                summary.record_skip();
                info!(code = %code, "skipping, already processed");
                observer(BatchEvent::Skipped { code });
                continue;
            }

            let (payload, outcome) = match self.translator.translate(code) {
                Ok(response) => {
                    let outcome = response.outcome();
                    (response.payload, outcome)
                }
                Err(error) => {
                    warn!(code = %code, %error, "translate request failed");
                    (
                        json!({ "error": error.to_string() }),
                        MappingOutcome::error(&error),
                    )
                }
            };

            artifacts.write(code, &payload)?;
            let record = MappingRecord::new(code.clone(), outcome);
            ledger.append(&record)?;
            summary.record_outcome(&record.outcome);

            match &record.outcome {
                MappingOutcome::Success { icd10_code } => {
                    info!(code = %code, icd10_code = %icd10_code, "mapped");
                    observer(BatchEvent::Mapped { code, icd10_code });
                }
                MappingOutcome::Failure { reason } => {
                    warn!(code = %code, %reason, "mapping failed");
                    observer(BatchEvent::Failed { code, reason });
                }
            }
        }

        info!(
            total = summary.total,
            skipped = summary.skipped,
            succeeded = summary.succeeded,
            failed = summary.failed,
            "batch complete"
        );
        Ok(summary)
    }
}
