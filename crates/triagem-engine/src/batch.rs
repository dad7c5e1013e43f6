//! Parallel batch classification.

use rayon::prelude::*;

use triagem_core::types::decision::{RecordOutcome, RowId};

use crate::engine::CompiledProfile;

/// Classify a batch of records on the rayon pool.
///
/// Records are independent, so they run in any order; the output is
/// reassembled in input order and every outcome carries the row id it came
/// in with, never a completion index.
pub fn classify_batch<S>(profile: &CompiledProfile, records: &[(RowId, S)]) -> Vec<RecordOutcome>
where
    S: AsRef<str> + Sync,
{
    let span = tracing::info_span!("classify_batch", records = records.len());
    let _guard = span.enter();

    let outcomes: Vec<RecordOutcome> = records
        .par_iter()
        .map(|(row_id, text)| RecordOutcome {
            row_id: *row_id,
            result: profile.classify(text.as_ref()),
        })
        .collect();

    tracing::info!(records = outcomes.len(), "batch classified");
    outcomes
}
