// src/report.rs
// ============================================================================
// REPORT - Single JSON output of the audit
// ============================================================================

use serde::Serialize;

use crate::schema::FormatErrorTally;
use crate::stats::DistributionSummary;

/// Everything the audit produced, serialized once to stdout.
///
/// Field order matches the historical report so diffs against old runs stay
/// readable. The raw per-example sequences are included alongside their
/// summaries.
#[derive(Debug, Serialize)]
pub struct Report {
    pub dataset_size: usize,
    pub format_errors: FormatErrorTally,

    pub n_missing_system: usize,
    pub n_missing_user: usize,
    pub n_messages: Vec<usize>,
    pub convo_lens: Vec<usize>,
    pub assistant_message_lens: Vec<usize>,

    pub num_messages_per_example: DistributionSummary,
    pub num_total_tokens_per_example: DistributionSummary,
    pub num_assistant_tokens_per_example: DistributionSummary,

    pub n_too_long: usize,
    pub n_epochs: usize,
    pub n_train_examples: usize,
    pub n_billing_tokens_in_dataset: usize,
}

impl Report {
    pub fn to_json(&self, pretty: bool) -> serde_json::Result<String> {
        if pretty {
            serde_json::to_string_pretty(self)
        } else {
            serde_json::to_string(self)
        }
    }
}
