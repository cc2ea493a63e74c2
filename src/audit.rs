// src/audit.rs
// ============================================================================
// AUDIT PIPELINE - load → validate → count → summarize → estimate
// ============================================================================
//
// One linear batch pass. Each stage is a pure step producing the next
// fields of the report; nothing mutates shared state.
//
// Records that fail the early-skip schema checks carry no usable messages
// list, so they are excluded from the token statistics. A dataset where
// every record is skipped fails with an empty-sequence error.
//
// ============================================================================

use std::path::Path;

use anyhow::{Context, Result};

use crate::dataset::load_dataset;
use crate::estimate::{billing_tokens, count_too_long, estimate_epochs};
use crate::report::Report;
use crate::schema::validate_dataset;
use crate::stats::summarize;
use crate::tokens::{collect_token_stats, TextTokenizer};

/// Runs the whole audit over one JSONL file and assembles the report.
pub fn audit_dataset(path: &Path, tokenizer: &dyn TextTokenizer) -> Result<Report> {
    let dataset = load_dataset(path)?;
    let dataset_size = dataset.len();

    let (format_errors, conversations) = validate_dataset(&dataset);
    log::info!(
        "{} records, {} with a usable messages list, {} format errors",
        dataset_size,
        conversations.len(),
        format_errors.total()
    );

    let stats = collect_token_stats(&conversations, tokenizer);

    let num_messages_per_example = summarize("n_messages", &stats.n_messages)
        .context("no records with a usable messages list")?;
    let num_total_tokens_per_example = summarize("convo_lens", &stats.convo_lens)
        .context("no records with a usable messages list")?;
    let num_assistant_tokens_per_example =
        summarize("assistant_message_lens", &stats.assistant_message_lens)
            .context("no records with a usable messages list")?;

    let n_too_long = count_too_long(&stats.convo_lens);
    let n_epochs = estimate_epochs(dataset_size);
    let n_billing_tokens_in_dataset = billing_tokens(&stats.convo_lens);

    Ok(Report {
        dataset_size,
        format_errors,
        n_missing_system: stats.n_missing_system,
        n_missing_user: stats.n_missing_user,
        n_messages: stats.n_messages,
        convo_lens: stats.convo_lens,
        assistant_message_lens: stats.assistant_message_lens,
        num_messages_per_example,
        num_total_tokens_per_example,
        num_assistant_tokens_per_example,
        n_too_long,
        n_epochs,
        n_train_examples: dataset_size,
        n_billing_tokens_in_dataset,
    })
}
