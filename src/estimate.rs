// src/estimate.rs
// ============================================================================
// EPOCH & BILLING ESTIMATOR - Training-service pricing heuristics
// ============================================================================
//
// Mirrors the fine-tuning service's published defaults. Estimates, not
// guarantees.
//
// ============================================================================

/// Tokens billed per example are capped here; longer examples are truncated.
pub const MAX_TOKENS_PER_EXAMPLE: usize = 4096;

pub const TARGET_EPOCHS: usize = 3;
pub const MIN_TARGET_EXAMPLES: usize = 100;
pub const MAX_TARGET_EXAMPLES: usize = 25000;
pub const MIN_DEFAULT_EPOCHS: usize = 1;
pub const MAX_DEFAULT_EPOCHS: usize = 25;

/// Default epoch count for a dataset of `n_train_examples`.
///
/// Starts at TARGET_EPOCHS and adjusts so the total seen examples stay
/// roughly within [MIN_TARGET_EXAMPLES, MAX_TARGET_EXAMPLES].
pub fn estimate_epochs(n_train_examples: usize) -> usize {
    debug_assert!(n_train_examples > 0);

    let mut n_epochs = TARGET_EPOCHS;
    if n_train_examples * TARGET_EPOCHS < MIN_TARGET_EXAMPLES {
        n_epochs = MAX_DEFAULT_EPOCHS.min(MIN_TARGET_EXAMPLES / n_train_examples);
    } else if n_train_examples * TARGET_EPOCHS > MAX_TARGET_EXAMPLES {
        n_epochs = MIN_DEFAULT_EPOCHS.max(MAX_TARGET_EXAMPLES / n_train_examples);
    }
    n_epochs
}

/// Examples whose total token count exceeds the per-example cap.
pub fn count_too_long(convo_lens: &[usize]) -> usize {
    convo_lens
        .iter()
        .filter(|&&len| len > MAX_TOKENS_PER_EXAMPLE)
        .count()
}

/// Billable tokens: per-example counts capped, then summed.
pub fn billing_tokens(convo_lens: &[usize]) -> usize {
    convo_lens
        .iter()
        .map(|&len| len.min(MAX_TOKENS_PER_EXAMPLE))
        .sum()
}
