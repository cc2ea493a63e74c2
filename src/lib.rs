// src/lib.rs
// ============================================================================
// FINETUNE-AUDIT - Chat fine-tuning dataset auditor
// ============================================================================

pub mod audit;
pub mod dataset;
pub mod estimate;
pub mod report;
pub mod schema;
pub mod stats;
pub mod tokens;

// Re-exports principales
pub use audit::audit_dataset;
pub use dataset::{load_dataset, LoadError};
pub use report::Report;
pub use schema::{validate_dataset, Conversation, FormatErrorTally, Message};
pub use stats::{summarize, DistributionSummary};
pub use tokens::{
    num_assistant_tokens_from_messages, num_tokens_from_messages, Cl100kTokenizer, TextTokenizer,
};
