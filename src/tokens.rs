// src/tokens.rs
// ============================================================================
// TOKEN COUNTER - Per-example token counts (cl100k_base)
// ============================================================================
//
// The per-message overhead constants mirror the chat serialization of the
// target models: 3 tokens of framing per message, 1 extra when a name is
// present, and 3 tokens priming the assistant reply. Not exact for every
// model revision, but the accepted estimate for billing purposes.
//
// ============================================================================

use tiktoken_rs::{cl100k_base, CoreBPE};

use crate::schema::{Conversation, Message};

/// Framing overhead added for every message.
pub const TOKENS_PER_MESSAGE: usize = 3;
/// Extra overhead when a message carries a `name`.
pub const TOKENS_PER_NAME: usize = 1;
/// Overhead priming the assistant reply at the end of the conversation.
pub const TOKENS_PER_REPLY: usize = 3;

/// External tokenizer capability. Only the token count of a text is used.
pub trait TextTokenizer {
    fn count_tokens(&self, text: &str) -> usize;
}

/// cl100k_base tokenizer (tiktoken), the vocabulary of the target models.
pub struct Cl100kTokenizer {
    bpe: CoreBPE,
}

impl Cl100kTokenizer {
    pub fn new() -> anyhow::Result<Self> {
        Ok(Self {
            bpe: cl100k_base()?,
        })
    }
}

impl TextTokenizer for Cl100kTokenizer {
    fn count_tokens(&self, text: &str) -> usize {
        self.bpe.encode_ordinary(text).len()
    }
}

/// Total token count of a conversation, overhead constants included.
///
/// Pure in (messages, tokenizer). An empty message list still costs the
/// reply-priming overhead of 3.
pub fn num_tokens_from_messages(messages: &[Message], tokenizer: &dyn TextTokenizer) -> usize {
    let mut num_tokens = 0;

    for message in messages {
        num_tokens += TOKENS_PER_MESSAGE;

        if let Some(role) = &message.role {
            num_tokens += tokenizer.count_tokens(role);
        }
        if let Some(content) = &message.content {
            num_tokens += tokenizer.count_tokens(content);
        }
        if let Some(name) = &message.name {
            num_tokens += tokenizer.count_tokens(name) + TOKENS_PER_NAME;
        }
        if let Some(function_call) = &message.function_call {
            num_tokens += tokenizer.count_tokens(&function_call.to_string());
        }
    }

    num_tokens + TOKENS_PER_REPLY
}

/// Token count of assistant content only. No overhead constants.
pub fn num_assistant_tokens_from_messages(
    messages: &[Message],
    tokenizer: &dyn TextTokenizer,
) -> usize {
    messages
        .iter()
        .filter(|m| m.is_assistant())
        .filter_map(|m| m.content.as_deref())
        .map(|content| tokenizer.count_tokens(content))
        .sum()
}

// ============================================================================
// PER-DATASET PASS
// ============================================================================

/// Parallel per-example sequences plus the role-coverage warnings.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct TokenStats {
    pub n_missing_system: usize,
    pub n_missing_user: usize,
    pub n_messages: Vec<usize>,
    pub convo_lens: Vec<usize>,
    pub assistant_message_lens: Vec<usize>,
}

/// Runs the token counters once per conversation, building the three
/// parallel sequences and counting conversations with no system or no
/// user message.
pub fn collect_token_stats(
    conversations: &[Conversation],
    tokenizer: &dyn TextTokenizer,
) -> TokenStats {
    let mut stats = TokenStats::default();

    for convo in conversations {
        let has_role = |role: &str| {
            convo
                .messages
                .iter()
                .any(|m| m.role.as_deref() == Some(role))
        };

        if !has_role("system") {
            stats.n_missing_system += 1;
        }
        if !has_role("user") {
            stats.n_missing_user += 1;
        }

        stats.n_messages.push(convo.messages.len());
        stats
            .convo_lens
            .push(num_tokens_from_messages(&convo.messages, tokenizer));
        stats
            .assistant_message_lens
            .push(num_assistant_tokens_from_messages(&convo.messages, tokenizer));
    }

    stats
}
