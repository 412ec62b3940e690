use serde::{Deserialize, Serialize};

/// Finish reason reported for every aggregated response
pub const FINISH_REASON_STOP: &str = "stop";

/// Coarse size estimates, not tokenizer counts
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UsageEstimate {
    /// Estimate for the serialized inbound messages
    pub prompt: u64,
    /// Estimate for the generated content
    pub completion: u64,
    /// Estimate for both together
    pub total: u64,
}

impl UsageEstimate {
    /// Estimate usage from the serialized prompt and the generated content
    ///
    /// Each figure is the character count divided by four, rounded down;
    /// the total is computed over the combined length, not summed.
    pub fn from_lengths(prompt: &str, completion: &str) -> Self {
        let prompt_chars = char_count(prompt);
        let completion_chars = char_count(completion);

        Self {
            prompt: prompt_chars / 4,
            completion: completion_chars / 4,
            total: (prompt_chars + completion_chars) / 4,
        }
    }
}

fn char_count(text: &str) -> u64 {
    u64::try_from(text.chars().count()).unwrap_or(u64::MAX)
}

/// Complete response assembled from a chunk stream
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AggregatedResponse {
    /// Response identifier (`chatcmpl-<uuid>`)
    pub id: String,
    /// Model named by the client
    pub model: String,
    /// Concatenated generated text
    pub content: String,
    /// Why generation stopped
    pub finish_reason: String,
    /// Size estimates
    pub usage: UsageEstimate,
}
