//! Usage, cost, and latency accounting for a completed generation.
//!
//! Token counts are whitespace word counts, a deliberately rough
//! approximation; cost figures derived from them are estimates.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::context::ConversationWindow;

/// Per-token prices in dollars. Read-only after startup.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(default)]
pub struct PricingTable {
    pub input_price_per_token: f64,
    pub output_price_per_token: f64,
}

impl Default for PricingTable {
    fn default() -> Self {
        // $0.10 / $0.40 per 1M tokens
        Self {
            input_price_per_token: 0.0001 / 1000.0,
            output_price_per_token: 0.0004 / 1000.0,
        }
    }
}

impl PricingTable {
    pub fn cost(&self, input_tokens: usize, output_tokens: usize) -> f64 {
        input_tokens as f64 * self.input_price_per_token
            + output_tokens as f64 * self.output_price_per_token
    }
}

/// Summary reported to the caller after a successful generation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UsageMetrics {
    pub input_tokens: usize,
    pub output_tokens: usize,
    pub total_tokens: usize,
    pub cost: f64,
    pub latency: f64,
    pub ai_latency: f64,
    pub chunk_count: u64,
    pub tokens_per_second: f64,
}

pub fn word_count(text: &str) -> usize {
    text.split_whitespace().count()
}

/// Computes the usage summary for one completed generation.
///
/// `total` is wall time since the request arrived, `generation` wall
/// time since the upstream call started.
pub fn compute(
    window: &ConversationWindow,
    response: &str,
    total: Duration,
    generation: Duration,
    chunk_count: u64,
    pricing: &PricingTable,
) -> UsageMetrics {
    let input_tokens = window.word_count();
    let output_tokens = word_count(response);
    let total_tokens = input_tokens + output_tokens;

    let ai_latency = generation.as_secs_f64();
    let tokens_per_second = if ai_latency > 0.0 {
        round_to(total_tokens as f64 / ai_latency, 2)
    } else {
        0.0
    };

    UsageMetrics {
        input_tokens,
        output_tokens,
        total_tokens,
        cost: round_to(pricing.cost(input_tokens, output_tokens), 6),
        latency: round_to(total.as_secs_f64(), 2),
        ai_latency: round_to(ai_latency, 2),
        chunk_count,
        tokens_per_second,
    }
}

fn round_to(value: f64, digits: u32) -> f64 {
    let factor = 10f64.powi(digits as i32);
    (value * factor).round() / factor
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::types::ChatMessage;

    fn window_for(contents: &[&str]) -> ConversationWindow {
        let history: Vec<ChatMessage> = contents
            .iter()
            .map(|c| ChatMessage::new("user", *c))
            .collect();
        ConversationWindow::from_history(&history)
    }

    #[test]
    fn cost_is_price_weighted_and_rounded_to_six_decimals() {
        let pricing = PricingTable::default();
        let window = window_for(&["one two"]);
        let metrics = compute(
            &window,
            "a b c",
            Duration::from_secs(2),
            Duration::from_secs(1),
            3,
            &pricing,
        );

        let expected = metrics.input_tokens as f64 * pricing.input_price_per_token
            + 3.0 * pricing.output_price_per_token;
        let rounded = (expected * 1e6).round() / 1e6;
        assert_eq!(metrics.cost, rounded);
        assert_eq!(metrics.output_tokens, 3);
        assert_eq!(
            metrics.total_tokens,
            metrics.input_tokens + metrics.output_tokens
        );
    }

    #[test]
    fn zero_generation_latency_reports_zero_throughput() {
        let metrics = compute(
            &window_for(&["hello"]),
            "",
            Duration::from_secs(0),
            Duration::from_secs(0),
            0,
            &PricingTable::default(),
        );
        assert_eq!(metrics.tokens_per_second, 0.0);
        assert_eq!(metrics.ai_latency, 0.0);
        assert_eq!(metrics.output_tokens, 0);
    }

    #[test]
    fn latencies_round_to_two_decimals() {
        let metrics = compute(
            &window_for(&["hi"]),
            "a",
            Duration::from_millis(3456),
            Duration::from_millis(1234),
            1,
            &PricingTable::default(),
        );
        assert_eq!(metrics.latency, 3.46);
        assert_eq!(metrics.ai_latency, 1.23);
    }

    #[test]
    fn custom_pricing_flows_through() {
        let pricing = PricingTable {
            input_price_per_token: 0.001,
            output_price_per_token: 0.002,
        };
        // input = preamble + 2, output = 4
        let window = window_for(&["alpha beta"]);
        let metrics = compute(
            &window,
            "w x y z",
            Duration::from_secs(1),
            Duration::from_secs(1),
            2,
            &pricing,
        );
        let expected = metrics.input_tokens as f64 * 0.001 + 4.0 * 0.002;
        assert!((metrics.cost - (expected * 1e6).round() / 1e6).abs() < f64::EPSILON);
    }

    #[test]
    fn word_count_splits_on_whitespace_only() {
        assert_eq!(word_count(""), 0);
        assert_eq!(word_count("  spaced   out\ttabs\nnewlines  "), 4);
    }
}
