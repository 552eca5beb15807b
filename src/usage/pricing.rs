use super::types::UsageTally;

/// Per-million-token rates ($/1M) for the four usage categories.
#[derive(Debug, Clone, Copy)]
pub struct RateCard {
    pub input: f64,
    pub output: f64,
    pub cache_read: f64,
    pub cache_write: f64,
}

/// Applied whenever a model id has no exact entry in the table.
pub const DEFAULT_PRICING: RateCard = RateCard {
    input: 1.00,
    output: 5.00,
    cache_read: 0.10,
    cache_write: 1.00,
};

#[rustfmt::skip]
static MODEL_PRICING: &[(&str, RateCard)] = &[
    ("MiniMax-M2.5",               RateCard { input: 0.30,  output: 1.20,  cache_read: 0.03, cache_write: 0.30 }),
    ("MiniMax-M2.1",               RateCard { input: 0.30,  output: 1.20,  cache_read: 0.03, cache_write: 0.30 }),
    ("k2p5",                       RateCard { input: 0.60,  output: 2.50,  cache_read: 0.10, cache_write: 0.60 }),
    ("kimi-k2.5",                  RateCard { input: 0.60,  output: 2.50,  cache_read: 0.10, cache_write: 0.60 }),
    ("glm-4.7",                    RateCard { input: 0.60,  output: 2.20,  cache_read: 0.11, cache_write: 0.60 }),
    ("claude-opus-4-6",            RateCard { input: 15.00, output: 75.00, cache_read: 1.50, cache_write: 15.00 }),
    ("claude-sonnet-4-6",          RateCard { input: 3.00,  output: 15.00, cache_read: 0.30, cache_write: 3.75 }),
    ("claude-sonnet-4-5-20250929", RateCard { input: 3.00,  output: 15.00, cache_read: 0.30, cache_write: 3.75 }),
    ("claude-3-5-sonnet-20241022", RateCard { input: 3.00,  output: 15.00, cache_read: 0.30, cache_write: 3.75 }),
    ("claude-3-5-haiku-20241022",  RateCard { input: 0.80,  output: 4.00,  cache_read: 0.08, cache_write: 0.80 }),
    ("claude-haiku-4-5-20251001",  RateCard { input: 0.80,  output: 4.00,  cache_read: 0.08, cache_write: 0.80 }),
];

/// Exact-string lookup; unknown ids get the default card. Total over
/// any input, including the empty string.
pub fn rate_card(model: &str) -> &'static RateCard {
    MODEL_PRICING
        .iter()
        .find(|(name, _)| *name == model)
        .map(|(_, card)| card)
        .unwrap_or(&DEFAULT_PRICING)
}

/// Cost in dollars for a tally under a model's rate card.
///
/// Cached tokens are billed at cache rates, so they are subtracted from
/// the nominal input count before the input rate applies. The
/// subtraction saturates: some upstream logs double-count cache tokens
/// and the cost must never go negative.
pub fn calculate_cost(model: &str, usage: &UsageTally) -> f64 {
    let rates = rate_card(model);
    let net_input = usage
        .input
        .saturating_sub(usage.cache_read.saturating_add(usage.cache_write));
    (net_input as f64 * rates.input
        + usage.output as f64 * rates.output
        + usage.cache_read as f64 * rates.cache_read
        + usage.cache_write as f64 * rates.cache_write)
        / 1_000_000.0
}

/// Round to 4 decimal places (per-model costs).
pub(crate) fn round4(value: f64) -> f64 {
    (value * 10_000.0).round() / 10_000.0
}

/// Round to 2 decimal places (report totals).
pub(crate) fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tally(input: u64, output: u64, cache_read: u64, cache_write: u64) -> UsageTally {
        UsageTally {
            input,
            output,
            cache_read,
            cache_write,
        }
    }

    #[test]
    fn sonnet_cost_with_cache_discount() {
        let usage = tally(100_000, 50_000, 10_000, 5_000);
        let cost = calculate_cost("claude-sonnet-4-6", &usage);
        // net input (85k) at $3/M + output at $15/M + cache at cache rates
        let expected = 0.255 + 0.75 + 0.003 + 0.01875;
        assert!((cost - expected).abs() < 1e-9);
    }

    #[test]
    fn opus_cost_without_cache() {
        let usage = tally(100_000, 100_000, 0, 0);
        let cost = calculate_cost("claude-opus-4-6", &usage);
        assert!((cost - 9.0).abs() < 1e-9);
    }

    #[test]
    fn unknown_model_uses_default_card() {
        let usage = tally(1_000_000, 500_000, 0, 0);
        let cost = calculate_cost("unknown-model-xyz", &usage);
        // Default card: $1/M input, $5/M output
        assert!((cost - 3.5).abs() < 1e-9);
    }

    #[test]
    fn empty_model_id_uses_default_card() {
        let usage = tally(1_000_000, 0, 0, 0);
        assert!((calculate_cost("", &usage) - 1.0).abs() < 1e-9);
    }

    #[test]
    fn zero_usage_costs_nothing_for_every_model() {
        let zero = UsageTally::default();
        assert_eq!(calculate_cost("unknown-model-xyz", &zero), 0.0);
        for (model, _) in MODEL_PRICING {
            assert_eq!(calculate_cost(model, &zero), 0.0);
        }
    }

    #[test]
    fn cache_exceeding_input_clamps_to_zero_net() {
        // cacheRead + cacheWrite > input must not produce a negative
        // input term.
        let usage = tally(1_000, 0, 5_000, 5_000);
        let cost = calculate_cost("claude-sonnet-4-6", &usage);
        let expected = (5_000.0 * 0.30 + 5_000.0 * 3.75) / 1_000_000.0;
        assert!(cost >= 0.0);
        assert!((cost - expected).abs() < 1e-9);
    }

    #[test]
    fn cost_is_monotone_in_each_counter() {
        let base = tally(10_000, 10_000, 1_000, 1_000);
        let base_cost = calculate_cost("claude-sonnet-4-6", &base);
        for bumped in [
            tally(20_000, 10_000, 1_000, 1_000),
            tally(10_000, 20_000, 1_000, 1_000),
            tally(10_000, 10_000, 2_000, 1_000),
            tally(10_000, 10_000, 1_000, 2_000),
        ] {
            assert!(calculate_cost("claude-sonnet-4-6", &bumped) >= base_cost);
        }
    }

    #[test]
    fn pricing_table_rates_are_positive() {
        for (model, card) in MODEL_PRICING {
            for rate in [card.input, card.output, card.cache_read, card.cache_write] {
                assert!(rate > 0.0, "model {model} has a non-positive rate");
            }
        }
    }

    #[test]
    fn rounding_helpers() {
        assert_eq!(round4(1.026_75), 1.0268);
        assert_eq!(round2(1.026_75), 1.03);
        assert_eq!(round4(0.0), 0.0);
    }
}
