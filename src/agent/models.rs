//! Model listing with price-tier classification.
//!
//! Decorates raw provider model identifiers with a heuristic price tier
//! and a display name, sorted ascending by tier (cheapest first). The
//! ordering is a presentation contract for the CLI. A curated default
//! list stands in when the provider listing is unavailable.

use serde::Serialize;

/// A model available for research requests.
#[derive(Debug, Clone, Serialize)]
pub struct ModelInfo {
    /// Provider model identifier.
    pub name: String,
    /// Human-readable display name derived from the identifier.
    pub display_name: String,
    /// Heuristic price tier; lower is cheaper.
    pub price_tier: u8,
    /// Visual price indicator (one `$` per tier step).
    pub price_indicator: String,
}

/// Classifies a model identifier into a price tier (lower = cheaper).
///
/// Substring heuristic over common vendor naming conventions; unknown
/// names default to mid-tier.
#[must_use]
pub fn price_tier(model: &str) -> u8 {
    let lowered = model.to_lowercase();
    if lowered.contains("exp") || lowered.contains("nano") {
        0
    } else if lowered.contains("mini") || lowered.contains("flash") || lowered.contains("turbo") {
        1
    } else if lowered.contains("ultra") || lowered.contains("opus") {
        3
    } else if lowered.contains("pro") {
        2
    } else {
        1
    }
}

/// Renders a price tier as a `$` indicator.
#[must_use]
pub fn price_indicator(tier: u8) -> String {
    if tier >= 3 {
        "$$$+".to_string()
    } else {
        "$".repeat(usize::from(tier) + 1)
    }
}

/// Decorates raw model identifiers and sorts ascending by price tier
/// (ties broken by name for a stable listing).
#[must_use]
pub fn decorate(names: Vec<String>) -> Vec<ModelInfo> {
    let mut models: Vec<ModelInfo> = names
        .into_iter()
        .map(|name| {
            let tier = price_tier(&name);
            ModelInfo {
                display_name: display_name(&name),
                price_tier: tier,
                price_indicator: price_indicator(tier),
                name,
            }
        })
        .collect();
    models.sort_by(|a, b| a.price_tier.cmp(&b.price_tier).then_with(|| a.name.cmp(&b.name)));
    models
}

/// Curated fallback list used when the provider listing fails.
#[must_use]
pub fn default_models() -> Vec<ModelInfo> {
    decorate(vec![
        "gpt-5-mini-2025-08-07".to_string(),
        "gpt-5.2-2025-12-11".to_string(),
        "gpt-5-pro-2025-10-06".to_string(),
    ])
}

/// Derives a display name from a model identifier
/// (`"gpt-5-mini"` → `"Gpt 5 Mini"`).
fn display_name(model: &str) -> String {
    model
        .split(['-', '_'])
        .filter(|part| !part.is_empty())
        .map(|part| {
            let mut chars = part.chars();
            chars.next().map_or_else(String::new, |first| {
                first.to_uppercase().collect::<String>() + chars.as_str()
            })
        })
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test_case("gpt-5-nano", 0; "nano is cheapest")]
    #[test_case("gemini-2.0-flash-exp", 0; "experimental is cheapest")]
    #[test_case("gpt-5-mini-2025-08-07", 1; "mini is cheap")]
    #[test_case("gemini-2.0-flash", 1; "flash is cheap")]
    #[test_case("gemini-1.5-pro", 2; "pro is mid")]
    #[test_case("claude-3-opus", 3; "opus is premium")]
    #[test_case("gemini-ultra", 3; "ultra is premium")]
    #[test_case("unknown-model", 1; "unknown defaults to mid-cheap")]
    fn test_price_tier(model: &str, expected: u8) {
        assert_eq!(price_tier(model), expected);
    }

    #[test]
    fn test_price_indicator() {
        assert_eq!(price_indicator(0), "$");
        assert_eq!(price_indicator(1), "$$");
        assert_eq!(price_indicator(2), "$$$");
        assert_eq!(price_indicator(3), "$$$+");
    }

    #[test]
    fn test_decorate_sorts_ascending_by_tier() {
        let models = decorate(vec![
            "gemini-1.5-pro".to_string(),
            "gpt-5-nano".to_string(),
            "claude-3-opus".to_string(),
            "gpt-5-mini".to_string(),
        ]);
        let tiers: Vec<u8> = models.iter().map(|m| m.price_tier).collect();
        assert_eq!(tiers, vec![0, 1, 2, 3]);
        assert_eq!(models[0].name, "gpt-5-nano");
    }

    #[test]
    fn test_display_name() {
        assert_eq!(display_name("gpt-5-mini"), "Gpt 5 Mini");
        assert_eq!(display_name("gemini-1.5-pro"), "Gemini 1.5 Pro");
    }

    #[test]
    fn test_default_models_nonempty_and_sorted() {
        let models = default_models();
        assert!(!models.is_empty());
        for pair in models.windows(2) {
            assert!(pair[0].price_tier <= pair[1].price_tier);
        }
    }
}
