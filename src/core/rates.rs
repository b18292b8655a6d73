//! Rate table rebasing.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};

use super::currency::{DISPLAY_CURRENCIES, PIVOT_CURRENCY};

/// Normalized payload served by the proxy and consumed by the widget.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RatesPayload {
    pub base: String,
    pub rates: BTreeMap<String, f64>,
}

/// Rebase a table quoted against the provider's native base so it is quoted
/// against the pivot currency instead.
///
/// Identity: rate(X per pivot) = rate(X per base) / rate(pivot per base).
///
/// Returns `None` when the pivot rate is absent or not a positive finite
/// number. Display currencies that are absent upstream, or carry a
/// non-positive rate, are omitted from the result. The pivot itself is
/// never emitted since it rebases to 1.0 by construction.
pub fn rebase_to_pivot(rates: &HashMap<String, f64>) -> Option<BTreeMap<String, f64>> {
    let pivot_rate = rates
        .get(PIVOT_CURRENCY)
        .copied()
        .filter(|r| r.is_finite() && *r > 0.0)?;

    let mut rebased = BTreeMap::new();
    for code in DISPLAY_CURRENCIES {
        if let Some(rate) = rates
            .get(code)
            .copied()
            .filter(|r| r.is_finite() && *r > 0.0)
        {
            rebased.insert(code.to_string(), rate / pivot_rate);
        }
    }
    Some(rebased)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table(entries: &[(&str, f64)]) -> HashMap<String, f64> {
        entries.iter().map(|(c, r)| (c.to_string(), *r)).collect()
    }

    #[test]
    fn test_rebase_divides_by_pivot_rate() {
        let rates = table(&[("USD", 1.10), ("GBP", 0.85), ("CHF", 0.95)]);
        let rebased = rebase_to_pivot(&rates).unwrap();

        assert!((rebased["USD"] - 1.10 / 0.85).abs() < 1e-12);
        assert!((rebased["CHF"] - 0.95 / 0.85).abs() < 1e-12);
    }

    #[test]
    fn test_rebase_omits_absent_currencies() {
        let rates = table(&[("USD", 1.10), ("GBP", 0.85), ("CHF", 0.95)]);
        let rebased = rebase_to_pivot(&rates).unwrap();

        assert_eq!(rebased.len(), 2);
        assert!(!rebased.contains_key("AUD"));
        assert!(!rebased.contains_key("CAD"));
        assert!(!rebased.contains_key("EUR"));
    }

    #[test]
    fn test_rebase_never_emits_the_pivot() {
        let rates = table(&[("USD", 1.10), ("GBP", 0.85)]);
        let rebased = rebase_to_pivot(&rates).unwrap();
        assert!(!rebased.contains_key("GBP"));
    }

    #[test]
    fn test_rebase_fails_without_pivot_rate() {
        let rates = table(&[("USD", 1.10), ("EUR", 1.0)]);
        assert!(rebase_to_pivot(&rates).is_none());
    }

    #[test]
    fn test_rebase_fails_on_zero_pivot_rate() {
        let rates = table(&[("USD", 1.10), ("GBP", 0.0)]);
        assert!(rebase_to_pivot(&rates).is_none());
    }

    #[test]
    fn test_rebase_is_scale_invariant() {
        let rates = table(&[("USD", 1.10), ("GBP", 0.85), ("CAD", 1.47)]);
        let scaled = table(&[("USD", 3.30), ("GBP", 2.55), ("CAD", 4.41)]);

        let a = rebase_to_pivot(&rates).unwrap();
        let b = rebase_to_pivot(&scaled).unwrap();

        for (code, rate) in &a {
            assert!((rate - b[code]).abs() < 1e-12, "scale changed {code}");
        }
    }

    #[test]
    fn test_rebase_skips_non_positive_rates() {
        let rates = table(&[("USD", 0.0), ("CHF", -1.0), ("GBP", 0.85)]);
        let rebased = rebase_to_pivot(&rates).unwrap();
        assert!(rebased.is_empty());
    }
}
