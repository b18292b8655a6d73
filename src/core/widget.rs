//! Widget state machine, independent of any rendering concern.

use chrono::{DateTime, Local};

use super::currency::{DISPLAY_CURRENCIES, PIVOT_CURRENCY};
use super::rates::RatesPayload;

/// Generic user-facing message for any failed fetch, regardless of cause.
pub const FETCH_ERROR_MESSAGE: &str = "Failed to load rates";

#[derive(Debug, Clone, PartialEq)]
pub struct RateRow {
    pub code: &'static str,
    pub rate: f64,
}

/// State of the rate display between fetch cycles.
///
/// Transitions are pure so they can be tested without a terminal or an HTTP
/// server: `begin_refresh` on mount or user refresh, then exactly one of
/// `apply_success` / `apply_failure` when the request settles.
#[derive(Debug, Clone)]
pub struct WidgetState {
    pub rows: Vec<RateRow>,
    pub base: &'static str,
    pub last_updated: Option<DateTime<Local>>,
    pub error: Option<String>,
    pub refreshing: bool,
}

impl WidgetState {
    pub fn new() -> Self {
        WidgetState {
            rows: Vec::new(),
            base: PIVOT_CURRENCY,
            last_updated: None,
            error: None,
            refreshing: false,
        }
    }

    /// A fetch is starting: drop any stale error and disable the refresh
    /// control until the request settles.
    pub fn begin_refresh(&mut self) {
        self.error = None;
        self.refreshing = true;
    }

    /// A fetch settled successfully: replace the rows wholesale, one row per
    /// display currency with absent keys defaulting to zero.
    pub fn apply_success(&mut self, payload: &RatesPayload, now: DateTime<Local>) {
        self.rows = DISPLAY_CURRENCIES
            .into_iter()
            .map(|code| RateRow {
                code,
                rate: payload.rates.get(code).copied().unwrap_or(0.0),
            })
            .collect();
        self.last_updated = Some(now);
        self.refreshing = false;
    }

    /// A fetch settled with an error: keep whatever was rendered before.
    pub fn apply_failure(&mut self) {
        self.error = Some(FETCH_ERROR_MESSAGE.to_string());
        self.refreshing = false;
    }
}

impl Default for WidgetState {
    fn default() -> Self {
        Self::new()
    }
}
