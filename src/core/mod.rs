//! Core business logic abstractions

pub mod config;
pub mod currency;
pub mod log;
pub mod rates;
pub mod source;
pub mod widget;

// Re-export main types for cleaner imports
pub use rates::{RatesPayload, rebase_to_pivot};
pub use source::{ProviderError, RateSource};
pub use widget::{RateRow, WidgetState};
