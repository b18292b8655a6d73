pub mod exchange_rates_api;

// Re-export the upstream trait so providers and consumers share one import
pub use crate::core::source::{ProviderError, RateSource};
pub use exchange_rates_api::ExchangeRatesApi;
