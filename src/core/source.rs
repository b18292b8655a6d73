//! Upstream rate source abstraction.

use async_trait::async_trait;
use std::collections::HashMap;
use std::fmt;

/// Failure modes of an upstream rate fetch. The proxy endpoint maps each
/// variant onto a generic caller-facing error, so the detail carried here
/// is for server-side logs only.
#[derive(Debug)]
pub enum ProviderError {
    /// No access key was configured for the provider.
    MissingApiKey,
    /// The provider answered with a non-2xx status.
    Status { status: u16, body: String },
    /// The request could not be sent or the response body not read.
    Transport(String),
    /// The response body was not valid JSON.
    Malformed(String),
    /// The body parsed but carried no rates object.
    MissingRates,
}

impl fmt::Display for ProviderError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProviderError::MissingApiKey => write!(f, "No API key configured"),
            ProviderError::Status { status, body } => {
                write!(f, "Provider returned HTTP {status}: {body}")
            }
            ProviderError::Transport(msg) => write!(f, "Request error: {msg}"),
            ProviderError::Malformed(msg) => write!(f, "Malformed provider response: {msg}"),
            ProviderError::MissingRates => write!(f, "Provider response has no rates object"),
        }
    }
}

impl std::error::Error for ProviderError {}

#[async_trait]
pub trait RateSource: Send + Sync {
    /// Latest rates quoted against the provider's native base currency.
    async fn latest_rates(&self) -> Result<HashMap<String, f64>, ProviderError>;
}
