//! Client for the proxy endpoint, used by the terminal widget.

use anyhow::{Result, anyhow};
use tracing::{debug, error};

use crate::core::rates::RatesPayload;

pub struct RatesClient {
    base_url: String,
    client: reqwest::Client,
}

impl RatesClient {
    pub fn new(base_url: &str) -> Self {
        RatesClient {
            base_url: base_url.trim_end_matches('/').to_string(),
            client: reqwest::Client::new(),
        }
    }

    /// Fetch the normalized payload from the proxy. Any non-2xx status or
    /// transport failure is an error; the caller collapses all of them into
    /// one user-visible message.
    pub async fn fetch_rates(&self) -> Result<RatesPayload> {
        let url = format!("{}/api/rates", self.base_url);
        debug!("Requesting rates from {url}");

        let response = self.client.get(&url).send().await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            error!(status = %status, body = %body, "Backend error");
            return Err(anyhow!("HTTP error: {status} from rates proxy"));
        }

        Ok(response.json::<RatesPayload>().await?)
    }
}
