pub mod cli;
pub mod client;
pub mod core;
pub mod providers;
pub mod server;

use anyhow::Result;
use std::sync::Arc;
use tracing::{debug, info};

pub enum AppCommand {
    Serve,
    Watch,
    Show,
}

pub async fn run_command(command: AppCommand, config_path: Option<&str>) -> Result<()> {
    let config = match config_path {
        Some(path) => core::config::AppConfig::load_from_path(path)?,
        None => core::config::AppConfig::load()?,
    };
    debug!(
        provider = %config.provider.base_url,
        proxy = %config.widget.proxy_url,
        "Loaded config"
    );

    match command {
        AppCommand::Serve => {
            info!("Rates proxy starting...");
            let source = providers::ExchangeRatesApi::new(
                &config.provider.base_url,
                config.resolve_api_key(),
            );
            let state = server::AppState {
                source: Arc::new(source),
            };
            server::run_server(&config.server, state).await
        }
        AppCommand::Watch => {
            let client = client::RatesClient::new(&config.widget.proxy_url);
            cli::widget::watch(&client).await
        }
        AppCommand::Show => {
            let client = client::RatesClient::new(&config.widget.proxy_url);
            cli::widget::show(&client).await
        }
    }
}
