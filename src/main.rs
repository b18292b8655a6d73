use anyhow::Result;
use clap::{CommandFactory, Parser, Subcommand};
use fxrates::core::log::init_logging;

#[derive(Parser)]
#[command(version, about)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to optional configuration file
    #[arg(short, long, global = true)]
    config_path: Option<String>,

    #[command(subcommand)]
    command: Option<Commands>,
}

impl From<Commands> for fxrates::AppCommand {
    fn from(cmd: Commands) -> fxrates::AppCommand {
        match cmd {
            Commands::Serve => fxrates::AppCommand::Serve,
            Commands::Watch => fxrates::AppCommand::Watch,
            Commands::Show => fxrates::AppCommand::Show,
            Commands::Setup => unreachable!("Setup command should be handled separately"),
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Create default configuration
    Setup,
    /// Run the rates proxy server
    Serve,
    /// Display the rate widget with interactive refresh
    Watch,
    /// Fetch rates once and print them
    Show,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logging(cli.verbose);

    let result = match cli.command {
        Some(Commands::Setup) => setup(),
        Some(cmd) => fxrates::run_command(cmd.into(), cli.config_path.as_deref()).await,
        None => {
            Cli::command().print_help()?;
            Ok(())
        }
    };

    if let Err(e) = &result {
        tracing::error!(error = %e, "Application failed");
    }
    result
}

fn setup() -> anyhow::Result<()> {
    use anyhow::Context;

    let path = fxrates::core::config::AppConfig::default_config_path()?;

    if path.exists() {
        anyhow::bail!("Configuration file already exists at {}", path.display());
    }

    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
    }

    let default_config = r#"---
# api_key: "your exchangeratesapi.io access key"
# When api_key is not set here, the EXCHANGE_API_KEY environment variable is used.

provider:
  base_url: "https://api.exchangeratesapi.io"

server:
  host: "127.0.0.1"
  port: 8080

widget:
  proxy_url: "http://127.0.0.1:8080"
"#;

    std::fs::write(&path, default_config)
        .with_context(|| format!("Failed to write config file to {}", path.display()))?;

    tracing::info!("Created default configuration at {}", path.display());
    Ok(())
}
