//! showdesk - catalog administration client
//!
//! # Usage
//!
//! ```bash
//! # Interactive admin session (series, seasons and episodes panels)
//! showdesk
//!
//! # CLI mode (for automation)
//! showdesk series list --json
//! showdesk seasons create <series-id> 2
//! showdesk episodes create <season-id> --number 1 --title Pilot --duration 1400
//! ```

use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use showdesk::api::{Gateways, HttpClient};
use showdesk::cli::{Cli, Command, ExitCode, Output};
use showdesk::commands;
use showdesk::config::Config;

#[tokio::main]
async fn main() -> std::process::ExitCode {
    // stdout carries command output, logs go to stderr
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "showdesk=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();
    run(cli).await.into()
}

/// Resolve config, run the command and return its exit code
async fn run(cli: Cli) -> ExitCode {
    let output = Output::new(&cli);

    let loaded = match cli.config.as_deref() {
        Some(path) => Config::load_from(path),
        None => Ok(Config::load()),
    };
    let config = match loaded {
        Ok(config) => config.resolve(cli.api_url.as_deref()),
        Err(e) => return output.error(format!("{:#}", e), ExitCode::InvalidArgs),
    };
    tracing::debug!(api_url = config.api_url(), timeout = config.timeout_secs, "resolved config");

    let gateways = || Gateways::http(HttpClient::with_timeout(config.api_url(), config.timeout()));

    match cli.command {
        Some(Command::Series(cmd)) => commands::series_cmd(cmd, &gateways(), &output).await,

        Some(Command::Seasons(cmd)) => commands::seasons_cmd(cmd, &gateways(), &output).await,

        Some(Command::Episodes(cmd)) => commands::episodes_cmd(cmd, &gateways(), &output).await,

        Some(Command::UploadPoster(cmd)) => {
            commands::upload_poster_cmd(cmd, &gateways(), &output).await
        }

        Some(Command::Config(cmd)) => commands::config_cmd(cmd, cli.config.as_deref(), &output),

        Some(Command::Admin) | None => commands::admin_cmd(gateways(), &output).await,
    }
}
