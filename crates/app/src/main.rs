//! Cooperative portal CLI
//!
//! Signs in to the portal API and reads or edits its resources from the
//! terminal. Logs go to stderr (`RUST_LOG`, default `info`); results go to
//! stdout as JSON.

mod auth_cmd;
mod output;
mod resource_cmd;

use std::io;
use std::path::PathBuf;

use clap::{Parser, Subcommand};
use portal_infrastructure::{Portal, PortalConfig};
use tracing::debug;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use crate::auth_cmd::AuthAction;
use crate::resource_cmd::ResourceCommand;

#[derive(Parser, Debug)]
#[command(name = "portal")]
#[command(version, about = "Cooperative portal API client", long_about = None)]
struct Cli {
    /// Configuration file (TOML, YAML or JSON)
    #[arg(short, long, env = "PORTAL_CONFIG", global = true)]
    config: Option<PathBuf>,

    /// API base URL, overriding the configuration
    #[arg(long, global = true)]
    api_url: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    #[command(flatten)]
    Auth(AuthAction),

    #[command(flatten)]
    Resource(ResourceCommand),
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing();

    let mut config = PortalConfig::load(cli.config.as_deref())?;
    if let Some(api_url) = cli.api_url {
        config.api_base_url = api_url;
    }
    debug!(
        api = %config.api_base_url,
        token_path = %config.token_path.display(),
        "configuration loaded"
    );

    let portal = Portal::connect(&config)?;
    let mut out = io::stdout();

    match cli.command {
        Command::Auth(action) => auth_cmd::run(action, &portal, &mut out).await,
        Command::Resource(command) => resource_cmd::run(command, &portal, &mut out).await,
    }
}
