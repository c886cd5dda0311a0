use clap::Parser;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::reload::{self, Handle};
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter, Registry};

use crate::domain::error::Result;
use crate::interfaces::cli::{self, Cli};

const STARTUP_LEVEL: &str = "info";

pub fn run() -> Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    let filter = init_tracing();
    let config = cli.load_config()?;
    if let Some(handle) = filter {
        apply_log_level(&handle, &config.log_level);
    }

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?;
    runtime.block_on(cli::execute(cli, config))
}

/// RUST_LOG wins over the configured level
fn filter_directive(rust_log: Option<String>, configured: &str) -> String {
    rust_log
        .filter(|directive| !directive.trim().is_empty())
        .unwrap_or_else(|| configured.to_string())
}

fn env_directive(configured: &str) -> String {
    filter_directive(std::env::var(EnvFilter::DEFAULT_ENV).ok(), configured)
}

/// Install a reloadable filter before config loading; stdout stays free for command output
fn init_tracing() -> Option<Handle<EnvFilter, Registry>> {
    let (filter, handle) = reload::Layer::new(EnvFilter::new(env_directive(STARTUP_LEVEL)));
    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr))
        .try_init()
        .ok()
        .map(|_| handle)
}

fn apply_log_level(handle: &Handle<EnvFilter, Registry>, configured: &str) {
    let directive = env_directive(configured);
    if let Err(e) = handle.reload(EnvFilter::new(&directive)) {
        tracing::warn!("Failed to apply log level '{}': {}", directive, e);
    }
}
