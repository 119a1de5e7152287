pub mod config;
pub mod issue;
pub mod jira;
pub mod model;
pub mod render;
pub mod server;
pub mod util;

use crate::config::Flags;
use color_eyre::Report;
use structopt::StructOpt;
use tracing_error::ErrorLayer;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[cfg(debug_assertions)]
const DEFAULT_FILTER: &str = "warn,jira_adf_proxy=trace,tower_http=debug";
#[cfg(not(debug_assertions))]
const DEFAULT_FILTER: &str = "warn,jira_adf_proxy=info";

fn setup_logging() -> Result<(), Report> {
    let filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => EnvFilter::try_new(DEFAULT_FILTER)?,
    };
    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer())
        .with(ErrorLayer::default())
        .init();
    color_eyre::install()?;
    Ok(())
}

#[tokio::main]
async fn main() -> Result<(), Report> {
    setup_logging()?;

    let flags = Flags::from_args();
    let setup = flags.load_cfg().await?;

    server::run(setup).await
}
