pub mod cli;
pub mod core;
pub mod providers;
pub mod store;
pub mod web;

use crate::core::config::AppConfig;
use anyhow::Result;
use std::net::SocketAddr;
use tracing::debug;

/// Front-ends that run against a loaded configuration.
#[derive(Debug, Clone, PartialEq)]
pub enum AppCommand {
    Desktop,
    Web { listen: Option<SocketAddr> },
}

pub async fn run_command(command: AppCommand, config_path: Option<&str>) -> Result<()> {
    let config = match config_path {
        Some(path) => AppConfig::load_from_path(path)?,
        None => AppConfig::load()?,
    };
    debug!("Loaded config: {config:#?}");

    match command {
        AppCommand::Desktop => cli::desktop::run(&config).await,
        AppCommand::Web { listen } => web::serve(&config, listen).await,
    }
}
