use anyhow::Result;
use clap::{CommandFactory, Parser, Subcommand};
use fxdesk::core::log::init_logging;
use std::net::SocketAddr;

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

impl From<Commands> for fxdesk::AppCommand {
    fn from(cmd: Commands) -> fxdesk::AppCommand {
        match cmd {
            Commands::Desktop => fxdesk::AppCommand::Desktop,
            Commands::Web { listen } => fxdesk::AppCommand::Web { listen },
            Commands::Setup => unreachable!("Setup command should be handled separately"),
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Create default configuration
    Setup,
    /// Open the converter in this terminal
    Desktop,
    /// Serve the converter page over HTTP
    Web {
        /// Address to listen on, overriding the configured one
        #[arg(short, long)]
        listen: Option<SocketAddr>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let interactive = matches!(cli.command, Some(Commands::Desktop));
    init_logging(cli.verbose, interactive);

    let result = match cli.command {
        Some(Commands::Setup) => fxdesk::cli::setup::setup(),
        Some(cmd) => fxdesk::run_command(cmd.into(), cli.config_path.as_deref()).await,
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
