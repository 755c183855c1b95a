//! Swarmform CLI - Docker swarm service rollouts over ssh
//!
//! Usage: swarmform <COMMAND>
//!
//! Commands:
//!   proxy       Deploy traefik (and consul in production mode)
//!   monitoring  Deploy the swarmprom monitoring stack
//!   logging     Deploy the ELK logging stack
//!   nodes       Show the topology

use std::fs::File;
use std::process::ExitCode;
use std::sync::Mutex;

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use swarmform::domain::value_objects::ServiceFlag;
use swarmform::SwarmformError;

mod cli;
mod commands;

use cli::{Cli, Commands};
use commands::Workspace;

fn main() -> ExitCode {
    let cli = Cli::parse();

    if let Err(e) = init_logging(cli.verbose, cli.log_file.as_deref()) {
        eprintln!("Error: {:#}", e);
        return ExitCode::FAILURE;
    }

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("{:#}", e);
            eprintln!("Error: {:#}", e);
            ExitCode::from(exit_status(&e))
        }
    }
}

fn run(cli: &Cli) -> Result<()> {
    let workspace = Workspace::resolve(cli)?;

    match cli.command {
        Commands::Proxy { dry_run } => {
            commands::rollout::cmd_rollout(&workspace, ServiceFlag::Proxy, dry_run)
        }
        Commands::Monitoring { dry_run } => {
            commands::rollout::cmd_rollout(&workspace, ServiceFlag::Monitoring, dry_run)
        }
        Commands::Logging { dry_run } => {
            commands::rollout::cmd_rollout(&workspace, ServiceFlag::Logging, dry_run)
        }
        Commands::Nodes => commands::nodes::cmd_nodes(&workspace),
    }
}

/// `RUST_LOG` wins; otherwise the level follows `-v`
fn init_logging(verbose: u8, log_file: Option<&std::path::Path>) -> Result<()> {
    let default_level = match verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("swarmform={}", default_level)));

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(verbose > 1);

    match log_file {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("creating log file {}", path.display()))?;
            builder
                .with_ansi(false)
                .with_writer(Mutex::new(file))
                .init();
        }
        None => builder.with_writer(std::io::stderr).init(),
    }
    Ok(())
}

/// Process exit status for a failed run
fn exit_status(err: &anyhow::Error) -> u8 {
    err.chain()
        .find_map(|cause| cause.downcast_ref::<SwarmformError>())
        .map(|e| e.exit_code())
        .and_then(|code| u8::try_from(code).ok())
        .unwrap_or(1)
}
