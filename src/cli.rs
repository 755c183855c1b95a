use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Swarmform - deploy proxy, monitoring and logging stacks onto a Docker swarm
#[derive(Parser, Debug)]
#[command(name = "swarmform")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Working directory holding nodes.yml, swarmform.yml and sources/
    #[arg(short = 'C', long, global = true, default_value = ".")]
    pub workdir: PathBuf,

    /// Descriptor file (default: <workdir>/swarmform.yml)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Topology file (default: <workdir>/nodes.yml)
    #[arg(long, global = true)]
    pub nodes: Option<PathBuf>,

    /// Sources directory with configuration files and templates
    #[arg(long, global = true)]
    pub sources: Option<PathBuf>,

    /// Verbosity level (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Write logs to this file instead of stderr
    #[arg(long, global = true, value_name = "PATH")]
    pub log_file: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Deploy traefik (with consul and Let's Encrypt when ACME is enabled)
    Proxy {
        /// Plan and validate only, touch no node
        #[arg(long)]
        dry_run: bool,
    },

    /// Deploy prometheus, grafana and alertmanager (needs proxy)
    Monitoring {
        /// Plan and validate only, touch no node
        #[arg(long)]
        dry_run: bool,
    },

    /// Deploy elasticsearch, logstash, kibana and filebeat (needs proxy)
    Logging {
        /// Plan and validate only, touch no node
        #[arg(long)]
        dry_run: bool,
    },

    /// Show the topology with roles, deployed stacks and quorum size
    Nodes,
}
