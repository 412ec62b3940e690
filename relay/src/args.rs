use std::net::SocketAddr;
use std::path::PathBuf;

use clap::Parser;

/// Chat-completion gateway for Gemini on Vertex AI
#[derive(Debug, Parser)]
#[command(name = "relay", about = "Chat-completion gateway for Gemini on Vertex AI")]
pub struct Args {
    /// Path to configuration file
    #[arg(short, long, default_value = "relay.toml", env = "RELAY_CONFIG")]
    pub config: PathBuf,

    /// Override the listen address
    #[arg(long, env = "RELAY_LISTEN")]
    pub listen: Option<SocketAddr>,
}
