//! Nabeeh API server
//!
//! Loads one incident snapshot and serves port and inspector risk
//! analytics over HTTP until stopped.

use anyhow::Context;
use clap::Parser;
use nabeeh_api::{config::ServerConfig, start_server};
use std::path::PathBuf;

const AFTER_HELP: &str = "\
Without --config the server binds 127.0.0.1:8000 and loads the bundled
data/sample_snapshot.json, resolved against the working directory.

Logging follows the config's log_filter; RUST_LOG overrides it,
e.g. RUST_LOG=nabeeh_analytics=debug.

Endpoints (from/to required unless noted):
    GET /health                         no parameters
    GET /api/summary
    GET /api/ports                      port table when from/to are absent
    GET /api/ports/{port_id}/details
    GET /api/inspectors                 limit=1..=200
    GET /api/inspectors/{inspector_id}
    GET /api/heatmap
    GET /api/kpis?port_id=
    GET /api/incidents?port_id=         limit=1..=100";

/// Port and inspector risk analytics server
#[derive(Debug, Parser)]
#[command(name = "nabeeh-api", version, after_help = AFTER_HELP)]
struct Cli {
    /// TOML configuration file
    #[arg(short, long, env = "NABEEH_CONFIG")]
    config: Option<PathBuf>,

    /// Incident snapshot to serve instead of the configured data_path
    #[arg(short, long, env = "NABEEH_DATA")]
    data: Option<PathBuf>,

    /// Listen port instead of the configured bind_port
    #[arg(short, long)]
    port: Option<u16>,
}

impl Cli {
    fn into_config(self) -> anyhow::Result<ServerConfig> {
        let mut config = match &self.config {
            Some(path) => ServerConfig::from_file(path)
                .with_context(|| format!("loading {}", path.display()))?,
            None => ServerConfig::default_config(),
        };
        if let Some(data) = self.data {
            config.data_path = data;
        }
        if let Some(port) = self.port {
            config.bind_port = port;
        }
        Ok(config)
    }
}

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}

async fn run() -> anyhow::Result<()> {
    let config = Cli::parse().into_config()?;
    start_server(config)
        .await
        .context("nabeeh-api stopped")
}
