//! Backend entry point: wires the live channel, health probes, and the
//! collaboration core.

use clap::Parser;
use tracing::{info, warn};
use tracing_subscriber::{fmt, EnvFilter};

use crewlink::server::{run, ServerConfig};

/// Application bootstrap.
#[actix_web::main]
async fn main() -> std::io::Result<()> {
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }

    let config = ServerConfig::parse();
    info!(bind_addr = %config.bind_addr, "starting crewlink backend");
    run(config).await
}
