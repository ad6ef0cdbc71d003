//! Server configuration, sourced from CLI flags and environment.

use std::net::SocketAddr;

use clap::Parser;

/// Runtime configuration for the crewlink backend.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "crewlink",
    about = "Collaboration consistency & real-time delivery engine"
)]
pub struct ServerConfig {
    /// Socket address the HTTP/WebSocket server binds to.
    #[arg(long, env = "CREWLINK_BIND_ADDR", default_value = "0.0.0.0:8080")]
    pub bind_addr: SocketAddr,

    /// Number of server workers; defaults to the number of CPUs.
    #[arg(long, env = "CREWLINK_WORKERS")]
    pub workers: Option<usize>,

    /// Exact-match Origin allow-list for WebSocket upgrades. Empty
    /// disables the check (development only).
    #[arg(
        long = "allowed-origin",
        env = "CREWLINK_ALLOWED_ORIGINS",
        value_delimiter = ','
    )]
    pub allowed_origins: Vec<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self::parse_from::<_, &str>([])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_bind_to_the_conventional_port() {
        let config = ServerConfig::default();
        assert_eq!(config.bind_addr.port(), 8080);
        assert!(config.allowed_origins.is_empty());
        assert!(config.workers.is_none());
    }

    #[test]
    fn origins_split_on_commas() {
        let config = ServerConfig::parse_from([
            "crewlink",
            "--allowed-origin",
            "https://a.example,https://b.example",
        ]);
        assert_eq!(
            config.allowed_origins,
            vec![
                "https://a.example".to_owned(),
                "https://b.example".to_owned()
            ]
        );
    }
}
