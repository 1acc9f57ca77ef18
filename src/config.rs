//! Configuration parsing for the Lanstreamer server.
//!
//! Supports:
//! - CLI arguments via clap
//! - Environment variable overrides
//! - Sensible defaults for quick start
//!
//! Settings that operators change at runtime (accepted app version,
//! login timeout) live in the `configurations` table instead.

use clap::Parser;
use std::path::PathBuf;
use std::time::Duration;

/// Lanstreamer: desktop-app distribution backend.
#[derive(Parser, Debug, Clone)]
#[command(name = "lanstreamer")]
#[command(author, version, about, long_about = None)]
pub struct Config {
    /// Host address to bind to
    #[arg(long, env = "LANSTREAMER_HOST", default_value = "0.0.0.0")]
    pub host: String,

    /// Port to listen on
    #[arg(short, long, env = "LANSTREAMER_PORT", default_value_t = 8080)]
    pub port: u16,

    /// Data directory for SQLite database
    #[arg(short, long, env = "LANSTREAMER_DATA_DIR", default_value = "./data")]
    pub data_dir: PathBuf,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, env = "RUST_LOG", default_value = "info")]
    pub log_level: String,

    /// Size of the database connection pool
    #[arg(long, env = "LANSTREAMER_POOL_SIZE", default_value_t = 10)]
    pub pool_size: u32,

    /// Lifetime of an access code grant after login, in seconds
    #[arg(long, env = "LANSTREAMER_ACCESS_TTL_SECS", default_value_t = 600)]
    pub access_ttl_secs: u64,

    /// Interval between expired-grant sweeps, in seconds
    #[arg(
        long,
        env = "LANSTREAMER_CLEANUP_INTERVAL_SECS",
        default_value_t = 60,
        value_parser = clap::value_parser!(u64).range(1..)
    )]
    pub cleanup_interval_secs: u64,

    /// JSON file mapping bearer tokens to identities
    #[arg(long, env = "LANSTREAMER_IDENTITIES_FILE")]
    pub identities_file: Option<PathBuf>,
}

impl Config {
    /// Parse configuration from CLI arguments and environment.
    pub fn parse_args() -> Self {
        Self::parse()
    }

    pub fn db_path(&self) -> PathBuf {
        self.data_dir.join("lanstreamer.db")
    }

    pub fn access_ttl(&self) -> Duration {
        Duration::from_secs(self.access_ttl_secs)
    }

    pub fn cleanup_interval(&self) -> Duration {
        Duration::from_secs(self.cleanup_interval_secs)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".into(),
            port: 8080,
            data_dir: PathBuf::from("./data"),
            log_level: "info".into(),
            pool_size: 10,
            access_ttl_secs: 600,
            cleanup_interval_secs: 60,
            identities_file: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.port, 8080);
        assert_eq!(config.host, "0.0.0.0");
        assert_eq!(config.db_path(), PathBuf::from("./data/lanstreamer.db"));
    }

    #[test]
    fn test_parse_overrides() {
        let config = Config::try_parse_from([
            "lanstreamer",
            "--port",
            "9000",
            "--access-ttl-secs",
            "30",
        ])
        .unwrap();
        assert_eq!(config.port, 9000);
        assert_eq!(config.access_ttl(), Duration::from_secs(30));
    }

    #[test]
    fn test_zero_cleanup_interval_rejected() {
        let result = Config::try_parse_from(["lanstreamer", "--cleanup-interval-secs", "0"]);
        assert!(result.is_err());
    }
}
