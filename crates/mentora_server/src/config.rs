//! Configuration for the API server.

use mentora_error::ConfigError;
use std::time::Duration;

/// Configuration for the API server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    /// Address to bind, e.g. "0.0.0.0:8000"
    pub bind_addr: String,
    /// Seconds between outbox drain passes
    pub outbox_interval_secs: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: "0.0.0.0:8000".to_string(),
            outbox_interval_secs: 5,
        }
    }
}

impl ServerConfig {
    /// Create config from environment variables.
    ///
    /// Reads:
    /// - `MENTORA_BIND_ADDR` (default: "0.0.0.0:8000")
    /// - `MENTORA_OUTBOX_INTERVAL_SECS` (default: 5)
    pub fn from_env() -> Result<Self, ConfigError> {
        let defaults = Self::default();

        let bind_addr =
            std::env::var("MENTORA_BIND_ADDR").unwrap_or_else(|_| defaults.bind_addr.clone());

        let outbox_interval_secs = match std::env::var("MENTORA_OUTBOX_INTERVAL_SECS") {
            Ok(raw) => raw.parse::<u64>().map_err(|_| {
                ConfigError::new(format!(
                    "MENTORA_OUTBOX_INTERVAL_SECS must be an integer, got '{raw}'"
                ))
            })?,
            Err(_) => defaults.outbox_interval_secs,
        };

        Ok(Self {
            bind_addr,
            outbox_interval_secs,
        })
    }

    /// The outbox drain interval as a [`Duration`].
    pub fn outbox_interval(&self) -> Duration {
        Duration::from_secs(self.outbox_interval_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_sensible() {
        let config = ServerConfig::default();
        assert_eq!(config.bind_addr, "0.0.0.0:8000");
        assert_eq!(config.outbox_interval(), Duration::from_secs(5));
    }
}
