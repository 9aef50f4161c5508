use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::path::Path;

use serde::Deserialize;

/// Application configuration structure
/// Loads from config.toml; every section falls back to its defaults
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    /// Web server configuration
    #[serde(default)]
    pub server: ServerConfig,
    /// Per-kind stream cadence and sizing
    #[serde(default)]
    pub streams: StreamsConfig,
}

/// Web server configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Server bind address
    pub bind_address: SocketAddr,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_address: SocketAddr::new(IpAddr::V4(Ipv4Addr::UNSPECIFIED), 8000),
        }
    }
}

/// Settings for the five stream kinds; all state derived from these is
/// per-session, so concurrent connections never share cursors
#[derive(Debug, Clone, Default, Deserialize)]
pub struct StreamsConfig {
    #[serde(default)]
    pub ticker: TickerConfig,
    #[serde(default)]
    pub logs: LogReplayConfig,
    #[serde(default)]
    pub progress: ProgressConfig,
    #[serde(default)]
    pub multi: MultiplexedConfig,
    #[serde(default)]
    pub chat: ChatConfig,
}

/// Ticker stream configuration
#[derive(Debug, Clone, Deserialize)]
pub struct TickerConfig {
    /// Number of `update` events before the terminal `done`
    pub count: u32,
    /// Delay between updates in milliseconds
    pub interval_ms: u64,
}

impl Default for TickerConfig {
    fn default() -> Self {
        Self {
            count: 5,
            interval_ms: 1000,
        }
    }
}

/// Log replay stream configuration
#[derive(Debug, Clone, Deserialize)]
pub struct LogReplayConfig {
    /// Delay between replayed records in milliseconds
    pub interval_ms: u64,
}

impl Default for LogReplayConfig {
    fn default() -> Self {
        Self { interval_ms: 500 }
    }
}

/// Progress stream configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ProgressConfig {
    /// Total number of steps
    pub total: u32,
    /// Delay between steps in milliseconds
    pub interval_ms: u64,
}

impl Default for ProgressConfig {
    fn default() -> Self {
        Self {
            total: 10,
            interval_ms: 2000,
        }
    }
}

/// Multiplexed stream configuration; each sub-event type has its own cadence
#[derive(Debug, Clone, Deserialize)]
pub struct MultiplexedConfig {
    pub status_interval_ms: u64,
    pub metrics_interval_ms: u64,
    pub update_interval_ms: u64,
    pub warning_interval_ms: u64,
    /// Total event budget including the initial `connected` event
    pub max_events: u32,
}

impl Default for MultiplexedConfig {
    fn default() -> Self {
        Self {
            status_interval_ms: 5000,
            metrics_interval_ms: 3000,
            update_interval_ms: 1000,
            warning_interval_ms: 7000,
            max_events: 20,
        }
    }
}

/// Chat echo stream configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ChatConfig {
    /// Delay between chunks in milliseconds
    pub chunk_interval_ms: u64,
    /// Greeting substituted for a missing or empty `message` parameter
    pub default_message: String,
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            chunk_interval_ms: 100,
            default_message: "Hello!".to_string(),
        }
    }
}

impl AppConfig {
    /// Load configuration from file
    pub fn from_file(path: &Path) -> Result<Self, anyhow::Error> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| anyhow::anyhow!("Failed to read config file '{}': {}", path.display(), e))?;

        let config: AppConfig = toml::from_str(&content)
            .map_err(|e| anyhow::anyhow!("Failed to parse config file '{}': {}", path.display(), e))?;

        Ok(config)
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<(), anyhow::Error> {
        if self.streams.progress.total == 0 {
            return Err(anyhow::anyhow!("Progress total must be greater than 0"));
        }

        if self.streams.multi.max_events == 0 {
            return Err(anyhow::anyhow!(
                "Multiplexed max_events must be greater than 0"
            ));
        }

        if self.streams.chat.default_message.trim().is_empty() {
            return Err(anyhow::anyhow!("Chat default message cannot be empty"));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_configs() {
        let ticker = TickerConfig::default();
        assert_eq!(ticker.count, 5);
        assert_eq!(ticker.interval_ms, 1000);

        let progress = ProgressConfig::default();
        assert_eq!(progress.total, 10);

        let multi = MultiplexedConfig::default();
        assert!(multi.max_events > 0);
        assert_eq!(multi.update_interval_ms, 1000);

        let chat = ChatConfig::default();
        assert_eq!(chat.default_message, "Hello!");
    }

    #[test]
    fn test_config_validation() {
        let mut config = AppConfig::default();
        assert!(config.validate().is_ok());

        config.streams.progress.total = 0;
        assert!(config.validate().is_err());

        config.streams.progress.total = 10;
        config.streams.chat.default_message = "  ".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_partial_toml_falls_back_to_defaults() {
        let config: AppConfig = toml::from_str(
            r#"
            [streams.ticker]
            count = 3
            interval_ms = 50
            "#,
        )
        .unwrap();

        assert_eq!(config.streams.ticker.count, 3);
        assert_eq!(config.streams.progress.total, 10);
        assert_eq!(config.server.bind_address.port(), 8000);
    }
}
