//! Typed event payloads for the Event Stream Server
//!
//! Each stream kind owns a closed set of payload shapes, serialized to
//! compact JSON before entering the wire codec.

use chrono::Utc;
use serde::{Deserialize, Serialize};

/// Current time as an RFC 3339 string, the timestamp format used in payloads
pub fn now_rfc3339() -> String {
    Utc::now().to_rfc3339()
}

/// Payload of a ticker `update` event
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TickUpdate {
    pub count: u32,
    pub message: String,
    pub timestamp: String,
}

impl TickUpdate {
    pub fn new(count: u32) -> Self {
        Self {
            count,
            message: format!("Update #{}", count),
            timestamp: now_rfc3339(),
        }
    }
}

/// Terminal payload shared by the ticker and progress `done` events
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StreamDone {
    pub status: String,
    pub total: u32,
}

impl StreamDone {
    pub fn new(total: u32) -> Self {
        Self {
            status: "complete".to_string(),
            total,
        }
    }
}

/// Severity of a replayed log record; styling hint for clients only
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum LogLevel {
    Info,
    Warning,
    Error,
}

/// Payload of a `log` event
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogRecord {
    pub line: u32,
    pub level: LogLevel,
    pub message: String,
    pub timestamp: String,
}

/// Terminal payload of the log replay `complete` event
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReplayComplete {
    pub status: String,
}

impl ReplayComplete {
    pub fn eof() -> Self {
        Self {
            status: "EOF".to_string(),
        }
    }
}

/// Payload of a `progress` event
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProgressStep {
    pub step: u32,
    pub total: u32,
    pub percentage: u32,
    pub message: String,
    pub timestamp: String,
}

/// Payload of the multiplexed stream's initial `connected` event
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Connected {
    pub connected: bool,
    pub timestamp: String,
}

impl Connected {
    pub fn now() -> Self {
        Self {
            connected: true,
            timestamp: now_rfc3339(),
        }
    }
}

/// Payload of a multiplexed `status` event
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusReport {
    pub status: String,
    pub uptime_secs: u64,
}

/// Payload of a multiplexed `metrics` event; figures are synthetic
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MetricsSample {
    pub cpu: f64,
    pub memory: f64,
    pub requests: u64,
}

/// Payload of a multiplexed `update` event
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MultiUpdate {
    pub count: u32,
    pub message: String,
}

/// Payload of a multiplexed `warning` event
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WarningNote {
    pub message: String,
}

/// Terminal payload of the multiplexed `complete` event
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StreamComplete {
    pub message: String,
}

impl StreamComplete {
    pub fn finished() -> Self {
        Self {
            message: "Stream completed".to_string(),
        }
    }
}

/// Payload of a chat `chunk` event
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatChunk {
    pub chunk: String,
    pub index: u32,
    pub is_final: bool,
}

/// Terminal payload of the chat `done` event
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatDone {
    pub content: String,
    pub tokens: u32,
    pub completed_at: String,
}

/// Health check response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: i64,
    pub uptime_seconds: u64,
    pub version: String,
}

impl HealthResponse {
    pub fn healthy(uptime_seconds: u64) -> Self {
        Self {
            status: "healthy".to_string(),
            timestamp: Utc::now().timestamp(),
            uptime_seconds,
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_level_serializes_uppercase() {
        assert_eq!(serde_json::to_string(&LogLevel::Info).unwrap(), "\"INFO\"");
        assert_eq!(
            serde_json::to_string(&LogLevel::Warning).unwrap(),
            "\"WARNING\""
        );
        assert_eq!(serde_json::to_string(&LogLevel::Error).unwrap(), "\"ERROR\"");
    }

    #[test]
    fn test_tick_update_message() {
        let update = TickUpdate::new(3);
        assert_eq!(update.count, 3);
        assert_eq!(update.message, "Update #3");
    }

    #[test]
    fn test_health_response() {
        let health = HealthResponse::healthy(42);
        assert_eq!(health.status, "healthy");
        assert_eq!(health.uptime_seconds, 42);
    }
}
