//! Log replay stream: a fixed, ordered record list emitted as `log` events,
//! closed by a `complete` event
//!
//! Replaying the same session twice produces the identical sequence; the
//! record list is a read-only constant shared by all sessions.

use std::time::Duration;

use once_cell::sync::Lazy;

use crate::codec::Frame;
use crate::config::LogReplayConfig;
use crate::error::StreamResult;
use crate::models::{now_rfc3339, LogLevel, LogRecord, ReplayComplete};

use super::{Generator, Outcome, StreamKind};

/// Canned records replayed by every log stream session
pub static CANNED_RECORDS: Lazy<Vec<(LogLevel, &'static str)>> = Lazy::new(|| {
    vec![
        (LogLevel::Info, "Application started"),
        (LogLevel::Info, "Database connection established"),
        (LogLevel::Info, "Processing request"),
        (LogLevel::Warning, "Cache miss, fetching from database"),
        (LogLevel::Info, "Request completed successfully"),
        (LogLevel::Warning, "Background job queue above threshold"),
        (LogLevel::Error, "Metrics export failed, will retry"),
        (LogLevel::Info, "Cleaning up temporary files"),
    ]
});

pub struct LogReplay {
    interval: Duration,
    cursor: usize,
}

impl LogReplay {
    pub fn new(config: &LogReplayConfig) -> Self {
        Self {
            interval: Duration::from_millis(config.interval_ms),
            cursor: 0,
        }
    }
}

impl Generator for LogReplay {
    fn kind(&self) -> StreamKind {
        StreamKind::LogReplay
    }

    fn next_event(&mut self) -> StreamResult<Outcome> {
        if self.cursor >= CANNED_RECORDS.len() {
            let complete = Frame::json("complete", &ReplayComplete::eof())?;
            return Ok(Outcome::Done(Some(complete)));
        }

        let (level, message) = CANNED_RECORDS[self.cursor];
        let record = LogRecord {
            line: self.cursor as u32 + 1,
            level,
            message: message.to_string(),
            timestamp: now_rfc3339(),
        };

        let frame = Frame::json("log", &record)?.with_id(self.cursor.to_string());
        self.cursor += 1;

        Ok(Outcome::Emit(frame, self.interval))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generators::collect_frames;

    fn generator() -> LogReplay {
        LogReplay::new(&LogReplayConfig { interval_ms: 0 })
    }

    #[test]
    fn test_replays_records_in_original_order() {
        let frames = collect_frames(generator());
        assert_eq!(frames.len(), CANNED_RECORDS.len() + 1);

        for (i, frame) in frames[..CANNED_RECORDS.len()].iter().enumerate() {
            assert_eq!(frame.event_type.as_deref(), Some("log"));
            let record: LogRecord = serde_json::from_str(&frame.data).unwrap();
            assert_eq!(record.line, i as u32 + 1);
            assert_eq!(record.level, CANNED_RECORDS[i].0);
            assert_eq!(record.message, CANNED_RECORDS[i].1);
        }
    }

    #[test]
    fn test_ends_with_exactly_one_complete() {
        let frames = collect_frames(generator());
        let completes: Vec<_> = frames
            .iter()
            .filter(|f| f.event_type.as_deref() == Some("complete"))
            .collect();
        assert_eq!(completes.len(), 1);
        assert_eq!(
            frames.last().unwrap().event_type.as_deref(),
            Some("complete")
        );
    }

    #[test]
    fn test_replay_is_deterministic_across_sessions() {
        let first: Vec<String> = collect_frames(generator())
            .iter()
            .filter(|f| f.event_type.as_deref() == Some("log"))
            .map(|f| serde_json::from_str::<LogRecord>(&f.data).unwrap().message)
            .collect();
        let second: Vec<String> = collect_frames(generator())
            .iter()
            .filter(|f| f.event_type.as_deref() == Some("log"))
            .map(|f| serde_json::from_str::<LogRecord>(&f.data).unwrap().message)
            .collect();
        assert_eq!(first, second);
    }
}
