//! Periodic ticker stream: `update` events on a fixed interval, closed by a
//! `done` event carrying the total count

use std::time::Duration;

use crate::codec::Frame;
use crate::config::TickerConfig;
use crate::error::StreamResult;
use crate::models::{StreamDone, TickUpdate};

use super::{Generator, Outcome, StreamKind};

pub struct Ticker {
    count: u32,
    interval: Duration,
    emitted: u32,
}

impl Ticker {
    pub fn new(config: &TickerConfig) -> Self {
        Self {
            count: config.count,
            interval: Duration::from_millis(config.interval_ms),
            emitted: 0,
        }
    }
}

impl Generator for Ticker {
    fn kind(&self) -> StreamKind {
        StreamKind::Ticker
    }

    fn next_event(&mut self) -> StreamResult<Outcome> {
        // Covers count = 0: the stream is just the terminal event
        if self.emitted >= self.count {
            let done = Frame::json("done", &StreamDone::new(self.count))?;
            return Ok(Outcome::Done(Some(done)));
        }

        self.emitted += 1;
        let frame = Frame::json("update", &TickUpdate::new(self.emitted))?
            .with_id(self.emitted.to_string());

        Ok(Outcome::Emit(frame, self.interval))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generators::collect_frames;
    use crate::models::StreamDone;

    fn config(count: u32) -> TickerConfig {
        TickerConfig {
            count,
            interval_ms: 0,
        }
    }

    #[test]
    fn test_emits_n_updates_then_done() {
        let frames = collect_frames(Ticker::new(&config(5)));
        assert_eq!(frames.len(), 6);

        for (i, frame) in frames[..5].iter().enumerate() {
            assert_eq!(frame.event_type.as_deref(), Some("update"));
            assert_eq!(frame.id.as_deref(), Some(format!("{}", i + 1).as_str()));
        }

        let last = frames.last().unwrap();
        assert_eq!(last.event_type.as_deref(), Some("done"));
        let done: StreamDone = serde_json::from_str(&last.data).unwrap();
        assert_eq!(done.total, 5);
        assert_eq!(done.status, "complete");
    }

    #[test]
    fn test_zero_count_emits_only_done() {
        let frames = collect_frames(Ticker::new(&config(0)));
        assert_eq!(frames.len(), 1);
        assert_eq!(frames[0].event_type.as_deref(), Some("done"));

        let done: StreamDone = serde_json::from_str(&frames[0].data).unwrap();
        assert_eq!(done.total, 0);
    }

    #[test]
    fn test_update_counts_are_strictly_increasing() {
        let frames = collect_frames(Ticker::new(&config(4)));
        let counts: Vec<u32> = frames[..4]
            .iter()
            .map(|f| {
                serde_json::from_str::<crate::models::TickUpdate>(&f.data)
                    .unwrap()
                    .count
            })
            .collect();
        assert_eq!(counts, vec![1, 2, 3, 4]);
    }
}
