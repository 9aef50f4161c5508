//! Multiplexed stream: heterogeneous event types interleaved on one
//! connection
//!
//! The interleaving is a deterministic schedule over a logical clock: a
//! priority queue holds the next due time per sub-event type, the
//! earliest-due entry is always emitted next, and ties resolve by the fixed
//! priority order status > metrics > update > warning. The initial
//! `connected` event precedes the schedule and `complete` always closes the
//! stream.

use std::cmp::Reverse;
use std::collections::BinaryHeap;
use std::time::Duration;

use crate::codec::Frame;
use crate::config::MultiplexedConfig;
use crate::error::StreamResult;
use crate::models::{Connected, MetricsSample, MultiUpdate, StatusReport, StreamComplete, WarningNote};

use super::{Generator, Outcome, StreamKind};

/// Reconnect hint attached to the handshake event
const RETRY_HINT_MS: u64 = 3000;

/// Scheduled sub-event types; declaration order is the tie-break priority
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
enum SubEvent {
    Status,
    Metrics,
    Update,
    Warning,
}

pub struct Multiplexed {
    config: MultiplexedConfig,
    /// Next due time in logical milliseconds per scheduled sub-event
    schedule: BinaryHeap<Reverse<(u64, SubEvent)>>,
    clock_ms: u64,
    emitted: u32,
    update_count: u32,
    metrics_seq: u64,
    started: bool,
}

impl Multiplexed {
    pub fn new(config: &MultiplexedConfig) -> Self {
        Self {
            config: config.clone(),
            schedule: BinaryHeap::new(),
            clock_ms: 0,
            emitted: 0,
            update_count: 0,
            metrics_seq: 0,
            started: false,
        }
    }

    fn interval_of(&self, sub: SubEvent) -> u64 {
        match sub {
            SubEvent::Status => self.config.status_interval_ms,
            SubEvent::Metrics => self.config.metrics_interval_ms,
            SubEvent::Update => self.config.update_interval_ms,
            SubEvent::Warning => self.config.warning_interval_ms,
        }
    }

    fn delay_until_next_due(&self) -> Duration {
        match self.schedule.peek() {
            Some(Reverse((due, _))) => Duration::from_millis(due.saturating_sub(self.clock_ms)),
            None => Duration::ZERO,
        }
    }

    /// Synthetic monitoring figures, derived from the sample sequence so a
    /// fixed schedule yields a fixed stream
    fn sample_metrics(&mut self) -> MetricsSample {
        self.metrics_seq += 1;
        let seq = self.metrics_seq;
        MetricsSample {
            cpu: 20.0 + (seq * 17 % 60) as f64,
            memory: 30.0 + (seq * 13 % 50) as f64,
            requests: 100 + seq * 37 % 900,
        }
    }

    fn frame_for(&mut self, sub: SubEvent) -> StreamResult<Frame> {
        match sub {
            SubEvent::Status => Frame::json(
                "status",
                &StatusReport {
                    status: "healthy".to_string(),
                    uptime_secs: self.clock_ms / 1000,
                },
            ),
            SubEvent::Metrics => {
                let sample = self.sample_metrics();
                Frame::json("metrics", &sample)
            }
            SubEvent::Update => {
                self.update_count += 1;
                let update = MultiUpdate {
                    count: self.update_count,
                    message: format!("Update {}", self.update_count),
                };
                Ok(Frame::json("update", &update)?.with_id(self.update_count.to_string()))
            }
            SubEvent::Warning => Frame::json(
                "warning",
                &WarningNote {
                    message: "Warning: High memory usage detected".to_string(),
                },
            ),
        }
    }
}

impl Generator for Multiplexed {
    fn kind(&self) -> StreamKind {
        StreamKind::Multiplexed
    }

    fn next_event(&mut self) -> StreamResult<Outcome> {
        if !self.started {
            self.started = true;
            for sub in [
                SubEvent::Status,
                SubEvent::Metrics,
                SubEvent::Update,
                SubEvent::Warning,
            ] {
                self.schedule.push(Reverse((self.interval_of(sub), sub)));
            }

            self.emitted += 1;
            let frame = Frame::json("connected", &Connected::now())?
                .with_id("0")
                .with_retry(RETRY_HINT_MS);
            return Ok(Outcome::Emit(frame, self.delay_until_next_due()));
        }

        if self.emitted >= self.config.max_events {
            let complete = Frame::json("complete", &StreamComplete::finished())?;
            return Ok(Outcome::Done(Some(complete)));
        }

        // Heap is seeded on the first call and every pop pushes a successor,
        // so an empty schedule is unreachable here
        let Reverse((due, sub)) = match self.schedule.pop() {
            Some(entry) => entry,
            None => return Ok(Outcome::Done(None)),
        };

        self.clock_ms = due;
        let frame = self.frame_for(sub)?;
        self.schedule.push(Reverse((due + self.interval_of(sub), sub)));
        self.emitted += 1;

        Ok(Outcome::Emit(frame, self.delay_until_next_due()))
    }
}
