//! Progress stream: one `progress` event per step with a rounded percentage,
//! closed by an explicit `done` event
//!
//! The terminal event is deliberate: clients should never have to interpret
//! a dropped connection as successful completion.

use std::time::Duration;

use crate::codec::Frame;
use crate::config::ProgressConfig;
use crate::error::StreamResult;
use crate::models::{now_rfc3339, ProgressStep, StreamDone};

use super::{Generator, Outcome, StreamKind};

const STEP_MESSAGES: &[&str] = &[
    "Initializing...",
    "Loading dependencies...",
    "Processing data...",
    "Running calculations...",
    "Generating report...",
    "Finalizing...",
];

pub struct Progress {
    total: u32,
    interval: Duration,
    step: u32,
}

impl Progress {
    pub fn new(config: &ProgressConfig) -> Self {
        Self {
            total: config.total.max(1),
            interval: Duration::from_millis(config.interval_ms),
            step: 0,
        }
    }

    fn message_for(&self, step: u32) -> String {
        if step == self.total {
            return "Complete!".to_string();
        }
        STEP_MESSAGES[(step as usize - 1) % STEP_MESSAGES.len()].to_string()
    }
}

impl Generator for Progress {
    fn kind(&self) -> StreamKind {
        StreamKind::Progress
    }

    fn next_event(&mut self) -> StreamResult<Outcome> {
        if self.step >= self.total {
            let done = Frame::json("done", &StreamDone::new(self.total))?;
            return Ok(Outcome::Done(Some(done)));
        }

        self.step += 1;
        let payload = ProgressStep {
            step: self.step,
            total: self.total,
            percentage: (100.0 * f64::from(self.step) / f64::from(self.total)).round() as u32,
            message: self.message_for(self.step),
            timestamp: now_rfc3339(),
        };

        let frame = Frame::json("progress", &payload)?.with_id(self.step.to_string());
        Ok(Outcome::Emit(frame, self.interval))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generators::collect_frames;

    fn generator(total: u32) -> Progress {
        Progress::new(&ProgressConfig {
            total,
            interval_ms: 0,
        })
    }

    fn steps(frames: &[Frame]) -> Vec<ProgressStep> {
        frames
            .iter()
            .filter(|f| f.event_type.as_deref() == Some("progress"))
            .map(|f| serde_json::from_str(&f.data).unwrap())
            .collect()
    }

    #[test]
    fn test_steps_are_strictly_increasing() {
        let frames = collect_frames(generator(10));
        let steps = steps(&frames);
        assert_eq!(steps.len(), 10);
        for (i, step) in steps.iter().enumerate() {
            assert_eq!(step.step, i as u32 + 1);
            assert_eq!(step.total, 10);
        }
    }

    #[test]
    fn test_percentage_rounds_correctly() {
        let frames = collect_frames(generator(3));
        let steps = steps(&frames);
        let percentages: Vec<u32> = steps.iter().map(|s| s.percentage).collect();
        assert_eq!(percentages, vec![33, 67, 100]);
    }

    #[test]
    fn test_ends_with_explicit_done() {
        let frames = collect_frames(generator(4));
        let last = frames.last().unwrap();
        assert_eq!(last.event_type.as_deref(), Some("done"));
        let done: StreamDone = serde_json::from_str(&last.data).unwrap();
        assert_eq!(done.total, 4);
    }

    #[test]
    fn test_final_step_message() {
        let frames = collect_frames(generator(2));
        let steps = steps(&frames);
        assert_eq!(steps.last().unwrap().message, "Complete!");
    }
}
