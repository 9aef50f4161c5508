//! Stream generators: one per stream kind
//!
//! A generator produces the lazy, typed event sequence for a single
//! connection. Generators never block; pacing is expressed as the delay
//! carried by [`Outcome::Emit`] so the session owns the only suspension
//! point.

pub mod chat;
pub mod logs;
pub mod multi;
pub mod progress;
pub mod ticker;

pub use chat::ChatEcho;
pub use logs::LogReplay;
pub use multi::Multiplexed;
pub use progress::Progress;
pub use ticker::Ticker;

use std::fmt;
use std::time::Duration;

use crate::codec::Frame;
use crate::error::StreamResult;

/// The closed set of stream kinds served by this application
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StreamKind {
    Ticker,
    LogReplay,
    Progress,
    Multiplexed,
    ChatEcho,
}

impl StreamKind {
    /// Short label used for routing, logging and metric labels
    pub fn as_str(&self) -> &'static str {
        match self {
            StreamKind::Ticker => "ticker",
            StreamKind::LogReplay => "logs",
            StreamKind::Progress => "progress",
            StreamKind::Multiplexed => "multi",
            StreamKind::ChatEcho => "chat",
        }
    }
}

impl fmt::Display for StreamKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Result of asking a generator for its next event
#[derive(Debug)]
pub enum Outcome {
    /// Produce this frame now, then wait the given delay before asking again
    Emit(Frame, Duration),
    /// Stream finished; optionally emit one final frame first
    Done(Option<Frame>),
}

/// Domain logic and pacing for one stream kind
///
/// `next_event` must return promptly; serialization failures propagate as
/// fatal session errors.
pub trait Generator: Send {
    fn kind(&self) -> StreamKind;

    fn next_event(&mut self) -> StreamResult<Outcome>;
}

/// Drive a generator to completion, collecting every frame it produces.
/// Test helper shared by the per-kind test modules.
#[cfg(test)]
pub(crate) fn collect_frames<G: Generator>(mut generator: G) -> Vec<Frame> {
    let mut frames = Vec::new();
    loop {
        match generator.next_event().expect("generator error") {
            Outcome::Emit(frame, _) => frames.push(frame),
            Outcome::Done(last) => {
                if let Some(frame) = last {
                    frames.push(frame);
                }
                return frames;
            }
        }
        assert!(frames.len() < 10_000, "generator did not terminate");
    }
}
