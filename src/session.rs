//! Connection session: drives one generator to completion for one client
//!
//! The session owns the only suspension point (the inter-event delay) and
//! checks the cancellation signal both before the wait and by racing the
//! wait itself, so a vanished client stops production within one pacing
//! interval and no further writes happen afterwards.

use std::sync::Arc;

use bytes::Bytes;
use tokio::sync::mpsc;
use tokio::time::sleep;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info};
use uuid::Uuid;

use crate::codec::{encode_comment, Frame};
use crate::error::{StreamError, StreamResult};
use crate::generators::{Generator, Outcome};
use crate::metrics::Metrics;

/// Terminal state of a session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionEnd {
    /// Generator exhausted normally
    Completed,
    /// Cancellation signal fired (client went away mid-wait)
    Cancelled,
    /// A write failed because the sink closed (client went away mid-write)
    Disconnected,
    /// Fatal generator or encoding error
    Failed,
}

pub struct Session<G> {
    id: Uuid,
    generator: G,
    sink: mpsc::Sender<Bytes>,
    cancel: CancellationToken,
    metrics: Arc<Metrics>,
    events_sent: u64,
}

impl<G: Generator> Session<G> {
    pub fn new(
        generator: G,
        sink: mpsc::Sender<Bytes>,
        cancel: CancellationToken,
        metrics: Arc<Metrics>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            generator,
            sink,
            cancel,
            metrics,
            events_sent: 0,
        }
    }

    /// Drive the generator until completion, cancellation or error
    pub async fn run(mut self) -> SessionEnd {
        let kind = self.generator.kind();
        info!("Session {} started for {} stream", self.id, kind);
        self.metrics.session_started(kind);

        let end = self.drive().await;

        match end {
            SessionEnd::Completed => {
                info!(
                    "Session {} completed after {} events",
                    self.id, self.events_sent
                );
            }
            SessionEnd::Cancelled | SessionEnd::Disconnected => {
                info!(
                    "Session {} ended by client disconnect after {} events",
                    self.id, self.events_sent
                );
            }
            SessionEnd::Failed => {
                error!("Session {} aborted by a fatal error", self.id);
            }
        }

        self.metrics.session_finished(kind, &end);
        end
    }

    async fn drive(&mut self) -> SessionEnd {
        // Comment line opening the stream; clients ignore it
        if self.write_raw(encode_comment("stream open")).await.is_err() {
            return SessionEnd::Disconnected;
        }

        loop {
            if self.cancel.is_cancelled() {
                return SessionEnd::Cancelled;
            }

            match self.generator.next_event() {
                Ok(Outcome::Emit(frame, delay)) => {
                    if self.write_frame(&frame).await.is_err() {
                        return SessionEnd::Disconnected;
                    }
                    if !delay.is_zero() {
                        tokio::select! {
                            _ = self.cancel.cancelled() => return SessionEnd::Cancelled,
                            _ = sleep(delay) => {}
                        }
                    }
                }
                Ok(Outcome::Done(last)) => {
                    if let Some(frame) = last {
                        if self.write_frame(&frame).await.is_err() {
                            return SessionEnd::Disconnected;
                        }
                    }
                    return SessionEnd::Completed;
                }
                Err(e) => {
                    error!("Session {} generator error: {}", self.id, e);
                    return SessionEnd::Failed;
                }
            }
        }
    }

    async fn write_frame(&mut self, frame: &Frame) -> StreamResult<()> {
        self.write_raw(frame.encode()).await?;
        self.events_sent += 1;
        self.metrics.event_sent(self.generator.kind());
        Ok(())
    }

    async fn write_raw(&mut self, encoded: String) -> StreamResult<()> {
        self.sink
            .send(Bytes::from(encoded))
            .await
            .map_err(|_| {
                debug!("Session {} sink closed", self.id);
                StreamError::SinkClosed
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::TickerConfig;
    use crate::generators::Ticker;

    fn ticker(count: u32, interval_ms: u64) -> Ticker {
        Ticker::new(&TickerConfig { count, interval_ms })
    }

    /// Collect every chunk until the session drops its sender, skipping
    /// comment lines
    async fn collect_event_frames(mut rx: mpsc::Receiver<Bytes>) -> Vec<Frame> {
        let mut frames = Vec::new();
        while let Some(bytes) = rx.recv().await {
            let text = String::from_utf8(bytes.to_vec()).unwrap();
            if let Some(frame) = Frame::decode(&text) {
                frames.push(frame);
            }
        }
        frames
    }

    #[tokio::test(start_paused = true)]
    async fn test_session_runs_generator_to_completion() {
        let (tx, rx) = mpsc::channel(16);
        let metrics = Arc::new(Metrics::new());
        let session = Session::new(ticker(3, 1000), tx, CancellationToken::new(), metrics.clone());

        let handle = tokio::spawn(session.run());
        let frames = collect_event_frames(rx).await;
        assert_eq!(handle.await.unwrap(), SessionEnd::Completed);

        assert_eq!(frames.len(), 4);
        assert_eq!(frames.last().unwrap().event_type.as_deref(), Some("done"));
        assert!(metrics.export().contains("stream_sessions_completed_total 1"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancellation_stops_writes_within_one_interval() {
        let (tx, mut rx) = mpsc::channel(16);
        let metrics = Arc::new(Metrics::new());
        let cancel = CancellationToken::new();
        let session = Session::new(ticker(1000, 1000), tx, cancel.clone(), metrics.clone());

        let handle = tokio::spawn(session.run());

        // Opening comment, then the first update; the session is now parked
        // in its pacing wait
        let open = rx.recv().await.unwrap();
        assert!(open.starts_with(b": "));
        let first = rx.recv().await.unwrap();
        assert!(String::from_utf8(first.to_vec())
            .unwrap()
            .contains("event: update"));

        cancel.cancel();
        assert_eq!(handle.await.unwrap(), SessionEnd::Cancelled);

        // The sender is gone and nothing further was written
        assert!(rx.recv().await.is_none());
        assert!(metrics.export().contains("stream_sessions_cancelled_total 1"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_closed_sink_terminates_session() {
        let (tx, rx) = mpsc::channel(16);
        let metrics = Arc::new(Metrics::new());
        let session = Session::new(ticker(1000, 10), tx, CancellationToken::new(), metrics.clone());

        drop(rx);
        assert_eq!(session.run().await, SessionEnd::Disconnected);
        assert!(metrics.export().contains("stream_sessions_cancelled_total 1"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_zero_delay_stream_finishes_immediately() {
        let (tx, rx) = mpsc::channel(16);
        let session = Session::new(
            ticker(2, 0),
            tx,
            CancellationToken::new(),
            Arc::new(Metrics::new()),
        );

        let handle = tokio::spawn(session.run());
        let frames = collect_event_frames(rx).await;
        assert_eq!(handle.await.unwrap(), SessionEnd::Completed);
        assert_eq!(frames.len(), 3);
    }
}
