use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Mutex;

use crate::generators::StreamKind;
use crate::session::SessionEnd;

/// Application metrics for monitoring and observability
/// Simple in-memory metrics exported in Prometheus text format
pub struct Metrics {
    sessions_started: AtomicU64,
    sessions_completed: AtomicU64,
    sessions_cancelled: AtomicU64,
    sessions_failed: AtomicU64,
    active_sessions: AtomicU64,

    // Per-kind event counters (stored as HashMap for labels)
    events_sent: Mutex<HashMap<&'static str, u64>>,
}

impl Metrics {
    /// Create new metrics instance
    pub fn new() -> Self {
        Self {
            sessions_started: AtomicU64::new(0),
            sessions_completed: AtomicU64::new(0),
            sessions_cancelled: AtomicU64::new(0),
            sessions_failed: AtomicU64::new(0),
            active_sessions: AtomicU64::new(0),
            events_sent: Mutex::new(HashMap::new()),
        }
    }

    /// Record a session start
    pub fn session_started(&self, _kind: StreamKind) {
        self.sessions_started.fetch_add(1, Ordering::Relaxed);
        self.active_sessions.fetch_add(1, Ordering::Relaxed);
    }

    /// Record a session exit with its terminal state
    pub fn session_finished(&self, _kind: StreamKind, end: &SessionEnd) {
        match end {
            SessionEnd::Completed => {
                self.sessions_completed.fetch_add(1, Ordering::Relaxed);
            }
            // A vanished client is normal termination, not a failure
            SessionEnd::Cancelled | SessionEnd::Disconnected => {
                self.sessions_cancelled.fetch_add(1, Ordering::Relaxed);
            }
            SessionEnd::Failed => {
                self.sessions_failed.fetch_add(1, Ordering::Relaxed);
            }
        }

        let _ = self
            .active_sessions
            .fetch_update(Ordering::Relaxed, Ordering::Relaxed, |v| {
                Some(v.saturating_sub(1))
            });
    }

    /// Record one event frame sent to a client
    pub fn event_sent(&self, kind: StreamKind) {
        if let Ok(mut events) = self.events_sent.lock() {
            *events.entry(kind.as_str()).or_insert(0) += 1;
        }
    }

    /// Export metrics in Prometheus text format
    pub fn export(&self) -> String {
        let mut output = String::new();

        output.push_str(&format!(
            "# HELP stream_sessions_started_total Total number of stream sessions started\n\
             # TYPE stream_sessions_started_total counter\n\
             stream_sessions_started_total {}\n\n",
            self.sessions_started.load(Ordering::Relaxed)
        ));

        output.push_str(&format!(
            "# HELP stream_sessions_completed_total Total number of sessions that ran to completion\n\
             # TYPE stream_sessions_completed_total counter\n\
             stream_sessions_completed_total {}\n\n",
            self.sessions_completed.load(Ordering::Relaxed)
        ));

        output.push_str(&format!(
            "# HELP stream_sessions_cancelled_total Total number of sessions ended by client disconnect\n\
             # TYPE stream_sessions_cancelled_total counter\n\
             stream_sessions_cancelled_total {}\n\n",
            self.sessions_cancelled.load(Ordering::Relaxed)
        ));

        output.push_str(&format!(
            "# HELP stream_sessions_failed_total Total number of sessions ended by an internal error\n\
             # TYPE stream_sessions_failed_total counter\n\
             stream_sessions_failed_total {}\n\n",
            self.sessions_failed.load(Ordering::Relaxed)
        ));

        output.push_str(&format!(
            "# HELP stream_sessions_active Number of currently connected stream sessions\n\
             # TYPE stream_sessions_active gauge\n\
             stream_sessions_active {}\n\n",
            self.active_sessions.load(Ordering::Relaxed)
        ));

        if let Ok(events) = self.events_sent.lock() {
            output.push_str("# HELP stream_events_sent_total Total number of events sent to clients\n");
            output.push_str("# TYPE stream_events_sent_total counter\n");
            for (kind, value) in events.iter() {
                output.push_str(&format!(
                    "stream_events_sent_total{{kind=\"{}\"}} {}\n",
                    kind, value
                ));
            }
            output.push('\n');
        }

        output
    }
}

impl Default for Metrics {
    fn default() -> Self {
        Self::new()
    }
}
