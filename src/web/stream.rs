//! SSE response plumbing: one session task per connection
//!
//! The response body is fed from a bounded channel written by the session
//! task. Dropping the body — axum's signal that the client disconnected —
//! releases a guard that cancels the session's pacing wait, so production
//! stops promptly instead of on the next failed write.

use std::convert::Infallible;
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};

use axum::body::Body;
use axum::response::{IntoResponse, Response};
use bytes::Bytes;
use futures::Stream;
use tokio::sync::mpsc;
use tokio_stream::wrappers::ReceiverStream;
use tokio_util::sync::{CancellationToken, DropGuard};

use crate::generators::Generator;
use crate::metrics::Metrics;
use crate::session::Session;

/// Channel capacity between a session and its response body; the session
/// only ever has one event in flight, so a small buffer suffices
const SINK_CAPACITY: usize = 16;

/// Build a long-lived event stream response backed by a spawned session
pub fn stream_response<G>(generator: G, metrics: Arc<Metrics>) -> Response
where
    G: Generator + 'static,
{
    let (tx, rx) = mpsc::channel::<Bytes>(SINK_CAPACITY);
    let cancel = CancellationToken::new();

    let session = Session::new(generator, tx, cancel.clone(), metrics);
    tokio::spawn(session.run());

    let frames = FrameStream {
        inner: ReceiverStream::new(rx),
        _guard: cancel.drop_guard(),
    };

    (
        [
            ("content-type", "text/event-stream"),
            ("cache-control", "no-cache"),
            // Disable nginx buffering
            ("x-accel-buffering", "no"),
        ],
        Body::from_stream(frames),
    )
        .into_response()
}

/// Response body stream that cancels its session when dropped
struct FrameStream {
    inner: ReceiverStream<Bytes>,
    _guard: DropGuard,
}

impl Stream for FrameStream {
    type Item = Result<Bytes, Infallible>;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        let this = self.get_mut();
        match Pin::new(&mut this.inner).poll_next(cx) {
            Poll::Ready(Some(bytes)) => Poll::Ready(Some(Ok(bytes))),
            Poll::Ready(None) => Poll::Ready(None),
            Poll::Pending => Poll::Pending,
        }
    }
}
