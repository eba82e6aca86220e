// ── Failure notices ──
//
// The single reporting policy for best-effort operations. Every failure
// is logged once and broadcast once; front-ends subscribe and decide
// how to show it.

use std::fmt;

use chrono::{DateTime, Utc};
use tokio::sync::broadcast;
use tokio_stream::wrappers::BroadcastStream;
use tokio_stream::{Stream, StreamExt};
use tracing::warn;

use crate::outcome::{Failure, Outcome};

const NOTICE_CAPACITY: usize = 64;

/// One failed best-effort operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    /// Dotted operation name, e.g. `sensors.list`.
    pub operation: &'static str,
    pub failure: Failure,
    pub at: DateTime<Utc>,
}

impl fmt::Display for Notice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} failed: {}", self.operation, self.failure)
    }
}

/// Fan-out of [`Notice`]s to any number of subscribers.
///
/// Cloning shares the channel. Notices sent while nobody is subscribed
/// are dropped after being logged.
#[derive(Debug, Clone)]
pub struct NoticeSink {
    tx: broadcast::Sender<Notice>,
}

impl Default for NoticeSink {
    fn default() -> Self {
        Self::new()
    }
}

impl NoticeSink {
    pub fn new() -> Self {
        let (tx, _) = broadcast::channel(NOTICE_CAPACITY);
        Self { tx }
    }

    /// Log and broadcast a failure, returning it as an `Outcome`.
    pub fn best_effort<T>(&self, operation: &'static str, failure: Failure) -> Outcome<T> {
        self.report(operation, failure.clone());
        Outcome::Failed(failure)
    }

    /// Log and broadcast a failure.
    pub fn report(&self, operation: &'static str, failure: Failure) {
        warn!(operation, kind = failure.kind(), error = %failure, "operation failed");
        // No receivers is not an error here.
        let _ = self.tx.send(Notice {
            operation,
            failure,
            at: Utc::now(),
        });
    }

    pub fn subscribe(&self) -> broadcast::Receiver<Notice> {
        self.tx.subscribe()
    }

    /// Notices as a stream. Lagged receivers skip what they missed.
    pub fn stream(&self) -> impl Stream<Item = Notice> + use<> {
        BroadcastStream::new(self.tx.subscribe()).filter_map(Result::ok)
    }
}
