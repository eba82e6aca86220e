// ── Debounced, switch-to-latest search ──
//
// Keystrokes go in through `push`. A term settles once no newer term has
// arrived for the quiescence window; a settled term equal to the previous
// one is dropped. Each query gets a generation number and a cancellation
// token, and only the newest generation's result is ever published.

use std::future::Future;
use std::time::Duration;

use tokio::sync::{broadcast, mpsc};
use tokio::time::{Instant, sleep_until};
use tokio_stream::wrappers::BroadcastStream;
use tokio_stream::{Stream, StreamExt};
use tokio_util::sync::CancellationToken;
use tracing::{debug, trace};

const RESULT_CAPACITY: usize = 16;

/// The result of one settled term.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchResult<T> {
    pub term: String,
    /// Increases by one per issued query.
    pub generation: u64,
    pub value: T,
}

/// Input handle and result fan-out for one debounced search.
///
/// Clones share the same search. The background task stops, and every
/// result stream ends, once all handles are dropped.
#[derive(Debug)]
pub struct SearchDebouncer<T> {
    input: mpsc::UnboundedSender<String>,
    results: broadcast::Sender<SearchResult<T>>,
}

impl<T> Clone for SearchDebouncer<T> {
    fn clone(&self) -> Self {
        Self {
            input: self.input.clone(),
            results: self.results.clone(),
        }
    }
}

impl<T> SearchDebouncer<T>
where
    T: Clone + Send + 'static,
{
    /// Start the debouncer on the current tokio runtime.
    ///
    /// `query` runs once per settled term. It receives a token that is
    /// cancelled when a newer term settles; the query future is also
    /// dropped at that point.
    pub fn spawn<F, Fut>(window: Duration, query: F) -> Self
    where
        F: Fn(String, CancellationToken) -> Fut + Send + 'static,
        Fut: Future<Output = T> + Send + 'static,
    {
        let (input, rx) = mpsc::unbounded_channel();
        let (results, _) = broadcast::channel(RESULT_CAPACITY);
        tokio::spawn(run(window, rx, results.clone(), query));
        Self { input, results }
    }

    /// Feed one term, typically the whole input line after a keystroke.
    pub fn push(&self, term: impl Into<String>) {
        // The task only exits once every handle is gone, so this cannot
        // fail while `self` exists.
        let _ = self.input.send(term.into());
    }

    /// Results settled from now on. Earlier results are not replayed.
    pub fn subscribe(&self) -> impl Stream<Item = SearchResult<T>> + use<T> {
        BroadcastStream::new(self.results.subscribe()).filter_map(Result::ok)
    }
}

async fn run<T, F, Fut>(
    window: Duration,
    mut input: mpsc::UnboundedReceiver<String>,
    results: broadcast::Sender<SearchResult<T>>,
    query: F,
) where
    T: Clone + Send + 'static,
    F: Fn(String, CancellationToken) -> Fut + Send + 'static,
    Fut: Future<Output = T> + Send + 'static,
{
    let (done_tx, mut done_rx) = mpsc::unbounded_channel::<SearchResult<T>>();

    let mut pending: Option<String> = None;
    let mut deadline = Instant::now();
    let mut last_settled: Option<String> = None;
    let mut generation: u64 = 0;
    let mut in_flight: Option<CancellationToken> = None;

    loop {
        tokio::select! {
            term = input.recv() => {
                let Some(term) = term else { break };
                trace!(%term, "term received");
                pending = Some(term);
                deadline = Instant::now() + window;
            }

            () = sleep_until(deadline), if pending.is_some() => {
                let Some(term) = pending.take() else { continue };
                if last_settled.as_deref() == Some(term.as_str()) {
                    trace!(%term, "settled term unchanged");
                    continue;
                }
                last_settled = Some(term.clone());
                generation += 1;

                if let Some(previous) = in_flight.take() {
                    debug!(generation, "superseding in-flight query");
                    previous.cancel();
                }
                let token = CancellationToken::new();
                in_flight = Some(token.clone());

                debug!(%term, generation, "query issued");
                let fut = query(term.clone(), token.clone());
                let done_tx = done_tx.clone();
                tokio::spawn(async move {
                    tokio::select! {
                        () = token.cancelled() => {}
                        value = fut => {
                            let _ = done_tx.send(SearchResult { term, generation, value });
                        }
                    }
                });
            }

            Some(result) = done_rx.recv() => {
                if result.generation == generation {
                    in_flight = None;
                    let _ = results.send(result);
                } else {
                    trace!(stale = result.generation, current = generation, "stale result dropped");
                }
            }
        }
    }

    if let Some(token) = in_flight {
        token.cancel();
    }
    debug!("search input closed");
}
