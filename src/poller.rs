// Periodic fetch of one endpoint. The poll task only talks to the API; results go out
// over a channel to whoever renders them, so transport and rendering stay decoupled.

use std::sync::Arc;
use std::time::Duration;

use serde::Deserialize;
use serde::de::DeserializeOwned;
use tokio::sync::{mpsc, oneshot};
use tokio::task::{JoinHandle, JoinSet};
use tokio::time::{MissedTickBehavior, interval};
use tracing::Instrument;

use crate::error::ApiError;
use crate::transport::{Endpoint, Transport, fetch};

/// Shortest period a poller runs at; a zero interval is raised to this.
pub const MIN_INTERVAL: Duration = Duration::from_millis(1);

/// What to do when a tick comes due while the previous request is still running.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OverlapPolicy {
    /// Drop the tick; at most one request in flight.
    #[default]
    Serialize,
    /// Issue the request anyway; stale responses are discarded by sequence number.
    Allow,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollerConfig {
    pub interval: Duration,
    pub overlap: OverlapPolicy,
    /// Capacity of the event channel to the renderer.
    pub channel_capacity: usize,
}

impl PollerConfig {
    pub fn every(interval: Duration) -> Self {
        Self {
            interval,
            overlap: OverlapPolicy::default(),
            channel_capacity: 16,
        }
    }
}

/// Outcome of one poll tick. `seq` increases with each issued request.
#[derive(Debug)]
pub struct PollEvent<S> {
    pub seq: u64,
    pub result: Result<S, ApiError>,
}

/// Keeps only results newer than the last one accepted.
#[derive(Debug, Default)]
pub struct LatestWins {
    last: Option<u64>,
}

impl LatestWins {
    pub fn accept(&mut self, seq: u64) -> bool {
        if self.last.is_some_and(|last| seq <= last) {
            return false;
        }
        self.last = Some(seq);
        true
    }
}

/// Running poller. `stop()` ends it deterministically; dropping it aborts the tasks.
pub struct PollerHandle {
    endpoint: Endpoint,
    shutdown_tx: Option<oneshot::Sender<()>>,
    poll_task: Option<JoinHandle<()>>,
    consumer_task: Option<JoinHandle<()>>,
}

impl PollerHandle {
    pub fn endpoint(&self) -> &Endpoint {
        &self.endpoint
    }

    pub fn is_finished(&self) -> bool {
        self.poll_task.as_ref().is_none_or(JoinHandle::is_finished)
    }

    /// Signals shutdown, waits for the poll task to exit (cancelling any in-flight
    /// request), then stops the consumer. No callback runs after this returns.
    pub async fn stop(mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }
        if let Some(task) = self.poll_task.take() {
            let _ = task.await;
        }
        if let Some(task) = self.consumer_task.take() {
            task.abort();
            let _ = task.await;
        }
        tracing::debug!(endpoint = %self.endpoint, "poller stopped");
    }
}

impl Drop for PollerHandle {
    fn drop(&mut self) {
        if let Some(task) = self.poll_task.take() {
            task.abort();
        }
        if let Some(task) = self.consumer_task.take() {
            task.abort();
        }
    }
}

/// Starts polling `endpoint`: one request immediately, then one per `config.interval`.
/// Missed ticks are skipped so the schedule stays on multiples of the interval.
/// The task ends on `stop()` or when the returned receiver is dropped.
pub fn spawn<S>(
    transport: Arc<dyn Transport>,
    endpoint: Endpoint,
    config: PollerConfig,
) -> (PollerHandle, mpsc::Receiver<PollEvent<S>>)
where
    S: DeserializeOwned + Send + 'static,
{
    let (tx, rx) = mpsc::channel(config.channel_capacity.max(1));
    if config.interval < MIN_INTERVAL {
        tracing::warn!(%endpoint, "poll interval below 1 ms; using 1 ms");
    }
    let (shutdown_tx, mut shutdown_rx) = oneshot::channel::<()>();
    let task_endpoint = endpoint.clone();
    let poller_span = tracing::span!(
        tracing::Level::DEBUG,
        "poller",
        endpoint = %endpoint,
        interval_ms = config.interval.as_millis() as u64
    );

    let run = async move {
        let endpoint = task_endpoint;
        let mut tick = interval(config.interval.max(MIN_INTERVAL));
        tick.set_missed_tick_behavior(MissedTickBehavior::Skip);
        let mut in_flight: JoinSet<()> = JoinSet::new();
        let mut seq: u64 = 0;

        loop {
            tokio::select! {
                biased;
                _ = &mut shutdown_rx => {
                    tracing::debug!("Poller shutting down");
                    break;
                }
                Some(_) = in_flight.join_next(), if !in_flight.is_empty() => {}
                _ = tick.tick() => {
                    if tx.is_closed() {
                        tracing::debug!("Renderer gone; poller exiting");
                        break;
                    }
                    if config.overlap == OverlapPolicy::Serialize && !in_flight.is_empty() {
                        tracing::debug!(operation = "poll", "previous request still in flight; tick dropped");
                        continue;
                    }
                    seq += 1;
                    let transport = transport.clone();
                    let endpoint = endpoint.clone();
                    let tx = tx.clone();
                    let this_seq = seq;
                    in_flight.spawn(async move {
                        let result = fetch::<S>(transport.as_ref(), &endpoint).await;
                        let _ = tx.send(PollEvent { seq: this_seq, result }).await;
                    });
                }
            }
        }
        in_flight.shutdown().await;
    };
    let poll_task = tokio::spawn(run.instrument(poller_span));

    let handle = PollerHandle {
        endpoint,
        shutdown_tx: Some(shutdown_tx),
        poll_task: Some(poll_task),
        consumer_task: None,
    };
    (handle, rx)
}

/// Callback form: `on_snapshot` runs for each successful, non-stale snapshot.
/// Failed ticks are logged and skipped, so the last good render stays in place.
pub fn start_polling<S, F>(
    transport: Arc<dyn Transport>,
    endpoint: Endpoint,
    config: PollerConfig,
    mut on_snapshot: F,
) -> PollerHandle
where
    S: DeserializeOwned + Send + 'static,
    F: FnMut(S) + Send + 'static,
{
    let (mut handle, mut rx) = spawn::<S>(transport, endpoint.clone(), config);
    let consumer = tokio::spawn(async move {
        let mut latest = LatestWins::default();
        while let Some(event) = rx.recv().await {
            match event.result {
                Ok(snapshot) => {
                    if latest.accept(event.seq) {
                        on_snapshot(snapshot);
                    } else {
                        tracing::debug!(%endpoint, seq = event.seq, "stale response discarded");
                    }
                }
                Err(e) => {
                    tracing::warn!(
                        error = %e,
                        %endpoint,
                        operation = "poll",
                        "fetch failed; keeping last render"
                    );
                }
            }
        }
    });
    handle.consumer_task = Some(consumer);
    handle
}
