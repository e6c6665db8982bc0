//! Wiring between the host control-plane client and the watch layer
//!
//! The host provides change subscriptions and a reconcile queue. The
//! controller turns every secret or cluster notification into reconcile
//! requests and hands them to the queue; it never reconciles anything
//! itself.


use std::sync::Arc;

use async_trait::async_trait;
use futures::stream::BoxStream;
use futures::StreamExt;
#[cfg(test)]
use mockall::automock;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::debug;
use tracing::error;
use tracing::info;
use tracing::trace;
use tracing::warn;

use crate::cluster_requests;
use crate::ChangeEvent;
use crate::ClusterObject;
use crate::EventTranslator;
use crate::ObservedObject;
use crate::ReconcileRequest;
use crate::Result;
use crate::Settings;
use crate::SubscriptionError;
use crate::WatchRegistry;

pub const SECRET_KIND: &str = "Secret";
pub const CLUSTER_KIND: &str = "Cluster";

/// Stream of change notifications for one object kind.
pub type ChangeStream<T> = BoxStream<'static, ChangeEvent<T>>;

/// Change subscriptions offered by the host client.
///
/// Implementations report setup failures as
/// [`SubscriptionError::Unavailable`].
#[cfg_attr(test, automock)]
#[async_trait]
pub trait ChangeSource: Send + Sync + 'static {
    async fn subscribe_secrets(&self) -> Result<ChangeStream<ObservedObject>>;

    async fn subscribe_clusters(&self) -> Result<ChangeStream<ClusterObject>>;
}

/// Reconcile queue offered by the host scheduler.
#[cfg_attr(test, automock)]
pub trait ReconcileQueue: Send + Sync + 'static {
    fn enqueue(
        &self,
        request: ReconcileRequest,
    );
}

impl ReconcileQueue for mpsc::UnboundedSender<ReconcileRequest> {
    fn enqueue(
        &self,
        request: ReconcileRequest,
    ) {
        if let Err(e) = self.send(request) {
            warn!(request = %e.0, "Reconcile queue closed, request dropped");
        }
    }
}

pub struct Controller<S, Q> {
    source: S,
    queue: Q,
    translator: EventTranslator,
}

impl<S, Q> Controller<S, Q>
where
    S: ChangeSource,
    Q: ReconcileQueue,
{
    pub fn new(
        source: S,
        queue: Q,
        translator: EventTranslator,
    ) -> Self {
        Self {
            source,
            queue,
            translator,
        }
    }

    /// Controller routing with `settings`, sharing `registry` with the
    /// reconcilers that manage watch lifecycles.
    pub fn from_settings(
        settings: &Settings,
        registry: Arc<WatchRegistry>,
        source: S,
        queue: Q,
    ) -> Self {
        Self::new(source, queue, EventTranslator::from_config(&settings.routing, registry))
    }

    pub fn translator(&self) -> &EventTranslator {
        &self.translator
    }

    /// Subscribe and dispatch notifications until `shutdown` is cancelled.
    ///
    /// # Errors
    /// - [`SubscriptionError::Unavailable`] when a subscription cannot be
    ///   established
    /// - [`SubscriptionError::StreamClosed`] when a change stream ends
    ///
    /// Both are retryable by the host scheduler.
    pub async fn run(
        &self,
        shutdown: CancellationToken,
    ) -> Result<()> {
        let mut secrets = self.source.subscribe_secrets().await.map_err(|e| {
            error!(kind = SECRET_KIND, "subscribe failed: {:?}", e);
            e
        })?;
        let mut clusters = self.source.subscribe_clusters().await.map_err(|e| {
            error!(kind = CLUSTER_KIND, "subscribe failed: {:?}", e);
            e
        })?;

        info!("Watch controller started");

        loop {
            tokio::select! {
                biased;
                // P0: shutdown
                _ = shutdown.cancelled() => {
                    info!("Watch controller received shutdown signal");
                    return Ok(());
                }
                // P1: trust material changes
                event = secrets.next() => match event {
                    Some(event) => {
                        self.on_secret_event(&event);
                    }
                    None => {
                        warn!(kind = SECRET_KIND, "change stream closed");
                        return Err(SubscriptionError::StreamClosed { kind: SECRET_KIND }.into());
                    }
                },
                // P2: cluster declarations
                event = clusters.next() => match event {
                    Some(event) => {
                        self.on_cluster_event(&event);
                    }
                    None => {
                        warn!(kind = CLUSTER_KIND, "change stream closed");
                        return Err(SubscriptionError::StreamClosed { kind: CLUSTER_KIND }.into());
                    }
                },
            }
        }
    }

    /// Translate and enqueue one secret notification. Returns the number of
    /// requests enqueued.
    pub fn on_secret_event(
        &self,
        event: &ChangeEvent<ObservedObject>,
    ) -> usize {
        let requests = self.translator.translate_event(event);
        if requests.is_empty() {
            trace!(kind = SECRET_KIND, event = event.kind(), "No owner interested");
        }
        self.dispatch(SECRET_KIND, requests)
    }

    /// Enqueue the cluster itself and every remote it declares.
    pub fn on_cluster_event(
        &self,
        event: &ChangeEvent<ClusterObject>,
    ) -> usize {
        self.dispatch(CLUSTER_KIND, cluster_requests(event))
    }

    fn dispatch(
        &self,
        kind: &'static str,
        requests: Vec<ReconcileRequest>,
    ) -> usize {
        let count = requests.len();
        for request in requests {
            debug!(kind, request = %request, "Enqueue reconcile request");
            self.queue.enqueue(request);
        }
        count
    }
}
