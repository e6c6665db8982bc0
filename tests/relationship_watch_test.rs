//! End-to-end flow: reconcilers keep watches in sync with declared
//! relationships while the controller turns secret changes into reconcile
//! requests.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use futures::StreamExt;
use parking_lot::Mutex;
use tokio::sync::mpsc;
use tokio::time::timeout;
use tokio_stream::wrappers::UnboundedReceiverStream;
use tokio_util::sync::CancellationToken;
use trust_watch::ChangeEvent;
use trust_watch::ChangeSource;
use trust_watch::ChangeStream;
use trust_watch::ClusterObject;
use trust_watch::Controller;
use trust_watch::Error;
use trust_watch::ObjectIdentity;
use trust_watch::ObservedObject;
use trust_watch::ReconcileRequest;
use trust_watch::Result;
use trust_watch::Settings;
use trust_watch::WatchLifecycle;
use trust_watch::WatchRegistry;

/// Change source fed by test channels
struct ChannelSource {
    secrets: Mutex<Option<mpsc::UnboundedReceiver<ChangeEvent<ObservedObject>>>>,
    clusters: Mutex<Option<mpsc::UnboundedReceiver<ChangeEvent<ClusterObject>>>>,
}

#[async_trait]
impl ChangeSource for ChannelSource {
    async fn subscribe_secrets(&self) -> Result<ChangeStream<ObservedObject>> {
        let rx = self
            .secrets
            .lock()
            .take()
            .ok_or_else(|| Error::Fatal("secrets already subscribed".into()))?;
        Ok(UnboundedReceiverStream::new(rx).boxed())
    }

    async fn subscribe_clusters(&self) -> Result<ChangeStream<ClusterObject>> {
        let rx = self
            .clusters
            .lock()
            .take()
            .ok_or_else(|| Error::Fatal("clusters already subscribed".into()))?;
        Ok(UnboundedReceiverStream::new(rx).boxed())
    }
}

fn id(
    namespace: &str,
    name: &str,
) -> ObjectIdentity {
    ObjectIdentity::new(namespace, name)
}

async fn next_request(rx: &mut mpsc::UnboundedReceiver<ReconcileRequest>) -> ReconcileRequest {
    timeout(Duration::from_secs(1), rx.recv())
        .await
        .expect("Timeout waiting for request")
        .expect("Queue closed")
}

#[tokio::test]
async fn relationship_changes_drive_secret_routing() {
    let settings = Settings::default();
    let registry = Arc::new(WatchRegistry::new());
    let lifecycle = WatchLifecycle::new(Arc::clone(&registry), settings.watch.clone());

    let (secret_tx, secret_rx) = mpsc::unbounded_channel();
    let (cluster_tx, cluster_rx) = mpsc::unbounded_channel();
    let source = ChannelSource {
        secrets: Mutex::new(Some(secret_rx)),
        clusters: Mutex::new(Some(cluster_rx)),
    };
    let (queue_tx, mut queue_rx) = mpsc::unbounded_channel();
    let controller = Controller::from_settings(&settings, Arc::clone(&registry), source, queue_tx);

    let shutdown = CancellationToken::new();
    let handle = {
        let shutdown = shutdown.clone();
        tokio::spawn(async move { controller.run(shutdown).await })
    };

    let ctx = CancellationToken::new();
    let local = id("ns1", "local");
    let remote = id("ns2", "remote");
    let remote_ca = ObservedObject::new(settings.watch.public_certs_secret(&remote));

    // local declares remote: its CA secret now reaches local
    lifecycle.sync_watches(&ctx, &local, [remote.clone()]).unwrap();
    secret_tx.send(ChangeEvent::Applied(remote_ca.clone())).unwrap();
    assert_eq!(next_request(&mut queue_rx).await, ReconcileRequest::new(local.clone()));

    // declaration dropped: the same change reaches nobody
    let summary = lifecycle
        .sync_watches(&ctx, &local, Vec::<ObjectIdentity>::new())
        .unwrap();
    assert_eq!(summary.removed.len(), 1);
    secret_tx.send(ChangeEvent::Applied(remote_ca)).unwrap();

    // label-routed secret still flows, and is the next thing on the queue
    let copied_ca = ObservedObject::new(id("ns1", "local-remote-ca"))
        .with_label("type", "remote-ca")
        .with_label("relationship-name", "local")
        .with_label("relationship-namespace", "ns1");
    secret_tx.send(ChangeEvent::Applied(copied_ca)).unwrap();
    assert_eq!(next_request(&mut queue_rx).await, ReconcileRequest::new(local.clone()));
    assert!(queue_rx.try_recv().is_err());

    shutdown.cancel();
    assert!(handle.await.unwrap().is_ok());
    drop(cluster_tx);
    assert!(registry.is_empty());
}

#[tokio::test]
async fn second_subscription_attempt_is_rejected() {
    let (_secret_tx, secret_rx) = mpsc::unbounded_channel();
    let (_cluster_tx, cluster_rx) = mpsc::unbounded_channel();
    let source = ChannelSource {
        secrets: Mutex::new(Some(secret_rx)),
        clusters: Mutex::new(Some(cluster_rx)),
    };

    assert!(source.subscribe_secrets().await.is_ok());
    assert!(source.subscribe_secrets().await.is_err());
}
