// ── Realtime reconciliation ──
//
// Keeps a store eventually consistent with backend-side changes made by
// other clients. One task per watched relation: on any change event for
// that relation — insert, update, or delete alike — the event payload
// is ignored and the service's full `get_all` path repopulates the
// store. Full reload trades bandwidth for unconditional convergence
// with the backend state.

use std::future::Future;
use std::sync::Arc;

use tokio::sync::broadcast;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use safeops_api::ChangeEvent;

use crate::error::CoreError;

/// Spawn a reconciliation task for one relation.
///
/// `reload` is the full-reload path (service `get_all` + store
/// `replace_all`). Reload failures are logged and the task keeps
/// listening; the task exits when `cancel` fires or the feed closes.
pub(crate) fn spawn_reconciler<F, Fut>(
    relation: &'static str,
    mut events: broadcast::Receiver<Arc<ChangeEvent>>,
    cancel: CancellationToken,
    reload: F,
) -> JoinHandle<()>
where
    F: Fn() -> Fut + Send + 'static,
    Fut: Future<Output = Result<(), CoreError>> + Send,
{
    tokio::spawn(async move {
        loop {
            tokio::select! {
                biased;
                _ = cancel.cancelled() => break,
                event = events.recv() => {
                    match event {
                        Ok(event) => {
                            if event.relation != relation {
                                continue;
                            }
                            debug!(relation, op = ?event.op, "change event, reloading");
                        }
                        Err(broadcast::error::RecvError::Lagged(skipped)) => {
                            // Dropped events are fine: the reload below
                            // converges regardless of what they carried.
                            warn!(relation, skipped, "change feed lagged, reloading");
                        }
                        Err(broadcast::error::RecvError::Closed) => break,
                    }

                    if let Err(e) = reload().await {
                        warn!(relation, error = %e, "reconciliation reload failed");
                    }
                }
            }
        }

        debug!(relation, "reconciler exiting");
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use safeops_api::ChangeOp;
    use std::time::Duration;
    use tokio::sync::mpsc;

    fn event(relation: &str) -> Arc<ChangeEvent> {
        Arc::new(ChangeEvent {
            relation: relation.to_owned(),
            op: ChangeOp::Update,
            record: None,
            old_record: None,
            commit_timestamp: None,
        })
    }

    #[tokio::test]
    async fn change_event_triggers_reload() {
        let (tx, rx) = broadcast::channel(16);
        let (reloaded_tx, mut reloaded_rx) = mpsc::unbounded_channel();
        let cancel = CancellationToken::new();

        let handle = spawn_reconciler("venues", rx, cancel.clone(), move || {
            let reloaded_tx = reloaded_tx.clone();
            async move {
                reloaded_tx.send(()).unwrap();
                Ok(())
            }
        });

        tx.send(event("venues")).unwrap();

        tokio::time::timeout(Duration::from_secs(1), reloaded_rx.recv())
            .await
            .expect("reload should be triggered")
            .unwrap();

        cancel.cancel();
        handle.await.unwrap();
    }

    #[tokio::test]
    async fn events_for_other_relations_are_ignored() {
        let (tx, rx) = broadcast::channel(16);
        let (reloaded_tx, mut reloaded_rx) = mpsc::unbounded_channel();
        let cancel = CancellationToken::new();

        let handle = spawn_reconciler("venues", rx, cancel.clone(), move || {
            let reloaded_tx = reloaded_tx.clone();
            async move {
                reloaded_tx.send(()).unwrap();
                Ok(())
            }
        });

        tx.send(event("raw_submissions")).unwrap();
        tx.send(event("notifications")).unwrap();

        // Give the task a chance to (incorrectly) react
        tokio::time::sleep(Duration::from_millis(50)).await;
        assert!(reloaded_rx.try_recv().is_err());

        cancel.cancel();
        handle.await.unwrap();
    }

    #[tokio::test]
    async fn reload_failure_keeps_the_task_alive() {
        let (tx, rx) = broadcast::channel(16);
        let (reloaded_tx, mut reloaded_rx) = mpsc::unbounded_channel();
        let cancel = CancellationToken::new();

        let handle = spawn_reconciler("venues", rx, cancel.clone(), move || {
            let reloaded_tx = reloaded_tx.clone();
            async move {
                reloaded_tx.send(()).unwrap();
                Err(CoreError::Internal("reload blew up".into()))
            }
        });

        tx.send(event("venues")).unwrap();
        tokio::time::timeout(Duration::from_secs(1), reloaded_rx.recv())
            .await
            .expect("first reload attempted")
            .unwrap();

        // A second event still reaches the (still alive) task
        tx.send(event("venues")).unwrap();
        tokio::time::timeout(Duration::from_secs(1), reloaded_rx.recv())
            .await
            .expect("task survived the failed reload")
            .unwrap();

        cancel.cancel();
        handle.await.unwrap();
    }

    #[tokio::test]
    async fn cancellation_stops_the_task() {
        let (_tx, rx) = broadcast::channel::<Arc<ChangeEvent>>(16);
        let cancel = CancellationToken::new();

        let handle = spawn_reconciler("venues", rx, cancel.clone(), || async { Ok(()) });

        cancel.cancel();
        tokio::time::timeout(Duration::from_secs(1), handle)
            .await
            .expect("task should exit promptly")
            .unwrap();
    }
}
