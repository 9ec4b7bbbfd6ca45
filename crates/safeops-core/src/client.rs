// ── Client facade ──
//
// Full lifecycle management for a SafeOps backend connection: gateway
// construction, initial refresh, realtime reconciliation tasks, and
// teardown. The facade owns the stores and hands them out by
// reference — nothing here is a global.

use std::sync::Arc;

use secrecy::ExposeSecret;
use tokio::sync::{Mutex, watch};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};
use url::Url;

use safeops_api::{AuthClient, RealtimeHandle, ReconnectConfig, RestClient, TransportConfig};

use uuid::Uuid;

use crate::config::ClientConfig;
use crate::error::CoreError;
use crate::model::{
    NewRaw, NewVenue, NewVenueHazard, RawSubmission, RawUpdate, Venue, VenueHazard, VenueUpdate,
};
use crate::service::{IdentityService, NotificationService, RawService, VenueService, relation};
use crate::store::Stores;
use crate::stream::StoreStream;
use crate::sync::spawn_reconciler;

// ── ConnectionState ──────────────────────────────────────────────────

/// Connection state observable by consumers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConnectionState {
    Disconnected,
    Connecting,
    Connected,
    Failed,
}

// ── SafeOpsClient ────────────────────────────────────────────────────

/// The main entry point for consumers.
///
/// Cheaply cloneable via `Arc<ClientInner>`. [`connect`](Self::connect)
/// performs the initial store load and starts the change-feed
/// reconcilers; [`disconnect`](Self::disconnect) cancels them so no
/// in-flight reload can touch a store after teardown.
#[derive(Clone)]
pub struct SafeOpsClient {
    inner: Arc<ClientInner>,
}

struct ClientInner {
    config: ClientConfig,
    stores: Arc<Stores>,
    venues: VenueService,
    raws: RawService,
    notifications: NotificationService,
    identity: IdentityService,
    connection_state: watch::Sender<ConnectionState>,
    cancel: CancellationToken,
    realtime: Mutex<Option<RealtimeHandle>>,
    task_handles: Mutex<Vec<JoinHandle<()>>>,
}

impl SafeOpsClient {
    /// Build the gateway clients and services. Does NOT connect — call
    /// [`connect()`](Self::connect) to load data and start background
    /// tasks.
    pub fn new(config: ClientConfig) -> Result<Self, CoreError> {
        let transport = TransportConfig {
            tls: config.tls.clone(),
            timeout: config.timeout,
        };

        let rest = Arc::new(RestClient::from_api_key(
            config.url.as_str(),
            &config.api_key,
            &transport,
        )?);
        let auth = Arc::new(AuthClient::new(
            config.url.as_str(),
            &config.api_key,
            &transport,
        )?);

        let rpn_table = Arc::new(config.rpn.clone());
        let venues = VenueService::new(Arc::clone(&rest), Arc::clone(&rpn_table));
        let raws = RawService::new(Arc::clone(&rest), rpn_table);
        let notifications = NotificationService::new(Arc::clone(&rest));
        let identity = IdentityService::new(auth, rest);

        let (connection_state, _) = watch::channel(ConnectionState::Disconnected);

        Ok(Self {
            inner: Arc::new(ClientInner {
                config,
                stores: Arc::new(Stores::new()),
                venues,
                raws,
                notifications,
                identity,
                connection_state,
                cancel: CancellationToken::new(),
                realtime: Mutex::new(None),
                task_handles: Mutex::new(Vec::new()),
            }),
        })
    }

    pub fn config(&self) -> &ClientConfig {
        &self.inner.config
    }

    // ── Connection lifecycle ─────────────────────────────────────────

    /// Connect: load the stores, then (if enabled) start the change feed
    /// and one reconciler per watched relation.
    pub async fn connect(&self) -> Result<(), CoreError> {
        let _ = self
            .inner
            .connection_state
            .send(ConnectionState::Connecting);

        if let Err(e) = self.refresh().await {
            let _ = self.inner.connection_state.send(ConnectionState::Failed);
            return Err(e);
        }

        if self.inner.config.realtime_enabled {
            self.start_realtime().await?;
        }

        let _ = self.inner.connection_state.send(ConnectionState::Connected);
        info!("connected to SafeOps backend");
        Ok(())
    }

    /// Disconnect: cancel background tasks and join them. Join failures
    /// are swallowed — teardown is non-fatal by contract.
    pub async fn disconnect(&self) {
        self.inner.cancel.cancel();

        if let Some(realtime) = self.inner.realtime.lock().await.take() {
            realtime.shutdown();
        }

        let mut handles = self.inner.task_handles.lock().await;
        for handle in handles.drain(..) {
            let _ = handle.await;
        }

        let _ = self
            .inner
            .connection_state
            .send(ConnectionState::Disconnected);
        debug!("disconnected");
    }

    /// Reload every reconciled store from the backend.
    ///
    /// The venue and RAW collections load in parallel; either failure
    /// fails the refresh (the stores keep their previous contents).
    pub async fn refresh(&self) -> Result<(), CoreError> {
        let stores = &self.inner.stores;
        stores.venues.set_loading(true);
        stores.raws.set_loading(true);

        let (venues_res, raws_res) =
            tokio::join!(self.inner.venues.get_all(), self.inner.raws.get_all(None));

        stores.venues.set_loading(false);
        stores.raws.set_loading(false);

        stores.venues.replace_all(venues_res?);
        stores.raws.replace_all(raws_res?);

        debug!(
            venues = stores.venues.len(),
            raws = stores.raws.len(),
            "store refresh complete"
        );
        Ok(())
    }

    /// One-shot: connect, run closure, disconnect.
    ///
    /// Optimized for CLI use: realtime is disabled since a single
    /// request-response cycle has nothing to reconcile.
    pub async fn oneshot<F, Fut, T>(config: ClientConfig, f: F) -> Result<T, CoreError>
    where
        F: FnOnce(SafeOpsClient) -> Fut,
        Fut: Future<Output = Result<T, CoreError>>,
    {
        let mut cfg = config;
        cfg.realtime_enabled = false;

        let client = SafeOpsClient::new(cfg)?;
        client.connect().await?;
        let result = f(client.clone()).await;
        client.disconnect().await;
        result
    }

    // ── Realtime wiring ──────────────────────────────────────────────

    async fn start_realtime(&self) -> Result<(), CoreError> {
        let ws_url = realtime_url(&self.inner.config.url)?;
        let api_key = self.inner.config.api_key.expose_secret().to_owned();

        let handle = RealtimeHandle::connect(
            ws_url,
            ReconnectConfig::default(),
            self.inner.cancel.child_token(),
            Some(api_key),
        );

        let mut task_handles = self.inner.task_handles.lock().await;

        {
            let service = self.inner.venues.clone();
            let stores = Arc::clone(&self.inner.stores);
            task_handles.push(spawn_reconciler(
                relation::VENUES,
                handle.subscribe(),
                self.inner.cancel.child_token(),
                move || {
                    let service = service.clone();
                    let stores = Arc::clone(&stores);
                    async move {
                        let venues = service.get_all().await?;
                        stores.venues.replace_all(venues);
                        Ok(())
                    }
                },
            ));
        }

        {
            let service = self.inner.raws.clone();
            let stores = Arc::clone(&self.inner.stores);
            task_handles.push(spawn_reconciler(
                relation::RAW_SUBMISSIONS,
                handle.subscribe(),
                self.inner.cancel.child_token(),
                move || {
                    let service = service.clone();
                    let stores = Arc::clone(&stores);
                    async move {
                        let raws = service.get_all(None).await?;
                        stores.raws.replace_all(raws);
                        Ok(())
                    }
                },
            ));
        }

        *self.inner.realtime.lock().await = Some(handle);
        Ok(())
    }

    // ── Store-backed mutations ───────────────────────────────────────
    //
    // The canonical write path: run the service operation, then push the
    // result into the matching store so subscribed views re-render
    // without waiting for the change feed to loop back.

    /// Create a venue and prepend it to the venue store.
    pub async fn create_venue(&self, new: NewVenue) -> Result<Venue, CoreError> {
        let venue = self.inner.venues.create(new).await?;
        self.inner.stores.venues.upsert(venue.clone());
        Ok(venue)
    }

    /// Update a venue; the store gets the same shallow merge the backend
    /// applied.
    pub async fn update_venue(
        &self,
        id: Uuid,
        update: &VenueUpdate,
    ) -> Result<Venue, CoreError> {
        let venue = self.inner.venues.update(id, update).await?;
        self.inner.stores.venues.patch(id, |v| update.apply_to(v));
        Ok(venue)
    }

    /// Attach a hazard to a venue and prepend it to the hazard store.
    pub async fn add_venue_hazard(&self, new: NewVenueHazard) -> Result<VenueHazard, CoreError> {
        let hazard = self.inner.venues.add_hazard(new).await?;
        self.inner.stores.venue_hazards.upsert(hazard.clone());
        Ok(hazard)
    }

    /// Create a RAW and prepend it to the RAW store.
    pub async fn create_raw(&self, new: NewRaw) -> Result<RawSubmission, CoreError> {
        let raw = self.inner.raws.create(new).await?;
        self.inner.stores.raws.upsert(raw.clone());
        Ok(raw)
    }

    /// Update a RAW; the store gets the same shallow merge the backend
    /// applied.
    pub async fn update_raw(&self, id: Uuid, update: &RawUpdate) -> Result<RawSubmission, CoreError> {
        let raw = self.inner.raws.update(id, update).await?;
        self.inner.stores.raws.patch(id, |r| update.apply_to(r));
        Ok(raw)
    }

    /// Submit a draft RAW; the store takes the post-transition row.
    pub async fn submit_raw(&self, id: Uuid, user_id: Uuid) -> Result<RawSubmission, CoreError> {
        let raw = self.inner.raws.submit(id, user_id).await?;
        self.inner.stores.raws.upsert(raw.clone());
        Ok(raw)
    }

    /// Approve a submitted RAW; the store takes the post-transition row.
    pub async fn approve_raw(
        &self,
        id: Uuid,
        approver_id: Uuid,
    ) -> Result<RawSubmission, CoreError> {
        let raw = self.inner.raws.approve(id, approver_id).await?;
        self.inner.stores.raws.upsert(raw.clone());
        Ok(raw)
    }

    /// Reject a submitted RAW; the store takes the post-transition row.
    pub async fn reject_raw(
        &self,
        id: Uuid,
        approver_id: Uuid,
        comments: impl Into<String>,
    ) -> Result<RawSubmission, CoreError> {
        let raw = self.inner.raws.reject(id, approver_id, comments).await?;
        self.inner.stores.raws.upsert(raw.clone());
        Ok(raw)
    }

    /// Delete a RAW and drop it from the store.
    pub async fn delete_raw(&self, id: Uuid) -> Result<(), CoreError> {
        self.inner.raws.delete(id).await?;
        self.inner.stores.raws.remove(id);
        Ok(())
    }

    // ── State observation ────────────────────────────────────────────

    /// Subscribe to connection state changes.
    pub fn connection_state(&self) -> watch::Receiver<ConnectionState> {
        self.inner.connection_state.subscribe()
    }

    // ── Accessors ────────────────────────────────────────────────────

    pub fn stores(&self) -> &Arc<Stores> {
        &self.inner.stores
    }

    pub fn venues(&self) -> &VenueService {
        &self.inner.venues
    }

    pub fn raws(&self) -> &RawService {
        &self.inner.raws
    }

    pub fn notifications(&self) -> &NotificationService {
        &self.inner.notifications
    }

    pub fn identity(&self) -> &IdentityService {
        &self.inner.identity
    }

    /// Reactive subscription to the venue store.
    pub fn venue_updates(&self) -> StoreStream<Venue> {
        StoreStream::new(self.inner.stores.venues.subscribe())
    }

    /// Reactive subscription to the RAW store.
    pub fn raw_updates(&self) -> StoreStream<RawSubmission> {
        StoreStream::new(self.inner.stores.raws.subscribe())
    }
}

// ── Helpers ──────────────────────────────────────────────────────────

/// Derive the change-feed URL from the backend base URL.
fn realtime_url(base: &Url) -> Result<Url, CoreError> {
    let mut ws = base.clone();
    let scheme = match base.scheme() {
        "https" => "wss",
        "http" => "ws",
        other => {
            return Err(CoreError::Config {
                message: format!("unsupported backend URL scheme: {other}"),
            });
        }
    };
    ws.set_scheme(scheme).map_err(|()| CoreError::Config {
        message: "backend URL cannot carry a websocket scheme".into(),
    })?;
    ws.set_path("/realtime/v1/stream");
    Ok(ws)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn realtime_url_swaps_scheme_and_path() {
        let base = Url::parse("https://acme.safeops.io").unwrap();
        let ws = realtime_url(&base).unwrap();
        assert_eq!(ws.as_str(), "wss://acme.safeops.io/realtime/v1/stream");
    }

    #[test]
    fn realtime_url_rejects_odd_schemes() {
        let base = Url::parse("ftp://acme.safeops.io").unwrap();
        assert!(realtime_url(&base).is_err());
    }
}
