//! The key reconciliation pipeline.
//!
//! One tick collects the signing keys of all configured IdPs, then fans
//! out across every CouchDB server and every cluster node, writing only
//! keys that are new or changed. A node that received writes is asked to
//! restart, staggered through a shared counter so a cluster never reboots
//! all at once.
//!
//! Fan-outs at every level use wait-for-all semantics: sibling branches
//! always run to completion and failures are aggregated afterwards.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use futures::future::join_all;
use tokio::time::{Instant, MissedTickBehavior};
use tracing::{debug, error, info, warn};

use crate::config::Settings;
use crate::couchdb::CouchClient;
use crate::error::{Result, SyncError};
use crate::jwks::{self, KeySet};
use crate::status::StatusStore;

/// Delay before the first tick after startup.
const STARTUP_DELAY: Duration = Duration::from_secs(10);

/// Spacing between two staggered restart requests.
const RESTART_SPACING: Duration = Duration::from_secs(5);

/// One tick's worth of state: the HTTP clients plus the restart counter.
///
/// Built fresh for every tick so the restart staggering starts over at
/// 5 s instead of growing without bound across the process lifetime.
pub struct Updater {
    http: reqwest::Client,
    couch: CouchClient,
    settings: Settings,
    status: StatusStore,
    restart_counter: AtomicU64,
    restart_spacing: Duration,
}

impl Updater {
    pub fn new(http: reqwest::Client, settings: &Settings, status: StatusStore) -> Self {
        let couch = CouchClient::new(http.clone(), settings.credentials.clone());
        Self {
            http,
            couch,
            settings: settings.clone(),
            status,
            restart_counter: AtomicU64::new(0),
            restart_spacing: RESTART_SPACING,
        }
    }

    /// Runs one tick: collect the keys, then distribute them.
    ///
    /// With no IdPs configured the tick is a successful no-op. Otherwise
    /// an empty harvest fails the tick before any CouchDB traffic.
    pub async fn update_keys(&self) -> Result<()> {
        if self.settings.idps.is_empty() {
            info!("no IdPs configured, nothing to do");
            return Ok(());
        }
        let keys = jwks::collect_keys(&self.http, &self.settings.idps).await?;
        self.distribute_keys(&keys).await
    }

    /// Fans the collected keys out across all configured servers.
    async fn distribute_keys(&self, keys: &KeySet) -> Result<()> {
        let servers = &self.settings.couchdb_servers;
        info!(
            servers = servers.len(),
            keys = keys.len(),
            "distributing keys"
        );

        let results = join_all(servers.iter().map(|server| self.sync_server(server, keys))).await;

        let mut failed = 0;
        for (server, result) in servers.iter().zip(results) {
            if let Err(e) = result {
                error!(server = %server, error = %e, "server update failed");
                failed += 1;
            }
        }
        if failed > 0 {
            return Err(SyncError::ServerFailures {
                failed,
                total: servers.len(),
            });
        }
        Ok(())
    }

    /// Updates every node of one server's cluster.
    async fn sync_server(&self, server: &str, keys: &KeySet) -> Result<()> {
        let nodes = self.couch.cluster_nodes(server).await?;
        info!(server = %server, nodes = nodes.len(), "found cluster nodes");

        let results = join_all(
            nodes
                .iter()
                .map(|node| self.sync_node(server, node, keys)),
        )
        .await;

        let total = results.len();
        let mut failed = 0;
        for (node, result) in nodes.iter().zip(results) {
            if let Err(e) = result {
                warn!(server = %server, node = %node, error = %e, "node update failed");
                failed += 1;
            }
        }
        if failed > 0 {
            return Err(SyncError::NodeFailures {
                server: server.to_string(),
                failed,
                total,
            });
        }
        Ok(())
    }

    /// Diffs one node's `jwt_keys` section against the desired set, writes
    /// what differs, and requests a staggered restart when anything was
    /// written.
    ///
    /// Keys present on the node but absent from `keys` are left alone.
    /// The restart fires whenever writes were issued, even if some of
    /// them failed; the write failures are still reported afterwards.
    async fn sync_node(&self, server: &str, node: &str, keys: &KeySet) -> Result<()> {
        let current = self.couch.jwt_keys(server, node).await?;
        debug!(node = %node, existing = current.len(), "read node config");

        let mut pending = Vec::new();
        for (key_id, pem) in keys {
            debug!(node = %node, key = %key_id, "checking key");
            if current.get(key_id) == Some(pem) {
                debug!(node = %node, key = %key_id, "existing key is current");
            } else {
                pending.push((key_id, pem));
            }
        }
        if pending.is_empty() {
            debug!(node = %node, "node is up to date");
            return Ok(());
        }

        let total = pending.len();
        let writes = pending.into_iter().map(|(key_id, pem)| {
            let url = format!("{server}/_node/{node}/_config/jwt_keys/{key_id}");
            async move {
                match self.couch.put_jwt_key(&url, pem).await {
                    Ok(()) => {
                        info!(url = %url, "updated key");
                        self.status.record(&url);
                        true
                    }
                    Err(e) => {
                        warn!(url = %url, error = %e, "key update failed");
                        false
                    }
                }
            }
        });
        let failed = join_all(writes)
            .await
            .into_iter()
            .filter(|written| !written)
            .count();

        self.restart_after_stagger(server, node).await;

        if failed > 0 {
            return Err(SyncError::KeyWrites {
                node: node.to_string(),
                failed,
                total,
            });
        }
        Ok(())
    }

    /// Takes the next restart slot, waits it out, then posts the restart.
    ///
    /// A restart failure is logged and swallowed; the keys are already in
    /// place and the next tick will not re-write them.
    async fn restart_after_stagger(&self, server: &str, node: &str) {
        let slot = self.restart_counter.fetch_add(1, Ordering::SeqCst) + 1;
        let delay = self.restart_spacing * slot as u32;
        info!(node = %node, delay_ms = delay.as_millis() as u64, "restart scheduled");
        tokio::time::sleep(delay).await;

        info!(node = %node, server = %server, "requesting restart");
        match self.couch.restart(server, node).await {
            Ok(()) => info!(node = %node, server = %server, "restart request sent"),
            Err(e) => {
                warn!(node = %node, server = %server, error = %e, "restart request failed");
            }
        }
    }
}

/// Drives the reconciliation: first tick 10 s after startup, then one
/// tick per configured interval.
///
/// Each tick is awaited here, so ticks can never overlap; a tick that
/// outlives the interval delays the next one (missed ticks are skipped).
pub async fn run_scheduler(settings: Settings, status: StatusStore) {
    let period = Duration::from_secs(settings.update_interval_seconds.max(1));
    let http = reqwest::Client::new();

    let mut ticker = tokio::time::interval_at(Instant::now() + STARTUP_DELAY, period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

    loop {
        ticker.tick().await;
        info!("scheduler running");
        let updater = Updater::new(http.clone(), &settings, status.clone());
        match updater.update_keys().await {
            Ok(()) => info!("keys updated"),
            Err(e) => error!(error = %e, "failed to update keys"),
        }
    }
}
