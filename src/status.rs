//! Shared status map and the `/status` endpoint.
//!
//! Every successful key write records its update URL with a timestamp;
//! the HTTP handler serves a snapshot so operators can see what was
//! pushed where, and when.

use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock};

use axum::Json;
use axum::extract::State;
use chrono::Utc;

/// Cloneable handle on the process-wide status map.
///
/// The map grows for the lifetime of the process; entries are last-writer
/// wins by URL and never removed.
#[derive(Clone, Default)]
pub struct StatusStore {
    inner: Arc<RwLock<HashMap<String, String>>>,
}

impl StatusStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stamps `url` with the current time.
    pub fn record(&self, url: &str) {
        let mut map = self.inner.write().unwrap_or_else(PoisonError::into_inner);
        map.insert(url.to_string(), Utc::now().to_rfc2822());
    }

    /// A point-in-time copy of the map.
    pub fn snapshot(&self) -> HashMap<String, String> {
        self.inner
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

/// Handler for the `/status` endpoint.
pub async fn status(State(store): State<StatusStore>) -> Json<HashMap<String, String>> {
    Json(store.snapshot())
}
