//! HTTP client for the CouchDB administration endpoints.
//!
//! Wraps a shared [`reqwest::Client`] with the Basic credentials and the
//! four endpoints the synchronization needs: cluster membership, the
//! per-node `jwt_keys` section, single-key writes, and node restarts.

use std::collections::HashMap;

use axum::http::StatusCode;
use serde::Deserialize;

use crate::config::Credentials;
use crate::error::{Result, SyncError};

/// CouchDB client bound to one set of credentials.
///
/// Credentials are optional: when the environment did not provide them,
/// every call fails as unauthorized without going on the wire.
#[derive(Clone)]
pub struct CouchClient {
    http: reqwest::Client,
    credentials: Option<Credentials>,
}

#[derive(Deserialize)]
struct Membership {
    #[serde(default)]
    cluster_nodes: Vec<String>,
}

impl CouchClient {
    pub fn new(http: reqwest::Client, credentials: Option<Credentials>) -> Self {
        Self { http, credentials }
    }

    fn authenticated(&self, request: reqwest::RequestBuilder) -> Result<reqwest::RequestBuilder> {
        let cred = self
            .credentials
            .as_ref()
            .ok_or_else(|| SyncError::Unauthorized("COUCHDB_USER / COUCHDB_PWD not set".into()))?;
        Ok(request.basic_auth(&cred.user, Some(&cred.password)))
    }

    /// The node ids of `server`'s cluster, from `_membership`.
    pub async fn cluster_nodes(&self, server: &str) -> Result<Vec<String>> {
        let url = format!("{server}/_membership");
        let response = self.authenticated(self.http.get(&url))?.send().await?;
        let response = check_status(response, &url)?;
        let membership: Membership = response.json().await?;
        Ok(membership.cluster_nodes)
    }

    /// The current `jwt_keys` configuration section of one node.
    pub async fn jwt_keys(&self, server: &str, node: &str) -> Result<HashMap<String, String>> {
        let url = format!("{server}/_node/{node}/_config/jwt_keys");
        let response = self.authenticated(self.http.get(&url))?.send().await?;
        let response = check_status(response, &url)?;
        Ok(response.json().await?)
    }

    /// Writes one key to the exact config `url`.
    ///
    /// The body is the PEM serialized as a JSON string: the literal `\n`
    /// sequences inside the PEM become `\\n` on the wire, so CouchDB
    /// stores back exactly the single-line form we collected.
    pub async fn put_jwt_key(&self, url: &str, pem: &str) -> Result<()> {
        let body = serde_json::to_string(pem)?;
        let response = self
            .authenticated(self.http.put(url))?
            .header(reqwest::header::CONTENT_TYPE, "application/json")
            .body(body)
            .send()
            .await?;
        check_status(response, url)?;
        Ok(())
    }

    /// Asks one node to restart.
    pub async fn restart(&self, server: &str, node: &str) -> Result<()> {
        let url = format!("{server}/_node/{node}/_restart");
        let response = self.authenticated(self.http.post(&url))?.send().await?;
        check_status(response, &url)?;
        Ok(())
    }
}

fn check_status(response: reqwest::Response, url: &str) -> Result<reqwest::Response> {
    let status = response.status();
    if status.is_success() {
        Ok(response)
    } else if status == StatusCode::UNAUTHORIZED {
        Err(SyncError::Unauthorized(url.to_string()))
    } else {
        Err(SyncError::CouchDb {
            status,
            url: url.to_string(),
        })
    }
}
