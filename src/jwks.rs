//! JWKS retrieval and key collection.
//!
//! Resolves each configured IdP's JWKS through OpenID discovery and folds
//! the certificate-bound keys of all providers into one map of
//! PEM-encoded public keys, ready for distribution to CouchDB.

use std::collections::HashMap;

use futures::future::join_all;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::error::{Result, SyncError};
use crate::key;

/// Collected key material: `"<kty>:<kid>"` → single-line escaped PEM.
pub type KeySet = HashMap<String, String>;

/// A JSON Web Key Set.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Jwks {
    /// List of keys.
    #[serde(default)]
    pub keys: Vec<Jwk>,
}

/// A JSON Web Key, reduced to the fields the synchronization needs.
///
/// Everything except `kty` is optional on the wire; keys lacking the
/// pieces we need are skipped during collection rather than failing the
/// whole document.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Jwk {
    /// Key type (e.g., "RSA"). Some providers omit it; RSA is assumed then.
    #[serde(default = "default_kty")]
    pub kty: String,
    /// Key ID.
    #[serde(default)]
    pub kid: Option<String>,
    /// Algorithm (e.g., "RS256").
    #[serde(default)]
    pub alg: Option<String>,
    /// X.509 certificate chain, base64 DER entries.
    #[serde(default)]
    pub x5c: Option<Vec<String>>,
}

fn default_kty() -> String {
    "RSA".to_string()
}

impl Jwk {
    /// The identifier a key is stored under in CouchDB:
    /// `"<kty-lowercase>:<kid>"`. `None` when the JWK has no `kid`.
    pub fn key_id(&self) -> Option<String> {
        self.kid
            .as_ref()
            .map(|kid| format!("{}:{}", self.kty.to_lowercase(), kid))
    }
}

#[derive(Deserialize)]
struct DiscoveryDocument {
    jwks_uri: Option<String>,
}

async fn get_json<T: serde::de::DeserializeOwned>(
    client: &reqwest::Client,
    url: &str,
) -> Result<T> {
    let response = client.get(url).send().await?;
    let status = response.status();
    if !status.is_success() {
        return Err(SyncError::UnexpectedStatus {
            status,
            url: url.to_string(),
        });
    }
    Ok(response.json().await?)
}

/// Resolves `base_url`'s JWKS document via OpenID discovery.
pub async fn fetch_jwks(client: &reqwest::Client, base_url: &str) -> Result<Jwks> {
    let well_known = format!("{base_url}/.well-known/openid-configuration");
    let discovery: DiscoveryDocument = get_json(client, &well_known).await?;

    let jwks_uri = discovery
        .jwks_uri
        .ok_or_else(|| SyncError::MissingJwksUri(base_url.to_string()))?;

    get_json(client, &jwks_uri).await
}

/// Fetches the JWKS of every configured IdP concurrently and merges the
/// converted keys into one [`KeySet`].
///
/// All fetches are awaited regardless of individual failures; a failing
/// IdP or an unusable key is logged and contributes nothing. Later keys
/// overwrite earlier ones on KeyId collision. Fails with
/// [`SyncError::NoKeysRetrieved`] when the merged map ends up empty, so a
/// tick with broken discovery everywhere never touches CouchDB.
pub async fn collect_keys(client: &reqwest::Client, idps: &[String]) -> Result<KeySet> {
    let fetches = idps.iter().map(|idp| async move {
        match fetch_jwks(client, idp).await {
            Ok(jwks) => Some(jwks),
            Err(e) => {
                warn!(idp = %idp, error = %e, "failed to retrieve JWKS");
                None
            }
        }
    });

    let mut result = KeySet::new();
    for jwks in join_all(fetches).await.into_iter().flatten() {
        extract_public_keys(&jwks, &mut result);
    }

    if result.is_empty() {
        return Err(SyncError::NoKeysRetrieved);
    }
    Ok(result)
}

/// Converts every usable key of one JWKS and merges it into `result`.
fn extract_public_keys(jwks: &Jwks, result: &mut KeySet) {
    for jwk in &jwks.keys {
        let Some(key_id) = jwk.key_id() else {
            warn!("skipping JWK without kid");
            continue;
        };
        let alg = jwk.alg.as_deref().unwrap_or_default();
        let Some(x5c_entry) = jwk.x5c.as_ref().and_then(|chain| chain.first()) else {
            warn!(key = %key_id, "skipping JWK without x5c certificate");
            continue;
        };

        match key::public_key_pem(x5c_entry, alg) {
            Ok(pem) => {
                info!(key = %key_id, alg = %alg, "collected key");
                result.insert(key_id, pem);
            }
            Err(e) => warn!(key = %key_id, error = %e, "skipping key"),
        }
    }
}
