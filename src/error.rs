//! Error types for the key synchronization pipeline.
//!
//! Every branch of a tick (per IdP, per key, per server, per node, per PUT)
//! produces its own `Result`; parents join all branches before aggregating,
//! so a failure here never short-circuits sibling work.

use axum::http::StatusCode;
use thiserror::Error;

/// Main error type for synchronization operations.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum SyncError {
    /// Configuration file missing or unparsable. Fatal at startup.
    #[error("cannot read configuration: {0}")]
    Config(String),

    /// OpenID discovery document carried no `jwks_uri`.
    #[error("no jwks_uri in the OpenID configuration of {0}")]
    MissingJwksUri(String),

    /// Transport-level HTTP failure (connect, body, JSON decode).
    #[error("http request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// A response came back outside the 2xx range.
    #[error("unexpected status {status} from {url}")]
    UnexpectedStatus { status: StatusCode, url: String },

    /// An `x5c` entry could not be turned into a public key.
    #[error("certificate parse error: {0}")]
    CertificateParse(String),

    /// JWK algorithm is neither RSA (`RS*`) nor ECDSA (`ES*`).
    #[error("unsupported algorithm: {0}")]
    UnsupportedAlgorithm(String),

    /// Every configured IdP failed to contribute a key; the tick stops
    /// before touching CouchDB.
    #[error("no keys were retrieved from the IdPs")]
    NoKeysRetrieved,

    /// CouchDB rejected the request, or no credentials are configured.
    #[error("couchdb request unauthorized: {0}")]
    Unauthorized(String),

    /// CouchDB answered outside the 2xx range.
    #[error("couchdb returned {status} for {url}")]
    CouchDb { status: StatusCode, url: String },

    /// JSON encoding of a request body failed.
    #[error("json encoding failed: {0}")]
    Json(#[from] serde_json::Error),

    /// Some of a node's key writes failed.
    #[error("{failed} of {total} key write(s) failed on node {node}")]
    KeyWrites {
        node: String,
        failed: usize,
        total: usize,
    },

    /// Some nodes of a server failed to update.
    #[error("{failed} of {total} node(s) failed to update on {server}")]
    NodeFailures {
        server: String,
        failed: usize,
        total: usize,
    },

    /// Some server branches of a tick failed.
    #[error("{failed} of {total} server(s) failed to update")]
    ServerFailures { failed: usize, total: usize },
}

/// Result type for synchronization operations.
pub type Result<T> = std::result::Result<T, SyncError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_name_the_failing_target() {
        let err = SyncError::MissingJwksUri("http://idp/realms/r".to_string());
        assert!(err.to_string().contains("http://idp/realms/r"));

        let err = SyncError::CouchDb {
            status: StatusCode::BAD_GATEWAY,
            url: "http://db/_membership".to_string(),
        };
        assert!(err.to_string().contains("502"));
        assert!(err.to_string().contains("/_membership"));

        let err = SyncError::NodeFailures {
            server: "http://db".to_string(),
            failed: 1,
            total: 3,
        };
        assert_eq!(err.to_string(), "1 of 3 node(s) failed to update on http://db");
    }
}
