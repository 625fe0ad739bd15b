//! Certificate to PEM conversion.
//!
//! Turns the X.509 certificate embedded in a JWK's `x5c` chain into the
//! PEM-encoded public key that CouchDB expects in its `jwt_keys`
//! configuration section.

use base64::{Engine as _, engine::general_purpose::STANDARD};
use rsa::RsaPublicKey;
use rsa::pkcs8::{DecodePublicKey, EncodePublicKey};
use x509_parser::prelude::*;

use crate::error::{Result, SyncError};

/// Extracts the public key from a base64 DER certificate (one `x5c` array
/// entry) and returns it as a single-line PEM.
///
/// The encoding follows the key family given by `alg`:
/// - `RS*` keys are re-encoded through [`rsa::RsaPublicKey`] into a
///   standard public-key PEM.
/// - `ES*` keys keep the certificate's SubjectPublicKeyInfo verbatim,
///   wrapped as a `PUBLIC KEY` PEM block.
///
/// CouchDB stores the key as a JSON string value, so the multi-line PEM is
/// flattened: every newline becomes the two-character sequence `\n`.
pub fn public_key_pem(x5c_entry: &str, alg: &str) -> Result<String> {
    let der = STANDARD
        .decode(x5c_entry.trim())
        .map_err(|e| SyncError::CertificateParse(format!("x5c is not valid base64: {e}")))?;
    let (_, cert) = X509Certificate::from_der(&der)
        .map_err(|e| SyncError::CertificateParse(format!("not an X.509 certificate: {e}")))?;
    let spki = cert.public_key();

    let pem = if alg.starts_with("RS") {
        let key = RsaPublicKey::from_public_key_der(spki.raw).map_err(|e| {
            SyncError::CertificateParse(format!("certificate does not carry an RSA key: {e}"))
        })?;
        key.to_public_key_pem(rsa::pkcs8::LineEnding::LF)
            .map_err(|e| SyncError::CertificateParse(format!("PEM encoding failed: {e}")))?
    } else if alg.starts_with("ES") {
        let block = ::pem::Pem::new("PUBLIC KEY", spki.raw.to_vec());
        ::pem::encode_config(
            &block,
            ::pem::EncodeConfig::new().set_line_ending(::pem::LineEnding::LF),
        )
    } else {
        return Err(SyncError::UnsupportedAlgorithm(alg.to_string()));
    };

    Ok(pem.replace('\n', "\\n"))
}
