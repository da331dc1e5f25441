//! Upload credential issuer
//!
//! Signs a one-off token for a direct upload to the media host. The host verifies
//! `signature == hex(HMAC-SHA1(private_key, token || expire))` and refuses a token it
//! has already seen, so nothing is stored here.

use chrono::{DateTime, TimeZone, Utc};
use hmac::{Hmac, Mac};
use reelvault_core::config::{MediaHostKeys, MAX_UPLOAD_CREDENTIAL_TTL_SECS};
use reelvault_core::models::UploadCredential;
use reelvault_core::AppError;
use sha1::Sha1;
use std::fmt;
use uuid::Uuid;

type HmacSha1 = Hmac<Sha1>;

#[derive(Debug, thiserror::Error)]
pub enum CredentialError {
    #[error("media host {0} is not configured")]
    MissingKeyMaterial(&'static str),

    #[error("failed to sign upload token: {0}")]
    Signing(String),
}

impl From<CredentialError> for AppError {
    fn from(err: CredentialError) -> Self {
        AppError::UploadAuth(err.to_string())
    }
}

#[derive(Clone)]
pub struct CredentialIssuer {
    public_key: Option<String>,
    private_key: Option<String>,
    ttl_secs: i64,
}

impl fmt::Debug for CredentialIssuer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CredentialIssuer")
            .field("public_key", &self.public_key)
            .field("has_private_key", &self.private_key.is_some())
            .field("ttl_secs", &self.ttl_secs)
            .finish()
    }
}

impl CredentialIssuer {
    /// TTL is clamped to `1..=3600` seconds.
    pub fn new(keys: &MediaHostKeys, ttl_secs: i64) -> Self {
        Self {
            public_key: keys.public_key.clone(),
            private_key: keys.private_key.clone(),
            ttl_secs: ttl_secs.clamp(1, MAX_UPLOAD_CREDENTIAL_TTL_SECS),
        }
    }

    pub fn issue(&self) -> Result<UploadCredential, CredentialError> {
        self.issue_at(Utc::now())
    }

    /// Issue a credential as of `now`. Expiry lands on a whole second strictly after `now`.
    pub fn issue_at(&self, now: DateTime<Utc>) -> Result<UploadCredential, CredentialError> {
        let public_key = self
            .public_key
            .as_deref()
            .filter(|k| !k.trim().is_empty())
            .ok_or(CredentialError::MissingKeyMaterial("public key"))?;
        let private_key = self
            .private_key
            .as_deref()
            .filter(|k| !k.trim().is_empty())
            .ok_or(CredentialError::MissingKeyMaterial("private key"))?;

        let token = Uuid::new_v4().to_string();
        let expire = now.timestamp() + self.ttl_secs;
        let expires_at = Utc
            .timestamp_opt(expire, 0)
            .single()
            .ok_or_else(|| CredentialError::Signing(format!("expiry {} out of range", expire)))?;
        let signature = sign(private_key, &token, expire)?;

        Ok(UploadCredential {
            public_key: public_key.to_string(),
            token,
            signature,
            expires_at,
        })
    }
}

/// Lowercase hex HMAC-SHA1 of `token` followed by the decimal `expire`.
pub fn sign(private_key: &str, token: &str, expire: i64) -> Result<String, CredentialError> {
    let mut mac = HmacSha1::new_from_slice(private_key.as_bytes())
        .map_err(|e| CredentialError::Signing(e.to_string()))?;
    mac.update(token.as_bytes());
    mac.update(expire.to_string().as_bytes());
    Ok(hex::encode(mac.finalize().into_bytes()))
}
