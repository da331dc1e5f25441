use chrono::{DateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use utoipa::ToSchema;

/// Short-lived signed credential authorizing exactly one direct upload to the media host.
///
/// Never persisted. The upload client takes it by value, so one upload call consumes it;
/// a reused credential is rejected by the host, not here.
#[derive(Clone, PartialEq, Eq)]
pub struct UploadCredential {
    pub public_key: String,
    pub token: String,
    pub signature: String,
    pub expires_at: DateTime<Utc>,
}

impl UploadCredential {
    pub fn is_expired(&self) -> bool {
        self.is_expired_at(Utc::now())
    }

    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        self.expires_at <= now
    }

    /// Expiry as UNIX seconds, the form the host expects.
    pub fn expire(&self) -> i64 {
        self.expires_at.timestamp()
    }
}

impl fmt::Debug for UploadCredential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UploadCredential")
            .field("public_key", &self.public_key)
            .field("token", &self.token)
            .field("expires_at", &self.expires_at)
            .finish_non_exhaustive()
    }
}

/// Signed parameters the host checks on every upload request.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct AuthenticationParameters {
    pub token: String,
    /// Hex HMAC over `token || expire`
    pub signature: String,
    /// Expiry as UNIX timestamp (seconds)
    pub expire: i64,
}

/// Response body of `GET /api/auth`.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UploadAuthResponse {
    pub authentication_parameters: AuthenticationParameters,
    pub public_key: String,
}

impl From<UploadCredential> for UploadAuthResponse {
    fn from(credential: UploadCredential) -> Self {
        let expire = credential.expire();
        UploadAuthResponse {
            authentication_parameters: AuthenticationParameters {
                token: credential.token,
                signature: credential.signature,
                expire,
            },
            public_key: credential.public_key,
        }
    }
}

impl TryFrom<UploadAuthResponse> for UploadCredential {
    type Error = String;

    fn try_from(response: UploadAuthResponse) -> Result<Self, Self::Error> {
        let params = response.authentication_parameters;
        let expires_at = Utc
            .timestamp_opt(params.expire, 0)
            .single()
            .ok_or_else(|| format!("invalid expire timestamp: {}", params.expire))?;
        Ok(UploadCredential {
            public_key: response.public_key,
            token: params.token,
            signature: params.signature,
            expires_at,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn credential(expires_at: DateTime<Utc>) -> UploadCredential {
        UploadCredential {
            public_key: "public_test".to_string(),
            token: "token-1".to_string(),
            signature: "abc123".to_string(),
            expires_at,
        }
    }

    #[test]
    fn test_wire_shape_is_camel_case() {
        let expires_at = Utc.timestamp_opt(1_700_000_000, 0).unwrap();
        let json = serde_json::to_value(UploadAuthResponse::from(credential(expires_at))).unwrap();
        assert_eq!(json["publicKey"], "public_test");
        assert_eq!(json["authenticationParameters"]["token"], "token-1");
        assert_eq!(json["authenticationParameters"]["signature"], "abc123");
        assert_eq!(json["authenticationParameters"]["expire"], 1_700_000_000);
    }

    #[test]
    fn test_response_converts_back_to_credential() {
        let expires_at = Utc.timestamp_opt(1_700_000_000, 0).unwrap();
        let original = credential(expires_at);
        let back = UploadCredential::try_from(UploadAuthResponse::from(original.clone())).unwrap();
        assert_eq!(back, original);
    }

    #[test]
    fn test_is_expired_at_boundary() {
        let now = Utc::now();
        assert!(credential(now).is_expired_at(now));
        assert!(!credential(now + Duration::seconds(1)).is_expired_at(now));
    }

    #[test]
    fn test_debug_hides_signature() {
        let debug = format!("{:?}", credential(Utc::now()));
        assert!(!debug.contains("abc123"));
    }
}
