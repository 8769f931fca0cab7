// Session tokens
//
// A session token is a nested, double-sealed blob:
//   outer = seal(TokenEnvelope { type, access_token, expiry, iat })
//   access_token = seal(SessionPayload { id, email, role, expiry })
// Nothing is stored server-side; the token carries everything needed to validate it.

use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::error::TokenError;
use crate::identity::{Identity, Role};
use crate::token_codec::TokenCodec;

/// Discriminant value marking an envelope as an access token.
pub const ACCESS_TOKEN_TYPE: &str = "access-token";

/// Default token lifetime (5 minutes).
pub const DEFAULT_TOKEN_LIFETIME: Duration = Duration::from_millis(300_000);

/// Claims sealed inside the access token.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct SessionPayload {
    /// Principal ID.
    pub id: String,
    /// Principal email.
    pub email: String,
    /// Principal role at issuance time.
    pub role: Role,
    /// Absolute expiry in milliseconds since the Unix epoch.
    pub expiry: i64,
}

impl SessionPayload {
    pub fn identity(&self) -> Identity {
        Identity::new(self.id.clone(), self.email.clone(), self.role)
    }

    pub fn is_expired_at(&self, now_ms: i64) -> bool {
        now_ms >= self.expiry
    }
}

/// Outer structure of a session token.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TokenEnvelope {
    /// Token purpose; only `access-token` is accepted for authentication.
    #[serde(rename = "type")]
    pub token_type: String,
    /// Sealed `SessionPayload`.
    pub access_token: String,
    /// Copy of the inner expiry.
    pub expiry: i64,
    /// Issuance time in milliseconds since the Unix epoch.
    pub iat: i64,
}

/// Mints and opens session tokens.
/// Stateless apart from immutable key material; safe to share across requests.
#[derive(Debug, Clone)]
pub struct SessionIssuer {
    codec: TokenCodec,
    lifetime: Duration,
    enforce_expiry: bool,
}

impl SessionIssuer {
    pub fn new(codec: TokenCodec, lifetime: Duration) -> Self {
        Self {
            codec,
            lifetime,
            enforce_expiry: true,
        }
    }

    /// Toggle rejection of expired tokens when opening.
    pub fn with_expiry_enforcement(mut self, enforce: bool) -> Self {
        self.enforce_expiry = enforce;
        self
    }

    pub fn lifetime(&self) -> Duration {
        self.lifetime
    }

    pub fn enforces_expiry(&self) -> bool {
        self.enforce_expiry
    }

    /// Issue a bearer token for an identity, valid from now.
    pub fn issue(&self, identity: &Identity) -> Result<String, TokenError> {
        self.issue_at(identity, Utc::now().timestamp_millis())
    }

    /// Issue a bearer token with an explicit issuance time (ms since epoch).
    pub fn issue_at(&self, identity: &Identity, now_ms: i64) -> Result<String, TokenError> {
        let lifetime_ms = i64::try_from(self.lifetime.as_millis())
            .map_err(|_| TokenError::config("token lifetime out of range"))?;
        let expiry = now_ms + lifetime_ms;

        let payload = SessionPayload {
            id: identity.id.clone(),
            email: identity.email.clone(),
            role: identity.role,
            expiry,
        };
        let access_token = self.codec.encrypt_payload(&payload)?;

        let envelope = TokenEnvelope {
            token_type: ACCESS_TOKEN_TYPE.to_string(),
            access_token,
            expiry,
            iat: now_ms,
        };

        self.codec.encrypt_payload(&envelope)
    }

    /// Open a bearer token at the current time.
    ///
    /// Returns `Ok(None)` when the token decodes but is not an access token.
    pub fn open(&self, token: &str) -> Result<Option<SessionPayload>, TokenError> {
        self.open_at(token, Utc::now().timestamp_millis())
    }

    /// Open a bearer token at an explicit time (ms since epoch).
    pub fn open_at(&self, token: &str, now_ms: i64) -> Result<Option<SessionPayload>, TokenError> {
        let decoded: serde_json::Value = self.codec.decrypt_payload(token)?;

        let is_access_token = decoded
            .get("type")
            .and_then(|t| t.as_str())
            .is_some_and(|t| t == ACCESS_TOKEN_TYPE);
        if !is_access_token {
            tracing::debug!("Decoded token is not an access token, ignoring");
            return Ok(None);
        }

        let envelope: TokenEnvelope = serde_json::from_value(decoded)
            .map_err(|e| TokenError::decode(format!("invalid token envelope: {}", e)))?;
        let payload: SessionPayload = self.codec.decrypt_payload(&envelope.access_token)?;

        if payload.expiry != envelope.expiry {
            return Err(TokenError::unauthorized("inner and outer expiry disagree"));
        }

        if self.enforce_expiry && payload.is_expired_at(now_ms) {
            return Err(TokenError::unauthorized("token expired"));
        }

        Ok(Some(payload))
    }

    /// Open only the outer layer, for diagnostics and tests.
    pub fn open_envelope(&self, token: &str) -> Result<TokenEnvelope, TokenError> {
        self.codec.decrypt_payload(token)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::token_codec::generate_token_key;
    use serde_json::json;

    fn issuer() -> SessionIssuer {
        let codec = TokenCodec::new(&generate_token_key("tok-v1"), &[]).unwrap();
        SessionIssuer::new(codec, DEFAULT_TOKEN_LIFETIME)
    }

    fn john() -> Identity {
        Identity::new("0192f0c2-0000-7000-8000-000000000001", "john@example.com", Role::Customer)
    }

    const NOW: i64 = 1_700_000_000_000;

    #[test]
    fn test_issue_and_open() {
        let issuer = issuer();
        let token = issuer.issue_at(&john(), NOW).unwrap();
        assert!(!token.is_empty());

        let claims = issuer.open_at(&token, NOW + 1_000).unwrap().unwrap();
        assert_eq!(claims.id, john().id);
        assert_eq!(claims.email, "john@example.com");
        assert_eq!(claims.role, Role::Customer);
        assert_eq!(claims.identity(), john());
    }

    #[test]
    fn test_expiry_is_iat_plus_lifetime() {
        let issuer = issuer();
        let token = issuer.issue_at(&john(), NOW).unwrap();

        let envelope = issuer.open_envelope(&token).unwrap();
        assert_eq!(envelope.token_type, ACCESS_TOKEN_TYPE);
        assert_eq!(envelope.iat, NOW);
        assert_eq!(envelope.expiry, envelope.iat + 300_000);

        let claims = issuer.open_at(&token, NOW).unwrap().unwrap();
        assert_eq!(claims.expiry, envelope.iat + 300_000);
    }

    #[test]
    fn test_issue_uses_current_time() {
        let issuer = issuer();
        let before = Utc::now().timestamp_millis();
        let token = issuer.issue(&john()).unwrap();
        let after = Utc::now().timestamp_millis();

        let envelope = issuer.open_envelope(&token).unwrap();
        assert!(envelope.iat >= before && envelope.iat <= after);
        assert!(issuer.open(&token).unwrap().is_some());
    }

    #[test]
    fn test_reuse_does_not_extend_expiry() {
        let issuer = issuer();
        let token = issuer.issue_at(&john(), NOW).unwrap();

        let first = issuer.open_at(&token, NOW + 10).unwrap().unwrap();
        let second = issuer.open_at(&token, NOW + 200_000).unwrap().unwrap();
        assert_eq!(first.expiry, second.expiry);
    }

    #[test]
    fn test_expired_token_rejected() {
        let issuer = issuer();
        let token = issuer.issue_at(&john(), NOW).unwrap();

        let result = issuer.open_at(&token, NOW + 300_000);
        assert!(matches!(result, Err(TokenError::Unauthorized(_))));
    }

    #[test]
    fn test_expired_token_accepted_without_enforcement() {
        let issuer = issuer().with_expiry_enforcement(false);
        let token = issuer.issue_at(&john(), NOW).unwrap();

        let claims = issuer.open_at(&token, NOW + 3_600_000).unwrap().unwrap();
        assert!(claims.is_expired_at(NOW + 3_600_000));
    }

    #[test]
    fn test_non_access_token_is_ignored() {
        let codec = TokenCodec::new(&generate_token_key("tok-v1"), &[]).unwrap();
        let issuer = SessionIssuer::new(codec.clone(), DEFAULT_TOKEN_LIFETIME);

        let refresh = codec
            .encrypt_payload(&json!({"type": "refresh-token", "sub": "1"}))
            .unwrap();
        assert!(issuer.open_at(&refresh, NOW).unwrap().is_none());

        let untyped = codec.encrypt_payload(&json!({"hello": "world"})).unwrap();
        assert!(issuer.open_at(&untyped, NOW).unwrap().is_none());
    }

    #[test]
    fn test_access_type_with_bad_shape_fails() {
        let codec = TokenCodec::new(&generate_token_key("tok-v1"), &[]).unwrap();
        let issuer = SessionIssuer::new(codec.clone(), DEFAULT_TOKEN_LIFETIME);

        let token = codec
            .encrypt_payload(&json!({"type": ACCESS_TOKEN_TYPE, "access_token": 7}))
            .unwrap();
        assert!(matches!(
            issuer.open_at(&token, NOW),
            Err(TokenError::Decode(_))
        ));
    }

    #[test]
    fn test_expiry_mismatch_rejected() {
        let codec = TokenCodec::new(&generate_token_key("tok-v1"), &[]).unwrap();
        let issuer = SessionIssuer::new(codec.clone(), DEFAULT_TOKEN_LIFETIME);

        let inner = codec
            .encrypt_payload(&SessionPayload {
                id: "1".into(),
                email: "a@b.c".into(),
                role: Role::Admin,
                expiry: NOW + 1_000,
            })
            .unwrap();
        let token = codec
            .encrypt_payload(&TokenEnvelope {
                token_type: ACCESS_TOKEN_TYPE.into(),
                access_token: inner,
                expiry: NOW + 999_999,
                iat: NOW,
            })
            .unwrap();

        assert!(matches!(
            issuer.open_at(&token, NOW),
            Err(TokenError::Unauthorized(_))
        ));
    }

    #[test]
    fn test_token_from_other_key_rejected() {
        let token = issuer().issue_at(&john(), NOW).unwrap();
        assert!(matches!(
            issuer().open_at(&token, NOW),
            Err(TokenError::Decode(_))
        ));
    }

    #[test]
    fn test_corrupted_token_rejected() {
        let issuer = issuer();
        let token = issuer.issue_at(&john(), NOW).unwrap();
        let mut chars: Vec<char> = token.chars().collect();
        let mid = chars.len() / 2;
        chars[mid] = if chars[mid] == '0' { '1' } else { '0' };
        let corrupted: String = chars.into_iter().collect();

        assert!(matches!(
            issuer.open_at(&corrupted, NOW),
            Err(TokenError::Decode(_))
        ));
    }

    #[test]
    fn test_role_propagates() {
        let issuer = issuer();
        let admin = Identity::new("9", "root@example.com", Role::Admin);
        let token = issuer.issue_at(&admin, NOW).unwrap();
        let claims = issuer.open_at(&token, NOW).unwrap().unwrap();
        assert_eq!(claims.role, Role::Admin);
        assert!(claims.identity().is_admin());
    }
}
