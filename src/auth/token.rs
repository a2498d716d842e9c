//! Signed credential issuance and verification
//!
//! Stateless JWTs signed with HMAC-SHA256. The payload carries the user's
//! identity (`userId`, `name`, `email`) plus issued-at and expiry timestamps.
//! No server-side session state exists; verification is pure.

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use chrono::Utc;
use hmac::{Hmac, Mac};
use serde::{Deserialize, Serialize};
use sha2::Sha256;
use thiserror::Error;
use uuid::Uuid;

type HmacSha256 = Hmac<Sha256>;

/// Default credential lifetime: 2 days
pub const DEFAULT_TOKEN_TTL_SECONDS: i64 = 2 * 24 * 60 * 60;

/// Fixed JWT header for HS256
const JWT_HEADER: &str = r#"{"alg":"HS256","typ":"JWT"}"#;

/// Token verification errors
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TokenError {
    #[error("Malformed token")]
    Malformed,

    #[error("Invalid token signature")]
    InvalidSignature,

    #[error("Token has expired")]
    Expired,
}

/// Identity claims embedded in a credential
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Claims {
    pub user_id: Uuid,
    pub name: String,
    pub email: String,
    pub iat: i64,
    pub exp: i64,
}

/// Issues and verifies signed credentials with a shared secret
#[derive(Clone)]
pub struct TokenSigner {
    key: Vec<u8>,
    ttl_seconds: i64,
}

impl TokenSigner {
    pub fn new(secret: &str, ttl_seconds: i64) -> Self {
        Self {
            key: secret.as_bytes().to_vec(),
            ttl_seconds,
        }
    }

    /// Issue a signed credential for a user, valid for the configured TTL
    pub fn issue(&self, user_id: Uuid, name: &str, email: &str) -> Result<String, TokenError> {
        let now = Utc::now().timestamp();
        let claims = Claims {
            user_id,
            name: name.to_string(),
            email: email.to_string(),
            iat: now,
            exp: now + self.ttl_seconds,
        };

        let header_b64 = URL_SAFE_NO_PAD.encode(JWT_HEADER);
        let payload = serde_json::to_vec(&claims).map_err(|_| TokenError::Malformed)?;
        let payload_b64 = URL_SAFE_NO_PAD.encode(payload);

        let signing_input = format!("{}.{}", header_b64, payload_b64);
        let signature = self.sign(signing_input.as_bytes());
        let signature_b64 = URL_SAFE_NO_PAD.encode(signature);

        Ok(format!("{}.{}", signing_input, signature_b64))
    }

    /// Verify signature and expiry, yielding the embedded identity
    pub fn verify(&self, token: &str) -> Result<Claims, TokenError> {
        let mut parts = token.splitn(3, '.');
        let (header_b64, payload_b64, signature_b64) =
            match (parts.next(), parts.next(), parts.next()) {
                (Some(h), Some(p), Some(s)) if !h.is_empty() && !p.is_empty() && !s.is_empty() => {
                    (h, p, s)
                }
                _ => return Err(TokenError::Malformed),
            };

        let signature = URL_SAFE_NO_PAD
            .decode(signature_b64)
            .map_err(|_| TokenError::Malformed)?;

        let signing_input = format!("{}.{}", header_b64, payload_b64);
        let mut mac =
            HmacSha256::new_from_slice(&self.key).map_err(|_| TokenError::InvalidSignature)?;
        mac.update(signing_input.as_bytes());
        // Constant-time comparison
        mac.verify_slice(&signature)
            .map_err(|_| TokenError::InvalidSignature)?;

        let payload = URL_SAFE_NO_PAD
            .decode(payload_b64)
            .map_err(|_| TokenError::Malformed)?;
        let claims: Claims =
            serde_json::from_slice(&payload).map_err(|_| TokenError::Malformed)?;

        if claims.exp <= Utc::now().timestamp() {
            return Err(TokenError::Expired);
        }

        Ok(claims)
    }

    fn sign(&self, data: &[u8]) -> Vec<u8> {
        let mut mac = HmacSha256::new_from_slice(&self.key)
            .expect("HMAC accepts keys of any length");
        mac.update(data);
        mac.finalize().into_bytes().to_vec()
    }
}

impl std::fmt::Debug for TokenSigner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenSigner")
            .field("key", &"[REDACTED]")
            .field("ttl_seconds", &self.ttl_seconds)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn signer() -> TokenSigner {
        TokenSigner::new("unit-test-secret", DEFAULT_TOKEN_TTL_SECONDS)
    }

    #[test]
    fn test_issue_and_verify() {
        let user_id = Uuid::new_v4();
        let token = signer().issue(user_id, "Ada", "ada@example.com").unwrap();

        let claims = signer().verify(&token).unwrap();
        assert_eq!(claims.user_id, user_id);
        assert_eq!(claims.name, "Ada");
        assert_eq!(claims.email, "ada@example.com");
        assert!(claims.exp > claims.iat);
    }

    #[test]
    fn test_wire_payload_is_camel_case() {
        let token = signer().issue(Uuid::new_v4(), "Ada", "ada@example.com").unwrap();
        let payload_b64 = token.split('.').nth(1).unwrap();
        let payload = URL_SAFE_NO_PAD.decode(payload_b64).unwrap();
        let json: serde_json::Value = serde_json::from_slice(&payload).unwrap();
        assert!(json.get("userId").is_some());
        assert!(json.get("exp").is_some());
    }

    #[test]
    fn test_expired_token_rejected() {
        let expired_signer = TokenSigner::new("unit-test-secret", -60);
        let token = expired_signer
            .issue(Uuid::new_v4(), "Ada", "ada@example.com")
            .unwrap();
        assert_eq!(signer().verify(&token), Err(TokenError::Expired));
    }

    #[test]
    fn test_wrong_key_rejected() {
        let token = signer().issue(Uuid::new_v4(), "Ada", "ada@example.com").unwrap();
        let other = TokenSigner::new("a-different-secret", DEFAULT_TOKEN_TTL_SECONDS);
        assert_eq!(other.verify(&token), Err(TokenError::InvalidSignature));
    }

    #[test]
    fn test_tampered_payload_rejected() {
        let token = signer().issue(Uuid::new_v4(), "Ada", "ada@example.com").unwrap();
        let mut parts: Vec<&str> = token.split('.').collect();

        let forged_claims = Claims {
            user_id: Uuid::new_v4(),
            name: "Mallory".to_string(),
            email: "mallory@example.com".to_string(),
            iat: Utc::now().timestamp(),
            exp: Utc::now().timestamp() + 1000,
        };
        let forged = URL_SAFE_NO_PAD.encode(serde_json::to_vec(&forged_claims).unwrap());
        parts[1] = &forged;
        let tampered = parts.join(".");

        assert_eq!(signer().verify(&tampered), Err(TokenError::InvalidSignature));
    }

    #[test]
    fn test_malformed_tokens_rejected() {
        assert_eq!(signer().verify(""), Err(TokenError::Malformed));
        assert_eq!(signer().verify("onlyonepart"), Err(TokenError::Malformed));
        assert_eq!(signer().verify("two.parts"), Err(TokenError::Malformed));
        assert_eq!(
            signer().verify("not!base64.not!base64.not!base64"),
            Err(TokenError::Malformed)
        );
    }

    #[test]
    fn test_debug_redacts_key() {
        let output = format!("{:?}", signer());
        assert!(output.contains("REDACTED"));
        assert!(!output.contains("unit-test-secret"));
    }
}
