//! Service account authentication against Google OAuth.
//!
//! The skill signs a short-lived RS256 JWT with the service account key and
//! exchanges it for a bearer access token (the OAuth "JWT bearer" grant).

use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{encode, Algorithm, EncodingKey, Header};
use serde::{Deserialize, Serialize};

use crate::config::CALENDAR_SCOPE;
use crate::credentials::ServiceAccountKey;
use crate::{Error, Result};

const JWT_BEARER_GRANT: &str = "urn:ietf:params:oauth:grant-type:jwt-bearer";

/// Assertions are valid for at most one hour.
const ASSERTION_LIFETIME_SECS: i64 = 3600;

/// Claims of the signed service account assertion.
#[derive(Debug, Serialize, Deserialize, PartialEq)]
pub struct AssertionClaims {
    /// Service account email
    pub iss: String,
    /// Space-separated OAuth scopes
    pub scope: String,
    /// Token endpoint
    pub aud: String,
    /// Issued at
    pub iat: i64,
    /// Expiration
    pub exp: i64,
}

impl AssertionClaims {
    pub fn new(key: &ServiceAccountKey, now: DateTime<Utc>) -> Self {
        let iat = now.timestamp();
        Self {
            iss: key.client_email.clone(),
            scope: CALENDAR_SCOPE.to_string(),
            aud: key.token_uri.clone(),
            iat,
            exp: iat + ASSERTION_LIFETIME_SECS,
        }
    }
}

/// Google OAuth token response
#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    expires_in: Option<i64>,
}

/// Bearer token together with its expiry.
#[derive(Debug, Clone)]
pub struct AccessToken {
    pub token: String,
    pub expires_at: DateTime<Utc>,
}

impl AccessToken {
    /// Whether the token is still usable at `now`, keeping `margin` in reserve.
    pub fn is_valid_at(&self, now: DateTime<Utc>, margin: Duration) -> bool {
        now + margin < self.expires_at
    }
}

/// Sign the service account assertion.
pub fn sign_assertion(key: &ServiceAccountKey, now: DateTime<Utc>) -> Result<String> {
    let mut header = Header::new(Algorithm::RS256);
    header.kid = key.private_key_id.clone();

    let encoding_key = EncodingKey::from_rsa_pem(key.private_key.as_bytes())
        .map_err(|e| Error::Auth(format!("Invalid service account private key: {}", e)))?;

    encode(&header, &AssertionClaims::new(key, now), &encoding_key)
        .map_err(|e| Error::Auth(format!("Failed to sign assertion: {}", e)))
}

/// Exchange a signed assertion for an access token.
pub async fn exchange_assertion(
    http_client: &reqwest::Client,
    key: &ServiceAccountKey,
    now: DateTime<Utc>,
) -> Result<AccessToken> {
    let assertion = sign_assertion(key, now)?;
    let params = [("grant_type", JWT_BEARER_GRANT), ("assertion", assertion.as_str())];

    let response = http_client
        .post(&key.token_uri)
        .form(&params)
        .send()
        .await?;

    if !response.status().is_success() {
        let status = response.status();
        let error_text = response.text().await.unwrap_or_default();
        return Err(Error::Auth(format!(
            "Token exchange failed ({}): {}",
            status, error_text
        )));
    }

    let token_response: TokenResponse = response
        .json()
        .await
        .map_err(|e| Error::Auth(format!("Failed to parse token response: {}", e)))?;

    Ok(AccessToken {
        token: token_response.access_token,
        expires_at: now + Duration::seconds(token_response.expires_in.unwrap_or(ASSERTION_LIFETIME_SECS)),
    })
}
