//! Session token codec.
//!
//! Reads the claims segment of a three-part signed token. The signature is
//! never checked: claims are only used to label the session locally, never to
//! authorize anything.

use base64::alphabet;
use base64::engine::{DecodePaddingMode, GeneralPurpose, GeneralPurposeConfig};
use base64::Engine;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Standard alphabet that accepts the claims segment with or without padding.
/// URL-safe characters are mapped onto it before decoding.
const CLAIMS_ENGINE: GeneralPurpose = GeneralPurpose::new(
    &alphabet::STANDARD,
    GeneralPurposeConfig::new().with_decode_padding_mode(DecodePaddingMode::Indifferent),
);

/// Errors from [`decode_claims`].
#[derive(Debug, Error)]
pub enum TokenDecodeError {
    #[error("token is empty")]
    Empty,

    #[error("token has {0} segments, expected 3")]
    SegmentCount(usize),

    #[error("claims segment is not valid base64")]
    Base64(#[from] base64::DecodeError),

    #[error("claims segment is not valid JSON")]
    Json(#[from] serde_json::Error),
}

/// Claims the backend puts in every session token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenClaims {
    /// Primary key of the user row.
    #[serde(deserialize_with = "crate::models::user::deserialize_id")]
    pub id: String,
    pub login_id: String,
    #[serde(default)]
    pub exp: i64,
    #[serde(default)]
    pub iat: i64,
}

impl TokenClaims {
    /// Whether `exp` lies at or before `now` (seconds since the epoch).
    pub fn is_expired_at(&self, now: i64) -> bool {
        self.exp != 0 && self.exp <= now
    }
}

/// Decode the middle segment of `token` into a JSON value.
pub fn decode_claims(token: &str) -> Result<serde_json::Value, TokenDecodeError> {
    decode_claims_as(token)
}

/// Decode the middle segment of `token` into `T`.
pub fn decode_claims_as<T: DeserializeOwned>(token: &str) -> Result<T, TokenDecodeError> {
    if token.is_empty() {
        return Err(TokenDecodeError::Empty);
    }

    let segments: Vec<&str> = token.split('.').collect();
    if segments.len() != 3 {
        return Err(TokenDecodeError::SegmentCount(segments.len()));
    }

    let standard: String = segments[1]
        .chars()
        .map(|c| match c {
            '-' => '+',
            '_' => '/',
            other => other,
        })
        .collect();
    let payload = CLAIMS_ENGINE.decode(standard)?;
    Ok(serde_json::from_slice(&payload)?)
}
