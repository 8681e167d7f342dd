use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use time::OffsetDateTime;

/// Claim names owned by the issuer; extra claims cannot override them.
pub const RESERVED_CLAIMS: [&str; 5] = ["sub", "iat", "exp", "iss", "aud"];

/// JWT payload as it travels on the wire.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String, // account id, decimal
    pub iat: i64,
    pub exp: i64,
    pub iss: String,
    pub aud: String,
    #[serde(flatten, default)]
    pub extra: Map<String, Value>,
}

/// A verified session: who the bearer is and until when.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionClaim {
    pub subject_id: i64,
    pub expires_at: OffsetDateTime,
    pub extra: Map<String, Value>,
}
