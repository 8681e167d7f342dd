use jsonwebtoken::{
    decode, encode, errors::ErrorKind, Algorithm, DecodingKey, EncodingKey, Header, Validation,
};
use serde_json::{Map, Value};
use thiserror::Error;
use time::{Duration, OffsetDateTime};
use tracing::debug;

use super::claims::{Claims, SessionClaim, RESERVED_CLAIMS};
use crate::{config::JwtConfig, error::AppError};

const ALGORITHM: Algorithm = Algorithm::HS256;

/// Why a token was rejected. Only ever logged; clients see
/// [`AppError::Unauthorized`] for all of these.
#[derive(Debug, Error)]
pub enum TokenError {
    #[error("token expired")]
    Expired,
    #[error("token signature mismatch")]
    BadSignature,
    #[error("token subject missing or not an account id")]
    BadSubject,
    #[error("token rejected: {0}")]
    Malformed(jsonwebtoken::errors::Error),
    #[error("token signing failed: {0}")]
    Signing(jsonwebtoken::errors::Error),
}

impl From<TokenError> for AppError {
    fn from(e: TokenError) -> Self {
        match e {
            TokenError::Signing(inner) => AppError::Internal(inner.into()),
            _ => AppError::Unauthorized,
        }
    }
}

/// Signing and verification keys plus the claim settings they enforce.
/// Built once from [`JwtConfig`] at startup.
#[derive(Clone)]
pub struct TokenKeys {
    encoding: EncodingKey,
    decoding: DecodingKey,
    issuer: String,
    audience: String,
    ttl: Duration,
}

impl TokenKeys {
    pub fn new(cfg: &JwtConfig) -> Self {
        Self {
            encoding: EncodingKey::from_secret(cfg.secret.as_bytes()),
            decoding: DecodingKey::from_secret(cfg.secret.as_bytes()),
            issuer: cfg.issuer.clone(),
            audience: cfg.audience.clone(),
            ttl: Duration::minutes(cfg.ttl_minutes),
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    pub fn issue(&self, account_id: i64) -> Result<String, TokenError> {
        self.issue_with(account_id, Map::new())
    }

    pub fn issue_with(
        &self,
        account_id: i64,
        extra: Map<String, Value>,
    ) -> Result<String, TokenError> {
        self.issue_at(account_id, extra, OffsetDateTime::now_utc())
    }

    fn issue_at(
        &self,
        account_id: i64,
        mut extra: Map<String, Value>,
        now: OffsetDateTime,
    ) -> Result<String, TokenError> {
        extra.retain(|k, _| !RESERVED_CLAIMS.contains(&k.as_str()));
        let exp = now + self.ttl;
        let claims = Claims {
            sub: account_id.to_string(),
            iat: now.unix_timestamp(),
            exp: exp.unix_timestamp(),
            iss: self.issuer.clone(),
            aud: self.audience.clone(),
            extra,
        };
        let token = encode(&Header::new(ALGORITHM), &claims, &self.encoding)
            .map_err(TokenError::Signing)?;
        debug!(account_id, exp = claims.exp, "jwt signed");
        Ok(token)
    }

    pub fn verify(&self, token: &str) -> Result<SessionClaim, TokenError> {
        let mut validation = Validation::new(ALGORITHM);
        validation.leeway = 0;
        validation.set_required_spec_claims(&["exp", "sub", "iss", "aud"]);
        validation.set_audience(std::slice::from_ref(&self.audience));
        validation.set_issuer(std::slice::from_ref(&self.issuer));

        let data = decode::<Claims>(token, &self.decoding, &validation).map_err(|e| {
            let reason = classify(e);
            debug!(reason = %reason, "jwt rejected");
            reason
        })?;

        let claims = data.claims;
        let subject_id = claims.sub.parse::<i64>().map_err(|_| {
            debug!(sub = %claims.sub, "jwt subject is not an account id");
            TokenError::BadSubject
        })?;
        let expires_at =
            OffsetDateTime::from_unix_timestamp(claims.exp).map_err(|_| TokenError::Expired)?;

        debug!(account_id = subject_id, "jwt verified");
        Ok(SessionClaim {
            subject_id,
            expires_at,
            extra: claims.extra,
        })
    }
}

fn classify(e: jsonwebtoken::errors::Error) -> TokenError {
    match e.kind() {
        ErrorKind::ExpiredSignature => return TokenError::Expired,
        ErrorKind::InvalidSignature => return TokenError::BadSignature,
        ErrorKind::MissingRequiredClaim(c) if c == "sub" => return TokenError::BadSubject,
        _ => {}
    }
    TokenError::Malformed(e)
}
