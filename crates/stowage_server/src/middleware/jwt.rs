//! Bearer-token authentication for mutating routes.
//!
//! Tokens are HS256 JWTs signed with `STOWAGE_JWT_SECRET`. On success the
//! caller's `Principal` is inserted as a request extension; anything else
//! is answered with 401 before the handler runs.

use axum::{
    extract::Request,
    http::header::AUTHORIZATION,
    middleware::Next,
    response::Response,
    Extension,
};
use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};
use stowage_core::error::LocationError;
use stowage_core::principal::{JwtClaims, Principal};

use crate::error::AppError;

#[derive(Clone)]
pub struct JwtConfig {
    decoding_key: DecodingKey,
    validation: Validation,
}

impl JwtConfig {
    pub fn from_secret(secret: &[u8]) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        // `exp` is checked when present but not required.
        validation.required_spec_claims.clear();
        Self {
            decoding_key: DecodingKey::from_secret(secret),
            validation,
        }
    }

    pub fn authenticate(&self, token: &str) -> Result<Principal, LocationError> {
        let data = decode::<JwtClaims>(token, &self.decoding_key, &self.validation)
            .map_err(|e| LocationError::Unauthorized(format!("invalid token: {e}")))?;
        Principal::from_jwt_claims(&data.claims)
    }
}

fn bearer_token(request: &Request) -> Result<&str, LocationError> {
    let header = request
        .headers()
        .get(AUTHORIZATION)
        .ok_or_else(|| LocationError::Unauthorized("missing Authorization header".into()))?;
    let value = header
        .to_str()
        .map_err(|_| LocationError::Unauthorized("malformed Authorization header".into()))?;
    value
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .ok_or_else(|| LocationError::Unauthorized("expected a Bearer token".into()))
}

pub async fn jwt_auth(
    Extension(config): Extension<JwtConfig>,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let principal = match bearer_token(&request).and_then(|t| config.authenticate(t)) {
        Ok(p) => p,
        Err(e) => {
            tracing::debug!("rejected request: {}", e);
            return Err(e.into());
        }
    };
    request.extensions_mut().insert(principal);
    Ok(next.run(request).await)
}
