use crate::error::LocationError;

/// The authenticated caller behind a mutating request.
#[derive(Debug, Clone)]
pub struct Principal {
    pub actor_id: String,
}

impl Principal {
    /// Construct from validated JWT claims at the server boundary.
    /// Core logic never reads raw tokens.
    pub fn from_jwt_claims(claims: &JwtClaims) -> Result<Self, LocationError> {
        let actor_id = claims
            .sub
            .clone()
            .filter(|s| !s.trim().is_empty())
            .ok_or_else(|| LocationError::Unauthorized("missing sub claim".into()))?;
        Ok(Self { actor_id })
    }

    /// Construct explicitly for in-process callers and tests.
    pub fn in_process(actor_id: impl Into<String>) -> Self {
        Self {
            actor_id: actor_id.into(),
        }
    }
}

/// JWT claims shape expected from the identity provider. Only `sub` is
/// read; other claims are ignored.
#[derive(Debug, serde::Deserialize)]
pub struct JwtClaims {
    pub sub: Option<String>,
}
