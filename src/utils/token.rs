use crate::error::{Error, Result};
use jsonwebtoken::{decode, errors::ErrorKind, Algorithm, DecodingKey, Validation};
use serde::{Deserialize, Serialize};
use std::sync::{Arc, RwLock};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: Option<String>,
    pub exp: usize,
}

/// Supplies the bearer token at the moment it is needed.
pub trait TokenSource: Send + Sync {
    fn bearer_token(&self) -> Option<String>;
}

/// Token that can be replaced while a session is running, e.g. after a
/// login prompt.
#[derive(Debug, Clone, Default)]
pub struct SharedToken {
    inner: Arc<RwLock<Option<String>>>,
}

impl SharedToken {
    pub fn new(token: Option<String>) -> Self {
        Self {
            inner: Arc::new(RwLock::new(token)),
        }
    }

    pub fn set(&self, token: Option<String>) {
        if let Ok(mut guard) = self.inner.write() {
            *guard = token;
        }
    }
}

impl TokenSource for SharedToken {
    fn bearer_token(&self) -> Option<String> {
        self.inner.read().ok().and_then(|guard| guard.clone())
    }
}

/// Returns a token fit for the `Authorization` header. Blank tokens and JWTs
/// past their `exp` are refused; opaque tokens are passed through. The
/// signature is not checked here, the server does that.
pub fn require_bearer_token(token: Option<String>) -> Result<String> {
    let Some(token) = token.map(|t| t.trim().to_string()).filter(|t| !t.is_empty()) else {
        return Err(Error::Unauthenticated("missing_authorization".to_string()));
    };

    let mut validation = Validation::new(Algorithm::HS256);
    validation.insecure_disable_signature_validation();
    validation.validate_exp = true;
    validation.validate_aud = false;
    match decode::<Claims>(&token, &DecodingKey::from_secret(&[]), &validation) {
        Ok(_) => Ok(token),
        Err(err) if matches!(err.kind(), ErrorKind::ExpiredSignature) => {
            Err(Error::Unauthenticated("token_expired".to_string()))
        }
        Err(_) => Ok(token),
    }
}
