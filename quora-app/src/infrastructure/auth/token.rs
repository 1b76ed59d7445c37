use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};
use quora_errors::AppError;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

const BEARER_SCHEME: &str = "Bearer";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    #[serde(rename = "accountId")]
    pub account_id: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub username: String,
    pub exp: u64,
}

/// Resolves the caller's account id from an HS256 access token.
#[derive(Clone)]
pub struct TokenDecoder {
    key: DecodingKey,
    validation: Validation,
}

impl TokenDecoder {
    pub fn new(secret: &str) -> Self {
        Self {
            key: DecodingKey::from_secret(secret.as_bytes()),
            validation: Validation::new(Algorithm::HS256),
        }
    }

    /// Accepts the raw `Authorization` header value.
    pub fn account_from_header(&self, header: &str) -> Result<Uuid, AppError> {
        let mut parts = header.split(' ');
        let (scheme, token) = match (parts.next(), parts.next(), parts.next()) {
            (Some(scheme), Some(token), None) => (scheme, token),
            _ => return Err(AppError::Unauthorized("token has invalid segment".to_string())),
        };

        if scheme != BEARER_SCHEME {
            return Err(AppError::Unauthorized("token has invalid scheme".to_string()));
        }

        self.account_from_token(token)
    }

    pub fn account_from_token(&self, token: &str) -> Result<Uuid, AppError> {
        let data = decode::<Claims>(token, &self.key, &self.validation).map_err(|e| {
            tracing::debug!("Rejected access token: {}", e);
            AppError::Unauthorized("invalid token".to_string())
        })?;

        Uuid::parse_str(&data.claims.account_id)
            .map_err(|_| AppError::Unauthorized("invalid token".to_string()))
    }
}
