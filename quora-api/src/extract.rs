use axum::extract::{FromRequest, FromRequestParts, Request};
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;
use axum::Json;
use quora_app::AppContext;
use quora_errors::AppError;
use serde::de::DeserializeOwned;
use uuid::Uuid;

/// The authenticated caller, resolved from the bearer token.
#[derive(Debug, Clone, Copy)]
pub struct Identity {
    pub account_id: Uuid,
}

impl FromRequestParts<AppContext> for Identity {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, ctx: &AppContext) -> Result<Self, Self::Rejection> {
        let header = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .ok_or_else(|| AppError::Unauthorized("missing authorization header".to_string()))?;

        let account_id = ctx.tokens.account_from_header(header)?;
        Ok(Self { account_id })
    }
}

/// JSON body whose decoding failures become `AppError::MalformedPayload`.
pub struct Payload<T>(pub T);

impl<S, T> FromRequest<S> for Payload<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state).await?;
        Ok(Self(value))
    }
}

pub fn parse_id(field: &str, raw: &str) -> Result<Uuid, AppError> {
    Uuid::parse_str(raw.trim()).map_err(|_| AppError::validation(field, "must be a valid UUID"))
}
