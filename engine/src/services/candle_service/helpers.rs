// Helper functions for the candle_service handlers
use axum::{
    async_trait,
    body::{to_bytes, Body},
    extract::{FromRequest, Request},
    http::{header, HeaderMap, StatusCode},
    Form, Json,
};
use serde::de::DeserializeOwned;
use shared::models::MessageResponse;
use shared::utils::parse_decimal_u16;

use crate::error::EngineError;

const BODY_LIMIT: usize = 2 * 1024 * 1024;

pub type RejectionReply = (StatusCode, Json<MessageResponse>);

pub fn invalid_request() -> RejectionReply {
    (StatusCode::BAD_REQUEST, Json(MessageResponse::new("invalid request")))
}

/// Body of the login and flag endpoints.
///
/// An empty body binds as `T::default()`. Otherwise an urlencoded form is
/// read by field name and everything else goes through the JSON extractor,
/// which rejects a missing or foreign content type.
pub struct BoundBody<T>(pub T);

#[async_trait]
impl<T, S> FromRequest<S> for BoundBody<T>
where
    T: DeserializeOwned + Default + Send,
    S: Send + Sync,
{
    type Rejection = RejectionReply;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let is_form = has_form_content_type(req.headers());
        let (parts, body) = req.into_parts();
        let bytes = to_bytes(body, BODY_LIMIT).await.map_err(|e| {
            tracing::warn!(error = %e, "Failed to read request body");
            invalid_request()
        })?;
        if bytes.is_empty() {
            return Ok(BoundBody(T::default()));
        }

        let req = Request::from_parts(parts, Body::from(bytes));
        let bound = if is_form {
            Form::<T>::from_request(req, state)
                .await
                .map(|Form(value)| value)
                .map_err(|rejection| rejection.body_text())
        } else {
            Json::<T>::from_request(req, state)
                .await
                .map(|Json(value)| value)
                .map_err(|rejection| rejection.body_text())
        };

        bound.map(BoundBody).map_err(|error| {
            tracing::warn!(%error, "Rejecting request body");
            invalid_request()
        })
    }
}

fn has_form_content_type(headers: &HeaderMap) -> bool {
    headers
        .get(header::CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.split(';').next())
        .is_some_and(|mime| mime.trim().eq_ignore_ascii_case("application/x-www-form-urlencoded"))
}

// First value wins for repeated keys; an absent key reads as "".
pub fn query_param<'a>(params: &'a [(String, String)], name: &str) -> &'a str {
    params
        .iter()
        .find(|(key, _)| key == name)
        .map_or("", |(_, value)| value.as_str())
}

pub fn parse_query_field(params: &[(String, String)], name: &str) -> Result<u16, EngineError> {
    let raw = query_param(params, name);
    parse_decimal_u16(raw).map_err(|e| {
        tracing::debug!(field = name, value = raw, error = %e, "Query field is not a u16");
        EngineError::invalid_input(name)
    })
}
