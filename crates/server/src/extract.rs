use axum::{
    async_trait,
    extract::{FromRequest, Request},
    http::{header::CONTENT_TYPE, StatusCode},
    Form, Json,
};
use models::input::fields_from_pairs;
use models::Fields;
use serde_json::Value;

use crate::errors::JsonApiError;

/// Recipe fields from either a JSON object or a url-encoded form.
///
/// A request without a `Content-Type` yields an empty field map.
#[derive(Debug, Clone, Default)]
pub struct RecipeBody(pub Fields);

#[async_trait]
impl<S> FromRequest<S> for RecipeBody
where
    S: Send + Sync,
{
    type Rejection = JsonApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let content_type = req
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(|v| v.trim().to_ascii_lowercase())
            .unwrap_or_default();

        if content_type.is_empty() {
            return Ok(Self::default());
        }

        if content_type.starts_with("application/json") {
            let Json(value) = Json::<Value>::from_request(req, state)
                .await
                .map_err(|e| JsonApiError::new(e.status(), e.body_text()))?;
            return match value {
                Value::Object(map) => Ok(Self(map)),
                _ => Err(JsonApiError::bad_request("Request body must be a JSON object")),
            };
        }

        if content_type.starts_with("application/x-www-form-urlencoded") {
            let Form(pairs) = Form::<Vec<(String, String)>>::from_request(req, state)
                .await
                .map_err(|e| JsonApiError::new(e.status(), e.body_text()))?;
            return Ok(Self(fields_from_pairs(pairs)));
        }

        Err(JsonApiError::new(
            StatusCode::UNSUPPORTED_MEDIA_TYPE,
            "Expected application/json or application/x-www-form-urlencoded",
        ))
    }
}
