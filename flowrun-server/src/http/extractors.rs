//! Custom Axum extractors

use axum::extract::{FromRequestParts, Path};
use axum::http::request::Parts;

use super::error::ApiError;

/// Flow id from the path, checked before it becomes a CLI argument
pub struct ValidFlowId(pub String);

impl ValidFlowId {
    pub fn parse(id: &str) -> Result<Self, ApiError> {
        let reason = if id.trim().is_empty() {
            Some("must not be empty")
        } else if id.starts_with('-') {
            Some("must not start with '-'")
        } else if id.chars().any(|c| c.is_whitespace() || c.is_control()) {
            Some("must not contain whitespace")
        } else {
            None
        };

        match reason {
            Some(reason) => Err(ApiError::InvalidFlowId {
                id: id.to_string(),
                reason,
            }),
            None => Ok(Self(id.to_string())),
        }
    }
}

impl<S> FromRequestParts<S> for ValidFlowId
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(id): Path<String> = Path::from_request_parts(parts, state)
            .await
            .map_err(|_| ApiError::InvalidFlowId {
                id: String::new(),
                reason: "missing from path",
            })?;

        Self::parse(&id)
    }
}
