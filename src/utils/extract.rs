//! Resource id extraction.
//!
//! Malformed ids in resource paths must read as 404, not as an internal
//! parsing error leaking through a 400 or 500.

use axum::{
    extract::{FromRequestParts, Path},
    http::request::Parts,
};
use uuid::Uuid;

use crate::utils::errors::AppError;

/// Path extractor for single-id routes (`/:id`) that normalizes unparseable
/// ids to `NotFound`.
#[derive(Debug, Clone, Copy)]
pub struct ResourceId(pub Uuid);

impl<S> FromRequestParts<S> for ResourceId
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(raw) = Path::<String>::from_request_parts(parts, state)
            .await
            .map_err(|_| AppError::not_found("Resource not found"))?;

        parse_resource_id(&raw).map(ResourceId)
    }
}

/// Parse a raw path segment as a resource id, treating garbage as a missing
/// resource. Multi-parameter routes call this directly.
pub fn parse_resource_id(raw: &str) -> Result<Uuid, AppError> {
    Uuid::parse_str(raw).map_err(|_| AppError::not_found("Resource not found"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;

    #[test]
    fn test_valid_uuid() {
        let id = Uuid::new_v4();
        assert_eq!(parse_resource_id(&id.to_string()).unwrap(), id);
    }

    #[test]
    fn test_malformed_id_is_not_found() {
        let err = parse_resource_id("not-a-uuid").unwrap_err();
        assert_eq!(err.status(), StatusCode::NOT_FOUND);
    }
}
