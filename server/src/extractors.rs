use axum::{
    async_trait,
    extract::{FromRequestParts, Path},
    http::request::Parts,
};
use eyre::eyre;

use crate::http_error::HttpError;

/// Numeric id from the last path segment.
///
/// Only plain decimal digits that fit an `i64` are ids. Anything else, negative
/// numbers included, can't name a stored row, so the route is reported as not found.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RowId(pub i64);

#[async_trait]
impl<S> FromRequestParts<S> for RowId
where
    S: Send + Sync,
{
    type Rejection = HttpError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(raw): Path<String> = Path::from_request_parts(parts, state)
            .await
            .map_err(|err| HttpError::not_found(eyre::Report::new(err)))?;
        parse_row_id(&raw)
            .map(RowId)
            .ok_or_else(|| HttpError::not_found(eyre!("'{}' is not a valid id", raw)))
    }
}

fn parse_row_id(raw: &str) -> Option<i64> {
    if raw.is_empty() || !raw.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    raw.parse().ok()
}
