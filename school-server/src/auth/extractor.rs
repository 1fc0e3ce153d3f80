//! CurrentUser Extractor
//!
//! Reads the identity placed by [`resolve_identity`](super::resolve_identity).
//! Handlers behind a guard can take `user: CurrentUser` directly.

use axum::{extract::FromRequestParts, http::request::Parts};
use shared::ApiError;

use crate::auth::CurrentUser;

impl<S> FromRequestParts<S> for CurrentUser
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<CurrentUser>()
            .cloned()
            .ok_or(ApiError::Forbidden)
    }
}
