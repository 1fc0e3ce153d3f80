//! JSON body extractor answering malformed bodies with the error envelope

use axum::Json;
use axum::extract::{FromRequest, Request};
use serde::de::DeserializeOwned;
use shared::ApiError;

/// Like [`Json`], but rejects with [`ApiError::Invalid`]
#[derive(Debug, Clone, Copy, Default)]
pub struct ApiJson<T>(pub T);

impl<T, S> FromRequest<S> for ApiJson<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        match Json::<T>::from_request(req, state).await {
            Ok(Json(value)) => Ok(Self(value)),
            Err(rejection) => Err(ApiError::invalid(rejection.body_text())),
        }
    }
}
