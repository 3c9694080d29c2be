use axum::Json;
use axum::extract::{FromRequest, FromRequestParts, Query, Request};
use axum::http::request::Parts;
use serde::de::DeserializeOwned;
use tracing::warn;

use crate::error::{ApiError, UserError};
use crate::types::Validate;

/// JSON body that has been deserialized and passed [`Validate`].
pub struct ValidatedJson<T>(pub T);

impl<S, T> FromRequest<S> for ValidatedJson<T>
where
    S: Send + Sync,
    T: DeserializeOwned + Validate + Send,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let path = req.uri().path().to_string();

        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(|rejection| {
                let err = UserError::MalformedRequest {
                    status: rejection.status(),
                    reason: rejection.body_text(),
                };
                ApiError::new(err, path.as_str())
            })?;

        if let Err(e) = value.validate() {
            warn!(path = %path, input = %e.input(), "request body failed validation");
            return Err(ApiError::new(e, path));
        }
        Ok(Self(value))
    }
}

/// Query string that has been deserialized and passed [`Validate`].
pub struct ValidatedQuery<T>(pub T);

impl<S, T> FromRequestParts<S> for ValidatedQuery<T>
where
    S: Send + Sync,
    T: DeserializeOwned + Validate + Send,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let path = parts.uri.path().to_string();

        let Query(value) = Query::<T>::from_request_parts(parts, state)
            .await
            .map_err(|rejection| {
                let err = UserError::MalformedRequest {
                    status: rejection.status(),
                    reason: rejection.body_text(),
                };
                ApiError::new(err, path.as_str())
            })?;

        if let Err(e) = value.validate() {
            warn!(path = %path, input = %e.input(), "query string failed validation");
            return Err(ApiError::new(e, path));
        }
        Ok(Self(value))
    }
}
