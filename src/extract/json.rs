//! JSON body extractor that validates before the handler runs

use crate::error::AppError;
use async_trait::async_trait;
use axum::{
    body::HttpBody,
    extract::FromRequest,
    http::Request,
    BoxError, Json,
};
use serde::de::DeserializeOwned;
use validator::Validate;

/// Deserializes a JSON body into `T` and runs its [`Validate`] rules.
///
/// Any failure is turned into an [`AppError`]: malformed JSON, missing
/// fields and failed validators answer `422`, a body sent without the
/// JSON content type answers `415`.
#[derive(Debug, Clone, Copy, Default)]
pub struct ValidatedJson<T>(pub T);

#[async_trait]
impl<T, S, B> FromRequest<S, B> for ValidatedJson<T>
where
    T: DeserializeOwned + Validate,
    B: HttpBody + Send + 'static,
    B::Data: Send,
    B::Error: Into<BoxError>,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request<B>, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state).await?;

        value.validate()?;

        Ok(Self(value))
    }
}
