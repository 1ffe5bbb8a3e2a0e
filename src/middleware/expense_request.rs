use axum::{
    Json,
    extract::{FromRequest, FromRequestParts, Path, Request},
    http::request::Parts,
};
use serde::de::DeserializeOwned;

use crate::error::GastosError;
use crate::types::api::ExpenseInput;

/// JSON body of a create/update call. Any rejection (wrong content type,
/// malformed JSON, wrong field types) becomes a `Validation` error so the
/// client always gets `{"success": false, "error": ...}` with 400.
pub struct ExpensePayload(pub ExpenseInput);

impl<S> FromRequest<S> for ExpensePayload
where
    S: Send + Sync,
{
    type Rejection = GastosError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(input) = Json::<ExpenseInput>::from_request(req, state)
            .await
            .map_err(|rejection| GastosError::validation(rejection.body_text()))?;
        Ok(ExpensePayload(input))
    }
}

/// Path parameters with the same error shape as the body extractor.
pub struct ApiPath<T>(pub T);

impl<S, T> FromRequestParts<S> for ApiPath<T>
where
    S: Send + Sync,
    T: DeserializeOwned + Send,
{
    type Rejection = GastosError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(value) = Path::<T>::from_request_parts(parts, state)
            .await
            .map_err(|rejection| GastosError::validation(rejection.body_text()))?;
        Ok(ApiPath(value))
    }
}
