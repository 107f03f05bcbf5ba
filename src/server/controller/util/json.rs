use axum::{
    extract::{rejection::JsonRejection, FromRequest, Request},
    Json,
};

use crate::server::error::{
    validation::{ValidationError, NON_FIELD_ERRORS},
    Error,
};

/// JSON body extractor whose rejections are rendered as field-keyed validation errors
///
/// Plain `Json` rejects malformed bodies with a text response; this keeps every 400 of the
/// API in the same `{"field": ["message"]}` shape.
pub struct ValidJson<T>(pub T);

impl<S, T> FromRequest<S> for ValidJson<T>
where
    Json<T>: FromRequest<S, Rejection = JsonRejection>,
    S: Send + Sync,
{
    type Rejection = Error;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        match Json::<T>::from_request(req, state).await {
            Ok(Json(value)) => Ok(Self(value)),
            Err(rejection) => {
                Err(ValidationError::field(NON_FIELD_ERRORS, rejection.body_text()).into())
            }
        }
    }
}
