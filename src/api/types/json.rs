//! JSON request body extractor for the `{url}` load endpoints

use axum::extract::rejection::JsonRejection;
use axum::extract::{FromRequest, Request};
use axum::Json;
use serde::de::DeserializeOwned;

use super::error::{ApiError, ApiErrorType};

/// Extracts a JSON body, rejecting with the API error format
/// (`code = json_parse_error`) instead of axum's plain-text rejection.
#[derive(Debug)]
pub struct JsonBody<T>(pub T);

impl<S, T> FromRequest<S> for JsonBody<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        Json::<T>::from_request(req, state)
            .await
            .map(|Json(value)| JsonBody(value))
            .map_err(reject)
    }
}

fn reject(rejection: JsonRejection) -> ApiError {
    let error = ApiError::new(
        rejection.status(),
        ApiErrorType::InvalidRequestError,
        rejection_message(&rejection),
    )
    .with_code("json_parse_error");

    match rejection {
        JsonRejection::JsonDataError(_) => error.with_param("url"),
        _ => error,
    }
}

fn rejection_message(rejection: &JsonRejection) -> String {
    match rejection {
        JsonRejection::JsonDataError(err) => format!(
            "Expected a JSON object with a string 'url' field: {}",
            err.body_text()
        ),
        JsonRejection::JsonSyntaxError(err) => {
            format!("Request body is not valid JSON: {}", err.body_text())
        }
        JsonRejection::MissingJsonContentType(_) => {
            "Missing Content-Type header. Expected 'application/json'.".to_string()
        }
        other => format!("Failed to read request body: {}", other.body_text()),
    }
}
