// Error-to-response mapping
// Decision: Handlers return ApiError, which wraps the domain Error and renders the error envelope
// Decision: Internal details never reach the body here; they ride along in an ErrorDetail
// extension and `expose_error_detail` copies them into `message` in development only

use std::any::Any;

use agentry_core::{Error, ValidationErrors};
use axum::{
    extract::{rejection::JsonRejection, Request, State},
    http::{header, HeaderValue, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};

use super::common::ErrorResponse;
use crate::config::DeploymentMode;

pub const VALIDATION_ERROR: &str = "Validation Error";
pub const AGENT_NOT_FOUND: &str = "Agent not found";
pub const SESSION_NOT_FOUND: &str = "Chat session not found";
pub const TOO_MANY_REQUESTS: &str = "Too many requests, please try again later";
pub const INTERNAL_ERROR: &str = "Internal server error";

const GENERIC_INTERNAL_MESSAGE: &str = "Something went wrong";

/// Internal error text attached to 500 responses.
#[derive(Debug, Clone)]
pub struct ErrorDetail(pub String);

/// Error returned by every API handler.
#[derive(Debug)]
pub struct ApiError(pub Error);

impl From<Error> for ApiError {
    fn from(err: Error) -> Self {
        Self(err)
    }
}

impl From<ValidationErrors> for ApiError {
    fn from(errors: ValidationErrors) -> Self {
        Self(Error::Validation(errors))
    }
}

/// Unparseable bodies are reported as a violation on the `body` field.
impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self(Error::Validation(ValidationErrors::single(
            "body",
            rejection.body_text(),
        )))
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self.0 {
            Error::Validation(errors) => {
                tracing::debug!(errors = %errors, "Request validation failed");
                ErrorResponse::new(VALIDATION_ERROR)
                    .with_message("Request validation failed")
                    .with_errors(errors.errors)
                    .into_response(StatusCode::BAD_REQUEST)
                    .into_response()
            }
            Error::AgentNotFound(id) => ErrorResponse::new(AGENT_NOT_FOUND)
                .with_message(format!("No agent with id {}", id))
                .into_response(StatusCode::NOT_FOUND)
                .into_response(),
            Error::SessionNotFound(id) => ErrorResponse::new(SESSION_NOT_FOUND)
                .with_message(format!("No chat session with id {}", id))
                .into_response(StatusCode::NOT_FOUND)
                .into_response(),
            Error::RateLimited { retry_after } => rate_limited_response(retry_after.as_secs()),
            Error::Internal(err) => {
                tracing::error!("Internal error: {:#}", err);
                internal_error_response(format!("{:#}", err))
            }
        }
    }
}

/// 429 envelope with a `Retry-After` header.
pub fn rate_limited_response(retry_after_secs: u64) -> Response {
    let retry_after_secs = retry_after_secs.max(1);
    let mut response = ErrorResponse::new(TOO_MANY_REQUESTS)
        .with_message(format!("Retry after {} seconds", retry_after_secs))
        .into_response(StatusCode::TOO_MANY_REQUESTS)
        .into_response();
    response
        .headers_mut()
        .insert(header::RETRY_AFTER, HeaderValue::from(retry_after_secs));
    response
}

fn internal_error_response(detail: String) -> Response {
    let mut response = ErrorResponse::new(INTERNAL_ERROR)
        .with_message(GENERIC_INTERNAL_MESSAGE)
        .into_response(StatusCode::INTERNAL_SERVER_ERROR)
        .into_response();
    response.extensions_mut().insert(ErrorDetail(detail));
    response
}

/// Middleware: in development mode, replace the generic 500 message with the
/// recorded detail.
pub async fn expose_error_detail(
    State(mode): State<DeploymentMode>,
    request: Request,
    next: Next,
) -> Response {
    let response = next.run(request).await;
    if !mode.is_development() {
        return response;
    }
    match response.extensions().get::<ErrorDetail>() {
        Some(ErrorDetail(detail)) => {
            let status = response.status();
            let body = ErrorResponse::new(INTERNAL_ERROR).with_message(detail.clone());
            (status, Json(body)).into_response()
        }
        None => response,
    }
}

/// Response for a panic caught inside a handler.
pub fn panic_response(mode: DeploymentMode, err: Box<dyn Any + Send + 'static>) -> Response {
    let detail = if let Some(s) = err.downcast_ref::<String>() {
        s.clone()
    } else if let Some(s) = err.downcast_ref::<&str>() {
        s.to_string()
    } else {
        "Unknown panic message".to_string()
    };
    tracing::error!(panic = %detail, "Handler panicked");

    let message = if mode.is_development() {
        detail
    } else {
        GENERIC_INTERNAL_MESSAGE.to_string()
    };
    ErrorResponse::new(INTERNAL_ERROR)
        .with_message(message)
        .into_response(StatusCode::INTERNAL_SERVER_ERROR)
        .into_response()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    async fn body_json(response: Response) -> serde_json::Value {
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&body).unwrap()
    }

    #[tokio::test]
    async fn test_validation_response_lists_every_field() {
        let mut errors = ValidationErrors::single("name", "Name is required");
        errors
            .errors
            .extend(ValidationErrors::single("model", "Invalid model").errors);
        let response = ApiError::from(errors).into_response();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let json = body_json(response).await;
        assert_eq!(json["success"], false);
        assert_eq!(json["error"], VALIDATION_ERROR);
        assert_eq!(json["errors"].as_array().unwrap().len(), 2);
        assert_eq!(json["errors"][1]["field"], "model");
    }

    #[tokio::test]
    async fn test_not_found_responses() {
        let response = ApiError::from(Error::agent_not_found("agent_9")).into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(body_json(response).await["error"], AGENT_NOT_FOUND);

        let response = ApiError::from(Error::session_not_found("chat_9")).into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(body_json(response).await["error"], SESSION_NOT_FOUND);
    }

    #[tokio::test]
    async fn test_rate_limited_response() {
        let response = ApiError::from(Error::RateLimited {
            retry_after: Duration::from_secs(42),
        })
        .into_response();

        assert_eq!(response.status(), StatusCode::TOO_MANY_REQUESTS);
        assert_eq!(response.headers()[header::RETRY_AFTER], "42");
        let json = body_json(response).await;
        assert_eq!(json["error"], TOO_MANY_REQUESTS);
        assert_eq!(json["message"], "Retry after 42 seconds");
    }

    #[tokio::test]
    async fn test_internal_error_hides_detail() {
        let response =
            ApiError::from(Error::Internal(anyhow::anyhow!("disk on fire"))).into_response();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let detail = response.extensions().get::<ErrorDetail>().cloned().unwrap();
        assert_eq!(detail.0, "disk on fire");

        let json = body_json(response).await;
        assert_eq!(json["error"], INTERNAL_ERROR);
        assert_eq!(json["message"], GENERIC_INTERNAL_MESSAGE);
    }

    #[tokio::test]
    async fn test_panic_response_respects_mode() {
        let response = panic_response(DeploymentMode::Production, Box::new("boom"));
        assert_eq!(body_json(response).await["message"], GENERIC_INTERNAL_MESSAGE);

        let response = panic_response(DeploymentMode::Development, Box::new("boom".to_string()));
        assert_eq!(body_json(response).await["message"], "boom");
    }
}
