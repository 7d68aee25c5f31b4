//! Error to response mapping

use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use thiserror::Error;
use tracing::warn;
use valloc_types::Error;

/// Errors a handler can return
#[derive(Debug, Error)]
pub enum ApiError {
    #[error(transparent)]
    Service(#[from] Error),

    /// The request body could not be read as the expected JSON
    #[error("invalid request body: {0}")]
    Body(String),
}

#[derive(Debug, Serialize)]
struct FieldDetail<'a> {
    field: &'a str,
    message: &'a str,
}

#[derive(Debug, Serialize)]
struct ErrorBody<'a> {
    error: &'static str,
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<Vec<FieldDetail<'a>>>,
}

impl ApiError {
    /// - Validation, malformed body, inverted report range: 422
    /// - NotFound: 404
    /// - Conflict: 409
    /// - Store, I/O and everything else: 500
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::Body(_) => StatusCode::UNPROCESSABLE_ENTITY,
            Self::Service(e) => match e {
                Error::Validation(_) | Error::InvalidRange { .. } => {
                    StatusCode::UNPROCESSABLE_ENTITY
                }
                Error::NotFound { .. } => StatusCode::NOT_FOUND,
                Error::Conflict(_) => StatusCode::CONFLICT,
                _ => StatusCode::INTERNAL_SERVER_ERROR,
            },
        }
    }

    /// Machine-readable error kind
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Body(_) => "validation_error",
            Self::Service(e) => match e {
                Error::Validation(_) => "validation_error",
                Error::InvalidRange { .. } => "invalid_range",
                Error::NotFound { .. } => "not_found",
                Error::Conflict(_) => "conflict",
                _ => "internal_error",
            },
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self::Body(rejection.body_text())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        // Service errors were already logged by FleetService; internal
        // failures are never echoed to the client
        let message = match &self {
            _ if status.is_server_error() => "internal server error".to_string(),
            Self::Service(e) => e.to_string(),
            Self::Body(detail) => {
                warn!(error = %detail, "malformed request body");
                format!("invalid request body: {}", detail)
            }
        };

        let details = match &self {
            Self::Service(Error::Validation(fields)) => Some(
                fields
                    .iter()
                    .map(|f| FieldDetail {
                        field: f.field.as_str(),
                        message: f.message.as_str(),
                    })
                    .collect(),
            ),
            _ => None,
        };

        let body = ErrorBody {
            error: self.kind(),
            message,
            details,
        };
        (status, Json(body)).into_response()
    }
}

pub type ApiResult<T> = std::result::Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    use chrono::NaiveDate;
    use tracing::{Event, Subscriber};
    use tracing_subscriber::layer::{Context, Layer, SubscriberExt};
    use valloc_types::EntityKind;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, d).unwrap()
    }

    #[test]
    fn test_status_codes() {
        let cases = [
            (Error::validation("name", "required"), StatusCode::UNPROCESSABLE_ENTITY),
            (
                Error::InvalidRange {
                    start: day(31),
                    end: day(1),
                },
                StatusCode::UNPROCESSABLE_ENTITY,
            ),
            (Error::not_found(EntityKind::Vehicle, "v1"), StatusCode::NOT_FOUND),
            (Error::conflict("double booking"), StatusCode::CONFLICT),
            (
                Error::Store("disk full".to_string()),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];
        for (err, status) in cases {
            assert_eq!(ApiError::from(err).status_code(), status);
        }
        assert_eq!(
            ApiError::Body("expected value".to_string()).status_code(),
            StatusCode::UNPROCESSABLE_ENTITY
        );
    }

    #[test]
    fn test_kinds() {
        assert_eq!(ApiError::from(Error::conflict("x")).kind(), "conflict");
        assert_eq!(
            ApiError::from(Error::not_found(EntityKind::Driver, "d1")).kind(),
            "not_found"
        );
        assert_eq!(
            ApiError::from(Error::Store("x".to_string())).kind(),
            "internal_error"
        );
        assert_eq!(ApiError::Body("x".to_string()).kind(), "validation_error");
    }

    async fn body_json(response: Response) -> serde_json::Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    /// Counts every event that reaches the subscriber
    struct EventCount(Arc<AtomicUsize>);

    impl<S: Subscriber> Layer<S> for EventCount {
        fn on_event(&self, _event: &Event<'_>, _ctx: Context<'_, S>) {
            self.0.fetch_add(1, Ordering::SeqCst);
        }
    }

    fn events_logged(f: impl FnOnce()) -> usize {
        let count = Arc::new(AtomicUsize::new(0));
        let subscriber = tracing_subscriber::registry().with(EventCount(count.clone()));
        tracing::subscriber::with_default(subscriber, f);
        count.load(Ordering::SeqCst)
    }

    #[tokio::test]
    async fn test_internal_errors_do_not_leak_details() {
        let response = ApiError::from(Error::Store("secret path /var/x".to_string())).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let body = body_json(response).await;
        let text = body.to_string();
        assert!(!text.contains("secret path"));
        assert_eq!(body["error"], "internal_error");
        assert_eq!(body["message"], "internal server error");
    }

    #[tokio::test]
    async fn test_client_errors_carry_message() {
        let response = ApiError::from(Error::conflict("vehicle already booked")).into_response();
        assert_eq!(response.status(), StatusCode::CONFLICT);
        let body = body_json(response).await;
        assert_eq!(body["message"], "Conflict: vehicle already booked");
    }

    #[test]
    fn test_service_errors_are_not_logged_again() {
        let logged = events_logged(|| {
            let _ = ApiError::from(Error::conflict("double booking")).into_response();
            let _ = ApiError::from(Error::Store("disk full".to_string())).into_response();
        });
        assert_eq!(logged, 0);

        let logged = events_logged(|| {
            let _ = ApiError::Body("expected value".to_string()).into_response();
        });
        assert_eq!(logged, 1);
    }
}
