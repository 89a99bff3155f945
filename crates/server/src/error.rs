//! Unified error handling for the HTTP layer.
//!
//! Provides a unified `ApiError` type that maps service errors and
//! validation failures onto the wire format. All route handlers should
//! return `Result<T, ApiError>`.
//!
//! Every error body carries `timestamp`, `status`, `error` and `message`;
//! validation failures additionally carry a `fieldErrors` map with one
//! entry per failed field.

use std::collections::BTreeMap;

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use chrono::Utc;
use thiserror::Error;

use crate::services::ServiceError;

/// Application-level error type for the API.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Business operation failed.
    #[error(transparent)]
    Service(#[from] ServiceError),

    /// Request body failed validation; one message per failed field.
    #[error("validation failed")]
    Validation(BTreeMap<String, String>),
}

impl ApiError {
    /// Status code and error label for this error.
    fn status_and_label(&self) -> (StatusCode, &'static str) {
        match self {
            Self::Service(err) => match err {
                ServiceError::CustomerNotFound(_) => (StatusCode::NOT_FOUND, "Customer not found"),
                ServiceError::AddressNotFound(_) => (StatusCode::NOT_FOUND, "Address not found"),
                ServiceError::ProductNotFound(_) => (StatusCode::NOT_FOUND, "Product not found"),
                ServiceError::OrderNotFound(_) => (StatusCode::NOT_FOUND, "Order not found"),
                ServiceError::OrderItemNotFound(_) => {
                    (StatusCode::NOT_FOUND, "Order Item not found")
                }
                ServiceError::Repository(_) => {
                    (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error")
                }
            },
            Self::Validation(_) => (StatusCode::BAD_REQUEST, "Validation failed"),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        if let Self::Service(ServiceError::Repository(ref err)) = self {
            tracing::error!(error = %err, "request failed");
        }

        let (status, label) = self.status_and_label();

        // Repository details stay server-side.
        let message = match &self {
            Self::Service(ServiceError::Repository(_)) => "Internal server error".to_owned(),
            Self::Service(err) => err.to_string(),
            Self::Validation(_) => "Validation failed".to_owned(),
        };

        let mut body = serde_json::json!({
            "timestamp": Utc::now().to_rfc3339(),
            "status": status.as_u16(),
            "error": label,
            "message": message,
        });

        if let Self::Validation(field_errors) = &self {
            body["fieldErrors"] = serde_json::json!(field_errors);
        }

        (status, Json(body)).into_response()
    }
}

/// Result type alias for `ApiError`.
pub type Result<T> = std::result::Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use chicken_direct_core::{CustomerId, OrderItemId};

    use super::*;

    #[test]
    fn test_not_found_status_and_message() {
        let err = ApiError::Service(ServiceError::CustomerNotFound(CustomerId::new(9999)));
        assert_eq!(err.to_string(), "Customer with id 9999 not found");

        let (status, label) = err.status_and_label();
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(label, "Customer not found");
    }

    #[test]
    fn test_order_item_label_keeps_its_spacing() {
        let err = ApiError::Service(ServiceError::OrderItemNotFound(OrderItemId::new(3)));
        let (_, label) = err.status_and_label();
        assert_eq!(label, "Order Item not found");
    }

    #[test]
    fn test_validation_maps_to_bad_request() {
        let mut fields = BTreeMap::new();
        fields.insert("name".to_owned(), "must not be blank".to_owned());
        let err = ApiError::Validation(fields);

        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_repository_errors_are_opaque() {
        let err = ApiError::Service(ServiceError::Repository(
            crate::db::RepositoryError::DataCorruption("bad decimal".to_owned()),
        ));

        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
