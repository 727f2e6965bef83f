use axum::http::StatusCode;
use axum::response::IntoResponse;
use serde_json::json;

use taproom_catalog::ServiceError;
use taproom_core::{DomainError, StoreError};

pub fn service_error_to_response(err: ServiceError) -> axum::response::Response {
    match err {
        ServiceError::Domain(DomainError::Validation(msg)) => {
            json_error(StatusCode::BAD_REQUEST, "validation_error", msg)
        }
        ServiceError::Domain(DomainError::InvalidId(msg)) => json_error(StatusCode::BAD_REQUEST, "invalid_id", msg),
        ServiceError::Store(e) => store_error_to_response(e),
    }
}

fn store_error_to_response(err: StoreError) -> axum::response::Response {
    tracing::warn!(error = %err, "store failure");
    match err {
        StoreError::Unavailable(msg) => json_error(StatusCode::SERVICE_UNAVAILABLE, "store_unavailable", msg),
        StoreError::MissingRow(id) => json_error(StatusCode::NOT_FOUND, "not_found", format!("no record with id {id}")),
        StoreError::Corrupt(msg) => json_error(StatusCode::INTERNAL_SERVER_ERROR, "store_error", msg),
    }
}

pub fn not_found(kind: &str, id: impl core::fmt::Display) -> axum::response::Response {
    json_error(StatusCode::NOT_FOUND, "not_found", format!("{kind} {id} not found"))
}

pub fn json_error(
    status: StatusCode,
    code: &'static str,
    message: impl Into<String>,
) -> axum::response::Response {
    (
        status,
        axum::Json(json!({
            "error": code,
            "message": message.into(),
        })),
    )
        .into_response()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn service_errors_map_to_statuses() {
        let cases = [
            (ServiceError::Domain(DomainError::validation("beerName: must not be blank")), StatusCode::BAD_REQUEST),
            (ServiceError::Domain(DomainError::invalid_id("abc")), StatusCode::BAD_REQUEST),
            (ServiceError::Store(StoreError::unavailable("down")), StatusCode::SERVICE_UNAVAILABLE),
            (ServiceError::Store(StoreError::corrupt("bad row")), StatusCode::INTERNAL_SERVER_ERROR),
        ];

        for (err, status) in cases {
            assert_eq!(service_error_to_response(err).status(), status);
        }
    }
}
