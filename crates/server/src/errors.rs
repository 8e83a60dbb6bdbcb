use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use service::errors::ServiceError;
use thiserror::Error;
use tracing::error;

pub const NOT_FOUND_MESSAGE: &str = "Car not found";
pub const SERVER_ERROR_MESSAGE: &str = "Server error";
pub const BAD_REQUEST_MESSAGE: &str = "Invalid JSON body";

/// Everything a car route can fail with, mapped to a status in one place.
///
/// Store failures are logged here and answered with a generic message;
/// the cause never reaches the client.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("car not found")]
    NotFound,
    #[error("malformed request body")]
    BadRequest,
    #[error(transparent)]
    Service(#[from] ServiceError),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            ApiError::NotFound | ApiError::Service(ServiceError::NotFound(_)) => {
                (StatusCode::NOT_FOUND, NOT_FOUND_MESSAGE).into_response()
            }
            ApiError::BadRequest => (StatusCode::BAD_REQUEST, BAD_REQUEST_MESSAGE).into_response(),
            ApiError::Service(e) => {
                error!(error = %e, "car store operation failed");
                (StatusCode::INTERNAL_SERVER_ERROR, SERVER_ERROR_MESSAGE).into_response()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_found_maps_to_404() {
        assert_eq!(ApiError::NotFound.into_response().status(), StatusCode::NOT_FOUND);
        let vanished = ApiError::from(ServiceError::not_found("car"));
        assert_eq!(vanished.into_response().status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn store_failures_map_to_500() {
        for e in [
            ServiceError::Db("connection reset".into()),
            ServiceError::Storage("disk full".into()),
            ServiceError::MalformedId("abc".into()),
            ServiceError::Cast("object".into()),
        ] {
            assert_eq!(ApiError::from(e).into_response().status(), StatusCode::INTERNAL_SERVER_ERROR);
        }
    }

    #[test]
    fn bad_request_maps_to_400() {
        let res = ApiError::BadRequest.into_response();
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    }
}
