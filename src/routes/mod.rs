// Route exports
pub mod applications;
pub mod catalog;
pub mod debug;
pub mod matches;

use actix_web::{error, http::StatusCode, web, HttpRequest, HttpResponse};

use crate::models::ErrorResponse;
use crate::services::StoreError;

pub use matches::AppState;

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.app_data(web::JsonConfig::default().error_handler(handle_json_payload_error))
        .app_data(web::QueryConfig::default().error_handler(handle_query_payload_error))
        .service(
            web::scope("/api/v1")
                .configure(matches::configure)
                .configure(catalog::configure)
                .configure(applications::configure)
                .configure(debug::configure),
        );
}

/// JSON error response for JSON payload errors
#[derive(Debug, serde::Serialize)]
pub struct JsonError {
    pub error: String,
    pub message: String,
    pub status_code: u16,
}

impl std::fmt::Display for JsonError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.error, self.message)
    }
}

impl std::error::Error for JsonError {}

impl error::ResponseError for JsonError {
    fn status_code(&self) -> StatusCode {
        StatusCode::from_u16(self.status_code).unwrap_or(StatusCode::BAD_REQUEST)
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code()).json(ErrorResponse {
            error: self.error.clone(),
            message: self.message.clone(),
            status_code: self.status_code,
        })
    }
}

/// Handle JSON payload errors
pub fn handle_json_payload_error(err: error::JsonPayloadError, req: &HttpRequest) -> actix_web::Error {
    tracing::info!("JSON payload error on {}: {}", req.path(), err);
    JsonError {
        error: "invalid_json".to_string(),
        message: format!("Invalid JSON: {}", err),
        status_code: 400,
    }
    .into()
}

/// Handle query payload errors
pub fn handle_query_payload_error(err: error::QueryPayloadError, req: &HttpRequest) -> actix_web::Error {
    tracing::info!("Query payload error on {}: {}", req.path(), err);
    JsonError {
        error: "invalid_query".to_string(),
        message: format!("Invalid query: {}", err),
        status_code: 400,
    }
    .into()
}

/// Map a store failure to its JSON error response
///
/// `NotFound` becomes 404, `Conflict` 409; everything else is logged and
/// becomes 500.
pub(crate) fn store_error_response(context: &str, err: StoreError) -> HttpResponse {
    match err {
        StoreError::Conflict { kind, id } => HttpResponse::Conflict().json(ErrorResponse {
            error: format!("{} already exists", capitalize(kind)),
            message: format!("A {} with id {} is already recorded", kind, id),
            status_code: 409,
        }),
        StoreError::NotFound { kind, id } => HttpResponse::NotFound().json(ErrorResponse {
            error: format!("{} not found", capitalize(kind)),
            message: format!("No {} with id {}", kind, id),
            status_code: 404,
        }),
        other => {
            tracing::error!("{}: {}", context, other);
            HttpResponse::InternalServerError().json(ErrorResponse {
                error: context.to_string(),
                message: other.to_string(),
                status_code: 500,
            })
        }
    }
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_maps_to_404() {
        let response = store_error_response("Failed to fetch shift", StoreError::not_found("shift", "x"));
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn test_conflict_maps_to_409() {
        let response = store_error_response(
            "Failed to record application",
            StoreError::Conflict {
                kind: "application",
                id: "app_1".to_string(),
            },
        );
        assert_eq!(response.status(), StatusCode::CONFLICT);
    }

    #[test]
    fn test_other_errors_map_to_500() {
        let response = store_error_response(
            "Failed to fetch shifts",
            StoreError::InvalidRecord("negative count".to_string()),
        );
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_capitalize() {
        assert_eq!(capitalize("doctor"), "Doctor");
        assert_eq!(capitalize(""), "");
    }
}
