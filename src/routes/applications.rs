use actix_web::{web, HttpResponse, Responder};
use validator::Validate;

use crate::models::{Application, CreateApplicationRequest, CreateApplicationResponse, ErrorResponse};
use crate::routes::{store_error_response, AppState};

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/applications", web::post().to(create_application));
}

/// Apply for a shift
///
/// POST /api/v1/applications
///
/// Request body:
/// ```json
/// {
///   "shift_id": "string",
///   "hospital_id": "string",
///   "name": "string",
///   "specialty": "string",
///   "experience_years": 8,
///   "comment": "string"
/// }
/// ```
async fn create_application(
    state: web::Data<AppState>,
    req: web::Json<CreateApplicationRequest>,
) -> impl Responder {
    if let Err(errors) = req.validate() {
        tracing::info!("Validation failed for application request: {}", errors);
        return HttpResponse::BadRequest().json(ErrorResponse {
            error: "Validation failed".to_string(),
            message: errors.to_string(),
            status_code: 400,
        });
    }

    let req = req.into_inner();
    let now = chrono::Utc::now();
    let application = Application {
        id: Application::id_for(now),
        shift_id: req.shift_id,
        hospital_id: req.hospital_id,
        name: req.name,
        specialty: req.specialty,
        experience_years: req.experience_years,
        comment: req.comment,
        created_at: now,
        updated_at: now,
    };

    if let Err(e) = state.store.create_application(&application).await {
        return store_error_response("Failed to record application", e);
    }

    tracing::info!(
        "Recorded application {} for shift {} at hospital {}",
        application.id,
        application.shift_id,
        application.hospital_id
    );

    HttpResponse::Ok().json(CreateApplicationResponse {
        ok: true,
        application_id: application.id,
    })
}
