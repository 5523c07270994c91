use actix_web::{web, HttpResponse, Responder};

use crate::models::{DbStatusResponse, SeedResponse};
use crate::routes::{store_error_response, AppState};
use crate::services::DemoCatalogue;

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/debug/db", web::get().to(db_status))
        .route("/debug/seed", web::post().to(seed));
}

/// Store connectivity and record counts
///
/// GET /api/v1/debug/db
///
/// Always responds 200; a failing store reports `connected: false` with the
/// reason.
async fn db_status(state: web::Data<AppState>) -> impl Responder {
    let store = state.store.backend().to_string();

    let response = match state.store.counts().await {
        Ok(counts) => DbStatusResponse {
            connected: true,
            store,
            counts: Some(counts),
            reason: None,
        },
        Err(e) => {
            tracing::warn!("Store status check failed: {}", e);
            DbStatusResponse {
                connected: false,
                store,
                counts: None,
                reason: Some(e.to_string()),
            }
        }
    };

    HttpResponse::Ok().json(response)
}

/// Upsert the demo catalogue into the active store
///
/// POST /api/v1/debug/seed
async fn seed(state: web::Data<AppState>) -> impl Responder {
    let catalogue = DemoCatalogue::new(chrono::Utc::now());

    match state.store.seed(&catalogue).await {
        Ok(counts) => {
            tracing::info!("Seeded demo catalogue into {} store", state.store.backend());
            HttpResponse::Ok().json(SeedResponse { ok: true, counts })
        }
        Err(e) => store_error_response("Failed to seed store", e),
    }
}
