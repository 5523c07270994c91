use actix_web::{web, HttpResponse, Responder};
use std::sync::Arc;

use crate::core::Matcher;
use crate::models::{HealthResponse, MatchQuery};
use crate::routes::store_error_response;
use crate::services::{demo_doctor, MarketplaceStore};

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn MarketplaceStore>,
    /// Look-ahead for the urgent shift listing
    pub urgent_window: chrono::Duration,
}

impl AppState {
    pub fn new(store: Arc<dyn MarketplaceStore>, urgent_window: chrono::Duration) -> Self {
        Self {
            store,
            urgent_window,
        }
    }
}

/// Configure health and match routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/health", web::get().to(health_check))
        .route("/match", web::get().to(match_shifts));
}

/// Health check endpoint
async fn health_check(state: web::Data<AppState>) -> impl Responder {
    let healthy = state.store.health_check().await.unwrap_or(false);

    let status = if healthy { "healthy" } else { "degraded" };

    HttpResponse::Ok().json(HealthResponse {
        status: status.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        store: state.store.backend().to_string(),
        timestamp: chrono::Utc::now(),
    })
}

/// Ranked shifts for a doctor
///
/// GET /api/v1/match?doctorId={doctorId}
///
/// Without `doctorId` the built-in demo doctor is used. Responds with up to
/// 20 `{shift, score}` entries, best first.
async fn match_shifts(state: web::Data<AppState>, query: web::Query<MatchQuery>) -> impl Responder {
    let doctor = match query.doctor_id.as_deref().filter(|id| !id.is_empty()) {
        Some(doctor_id) => match state.store.get_doctor(doctor_id).await {
            Ok(doctor) => doctor,
            Err(e) => return store_error_response("Failed to fetch doctor", e),
        },
        None => demo_doctor(),
    };

    let candidates = match state.store.list_shifts().await {
        Ok(shifts) => shifts,
        Err(e) => return store_error_response("Failed to fetch shifts", e),
    };

    let result = Matcher::find_matches(&doctor, candidates);

    tracing::info!(
        "Returning {} matches for doctor {} ({} open of {} shifts)",
        result.matches.len(),
        doctor.id,
        result.eligible_candidates,
        result.total_candidates
    );

    HttpResponse::Ok().json(result.matches)
}
