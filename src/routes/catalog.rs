use actix_web::{web, HttpResponse, Responder};

use crate::core::{hospital_in_region, is_urgent_within, program_matches, ProgramFilter};
use crate::models::{ProgramListQuery, ShiftListQuery};
use crate::routes::{store_error_response, AppState};

/// Configure catalogue browsing routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/shifts", web::get().to(list_shifts))
        .route("/shifts/{id}", web::get().to(get_shift))
        .route("/hospitals", web::get().to(list_hospitals))
        .route("/regions", web::get().to(list_regions))
        .route("/regions/{id}/hospitals", web::get().to(list_region_hospitals))
        .route("/programs", web::get().to(list_programs))
        .route("/testimonials", web::get().to(list_testimonials));
}

/// List shifts
///
/// GET /api/v1/shifts?hospitalId={hospitalId}&urgent=true
///
/// `urgent=true` keeps only shifts flagged urgent that start within the
/// configured window.
async fn list_shifts(state: web::Data<AppState>, query: web::Query<ShiftListQuery>) -> impl Responder {
    let shifts = match state.store.list_shifts().await {
        Ok(shifts) => shifts,
        Err(e) => return store_error_response("Failed to fetch shifts", e),
    };

    let now = chrono::Utc::now();
    let hospital_id = query.hospital_id.as_deref().filter(|id| !id.is_empty());
    let urgent_only = query.urgent.unwrap_or(false);

    let shifts: Vec<_> = shifts
        .into_iter()
        .filter(|shift| hospital_id.map_or(true, |id| shift.hospital_id == id))
        .filter(|shift| !urgent_only || is_urgent_within(shift, now, state.urgent_window))
        .collect();

    tracing::debug!(
        "Listing {} shifts (hospital: {:?}, urgent: {})",
        shifts.len(),
        hospital_id,
        urgent_only
    );

    HttpResponse::Ok().json(shifts)
}

/// GET /api/v1/shifts/{id}
async fn get_shift(state: web::Data<AppState>, path: web::Path<String>) -> impl Responder {
    match state.store.get_shift(&path).await {
        Ok(shift) => HttpResponse::Ok().json(shift),
        Err(e) => store_error_response("Failed to fetch shift", e),
    }
}

async fn list_hospitals(state: web::Data<AppState>) -> impl Responder {
    match state.store.list_hospitals().await {
        Ok(hospitals) => HttpResponse::Ok().json(hospitals),
        Err(e) => store_error_response("Failed to fetch hospitals", e),
    }
}

async fn list_regions(state: web::Data<AppState>) -> impl Responder {
    match state.store.list_regions().await {
        Ok(regions) => HttpResponse::Ok().json(regions),
        Err(e) => store_error_response("Failed to fetch regions", e),
    }
}

/// Hospitals located in a region
///
/// GET /api/v1/regions/{id}/hospitals
async fn list_region_hospitals(state: web::Data<AppState>, path: web::Path<String>) -> impl Responder {
    let region = match state.store.get_region(&path).await {
        Ok(region) => region,
        Err(e) => return store_error_response("Failed to fetch region", e),
    };

    match state.store.list_hospitals().await {
        Ok(hospitals) => {
            let hospitals: Vec<_> = hospitals
                .into_iter()
                .filter(|hospital| hospital_in_region(hospital, &region))
                .collect();
            HttpResponse::Ok().json(hospitals)
        }
        Err(e) => store_error_response("Failed to fetch hospitals", e),
    }
}

/// GET /api/v1/programs?filter={all|popular|category}
async fn list_programs(state: web::Data<AppState>, query: web::Query<ProgramListQuery>) -> impl Responder {
    let filter = ProgramFilter::parse(query.filter.as_deref());

    match state.store.list_programs().await {
        Ok(programs) => {
            let programs: Vec<_> = programs
                .into_iter()
                .filter(|program| program_matches(program, &filter))
                .collect();
            HttpResponse::Ok().json(programs)
        }
        Err(e) => store_error_response("Failed to fetch programs", e),
    }
}

async fn list_testimonials(state: web::Data<AppState>) -> impl Responder {
    match state.store.list_testimonials().await {
        Ok(testimonials) => HttpResponse::Ok().json(testimonials),
        Err(e) => store_error_response("Failed to fetch testimonials", e),
    }
}
