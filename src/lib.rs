//! Locum Match - shift matching service for a locum physician marketplace
//!
//! This library provides the match scoring engine that ranks open hospital
//! shifts for a doctor, plus the HTTP surface and stores around it.

pub mod config;
pub mod core;
pub mod models;
pub mod routes;
pub mod services;

// Re-export commonly used types
pub use crate::core::{haversine_km, score_match, Matcher, RankedShift, ScoreBreakdown, MAX_RANKED_RESULTS};
pub use crate::models::{Doctor, GeoPoint, Hospital, HospitalSnapshot, Shift, ShiftStatus};
pub use crate::services::{DemoStore, MarketplaceStore, PostgresStore};
