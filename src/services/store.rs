use async_trait::async_trait;
use thiserror::Error;

use crate::models::{Application, Doctor, Hospital, Program, Region, Shift, StoreCounts, Testimonial};
use crate::services::demo::DemoCatalogue;

/// Errors that can occur when reading or writing marketplace records
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("SQLx error: {0}")]
    SqlxError(#[from] sqlx::Error),

    #[error("Migration error: {0}")]
    MigrateError(#[from] sqlx::migrate::MigrateError),

    #[error("{kind} not found: {id}")]
    NotFound { kind: &'static str, id: String },

    #[error("{kind} already exists: {id}")]
    Conflict { kind: &'static str, id: String },

    #[error("Invalid record: {0}")]
    InvalidRecord(String),
}

impl StoreError {
    pub fn not_found(kind: &'static str, id: &str) -> Self {
        StoreError::NotFound {
            kind,
            id: id.to_string(),
        }
    }
}

/// Read path for marketplace records plus the application write
///
/// Shifts are returned with their hospital snapshot joined in when the
/// hospital exists. Ordering of list results is backend-defined.
#[async_trait]
pub trait MarketplaceStore: Send + Sync {
    /// Short backend name reported by health and debug endpoints
    fn backend(&self) -> &'static str;

    async fn get_doctor(&self, doctor_id: &str) -> Result<Doctor, StoreError>;

    async fn list_shifts(&self) -> Result<Vec<Shift>, StoreError>;

    async fn get_shift(&self, shift_id: &str) -> Result<Shift, StoreError>;

    async fn list_hospitals(&self) -> Result<Vec<Hospital>, StoreError>;

    async fn list_regions(&self) -> Result<Vec<Region>, StoreError>;

    async fn get_region(&self, region_id: &str) -> Result<Region, StoreError> {
        self.list_regions()
            .await?
            .into_iter()
            .find(|r| r.id == region_id)
            .ok_or_else(|| StoreError::not_found("region", region_id))
    }

    async fn list_programs(&self) -> Result<Vec<Program>, StoreError>;

    async fn list_testimonials(&self) -> Result<Vec<Testimonial>, StoreError>;

    /// Insert a new application; an existing id is a `Conflict`, never overwritten
    async fn create_application(&self, application: &Application) -> Result<(), StoreError>;

    async fn counts(&self) -> Result<StoreCounts, StoreError>;

    /// Upsert every record of `catalogue` by id and report the new counts
    async fn seed(&self, catalogue: &DemoCatalogue) -> Result<StoreCounts, StoreError>;

    async fn health_check(&self) -> Result<bool, StoreError>;
}
