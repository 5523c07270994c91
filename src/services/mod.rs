// Service exports
pub mod demo;
pub mod postgres;
pub mod store;

pub use demo::{demo_doctor, DemoCatalogue, DemoStore, DEMO_DOCTOR_ID};
pub use postgres::PostgresStore;
pub use store::{MarketplaceStore, StoreError};
