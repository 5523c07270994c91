// Model exports
pub mod domain;
pub mod requests;
pub mod responses;

pub use domain::{
    AccommodationSupport, Application, Doctor, GeoPoint, Hospital, HospitalSnapshot, Program,
    ProgramCategory, Region, Shift, ShiftHighlight, ShiftStatus, StoreCounts, Testimonial,
    TransportAccess, Workation,
};
pub use requests::{CreateApplicationRequest, MatchQuery, ProgramListQuery, ShiftListQuery};
pub use responses::{
    CreateApplicationResponse, DbStatusResponse, ErrorResponse, HealthResponse, SeedResponse,
};
