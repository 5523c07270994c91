use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A latitude/longitude pair in decimal degrees
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub lat: f64,
    pub lng: f64,
}

impl GeoPoint {
    pub fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }

    /// Both halves must be present to form a point
    pub fn from_parts(lat: Option<f64>, lng: Option<f64>) -> Option<Self> {
        Some(Self { lat: lat?, lng: lng? })
    }
}

/// Doctor profile used for shift matching
///
/// Every field except the id is optional; the scorer degrades missing
/// fields to a zero contribution instead of failing.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Doctor {
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub years_of_exp: Option<u32>,
    #[serde(default)]
    pub skills: Option<Vec<String>>,
    #[serde(default)]
    pub ehr_experience: Option<Vec<String>>,
    #[serde(default)]
    pub lat: Option<f64>,
    #[serde(default)]
    pub lng: Option<f64>,
    /// Carried for display; not consulted by the scorer
    #[serde(default)]
    pub rating: Option<f64>,
    /// Carried for display; not consulted by the scorer
    #[serde(default)]
    pub cancel_rate: Option<f64>,
}

impl Doctor {
    /// Years of experience, unknown counts as zero
    pub fn years(&self) -> u32 {
        self.years_of_exp.unwrap_or(0)
    }

    pub fn position(&self) -> Option<GeoPoint> {
        GeoPoint::from_parts(self.lat, self.lng)
    }

    /// Exact, case-sensitive lookup in the doctor's EHR history
    pub fn has_used_ehr(&self, ehr: &str) -> bool {
        self.ehr_experience
            .as_deref()
            .is_some_and(|systems| systems.iter().any(|s| s == ehr))
    }
}

/// Lifecycle of a shift; only `Open` shifts are offered to doctors
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ShiftStatus {
    Open,
    Filled,
    Cancelled,
    #[default]
    #[serde(other)]
    Unknown,
}

impl ShiftStatus {
    pub fn parse(value: &str) -> Self {
        match value.to_ascii_lowercase().as_str() {
            "open" => ShiftStatus::Open,
            "filled" => ShiftStatus::Filled,
            "cancelled" | "canceled" => ShiftStatus::Cancelled,
            _ => ShiftStatus::Unknown,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ShiftStatus::Open => "open",
            ShiftStatus::Filled => "filled",
            ShiftStatus::Cancelled => "cancelled",
            ShiftStatus::Unknown => "unknown",
        }
    }
}

/// Listing highlight shown on urgent postings
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ShiftHighlight {
    #[serde(default)]
    pub urgent: bool,
    #[serde(default)]
    pub badge: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Workation {
    #[serde(default)]
    pub enabled: bool,
}

/// Hospital fields joined onto a shift at read time
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HospitalSnapshot {
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub lat: Option<f64>,
    #[serde(default)]
    pub lng: Option<f64>,
    #[serde(default)]
    pub ehr_type: Option<String>,
}

impl HospitalSnapshot {
    pub fn position(&self) -> Option<GeoPoint> {
        GeoPoint::from_parts(self.lat, self.lng)
    }

    /// EHR system name, `None` when absent or blank
    pub fn ehr(&self) -> Option<&str> {
        self.ehr_type.as_deref().filter(|e| !e.is_empty())
    }
}

/// A bookable clinical work slot
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Shift {
    pub id: String,
    pub hospital_id: String,
    #[serde(default)]
    pub dept: Option<String>,
    #[serde(default)]
    pub role: Option<String>,
    pub start_at: DateTime<Utc>,
    pub end_at: DateTime<Utc>,
    #[serde(default)]
    pub required_skills: Option<Vec<String>>,
    #[serde(default)]
    pub comp_base: Option<f64>,
    #[serde(default)]
    pub surcharge_factor: Option<f64>,
    #[serde(default)]
    pub status: ShiftStatus,
    #[serde(default)]
    pub max_doctors: Option<u32>,
    #[serde(default)]
    pub highlight: Option<ShiftHighlight>,
    #[serde(default)]
    pub workation: Option<Workation>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hospital: Option<HospitalSnapshot>,
}

impl Shift {
    pub fn is_flagged_urgent(&self) -> bool {
        self.highlight.as_ref().is_some_and(|h| h.urgent)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TransportAccess {
    #[serde(default)]
    pub station: Option<String>,
    #[serde(default)]
    pub airport: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AccommodationSupport {
    #[serde(default)]
    pub has_dorm: bool,
    #[serde(default)]
    pub subsidy_jpy: u32,
}

/// Hospital catalogue record
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Hospital {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub lat: Option<f64>,
    #[serde(default)]
    pub lng: Option<f64>,
    #[serde(default)]
    pub ehr_type: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub region: Option<String>,
    #[serde(default)]
    pub facility_type: Option<String>,
    #[serde(default)]
    pub bed_count: Option<u32>,
    #[serde(default)]
    pub dept_list: Vec<String>,
    #[serde(default)]
    pub transport_access: Option<TransportAccess>,
    #[serde(default)]
    pub accommodation_support: Option<AccommodationSupport>,
    #[serde(default)]
    pub amenities: Vec<String>,
    #[serde(default)]
    pub photos: Vec<String>,
    #[serde(default)]
    pub catch_copy: Option<String>,
    #[serde(default)]
    pub rating_avg: Option<f64>,
    #[serde(default)]
    pub review_count: Option<u32>,
    #[serde(default)]
    pub specialties: Vec<String>,
    #[serde(default)]
    pub features: Vec<String>,
    #[serde(default)]
    pub programs: Vec<String>,
}

impl Hospital {
    /// Project the fields the scorer needs onto a shift snapshot
    pub fn snapshot(&self) -> HospitalSnapshot {
        HospitalSnapshot {
            id: self.id.clone(),
            name: Some(self.name.clone()),
            lat: self.lat,
            lng: self.lng,
            ehr_type: self.ehr_type.clone(),
        }
    }
}

/// Geographic region grouping hospitals
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Region {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub prefectures: Vec<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub features: Vec<String>,
    #[serde(default)]
    pub photo: Option<String>,
    #[serde(default)]
    pub popular: bool,
    #[serde(default)]
    pub lat: Option<f64>,
    #[serde(default)]
    pub lng: Option<f64>,
    #[serde(default)]
    pub access_info: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProgramCategory {
    ShortTerm,
    MediumTerm,
    LongTerm,
    Specialty,
    Online,
    #[default]
    #[serde(other)]
    Other,
}

impl ProgramCategory {
    pub fn parse(value: &str) -> Self {
        match value {
            "short_term" => ProgramCategory::ShortTerm,
            "medium_term" => ProgramCategory::MediumTerm,
            "long_term" => ProgramCategory::LongTerm,
            "specialty" => ProgramCategory::Specialty,
            "online" => ProgramCategory::Online,
            _ => ProgramCategory::Other,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ProgramCategory::ShortTerm => "short_term",
            ProgramCategory::MediumTerm => "medium_term",
            ProgramCategory::LongTerm => "long_term",
            ProgramCategory::Specialty => "specialty",
            ProgramCategory::Online => "online",
            ProgramCategory::Other => "other",
        }
    }
}

/// Multi-week training program offered through partner hospitals
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Program {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub category: ProgramCategory,
    #[serde(default)]
    pub duration_weeks: Option<u32>,
    #[serde(default)]
    pub target_audience: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub features: Vec<String>,
    #[serde(default)]
    pub price_range: Option<String>,
    #[serde(default)]
    pub photo: Option<String>,
    #[serde(default)]
    pub popular: bool,
}

/// Doctor review of a past placement
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Testimonial {
    pub id: String,
    pub doctor_name: String,
    #[serde(default)]
    pub specialty: Option<String>,
    #[serde(default)]
    pub experience_years: Option<u32>,
    #[serde(default)]
    pub hospital_id: Option<String>,
    #[serde(default)]
    pub program_id: Option<String>,
    #[serde(default)]
    pub rating: Option<u8>,
    pub content: String,
    #[serde(default)]
    pub photo: Option<String>,
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub created_at: DateTime<Utc>,
}

/// Doctor application to a shift
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Application {
    pub id: String,
    pub shift_id: String,
    pub hospital_id: String,
    pub name: String,
    #[serde(default)]
    pub specialty: Option<String>,
    #[serde(default)]
    pub experience_years: Option<u32>,
    #[serde(default)]
    pub comment: Option<String>,
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub created_at: DateTime<Utc>,
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub updated_at: DateTime<Utc>,
}

impl Application {
    /// Fresh application id: submission time in unix milliseconds plus a
    /// random v4 suffix, so submissions in the same millisecond stay distinct
    pub fn id_for(submitted_at: DateTime<Utc>) -> String {
        format!(
            "app_{}_{}",
            submitted_at.timestamp_millis(),
            uuid::Uuid::new_v4().simple()
        )
    }
}

/// Record counts reported by the debug endpoints
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoreCounts {
    pub doctors: u64,
    pub hospitals: u64,
    pub shifts: u64,
    pub regions: u64,
    pub programs: u64,
    pub testimonials: u64,
    pub applications: u64,
}
