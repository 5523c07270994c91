use chrono::{DateTime, Duration, Utc};

use crate::models::{Hospital, Program, Region, Shift, ShiftStatus};

/// Default look-ahead for the urgent shift listing
pub const DEFAULT_URGENT_WINDOW_HOURS: i64 = 72;

/// Only open shifts may be offered to a doctor
#[inline]
pub fn is_open(shift: &Shift) -> bool {
    shift.status == ShiftStatus::Open
}

/// Check whether a shift is flagged urgent and starts within `window` of `now`
///
/// Shifts that already started are not urgent.
#[inline]
pub fn is_urgent_within(shift: &Shift, now: DateTime<Utc>, window: Duration) -> bool {
    if !shift.is_flagged_urgent() {
        return false;
    }

    let until_start = shift.start_at - now;
    until_start >= Duration::zero() && until_start <= window
}

/// Check whether a hospital belongs to a region
///
/// A hospital matches on its region field (exact id, id substring, or region
/// name substring) or when its address mentions one of the region's
/// prefectures.
pub fn hospital_in_region(hospital: &Hospital, region: &Region) -> bool {
    let region_field = hospital.region.as_deref().unwrap_or("");

    if !region_field.is_empty()
        && (region_field == region.id
            || region_field.contains(&region.id)
            || region_field.contains(&region.name))
    {
        return true;
    }

    let address = hospital.address.as_deref().unwrap_or("");
    !address.is_empty()
        && region
            .prefectures
            .iter()
            .any(|p| !p.is_empty() && address.contains(p.as_str()))
}

/// Program listing filter
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ProgramFilter {
    #[default]
    All,
    Popular,
    Category(String),
}

impl ProgramFilter {
    pub fn parse(value: Option<&str>) -> Self {
        match value.map(str::trim) {
            None | Some("") | Some("all") => ProgramFilter::All,
            Some("popular") => ProgramFilter::Popular,
            Some(category) => ProgramFilter::Category(category.to_string()),
        }
    }
}

pub fn program_matches(program: &Program, filter: &ProgramFilter) -> bool {
    match filter {
        ProgramFilter::All => true,
        ProgramFilter::Popular => program.popular,
        ProgramFilter::Category(category) => program.category.as_str() == category,
    }
}
