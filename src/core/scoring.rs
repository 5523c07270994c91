use serde::{Deserialize, Serialize};

use crate::core::{distance::haversine_km, skills::SkillSet};
use crate::models::{Doctor, Shift};

/// Flat bonus when the doctor has used the hospital's EHR system
pub const EHR_MATCH_POINTS: f64 = 30.0;
/// Points per overlapping skill tag
pub const SKILL_POINTS_PER_OVERLAP: f64 = 5.0;
/// Skill component saturates here (4 overlapping skills)
pub const SKILL_POINTS_CAP: f64 = 20.0;
/// Proximity points at zero distance
pub const PROXIMITY_MAX_POINTS: f64 = 30.0;
/// Kilometers per proximity point lost; proximity reaches zero at 300 km
pub const PROXIMITY_KM_PER_POINT: f64 = 10.0;
/// Flat bonus inside the experience band
pub const EXPERIENCE_BAND_POINTS: f64 = 10.0;
pub const EXPERIENCE_BAND_MIN_YEARS: u32 = 5;
pub const EXPERIENCE_BAND_MAX_YEARS: u32 = 15;
/// Urgency points per unit of surcharge factor
pub const URGENCY_POINTS_PER_FACTOR: f64 = 2.0;
pub const URGENCY_POINTS_CAP: f64 = 10.0;
/// Surcharge assumed when a shift has none recorded
pub const DEFAULT_SURCHARGE_FACTOR: f64 = 1.0;

/// Highest reachable score (30 + 20 + 30 + 10 + 10)
pub const MAX_SCORE: u32 = 100;

/// Per-component contributions to a match score
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ScoreBreakdown {
    pub ehr: f64,
    pub skills: f64,
    pub proximity: f64,
    pub experience: f64,
    pub urgency: f64,
}

impl ScoreBreakdown {
    /// Unrounded sum of all components
    pub fn raw_total(&self) -> f64 {
        self.ehr + self.skills + self.proximity + self.experience + self.urgency
    }

    /// Rounded score in `0..=MAX_SCORE`
    ///
    /// The sum is never negative, so `f64::round` (half away from zero)
    /// behaves as round-half-up here: 82.5 scores 83.
    pub fn total(&self) -> u32 {
        self.raw_total().round().clamp(0.0, f64::from(MAX_SCORE)) as u32
    }
}

/// Calculate a match score (0-100) for a shift against a doctor profile
///
/// Scoring formula:
/// score = round(
///     ehr_bonus +         # 30 if the doctor has used the hospital's EHR
///     skill_overlap +     # 5 per shared skill, capped at 20
///     proximity +         # 30 at 0 km, linear down to 0 at 300 km
///     experience_band +   # 10 for 5-15 years of experience
///     urgency             # 2 x surcharge factor, capped at 10
/// )
///
/// Missing optional data zeroes the affected component. A shift without a
/// hospital snapshot scores nothing for EHR and proximity.
pub fn score_match(doctor: &Doctor, shift: &Shift) -> u32 {
    score_breakdown(doctor, shift).total()
}

/// Calculate each scoring component separately
pub fn score_breakdown(doctor: &Doctor, shift: &Shift) -> ScoreBreakdown {
    ScoreBreakdown {
        ehr: ehr_component(doctor, shift),
        skills: skill_component(doctor, shift),
        proximity: proximity_component(doctor, shift),
        experience: experience_component(doctor.years()),
        urgency: urgency_component(shift.surcharge_factor),
    }
}

#[inline]
fn ehr_component(doctor: &Doctor, shift: &Shift) -> f64 {
    let Some(ehr) = shift.hospital.as_ref().and_then(|h| h.ehr()) else {
        return 0.0;
    };

    if doctor.has_used_ehr(ehr) {
        EHR_MATCH_POINTS
    } else {
        0.0
    }
}

#[inline]
fn skill_component(doctor: &Doctor, shift: &Shift) -> f64 {
    let required = SkillSet::from_optional(shift.required_skills.as_deref());
    let held = SkillSet::from_optional(doctor.skills.as_deref());

    skill_points(required.overlap(&held))
}

/// Points for a given number of overlapping skills
#[inline]
pub fn skill_points(overlap: usize) -> f64 {
    (overlap as f64 * SKILL_POINTS_PER_OVERLAP).min(SKILL_POINTS_CAP)
}

#[inline]
fn proximity_component(doctor: &Doctor, shift: &Shift) -> f64 {
    let doctor_pos = doctor.position();
    let hospital_pos = shift.hospital.as_ref().and_then(|h| h.position());

    match (doctor_pos, hospital_pos) {
        (Some(a), Some(b)) => proximity_points(haversine_km(a, b)),
        _ => 0.0,
    }
}

/// Points for a commute of `km` kilometers
#[inline]
pub fn proximity_points(km: f64) -> f64 {
    let lost = (km / PROXIMITY_KM_PER_POINT).min(PROXIMITY_MAX_POINTS);
    (PROXIMITY_MAX_POINTS - lost).max(0.0)
}

#[inline]
fn experience_component(years: u32) -> f64 {
    if (EXPERIENCE_BAND_MIN_YEARS..=EXPERIENCE_BAND_MAX_YEARS).contains(&years) {
        EXPERIENCE_BAND_POINTS
    } else {
        0.0
    }
}

#[inline]
fn urgency_component(surcharge_factor: Option<f64>) -> f64 {
    let factor = surcharge_factor
        .filter(|f| f.is_finite())
        .unwrap_or(DEFAULT_SURCHARGE_FACTOR);

    (factor * URGENCY_POINTS_PER_FACTOR).clamp(0.0, URGENCY_POINTS_CAP)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{HospitalSnapshot, ShiftStatus};
    use chrono::{TimeZone, Utc};

    fn create_test_doctor() -> Doctor {
        Doctor {
            id: "doc".to_string(),
            name: Some("Test Doctor".to_string()),
            years_of_exp: Some(8),
            skills: Some(vec!["em".to_string(), "intubation".to_string(), "suturing".to_string()]),
            ehr_experience: Some(vec!["Fujitsu".to_string()]),
            lat: Some(35.68),
            lng: Some(139.76),
            rating: Some(4.7),
            cancel_rate: Some(0.02),
        }
    }

    fn create_test_shift() -> Shift {
        Shift {
            id: "s1".to_string(),
            hospital_id: "h1".to_string(),
            dept: Some("ER".to_string()),
            role: Some("night-shift".to_string()),
            start_at: Utc.with_ymd_and_hms(2025, 9, 10, 9, 0, 0).unwrap(),
            end_at: Utc.with_ymd_and_hms(2025, 9, 10, 17, 0, 0).unwrap(),
            required_skills: Some(vec!["em".to_string(), "intubation".to_string()]),
            comp_base: Some(25000.0),
            surcharge_factor: Some(1.5),
            status: ShiftStatus::Open,
            max_doctors: Some(1),
            highlight: None,
            workation: None,
            hospital: Some(HospitalSnapshot {
                id: "h1".to_string(),
                name: Some("Tokyo General".to_string()),
                lat: Some(35.6895),
                lng: Some(139.6917),
                ehr_type: Some("Fujitsu".to_string()),
            }),
        }
    }

    #[test]
    fn test_tokyo_scenario() {
        let breakdown = score_breakdown(&create_test_doctor(), &create_test_shift());

        assert_eq!(breakdown.ehr, 30.0);
        assert_eq!(breakdown.skills, 10.0);
        assert!(breakdown.proximity > 29.0 && breakdown.proximity < 30.0);
        assert_eq!(breakdown.experience, 10.0);
        assert_eq!(breakdown.urgency, 3.0);

        let score = score_match(&create_test_doctor(), &create_test_shift());
        assert!((i64::from(score) - 83).abs() <= 1, "Expected ~83, got {}", score);
    }

    #[test]
    fn test_ehr_bonus_is_case_sensitive() {
        let mut doctor = create_test_doctor();
        doctor.ehr_experience = Some(vec!["fujitsu".to_string()]);
        assert_eq!(score_breakdown(&doctor, &create_test_shift()).ehr, 0.0);
    }

    #[test]
    fn test_blank_hospital_ehr_never_matches() {
        let mut doctor = create_test_doctor();
        doctor.ehr_experience = Some(vec![String::new()]);
        let mut shift = create_test_shift();
        shift.hospital.as_mut().unwrap().ehr_type = Some(String::new());
        assert_eq!(score_breakdown(&doctor, &shift).ehr, 0.0);
    }

    #[test]
    fn test_skill_points_saturate() {
        assert_eq!(skill_points(0), 0.0);
        assert_eq!(skill_points(3), 15.0);
        assert_eq!(skill_points(4), SKILL_POINTS_CAP);
        assert_eq!(skill_points(9), SKILL_POINTS_CAP);
    }

    #[test]
    fn test_proximity_points_decay() {
        assert_eq!(proximity_points(0.0), PROXIMITY_MAX_POINTS);
        assert_eq!(proximity_points(150.0), 15.0);
        assert_eq!(proximity_points(300.0), 0.0);
        assert_eq!(proximity_points(5000.0), 0.0);
    }

    #[test]
    fn test_experience_band_edges() {
        assert_eq!(experience_component(4), 0.0);
        assert_eq!(experience_component(5), EXPERIENCE_BAND_POINTS);
        assert_eq!(experience_component(15), EXPERIENCE_BAND_POINTS);
        assert_eq!(experience_component(16), 0.0);
    }

    #[test]
    fn test_urgency_defaults_and_cap() {
        assert_eq!(urgency_component(None), 2.0);
        assert_eq!(urgency_component(Some(1.2)), 2.4);
        assert_eq!(urgency_component(Some(8.0)), URGENCY_POINTS_CAP);
        assert_eq!(urgency_component(Some(f64::NAN)), 2.0);
    }

    #[test]
    fn test_missing_hospital_skips_ehr_and_proximity() {
        let mut shift = create_test_shift();
        shift.hospital = None;
        let breakdown = score_breakdown(&create_test_doctor(), &shift);

        assert_eq!(breakdown.ehr, 0.0);
        assert_eq!(breakdown.proximity, 0.0);
        assert_eq!(breakdown.total(), 10 + 10 + 3);
    }

    #[test]
    fn test_empty_profile_scores_only_urgency() {
        let doctor = Doctor {
            id: "empty".to_string(),
            ..Default::default()
        };
        let mut shift = create_test_shift();
        shift.surcharge_factor = None;

        assert_eq!(score_match(&doctor, &shift), 2);
    }

    #[test]
    fn test_rounding_is_half_up() {
        let breakdown = ScoreBreakdown {
            skills: 10.0,
            urgency: 2.5,
            ..Default::default()
        };
        assert_eq!(breakdown.total(), 13);

        let breakdown = ScoreBreakdown {
            skills: 10.0,
            urgency: 2.4,
            ..Default::default()
        };
        assert_eq!(breakdown.total(), 12);
    }

    #[test]
    fn test_rounding_just_below_half_stays_down() {
        // Largest f64 below 0.5; adding 0.5 before flooring would give 1
        let breakdown = ScoreBreakdown {
            urgency: 0.49999999999999994,
            ..Default::default()
        };
        assert_eq!(breakdown.total(), 0);

        let breakdown = ScoreBreakdown {
            urgency: 0.5,
            ..Default::default()
        };
        assert_eq!(breakdown.total(), 1);
    }
}
