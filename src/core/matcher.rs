use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

use crate::core::{filters::is_open, scoring::score_match};
use crate::models::{Doctor, Shift};

/// Fixed cap on ranked results
pub const MAX_RANKED_RESULTS: usize = 20;

/// A shift paired with its match score
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RankedShift {
    pub shift: Shift,
    pub score: u32,
}

/// Result of the matching process
#[derive(Debug)]
pub struct MatchResult {
    pub matches: Vec<RankedShift>,
    pub total_candidates: usize,
    pub eligible_candidates: usize,
}

/// Shift ranking for a doctor
///
/// Stateless; scores are recomputed on every call.
#[derive(Debug, Clone, Copy, Default)]
pub struct Matcher;

impl Matcher {
    /// Rank shifts for a doctor, best first
    ///
    /// Ties on score are broken by earlier `start_at`, then by shift id, so the
    /// output is reproducible for any input order. At most
    /// [`MAX_RANKED_RESULTS`] entries are returned.
    pub fn rank(doctor: &Doctor, shifts: Vec<Shift>) -> Vec<RankedShift> {
        let mut ranked: Vec<RankedShift> = shifts
            .into_iter()
            .map(|shift| {
                let score = score_match(doctor, &shift);
                RankedShift { shift, score }
            })
            .collect();

        ranked.sort_by(compare_ranked);
        ranked.truncate(MAX_RANKED_RESULTS);
        ranked
    }

    /// Filter candidates down to open shifts, then rank them
    ///
    /// # Pipeline Stages
    /// 1. Eligibility: drop shifts that are not open
    /// 2. Scoring and ranking
    pub fn find_matches(doctor: &Doctor, candidates: Vec<Shift>) -> MatchResult {
        let total_candidates = candidates.len();

        let eligible: Vec<Shift> = candidates.into_iter().filter(is_open).collect();
        let eligible_candidates = eligible.len();

        MatchResult {
            matches: Self::rank(doctor, eligible),
            total_candidates,
            eligible_candidates,
        }
    }
}

fn compare_ranked(a: &RankedShift, b: &RankedShift) -> Ordering {
    b.score
        .cmp(&a.score)
        .then_with(|| a.shift.start_at.cmp(&b.shift.start_at))
        .then_with(|| a.shift.id.cmp(&b.shift.id))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{HospitalSnapshot, ShiftStatus};
    use chrono::{Duration, TimeZone, Utc};

    fn create_doctor() -> Doctor {
        Doctor {
            id: "doc".to_string(),
            years_of_exp: Some(8),
            skills: Some(vec!["em".to_string(), "intubation".to_string()]),
            ehr_experience: Some(vec!["HOPE".to_string()]),
            lat: Some(36.5551),
            lng: Some(139.8828),
            ..Default::default()
        }
    }

    fn create_shift(id: &str, hours_from_base: i64, surcharge: f64, ehr: &str) -> Shift {
        let start_at = Utc.with_ymd_and_hms(2025, 9, 10, 0, 0, 0).unwrap()
            + Duration::hours(hours_from_base);
        Shift {
            id: id.to_string(),
            hospital_id: "h1".to_string(),
            dept: None,
            role: None,
            start_at,
            end_at: start_at + Duration::hours(8),
            required_skills: Some(vec!["em".to_string()]),
            comp_base: Some(20000.0),
            surcharge_factor: Some(surcharge),
            status: ShiftStatus::Open,
            max_doctors: None,
            highlight: None,
            workation: None,
            hospital: Some(HospitalSnapshot {
                id: "h1".to_string(),
                name: None,
                lat: Some(36.5551),
                lng: Some(139.8828),
                ehr_type: Some(ehr.to_string()),
            }),
        }
    }

    #[test]
    fn test_rank_orders_by_score() {
        let doctor = create_doctor();
        let shifts = vec![
            create_shift("low", 0, 1.0, "Hitachi"),
            create_shift("high", 0, 1.0, "HOPE"),
        ];

        let ranked = Matcher::rank(&doctor, shifts);

        assert_eq!(ranked[0].shift.id, "high");
        assert!(ranked[0].score > ranked[1].score);
    }

    #[test]
    fn test_ties_break_on_start_then_id() {
        let doctor = create_doctor();
        let shifts = vec![
            create_shift("b", 5, 1.0, "HOPE"),
            create_shift("c", 2, 1.0, "HOPE"),
            create_shift("a", 5, 1.0, "HOPE"),
        ];

        let ranked = Matcher::rank(&doctor, shifts);
        let ids: Vec<&str> = ranked.iter().map(|r| r.shift.id.as_str()).collect();

        assert_eq!(ids, vec!["c", "a", "b"]);
    }

    #[test]
    fn test_rank_respects_cap() {
        let doctor = create_doctor();
        let shifts: Vec<Shift> = (0..50)
            .map(|i| create_shift(&format!("s{}", i), i, 1.0 + (i % 5) as f64, "HOPE"))
            .collect();

        let ranked = Matcher::rank(&doctor, shifts);

        assert_eq!(ranked.len(), MAX_RANKED_RESULTS);
        for pair in ranked.windows(2) {
            assert!(pair[0].score >= pair[1].score);
        }
    }

    #[test]
    fn test_find_matches_skips_closed_shifts() {
        let doctor = create_doctor();
        let mut filled = create_shift("filled", 0, 3.0, "HOPE");
        filled.status = ShiftStatus::Filled;
        let candidates = vec![filled, create_shift("open", 1, 1.0, "HOPE")];

        let result = Matcher::find_matches(&doctor, candidates);

        assert_eq!(result.total_candidates, 2);
        assert_eq!(result.eligible_candidates, 1);
        assert_eq!(result.matches.len(), 1);
        assert_eq!(result.matches[0].shift.id, "open");
    }

    #[test]
    fn test_rank_empty_input() {
        assert!(Matcher::rank(&create_doctor(), vec![]).is_empty());
    }
}
