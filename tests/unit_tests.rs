// Unit tests for the Locum Match scoring engine

use chrono::{Duration, TimeZone, Utc};
use geo::{point, HaversineDistance};
use locum_match::core::scoring::{
    proximity_points, skill_points, EHR_MATCH_POINTS, PROXIMITY_MAX_POINTS, SKILL_POINTS_CAP,
    URGENCY_POINTS_CAP,
};
use locum_match::core::{haversine_km, score_breakdown, score_match, Matcher, MAX_RANKED_RESULTS, MAX_SCORE};
use locum_match::models::{Doctor, GeoPoint, HospitalSnapshot, Shift, ShiftStatus};

fn create_test_doctor(ehr: &str) -> Doctor {
    Doctor {
        id: "doc-1".to_string(),
        name: Some("Dr. Sato".to_string()),
        years_of_exp: Some(8),
        skills: Some(vec!["em".to_string(), "intubation".to_string(), "suturing".to_string()]),
        ehr_experience: Some(vec![ehr.to_string()]),
        lat: Some(35.68),
        lng: Some(139.76),
        rating: Some(4.5),
        cancel_rate: Some(0.01),
    }
}

fn create_test_shift(id: &str, lat: f64, lng: f64, ehr: &str, surcharge: Option<f64>) -> Shift {
    let start_at = Utc.with_ymd_and_hms(2025, 9, 10, 9, 0, 0).unwrap();
    Shift {
        id: id.to_string(),
        hospital_id: "h1".to_string(),
        dept: Some("ER".to_string()),
        role: Some("attending".to_string()),
        start_at,
        end_at: start_at + Duration::hours(12),
        required_skills: Some(vec!["em".to_string(), "intubation".to_string()]),
        comp_base: Some(120_000.0),
        surcharge_factor: surcharge,
        status: ShiftStatus::Open,
        max_doctors: Some(1),
        highlight: None,
        workation: None,
        hospital: Some(HospitalSnapshot {
            id: "h1".to_string(),
            name: Some("Shinjuku General".to_string()),
            lat: Some(lat),
            lng: Some(lng),
            ehr_type: Some(ehr.to_string()),
        }),
    }
}

#[test]
fn test_haversine_distance_zero() {
    let tokyo = GeoPoint::new(35.6812, 139.7671);
    assert_eq!(haversine_km(tokyo, tokyo), 0.0);
}

#[test]
fn test_haversine_symmetry() {
    let pairs = [
        (GeoPoint::new(35.68, 139.76), GeoPoint::new(35.6895, 139.6917)),
        (GeoPoint::new(43.0621, 141.3544), GeoPoint::new(26.2124, 127.6809)),
        (GeoPoint::new(-33.8688, 151.2093), GeoPoint::new(51.5074, -0.1278)),
    ];

    for (a, b) in pairs {
        assert!((haversine_km(a, b) - haversine_km(b, a)).abs() < 1e-9);
    }
}

#[test]
fn test_haversine_matches_geo_crate() {
    let pairs = [
        (GeoPoint::new(35.68, 139.76), GeoPoint::new(35.6895, 139.6917)),
        (GeoPoint::new(35.6812, 139.7671), GeoPoint::new(34.7025, 135.4959)),
        (GeoPoint::new(43.0621, 141.3544), GeoPoint::new(26.2124, 127.6809)),
    ];

    for (a, b) in pairs {
        let ours = haversine_km(a, b);
        let reference_m = point!(x: a.lng, y: a.lat).haversine_distance(&point!(x: b.lng, y: b.lat));
        let reference_km = reference_m / 1000.0;

        // geo uses a slightly larger mean radius (6371.0088 km)
        let relative = (ours - reference_km).abs() / reference_km;
        assert!(relative < 1e-5, "ours={} geo={}", ours, reference_km);
    }
}

#[test]
fn test_tokyo_scenario_within_one_point() {
    let doctor = create_test_doctor("Fujitsu");
    let shift = create_test_shift("s1", 35.6895, 139.6917, "Fujitsu", Some(1.5));

    let breakdown = score_breakdown(&doctor, &shift);

    assert_eq!(breakdown.ehr, 30.0);
    assert_eq!(breakdown.skills, 10.0);
    assert!(breakdown.proximity > 29.0 && breakdown.proximity <= 30.0);
    assert_eq!(breakdown.experience, 10.0);
    assert_eq!(breakdown.urgency, 3.0);

    let score = score_match(&doctor, &shift);
    assert!((82..=84).contains(&score), "score was {}", score);
}

#[test]
fn test_ehr_bonus_exactness() {
    let shift = create_test_shift("s1", 35.68, 139.76, "HOPE", None);

    let with = score_breakdown(&create_test_doctor("HOPE"), &shift);
    let without = score_breakdown(&create_test_doctor("MegaOak"), &shift);

    assert_eq!(with.ehr - without.ehr, EHR_MATCH_POINTS);
    assert_eq!(with.skills, without.skills);
    assert_eq!(with.proximity, without.proximity);
}

#[test]
fn test_skill_saturation() {
    let mut doctor = create_test_doctor("HOPE");
    doctor.skills = Some(
        ["em", "icu", "intubation", "suturing", "ultrasound", "pediatrics"]
            .iter()
            .map(|s| s.to_string())
            .collect(),
    );
    let mut shift = create_test_shift("s1", 35.68, 139.76, "HOPE", None);
    shift.required_skills = doctor.skills.clone();

    assert_eq!(skill_points(4), SKILL_POINTS_CAP);
    assert_eq!(score_breakdown(&doctor, &shift).skills, SKILL_POINTS_CAP);
}

#[test]
fn test_skill_overlap_ignores_case() {
    let mut doctor = create_test_doctor("HOPE");
    doctor.skills = Some(vec!["EM".to_string(), "Intubation".to_string()]);
    let shift = create_test_shift("s1", 35.68, 139.76, "HOPE", None);

    assert_eq!(score_breakdown(&doctor, &shift).skills, 10.0);
}

#[test]
fn test_proximity_monotonic() {
    let mut previous = proximity_points(0.0);
    assert_eq!(previous, PROXIMITY_MAX_POINTS);

    for km in (10..=400).step_by(10) {
        let points = proximity_points(km as f64);
        assert!(points <= previous);
        previous = points;
    }

    assert_eq!(proximity_points(300.0), 0.0);
    assert_eq!(proximity_points(1000.0), 0.0);
}

#[test]
fn test_missing_coordinates_skip_proximity() {
    let shift = create_test_shift("s1", 35.68, 139.76, "HOPE", None);

    let mut no_lng = create_test_doctor("HOPE");
    no_lng.lng = None;
    assert_eq!(score_breakdown(&no_lng, &shift).proximity, 0.0);

    let mut hospital_without_coords = shift.clone();
    if let Some(hospital) = hospital_without_coords.hospital.as_mut() {
        hospital.lat = None;
    }
    assert_eq!(score_breakdown(&create_test_doctor("HOPE"), &hospital_without_coords).proximity, 0.0);
}

#[test]
fn test_zero_latitude_is_a_real_coordinate() {
    let mut doctor = create_test_doctor("HOPE");
    doctor.lat = Some(0.0);
    doctor.lng = Some(0.0);
    let shift = create_test_shift("s1", 0.0, 0.0, "HOPE", None);

    assert_eq!(score_breakdown(&doctor, &shift).proximity, PROXIMITY_MAX_POINTS);
}

#[test]
fn test_score_bounds() {
    let doctor = create_test_doctor("HOPE");
    let surcharges = [None, Some(0.0), Some(1.0), Some(5.0), Some(100.0), Some(f64::NAN), Some(-3.0)];
    let locations = [(35.68, 139.76), (36.5, 140.0), (43.06, 141.35), (-33.87, 151.21)];

    for surcharge in surcharges {
        for (lat, lng) in locations {
            let shift = create_test_shift("s", lat, lng, "HOPE", surcharge);
            let breakdown = score_breakdown(&doctor, &shift);
            assert!(breakdown.urgency >= 0.0 && breakdown.urgency <= URGENCY_POINTS_CAP);
            assert!(score_match(&doctor, &shift) <= MAX_SCORE);
        }
    }
}

#[test]
fn test_perfect_match_reaches_max_score() {
    let mut doctor = create_test_doctor("HOPE");
    doctor.skills = Some(["a", "b", "c", "d"].iter().map(|s| s.to_string()).collect());
    let mut shift = create_test_shift("s1", 35.68, 139.76, "HOPE", Some(5.0));
    shift.required_skills = doctor.skills.clone();

    assert_eq!(score_match(&doctor, &shift), MAX_SCORE);
}

#[test]
fn test_ranking_cap_on_large_input() {
    let doctor = create_test_doctor("HOPE");
    let shifts: Vec<Shift> = (0..1000)
        .map(|i| {
            let offset = (i as f64 * 0.003) % 3.0;
            create_test_shift(&format!("s{:04}", i), 35.68 + offset, 139.76, "HOPE", Some(1.0 + (i % 5) as f64))
        })
        .collect();

    let ranked = Matcher::rank(&doctor, shifts);

    assert_eq!(ranked.len(), MAX_RANKED_RESULTS);
    for pair in ranked.windows(2) {
        assert!(pair[0].score >= pair[1].score);
    }
}

#[test]
fn test_ranking_is_independent_of_input_order() {
    let doctor = create_test_doctor("HOPE");
    let shifts: Vec<Shift> = (0..40)
        .map(|i| create_test_shift(&format!("s{:02}", i), 35.68 + (i % 4) as f64 * 0.5, 139.76, "HOPE", None))
        .collect();
    let mut reversed = shifts.clone();
    reversed.reverse();

    let forward: Vec<String> = Matcher::rank(&doctor, shifts).into_iter().map(|r| r.shift.id).collect();
    let backward: Vec<String> = Matcher::rank(&doctor, reversed).into_iter().map(|r| r.shift.id).collect();

    assert_eq!(forward, backward);
}
