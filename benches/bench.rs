// Criterion benchmarks for Locum Match

use chrono::{Duration, TimeZone, Utc};
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use locum_match::core::{haversine_km, score_match, Matcher};
use locum_match::models::{Doctor, GeoPoint, HospitalSnapshot, Shift, ShiftStatus};

const EHR_SYSTEMS: [&str; 4] = ["HOPE", "Hitachi", "CITA", "MegaOak"];
const SKILLS: [&str; 6] = ["em", "intubation", "suturing", "ultrasound", "icu", "pediatrics"];

fn create_doctor() -> Doctor {
    Doctor {
        id: "bench-doctor".to_string(),
        years_of_exp: Some(8),
        skills: Some(vec!["em".to_string(), "intubation".to_string(), "ICU".to_string()]),
        ehr_experience: Some(vec!["HOPE".to_string()]),
        lat: Some(35.6812),
        lng: Some(139.7671),
        ..Default::default()
    }
}

fn create_shift(id: usize, lat: f64, lng: f64) -> Shift {
    let start_at = Utc.with_ymd_and_hms(2025, 9, 10, 9, 0, 0).unwrap() + Duration::hours(id as i64);
    Shift {
        id: format!("shift-{}", id),
        hospital_id: format!("h{}", id % 50),
        dept: Some("ER".to_string()),
        role: None,
        start_at,
        end_at: start_at + Duration::hours(12),
        required_skills: Some(
            SKILLS
                .iter()
                .cycle()
                .skip(id % SKILLS.len())
                .take(1 + id % 4)
                .map(|s| s.to_string())
                .collect(),
        ),
        comp_base: Some(120_000.0),
        surcharge_factor: Some(1.0 + (id % 5) as f64 * 0.5),
        status: ShiftStatus::Open,
        max_doctors: Some(1),
        highlight: None,
        workation: None,
        hospital: Some(HospitalSnapshot {
            id: format!("h{}", id % 50),
            name: None,
            lat: Some(lat),
            lng: Some(lng),
            ehr_type: Some(EHR_SYSTEMS[id % EHR_SYSTEMS.len()].to_string()),
        }),
    }
}

fn create_shifts(count: usize) -> Vec<Shift> {
    (0..count)
        .map(|i| {
            let lat_offset = (i as f64 * 0.01) % 3.0;
            let lng_offset = (i as f64 * 0.01) % 3.0;
            create_shift(i, 35.6812 + lat_offset, 139.7671 - lng_offset)
        })
        .collect()
}

fn bench_haversine(c: &mut Criterion) {
    let tokyo = GeoPoint::new(35.6812, 139.7671);
    let utsunomiya = GeoPoint::new(36.5551, 139.8828);

    c.bench_function("haversine_km", |b| {
        b.iter(|| haversine_km(black_box(tokyo), black_box(utsunomiya)));
    });
}

fn bench_score_match(c: &mut Criterion) {
    let doctor = create_doctor();
    let shift = create_shift(0, 36.5551, 139.8828);

    c.bench_function("score_match", |b| {
        b.iter(|| score_match(black_box(&doctor), black_box(&shift)));
    });
}

fn bench_rank(c: &mut Criterion) {
    let doctor = create_doctor();

    let mut group = c.benchmark_group("ranking");

    for shift_count in [10, 50, 100, 500, 1000].iter() {
        let shifts = create_shifts(*shift_count);

        group.bench_with_input(BenchmarkId::new("rank", shift_count), shift_count, |b, _| {
            b.iter(|| Matcher::rank(black_box(&doctor), black_box(shifts.clone())));
        });
    }

    group.finish();
}

criterion_group!(benches, bench_haversine, bench_score_match, bench_rank);

criterion_main!(benches);
