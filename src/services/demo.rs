use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use tokio::sync::{Mutex, RwLock};

use crate::models::{
    AccommodationSupport, Application, Doctor, Hospital, Program, ProgramCategory, Region, Shift,
    ShiftHighlight, ShiftStatus, StoreCounts, Testimonial, TransportAccess, Workation,
};
use crate::services::store::{MarketplaceStore, StoreError};

/// Doctor used by the match endpoint when no `doctorId` is given
pub const DEMO_DOCTOR_ID: &str = "demo-doctor";

const URGENT_BADGE: &str = "Urgently hiring";

/// Built-in marketplace catalogue
///
/// Served when no database is configured and used as the payload of the
/// seed endpoint. Shift times are relative to the moment the catalogue is
/// built so the urgent listing always has content.
#[derive(Debug, Clone)]
pub struct DemoCatalogue {
    pub doctors: Vec<Doctor>,
    pub hospitals: Vec<Hospital>,
    pub shifts: Vec<Shift>,
    pub regions: Vec<Region>,
    pub programs: Vec<Program>,
    pub testimonials: Vec<Testimonial>,
}

impl DemoCatalogue {
    pub fn new(now: DateTime<Utc>) -> Self {
        Self {
            doctors: vec![demo_doctor()],
            hospitals: demo_hospitals(),
            shifts: demo_shifts(now),
            regions: demo_regions(),
            programs: demo_programs(),
            testimonials: demo_testimonials(now),
        }
    }

    pub fn counts(&self) -> StoreCounts {
        StoreCounts {
            doctors: self.doctors.len() as u64,
            hospitals: self.hospitals.len() as u64,
            shifts: self.shifts.len() as u64,
            regions: self.regions.len() as u64,
            programs: self.programs.len() as u64,
            testimonials: self.testimonials.len() as u64,
            applications: 0,
        }
    }

    /// Attach the owning hospital's snapshot to a shift
    fn joined(&self, shift: &Shift) -> Shift {
        let mut shift = shift.clone();
        shift.hospital = self
            .hospitals
            .iter()
            .find(|h| h.id == shift.hospital_id)
            .map(Hospital::snapshot);
        shift
    }
}

/// The demo doctor profile
pub fn demo_doctor() -> Doctor {
    Doctor {
        id: DEMO_DOCTOR_ID.to_string(),
        name: Some("Demo Doctor".to_string()),
        years_of_exp: Some(8),
        skills: Some(vec!["em".to_string(), "intubation".to_string(), "suturing".to_string()]),
        ehr_experience: Some(vec!["HOPE".to_string()]),
        lat: Some(35.68),
        lng: Some(139.76),
        rating: Some(4.7),
        cancel_rate: Some(0.02),
    }
}

/// In-memory store backed by a [`DemoCatalogue`]
pub struct DemoStore {
    catalogue: RwLock<DemoCatalogue>,
    applications: Mutex<Vec<Application>>,
}

impl DemoStore {
    pub fn new() -> Self {
        Self::with_catalogue(DemoCatalogue::new(Utc::now()))
    }

    pub fn with_catalogue(catalogue: DemoCatalogue) -> Self {
        Self {
            catalogue: RwLock::new(catalogue),
            applications: Mutex::new(Vec::new()),
        }
    }

    /// Applications recorded so far, oldest first
    pub async fn applications(&self) -> Vec<Application> {
        self.applications.lock().await.clone()
    }
}

impl Default for DemoStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl MarketplaceStore for DemoStore {
    fn backend(&self) -> &'static str {
        "demo"
    }

    async fn get_doctor(&self, doctor_id: &str) -> Result<Doctor, StoreError> {
        self.catalogue
            .read()
            .await
            .doctors
            .iter()
            .find(|d| d.id == doctor_id)
            .cloned()
            .ok_or_else(|| StoreError::not_found("doctor", doctor_id))
    }

    async fn list_shifts(&self) -> Result<Vec<Shift>, StoreError> {
        let catalogue = self.catalogue.read().await;
        Ok(catalogue.shifts.iter().map(|s| catalogue.joined(s)).collect())
    }

    async fn get_shift(&self, shift_id: &str) -> Result<Shift, StoreError> {
        let catalogue = self.catalogue.read().await;
        catalogue
            .shifts
            .iter()
            .find(|s| s.id == shift_id)
            .map(|s| catalogue.joined(s))
            .ok_or_else(|| StoreError::not_found("shift", shift_id))
    }

    async fn list_hospitals(&self) -> Result<Vec<Hospital>, StoreError> {
        Ok(self.catalogue.read().await.hospitals.clone())
    }

    async fn list_regions(&self) -> Result<Vec<Region>, StoreError> {
        Ok(self.catalogue.read().await.regions.clone())
    }

    async fn list_programs(&self) -> Result<Vec<Program>, StoreError> {
        Ok(self.catalogue.read().await.programs.clone())
    }

    async fn list_testimonials(&self) -> Result<Vec<Testimonial>, StoreError> {
        Ok(self.catalogue.read().await.testimonials.clone())
    }

    async fn create_application(&self, application: &Application) -> Result<(), StoreError> {
        let mut applications = self.applications.lock().await;
        if applications.iter().any(|a| a.id == application.id) {
            return Err(StoreError::Conflict {
                kind: "application",
                id: application.id.clone(),
            });
        }
        applications.push(application.clone());
        Ok(())
    }

    async fn counts(&self) -> Result<StoreCounts, StoreError> {
        let mut counts = self.catalogue.read().await.counts();
        counts.applications = self.applications.lock().await.len() as u64;
        Ok(counts)
    }

    async fn seed(&self, incoming: &DemoCatalogue) -> Result<StoreCounts, StoreError> {
        {
            let mut catalogue = self.catalogue.write().await;
            upsert_by_id(&mut catalogue.doctors, &incoming.doctors, |d| &d.id);
            upsert_by_id(&mut catalogue.hospitals, &incoming.hospitals, |h| &h.id);
            upsert_by_id(&mut catalogue.shifts, &incoming.shifts, |s| &s.id);
            upsert_by_id(&mut catalogue.regions, &incoming.regions, |r| &r.id);
            upsert_by_id(&mut catalogue.programs, &incoming.programs, |p| &p.id);
            upsert_by_id(&mut catalogue.testimonials, &incoming.testimonials, |t| &t.id);
        }
        self.counts().await
    }

    async fn health_check(&self) -> Result<bool, StoreError> {
        Ok(true)
    }
}

/// Replace records with a matching id, append the rest
fn upsert_by_id<T, F>(records: &mut Vec<T>, incoming: &[T], id: F)
where
    T: Clone,
    F: Fn(&T) -> &String,
{
    for record in incoming {
        match records.iter().position(|existing| id(existing) == id(record)) {
            Some(index) => records[index] = record.clone(),
            None => records.push(record.clone()),
        }
    }
}

fn strings(values: &[&str]) -> Vec<String> {
    values.iter().map(|v| v.to_string()).collect()
}

#[allow(clippy::too_many_arguments)]
fn hospital(
    id: &str,
    name: &str,
    (lat, lng): (f64, f64),
    ehr_type: &str,
    address: &str,
    region: &str,
    facility_type: &str,
    bed_count: u32,
) -> Hospital {
    Hospital {
        id: id.to_string(),
        name: name.to_string(),
        lat: Some(lat),
        lng: Some(lng),
        ehr_type: Some(ehr_type.to_string()),
        address: Some(address.to_string()),
        region: Some(region.to_string()),
        facility_type: Some(facility_type.to_string()),
        bed_count: Some(bed_count),
        ..Default::default()
    }
}

fn demo_hospitals() -> Vec<Hospital> {
    vec![
        Hospital {
            dept_list: strings(&["ER", "IM", "Pediatrics", "Surgery", "Orthopedics"]),
            transport_access: Some(TransportAccess {
                station: Some("15 min by car from Utsunomiya Station".to_string()),
                airport: Some("70 min from Narita Airport".to_string()),
            }),
            accommodation_support: Some(AccommodationSupport { has_dorm: true, subsidy_jpy: 3000 }),
            amenities: strings(&["cafeteria", "parking", "gym"]),
            catch_copy: Some("A regional hub surrounded by nature".to_string()),
            rating_avg: Some(4.5),
            review_count: Some(12),
            specialties: strings(&["emergency medicine", "general practice"]),
            features: strings(&["nature", "shinkansen access", "hot springs"]),
            programs: strings(&["prog_1", "prog_2", "prog_4"]),
            ..hospital(
                "h1",
                "Utsunomiya General Hospital",
                (36.5551, 139.8828),
                "HOPE",
                "1-1 Honcho, Utsunomiya, Tochigi",
                "region_2",
                "general",
                450,
            )
        },
        Hospital {
            dept_list: strings(&["IM", "Outpatient", "Cardiology", "Neurology"]),
            transport_access: Some(TransportAccess {
                station: Some("10 min by car from Maebashi Station".to_string()),
                airport: Some("60 min from Narita Airport".to_string()),
            }),
            accommodation_support: Some(AccommodationSupport { has_dorm: false, subsidy_jpy: 0 }),
            amenities: strings(&["parking", "library"]),
            catch_copy: Some("Calm community care at the foot of Mount Akagi".to_string()),
            rating_avg: Some(4.2),
            review_count: Some(5),
            specialties: strings(&["cardiology", "neurology"]),
            features: strings(&["nature", "car commute", "hot springs"]),
            programs: strings(&["prog_2", "prog_5"]),
            ..hospital(
                "h2",
                "Maebashi Medical Center",
                (36.3895, 139.0634),
                "Hitachi",
                "2-2 Otemachi, Maebashi, Gunma",
                "region_2",
                "general",
                280,
            )
        },
        Hospital {
            dept_list: strings(&["ER", "IM", "Pediatrics", "Surgery", "Orthopedics", "Cardiology"]),
            transport_access: Some(TransportAccess {
                station: Some("5 min walk from Sapporo Station".to_string()),
                airport: Some("40 min from New Chitose Airport".to_string()),
            }),
            accommodation_support: Some(AccommodationSupport { has_dorm: true, subsidy_jpy: 5000 }),
            amenities: strings(&["cafeteria", "parking", "gym", "library"]),
            catch_copy: Some("Hands-on practice at the heart of snow-country medicine".to_string()),
            rating_avg: Some(4.7),
            review_count: Some(18),
            specialties: strings(&["emergency medicine", "cardiology", "pediatrics"]),
            features: strings(&["nature", "snow-country medicine", "city access"]),
            programs: strings(&["prog_1", "prog_3", "prog_4", "prog_5"]),
            ..hospital(
                "h3",
                "Sapporo Central Hospital",
                (43.0642, 141.3469),
                "HOPE",
                "Odori Nishi 1-1, Chuo-ku, Sapporo, Hokkaido",
                "region_1",
                "general",
                600,
            )
        },
        Hospital {
            dept_list: strings(&[
                "ER", "IM", "Pediatrics", "Surgery", "Orthopedics", "Cardiology", "Neurology",
            ]),
            transport_access: Some(TransportAccess {
                station: Some("3 min walk from Hakata Station".to_string()),
                airport: Some("15 min from Fukuoka Airport".to_string()),
            }),
            accommodation_support: Some(AccommodationSupport { has_dorm: true, subsidy_jpy: 4000 }),
            amenities: strings(&["cafeteria", "parking", "gym", "library"]),
            catch_copy: Some("International medicine at the gateway to Asia".to_string()),
            rating_avg: Some(4.6),
            review_count: Some(15),
            specialties: strings(&["emergency medicine", "international medicine", "cardiology"]),
            features: strings(&["city access", "international exchange", "warm climate"]),
            programs: strings(&["prog_1", "prog_2", "prog_4", "prog_6"]),
            ..hospital(
                "h4",
                "Fukuoka General Hospital",
                (33.5904, 130.4017),
                "HOPE",
                "Hakata Ekimae 1-1, Hakata-ku, Fukuoka",
                "region_6",
                "general",
                520,
            )
        },
        Hospital {
            dept_list: strings(&["ER", "IM", "Pediatrics", "Surgery", "Orthopedics"]),
            transport_access: Some(TransportAccess {
                station: Some("20 min by car from Naha Airport Station".to_string()),
                airport: Some("20 min from Naha Airport".to_string()),
            }),
            accommodation_support: Some(AccommodationSupport { has_dorm: true, subsidy_jpy: 6000 }),
            amenities: strings(&["cafeteria", "parking", "gym"]),
            catch_copy: Some("Community medicine in a southern island paradise".to_string()),
            rating_avg: Some(4.8),
            review_count: Some(22),
            specialties: strings(&["emergency medicine", "pediatrics", "international medicine"]),
            features: strings(&["warm climate", "remote islands", "international exchange"]),
            programs: strings(&["prog_2", "prog_5"]),
            ..hospital(
                "h5",
                "Okinawa Central Hospital",
                (26.2124, 127.6792),
                "HOPE",
                "Izumizaki 1-1, Naha, Okinawa",
                "region_6",
                "general",
                380,
            )
        },
        Hospital {
            dept_list: strings(&[
                "ER", "IM", "Pediatrics", "Surgery", "Orthopedics", "Cardiology", "Neurology",
                "Oncology",
            ]),
            transport_access: Some(TransportAccess {
                station: Some("10 min walk from Demachiyanagi Station".to_string()),
                airport: Some("90 min from Kansai Airport".to_string()),
            }),
            accommodation_support: Some(AccommodationSupport { has_dorm: true, subsidy_jpy: 2000 }),
            amenities: strings(&["cafeteria", "parking", "gym", "library", "research"]),
            catch_copy: Some("Advanced care in the thousand-year capital".to_string()),
            rating_avg: Some(4.9),
            review_count: Some(35),
            specialties: strings(&["research medicine", "advanced care", "education"]),
            features: strings(&["culture", "urban", "frequent conferences"]),
            programs: strings(&["prog_3", "prog_6"]),
            ..hospital(
                "h6",
                "Kyoto University Hospital",
                (35.0116, 135.7681),
                "HOPE",
                "54 Shogoin Kawaharacho, Sakyo-ku, Kyoto",
                "region_4",
                "university",
                1200,
            )
        },
    ]
}

#[allow(clippy::too_many_arguments)]
fn shift(
    now: DateTime<Utc>,
    id: &str,
    hospital_id: &str,
    (dept, role): (&str, &str),
    (start_hours, end_hours): (i64, i64),
    required_skills: &[&str],
    comp_base: f64,
    surcharge_factor: f64,
    urgent: bool,
) -> Shift {
    Shift {
        id: id.to_string(),
        hospital_id: hospital_id.to_string(),
        dept: Some(dept.to_string()),
        role: Some(role.to_string()),
        start_at: now + Duration::hours(start_hours),
        end_at: now + Duration::hours(end_hours),
        required_skills: Some(strings(required_skills)),
        comp_base: Some(comp_base),
        surcharge_factor: Some(surcharge_factor),
        status: ShiftStatus::Open,
        max_doctors: Some(1),
        highlight: Some(ShiftHighlight {
            urgent,
            badge: urgent.then(|| URGENT_BADGE.to_string()),
        }),
        workation: Some(Workation { enabled: urgent }),
        hospital: None,
    }
}

fn demo_shifts(now: DateTime<Utc>) -> Vec<Shift> {
    vec![
        shift(now, "1", "h1", ("ER", "night-shift"), (2, 10), &["em", "intubation"], 25000.0, 1.5, false),
        shift(now, "2", "h2", ("IM", "outpatient"), (8, 16), &["em"], 22000.0, 1.2, false),
        shift(now, "3", "h3", ("Peds", "outpatient"), (12, 18), &["suturing"], 18000.0, 1.0, false),
        shift(
            now,
            "4",
            "h4",
            ("OBGYN", "night-shift"),
            (24, 32),
            &["em", "intubation", "suturing"],
            30000.0,
            2.0,
            false,
        ),
        shift(now, "urgent1", "h1", ("ER", "night-shift"), (2, 18), &["ACLS"], 80000.0, 1.3, true),
        Shift {
            max_doctors: Some(2),
            ..shift(now, "urgent2", "h2", ("IM", "outpatient"), (24, 32), &["IM"], 100000.0, 1.5, true)
        },
    ]
}

#[allow(clippy::too_many_arguments)]
fn region(
    id: &str,
    name: &str,
    prefectures: &[&str],
    description: &str,
    features: &[&str],
    popular: bool,
    (lat, lng): (f64, f64),
    access_info: &str,
) -> Region {
    Region {
        id: id.to_string(),
        name: name.to_string(),
        prefectures: strings(prefectures),
        description: Some(description.to_string()),
        features: strings(features),
        photo: None,
        popular,
        lat: Some(lat),
        lng: Some(lng),
        access_info: Some(access_info.to_string()),
    }
}

fn demo_regions() -> Vec<Region> {
    vec![
        region(
            "region_1",
            "Hokkaido-Tohoku",
            &["Hokkaido", "Aomori", "Iwate", "Miyagi", "Akita", "Yamagata", "Fukushima"],
            "Vast nature and close-knit community care",
            &["nature", "hot springs", "snow-country medicine"],
            true,
            (43.0642, 141.3469),
            "1 hour by car from New Chitose Airport",
        ),
        region(
            "region_2",
            "Kanto",
            &["Ibaraki", "Tochigi", "Gunma", "Saitama", "Chiba", "Tokyo", "Kanagawa"],
            "Closing the gap between urban and rural care",
            &["city access", "shinkansen", "frequent conferences"],
            true,
            (35.6762, 139.6503),
            "1 hour by train from Narita or Haneda",
        ),
        region(
            "region_3",
            "Chubu-Hokuriku",
            &[
                "Niigata", "Toyama", "Ishikawa", "Fukui", "Yamanashi", "Nagano", "Gifu", "Shizuoka",
                "Aichi",
            ],
            "Linking mountain and city care",
            &["mountain medicine", "hot springs", "car commute"],
            false,
            (36.2048, 138.2529),
            "2 hours from Tokyo by shinkansen",
        ),
        region(
            "region_4",
            "Kansai",
            &["Mie", "Shiga", "Kyoto", "Osaka", "Hyogo", "Nara", "Wakayama"],
            "Medicine in towns of history and culture",
            &["culture", "urban", "good transit"],
            true,
            (34.6937, 135.5023),
            "1 hour by train from Kansai Airport",
        ),
        region(
            "region_5",
            "Chugoku-Shikoku",
            &[
                "Tottori", "Shimane", "Okayama", "Hiroshima", "Yamaguchi", "Tokushima", "Kagawa",
                "Ehime", "Kochi",
            ],
            "Supporting island and mountain communities",
            &["island medicine", "nature", "community"],
            false,
            (34.3853, 132.4553),
            "30 min by car from Hiroshima Airport",
        ),
        region(
            "region_6",
            "Kyushu-Okinawa",
            &[
                "Fukuoka", "Saga", "Nagasaki", "Kumamoto", "Oita", "Miyazaki", "Kagoshima",
                "Okinawa",
            ],
            "Practice in a warm southern climate",
            &["warm climate", "remote islands", "international exchange"],
            true,
            (33.5904, 130.4017),
            "15 min by subway from Fukuoka Airport",
        ),
    ]
}

#[allow(clippy::too_many_arguments)]
fn program(
    id: &str,
    name: &str,
    category: ProgramCategory,
    duration_weeks: u32,
    description: &str,
    features: &[&str],
    price_range: &str,
    popular: bool,
) -> Program {
    Program {
        id: id.to_string(),
        name: name.to_string(),
        category,
        duration_weeks: Some(duration_weeks),
        target_audience: Some("Doctors in years 6-15".to_string()),
        description: Some(description.to_string()),
        features: strings(features),
        price_range: Some(price_range.to_string()),
        photo: None,
        popular,
    }
}

fn demo_programs() -> Vec<Program> {
    vec![
        program(
            "prog_1",
            "Short intensive program",
            ProgramCategory::ShortTerm,
            2,
            "Two weeks of hands-on regional practice",
            &["emergency response", "community liaison", "case review"],
            "JPY 500k-800k",
            true,
        ),
        program(
            "prog_2",
            "Mid-term practice program",
            ProgramCategory::MediumTerm,
            4,
            "A month of in-depth regional medicine",
            &["general practice", "team care", "community exchange"],
            "JPY 800k-1.2M",
            true,
        ),
        program(
            "prog_3",
            "Long-term training program",
            ProgramCategory::LongTerm,
            12,
            "Three months building regional healthcare leadership",
            &["healthcare management", "policy", "mentoring"],
            "JPY 2M-3M",
            false,
        ),
        program(
            "prog_4",
            "Emergency specialty program",
            ProgramCategory::Specialty,
            3,
            "Practice emergency skills in a regional setting",
            &["trauma", "disaster medicine", "team coordination"],
            "JPY 700k-1M",
            true,
        ),
        program(
            "prog_5",
            "Pediatrics specialty program",
            ProgramCategory::Specialty,
            4,
            "Apply pediatric expertise in the community",
            &["pediatric emergency", "developmental support", "family support"],
            "JPY 800k-1.2M",
            false,
        ),
        program(
            "prog_6",
            "Online training program",
            ProgramCategory::Online,
            1,
            "Regional medicine fundamentals, online",
            &["video lectures", "case review", "discussion"],
            "JPY 100k-200k",
            true,
        ),
    ]
}

#[allow(clippy::too_many_arguments)]
fn testimonial(
    now: DateTime<Utc>,
    id: &str,
    doctor_name: &str,
    specialty: &str,
    experience_years: u32,
    (hospital_id, program_id): (&str, &str),
    rating: u8,
    content: &str,
    days_ago: i64,
) -> Testimonial {
    Testimonial {
        id: id.to_string(),
        doctor_name: doctor_name.to_string(),
        specialty: Some(specialty.to_string()),
        experience_years: Some(experience_years),
        hospital_id: Some(hospital_id.to_string()),
        program_id: Some(program_id.to_string()),
        rating: Some(rating),
        content: content.to_string(),
        photo: None,
        created_at: now - Duration::days(days_ago),
    }
}

fn demo_testimonials(now: DateTime<Utc>) -> Vec<Testimonial> {
    vec![
        testimonial(
            now,
            "test_1",
            "Dr. Tanaka",
            "Emergency",
            8,
            ("h1", "prog_1"),
            5,
            "Two weeks in Utsunomiya gave me practical regional skills, and the hot springs were a bonus.",
            30,
        ),
        testimonial(
            now,
            "test_2",
            "Dr. Sato",
            "Internal medicine",
            12,
            ("h3", "prog_2"),
            5,
            "A month in Sapporo was a rare taste of snow-country medicine and real team care.",
            45,
        ),
        testimonial(
            now,
            "test_3",
            "Dr. Yamada",
            "Cardiology",
            10,
            ("h4", "prog_4"),
            4,
            "The Fukuoka emergency program added an international perspective.",
            60,
        ),
        testimonial(
            now,
            "test_4",
            "Dr. Suzuki",
            "Pediatrics",
            7,
            ("h5", "prog_5"),
            5,
            "Pediatrics in Okinawa's warm climate was a wonderful experience.",
            20,
        ),
        testimonial(
            now,
            "test_5",
            "Dr. Takahashi",
            "Research",
            15,
            ("h6", "prog_3"),
            5,
            "Long-term training in Kyoto combined research and clinical work.",
            10,
        ),
        testimonial(
            now,
            "test_6",
            "Dr. Ito",
            "Internal medicine",
            9,
            ("h2", "prog_2"),
            4,
            "Maebashi was a good place to learn community-rooted care.",
            15,
        ),
    ]
}
