use async_trait::async_trait;
use sqlx::postgres::{PgPoolOptions, PgRow};
use sqlx::{PgPool, Postgres, Row, Transaction};
use std::time::Duration;

use crate::models::{
    AccommodationSupport, Application, Doctor, Hospital, HospitalSnapshot, Program,
    ProgramCategory, Region, Shift, ShiftHighlight, ShiftStatus, StoreCounts, Testimonial,
    TransportAccess, Workation,
};
use crate::services::demo::DemoCatalogue;
use crate::services::store::{MarketplaceStore, StoreError};

/// Shift columns plus the joined hospital snapshot
const SHIFT_SELECT: &str = r#"
    SELECT
        s.id, s.hospital_id, s.dept, s.role, s.start_at, s.end_at,
        s.required_skills, s.comp_base, s.surcharge_factor, s.status,
        s.max_doctors, s.urgent, s.badge, s.workation_enabled,
        h.id AS h_id, h.name AS h_name, h.lat AS h_lat, h.lng AS h_lng,
        h.ehr_type AS h_ehr_type
    FROM shifts s
    LEFT JOIN hospitals h ON h.id = s.hospital_id
"#;

/// PostgreSQL-backed marketplace store
///
/// Migrations under `./migrations` run on connect.
pub struct PostgresStore {
    pool: PgPool,
}

impl PostgresStore {
    /// Create a new store from a connection string
    pub async fn new(
        database_url: &str,
        max_connections: u32,
        min_connections: u32,
        acquire_timeout: Duration,
        idle_timeout: Duration,
    ) -> Result<Self, StoreError> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .min_connections(min_connections)
            .acquire_timeout(acquire_timeout)
            .idle_timeout(idle_timeout)
            .test_before_acquire(true)
            .connect(database_url)
            .await?;

        // Run migrations on startup
        sqlx::migrate!("./migrations").run(&pool).await?;

        Ok(Self { pool })
    }

    /// Create a new store from settings
    pub async fn from_settings(
        url: &str,
        max_connections: Option<u32>,
        min_connections: Option<u32>,
        acquire_timeout_secs: Option<u64>,
        idle_timeout_secs: Option<u64>,
    ) -> Result<Self, StoreError> {
        tracing::info!("Connecting to PostgreSQL");

        Self::new(
            url,
            max_connections.unwrap_or(10),
            min_connections.unwrap_or(1),
            Duration::from_secs(acquire_timeout_secs.unwrap_or(5)),
            Duration::from_secs(idle_timeout_secs.unwrap_or(600)),
        )
        .await
    }

    async fn upsert_doctor(tx: &mut Transaction<'_, Postgres>, doctor: &Doctor) -> Result<(), StoreError> {
        let query = r#"
            INSERT INTO doctors (id, name, years_of_exp, skills, ehr_experience, lat, lng, rating, cancel_rate)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            ON CONFLICT (id) DO UPDATE SET
                name = EXCLUDED.name,
                years_of_exp = EXCLUDED.years_of_exp,
                skills = EXCLUDED.skills,
                ehr_experience = EXCLUDED.ehr_experience,
                lat = EXCLUDED.lat,
                lng = EXCLUDED.lng,
                rating = EXCLUDED.rating,
                cancel_rate = EXCLUDED.cancel_rate,
                updated_at = NOW()
        "#;

        sqlx::query(query)
            .bind(&doctor.id)
            .bind(&doctor.name)
            .bind(to_i32(doctor.years_of_exp))
            .bind(&doctor.skills)
            .bind(&doctor.ehr_experience)
            .bind(doctor.lat)
            .bind(doctor.lng)
            .bind(doctor.rating)
            .bind(doctor.cancel_rate)
            .execute(&mut **tx)
            .await?;
        Ok(())
    }

    async fn upsert_hospital(tx: &mut Transaction<'_, Postgres>, hospital: &Hospital) -> Result<(), StoreError> {
        let query = r#"
            INSERT INTO hospitals (
                id, name, lat, lng, ehr_type, address, region, facility_type, bed_count,
                dept_list, station_access, airport_access, has_dorm, dorm_subsidy_jpy,
                amenities, photos, catch_copy, rating_avg, review_count, specialties,
                features, programs
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16, $17, $18, $19, $20, $21, $22)
            ON CONFLICT (id) DO UPDATE SET
                name = EXCLUDED.name,
                lat = EXCLUDED.lat,
                lng = EXCLUDED.lng,
                ehr_type = EXCLUDED.ehr_type,
                address = EXCLUDED.address,
                region = EXCLUDED.region,
                facility_type = EXCLUDED.facility_type,
                bed_count = EXCLUDED.bed_count,
                dept_list = EXCLUDED.dept_list,
                station_access = EXCLUDED.station_access,
                airport_access = EXCLUDED.airport_access,
                has_dorm = EXCLUDED.has_dorm,
                dorm_subsidy_jpy = EXCLUDED.dorm_subsidy_jpy,
                amenities = EXCLUDED.amenities,
                photos = EXCLUDED.photos,
                catch_copy = EXCLUDED.catch_copy,
                rating_avg = EXCLUDED.rating_avg,
                review_count = EXCLUDED.review_count,
                specialties = EXCLUDED.specialties,
                features = EXCLUDED.features,
                programs = EXCLUDED.programs,
                updated_at = NOW()
        "#;

        let transport = hospital.transport_access.clone().unwrap_or_default();
        let accommodation = hospital.accommodation_support.as_ref();

        sqlx::query(query)
            .bind(&hospital.id)
            .bind(&hospital.name)
            .bind(hospital.lat)
            .bind(hospital.lng)
            .bind(&hospital.ehr_type)
            .bind(&hospital.address)
            .bind(&hospital.region)
            .bind(&hospital.facility_type)
            .bind(to_i32(hospital.bed_count))
            .bind(&hospital.dept_list)
            .bind(transport.station)
            .bind(transport.airport)
            .bind(accommodation.map(|a| a.has_dorm))
            .bind(to_i32(accommodation.map(|a| a.subsidy_jpy)))
            .bind(&hospital.amenities)
            .bind(&hospital.photos)
            .bind(&hospital.catch_copy)
            .bind(hospital.rating_avg)
            .bind(to_i32(hospital.review_count))
            .bind(&hospital.specialties)
            .bind(&hospital.features)
            .bind(&hospital.programs)
            .execute(&mut **tx)
            .await?;
        Ok(())
    }

    async fn upsert_shift(tx: &mut Transaction<'_, Postgres>, shift: &Shift) -> Result<(), StoreError> {
        let query = r#"
            INSERT INTO shifts (
                id, hospital_id, dept, role, start_at, end_at, required_skills, comp_base,
                surcharge_factor, status, max_doctors, urgent, badge, workation_enabled
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14)
            ON CONFLICT (id) DO UPDATE SET
                hospital_id = EXCLUDED.hospital_id,
                dept = EXCLUDED.dept,
                role = EXCLUDED.role,
                start_at = EXCLUDED.start_at,
                end_at = EXCLUDED.end_at,
                required_skills = EXCLUDED.required_skills,
                comp_base = EXCLUDED.comp_base,
                surcharge_factor = EXCLUDED.surcharge_factor,
                status = EXCLUDED.status,
                max_doctors = EXCLUDED.max_doctors,
                urgent = EXCLUDED.urgent,
                badge = EXCLUDED.badge,
                workation_enabled = EXCLUDED.workation_enabled,
                updated_at = NOW()
        "#;

        let highlight = shift.highlight.as_ref();

        sqlx::query(query)
            .bind(&shift.id)
            .bind(&shift.hospital_id)
            .bind(&shift.dept)
            .bind(&shift.role)
            .bind(shift.start_at)
            .bind(shift.end_at)
            .bind(&shift.required_skills)
            .bind(shift.comp_base)
            .bind(shift.surcharge_factor)
            .bind(shift.status.as_str())
            .bind(to_i32(shift.max_doctors))
            .bind(highlight.map(|h| h.urgent))
            .bind(highlight.and_then(|h| h.badge.clone()))
            .bind(shift.workation.as_ref().map(|w| w.enabled))
            .execute(&mut **tx)
            .await?;
        Ok(())
    }

    async fn upsert_region(tx: &mut Transaction<'_, Postgres>, region: &Region) -> Result<(), StoreError> {
        let query = r#"
            INSERT INTO regions (id, name, prefectures, description, features, photo, popular, lat, lng, access_info)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            ON CONFLICT (id) DO UPDATE SET
                name = EXCLUDED.name,
                prefectures = EXCLUDED.prefectures,
                description = EXCLUDED.description,
                features = EXCLUDED.features,
                photo = EXCLUDED.photo,
                popular = EXCLUDED.popular,
                lat = EXCLUDED.lat,
                lng = EXCLUDED.lng,
                access_info = EXCLUDED.access_info,
                updated_at = NOW()
        "#;

        sqlx::query(query)
            .bind(&region.id)
            .bind(&region.name)
            .bind(&region.prefectures)
            .bind(&region.description)
            .bind(&region.features)
            .bind(&region.photo)
            .bind(region.popular)
            .bind(region.lat)
            .bind(region.lng)
            .bind(&region.access_info)
            .execute(&mut **tx)
            .await?;
        Ok(())
    }

    async fn upsert_program(tx: &mut Transaction<'_, Postgres>, program: &Program) -> Result<(), StoreError> {
        let query = r#"
            INSERT INTO programs (
                id, name, category, duration_weeks, target_audience, description, features,
                price_range, photo, popular
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            ON CONFLICT (id) DO UPDATE SET
                name = EXCLUDED.name,
                category = EXCLUDED.category,
                duration_weeks = EXCLUDED.duration_weeks,
                target_audience = EXCLUDED.target_audience,
                description = EXCLUDED.description,
                features = EXCLUDED.features,
                price_range = EXCLUDED.price_range,
                photo = EXCLUDED.photo,
                popular = EXCLUDED.popular,
                updated_at = NOW()
        "#;

        sqlx::query(query)
            .bind(&program.id)
            .bind(&program.name)
            .bind(program.category.as_str())
            .bind(to_i32(program.duration_weeks))
            .bind(&program.target_audience)
            .bind(&program.description)
            .bind(&program.features)
            .bind(&program.price_range)
            .bind(&program.photo)
            .bind(program.popular)
            .execute(&mut **tx)
            .await?;
        Ok(())
    }

    async fn upsert_testimonial(
        tx: &mut Transaction<'_, Postgres>,
        testimonial: &Testimonial,
    ) -> Result<(), StoreError> {
        let query = r#"
            INSERT INTO testimonials (
                id, doctor_name, specialty, experience_years, hospital_id, program_id, rating,
                content, photo, created_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            ON CONFLICT (id) DO UPDATE SET
                doctor_name = EXCLUDED.doctor_name,
                specialty = EXCLUDED.specialty,
                experience_years = EXCLUDED.experience_years,
                hospital_id = EXCLUDED.hospital_id,
                program_id = EXCLUDED.program_id,
                rating = EXCLUDED.rating,
                content = EXCLUDED.content,
                photo = EXCLUDED.photo
        "#;

        sqlx::query(query)
            .bind(&testimonial.id)
            .bind(&testimonial.doctor_name)
            .bind(&testimonial.specialty)
            .bind(to_i32(testimonial.experience_years))
            .bind(&testimonial.hospital_id)
            .bind(&testimonial.program_id)
            .bind(testimonial.rating.map(i16::from))
            .bind(&testimonial.content)
            .bind(&testimonial.photo)
            .bind(testimonial.created_at)
            .execute(&mut **tx)
            .await?;
        Ok(())
    }
}

#[async_trait]
impl MarketplaceStore for PostgresStore {
    fn backend(&self) -> &'static str {
        "postgres"
    }

    async fn get_doctor(&self, doctor_id: &str) -> Result<Doctor, StoreError> {
        let query = r#"
            SELECT id, name, years_of_exp, skills, ehr_experience, lat, lng, rating, cancel_rate
            FROM doctors
            WHERE id = $1
        "#;

        let row = sqlx::query(query)
            .bind(doctor_id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| StoreError::not_found("doctor", doctor_id))?;

        doctor_from_row(&row)
    }

    async fn list_shifts(&self) -> Result<Vec<Shift>, StoreError> {
        let query = format!("{SHIFT_SELECT} ORDER BY s.start_at ASC, s.id ASC");
        let rows = sqlx::query(&query).fetch_all(&self.pool).await?;

        let shifts = rows.iter().map(shift_from_row).collect::<Result<Vec<_>, _>>()?;
        tracing::debug!("Loaded {} shifts", shifts.len());
        Ok(shifts)
    }

    async fn get_shift(&self, shift_id: &str) -> Result<Shift, StoreError> {
        let query = format!("{SHIFT_SELECT} WHERE s.id = $1");
        let row = sqlx::query(&query)
            .bind(shift_id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| StoreError::not_found("shift", shift_id))?;

        shift_from_row(&row)
    }

    async fn list_hospitals(&self) -> Result<Vec<Hospital>, StoreError> {
        let query = r#"
            SELECT id, name, lat, lng, ehr_type, address, region, facility_type, bed_count,
                   dept_list, station_access, airport_access, has_dorm, dorm_subsidy_jpy,
                   amenities, photos, catch_copy, rating_avg, review_count, specialties,
                   features, programs
            FROM hospitals
            ORDER BY id
        "#;

        let rows = sqlx::query(query).fetch_all(&self.pool).await?;
        rows.iter().map(hospital_from_row).collect()
    }

    async fn list_regions(&self) -> Result<Vec<Region>, StoreError> {
        let query = r#"
            SELECT id, name, prefectures, description, features, photo, popular, lat, lng, access_info
            FROM regions
            ORDER BY id
        "#;

        let rows = sqlx::query(query).fetch_all(&self.pool).await?;
        rows.iter().map(region_from_row).collect()
    }

    async fn get_region(&self, region_id: &str) -> Result<Region, StoreError> {
        let query = r#"
            SELECT id, name, prefectures, description, features, photo, popular, lat, lng, access_info
            FROM regions
            WHERE id = $1
        "#;

        let row = sqlx::query(query)
            .bind(region_id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| StoreError::not_found("region", region_id))?;

        region_from_row(&row)
    }

    async fn list_programs(&self) -> Result<Vec<Program>, StoreError> {
        let query = r#"
            SELECT id, name, category, duration_weeks, target_audience, description, features,
                   price_range, photo, popular
            FROM programs
            ORDER BY id
        "#;

        let rows = sqlx::query(query).fetch_all(&self.pool).await?;
        rows.iter().map(program_from_row).collect()
    }

    async fn list_testimonials(&self) -> Result<Vec<Testimonial>, StoreError> {
        let query = r#"
            SELECT id, doctor_name, specialty, experience_years, hospital_id, program_id, rating,
                   content, photo, created_at
            FROM testimonials
            ORDER BY created_at DESC
        "#;

        let rows = sqlx::query(query).fetch_all(&self.pool).await?;
        rows.iter().map(testimonial_from_row).collect()
    }

    async fn create_application(&self, application: &Application) -> Result<(), StoreError> {
        let query = r#"
            INSERT INTO applications (
                id, shift_id, hospital_id, name, specialty, experience_years, comment,
                created_at, updated_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            ON CONFLICT (id) DO NOTHING
        "#;

        let result = sqlx::query(query)
            .bind(&application.id)
            .bind(&application.shift_id)
            .bind(&application.hospital_id)
            .bind(&application.name)
            .bind(&application.specialty)
            .bind(to_i32(application.experience_years))
            .bind(&application.comment)
            .bind(application.created_at)
            .bind(application.updated_at)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(StoreError::Conflict {
                kind: "application",
                id: application.id.clone(),
            });
        }

        tracing::debug!(
            "Recorded application {} for shift {}",
            application.id,
            application.shift_id
        );

        Ok(())
    }

    async fn counts(&self) -> Result<StoreCounts, StoreError> {
        let query = r#"
            SELECT
                (SELECT COUNT(*) FROM doctors) AS doctors,
                (SELECT COUNT(*) FROM hospitals) AS hospitals,
                (SELECT COUNT(*) FROM shifts) AS shifts,
                (SELECT COUNT(*) FROM regions) AS regions,
                (SELECT COUNT(*) FROM programs) AS programs,
                (SELECT COUNT(*) FROM testimonials) AS testimonials,
                (SELECT COUNT(*) FROM applications) AS applications
        "#;

        let row = sqlx::query(query).fetch_one(&self.pool).await?;

        Ok(StoreCounts {
            doctors: count(&row, "doctors")?,
            hospitals: count(&row, "hospitals")?,
            shifts: count(&row, "shifts")?,
            regions: count(&row, "regions")?,
            programs: count(&row, "programs")?,
            testimonials: count(&row, "testimonials")?,
            applications: count(&row, "applications")?,
        })
    }

    async fn seed(&self, catalogue: &DemoCatalogue) -> Result<StoreCounts, StoreError> {
        let mut tx = self.pool.begin().await?;

        for doctor in &catalogue.doctors {
            Self::upsert_doctor(&mut tx, doctor).await?;
        }
        for hospital in &catalogue.hospitals {
            Self::upsert_hospital(&mut tx, hospital).await?;
        }
        for shift in &catalogue.shifts {
            Self::upsert_shift(&mut tx, shift).await?;
        }
        for region in &catalogue.regions {
            Self::upsert_region(&mut tx, region).await?;
        }
        for program in &catalogue.programs {
            Self::upsert_program(&mut tx, program).await?;
        }
        for testimonial in &catalogue.testimonials {
            Self::upsert_testimonial(&mut tx, testimonial).await?;
        }

        tx.commit().await?;

        tracing::info!("Seeded demo catalogue into PostgreSQL");
        self.counts().await
    }

    /// Health check for the database connection
    async fn health_check(&self) -> Result<bool, StoreError> {
        sqlx::query("SELECT 1")
            .fetch_one(&self.pool)
            .await
            .map(|_| true)
            .map_err(Into::into)
    }
}

fn to_i32(value: Option<u32>) -> Option<i32> {
    value.and_then(|v| i32::try_from(v).ok())
}

/// Read a nullable INTEGER column as an unsigned value; negatives read as absent
fn opt_u32(row: &PgRow, column: &str) -> Result<Option<u32>, StoreError> {
    let value: Option<i32> = row.try_get(column)?;
    Ok(value.and_then(|v| u32::try_from(v).ok()))
}

fn count(row: &PgRow, column: &str) -> Result<u64, StoreError> {
    let value: i64 = row.try_get(column)?;
    u64::try_from(value).map_err(|_| StoreError::InvalidRecord(format!("negative count for {column}")))
}

fn doctor_from_row(row: &PgRow) -> Result<Doctor, StoreError> {
    Ok(Doctor {
        id: row.try_get("id")?,
        name: row.try_get("name")?,
        years_of_exp: opt_u32(row, "years_of_exp")?,
        skills: row.try_get("skills")?,
        ehr_experience: row.try_get("ehr_experience")?,
        lat: row.try_get("lat")?,
        lng: row.try_get("lng")?,
        rating: row.try_get("rating")?,
        cancel_rate: row.try_get("cancel_rate")?,
    })
}

fn shift_from_row(row: &PgRow) -> Result<Shift, StoreError> {
    let status: String = row.try_get("status")?;
    let urgent: Option<bool> = row.try_get("urgent")?;
    let badge: Option<String> = row.try_get("badge")?;
    let workation_enabled: Option<bool> = row.try_get("workation_enabled")?;
    let hospital_id: Option<String> = row.try_get("h_id")?;

    let hospital = match hospital_id {
        Some(id) => Some(HospitalSnapshot {
            id,
            name: row.try_get("h_name")?,
            lat: row.try_get("h_lat")?,
            lng: row.try_get("h_lng")?,
            ehr_type: row.try_get("h_ehr_type")?,
        }),
        None => None,
    };

    Ok(Shift {
        id: row.try_get("id")?,
        hospital_id: row.try_get("hospital_id")?,
        dept: row.try_get("dept")?,
        role: row.try_get("role")?,
        start_at: row.try_get("start_at")?,
        end_at: row.try_get("end_at")?,
        required_skills: row.try_get("required_skills")?,
        comp_base: row.try_get("comp_base")?,
        surcharge_factor: row.try_get("surcharge_factor")?,
        status: ShiftStatus::parse(&status),
        max_doctors: opt_u32(row, "max_doctors")?,
        highlight: urgent.map(|urgent| ShiftHighlight { urgent, badge }),
        workation: workation_enabled.map(|enabled| Workation { enabled }),
        hospital,
    })
}

fn hospital_from_row(row: &PgRow) -> Result<Hospital, StoreError> {
    let station: Option<String> = row.try_get("station_access")?;
    let airport: Option<String> = row.try_get("airport_access")?;
    let has_dorm: Option<bool> = row.try_get("has_dorm")?;
    let subsidy = opt_u32(row, "dorm_subsidy_jpy")?;

    let transport_access = (station.is_some() || airport.is_some())
        .then_some(TransportAccess { station, airport });
    let accommodation_support = has_dorm.map(|has_dorm| AccommodationSupport {
        has_dorm,
        subsidy_jpy: subsidy.unwrap_or(0),
    });

    Ok(Hospital {
        id: row.try_get("id")?,
        name: row.try_get("name")?,
        lat: row.try_get("lat")?,
        lng: row.try_get("lng")?,
        ehr_type: row.try_get("ehr_type")?,
        address: row.try_get("address")?,
        region: row.try_get("region")?,
        facility_type: row.try_get("facility_type")?,
        bed_count: opt_u32(row, "bed_count")?,
        dept_list: row.try_get("dept_list")?,
        transport_access,
        accommodation_support,
        amenities: row.try_get("amenities")?,
        photos: row.try_get("photos")?,
        catch_copy: row.try_get("catch_copy")?,
        rating_avg: row.try_get("rating_avg")?,
        review_count: opt_u32(row, "review_count")?,
        specialties: row.try_get("specialties")?,
        features: row.try_get("features")?,
        programs: row.try_get("programs")?,
    })
}

fn region_from_row(row: &PgRow) -> Result<Region, StoreError> {
    Ok(Region {
        id: row.try_get("id")?,
        name: row.try_get("name")?,
        prefectures: row.try_get("prefectures")?,
        description: row.try_get("description")?,
        features: row.try_get("features")?,
        photo: row.try_get("photo")?,
        popular: row.try_get("popular")?,
        lat: row.try_get("lat")?,
        lng: row.try_get("lng")?,
        access_info: row.try_get("access_info")?,
    })
}

fn program_from_row(row: &PgRow) -> Result<Program, StoreError> {
    let category: Option<String> = row.try_get("category")?;

    Ok(Program {
        id: row.try_get("id")?,
        name: row.try_get("name")?,
        category: category.as_deref().map(ProgramCategory::parse).unwrap_or_default(),
        duration_weeks: opt_u32(row, "duration_weeks")?,
        target_audience: row.try_get("target_audience")?,
        description: row.try_get("description")?,
        features: row.try_get("features")?,
        price_range: row.try_get("price_range")?,
        photo: row.try_get("photo")?,
        popular: row.try_get("popular")?,
    })
}

fn testimonial_from_row(row: &PgRow) -> Result<Testimonial, StoreError> {
    let rating: Option<i16> = row.try_get("rating")?;

    Ok(Testimonial {
        id: row.try_get("id")?,
        doctor_name: row.try_get("doctor_name")?,
        specialty: row.try_get("specialty")?,
        experience_years: opt_u32(row, "experience_years")?,
        hospital_id: row.try_get("hospital_id")?,
        program_id: row.try_get("program_id")?,
        rating: rating.and_then(|r| u8::try_from(r).ok()),
        content: row.try_get("content")?,
        photo: row.try_get("photo")?,
        created_at: row.try_get("created_at")?,
    })
}
