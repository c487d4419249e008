//! Patient repository implementation.

use async_trait::async_trait;
use sqlx::{Pool, Postgres};
use tracing::debug;

use carelog_core::{Error, Patient, PatientRepository, Result, UpsertPatientRequest};

/// PostgreSQL implementation of PatientRepository.
#[derive(Clone)]
pub struct PgPatientRepository {
    pool: Pool<Postgres>,
}

impl PgPatientRepository {
    /// Create a new PgPatientRepository with the given connection pool.
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl PatientRepository for PgPatientRepository {
    async fn list(&self) -> Result<Vec<Patient>> {
        let patients = sqlx::query_as::<_, Patient>(
            r#"
            SELECT id, name, dob, gender, phone, address,
                   created_at_utc, updated_at_utc
            FROM patient
            ORDER BY name ASC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(patients)
    }

    async fn fetch(&self, id: &str) -> Result<Patient> {
        sqlx::query_as::<_, Patient>(
            r#"
            SELECT id, name, dob, gender, phone, address,
                   created_at_utc, updated_at_utc
            FROM patient
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| Error::PatientNotFound(id.to_string()))
    }

    async fn upsert(&self, req: UpsertPatientRequest) -> Result<()> {
        debug!(
            subsystem = "database",
            component = "patients",
            op = "upsert",
            patient_id = %req.id,
            "Upserting patient"
        );

        sqlx::query(
            r#"
            INSERT INTO patient (id, name, dob, gender, phone, address)
            VALUES ($1, $2, $3, $4, $5, $6)
            ON CONFLICT (id) DO UPDATE SET
                name = EXCLUDED.name,
                dob = EXCLUDED.dob,
                gender = EXCLUDED.gender,
                phone = EXCLUDED.phone,
                address = EXCLUDED.address,
                updated_at_utc = now()
            "#,
        )
        .bind(&req.id)
        .bind(&req.name)
        .bind(req.dob)
        .bind(&req.gender)
        .bind(&req.phone)
        .bind(&req.address)
        .execute(&self.pool)
        .await?;

        Ok(())
    }
}
