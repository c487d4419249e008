//! Seed data for the fixed patient roster.
//!
//! Patients enter the system only through this seeder, which runs at
//! server startup. Ids are deterministic slugs of the patient name, so
//! re-running the seed is an idempotent upsert.

use chrono::NaiveDate;
use tracing::info;

use carelog_core::{Result, UpsertPatientRequest};

use crate::Database;

/// Derive a patient id from a name: lowercased, every whitespace
/// character replaced with a hyphen. "John Smith" → "john-smith".
pub fn slugify(name: &str) -> String {
    name.to_lowercase()
        .chars()
        .map(|c| if c.is_whitespace() { '-' } else { c })
        .collect()
}

/// The fixed patient roster.
pub fn seed_patients() -> Vec<UpsertPatientRequest> {
    let roster = [
        (
            "John Smith",
            (1985, 3, 15),
            "Male",
            "(555) 123-4567",
            "123 Oak Street, Springfield, IL 62701",
        ),
        (
            "Maria Garcia",
            (1972, 8, 22),
            "Female",
            "(555) 234-5678",
            "456 Maple Avenue, Chicago, IL 60601",
        ),
        (
            "Robert Johnson",
            (1990, 11, 30),
            "Male",
            "(555) 345-6789",
            "789 Pine Road, Peoria, IL 61602",
        ),
    ];

    roster
        .into_iter()
        .map(|(name, (y, m, d), gender, phone, address)| UpsertPatientRequest {
            id: slugify(name),
            name: name.to_string(),
            dob: NaiveDate::from_ymd_opt(y, m, d).expect("seed dates are valid"),
            gender: gender.to_string(),
            phone: Some(phone.to_string()),
            address: Some(address.to_string()),
        })
        .collect()
}

/// Upsert the fixed patient roster.
pub async fn seed(db: &Database) -> Result<()> {
    use carelog_core::PatientRepository;

    let patients = seed_patients();
    let count = patients.len();
    for patient in patients {
        db.patients.upsert(patient).await?;
    }

    info!(
        subsystem = "database",
        component = "seed",
        op = "seed",
        patient_count = count,
        "Seed completed"
    );
    Ok(())
}
