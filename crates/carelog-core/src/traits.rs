//! Core traits for carelog abstractions.
//!
//! These traits define the interfaces that concrete implementations
//! must satisfy, enabling pluggable backends and testability.

use async_trait::async_trait;
use uuid::Uuid;

use crate::error::Result;
use crate::models::*;

// =============================================================================
// NOTE REPOSITORY
// =============================================================================

/// Request for creating a new note.
///
/// Produced by the ingestion endpoint after validation; the repository
/// performs no content validation of its own.
#[derive(Debug, Clone)]
pub struct CreateNoteRequest {
    pub patient_id: String,
    pub input_type: InputType,
    pub raw_content: String,
    /// Trimmed transcript for audio notes, `None` for text notes.
    pub transcription: Option<String>,
    /// Storage identifier for the raw recording, if one was uploaded.
    pub audio_identifier: Option<String>,
}

/// Repository for note operations. Notes are create-once and read-only
/// thereafter.
#[async_trait]
pub trait NoteRepository: Send + Sync {
    /// Insert a new note. `summary` is always initialized to NULL.
    async fn insert(&self, req: CreateNoteRequest) -> Result<Uuid>;

    /// Fetch a note joined with its patient.
    async fn fetch(&self, id: Uuid) -> Result<NoteWithPatient>;

    /// List all notes joined with their patients, newest first.
    async fn list(&self) -> Result<Vec<NoteWithPatient>>;

    /// Fetch the storage identifier of a note's recording, if any.
    async fn audio_identifier(&self, id: Uuid) -> Result<Option<String>>;
}

// =============================================================================
// PATIENT REPOSITORY
// =============================================================================

/// Request for inserting or updating a patient (seeder path).
#[derive(Debug, Clone)]
pub struct UpsertPatientRequest {
    pub id: String,
    pub name: String,
    pub dob: chrono::NaiveDate,
    pub gender: String,
    pub phone: Option<String>,
    pub address: Option<String>,
}

/// Repository for patient lookups. Patients enter the system only
/// through seeding, so there is no ad-hoc create path.
#[async_trait]
pub trait PatientRepository: Send + Sync {
    /// List all patients ordered by name ascending.
    async fn list(&self) -> Result<Vec<Patient>>;

    /// Fetch a patient by id.
    async fn fetch(&self, id: &str) -> Result<Patient>;

    /// Insert a patient, or update it in place if the id already exists.
    async fn upsert(&self, req: UpsertPatientRequest) -> Result<()>;
}

// =============================================================================
// STORAGE PROVIDER
// =============================================================================

/// Abstraction over where raw audio bytes live.
///
/// The working implementation encodes the payload into the identifier
/// itself (base64 in a database column); the remote object storage
/// variant exists only as a placeholder for future extension.
#[async_trait]
pub trait StorageProvider: Send + Sync {
    /// Store a payload and return its identifier.
    async fn store(&self, data: &[u8], filename: &str) -> Result<String>;

    /// Retrieve the payload for an identifier.
    async fn retrieve(&self, identifier: &str) -> Result<Vec<u8>>;
}
