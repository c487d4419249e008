//! Note repository implementation.

use async_trait::async_trait;
use sqlx::{postgres::PgRow, Pool, Postgres, Row};
use tracing::debug;
use uuid::Uuid;

use carelog_core::{
    CreateNoteRequest, Error, Note, NoteRepository, NoteWithPatient, Patient, Result,
};

/// PostgreSQL implementation of NoteRepository.
#[derive(Clone)]
pub struct PgNoteRepository {
    pool: Pool<Postgres>,
}

impl PgNoteRepository {
    /// Create a new PgNoteRepository with the given connection pool.
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }
}

/// Columns selected by every note read. The patient side is aliased with
/// a `p_` prefix so both entities can be mapped from one row. The audio
/// payload column is reduced to a presence flag; recordings are served
/// through the storage provider, never inlined into note JSON.
const NOTE_WITH_PATIENT_SELECT: &str = r#"
    SELECT n.id, n.patient_id, n.input_type, n.raw_content, n.transcription,
           n.summary, (n.audio_identifier IS NOT NULL) AS has_audio,
           n.created_at_utc, n.updated_at_utc,
           p.id AS p_id, p.name AS p_name, p.dob AS p_dob,
           p.gender AS p_gender, p.phone AS p_phone, p.address AS p_address,
           p.created_at_utc AS p_created_at_utc,
           p.updated_at_utc AS p_updated_at_utc
    FROM note n
    JOIN patient p ON p.id = n.patient_id
"#;

/// Map a joined row to a NoteWithPatient.
fn map_row_to_note_with_patient(row: PgRow) -> Result<NoteWithPatient> {
    let input_type: String = row.get("input_type");
    let note = Note {
        id: row.get("id"),
        patient_id: row.get("patient_id"),
        input_type: input_type.parse()?,
        raw_content: row.get("raw_content"),
        transcription: row.get("transcription"),
        summary: row.get("summary"),
        has_audio: row.get("has_audio"),
        created_at_utc: row.get("created_at_utc"),
        updated_at_utc: row.get("updated_at_utc"),
    };
    let patient = Patient {
        id: row.get("p_id"),
        name: row.get("p_name"),
        dob: row.get("p_dob"),
        gender: row.get("p_gender"),
        phone: row.get("p_phone"),
        address: row.get("p_address"),
        created_at_utc: row.get("p_created_at_utc"),
        updated_at_utc: row.get("p_updated_at_utc"),
    };
    Ok(NoteWithPatient { note, patient })
}

#[async_trait]
impl NoteRepository for PgNoteRepository {
    async fn insert(&self, req: CreateNoteRequest) -> Result<Uuid> {
        // UUIDv7 ids sort chronologically, which keeps the newest-first
        // listing stable when creation timestamps collide.
        let id = Uuid::now_v7();

        sqlx::query(
            r#"
            INSERT INTO note
                (id, patient_id, input_type, raw_content, transcription,
                 summary, audio_identifier)
            VALUES ($1, $2, $3, $4, $5, NULL, $6)
            "#,
        )
        .bind(id)
        .bind(&req.patient_id)
        .bind(req.input_type.as_str())
        .bind(&req.raw_content)
        .bind(&req.transcription)
        .bind(&req.audio_identifier)
        .execute(&self.pool)
        .await?;

        debug!(
            subsystem = "database",
            component = "notes",
            op = "insert",
            note_id = %id,
            patient_id = %req.patient_id,
            input_type = %req.input_type,
            has_audio = req.audio_identifier.is_some(),
            "Note inserted"
        );

        Ok(id)
    }

    async fn fetch(&self, id: Uuid) -> Result<NoteWithPatient> {
        let query = format!("{NOTE_WITH_PATIENT_SELECT} WHERE n.id = $1");
        let row = sqlx::query(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or(Error::NoteNotFound(id))?;

        map_row_to_note_with_patient(row)
    }

    async fn list(&self) -> Result<Vec<NoteWithPatient>> {
        let query =
            format!("{NOTE_WITH_PATIENT_SELECT} ORDER BY n.created_at_utc DESC, n.id DESC");
        let rows = sqlx::query(&query).fetch_all(&self.pool).await?;

        rows.into_iter().map(map_row_to_note_with_patient).collect()
    }

    async fn audio_identifier(&self, id: Uuid) -> Result<Option<String>> {
        let row = sqlx::query("SELECT audio_identifier FROM note WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or(Error::NoteNotFound(id))?;

        Ok(row.get("audio_identifier"))
    }
}
