//! Integration tests for PgNoteRepository.
//!
//! Requires a migrated PostgreSQL reachable via `DATABASE_URL` (defaults
//! to the test URL in `test_fixtures`). Run with `cargo test -- --ignored`.

use carelog_core::{CreateNoteRequest, Error, InputType, NoteRepository};
use carelog_db::{seed, test_fixtures, Database};
use uuid::Uuid;

async fn setup() -> Database {
    let db = test_fixtures::connect_test()
        .await
        .expect("Failed to connect to test database");
    seed(&db).await.expect("Failed to seed patients");
    db
}

async fn cleanup_note(db: &Database, id: Uuid) {
    sqlx::query("DELETE FROM note WHERE id = $1")
        .bind(id)
        .execute(db.pool())
        .await
        .expect("Failed to clean up note");
}

fn text_note(content: &str) -> CreateNoteRequest {
    CreateNoteRequest {
        patient_id: "john-smith".to_string(),
        input_type: InputType::Text,
        raw_content: content.to_string(),
        transcription: None,
        audio_identifier: None,
    }
}

#[tokio::test]
#[ignore] // Requires database connection with migrations applied
async fn test_insert_and_fetch_text_note() {
    let db = setup().await;

    let id = db
        .notes
        .insert(text_note("Patient reports mild headache."))
        .await
        .expect("Failed to insert note");

    let fetched = db.notes.fetch(id).await.expect("Failed to fetch note");
    assert_eq!(fetched.note.id, id);
    assert_eq!(fetched.note.raw_content, "Patient reports mild headache.");
    assert_eq!(fetched.note.input_type, InputType::Text);
    assert_eq!(fetched.note.transcription, None);
    assert_eq!(fetched.note.summary, None);
    assert!(!fetched.note.has_audio);
    assert_eq!(fetched.patient.id, "john-smith");
    assert_eq!(fetched.patient.name, "John Smith");

    cleanup_note(&db, id).await;
}

#[tokio::test]
#[ignore] // Requires database connection
async fn test_insert_audio_note_duplicates_transcript() {
    let db = setup().await;

    let id = db
        .notes
        .insert(CreateNoteRequest {
            patient_id: "maria-garcia".to_string(),
            input_type: InputType::Audio,
            raw_content: "Follow-up in two weeks.".to_string(),
            transcription: Some("Follow-up in two weeks.".to_string()),
            audio_identifier: Some("aGVsbG8=".to_string()),
        })
        .await
        .expect("Failed to insert audio note");

    let fetched = db.notes.fetch(id).await.expect("Failed to fetch note");
    assert_eq!(fetched.note.raw_content, "Follow-up in two weeks.");
    assert_eq!(
        fetched.note.transcription.as_deref(),
        Some("Follow-up in two weeks.")
    );
    assert!(fetched.note.has_audio);

    let identifier = db
        .notes
        .audio_identifier(id)
        .await
        .expect("Failed to fetch audio identifier");
    assert_eq!(identifier.as_deref(), Some("aGVsbG8="));

    cleanup_note(&db, id).await;
}

#[tokio::test]
#[ignore] // Requires database connection
async fn test_list_returns_newest_first() {
    let db = setup().await;

    let first = db.notes.insert(text_note("first")).await.unwrap();
    let second = db.notes.insert(text_note("second")).await.unwrap();
    let third = db.notes.insert(text_note("third")).await.unwrap();

    let notes = db.notes.list().await.expect("Failed to list notes");
    let positions: Vec<usize> = [third, second, first]
        .iter()
        .map(|id| notes.iter().position(|n| n.note.id == *id).unwrap())
        .collect();

    // Newest first: third before second before first.
    assert!(positions[0] < positions[1]);
    assert!(positions[1] < positions[2]);

    for id in [first, second, third] {
        cleanup_note(&db, id).await;
    }
}

#[tokio::test]
#[ignore] // Requires database connection
async fn test_fetch_unknown_id_is_not_found() {
    let db = setup().await;

    let missing = Uuid::now_v7();
    let err = db.notes.fetch(missing).await.unwrap_err();
    assert!(matches!(err, Error::NoteNotFound(id) if id == missing));

    let err = db.notes.audio_identifier(missing).await.unwrap_err();
    assert!(matches!(err, Error::NoteNotFound(_)));
}

#[tokio::test]
#[ignore] // Requires database connection
async fn test_audio_identifier_is_none_for_text_note() {
    let db = setup().await;

    let id = db.notes.insert(text_note("typed only")).await.unwrap();
    let identifier = db.notes.audio_identifier(id).await.unwrap();
    assert_eq!(identifier, None);

    cleanup_note(&db, id).await;
}

#[tokio::test]
#[ignore] // Requires database connection
async fn test_insert_unknown_patient_fails_and_leaves_no_record() {
    let db = setup().await;

    let before = db.notes.list().await.unwrap().len();
    let result = db
        .notes
        .insert(CreateNoteRequest {
            patient_id: "nobody-here".to_string(),
            input_type: InputType::Text,
            raw_content: "orphan".to_string(),
            transcription: None,
            audio_identifier: None,
        })
        .await;

    assert!(matches!(result, Err(Error::Database(_))));
    assert_eq!(db.notes.list().await.unwrap().len(), before);
}
