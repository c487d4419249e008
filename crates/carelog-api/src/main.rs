//! carelog-api - HTTP API server for the carelog clinical note service.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::{
    extract::{DefaultBodyLimit, Multipart, Path, State},
    http::{header, HeaderValue, Method, StatusCode},
    response::IntoResponse,
    routing::get,
    Json, Router,
};
use tower_http::{
    cors::{AllowOrigin, CorsLayer},
    limit::RequestBodyLimitLayer,
    request_id::{MakeRequestId, PropagateRequestIdLayer, RequestId, SetRequestIdLayer},
    trace::TraceLayer,
};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use utoipa::OpenApi;
use uuid::Uuid;

use carelog_core::defaults;
use carelog_core::{InputType, Note, NoteRepository, NoteWithPatient, Patient, PatientRepository,
    StorageProvider};
use carelog_db::{seed, storage_from_env, Database};

use carelog_api::ingest::NoteSubmission;

// =============================================================================
// REQUEST ID (UUIDv7)
// =============================================================================

/// Generates time-ordered UUIDv7 request correlation IDs.
///
/// UUIDv7 embeds a Unix timestamp, so IDs sort chronologically — useful
/// for log correlation and debugging.
#[derive(Clone, Default)]
struct MakeRequestUuidV7;

impl MakeRequestId for MakeRequestUuidV7 {
    fn make_request_id<B>(&mut self, _request: &axum::http::Request<B>) -> Option<RequestId> {
        let id = Uuid::now_v7().to_string().parse().ok()?;
        Some(RequestId::new(id))
    }
}

// =============================================================================
// CORS
// =============================================================================

/// Parse the CORS origin whitelist from `ALLOWED_ORIGINS`.
fn parse_allowed_origins() -> Vec<HeaderValue> {
    let origins_str = std::env::var(defaults::ENV_ALLOWED_ORIGINS)
        .unwrap_or_else(|_| defaults::DEFAULT_ALLOWED_ORIGINS.to_string());

    origins_str
        .split(',')
        .filter_map(|s| {
            let trimmed = s.trim();
            if trimmed.is_empty() {
                return None;
            }
            match trimmed.parse::<HeaderValue>() {
                Ok(v) => Some(v),
                Err(e) => {
                    tracing::warn!("Invalid CORS origin '{}': {}", trimmed, e);
                    None
                }
            }
        })
        .collect()
}

// =============================================================================
// APP STATE
// =============================================================================

/// Application state shared across handlers.
///
/// Both the database context and the storage provider are constructed in
/// `main` and injected here; handlers never reach for process-wide
/// globals.
#[derive(Clone)]
struct AppState {
    db: Database,
    storage: Arc<dyn StorageProvider>,
}

// =============================================================================
// OPENAPI
// =============================================================================

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Carelog API",
        description = "Clinical note-taking service: patients, typed and transcribed notes, stored voice recordings"
    ),
    paths(
        health_check,
        list_notes,
        create_note,
        get_note,
        get_note_audio,
        list_patients
    ),
    components(schemas(Patient, Note, NoteWithPatient, InputType)),
    tags(
        (name = "Notes", description = "Note ingestion and review"),
        (name = "Patients", description = "Patient roster"),
        (name = "System", description = "Health checks and system info")
    )
)]
struct ApiDoc;

async fn openapi_json() -> impl IntoResponse {
    Json(ApiDoc::openapi())
}

// =============================================================================
// MAIN
// =============================================================================

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables
    dotenvy::dotenv().ok();

    // Initialize tracing with configurable output
    //
    // Environment variables:
    //   LOG_FORMAT  - "json" or "text" (default: "text")
    //   LOG_FILE    - path to log file (optional, enables file logging)
    //   LOG_ANSI    - "true"/"false" override ANSI colors (auto-detected by default)
    //   RUST_LOG    - standard env filter (default: "carelog_api=debug,tower_http=debug")
    let log_format = std::env::var("LOG_FORMAT").unwrap_or_else(|_| "text".to_string());
    let log_file = std::env::var("LOG_FILE").ok();
    let log_ansi = std::env::var("LOG_ANSI")
        .ok()
        .map(|v| v == "true" || v == "1");

    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "carelog_api=debug,tower_http=debug".into());

    let registry = tracing_subscriber::registry().with(env_filter);

    // Optionally create a file appender with daily rotation
    let _file_guard = if let Some(ref path) = log_file {
        let file_dir = std::path::Path::new(path)
            .parent()
            .unwrap_or(std::path::Path::new("."));
        let file_name = std::path::Path::new(path)
            .file_name()
            .and_then(|f| f.to_str())
            .unwrap_or("carelog-api.log");
        let file_appender = tracing_appender::rolling::daily(file_dir, file_name);
        let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

        if log_format == "json" {
            registry
                .with(
                    tracing_subscriber::fmt::layer()
                        .json()
                        .with_writer(non_blocking),
                )
                .init();
        } else {
            let mut layer = tracing_subscriber::fmt::layer().with_writer(non_blocking);
            if let Some(ansi) = log_ansi {
                layer = layer.with_ansi(ansi);
            } else {
                layer = layer.with_ansi(false); // no ANSI in files
            }
            registry.with(layer).init();
        }
        Some(guard)
    } else {
        // Console-only output
        if log_format == "json" {
            registry
                .with(tracing_subscriber::fmt::layer().json())
                .init();
        } else {
            let mut layer = tracing_subscriber::fmt::layer();
            if let Some(ansi) = log_ansi {
                layer = layer.with_ansi(ansi);
            }
            registry.with(layer).init();
        }
        None
    };

    info!(
        log_format = %log_format,
        log_file = log_file.as_deref().unwrap_or("(stdout)"),
        "Logging initialized"
    );

    // Get configuration from environment
    let database_url = std::env::var(defaults::ENV_DATABASE_URL)
        .unwrap_or_else(|_| defaults::DEFAULT_DATABASE_URL.to_string());
    let host =
        std::env::var(defaults::ENV_HOST).unwrap_or_else(|_| defaults::DEFAULT_HOST.to_string());
    let port: u16 = std::env::var(defaults::ENV_PORT)
        .ok()
        .and_then(|p| p.parse().ok())
        .unwrap_or(defaults::DEFAULT_PORT);
    let max_upload_bytes: usize = std::env::var(defaults::ENV_MAX_UPLOAD_BYTES)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(defaults::DEFAULT_MAX_UPLOAD_BYTES);

    // Connect to database
    info!("Connecting to database...");
    let db = Database::connect(&database_url).await?;
    info!("Database connected");

    // Run pending database migrations on startup
    info!("Running database migrations...");
    db.migrate().await?;
    info!("Database migrations complete");

    // Seed the fixed patient roster (idempotent upsert)
    seed(&db).await?;

    // Select the audio storage provider (in-database base64 by default)
    let storage = storage_from_env()?;
    info!("Storage provider initialized");

    // Create app state
    let state = AppState { db, storage };

    // Build router
    let app = Router::new()
        // Health check
        .route("/health", get(health_check))
        // OpenAPI document
        .route("/openapi.json", get(openapi_json))
        // Notes
        .route("/notes", get(list_notes).post(create_note))
        .route("/notes/:id", get(get_note))
        .route("/notes/:id/audio", get(get_note_audio))
        // Patients
        .route("/patients", get(list_patients))
        .layer(TraceLayer::new_for_http())
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuidV7))
        .layer({
            let allowed_origins = parse_allowed_origins();

            CorsLayer::new()
                .allow_origin(AllowOrigin::list(allowed_origins))
                .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
                .allow_headers([header::CONTENT_TYPE, header::ACCEPT])
                .max_age(std::time::Duration::from_secs(3600))
        })
        // Raise axum's 2MB extractor default so recordings fit, and cap
        // the transport at the same size.
        .layer(DefaultBodyLimit::max(max_upload_bytes))
        .layer(RequestBodyLimitLayer::new(max_upload_bytes))
        .with_state(state);

    // Start server
    let addr: SocketAddr = format!("{}:{}", host, port).parse()?;
    info!("Starting server on {}", addr);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

// =============================================================================
// HEALTH CHECK
// =============================================================================

#[utoipa::path(get, path = "/health", tag = "System",
    responses((status = 200, description = "Service is healthy")))]
async fn health_check() -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "healthy",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

// =============================================================================
// NOTE HANDLERS
// =============================================================================

/// List every note, newest first, each joined with its patient.
///
/// No pagination: the full set is returned on every call.
#[utoipa::path(get, path = "/notes", tag = "Notes",
    responses((status = 200, description = "All notes, newest first", body = [NoteWithPatient])))]
async fn list_notes(State(state): State<AppState>) -> Result<impl IntoResponse, ApiError> {
    let notes = state.db.notes.list().await?;
    Ok(Json(notes))
}

/// Create a note from a multipart submission.
///
/// # Multipart Fields
/// - `patientId`: owning patient id (required)
/// - `inputType`: "text" or "audio" (required)
/// - `textContent`: the typed note (required for text notes)
/// - `transcription`: the client-side transcript (required for audio notes)
/// - `audioFile`: the raw recording (optional, audio notes only)
///
/// Unknown fields are ignored. Duplicate submissions create duplicate
/// notes; there is no idempotency key.
#[utoipa::path(post, path = "/notes", tag = "Notes",
    responses(
        (status = 201, description = "Created note with patient embedded", body = NoteWithPatient),
        (status = 400, description = "Missing patient id or invalid field combination")
    ))]
async fn create_note(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<impl IntoResponse, ApiError> {
    let mut submission = NoteSubmission::default();
    let mut audio: Option<(Vec<u8>, String)> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::BadRequest(format!("Multipart error: {}", e)))?
    {
        let field_name = field.name().map(|n| n.to_string());
        match field_name.as_deref() {
            Some("patientId") => {
                submission.patient_id = Some(read_text_field(field).await?);
            }
            Some("inputType") => {
                submission.input_type = Some(read_text_field(field).await?);
            }
            Some("textContent") => {
                submission.text_content = Some(read_text_field(field).await?);
            }
            Some("transcription") => {
                submission.transcription = Some(read_text_field(field).await?);
            }
            Some("audioFile") => {
                let filename = field
                    .file_name()
                    .unwrap_or("recording.webm")
                    .to_string();
                let bytes = field
                    .bytes()
                    .await
                    .map_err(|e| ApiError::BadRequest(format!("Read error: {}", e)))?
                    .to_vec();
                audio = Some((bytes, filename));
            }
            _ => {} // ignore unknown fields
        }
    }

    // Validation happens before any write; a rejected submission leaves
    // no record.
    let normalized = submission.normalize()?;

    let audio_identifier = match (&normalized.input_type, audio) {
        (InputType::Audio, Some((bytes, filename))) => {
            Some(state.storage.store(&bytes, &filename).await?)
        }
        _ => None,
    };

    let note_id = state
        .db
        .notes
        .insert(carelog_core::CreateNoteRequest {
            patient_id: normalized.patient_id,
            input_type: normalized.input_type,
            raw_content: normalized.raw_content,
            transcription: normalized.transcription,
            audio_identifier,
        })
        .await?;

    let note = state.db.notes.fetch(note_id).await?;
    Ok((StatusCode::CREATED, Json(note)))
}

/// Fetch a single note joined with its patient.
#[utoipa::path(get, path = "/notes/{id}", tag = "Notes",
    params(("id" = Uuid, Path, description = "Note id")),
    responses(
        (status = 200, description = "Note with patient embedded", body = NoteWithPatient),
        (status = 404, description = "No note with this id")
    ))]
async fn get_note(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let note = state.db.notes.fetch(id).await?;
    Ok(Json(note))
}

/// Serve the raw recording stored for an audio note.
///
/// The content type is sniffed from the payload's magic bytes since the
/// upload's type is not persisted.
#[utoipa::path(get, path = "/notes/{id}/audio", tag = "Notes",
    params(("id" = Uuid, Path, description = "Note id")),
    responses(
        (status = 200, description = "Raw recording bytes"),
        (status = 404, description = "Note absent or has no recording")
    ))]
async fn get_note_audio(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let identifier = state
        .db
        .notes
        .audio_identifier(id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("Note has no audio recording: {}", id)))?;

    let bytes = state.storage.retrieve(&identifier).await?;

    let content_type = infer::get(&bytes)
        .map(|kind| kind.mime_type())
        .unwrap_or(defaults::FALLBACK_AUDIO_CONTENT_TYPE);

    Ok(([(header::CONTENT_TYPE, content_type)], bytes))
}

// =============================================================================
// PATIENT HANDLERS
// =============================================================================

/// List every patient, ordered by name ascending.
#[utoipa::path(get, path = "/patients", tag = "Patients",
    responses((status = 200, description = "All patients, name ascending", body = [Patient])))]
async fn list_patients(State(state): State<AppState>) -> Result<impl IntoResponse, ApiError> {
    let patients = state.db.patients.list().await?;
    Ok(Json(patients))
}

/// Read a text field from a multipart part.
async fn read_text_field(field: axum::extract::multipart::Field<'_>) -> Result<String, ApiError> {
    field
        .text()
        .await
        .map_err(|e| ApiError::BadRequest(format!("Read error: {}", e)))
}

// =============================================================================
// ERROR HANDLING
// =============================================================================

#[derive(Debug)]
enum ApiError {
    Database(carelog_core::Error),
    NotFound(String),
    BadRequest(String),
    Unimplemented(String),
}

impl From<carelog_core::Error> for ApiError {
    fn from(err: carelog_core::Error) -> Self {
        match &err {
            carelog_core::Error::NotFound(msg) => ApiError::NotFound(msg.clone()),
            carelog_core::Error::NoteNotFound(_) | carelog_core::Error::PatientNotFound(_) => {
                ApiError::NotFound(err.to_string())
            }
            carelog_core::Error::InvalidInput(msg) => ApiError::BadRequest(msg.clone()),
            carelog_core::Error::Unimplemented(_) => ApiError::Unimplemented(err.to_string()),
            carelog_core::Error::Database(sqlx_err) => {
                // A note referencing an unknown patient surfaces as a
                // foreign key violation; that is a client error here.
                let msg = sqlx_err.to_string();
                if msg.contains("foreign key") {
                    return ApiError::BadRequest(msg);
                }
                ApiError::Database(err)
            }
            _ => ApiError::Database(err),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        let (status, message) = match self {
            ApiError::Database(err) => (StatusCode::INTERNAL_SERVER_ERROR, err.to_string()),
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            ApiError::Unimplemented(msg) => (StatusCode::NOT_IMPLEMENTED, msg),
        };

        let body = Json(serde_json::json!({
            "error": message,
        }));

        (status, body).into_response()
    }
}
