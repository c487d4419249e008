//! # carelog-db
//!
//! PostgreSQL database layer for carelog.
//!
//! This crate provides:
//! - Connection pool management
//! - Repository implementations for patients and notes
//! - Audio storage providers (in-database base64, remote-object stub)
//! - Seed data for the fixed patient roster
//!
//! ## Example
//!
//! ```rust,ignore
//! use carelog_db::Database;
//! use carelog_core::{CreateNoteRequest, InputType, NoteRepository};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let db = Database::connect("postgres://localhost/carelog").await?;
//!
//!     let note_id = db.notes.insert(CreateNoteRequest {
//!         patient_id: "john-smith".to_string(),
//!         input_type: InputType::Text,
//!         raw_content: "Patient reports mild headache.".to_string(),
//!         transcription: None,
//!         audio_identifier: None,
//!     }).await?;
//!
//!     println!("Created note: {}", note_id);
//!     Ok(())
//! }
//! ```

pub mod notes;
pub mod patients;
pub mod pool;
pub mod seed;
pub mod storage;
pub mod test_fixtures;

// Re-export core types
pub use carelog_core::*;

// Re-export repository and storage implementations
pub use notes::PgNoteRepository;
pub use patients::PgPatientRepository;
pub use pool::{create_pool, create_pool_with_config, log_pool_metrics, PoolConfig};
pub use seed::{seed, seed_patients, slugify};
pub use storage::{storage_from_env, storage_provider, DatabaseStorage, S3Storage};

/// Combined database context with all repositories.
#[derive(Clone)]
pub struct Database {
    /// The underlying connection pool.
    pub pool: sqlx::Pool<sqlx::Postgres>,
    /// Note repository.
    pub notes: PgNoteRepository,
    /// Patient repository.
    pub patients: PgPatientRepository,
}

impl Database {
    /// Create a new Database instance from a connection pool.
    pub fn new(pool: sqlx::Pool<sqlx::Postgres>) -> Self {
        Self {
            notes: PgNoteRepository::new(pool.clone()),
            patients: PgPatientRepository::new(pool.clone()),
            pool,
        }
    }

    /// Create a new Database instance by connecting to the given URL.
    pub async fn connect(url: &str) -> Result<Self> {
        let pool = create_pool(url).await?;
        Ok(Self::new(pool))
    }

    /// Create with custom pool configuration.
    pub async fn connect_with_config(url: &str, config: PoolConfig) -> Result<Self> {
        let pool = create_pool_with_config(url, config).await?;
        Ok(Self::new(pool))
    }

    /// Run pending migrations.
    #[cfg(feature = "migrations")]
    pub async fn migrate(&self) -> Result<()> {
        sqlx::migrate!("../../migrations")
            .run(&self.pool)
            .await
            .map_err(|e| Error::Database(sqlx::Error::Migrate(Box::new(e))))?;
        Ok(())
    }

    /// Get the underlying connection pool.
    pub fn pool(&self) -> &sqlx::Pool<sqlx::Postgres> {
        &self.pool
    }
}
