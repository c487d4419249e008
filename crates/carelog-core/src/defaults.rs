//! Centralized default constants for the carelog system.
//!
//! **This module is the single source of truth** for shared default values
//! and environment variable names. All crates reference these constants
//! instead of defining their own magic strings.

// =============================================================================
// DATABASE
// =============================================================================

/// Environment variable for the PostgreSQL connection string.
pub const ENV_DATABASE_URL: &str = "DATABASE_URL";

/// Default connection string when `DATABASE_URL` is not set.
pub const DEFAULT_DATABASE_URL: &str = "postgres://localhost/carelog";

// =============================================================================
// SERVER
// =============================================================================

/// Environment variable for the listen address.
pub const ENV_HOST: &str = "HOST";

/// Default listen address.
pub const DEFAULT_HOST: &str = "0.0.0.0";

/// Environment variable for the listen port.
pub const ENV_PORT: &str = "PORT";

/// Default listen port.
pub const DEFAULT_PORT: u16 = 3000;

/// Environment variable for the comma-separated CORS origin whitelist.
pub const ENV_ALLOWED_ORIGINS: &str = "ALLOWED_ORIGINS";

/// Default CORS origins (local development client).
pub const DEFAULT_ALLOWED_ORIGINS: &str = "http://localhost:3000";

/// Environment variable for the maximum request body size in bytes.
pub const ENV_MAX_UPLOAD_BYTES: &str = "MAX_UPLOAD_BYTES";

/// Default request body limit. Sized for voice-note recordings, which a
/// browser MediaRecorder session keeps as a single blob.
pub const DEFAULT_MAX_UPLOAD_BYTES: usize = 25 * 1024 * 1024;

// =============================================================================
// STORAGE
// =============================================================================

/// Environment variable selecting the audio storage provider.
pub const ENV_STORAGE_PROVIDER: &str = "STORAGE_PROVIDER";

/// In-database (base64 column) storage provider. The working default.
pub const STORAGE_PROVIDER_DATABASE: &str = "database";

/// Remote object storage provider. Placeholder; not implemented.
pub const STORAGE_PROVIDER_S3: &str = "s3";

/// Content type served when audio magic-byte detection fails.
pub const FALLBACK_AUDIO_CONTENT_TYPE: &str = "application/octet-stream";
