//! Library surface of carelog-api.
//!
//! The server itself lives in `main.rs`; this exposes the pure note
//! ingestion rules so integration tests can drive them directly.

pub mod ingest;
