//! Note submission validation and normalization.
//!
//! The ingestion endpoint accepts a multipart form whose field
//! combination decides whether a note is valid. The rules live here as a
//! pure step so they are testable without a server:
//!
//! 1. `patientId` must be present and non-empty.
//! 2. `inputType == "text"`: `textContent` must be present and non-empty;
//!    it becomes `raw_content` byte-for-byte and `transcription` stays
//!    empty.
//! 3. `inputType == "audio"`: `transcription` must be non-empty after
//!    trimming; the trimmed transcript becomes both `raw_content` and
//!    `transcription`.
//! 4. Any other combination is rejected.

use carelog_core::{Error, InputType, Result};

/// Raw fields parsed out of the multipart submission. Unknown form
/// fields are dropped before this type is built.
#[derive(Debug, Default, Clone)]
pub struct NoteSubmission {
    pub patient_id: Option<String>,
    pub input_type: Option<String>,
    pub text_content: Option<String>,
    pub transcription: Option<String>,
}

/// A submission that passed validation, ready for insertion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedNote {
    pub patient_id: String,
    pub input_type: InputType,
    pub raw_content: String,
    pub transcription: Option<String>,
}

impl NoteSubmission {
    /// Apply the validation and normalization rules.
    ///
    /// The two rejection messages are part of the HTTP contract and must
    /// stay byte-identical: "Patient ID is required" and "Invalid input".
    pub fn normalize(self) -> Result<NormalizedNote> {
        let patient_id = match self.patient_id {
            Some(id) if !id.is_empty() => id,
            _ => return Err(Error::InvalidInput("Patient ID is required".to_string())),
        };

        match self.input_type.as_deref() {
            Some("text") => match self.text_content {
                Some(text) if !text.is_empty() => Ok(NormalizedNote {
                    patient_id,
                    input_type: InputType::Text,
                    raw_content: text,
                    transcription: None,
                }),
                _ => Err(invalid_input()),
            },
            Some("audio") => match self.transcription.as_deref().map(str::trim) {
                Some(transcript) if !transcript.is_empty() => Ok(NormalizedNote {
                    patient_id,
                    input_type: InputType::Audio,
                    raw_content: transcript.to_string(),
                    transcription: Some(transcript.to_string()),
                }),
                _ => Err(invalid_input()),
            },
            _ => Err(invalid_input()),
        }
    }
}

fn invalid_input() -> Error {
    Error::InvalidInput("Invalid input".to_string())
}
