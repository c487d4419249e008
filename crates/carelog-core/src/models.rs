//! Core data models for carelog.
//!
//! These types are shared across all carelog crates and represent the
//! domain entities of the clinical note service. Wire names follow the
//! camelCase convention the client consumes.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

// =============================================================================
// INPUT TYPE
// =============================================================================

/// Provenance tag of a note's content: typed text or a transcribed
/// voice recording.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum InputType {
    Text,
    Audio,
}

impl InputType {
    /// Database/wire representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            InputType::Text => "text",
            InputType::Audio => "audio",
        }
    }
}

impl fmt::Display for InputType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for InputType {
    type Err = crate::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "text" => Ok(InputType::Text),
            "audio" => Ok(InputType::Audio),
            other => Err(crate::Error::Serialization(format!(
                "unknown input type: {other}"
            ))),
        }
    }
}

// =============================================================================
// PATIENT
// =============================================================================

/// A patient record. Created only by the seeder; referenced by zero or
/// more notes.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Patient {
    /// Deterministic slug derived from the patient name ("john-smith").
    pub id: String,
    pub name: String,
    pub dob: NaiveDate,
    pub gender: String,
    pub phone: Option<String>,
    pub address: Option<String>,
    #[serde(rename = "createdAt")]
    pub created_at_utc: DateTime<Utc>,
    #[serde(rename = "updatedAt")]
    pub updated_at_utc: DateTime<Utc>,
}

// =============================================================================
// NOTE
// =============================================================================

/// A clinical note tied to one patient.
///
/// Immutable after creation: no update or delete path exists. The raw
/// audio payload is not part of this type; it lives behind a storage
/// identifier and is served by the dedicated audio endpoint.
#[derive(Debug, Clone, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Note {
    pub id: Uuid,
    pub patient_id: String,
    pub input_type: InputType,
    /// The text shown to the user: typed text, or the finalized
    /// transcript for audio notes.
    pub raw_content: String,
    /// For audio notes, duplicates `raw_content`. `None` for text notes.
    /// Downstream consumers depend on both fields being populated
    /// identically, so the duplication is kept.
    pub transcription: Option<String>,
    /// Reserved for future SOAP-format AI output. Never populated.
    pub summary: Option<String>,
    /// Whether a stored recording exists for this note.
    pub has_audio: bool,
    #[serde(rename = "createdAt")]
    pub created_at_utc: DateTime<Utc>,
    #[serde(rename = "updatedAt")]
    pub updated_at_utc: DateTime<Utc>,
}

/// A note joined with its owning patient, as returned by the read and
/// ingestion endpoints.
#[derive(Debug, Clone, Serialize, Deserialize, utoipa::ToSchema)]
pub struct NoteWithPatient {
    #[serde(flatten)]
    pub note: Note,
    pub patient: Patient,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn sample_patient() -> Patient {
        Patient {
            id: "john-smith".to_string(),
            name: "John Smith".to_string(),
            dob: NaiveDate::from_ymd_opt(1985, 3, 15).unwrap(),
            gender: "Male".to_string(),
            phone: Some("(555) 123-4567".to_string()),
            address: Some("123 Oak Street, Springfield, IL 62701".to_string()),
            created_at_utc: Utc.with_ymd_and_hms(2026, 8, 1, 12, 0, 0).unwrap(),
            updated_at_utc: Utc.with_ymd_and_hms(2026, 8, 1, 12, 0, 0).unwrap(),
        }
    }

    fn sample_note() -> Note {
        Note {
            id: Uuid::nil(),
            patient_id: "john-smith".to_string(),
            input_type: InputType::Text,
            raw_content: "Patient reports mild headache.".to_string(),
            transcription: None,
            summary: None,
            has_audio: false,
            created_at_utc: Utc.with_ymd_and_hms(2026, 8, 1, 12, 30, 0).unwrap(),
            updated_at_utc: Utc.with_ymd_and_hms(2026, 8, 1, 12, 30, 0).unwrap(),
        }
    }

    #[test]
    fn test_input_type_round_trip() {
        for (variant, s) in [(InputType::Text, "text"), (InputType::Audio, "audio")] {
            assert_eq!(variant.as_str(), s);
            assert_eq!(s.parse::<InputType>().unwrap(), variant);
        }
    }

    #[test]
    fn test_input_type_rejects_unknown() {
        assert!("voice".parse::<InputType>().is_err());
        assert!("".parse::<InputType>().is_err());
        assert!("TEXT".parse::<InputType>().is_err());
    }

    #[test]
    fn test_input_type_serde_is_lowercase() {
        assert_eq!(serde_json::to_string(&InputType::Audio).unwrap(), "\"audio\"");
        let parsed: InputType = serde_json::from_str("\"text\"").unwrap();
        assert_eq!(parsed, InputType::Text);
    }

    #[test]
    fn test_patient_wire_format_is_camel_case() {
        let json = serde_json::to_value(sample_patient()).unwrap();
        assert_eq!(json["id"], "john-smith");
        assert_eq!(json["dob"], "1985-03-15");
        assert!(json.get("createdAt").is_some());
        assert!(json.get("updatedAt").is_some());
        assert!(json.get("created_at_utc").is_none());
    }

    #[test]
    fn test_note_wire_format_is_camel_case() {
        let json = serde_json::to_value(sample_note()).unwrap();
        assert_eq!(json["patientId"], "john-smith");
        assert_eq!(json["inputType"], "text");
        assert_eq!(json["rawContent"], "Patient reports mild headache.");
        assert_eq!(json["transcription"], serde_json::Value::Null);
        assert_eq!(json["summary"], serde_json::Value::Null);
        assert_eq!(json["hasAudio"], false);
    }

    #[test]
    fn test_note_with_patient_flattens_note_fields() {
        let wrapped = NoteWithPatient {
            note: sample_note(),
            patient: sample_patient(),
        };
        let json = serde_json::to_value(&wrapped).unwrap();
        // Note fields sit at the top level, the patient is embedded.
        assert_eq!(json["rawContent"], "Patient reports mild headache.");
        assert_eq!(json["patient"]["name"], "John Smith");
        assert!(json.get("note").is_none());
    }
}
