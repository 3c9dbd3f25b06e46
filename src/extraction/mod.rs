//! Field extraction from photographed forms.
//!
//! The heavy lifting (OCR, layout, entity detection) happens inside a remote
//! Document AI processor. This module owns the seam to that service and the
//! normalization of its loosely-typed entities into a [`NormalizedRecord`].

mod document_ai;

pub use document_ai::DocumentAiClient;

use std::collections::BTreeMap;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// MIME type every upload is declared as.
pub const IMAGE_MIME_TYPE: &str = "image/jpeg";

/// Errors from the extraction service.
#[derive(Debug, Error)]
pub enum ExtractionError {
    #[error("Authentication failed: {0}")]
    Auth(String),

    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Document AI error ({status}): {message}")]
    Api { status: u16, message: String },

    #[error("Invalid response: {0}")]
    InvalidResponse(String),
}

/// A named span the processor found on the form.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtractedEntity {
    #[serde(rename = "type", default)]
    pub entity_type: String,
    #[serde(default)]
    pub mention_text: String,
}

impl ExtractedEntity {
    pub fn new(entity_type: impl Into<String>, mention_text: impl Into<String>) -> Self {
        Self {
            entity_type: entity_type.into(),
            mention_text: mention_text.into(),
        }
    }
}

/// Value of a normalized field: a checkbox state or free text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    Flag(bool),
    Text(String),
}

impl FieldValue {
    /// Normalize a raw mention text.
    ///
    /// Only the exact strings `checked` and `unchecked` become flags.
    pub fn from_mention(mention: &str) -> Self {
        match mention {
            "checked" => FieldValue::Flag(true),
            "unchecked" => FieldValue::Flag(false),
            other => FieldValue::Text(other.replace('\n', " ").trim().to_string()),
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            FieldValue::Text(s) => Some(s),
            FieldValue::Flag(_) => None,
        }
    }
}

/// Field name to value, as read from one form.
pub type NormalizedRecord = BTreeMap<String, FieldValue>;

/// Fold a list of entities into a record. Later entities with the same type
/// replace earlier ones.
pub fn normalize_entities(entities: &[ExtractedEntity]) -> NormalizedRecord {
    let mut record = NormalizedRecord::new();
    for entity in entities {
        record.insert(
            entity.entity_type.clone(),
            FieldValue::from_mention(&entity.mention_text),
        );
    }
    record
}

/// Something that can read a form image into a record.
#[async_trait]
pub trait DocumentExtractor: Send + Sync {
    /// Send the image bytes as-is and normalize whatever comes back.
    async fn extract(&self, image: &[u8]) -> Result<NormalizedRecord, ExtractionError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_checkbox_states_become_flags() {
        assert_eq!(FieldValue::from_mention("checked"), FieldValue::Flag(true));
        assert_eq!(FieldValue::from_mention("unchecked"), FieldValue::Flag(false));
    }

    #[test]
    fn test_checkbox_match_is_exact() {
        assert_eq!(
            FieldValue::from_mention("Checked"),
            FieldValue::Text("Checked".to_string())
        );
        assert_eq!(
            FieldValue::from_mention(" checked "),
            FieldValue::Text("checked".to_string())
        );
    }

    #[test]
    fn test_text_newlines_collapsed_and_trimmed() {
        assert_eq!(
            FieldValue::from_mention("  Torno\nCNC 3\n"),
            FieldValue::Text("Torno CNC 3".to_string())
        );
        assert_eq!(
            FieldValue::from_mention("a\n\nb"),
            FieldValue::Text("a  b".to_string())
        );
    }

    #[test]
    fn test_last_entity_wins() {
        let entities = vec![
            ExtractedEntity::new("Item", "A-10"),
            ExtractedEntity::new("Rebarba", "unchecked"),
            ExtractedEntity::new("Item", "B-20"),
        ];
        let record = normalize_entities(&entities);
        assert_eq!(record.len(), 2);
        assert_eq!(record["Item"], FieldValue::Text("B-20".to_string()));
        assert_eq!(record["Rebarba"], FieldValue::Flag(false));
    }

    #[test]
    fn test_empty_entities_give_empty_record() {
        assert!(normalize_entities(&[]).is_empty());
    }

    #[test]
    fn test_normalization_is_repeatable() {
        let entities = vec![
            ExtractedEntity::new("Observacoes", "peça\nriscada "),
            ExtractedEntity::new("Risco", "checked"),
        ];
        assert_eq!(normalize_entities(&entities), normalize_entities(&entities));
    }

    #[test]
    fn test_record_serializes_to_plain_json() {
        let record = normalize_entities(&[
            ExtractedEntity::new("Batida", "checked"),
            ExtractedEntity::new("Setor", "Usinagem"),
        ]);
        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"Batida": true, "Setor": "Usinagem"})
        );
    }
}
