//! The question-generation seam and its wire DTOs.
//!
//! One call generates one question, so a batch top-up degrades item by
//! item instead of all or nothing.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

use lingo_core::levels::CefrLevel;
use lingo_core::skills::{QuestionType, SkillArea};

/// What to generate: one question for an exact (skill, type, level) key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerationSpec {
    pub skill_area: SkillArea,
    pub question_type: QuestionType,
    pub cefr_level: CefrLevel,
}

/// A generated question as returned by the service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeneratedQuestion {
    pub prompt: String,
    pub preparation_secs: i32,
    pub min_response_secs: i32,
    pub max_response_secs: i32,
    #[serde(default)]
    pub media_url: Option<String>,
    #[serde(default)]
    pub metadata: JsonValue,
}

/// Errors from the generation service.
#[derive(Debug, thiserror::Error)]
pub enum GenaiError {
    /// The HTTP request itself failed (network, DNS, TLS, timeout).
    #[error("generation request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The service returned a non-2xx status code.
    #[error("generation service error ({status}): {body}")]
    Api {
        /// HTTP status code.
        status: u16,
        /// Raw response body for debugging.
        body: String,
    },

    /// The service answered 2xx but the payload is unusable.
    #[error("unusable generated question: {0}")]
    InvalidResponse(String),
}

/// A source of generated questions.
///
/// Implemented over HTTP in production; tests script it in process.
#[async_trait]
pub trait QuestionGenerator: Send + Sync {
    /// Generate one question for the given key.
    async fn generate(&self, spec: &GenerationSpec) -> Result<GeneratedQuestion, GenaiError>;
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn spec_serializes_with_wire_names() {
        let spec = GenerationSpec {
            skill_area: SkillArea::Listening,
            question_type: QuestionType::DictationTyping,
            cefr_level: CefrLevel::B1,
        };
        let value = serde_json::to_value(&spec).unwrap();
        assert_eq!(
            value,
            json!({
                "skill_area": "listening",
                "question_type": "dictation_typing",
                "cefr_level": "B1",
            })
        );
    }

    #[test]
    fn generated_question_fills_optional_fields() {
        let question: GeneratedQuestion = serde_json::from_value(json!({
            "prompt": "Describe your morning routine.",
            "preparation_secs": 20,
            "min_response_secs": 30,
            "max_response_secs": 90,
        }))
        .unwrap();
        assert_eq!(question.media_url, None);
        assert_eq!(question.metadata, JsonValue::Null);
    }

    #[test]
    fn error_display_carries_status_and_body() {
        let err = GenaiError::Api {
            status: 502,
            body: "upstream overloaded".to_string(),
        };
        let text = err.to_string();
        assert!(text.contains("502"));
        assert!(text.contains("upstream overloaded"));
    }
}
