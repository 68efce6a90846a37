//! Question-inventory maintenance.
//!
//! Stock for a (skill area, question type, CEFR level) key is topped up by
//! asking the generation service for one question at a time, so a batch
//! degrades item by item: a failed call costs one question, not the batch.

use lingo_core::levels::CefrLevel;
use lingo_core::skills::{QuestionType, SkillArea};
use lingo_db::models::question::NewQuestion;
use lingo_db::repositories::QuestionRepo;
use lingo_db::DbPool;
use lingo_genai::generator::{GeneratedQuestion, GenerationSpec, QuestionGenerator};
use serde::Serialize;
use serde_json::Value as JsonValue;

/// Hard cap on questions requested from the generation service in one
/// top-up, whatever the configuration or request says.
pub const MAX_GENERATION_PER_CALL: i64 = 20;

/// What one top-up did for one key.
#[derive(Debug, Serialize)]
pub struct InventoryReport {
    pub skill_area: SkillArea,
    pub question_type: QuestionType,
    pub cefr_level: CefrLevel,
    /// Published stock for the key before the top-up.
    pub available_before: i64,
    /// Questions requested from the generation service (0 when the key
    /// was already at or above the floor).
    pub requested: i64,
    /// Questions generated and stored.
    pub generated: i64,
    /// One message per failed generation or store, in call order.
    pub errors: Vec<String>,
}

/// Counts stock and tops up under-stocked keys via the generation service.
pub struct InventoryManager<'a> {
    pool: &'a DbPool,
    generator: &'a dyn QuestionGenerator,
}

impl<'a> InventoryManager<'a> {
    pub fn new(pool: &'a DbPool, generator: &'a dyn QuestionGenerator) -> Self {
        Self { pool, generator }
    }

    /// Bring a key's stock up when it has fallen below `min_count`.
    ///
    /// Requests up to `topup_count` questions (capped at
    /// [`MAX_GENERATION_PER_CALL`]) and stores each as it arrives. Only the
    /// initial stock count can fail the call; per-question failures land in
    /// the report and the rest of the batch proceeds.
    pub async fn ensure_inventory(
        &self,
        skill_area: SkillArea,
        question_type: QuestionType,
        cefr_level: CefrLevel,
        min_count: i64,
        topup_count: i64,
    ) -> Result<InventoryReport, sqlx::Error> {
        let available_before =
            QuestionRepo::count_for_key(self.pool, skill_area, question_type, cefr_level).await?;

        let mut report = InventoryReport {
            skill_area,
            question_type,
            cefr_level,
            available_before,
            requested: 0,
            generated: 0,
            errors: Vec::new(),
        };
        if available_before >= min_count {
            return Ok(report);
        }

        report.requested = topup_count.min(MAX_GENERATION_PER_CALL);
        let spec = GenerationSpec {
            skill_area,
            question_type,
            cefr_level,
        };

        for _ in 0..report.requested {
            match self.generator.generate(&spec).await {
                Ok(generated) => {
                    match QuestionRepo::insert_generated(self.pool, &new_question(&spec, generated))
                        .await
                    {
                        Ok(_) => report.generated += 1,
                        Err(err) => report.errors.push(format!("store failed: {err}")),
                    }
                }
                Err(err) => report.errors.push(err.to_string()),
            }
        }

        tracing::debug!(
            %skill_area,
            %question_type,
            %cefr_level,
            requested = report.requested,
            generated = report.generated,
            failures = report.errors.len(),
            "Inventory top-up finished",
        );

        Ok(report)
    }
}

/// Map one generated question onto the insert DTO for its key.
fn new_question(spec: &GenerationSpec, generated: GeneratedQuestion) -> NewQuestion {
    // A service that omits metadata deserializes to JSON null; the column
    // holds an object, so store the empty one.
    let metadata = match generated.metadata {
        JsonValue::Null => serde_json::json!({}),
        other => other,
    };
    NewQuestion {
        skill_area: spec.skill_area.as_str().to_string(),
        question_type: spec.question_type.as_str().to_string(),
        cefr_level: spec.cefr_level.ordinal(),
        prompt: generated.prompt,
        preparation_secs: generated.preparation_secs,
        min_response_secs: generated.min_response_secs,
        max_response_secs: generated.max_response_secs,
        media_url: generated.media_url,
        metadata,
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn spec() -> GenerationSpec {
        GenerationSpec {
            skill_area: SkillArea::Writing,
            question_type: QuestionType::RespondToPrompt,
            cefr_level: CefrLevel::B2,
        }
    }

    #[test]
    fn generated_question_maps_onto_its_key() {
        let row = new_question(
            &spec(),
            GeneratedQuestion {
                prompt: "Write about a decision you regret.".into(),
                preparation_secs: 30,
                min_response_secs: 60,
                max_response_secs: 300,
                media_url: None,
                metadata: json!({"register": "formal"}),
            },
        );

        assert_eq!(row.skill_area, "writing");
        assert_eq!(row.question_type, "respond_to_prompt");
        assert_eq!(row.cefr_level, 4);
        assert_eq!(row.metadata, json!({"register": "formal"}));
    }

    #[test]
    fn null_metadata_becomes_the_empty_object() {
        let row = new_question(
            &spec(),
            GeneratedQuestion {
                prompt: "p".into(),
                preparation_secs: 0,
                min_response_secs: 0,
                max_response_secs: 60,
                media_url: None,
                metadata: JsonValue::Null,
            },
        );

        assert_eq!(row.metadata, json!({}));
    }
}
