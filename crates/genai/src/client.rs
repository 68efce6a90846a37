//! Reqwest-backed implementation of the generation seam.

use std::time::Duration;

use async_trait::async_trait;

use crate::generator::{GenaiError, GeneratedQuestion, GenerationSpec, QuestionGenerator};

/// HTTP client for the generation service.
pub struct HttpQuestionGenerator {
    client: reqwest::Client,
    base_url: String,
}

impl HttpQuestionGenerator {
    /// Create a client for the service at `base_url` with a per-request
    /// timeout.
    pub fn new(base_url: String, timeout: Duration) -> Result<Self, GenaiError> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self { client, base_url })
    }

    /// Create a client reusing an existing [`reqwest::Client`].
    pub fn with_client(client: reqwest::Client, base_url: String) -> Self {
        Self { client, base_url }
    }
}

#[async_trait]
impl QuestionGenerator for HttpQuestionGenerator {
    async fn generate(&self, spec: &GenerationSpec) -> Result<GeneratedQuestion, GenaiError> {
        tracing::debug!(
            skill_area = %spec.skill_area,
            question_type = %spec.question_type,
            cefr_level = %spec.cefr_level,
            "requesting question generation"
        );
        let response = self
            .client
            .post(format!("{}/v1/generate", self.base_url))
            .json(spec)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "<unreadable body>".to_string());
            return Err(GenaiError::Api {
                status: status.as_u16(),
                body,
            });
        }

        let question = response.json::<GeneratedQuestion>().await?;
        validate(&question)?;
        Ok(question)
    }
}

/// Reject payloads no session could use before they reach the inventory.
fn validate(question: &GeneratedQuestion) -> Result<(), GenaiError> {
    if question.prompt.trim().is_empty() {
        return Err(GenaiError::InvalidResponse("empty prompt".to_string()));
    }
    if question.preparation_secs < 0 || question.min_response_secs < 0 {
        return Err(GenaiError::InvalidResponse(
            "negative timing value".to_string(),
        ));
    }
    if question.max_response_secs < question.min_response_secs {
        return Err(GenaiError::InvalidResponse(format!(
            "max response {}s below min {}s",
            question.max_response_secs, question.min_response_secs
        )));
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
