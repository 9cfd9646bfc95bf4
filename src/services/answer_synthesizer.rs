//! Answer synthesis
//!
//! Drives a question from retrieval to the final answer text:
//! retrieve, gate on confidence, prompt the chat model, check grounding,
//! reformat. Every path ends in an answer; failures become the fallback.

use std::sync::Arc;

use tracing::{info, instrument, warn};

use super::answer_formatter::AnswerFormatter;
use super::grounding::TokenOverlapValidator;
use super::retriever::Retriever;
use super::retry::RetryPolicy;
use super::vector_store::VectorStore;
use crate::domain::errors::{RagError, RagResult};
use crate::domain::models::{
    AnswerResult, ChatMessage, FallbackReason, GenerationConfig, ScoredResult, SourceReference,
};
use crate::domain::ports::{ChatBackend, GroundingValidator};

/// Produces grounded answers from retrieved context
pub struct AnswerSynthesizer {
    retriever: Retriever,
    chat: Arc<dyn ChatBackend>,
    language_model: String,
    config: GenerationConfig,
    validator: Arc<dyn GroundingValidator>,
    formatter: AnswerFormatter,
    retry: RetryPolicy,
}

impl AnswerSynthesizer {
    /// Create a synthesizer using the token-overlap grounding check.
    pub fn new(
        retriever: Retriever,
        chat: Arc<dyn ChatBackend>,
        language_model: impl Into<String>,
        config: GenerationConfig,
    ) -> RagResult<Self> {
        let validator = Arc::new(TokenOverlapValidator::from_config(&config));
        let retry = *retriever.retry_policy();

        Ok(Self {
            retriever,
            chat,
            language_model: language_model.into(),
            config,
            validator,
            formatter: AnswerFormatter::new()?,
            retry,
        })
    }

    /// Replace the grounding check
    pub fn with_validator(mut self, validator: Arc<dyn GroundingValidator>) -> Self {
        self.validator = validator;
        self
    }

    pub fn config(&self) -> &GenerationConfig {
        &self.config
    }

    pub fn language_model(&self) -> &str {
        &self.language_model
    }

    /// Answer `query` from `store`, returning only the text. Never fails.
    pub async fn generate_answer(&self, store: &VectorStore, query: &str) -> String {
        self.answer(store, query).await.text
    }

    /// Answer `query` from `store`, exposing how the question terminated.
    #[instrument(skip(self, store))]
    pub async fn answer(&self, store: &VectorStore, query: &str) -> AnswerResult {
        let results = match self.retriever.retrieve(store, query).await {
            Ok(results) => results,
            Err(err) => return self.backend_fallback(&err, Vec::new()),
        };
        let sources: Vec<SourceReference> = results.iter().map(SourceReference::from).collect();

        let Some(best) = results.first() else {
            info!("No chunk above the similarity threshold");
            return self.fallback(FallbackReason::NoContext, sources);
        };

        let required = self.retriever.config().generation_threshold();
        if best.similarity < required {
            info!(
                best_similarity = best.similarity,
                required, "Best match below generation threshold"
            );
            return self.fallback(
                FallbackReason::LowConfidence {
                    best_similarity: best.similarity,
                },
                sources,
            );
        }

        let messages = self.build_messages(query, &results);
        let options = self.config.chat_options();
        let completion = self
            .retry
            .execute("chat", || self.chat.chat(&self.language_model, &messages, options))
            .await;

        let raw = match completion {
            Ok(raw) => raw,
            Err(err) => return self.backend_fallback(&err, sources),
        };

        let text = self.formatter.format(&raw);
        if text.is_empty() {
            let err = RagError::Chat("empty completion".to_string());
            return self.backend_fallback(&err, sources);
        }

        // Checked after formatting: citation phrases are already stripped
        let report = self.validator.validate(&text, &results);
        if !report.grounded {
            warn!(
                validator = self.validator.name(),
                unsupported_terms = ?report.unsupported_terms,
                "Answer not grounded in context"
            );
            return self.fallback(
                FallbackReason::Ungrounded {
                    unsupported_terms: report.unsupported_terms,
                },
                sources,
            );
        }

        info!(source_count = sources.len(), "Answered from context");
        AnswerResult::answered(text, sources)
    }

    /// Chat messages for `query`: a system prompt holding the context and
    /// response rules, followed by the question.
    pub fn build_messages(&self, query: &str, context: &[ScoredResult]) -> Vec<ChatMessage> {
        vec![
            ChatMessage::system(build_system_prompt(context)),
            ChatMessage::user(query),
        ]
    }

    fn fallback(&self, reason: FallbackReason, sources: Vec<SourceReference>) -> AnswerResult {
        AnswerResult::fallback(self.config.fallback_response.clone(), reason, sources)
    }

    fn backend_fallback(&self, err: &RagError, sources: Vec<SourceReference>) -> AnswerResult {
        let message = err.summary();
        warn!(error = %message, "Falling back after backend error");

        let text = if self.config.diagnostic {
            format!("Error: {message}")
        } else {
            self.config.fallback_response.clone()
        };

        AnswerResult::fallback(text, FallbackReason::BackendError { message }, sources)
    }
}

impl std::fmt::Debug for AnswerSynthesizer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AnswerSynthesizer")
            .field("chat", &self.chat.name())
            .field("language_model", &self.language_model)
            .field("validator", &self.validator.name())
            .finish_non_exhaustive()
    }
}

const RESPONSE_RULES: &str = "\
Response rules:
1. Answer only from the context above.
2. If the context does not exactly match the question, say that the answer is uncertain.
3. Never guess or invent facts.
4. For procedures, use numbered steps with no blank lines between them.
5. For other information, answer in short prose.
6. If context excerpts conflict, point out the conflict.";

/// System prompt listing each context chunk with its similarity score
pub fn build_system_prompt(context: &[ScoredResult]) -> String {
    let context_str = context
        .iter()
        .enumerate()
        .map(|(i, r)| {
            format!(
                "[Context {}] (source: {}, similarity: {:.3})\n{}",
                i + 1,
                r.chunk.source(),
                r.similarity,
                r.chunk.content()
            )
        })
        .collect::<Vec<_>>()
        .join("\n\n");

    format!("Answer STRICTLY using only this context:\n\n{context_str}\n\n{RESPONSE_RULES}")
}
