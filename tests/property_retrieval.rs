//! Property-based tests for chunking and retrieval invariants
//!
//! Tests the following properties:
//! 1. Chunk bounds: min_chunk_size <= len <= max_chunk_size
//! 2. Cosine bounds: similarity ∈ [-1, 1]
//! 3. Cosine symmetry: sim(A,B) == sim(B,A), sim(A,A) ≈ 1
//! 4. Ranking: descending, strictly above threshold, at most top_n
//! 5. Store build determinism for a deterministic backend
//! 6. Answers are never empty

mod common;

use std::sync::Arc;

use docrag::adapters::mock::{bag_of_words_embedding, MOCK_EMBEDDING_DIMENSION};
use docrag::adapters::{MockChatBackend, MockEmbeddingBackend};
use docrag::domain::models::{ChunkingConfig, OverlapSource, ScoredResult, TextChunk};
use docrag::services::chunker::split_text;
use docrag::services::similarity::{cosine_similarity, rank};
use docrag::services::{EmbeddingProvider, RetryPolicy, VectorStore};
use proptest::prelude::*;

/// Documents made of short word paragraphs separated by line breaks
fn document_strategy() -> impl Strategy<Value = String> {
    prop::collection::vec(
        prop::string::string_regex("[a-z]{1,12}( [a-z]{1,12}){0,30}").expect("Valid regex"),
        0..20,
    )
    .prop_map(|paragraphs| paragraphs.join("\n"))
}

/// Valid chunking configurations
fn chunking_strategy() -> impl Strategy<Value = ChunkingConfig> {
    (5usize..200, any::<bool>())
        .prop_flat_map(|(max, flushed)| (Just(max), 0..max, 0..=max, Just(flushed)))
        .prop_map(|(max, overlap, min, flushed)| {
            let source = if flushed {
                OverlapSource::FlushedChunk
            } else {
                OverlapSource::TriggeringParagraph
            };
            ChunkingConfig::new(max, min, overlap).with_overlap_source(source)
        })
}

fn vector_strategy(dim: usize) -> impl Strategy<Value = Vec<f32>> {
    prop::collection::vec(-100.0f32..100.0f32, dim..=dim)
}

fn scored_strategy() -> impl Strategy<Value = Vec<ScoredResult>> {
    prop::collection::vec(-1.0f32..=1.0f32, 0..50).prop_map(|scores| {
        scores
            .into_iter()
            .enumerate()
            .map(|(i, s)| ScoredResult::new(TextChunk::new("doc", i, format!("chunk {i}")), s))
            .collect()
    })
}

proptest! {
    /// Property 1: every chunk respects the configured size bounds
    #[test]
    fn proptest_chunk_size_bounds(text in document_strategy(), config in chunking_strategy()) {
        for chunk in split_text(&text, &config).expect("generated configs are valid") {
            let len = chunk.chars().count();
            prop_assert!(len <= config.max_chunk_size, "chunk of {} > max {}", len, config.max_chunk_size);
            prop_assert!(len >= config.min_chunk_size, "chunk of {} < min {}", len, config.min_chunk_size);
        }
    }

    /// Property 2: cosine similarity stays within [-1, 1]
    #[test]
    fn proptest_cosine_bounds((a, b) in (1usize..64).prop_flat_map(|d| (vector_strategy(d), vector_strategy(d)))) {
        let sim = cosine_similarity(&a, &b);
        prop_assert!((-1.0..=1.0).contains(&sim));
    }

    /// Property 4: ranking order, threshold and length
    #[test]
    fn proptest_ranking_invariants(
        results in scored_strategy(),
        threshold in -1.0f32..1.0,
        top_n in 1usize..10,
    ) {
        let ranked = rank(results, threshold, top_n);

        prop_assert!(ranked.len() <= top_n);
        for r in &ranked {
            prop_assert!(r.similarity > threshold);
        }
        for pair in ranked.windows(2) {
            prop_assert!(pair[0].similarity >= pair[1].similarity);
        }
    }
}

/// Property 3: cosine similarity is symmetric and self-similarity is 1
#[test_strategy::proptest]
fn proptest_cosine_symmetry(
    #[strategy(vector_strategy(16))] a: Vec<f32>,
    #[strategy(vector_strategy(16))] b: Vec<f32>,
) {
    prop_assert!((cosine_similarity(&a, &b) - cosine_similarity(&b, &a)).abs() < 1e-6);

    let norm: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    prop_assume!(norm > 1e-3);
    prop_assert!((cosine_similarity(&a, &a) - 1.0).abs() < 1e-5);
}

/// Property 5: building twice from the same chunks yields the same store
#[test_strategy::proptest(cases = 32)]
fn proptest_store_build_is_deterministic(
    #[strategy(prop::collection::vec("[a-z]{3,10}( [a-z]{3,10}){2,8}", 1..8))] texts: Vec<String>,
    #[strategy(1usize..6)] concurrency: usize,
) {
    let chunks: Vec<TextChunk> = texts
        .iter()
        .enumerate()
        .map(|(i, text)| TextChunk::new("generated", i, text.clone()))
        .collect();
    let provider = EmbeddingProvider::new(Arc::new(MockEmbeddingBackend::new()), "nomic-embed-text");

    let first = tokio_test::block_on(VectorStore::build(&provider, chunks.clone(), 1, RetryPolicy::default()));
    let second = tokio_test::block_on(VectorStore::build(&provider, chunks, concurrency, RetryPolicy::default()));

    prop_assert_eq!(first, second);
}

/// Property 6: any non-blank question gets a non-empty answer
#[test_strategy::proptest(cases = 24)]
fn proptest_answer_is_never_empty(#[strategy("[A-Za-z ?]{1,60}")] question: String) {
    prop_assume!(!question.trim().is_empty());

    let answer = tokio_test::block_on(async {
        let chat = Arc::new(MockChatBackend::replying(common::SIDE_BUTTON_ANSWER));
        let engine = common::engine_with(common::scenario_config(), &common::manual_corpus(), chat).await;
        engine.ask_question(&question).await
    })
    .expect("non-blank question must be accepted");

    prop_assert!(!answer.text.trim().is_empty());
}

#[test]
fn test_mock_embedding_dimension() {
    let vector = bag_of_words_embedding("side button", MOCK_EMBEDDING_DIMENSION);
    assert_eq!(vector.len(), MOCK_EMBEDDING_DIMENSION);
    assert!((cosine_similarity(&vector, &vector) - 1.0).abs() < 1e-6);
}
