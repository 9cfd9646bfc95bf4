//! Text chunking service
//!
//! Splits extracted document text into bounded, overlapping chunks.
//! Paragraphs are accumulated into a buffer joined by single spaces; the
//! buffer is flushed whenever the next paragraph would push it past
//! `max_chunk_size`. Sizes are counted in chars, never bytes.

use tracing::debug;

use crate::domain::errors::{RagError, RagResult};
use crate::domain::models::{ChunkingConfig, OverlapSource, SourceDocument, TextChunk};

/// Paragraph-aware text chunker
#[derive(Debug, Clone, Default)]
pub struct Chunker {
    config: ChunkingConfig,
}

impl Chunker {
    /// Create a chunker with the default configuration
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a chunker with a custom configuration
    pub fn with_config(config: ChunkingConfig) -> RagResult<Self> {
        validate(&config)?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &ChunkingConfig {
        &self.config
    }

    /// Chunk the text of a single document.
    ///
    /// Chunk positions restart at 0 for every document.
    pub fn chunk(&self, source: &str, text: &str) -> Vec<TextChunk> {
        let chunks: Vec<TextChunk> = split_paragraphs(text, &self.config)
            .into_iter()
            .enumerate()
            .map(|(position, content)| TextChunk::new(source, position, content))
            .collect();

        debug!(source, chunk_count = chunks.len(), "Chunked document");
        chunks
    }

    /// Chunk every document of a corpus, preserving corpus order.
    pub fn chunk_documents(&self, documents: &[SourceDocument]) -> Vec<TextChunk> {
        documents
            .iter()
            .flat_map(|doc| self.chunk(&doc.name, &doc.text))
            .collect()
    }
}

fn validate(config: &ChunkingConfig) -> RagResult<()> {
    config
        .validate()
        .map_err(|e| RagError::Config(format!("Invalid chunking config: {e}")))
}

/// Split `text` into chunk contents according to `config`.
///
/// Every returned chunk is at least `min_chunk_size` and at most
/// `max_chunk_size` chars long.
///
/// # Errors
/// `RagError::Config` when `config` is invalid (zero `max_chunk_size`, or
/// `chunk_overlap` not below `max_chunk_size`)
pub fn split_text(text: &str, config: &ChunkingConfig) -> RagResult<Vec<String>> {
    validate(config)?;
    Ok(split_paragraphs(text, config))
}

/// Chunking proper; `config` must already be validated.
fn split_paragraphs(text: &str, config: &ChunkingConfig) -> Vec<String> {
    let max = config.max_chunk_size;
    let overlap = config.chunk_overlap;

    let mut chunks = Vec::new();
    let mut buffer = String::new();
    let mut buffer_len = 0usize;

    for paragraph in text.lines().map(str::trim).filter(|p| !p.is_empty()) {
        let paragraph_len = paragraph.chars().count();

        let joined_len = if buffer_len == 0 {
            paragraph_len
        } else {
            buffer_len + 1 + paragraph_len
        };

        if joined_len <= max {
            if buffer_len > 0 {
                buffer.push(' ');
            }
            buffer.push_str(paragraph);
            buffer_len = joined_len;
            continue;
        }

        let seed = if buffer_len == 0 {
            // Paragraph alone exceeds the limit.
            paragraph.to_string()
        } else {
            let flushed = std::mem::take(&mut buffer);
            let seed = match config.overlap_source {
                OverlapSource::TriggeringParagraph => tail_chars(paragraph, overlap).to_string(),
                OverlapSource::FlushedChunk => {
                    let tail = tail_chars(&flushed, overlap);
                    let carried = if tail.is_empty() {
                        paragraph.to_string()
                    } else {
                        format!("{tail} {paragraph}")
                    };
                    if carried.chars().count() > max {
                        paragraph.to_string()
                    } else {
                        carried
                    }
                }
            };
            chunks.push(flushed);
            seed
        };

        let (rest, rest_len) = split_oversized(seed, max, overlap, &mut chunks);
        buffer = rest;
        buffer_len = rest_len;
    }

    if buffer_len > 0 {
        chunks.push(buffer);
    }

    chunks.retain(|chunk| chunk.chars().count() >= config.min_chunk_size);
    chunks
}

/// Emit `max`-sized windows of `text` into `chunks` until the remainder fits.
///
/// Consecutive windows share `overlap` chars. Returns the remainder and its length.
fn split_oversized(
    text: String,
    max: usize,
    overlap: usize,
    chunks: &mut Vec<String>,
) -> (String, usize) {
    let len = text.chars().count();
    if len <= max {
        return (text, len);
    }

    let chars: Vec<char> = text.chars().collect();
    let stride = max - overlap;
    let mut start = 0;

    while chars.len() - start > max {
        chunks.push(chars[start..start + max].iter().collect());
        start += stride;
    }

    (chars[start..].iter().collect(), chars.len() - start)
}

/// The last `n` chars of `text`.
fn tail_chars(text: &str, n: usize) -> &str {
    if n == 0 {
        return "";
    }
    let count = text.chars().count();
    if count <= n {
        return text;
    }
    match text.char_indices().nth(count - n) {
        Some((idx, _)) => &text[idx..],
        None => text,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(max: usize, min: usize, overlap: usize) -> ChunkingConfig {
        ChunkingConfig::new(max, min, overlap)
    }

    #[test]
    fn test_empty_text() {
        assert!(split_paragraphs("", &config(100, 1, 10)).is_empty());
        assert!(split_paragraphs("  \n\n \t\n", &config(100, 1, 10)).is_empty());
    }

    #[test]
    fn test_paragraphs_are_trimmed_and_joined() {
        let chunks = split_paragraphs("  first  \n\n   \n second ", &config(100, 1, 10));
        assert_eq!(chunks, vec!["first second"]);
    }

    #[test]
    fn test_flush_seeds_from_triggering_paragraph() {
        let text = format!("{}\n{}", "a".repeat(20), "b".repeat(15));
        let chunks = split_paragraphs(&text, &config(30, 1, 5));
        assert_eq!(chunks, vec!["a".repeat(20), "b".repeat(5)]);
    }

    #[test]
    fn test_flush_seeds_from_flushed_chunk() {
        let text = format!("{}\n{}", "a".repeat(20), "b".repeat(15));
        let cfg = config(30, 1, 5).with_overlap_source(OverlapSource::FlushedChunk);
        let chunks = split_paragraphs(&text, &cfg);
        assert_eq!(
            chunks,
            vec!["a".repeat(20), format!("{} {}", "a".repeat(5), "b".repeat(15))]
        );
    }

    #[test]
    fn test_flushed_chunk_seed_falls_back_to_paragraph() {
        let text = format!("{}\n{}", "a".repeat(10), "b".repeat(18));
        let cfg = config(20, 1, 5).with_overlap_source(OverlapSource::FlushedChunk);
        let chunks = split_paragraphs(&text, &cfg);
        assert_eq!(chunks, vec!["a".repeat(10), "b".repeat(18)]);
    }

    #[test]
    fn test_oversized_paragraph_is_windowed() {
        let chunks = split_paragraphs(&"x".repeat(50), &config(20, 5, 5));
        assert_eq!(chunks.len(), 3);
        assert!(chunks.iter().all(|c| c.chars().count() == 20));
    }

    #[test]
    fn test_windows_share_overlap() {
        let text: String = ('a'..='z').chain('A'..='Z').collect();
        let chunks = split_paragraphs(&text, &config(20, 1, 5));
        for pair in chunks.windows(2) {
            let tail = tail_chars(&pair[0], 5);
            assert!(pair[1].starts_with(tail), "{:?}", pair);
        }
        assert_eq!(chunks.last().map(|c| c.ends_with('Z')), Some(true));
    }

    #[test]
    fn test_short_chunks_are_discarded() {
        let text = format!("{}\n{}", "a".repeat(20), "b".repeat(15));
        let chunks = split_paragraphs(&text, &config(30, 10, 5));
        assert_eq!(chunks, vec!["a".repeat(20)]);
    }

    #[test]
    fn test_lengths_are_counted_in_chars() {
        let chunks = split_paragraphs(&"é".repeat(50), &config(20, 5, 5));
        assert_eq!(chunks.len(), 3);
        assert!(chunks.iter().all(|c| c.chars().count() == 20));
    }

    #[test]
    fn test_zero_overlap() {
        let chunks = split_paragraphs(&"z".repeat(40), &config(20, 1, 0));
        assert_eq!(chunks, vec!["z".repeat(20), "z".repeat(20)]);
    }

    #[test]
    fn test_tail_chars() {
        assert_eq!(tail_chars("hello", 0), "");
        assert_eq!(tail_chars("hello", 2), "lo");
        assert_eq!(tail_chars("hello", 10), "hello");
        assert_eq!(tail_chars("añbñc", 3), "bñc");
    }

    #[test]
    fn test_split_text_rejects_invalid_config() {
        let equal = split_text("some text", &config(10, 1, 10)).unwrap_err();
        assert_eq!(equal.kind(), "config");

        let larger = split_text(&"x".repeat(50), &config(10, 1, 25)).unwrap_err();
        assert_eq!(larger.kind(), "config");

        assert!(split_text("some text", &config(0, 0, 0)).is_err());
        assert_eq!(
            split_text("some text", &config(10, 1, 2)).unwrap(),
            vec!["some text"]
        );
    }

    #[test]
    fn test_with_config_rejects_invalid() {
        let err = Chunker::with_config(config(10, 1, 10)).unwrap_err();
        assert_eq!(err.kind(), "config");
        assert!(Chunker::with_config(config(10, 1, 2)).is_ok());
    }

    #[test]
    fn test_chunk_documents_positions() {
        let chunker = Chunker::with_config(config(20, 1, 5)).unwrap();
        let docs = vec![
            SourceDocument::new("a.txt", "y".repeat(30)),
            SourceDocument::new("b.txt", "short text"),
        ];

        let chunks = chunker.chunk_documents(&docs);
        let labels: Vec<(&str, usize)> =
            chunks.iter().map(|c| (c.source(), c.position())).collect();
        assert_eq!(labels, vec![("a.txt", 0), ("a.txt", 1), ("b.txt", 0)]);
    }
}
