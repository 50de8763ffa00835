//! Word-bounded chunking and multi-chunk digest reassembly.
//!
//! Long inputs are split into chunks the summarization model can accept,
//! each chunk is summarized independently, and the partial summaries are
//! joined back together in chunk order.

use anyhow::Result;

/// Split `text` into consecutive groups of at most `max_words`
/// whitespace-separated words, each re-joined with single spaces.
///
/// The split is lossless and order-preserving: concatenating the words of
/// every chunk reproduces the whitespace-normalized word sequence of the
/// input. Empty or whitespace-only input yields no chunks.
pub fn chunk_words(text: &str, max_words: usize) -> Vec<String> {
    let max_words = max_words.max(1);
    let words: Vec<&str> = text.split_whitespace().collect();

    words
        .chunks(max_words)
        .map(|group| group.join(" "))
        .collect()
}

pub fn word_count(text: &str) -> usize {
    text.split_whitespace().count()
}

/// Summarization failed partway through a chunk sequence. Carries the
/// 0-based index of the failing chunk; the partial result is discarded.
#[derive(Debug, thiserror::Error)]
#[error("summarization failed on chunk {index} of {total}")]
pub struct ChunkFailure {
    pub index: usize,
    pub total: usize,
    #[source]
    pub source: anyhow::Error,
}

/// Summarize `chunks` one at a time, in order, through `summarize_one`,
/// and join the partial summaries with single spaces.
///
/// The fold is strictly sequential — the final join is order-sensitive,
/// so chunks are never summarized concurrently even though the model
/// calls could overlap. After each chunk completes, `on_progress`
/// receives the fraction of chunks finished so far (ending at 1.0).
/// The first failure aborts the whole run.
pub async fn summarize_chunks(
    chunks: &[String],
    mut summarize_one: impl AsyncFnMut(&str) -> Result<String>,
    mut on_progress: impl FnMut(f64),
) -> Result<String, ChunkFailure> {
    let total = chunks.len();
    let mut parts = Vec::with_capacity(total);

    for (index, chunk) in chunks.iter().enumerate() {
        let part = summarize_one(chunk).await.map_err(|source| ChunkFailure {
            index,
            total,
            source,
        })?;
        parts.push(part);
        on_progress((index + 1) as f64 / total as f64);
    }

    Ok(parts.join(" "))
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;
    use std::time::Duration;

    use super::*;

    fn words_of(chunks: &[String]) -> Vec<String> {
        chunks
            .iter()
            .flat_map(|c| c.split_whitespace().map(|w| w.to_string()))
            .collect()
    }

    #[test]
    fn test_split_is_lossless() {
        let text = "  alpha\tbeta \n gamma  delta epsilon\nzeta ";
        let chunks = chunk_words(text, 2);

        let expected: Vec<String> = text.split_whitespace().map(|w| w.to_string()).collect();
        assert_eq!(words_of(&chunks), expected);
    }

    #[test]
    fn test_split_bounds_chunk_size() {
        let text = (0..97).map(|i| format!("w{i}")).collect::<Vec<_>>().join(" ");
        for chunk in chunk_words(&text, 30) {
            assert!(chunk.split_whitespace().count() <= 30);
        }
    }

    #[test]
    fn test_split_empty_input() {
        assert!(chunk_words("", 10).is_empty());
        assert!(chunk_words("   \n\t ", 10).is_empty());
    }

    #[test]
    fn test_split_chunk_count_is_ceiling() {
        let text = (0..620).map(|i| format!("w{i}")).collect::<Vec<_>>().join(" ");
        let chunks = chunk_words(&text, 300);

        let sizes: Vec<usize> = chunks.iter().map(|c| c.split_whitespace().count()).collect();
        assert_eq!(sizes, vec![300, 300, 20]);
    }

    #[test]
    fn test_split_short_input_normalizes_whitespace() {
        let chunks = chunk_words("  hello   world \n", 30);
        assert_eq!(chunks, vec!["hello world".to_string()]);
    }

    #[test]
    fn test_split_zero_bound_is_clamped() {
        let chunks = chunk_words("a b c", 0);
        assert_eq!(chunks.len(), 3);
    }

    #[tokio::test]
    async fn test_reassembly_preserves_chunk_order() {
        let chunks = vec!["one".to_string(), "two".to_string(), "three".to_string()];
        // Uneven per-chunk latency must not reorder the join.
        let delays_ms = [30u64, 5, 15];

        let calls = Cell::new(0usize);
        let joined = summarize_chunks(
            &chunks,
            async |_chunk| {
                let i = calls.get();
                calls.set(i + 1);
                tokio::time::sleep(Duration::from_millis(delays_ms[i])).await;
                anyhow::Ok(format!("S{i}"))
            },
            |_| {},
        )
        .await
        .unwrap();

        assert_eq!(joined, "S0 S1 S2");
    }

    #[tokio::test]
    async fn test_progress_is_monotonic_and_ends_at_one() {
        let chunks: Vec<String> = (0..4).map(|i| format!("chunk{i}")).collect();

        let mut fractions = Vec::new();
        summarize_chunks(
            &chunks,
            async |chunk| anyhow::Ok(chunk.to_string()),
            |fraction| fractions.push(fraction),
        )
        .await
        .unwrap();

        assert_eq!(fractions.len(), chunks.len());
        for pair in fractions.windows(2) {
            assert!(pair[0] < pair[1]);
        }
        assert_eq!(*fractions.last().unwrap(), 1.0);
    }

    #[tokio::test]
    async fn test_failure_carries_chunk_index() {
        let chunks = vec!["one".to_string(), "two".to_string(), "three".to_string()];

        let mut fractions = Vec::new();
        let err = summarize_chunks(
            &chunks,
            async |chunk| {
                if chunk == "two" {
                    Err(anyhow::anyhow!("model unavailable"))
                } else {
                    Ok(chunk.to_uppercase())
                }
            },
            |fraction| fractions.push(fraction),
        )
        .await
        .unwrap_err();

        assert_eq!(err.index, 1);
        assert_eq!(err.total, 3);
        assert!(err.to_string().contains("chunk 1"));
        // Only the first chunk completed before the abort.
        assert_eq!(fractions.len(), 1);
    }

    #[tokio::test]
    async fn test_empty_chunks_yield_empty_digest() {
        let mut fractions = Vec::new();
        let joined = summarize_chunks(
            &[],
            async |chunk: &str| anyhow::Ok(chunk.to_string()),
            |fraction| fractions.push(fraction),
        )
        .await
        .unwrap();

        assert_eq!(joined, "");
        assert!(fractions.is_empty());
    }

    #[tokio::test]
    async fn test_example_end_to_end_shape() {
        let text = (0..620).map(|i| format!("w{i}")).collect::<Vec<_>>().join(" ");
        let chunks = chunk_words(&text, 300);
        assert_eq!(chunks.len(), 3);

        let calls = Cell::new(0usize);
        let digest = summarize_chunks(
            &chunks,
            async |_chunk| {
                let i = calls.get();
                calls.set(i + 1);
                anyhow::Ok(format!("part{i}"))
            },
            |_| {},
        )
        .await
        .unwrap();

        assert_eq!(digest, "part0 part1 part2");
    }
}
