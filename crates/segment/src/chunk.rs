use crate::types::AnnotatedWord;

/// Knobs for [`split_into_segments`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChunkOptions {
    /// Upper bound on the word count of one chunk.
    pub max_words_per_segment: usize,
    /// Silence gap that forces a chunk boundary regardless of size.
    pub min_gap_ms: i64,
}

impl Default for ChunkOptions {
    fn default() -> Self {
        Self {
            max_words_per_segment: 20,
            min_gap_ms: 2000,
        }
    }
}

/// Weight of a sentence-ending word relative to timing gaps. Gap scores are
/// normalized below 1.0 (a gap at `min_gap_ms` would already be a hard
/// split), so a sentence boundary always outranks any soft gap.
const SENTENCE_END_WEIGHT: f64 = 2.0;

/// Split one ordered word list into display-sized chunks.
///
/// Every chunk is non-empty and at most `max_words_per_segment` words; the
/// chunks cover the input exactly once, in order. A silence gap above
/// `min_gap_ms` always produces a boundary. Oversized stretches between hard
/// boundaries are cut at the best-scoring soft boundary within each window
/// (sentence-ending words beat timing gaps, larger gaps beat smaller, ties
/// go to the latest candidate), or exactly at the size limit when no
/// candidate scores at all.
pub fn split_into_segments(
    words: &[AnnotatedWord],
    options: ChunkOptions,
) -> Vec<Vec<AnnotatedWord>> {
    if words.is_empty() {
        return Vec::new();
    }

    let max_words = options.max_words_per_segment.max(1);
    let mut chunks = Vec::new();

    for block in hard_blocks(words, options.min_gap_ms) {
        let mut rest = block;
        while rest.len() > max_words {
            let split = best_boundary(rest, max_words, options.min_gap_ms);
            let (head, tail) = rest.split_at(split);
            chunks.push(head.to_vec());
            rest = tail;
        }
        chunks.push(rest.to_vec());
    }

    chunks
}

/// Split at every silence gap above `min_gap_ms`.
fn hard_blocks(words: &[AnnotatedWord], min_gap_ms: i64) -> Vec<&[AnnotatedWord]> {
    let mut blocks = Vec::new();
    let mut block_start = 0;

    for i in 1..words.len() {
        if words[i].start_ms - words[i - 1].end_ms > min_gap_ms {
            blocks.push(&words[block_start..i]);
            block_start = i;
        }
    }

    blocks.push(&words[block_start..]);
    blocks
}

/// Pick the split index (1..=max_words) for an oversized block.
fn best_boundary(words: &[AnnotatedWord], max_words: usize, min_gap_ms: i64) -> usize {
    let gap_scale = min_gap_ms.max(1) as f64;
    let mut best: Option<(f64, usize)> = None;

    for i in 0..max_words {
        let gap = (words[i + 1].start_ms - words[i].end_ms).max(0);
        let mut score = gap as f64 / gap_scale;
        if ends_sentence(&words[i].text) {
            score += SENTENCE_END_WEIGHT;
        }

        if score > 0.0 && best.is_none_or(|(top, _)| score >= top) {
            best = Some((score, i + 1));
        }
    }

    best.map_or(max_words, |(_, split)| split)
}

fn ends_sentence(text: &str) -> bool {
    matches!(text.trim_end().chars().last(), Some('.' | '!' | '?'))
}
