//! Speaker-attributed segment construction.
//!
//! `build_segments` is the diarized transcript pipeline: normalize the word
//! stream, resolve an identity per word, group into segments under the
//! extension protocol, then back-fill identity learned mid-scan onto earlier
//! segments. Every stage is a pure function over the previous stage's output;
//! the whole pipeline is re-run from scratch on each streaming update, so it
//! holds no state between calls.

mod build;
mod propagate;
mod resolve;

use crate::types::{Segment, SpeakerHint, Word};
use crate::words::normalize_words;

use resolve::ChannelPolicy;

/// Knobs for [`build_segments`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SegmentOptions {
    /// Maximum silence between consecutive words of one segment.
    pub max_gap_ms: i64,
    /// Total participant count, when the caller knows it. With exactly two
    /// speakers the remote channel is single-speaker and its identity
    /// propagates like the local microphone's.
    pub num_speakers: Option<u32>,
}

impl Default for SegmentOptions {
    fn default() -> Self {
        Self {
            max_gap_ms: 2000,
            num_speakers: None,
        }
    }
}

/// Build the ordered, speaker-attributed segment list for one transcript
/// snapshot.
///
/// Pure and deterministic: identical inputs yield structurally identical
/// output, and every input word appears in exactly one segment, in
/// non-decreasing `start_ms` order. Degenerate input produces an empty list.
pub fn build_segments(
    final_words: &[Word],
    partial_words: &[Word],
    speaker_hints: &[SpeakerHint],
    options: SegmentOptions,
) -> Vec<Segment> {
    let words = normalize_words(final_words, partial_words);
    if words.is_empty() {
        return Vec::new();
    }

    let policy = ChannelPolicy::new(options.num_speakers);
    let (frames, state) = resolve::resolve_identities(&words, speaker_hints, &policy);
    let segments = build::collect_segments(frames, options.max_gap_ms);
    propagate::propagate_identities(segments, &state, &policy, options.max_gap_ms)
}
