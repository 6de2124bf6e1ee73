use std::collections::HashMap;

use super::resolve::ResolvedFrame;
use crate::types::{AnnotatedWord, Channel, Segment, SegmentKey};

/// Group resolved frames into segments under the extension protocol.
///
/// One active segment is tracked per distinct key, plus one last-anonymous
/// segment per channel so a "who is this" run can keep absorbing finalized
/// words across another channel's interjections.
pub(crate) fn collect_segments(frames: Vec<ResolvedFrame>, max_gap_ms: i64) -> Vec<Segment> {
    let mut segments: Vec<Segment> = Vec::new();
    let mut active: HashMap<SegmentKey, usize> = HashMap::new();
    let mut last_anonymous: HashMap<Channel, usize> = HashMap::new();

    for frame in frames {
        let key = SegmentKey {
            channel: frame.word.channel,
            speaker: frame.identity,
        };
        let newest = segments.len().checked_sub(1);

        if let Some(&index) = active.get(&key) {
            if can_extend(&segments[index], &frame.word, Some(index) == newest, max_gap_ms) {
                segments[index].words.push(frame.word);
                if key.is_anonymous() {
                    last_anonymous.insert(key.channel, index);
                }
                continue;
            }
        }

        if frame.word.is_final && key.is_anonymous() {
            if let Some(&index) = last_anonymous.get(&key.channel) {
                if can_extend(&segments[index], &frame.word, Some(index) == newest, max_gap_ms) {
                    segments[index].words.push(frame.word);
                    active.insert(key, index);
                    continue;
                }
            }
        }

        let index = segments.len();
        if key.is_anonymous() {
            last_anonymous.insert(key.channel, index);
        }
        active.insert(key.clone(), index);
        segments.push(Segment {
            key,
            words: vec![frame.word],
        });
    }

    segments
}

/// Whether `word` may be appended to `segment`.
///
/// - The silence gap must stay within `max_gap_ms`.
/// - A segment with an identified speaker only extends while it is the most
///   recently created segment; once anything else opened after it, a later
///   word starts fresh instead of bleeding into the earlier turn.
/// - A provisional word never mutates a non-newest segment that already
///   contains finalized (rendered) words.
pub(crate) fn can_extend(
    segment: &Segment,
    word: &AnnotatedWord,
    is_newest: bool,
    max_gap_ms: i64,
) -> bool {
    let Some(last) = segment.words.last() else {
        return false;
    };

    if word.start_ms - last.end_ms > max_gap_ms {
        return false;
    }

    if !segment.key.is_anonymous() && !is_newest {
        return false;
    }

    if !word.is_final && !is_newest && segment.words.iter().any(|w| w.is_final) {
        return false;
    }

    true
}
