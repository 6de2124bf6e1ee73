use super::build::can_extend;
use super::resolve::{ChannelPolicy, ResolutionState};
use crate::types::{Segment, SpeakerIdentity};

/// Back-fill identity learned partway through the scan onto earlier segments,
/// then coalesce the duplicate-key neighbours that re-keying produces.
///
/// Two back-fills apply, in order:
///
/// 1. A key carrying a speaker index without a human takes the binding the
///    scan eventually learned for that index.
/// 2. On a complete channel, a key still lacking a human takes the channel's
///    resolved human. A complete channel is single-speaker for its entire
///    duration, so identity learned late is valid for everything said
///    earlier on it.
///
/// Re-keying can leave consecutive segments with an identical, identified
/// key: one turn split only because the name arrived mid-run. Those merge
/// back together, under the same extension predicate the builder uses.
pub(crate) fn propagate_identities(
    mut segments: Vec<Segment>,
    state: &ResolutionState,
    policy: &ChannelPolicy,
    max_gap_ms: i64,
) -> Vec<Segment> {
    for segment in &mut segments {
        if let SpeakerIdentity::Indexed { speaker_index } = segment.key.speaker {
            if let Some(human_id) = state.bindings.get(&speaker_index) {
                segment.key.speaker = SpeakerIdentity::Known {
                    speaker_index,
                    human_id: human_id.clone(),
                };
            }
        }

        if segment.key.speaker.human_id().is_none() && policy.is_complete(segment.key.channel) {
            if let Some(human_id) = state.channel_humans.get(&segment.key.channel) {
                segment.key.speaker = segment
                    .key
                    .speaker
                    .clone()
                    .with_human_id(human_id.clone());
            }
        }
    }

    let mut merged: Vec<Segment> = Vec::with_capacity(segments.len());

    for segment in segments {
        if let Some(previous) = merged.last_mut() {
            if previous.key == segment.key
                && !segment.key.is_anonymous()
                && can_extend(previous, &segment.words[0], true, max_gap_ms)
            {
                previous.words.extend(segment.words);
                continue;
            }
        }
        merged.push(segment);
    }

    merged
}
