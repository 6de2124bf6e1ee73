use std::collections::HashMap;

use crate::types::{AnnotatedWord, Channel, HintFact, SpeakerHint, SpeakerIdentity};

/// Which channels are known in advance to carry exactly one speaker.
///
/// The local microphone always does. The remote channel does too when the
/// caller states the meeting has exactly two participants, since everything
/// on the far side is then one person. The mixed loopback channel never
/// qualifies.
#[derive(Debug, Clone, Copy)]
pub(crate) struct ChannelPolicy {
    num_speakers: Option<u32>,
}

impl ChannelPolicy {
    pub(crate) fn new(num_speakers: Option<u32>) -> Self {
        Self { num_speakers }
    }

    pub(crate) fn is_complete(&self, channel: Channel) -> bool {
        match channel {
            Channel::DirectMic => true,
            Channel::RemoteParty => self.num_speakers == Some(2),
            Channel::Mixed => false,
        }
    }
}

/// One word of the normalized sequence with its resolved identity.
#[derive(Debug, Clone)]
pub(crate) struct ResolvedFrame {
    pub(crate) word: AnnotatedWord,
    pub(crate) identity: SpeakerIdentity,
}

/// Identity facts learned while scanning. Local to one pipeline invocation.
#[derive(Debug, Default)]
pub(crate) struct ResolutionState {
    /// speaker_index -> human_id, learned whenever both were seen together.
    pub(crate) bindings: HashMap<i32, String>,
    /// channel -> human_id, recorded for complete channels only.
    pub(crate) channel_humans: HashMap<Channel, String>,
    /// channel -> identity of the last trustworthy word on that channel.
    last_seen: HashMap<Channel, SpeakerIdentity>,
}

/// Resolve an identity for every word in one linear scan.
///
/// Rules apply in strict priority order, each only filling fields that are
/// still unset: explicit hints, learned index bindings, the complete-channel
/// human, and (for provisional words only) carry-forward of the channel's
/// last identity. The returned state feeds the propagation pass.
pub(crate) fn resolve_identities(
    words: &[AnnotatedWord],
    hints: &[SpeakerHint],
    policy: &ChannelPolicy,
) -> (Vec<ResolvedFrame>, ResolutionState) {
    let mut hints_by_index: HashMap<usize, Vec<&HintFact>> = HashMap::new();
    for hint in hints {
        hints_by_index
            .entry(hint.word_index)
            .or_default()
            .push(&hint.fact);
    }

    let mut state = ResolutionState::default();
    let mut frames = Vec::with_capacity(words.len());

    for (index, word) in words.iter().enumerate() {
        let mut speaker_index: Option<i32> = None;
        let mut human_id: Option<String> = None;

        let word_hints = hints_by_index.get(&index);
        let hinted = word_hints.is_some();

        if let Some(facts) = word_hints {
            for fact in facts {
                match fact {
                    HintFact::ProviderSpeakerIndex {
                        speaker_index: provider_index,
                        ..
                    } => {
                        speaker_index.get_or_insert(*provider_index);
                    }
                    HintFact::UserSpeakerAssignment { human_id: id } => {
                        if human_id.is_none() {
                            human_id = Some(id.clone());
                        }
                    }
                }
            }
        }

        if human_id.is_none() {
            if let Some(speaker_index) = speaker_index {
                human_id = state.bindings.get(&speaker_index).cloned();
            }
        }

        if human_id.is_none() && policy.is_complete(word.channel) {
            human_id = state.channel_humans.get(&word.channel).cloned();
        }

        if !word.is_final && (speaker_index.is_none() || human_id.is_none()) {
            if let Some(last) = state.last_seen.get(&word.channel) {
                if speaker_index.is_none() {
                    speaker_index = last.speaker_index();
                }
                if human_id.is_none() {
                    human_id = last.human_id().map(str::to_owned);
                }
            }
        }

        let identity = SpeakerIdentity::from_parts(speaker_index, human_id);

        if let SpeakerIdentity::Known {
            speaker_index,
            human_id,
        } = &identity
        {
            state.bindings.insert(*speaker_index, human_id.clone());
        }

        if policy.is_complete(word.channel) {
            if let SpeakerIdentity::Named { human_id } = &identity {
                state.channel_humans.insert(word.channel, human_id.clone());
            }
        }

        // A final, unhinted word whose identity came purely from inference
        // must not be carried forward onto later provisional words.
        if !word.is_final || identity.speaker_index().is_some() || hinted {
            state.last_seen.insert(word.channel, identity.clone());
        }

        frames.push(ResolvedFrame {
            word: word.clone(),
            identity,
        });
    }

    (frames, state)
}
