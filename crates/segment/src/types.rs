/// Physical capture channel a word was recognized on.
///
/// This is a closed set: the desktop client only ever captures the local
/// microphone, the remote meeting audio, and (on some platforms) a mixed
/// loopback of both. Wire format is the channel number the recognizer
/// reports; anything outside the known range is rejected at the
/// deserialization boundary, before any of the transforms run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, specta::Type)]
pub enum Channel {
    DirectMic,
    RemoteParty,
    Mixed,
}

impl Channel {
    pub fn index(self) -> i32 {
        match self {
            Self::DirectMic => 0,
            Self::RemoteParty => 1,
            Self::Mixed => 2,
        }
    }

    pub fn from_index(index: i32) -> Option<Self> {
        match index {
            0 => Some(Self::DirectMic),
            1 => Some(Self::RemoteParty),
            2 => Some(Self::Mixed),
            _ => None,
        }
    }
}

impl serde::Serialize for Channel {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_i32(self.index())
    }
}

impl<'de> serde::Deserialize<'de> for Channel {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = i32::deserialize(deserializer)?;
        Self::from_index(raw)
            .ok_or_else(|| serde::de::Error::custom(format!("unknown capture channel {raw}")))
    }
}

/// A recognized word as stored or streamed. `id` is the persisted stable
/// identifier; in-flight partial words do not have one yet.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize, specta::Type)]
pub struct Word {
    #[serde(default)]
    pub id: Option<String>,
    pub text: String,
    pub start_ms: i64,
    pub end_ms: i64,
    pub channel: Channel,
}

/// A word in the normalized sequence: tagged with finality and its position.
///
/// `order` is the word's index in the normalized sequence. Speaker hints
/// address words by this index.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize, specta::Type)]
pub struct AnnotatedWord {
    #[serde(default)]
    pub id: Option<String>,
    pub text: String,
    pub start_ms: i64,
    pub end_ms: i64,
    pub channel: Channel,
    pub is_final: bool,
    pub order: usize,
}

impl AnnotatedWord {
    pub(crate) fn from_word(word: &Word, is_final: bool) -> Self {
        Self {
            id: word.id.clone(),
            text: word.text.clone(),
            start_ms: word.start_ms,
            end_ms: word.end_ms,
            channel: word.channel,
            is_final,
            order: 0,
        }
    }
}

/// What is known about who said a word.
///
/// Kept as a tagged enum rather than two optional fields so every resolution
/// and propagation rule can match on exactly the combinations that exist.
#[derive(Debug, Clone, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize, specta::Type)]
#[serde(rename_all = "snake_case")]
pub enum SpeakerIdentity {
    Anonymous,
    Indexed { speaker_index: i32 },
    Named { human_id: String },
    Known { speaker_index: i32, human_id: String },
}

impl SpeakerIdentity {
    pub fn from_parts(speaker_index: Option<i32>, human_id: Option<String>) -> Self {
        match (speaker_index, human_id) {
            (None, None) => Self::Anonymous,
            (Some(speaker_index), None) => Self::Indexed { speaker_index },
            (None, Some(human_id)) => Self::Named { human_id },
            (Some(speaker_index), Some(human_id)) => Self::Known {
                speaker_index,
                human_id,
            },
        }
    }

    pub fn speaker_index(&self) -> Option<i32> {
        match self {
            Self::Indexed { speaker_index } | Self::Known { speaker_index, .. } => {
                Some(*speaker_index)
            }
            _ => None,
        }
    }

    pub fn human_id(&self) -> Option<&str> {
        match self {
            Self::Named { human_id } | Self::Known { human_id, .. } => Some(human_id),
            _ => None,
        }
    }

    pub fn is_anonymous(&self) -> bool {
        matches!(self, Self::Anonymous)
    }

    /// Fill in a human id, keeping any speaker index already present.
    /// No-op when a human id is already known.
    pub fn with_human_id(self, human_id: String) -> Self {
        match self {
            Self::Anonymous => Self::Named { human_id },
            Self::Indexed { speaker_index } => Self::Known {
                speaker_index,
                human_id,
            },
            other => other,
        }
    }
}

/// Identifies the speaker a segment is attributed to. Two keys are equal iff
/// channel and the full identity match, including absence of identity.
#[derive(Debug, Clone, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize, specta::Type)]
pub struct SegmentKey {
    pub channel: Channel,
    pub speaker: SpeakerIdentity,
}

impl SegmentKey {
    pub fn anonymous(channel: Channel) -> Self {
        Self {
            channel,
            speaker: SpeakerIdentity::Anonymous,
        }
    }

    pub fn is_anonymous(&self) -> bool {
        self.speaker.is_anonymous()
    }
}

/// A contiguous run of words attributed to one speaker identity.
/// Never empty; words are non-decreasing by `start_ms`.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize, specta::Type)]
pub struct Segment {
    pub key: SegmentKey,
    pub words: Vec<AnnotatedWord>,
}

impl Segment {
    pub fn start_ms(&self) -> i64 {
        self.words.first().map_or(0, |w| w.start_ms)
    }

    pub fn end_ms(&self) -> i64 {
        self.words.last().map_or(0, |w| w.end_ms)
    }

    pub fn text(&self) -> String {
        let mut out = String::new();
        for word in &self.words {
            let trimmed = word.text.trim();
            if trimmed.is_empty() {
                continue;
            }
            if !out.is_empty() {
                out.push(' ');
            }
            out.push_str(trimmed);
        }
        out
    }
}

/// A maximal run of consecutive same-channel words in chronological order.
/// The render unit for the simpler, non-diarized transcript views.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize, specta::Type)]
pub struct Turn {
    pub channel: Channel,
    pub words: Vec<AnnotatedWord>,
}

/// A sparse, per-word fact about speaker identity.
///
/// The wire tags match the persisted hint rows
/// (`provider_speaker_index` / `user_speaker_assignment`).
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize, specta::Type)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum HintFact {
    ProviderSpeakerIndex {
        speaker_index: i32,
        #[serde(default)]
        provider: Option<String>,
        #[serde(default)]
        channel: Option<i32>,
    },
    UserSpeakerAssignment { human_id: String },
}

/// A hint attached to one word of the normalized sequence by index.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize, specta::Type)]
pub struct SpeakerHint {
    pub word_index: usize,
    pub fact: HintFact,
}
