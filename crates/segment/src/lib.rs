pub mod chunk;
pub mod hints;
pub mod pipeline;
pub mod types;
pub mod words;

pub use chunk::{ChunkOptions, split_into_segments};
pub use hints::{StoredSpeakerHint, runtime_hints_from_storage};
pub use pipeline::{SegmentOptions, build_segments};
pub use types::{
    AnnotatedWord, Channel, HintFact, Segment, SegmentKey, SpeakerHint, SpeakerIdentity, Turn,
    Word,
};
pub use words::{group_into_turns, merge_words_by_channel, normalize_words};
