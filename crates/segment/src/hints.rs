use std::collections::HashMap;

use crate::types::{HintFact, SpeakerHint};

/// A speaker hint as persisted: the word it attaches to by id, a kind tag,
/// and a kind-specific JSON payload.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize, specta::Type)]
pub struct StoredSpeakerHint {
    pub word_id: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub value: serde_json::Value,
}

/// Expand persisted hint rows into per-word-index runtime hints.
///
/// `word_index_by_id` maps persisted word ids to positions in the normalized
/// word sequence the hints will be applied to. Rows that reference an unknown
/// word id, carry an unknown kind, or fail to parse are dropped silently:
/// stale hints (e.g. for words deleted by a retranscription) are expected and
/// must not poison the rest.
pub fn runtime_hints_from_storage(
    stored: &[StoredSpeakerHint],
    word_index_by_id: &HashMap<String, usize>,
) -> Vec<SpeakerHint> {
    let mut hints = Vec::with_capacity(stored.len());

    for row in stored {
        let Some(&word_index) = word_index_by_id.get(&row.word_id) else {
            tracing::debug!(word_id = %row.word_id, "dropping speaker hint for unknown word");
            continue;
        };

        let serde_json::Value::Object(mut payload) = row.value.clone() else {
            tracing::debug!(kind = %row.kind, "dropping speaker hint with non-object payload");
            continue;
        };
        payload.insert(
            "type".to_string(),
            serde_json::Value::String(row.kind.clone()),
        );

        match serde_json::from_value::<HintFact>(serde_json::Value::Object(payload)) {
            Ok(fact) => hints.push(SpeakerHint { word_index, fact }),
            Err(error) => {
                tracing::debug!(kind = %row.kind, %error, "dropping malformed speaker hint");
            }
        }
    }

    hints
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn stored(word_id: &str, kind: &str, value: serde_json::Value) -> StoredSpeakerHint {
        StoredSpeakerHint {
            word_id: word_id.to_string(),
            kind: kind.to_string(),
            value,
        }
    }

    fn index_map(ids: &[&str]) -> HashMap<String, usize> {
        ids.iter()
            .enumerate()
            .map(|(index, id)| (id.to_string(), index))
            .collect()
    }

    #[test]
    fn expands_rows_into_runtime_hints_by_word_index() {
        let rows = [
            stored(
                "word-a",
                "provider_speaker_index",
                json!({"speaker_index": 2}),
            ),
            stored(
                "word-b",
                "user_speaker_assignment",
                json!({"human_id": "alice"}),
            ),
        ];

        let hints = runtime_hints_from_storage(&rows, &index_map(&["word-a", "word-b"]));

        assert_eq!(
            hints,
            [
                SpeakerHint {
                    word_index: 0,
                    fact: HintFact::ProviderSpeakerIndex {
                        speaker_index: 2,
                        provider: None,
                        channel: None,
                    },
                },
                SpeakerHint {
                    word_index: 1,
                    fact: HintFact::UserSpeakerAssignment {
                        human_id: "alice".into(),
                    },
                },
            ]
        );
    }

    #[test]
    fn keeps_provider_metadata_when_present() {
        let rows = [stored(
            "word-a",
            "provider_speaker_index",
            json!({"speaker_index": 0, "provider": "deepgram", "channel": 1}),
        )];

        let hints = runtime_hints_from_storage(&rows, &index_map(&["word-a"]));

        assert_eq!(
            hints[0].fact,
            HintFact::ProviderSpeakerIndex {
                speaker_index: 0,
                provider: Some("deepgram".into()),
                channel: Some(1),
            }
        );
    }

    #[test]
    fn drops_rows_for_unknown_word_ids() {
        let rows = [stored(
            "gone",
            "user_speaker_assignment",
            json!({"human_id": "alice"}),
        )];

        let hints = runtime_hints_from_storage(&rows, &index_map(&["word-a"]));

        assert!(hints.is_empty());
    }

    #[test]
    fn drops_rows_with_unknown_kind_or_malformed_payload() {
        let word_ids = index_map(&["word-a"]);

        let unknown_kind = [stored("word-a", "seat_assignment", json!({"seat": 4}))];
        assert!(runtime_hints_from_storage(&unknown_kind, &word_ids).is_empty());

        let missing_field = [stored("word-a", "user_speaker_assignment", json!({}))];
        assert!(runtime_hints_from_storage(&missing_field, &word_ids).is_empty());

        let not_an_object = [stored("word-a", "user_speaker_assignment", json!("alice"))];
        assert!(runtime_hints_from_storage(&not_an_object, &word_ids).is_empty());
    }

    #[test]
    fn surviving_rows_keep_their_order() {
        let rows = [
            stored(
                "word-b",
                "user_speaker_assignment",
                json!({"human_id": "bob"}),
            ),
            stored("gone", "user_speaker_assignment", json!({"human_id": "x"})),
            stored(
                "word-a",
                "user_speaker_assignment",
                json!({"human_id": "alice"}),
            ),
        ];

        let hints = runtime_hints_from_storage(&rows, &index_map(&["word-a", "word-b"]));

        assert_eq!(
            hints.iter().map(|h| h.word_index).collect::<Vec<_>>(),
            [1, 0]
        );
    }
}
