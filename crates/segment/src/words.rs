use std::collections::{BTreeMap, HashMap};

use crate::types::{AnnotatedWord, Channel, Turn, Word};

/// Merge finalized and in-flight partial words into one normalized sequence.
///
/// The sort is stable and finals are concatenated before partials, so a final
/// word always precedes a partial word with the same `start_ms`. No filtering
/// and no deduplication happen here; callers must not submit the same word
/// as both final and partial.
pub fn normalize_words(final_words: &[Word], partial_words: &[Word]) -> Vec<AnnotatedWord> {
    let mut words: Vec<AnnotatedWord> = final_words
        .iter()
        .map(|w| AnnotatedWord::from_word(w, true))
        .chain(
            partial_words
                .iter()
                .map(|w| AnnotatedWord::from_word(w, false)),
        )
        .collect();

    words.sort_by_key(|w| w.start_ms);

    for (order, word) in words.iter_mut().enumerate() {
        word.order = order;
    }

    words
}

/// Group final and partial words per physical capture channel.
///
/// Final words arrive keyed by their persisted id; partial words arrive keyed
/// by the recognizer's channel *slot*. The grouping key is always the word's
/// own `channel` field, never the partial map's key: slot numbering is not
/// stable when the recognizer reassigns slots mid-stream.
///
/// Within each bucket, words are sorted by `start_ms`; finals precede
/// partials at equal timestamps.
pub fn merge_words_by_channel(
    final_words: &HashMap<String, Word>,
    partial_words: &HashMap<i32, Vec<Word>>,
) -> BTreeMap<Channel, Vec<AnnotatedWord>> {
    let mut by_channel: BTreeMap<Channel, Vec<AnnotatedWord>> = BTreeMap::new();

    for (id, word) in final_words {
        let mut annotated = AnnotatedWord::from_word(word, true);
        annotated.id = Some(id.clone());
        by_channel.entry(word.channel).or_default().push(annotated);
    }

    for words in partial_words.values() {
        for word in words {
            by_channel
                .entry(word.channel)
                .or_default()
                .push(AnnotatedWord::from_word(word, false));
        }
    }

    for words in by_channel.values_mut() {
        words.sort_by_key(|w| (w.start_ms, !w.is_final));
        for (order, word) in words.iter_mut().enumerate() {
            word.order = order;
        }
    }

    by_channel
}

/// Interleave per-channel word lists into chronological speaker turns.
///
/// Consecutive words from the same channel fold into one [`Turn`]; a word
/// from any other channel closes the current turn. Ties on `start_ms` go to
/// the lower-numbered channel.
pub fn group_into_turns(words_by_channel: &BTreeMap<Channel, Vec<AnnotatedWord>>) -> Vec<Turn> {
    let mut cursors: BTreeMap<Channel, usize> = BTreeMap::new();
    let mut turns: Vec<Turn> = Vec::new();

    loop {
        let mut next: Option<(i64, Channel)> = None;
        for (&channel, words) in words_by_channel {
            let cursor = cursors.get(&channel).copied().unwrap_or(0);
            if let Some(word) = words.get(cursor) {
                let candidate = (word.start_ms, channel);
                if next.is_none_or(|current| candidate < current) {
                    next = Some(candidate);
                }
            }
        }

        let Some((_, channel)) = next else {
            break;
        };

        let cursor = cursors.entry(channel).or_insert(0);
        let word = words_by_channel[&channel][*cursor].clone();
        *cursor += 1;

        match turns.last_mut() {
            Some(turn) if turn.channel == channel => turn.words.push(word),
            _ => turns.push(Turn {
                channel,
                words: vec![word],
            }),
        }
    }

    turns
}

#[cfg(test)]
mod tests {
    use super::*;

    fn word(text: &str, start_ms: i64, end_ms: i64, channel: Channel) -> Word {
        Word {
            id: None,
            text: text.to_string(),
            start_ms,
            end_ms,
            channel,
        }
    }

    fn annotated(
        text: &str,
        start_ms: i64,
        end_ms: i64,
        channel: Channel,
        is_final: bool,
    ) -> AnnotatedWord {
        AnnotatedWord::from_word(&word(text, start_ms, end_ms, channel), is_final)
    }

    fn texts(words: &[AnnotatedWord]) -> Vec<&str> {
        words.iter().map(|w| w.text.as_str()).collect()
    }

    #[test]
    fn normalize_sorts_by_start_and_tags_finality() {
        let finals = vec![
            word("third", 600, 700, Channel::DirectMic),
            word("first", 0, 100, Channel::DirectMic),
        ];
        let partials = vec![word("second", 200, 300, Channel::RemoteParty)];

        let normalized = normalize_words(&finals, &partials);

        assert_eq!(texts(&normalized), ["first", "second", "third"]);
        assert_eq!(
            normalized.iter().map(|w| w.is_final).collect::<Vec<_>>(),
            [true, false, true]
        );
        assert_eq!(
            normalized.iter().map(|w| w.order).collect::<Vec<_>>(),
            [0, 1, 2]
        );
    }

    #[test]
    fn normalize_orders_finals_before_partials_at_equal_start() {
        let finals = vec![word("confirmed", 100, 200, Channel::DirectMic)];
        let partials = vec![word("tentative", 100, 180, Channel::DirectMic)];

        let normalized = normalize_words(&finals, &partials);

        assert_eq!(texts(&normalized), ["confirmed", "tentative"]);
        assert!(normalized[0].is_final);
        assert!(!normalized[1].is_final);
    }

    #[test]
    fn normalize_handles_empty_inputs() {
        assert!(normalize_words(&[], &[]).is_empty());
    }

    #[test]
    fn merge_uses_word_channel_not_partial_slot_key() {
        // both words claim DirectMic even though they arrived on slot 1
        let partials = HashMap::from([(
            1,
            vec![
                word("first", 0, 100, Channel::DirectMic),
                word("second", 200, 300, Channel::DirectMic),
            ],
        )]);

        let merged = merge_words_by_channel(&HashMap::new(), &partials);

        assert_eq!(merged.len(), 1);
        assert_eq!(merged[&Channel::DirectMic].len(), 2);
    }

    #[test]
    fn merge_combines_finals_and_partials_per_channel() {
        let finals = HashMap::from([
            (
                "word-1".to_string(),
                word("final0", 0, 100, Channel::DirectMic),
            ),
            (
                "word-2".to_string(),
                word("final1", 0, 100, Channel::RemoteParty),
            ),
        ]);
        let partials = HashMap::from([
            (0, vec![word("partial0", 200, 300, Channel::DirectMic)]),
            (1, vec![word("partial1", 200, 300, Channel::RemoteParty)]),
        ]);

        let merged = merge_words_by_channel(&finals, &partials);

        assert_eq!(merged.len(), 2);
        assert_eq!(merged[&Channel::DirectMic].len(), 2);
        assert_eq!(merged[&Channel::RemoteParty].len(), 2);
    }

    #[test]
    fn merge_sorts_by_start_and_marks_finality() {
        let finals = HashMap::from([
            (
                "word-1".to_string(),
                word("third", 600, 700, Channel::DirectMic),
            ),
            (
                "word-2".to_string(),
                word("first", 0, 100, Channel::DirectMic),
            ),
        ]);
        let partials = HashMap::from([(
            0,
            vec![
                word("fourth", 800, 900, Channel::DirectMic),
                word("second", 200, 300, Channel::DirectMic),
            ],
        )]);

        let merged = merge_words_by_channel(&finals, &partials);
        let bucket = &merged[&Channel::DirectMic];

        assert_eq!(texts(bucket), ["first", "second", "third", "fourth"]);
        assert!(bucket[0].is_final);
        assert!(!bucket[1].is_final);
        assert!(bucket[2].is_final);
        assert!(!bucket[3].is_final);
    }

    #[test]
    fn merge_assigns_persisted_ids_from_map_keys() {
        let finals = HashMap::from([(
            "word-1".to_string(),
            word("only", 0, 100, Channel::DirectMic),
        )]);

        let merged = merge_words_by_channel(&finals, &HashMap::new());

        assert_eq!(
            merged[&Channel::DirectMic][0].id.as_deref(),
            Some("word-1")
        );
    }

    #[test]
    fn merge_handles_empty_inputs() {
        let merged = merge_words_by_channel(&HashMap::new(), &HashMap::new());
        assert!(merged.is_empty());
    }

    #[test]
    fn merge_handles_only_partial_words() {
        let partials = HashMap::from([(0, vec![word("only", 0, 100, Channel::DirectMic)])]);

        let merged = merge_words_by_channel(&HashMap::new(), &partials);

        assert_eq!(merged[&Channel::DirectMic].len(), 1);
        assert!(!merged[&Channel::DirectMic][0].is_final);
    }

    #[test]
    fn turns_group_words_chronologically() {
        let by_channel = BTreeMap::from([
            (
                Channel::DirectMic,
                vec![
                    annotated("first", 0, 100, Channel::DirectMic, true),
                    annotated("word", 100, 200, Channel::DirectMic, true),
                    annotated("third", 400, 500, Channel::DirectMic, true),
                ],
            ),
            (
                Channel::RemoteParty,
                vec![annotated("second", 200, 300, Channel::RemoteParty, true)],
            ),
        ]);

        let turns = group_into_turns(&by_channel);

        assert_eq!(turns.len(), 3);
        assert_eq!(turns[0].channel, Channel::DirectMic);
        assert_eq!(texts(&turns[0].words), ["first", "word"]);
        assert_eq!(turns[1].channel, Channel::RemoteParty);
        assert_eq!(texts(&turns[1].words), ["second"]);
        assert_eq!(turns[2].channel, Channel::DirectMic);
        assert_eq!(texts(&turns[2].words), ["third"]);
    }

    #[test]
    fn turns_alternate_between_channels() {
        let by_channel = BTreeMap::from([
            (
                Channel::DirectMic,
                vec![
                    annotated("hello", 0, 100, Channel::DirectMic, true),
                    annotated("how", 300, 400, Channel::DirectMic, true),
                ],
            ),
            (
                Channel::RemoteParty,
                vec![
                    annotated("hi", 100, 200, Channel::RemoteParty, true),
                    annotated("good", 400, 500, Channel::RemoteParty, true),
                ],
            ),
        ]);

        let turns = group_into_turns(&by_channel);

        assert_eq!(
            turns.iter().map(|t| t.channel).collect::<Vec<_>>(),
            [
                Channel::DirectMic,
                Channel::RemoteParty,
                Channel::DirectMic,
                Channel::RemoteParty
            ]
        );
    }

    #[test]
    fn turns_merge_consecutive_words_from_same_channel() {
        let by_channel = BTreeMap::from([(
            Channel::DirectMic,
            vec![
                annotated("one", 0, 100, Channel::DirectMic, true),
                annotated("two", 100, 200, Channel::DirectMic, true),
                annotated("three", 200, 300, Channel::DirectMic, true),
            ],
        )]);

        let turns = group_into_turns(&by_channel);

        assert_eq!(turns.len(), 1);
        assert_eq!(turns[0].words.len(), 3);
    }

    #[test]
    fn turns_handle_empty_map() {
        assert!(group_into_turns(&BTreeMap::new()).is_empty());
    }

    #[test]
    fn turns_preserve_finality() {
        let by_channel = BTreeMap::from([(
            Channel::DirectMic,
            vec![
                annotated("final", 0, 100, Channel::DirectMic, true),
                annotated("partial", 100, 200, Channel::DirectMic, false),
            ],
        )]);

        let turns = group_into_turns(&by_channel);

        assert!(turns[0].words[0].is_final);
        assert!(!turns[0].words[1].is_final);
    }
}
