use super::*;
use crate::error::ProsodyError;
use crate::types::WordInterval;

fn interval_block(idx: usize, xmin: &str, xmax: &str, text: &str) -> String {
    format!(
        "        intervals [{idx}]:\n            xmin = {xmin}\n            xmax = {xmax}\n            text = \"{text}\"\n"
    )
}

/// Long-form TextGrid with a `phones` tier before `words` and a `syllables`
/// tier after it, so tier scoping can be checked in both directions.
fn sample_textgrid() -> String {
    let mut out = String::from(
        "File type = \"ooTextFile\"\nObject class = \"TextGrid\"\n\nxmin = 0\nxmax = 1.2\ntiers? <exists>\nsize = 3\nitem []:\n",
    );
    out.push_str("    item [1]:\n        class = \"IntervalTier\"\n        name = \"phones\"\n        xmin = 0\n        xmax = 1.2\n        intervals: size = 2\n");
    out.push_str(&interval_block(1, "0", "0.1", "HH"));
    out.push_str(&interval_block(2, "0.1", "1.2", "AH"));
    out.push_str("    item [2]:\n        class = \"IntervalTier\"\n        name = \"words\"\n        xmin = 0\n        xmax = 1.2\n        intervals: size = 4\n");
    out.push_str(&interval_block(1, "0.0", "0.3", "hello"));
    out.push_str(&interval_block(2, "0.3", "0.5", "#"));
    out.push_str(&interval_block(3, "0.5", "1.0", "world"));
    out.push_str(&interval_block(4, "1.0", "1.2", ""));
    out.push_str("    item [3]:\n        class = \"IntervalTier\"\n        name = \"syllables\"\n        xmin = 0\n        xmax = 1.2\n        intervals: size = 1\n");
    out.push_str(&interval_block(1, "0", "1.2", "leaked"));
    out
}

fn word(text: &str, start: f64, end: f64) -> WordInterval {
    WordInterval {
        word: text.to_string(),
        start_time: start,
        end_time: end,
    }
}

#[test]
fn parse_document_reads_every_tier() {
    let document = parse_document(&sample_textgrid()).expect("parse");
    assert_eq!(document.xmin, 0.0);
    assert_eq!(document.xmax, 1.2);
    assert_eq!(
        document.tier_names().collect::<Vec<_>>(),
        vec!["phones", "words", "syllables"]
    );
    let words = document.interval_tier("words").expect("words tier");
    assert_eq!(words.intervals.len(), 4);
    assert_eq!(words.intervals[1].text, "#");
}

#[test]
fn word_intervals_skip_silence_and_other_tiers() {
    let words = parse_word_intervals(&sample_textgrid()).expect("parse");
    assert_eq!(
        words,
        vec![word("hello", 0.0, 0.3), word("world", 0.5, 1.0)]
    );
    assert!(words.iter().all(|w| w.start_time < w.end_time));
}

#[test]
fn whitespace_only_and_exact_sentinel_are_silence() {
    let mut text = String::from("xmin = 0\nxmax = 1\ntiers? <exists>\nsize = 1\nitem []:\n");
    text.push_str("    item [1]:\n        class = \"IntervalTier\"\n        name = \"words\"\n        xmin = 0\n        xmax = 1\n        intervals: size = 4\n");
    text.push_str(&interval_block(1, "0", "0.2", "   "));
    text.push_str(&interval_block(2, "0.2", "0.4", " # "));
    text.push_str(&interval_block(3, "0.4", "0.6", "#"));
    text.push_str(&interval_block(4, "0.6", "1", " ok"));
    let words = parse_word_intervals(&text).expect("parse");
    assert_eq!(
        words,
        vec![word(" # ", 0.2, 0.4), word(" ok", 0.6, 1.0)]
    );
}

#[test]
fn missing_words_tier_is_reported() {
    let text = sample_textgrid().replace("name = \"words\"", "name = \"tokens\"");
    let err = parse_word_intervals(&text).unwrap_err();
    assert!(matches!(err, ProsodyError::NoWordsTier));
}

#[test]
fn words_point_tier_is_not_a_words_tier() {
    let text = "xmin = 0\nxmax = 1\ntiers? <exists>\nsize = 1\nitem []:\n    item [1]:\n        class = \"TextTier\"\n        name = \"words\"\n        xmin = 0\n        xmax = 1\n        points: size = 1\n        points [1]:\n            number = 0.5\n            mark = \"hi\"\n";
    let err = parse_word_intervals(text).unwrap_err();
    assert!(matches!(err, ProsodyError::NoWordsTier));
}

#[test]
fn document_without_tiers_has_no_words_tier() {
    let err = parse_word_intervals("xmin = 0\nxmax = 1\ntiers? <absent>\n").unwrap_err();
    assert!(matches!(err, ProsodyError::NoWordsTier));
}

#[test]
fn non_numeric_time_is_invalid_number() {
    let text = sample_textgrid().replace("xmax = 0.3", "xmax = abc");
    let err = parse_word_intervals(&text).unwrap_err();
    match err {
        ProsodyError::InvalidNumber { value, .. } => assert_eq!(value, "abc"),
        other => panic!("expected InvalidNumber, got {other:?}"),
    }
}

#[test]
fn declared_count_larger_than_blocks_is_a_syntax_error() {
    let text = sample_textgrid().replace("intervals: size = 4", "intervals: size = 5");
    let err = parse_word_intervals(&text).unwrap_err();
    assert!(matches!(err, ProsodyError::Syntax { .. }));
}

#[test]
fn overlapping_word_intervals_are_rejected() {
    let text = sample_textgrid().replace(
        "xmin = 0.5\n            xmax = 1.0",
        "xmin = 0.2\n            xmax = 1.0",
    );
    let err = parse_word_intervals(&text).unwrap_err();
    assert!(matches!(err, ProsodyError::OverlappingInterval { index: 3 }));
}

#[test]
fn zero_length_word_is_dropped() {
    let text = sample_textgrid().replace(
        "xmin = 0.5\n            xmax = 1.0",
        "xmin = 0.5\n            xmax = 0.5",
    );
    let text = text.replace(
        "xmin = 1.0\n            xmax = 1.2",
        "xmin = 0.5\n            xmax = 1.2",
    );
    let words = parse_word_intervals(&text).expect("parse");
    assert_eq!(words, vec![word("hello", 0.0, 0.3)]);
}

#[test]
fn reduced_document_has_four_fixed_tiers() {
    let words = vec![word("hello", 0.0, 0.3), word("world", 0.5, 1.0)];
    let document = reduced_document(&words);
    assert_eq!(
        document.tier_names().collect::<Vec<_>>(),
        vec!["tones", "words", "breaks", "misc"]
    );
    assert_eq!(document.xmin, 0.0);
    assert_eq!(document.xmax, 1.0);
    for (idx, tier) in document.tiers.iter().enumerate() {
        match tier {
            Tier::Point(tier) => {
                assert_ne!(idx, 1);
                assert!(tier.points.is_empty());
                assert_eq!(tier.xmax, 1.0);
            }
            Tier::Interval(tier) => {
                assert_eq!(idx, 1);
                assert_eq!(tier.intervals.len(), 2);
            }
        }
    }
}

#[test]
fn synthesized_words_tier_is_renumbered_contiguously() {
    let words = parse_word_intervals(&sample_textgrid()).expect("parse");
    let text = synthesize(&words);
    assert!(text.contains("intervals: size = 2\n"));
    assert!(text.contains("intervals [1]:\n            xmin = 0\n            xmax = 0.3\n            text = \"hello\"\n"));
    assert!(text.contains("intervals [2]:\n            xmin = 0.5\n            xmax = 1\n            text = \"world\"\n"));
    assert!(!text.contains("intervals [3]:"));
    assert!(text.contains("xmax = 1\ntiers? <exists>\nsize = 4\n"));
    assert!(!text.contains("2.38"));
}

#[test]
fn synthesized_document_parses_back_to_the_same_words() {
    let words = vec![
        word("she said \"no\"", 0.12, 0.48),
        word("again", 0.6, 2.75),
    ];
    let reparsed = parse_word_intervals(&synthesize(&words)).expect("reparse");
    assert_eq!(reparsed, words);
}

#[test]
fn xmax_follows_latest_word_end() {
    let words = vec![word("a", 0.0, 4.5), word("b", 4.5, 7.25)];
    let document = reduced_document(&words);
    assert_eq!(document.xmax, 7.25);
    let empty = reduced_document(&[]);
    assert_eq!(empty.xmax, 0.0);
}
