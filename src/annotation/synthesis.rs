use crate::annotation::{AnnotationDocument, Interval, IntervalTier, PointTier, Tier, WORDS_TIER};
use crate::types::WordInterval;

const TONES_TIER: &str = "tones";
const BREAKS_TIER: &str = "breaks";
const MISC_TIER: &str = "misc";

/// Builds the reduced document the prosody engine expects: empty `tones`,
/// the `words` tier, empty `breaks` and empty `misc`, in that order.
///
/// Words are renumbered `1..=N` in input order and the document spans
/// `[0, max end_time]`.
pub fn reduced_document(words: &[WordInterval]) -> AnnotationDocument {
    let xmin = 0.0;
    let xmax = words.iter().map(|word| word.end_time).fold(xmin, f64::max);

    let intervals = words
        .iter()
        .map(|word| Interval {
            xmin: word.start_time,
            xmax: word.end_time,
            text: word.word.clone(),
        })
        .collect();

    AnnotationDocument {
        xmin,
        xmax,
        tiers: vec![
            Tier::Point(PointTier::empty(TONES_TIER, xmin, xmax)),
            Tier::Interval(IntervalTier {
                name: WORDS_TIER.to_string(),
                xmin,
                xmax,
                intervals,
            }),
            Tier::Point(PointTier::empty(BREAKS_TIER, xmin, xmax)),
            Tier::Point(PointTier::empty(MISC_TIER, xmin, xmax)),
        ],
    }
}

/// Renders [`reduced_document`] as TextGrid text.
pub fn synthesize(words: &[WordInterval]) -> String {
    reduced_document(words).to_string()
}
