use crate::labels::ProsodyCategory;
use crate::types::ProsodyLabel;

const PITCH_ACCENT_THRESHOLD: f64 = 0.5;

/// Maps one engine value to a label. Comparisons are strict, so a value equal
/// to a threshold falls through to the last branch; NaN does the same.
pub fn classify(category: ProsodyCategory, value: f64) -> ProsodyLabel {
    match category {
        ProsodyCategory::PitchAccent => {
            ProsodyLabel::Text(if value > PITCH_ACCENT_THRESHOLD {
                "YES"
            } else {
                "NO"
            })
        }
        ProsodyCategory::PitchAccentType => ProsodyLabel::Text(if value > PITCH_ACCENT_THRESHOLD {
            "H*"
        } else if value < -PITCH_ACCENT_THRESHOLD {
            "L+H*"
        } else {
            "!H*"
        }),
        ProsodyCategory::IntonationalPhraseBoundary
        | ProsodyCategory::IntermediatePhraseBoundary => ProsodyLabel::Flag(u8::from(value > 0.0)),
        ProsodyCategory::PhraseAccent => ProsodyLabel::Text(signed_tone(value, "H-", "L-")),
        ProsodyCategory::BoundaryTone => ProsodyLabel::Text(signed_tone(value, "H%", "L%")),
    }
}

/// Classifies a whole column, preserving row order.
pub fn classify_column(category: ProsodyCategory, values: &[f64]) -> Vec<ProsodyLabel> {
    values.iter().map(|&value| classify(category, value)).collect()
}

fn signed_tone(value: f64, high: &'static str, low: &'static str) -> &'static str {
    if value > 0.0 {
        high
    } else if value < 0.0 {
        low
    } else {
        ""
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text(category: ProsodyCategory, value: f64) -> String {
        classify(category, value).to_string()
    }

    #[test]
    fn pitch_accent_threshold_is_exclusive() {
        assert_eq!(text(ProsodyCategory::PitchAccent, 0.5), "NO");
        assert_eq!(text(ProsodyCategory::PitchAccent, 0.50001), "YES");
        assert_eq!(text(ProsodyCategory::PitchAccent, -3.0), "NO");
    }

    #[test]
    fn pitch_accent_type_three_way_split() {
        assert_eq!(text(ProsodyCategory::PitchAccentType, 0.9), "H*");
        assert_eq!(text(ProsodyCategory::PitchAccentType, 0.5), "!H*");
        assert_eq!(text(ProsodyCategory::PitchAccentType, 0.0), "!H*");
        assert_eq!(text(ProsodyCategory::PitchAccentType, -0.5), "!H*");
        assert_eq!(text(ProsodyCategory::PitchAccentType, -0.51), "L+H*");
    }

    #[test]
    fn phrase_boundaries_are_binary() {
        for category in [
            ProsodyCategory::IntonationalPhraseBoundary,
            ProsodyCategory::IntermediatePhraseBoundary,
        ] {
            assert_eq!(classify(category, 0.0), ProsodyLabel::Flag(0));
            assert_eq!(classify(category, 1e-9), ProsodyLabel::Flag(1));
            assert_eq!(classify(category, -2.0), ProsodyLabel::Flag(0));
        }
    }

    #[test]
    fn phrase_accent_zero_is_empty() {
        assert_eq!(text(ProsodyCategory::PhraseAccent, 0.0), "");
        assert_eq!(text(ProsodyCategory::PhraseAccent, -0.0), "");
        assert_eq!(text(ProsodyCategory::PhraseAccent, 0.2), "H-");
        assert_eq!(text(ProsodyCategory::PhraseAccent, -0.2), "L-");
    }

    #[test]
    fn boundary_tone_sign() {
        assert_eq!(text(ProsodyCategory::BoundaryTone, 4.0), "H%");
        assert_eq!(text(ProsodyCategory::BoundaryTone, -4.0), "L%");
        assert_eq!(text(ProsodyCategory::BoundaryTone, 0.0), "");
    }

    #[test]
    fn nan_takes_the_fallthrough_branch() {
        assert_eq!(text(ProsodyCategory::PitchAccent, f64::NAN), "NO");
        assert_eq!(text(ProsodyCategory::PitchAccentType, f64::NAN), "!H*");
        assert_eq!(
            classify(ProsodyCategory::IntonationalPhraseBoundary, f64::NAN),
            ProsodyLabel::Flag(0)
        );
        assert_eq!(text(ProsodyCategory::BoundaryTone, f64::NAN), "");
    }

    #[test]
    fn classify_column_preserves_order() {
        let labels = classify_column(ProsodyCategory::PitchAccent, &[0.9, 0.1]);
        assert_eq!(
            labels,
            vec![ProsodyLabel::Text("YES"), ProsodyLabel::Text("NO")]
        );
    }
}
