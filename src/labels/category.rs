use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// One prosodic labeling task. Each category is served by its own engine
/// feature set and produces one result column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ProsodyCategory {
    PitchAccent,
    PitchAccentType,
    IntonationalPhraseBoundary,
    IntermediatePhraseBoundary,
    PhraseAccent,
    BoundaryTone,
}

impl ProsodyCategory {
    /// All categories in result-column order.
    pub const ALL: [ProsodyCategory; 6] = [
        Self::PitchAccent,
        Self::PitchAccentType,
        Self::IntonationalPhraseBoundary,
        Self::IntermediatePhraseBoundary,
        Self::PhraseAccent,
        Self::BoundaryTone,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::PitchAccent => "pitch-accent",
            Self::PitchAccentType => "pitch-accent-type",
            Self::IntonationalPhraseBoundary => "intonational-phrase-boundary",
            Self::IntermediatePhraseBoundary => "intermediate-phrase-boundary",
            Self::PhraseAccent => "phrase-accent",
            Self::BoundaryTone => "boundary-tone",
        }
    }

    /// Column name in the result table.
    pub fn column_name(self) -> &'static str {
        match self {
            Self::PitchAccent => "PitchAccent",
            Self::PitchAccentType => "PitchAccentType",
            Self::IntonationalPhraseBoundary => "IntonationalPhraseBoundary",
            Self::IntermediatePhraseBoundary => "IntermediatePhraseBoundary",
            Self::PhraseAccent => "PhraseAccent",
            Self::BoundaryTone => "BoundaryTone",
        }
    }

    /// Engine feature set requested for this category.
    pub fn feature_set(self) -> &'static str {
        match self {
            Self::PitchAccent => "PitchAccentDetectionFeatureSet",
            Self::PitchAccentType => "PitchAccentClassificationFeatureSet",
            Self::IntonationalPhraseBoundary => "IntonationalPhraseBoundaryDetectionFeatureSet",
            Self::IntermediatePhraseBoundary => "IntermediatePhraseBoundaryDetectionFeatureSet",
            Self::PhraseAccent => "PhraseAccentClassificationFeatureSet",
            Self::BoundaryTone => "PhraseAccentBoundaryToneClassificationFeatureSet",
        }
    }

    /// Keywords searched for, case-insensitively, in cleaned column names.
    pub fn keywords(self) -> &'static [&'static str] {
        match self {
            Self::PitchAccent => &["pitch_accent", "f0", "log_f0"],
            Self::PitchAccentType => &["f0", "log_f0", "pitch"],
            Self::IntonationalPhraseBoundary | Self::IntermediatePhraseBoundary => &[
                "boundary", "pause", "silence", "duration", "f0", "energy", "ip",
            ],
            Self::PhraseAccent => &["accent", "f0", "log_f0", "pitch", "energy", "duration"],
            Self::BoundaryTone => &[
                "boundary", "tone", "f0", "log_f0", "pitch", "energy", "duration",
            ],
        }
    }
}

impl fmt::Display for ProsodyCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ProsodyCategory {
    type Err = String;

    /// Accepts the kebab-case name or the result column name.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        Self::ALL
            .into_iter()
            .find(|category| {
                category.as_str().eq_ignore_ascii_case(s)
                    || category.column_name().eq_ignore_ascii_case(s)
            })
            .ok_or_else(|| format!("unknown prosody category '{s}'"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn category_from_str_accepts_both_spellings() {
        assert_eq!(
            "boundary-tone".parse::<ProsodyCategory>(),
            Ok(ProsodyCategory::BoundaryTone)
        );
        assert_eq!(
            "PitchAccentType".parse::<ProsodyCategory>(),
            Ok(ProsodyCategory::PitchAccentType)
        );
        assert!("stress".parse::<ProsodyCategory>().is_err());
    }

    #[test]
    fn boundary_categories_share_keywords() {
        assert_eq!(
            ProsodyCategory::IntonationalPhraseBoundary.keywords(),
            ProsodyCategory::IntermediatePhraseBoundary.keywords()
        );
        assert_eq!(ProsodyCategory::PitchAccent.keywords()[0], "pitch_accent");
    }

    #[test]
    fn feature_sets_are_distinct() {
        let mut sets: Vec<_> = ProsodyCategory::ALL
            .into_iter()
            .map(ProsodyCategory::feature_set)
            .collect();
        sets.sort_unstable();
        sets.dedup();
        assert_eq!(sets.len(), ProsodyCategory::ALL.len());
    }
}
