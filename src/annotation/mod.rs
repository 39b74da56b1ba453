//! Long-form TextGrid documents: parsing, word extraction and the reduced
//! four-tier rendering handed to the prosody engine.

use std::fmt;

mod lexer;
mod parser;
mod synthesis;
#[cfg(test)]
mod tests;

pub use parser::{parse_document, parse_word_intervals, word_intervals};
pub use synthesis::{reduced_document, synthesize};

/// Name of the interval tier that carries word intervals.
pub const WORDS_TIER: &str = "words";
/// Interval text marking a non-speech span.
pub const SILENCE_SENTINEL: &str = "#";

#[derive(Debug, Clone, PartialEq)]
pub struct AnnotationDocument {
    pub xmin: f64,
    pub xmax: f64,
    pub tiers: Vec<Tier>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Tier {
    Interval(IntervalTier),
    Point(PointTier),
}

#[derive(Debug, Clone, PartialEq)]
pub struct IntervalTier {
    pub name: String,
    pub xmin: f64,
    pub xmax: f64,
    pub intervals: Vec<Interval>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Interval {
    pub xmin: f64,
    pub xmax: f64,
    pub text: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PointTier {
    pub name: String,
    pub xmin: f64,
    pub xmax: f64,
    pub points: Vec<Point>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Point {
    pub time: f64,
    pub mark: String,
}

impl Tier {
    pub const INTERVAL_CLASS: &'static str = "IntervalTier";
    pub const POINT_CLASS: &'static str = "TextTier";

    pub fn name(&self) -> &str {
        match self {
            Self::Interval(tier) => &tier.name,
            Self::Point(tier) => &tier.name,
        }
    }

    pub fn class(&self) -> &'static str {
        match self {
            Self::Interval(_) => Self::INTERVAL_CLASS,
            Self::Point(_) => Self::POINT_CLASS,
        }
    }

    fn bounds(&self) -> (f64, f64) {
        match self {
            Self::Interval(tier) => (tier.xmin, tier.xmax),
            Self::Point(tier) => (tier.xmin, tier.xmax),
        }
    }
}

impl PointTier {
    pub fn empty(name: &str, xmin: f64, xmax: f64) -> Self {
        Self {
            name: name.to_string(),
            xmin,
            xmax,
            points: Vec::new(),
        }
    }
}

impl AnnotationDocument {
    /// First interval tier with exactly this name.
    pub fn interval_tier(&self, name: &str) -> Option<&IntervalTier> {
        self.tiers.iter().find_map(|tier| match tier {
            Tier::Interval(tier) if tier.name == name => Some(tier),
            _ => None,
        })
    }

    pub fn tier_names(&self) -> impl Iterator<Item = &str> {
        self.tiers.iter().map(Tier::name)
    }
}

/// Renders the long ("ooTextFile") TextGrid form.
impl fmt::Display for AnnotationDocument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "File type = \"ooTextFile\"")?;
        writeln!(f, "Object class = \"TextGrid\"")?;
        writeln!(f)?;
        writeln!(f, "xmin = {}", self.xmin)?;
        writeln!(f, "xmax = {}", self.xmax)?;
        if self.tiers.is_empty() {
            return writeln!(f, "tiers? <absent>");
        }
        writeln!(f, "tiers? <exists>")?;
        writeln!(f, "size = {}", self.tiers.len())?;
        writeln!(f, "item []:")?;
        for (tier_idx, tier) in self.tiers.iter().enumerate() {
            let (xmin, xmax) = tier.bounds();
            writeln!(f, "    item [{}]:", tier_idx + 1)?;
            writeln!(f, "        class = \"{}\"", tier.class())?;
            writeln!(f, "        name = {}", quote(tier.name()))?;
            writeln!(f, "        xmin = {xmin}")?;
            writeln!(f, "        xmax = {xmax}")?;
            match tier {
                Tier::Interval(tier) => {
                    writeln!(f, "        intervals: size = {}", tier.intervals.len())?;
                    for (idx, interval) in tier.intervals.iter().enumerate() {
                        writeln!(f, "        intervals [{}]:", idx + 1)?;
                        writeln!(f, "            xmin = {}", interval.xmin)?;
                        writeln!(f, "            xmax = {}", interval.xmax)?;
                        writeln!(f, "            text = {}", quote(&interval.text))?;
                    }
                }
                Tier::Point(tier) => {
                    writeln!(f, "        points: size = {}", tier.points.len())?;
                    for (idx, point) in tier.points.iter().enumerate() {
                        writeln!(f, "        points [{}]:", idx + 1)?;
                        writeln!(f, "            number = {}", point.time)?;
                        writeln!(f, "            mark = {}", quote(&point.mark))?;
                    }
                }
            }
        }
        Ok(())
    }
}

fn quote(text: &str) -> String {
    format!("\"{}\"", text.replace('"', "\"\""))
}
