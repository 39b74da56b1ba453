use crate::annotation::lexer::{tokenize, Entry, Line, Value};
use crate::annotation::{
    AnnotationDocument, Interval, IntervalTier, Point, PointTier, Tier, SILENCE_SENTINEL,
    WORDS_TIER,
};
use crate::error::ProsodyError;
use crate::types::WordInterval;

/// Parses a long-form TextGrid into its full tier structure.
pub fn parse_document(text: &str) -> Result<AnnotationDocument, ProsodyError> {
    let lines = tokenize(text)?;
    DocumentParser { lines: &lines, pos: 0 }.document()
}

/// Parses a TextGrid and returns the non-silence intervals of its `words` tier.
pub fn parse_word_intervals(text: &str) -> Result<Vec<WordInterval>, ProsodyError> {
    let document = parse_document(text)?;
    word_intervals(&document)
}

/// Extracts word intervals from the `words` interval tier only; intervals of
/// other tiers are never considered.
pub fn word_intervals(document: &AnnotationDocument) -> Result<Vec<WordInterval>, ProsodyError> {
    let tier = document
        .interval_tier(WORDS_TIER)
        .ok_or(ProsodyError::NoWordsTier)?;

    let mut words = Vec::with_capacity(tier.intervals.len());
    let mut last_end = f64::NEG_INFINITY;
    for (idx, interval) in tier.intervals.iter().enumerate() {
        if interval.xmin < last_end {
            return Err(ProsodyError::OverlappingInterval { index: idx + 1 });
        }
        last_end = interval.xmax;

        if is_silence(&interval.text) {
            continue;
        }
        if interval.xmax <= interval.xmin {
            tracing::warn!(
                index = idx + 1,
                word = interval.text.as_str(),
                xmin = interval.xmin,
                xmax = interval.xmax,
                "annotation: dropping zero-length word interval"
            );
            continue;
        }
        words.push(WordInterval {
            word: interval.text.clone(),
            start_time: interval.xmin,
            end_time: interval.xmax,
        });
    }

    tracing::debug!(
        declared = tier.intervals.len(),
        kept = words.len(),
        "annotation: extracted word intervals"
    );
    Ok(words)
}

/// Blank text or the exact sentinel. A padded `" # "` is a word.
fn is_silence(text: &str) -> bool {
    text.trim().is_empty() || text == SILENCE_SENTINEL
}

struct DocumentParser<'a> {
    lines: &'a [Line],
    pos: usize,
}

impl<'a> DocumentParser<'a> {
    fn document(mut self) -> Result<AnnotationDocument, ProsodyError> {
        let mut xmin = None;
        let mut xmax = None;
        let mut tiers_present = false;
        let mut size = None;

        // Header: everything up to `item []:`.
        while let Some(line) = self.next() {
            match &line.entry {
                Entry::Assign { key, value } => match key.as_str() {
                    "xmin" => xmin = Some(number(line.number, value)?),
                    "xmax" => xmax = Some(number(line.number, value)?),
                    "size" => size = Some(count(line.number, bare(line.number, value)?)?),
                    _ => {}
                },
                Entry::Exists { present, .. } => tiers_present = *present,
                Entry::Block { name, index: None } if name == "item" => break,
                other => {
                    return Err(ProsodyError::syntax(
                        line.number,
                        format!("unexpected {other:?} in document header"),
                    ))
                }
            }
        }

        let xmin = xmin.ok_or_else(|| ProsodyError::syntax(1, "missing document xmin"))?;
        let xmax = xmax.ok_or_else(|| ProsodyError::syntax(1, "missing document xmax"))?;
        let tier_count = if tiers_present { size.unwrap_or(0) } else { 0 };

        let mut tiers = Vec::with_capacity(tier_count);
        for tier_idx in 1..=tier_count {
            tiers.push(self.tier(tier_idx)?);
        }

        if let Some(line) = self.next() {
            return Err(ProsodyError::syntax(
                line.number,
                format!("unexpected content after the last of {tier_count} tiers"),
            ));
        }

        Ok(AnnotationDocument { xmin, xmax, tiers })
    }

    fn tier(&mut self, tier_idx: usize) -> Result<Tier, ProsodyError> {
        self.block("item", tier_idx)?;
        let (class_line, class) = self.text_field("class")?;
        let (_, name) = self.text_field("name")?;
        let xmin = self.number_field("xmin")?;
        let xmax = self.number_field("xmax")?;

        match class.as_str() {
            Tier::INTERVAL_CLASS => {
                let size = self.sized("intervals")?;
                let mut intervals = Vec::with_capacity(size);
                for idx in 1..=size {
                    self.block("intervals", idx)?;
                    intervals.push(Interval {
                        xmin: self.number_field("xmin")?,
                        xmax: self.number_field("xmax")?,
                        text: self.text_field("text")?.1,
                    });
                }
                Ok(Tier::Interval(IntervalTier {
                    name,
                    xmin,
                    xmax,
                    intervals,
                }))
            }
            Tier::POINT_CLASS => {
                let size = self.sized("points")?;
                let mut points = Vec::with_capacity(size);
                for idx in 1..=size {
                    self.block("points", idx)?;
                    let time = self.point_time()?;
                    let mark = self.text_field("mark")?.1;
                    points.push(Point { time, mark });
                }
                Ok(Tier::Point(PointTier {
                    name,
                    xmin,
                    xmax,
                    points,
                }))
            }
            other => Err(ProsodyError::syntax(
                class_line,
                format!("unknown tier class '{other}'"),
            )),
        }
    }

    fn next(&mut self) -> Option<&'a Line> {
        let lines = self.lines;
        let line = lines.get(self.pos)?;
        self.pos += 1;
        Some(line)
    }

    fn expect(&mut self, what: &str) -> Result<&'a Line, ProsodyError> {
        let last_line = self.lines.last().map_or(1, |line| line.number);
        self.next().ok_or_else(|| {
            ProsodyError::syntax(last_line, format!("document ended while expecting {what}"))
        })
    }

    fn block(&mut self, expected: &str, expected_idx: usize) -> Result<(), ProsodyError> {
        let line = self.expect(expected)?;
        match &line.entry {
            Entry::Block { name, index } if name == expected && *index == Some(expected_idx) => {
                Ok(())
            }
            other => Err(ProsodyError::syntax(
                line.number,
                format!("expected '{expected} [{expected_idx}]:', found {other:?}"),
            )),
        }
    }

    fn sized(&mut self, expected: &str) -> Result<usize, ProsodyError> {
        let line = self.expect(expected)?;
        match &line.entry {
            Entry::Sized { name, size } if name == expected => count(line.number, size),
            other => Err(ProsodyError::syntax(
                line.number,
                format!("expected '{expected}: size = N', found {other:?}"),
            )),
        }
    }

    fn field(&mut self, keys: &[&str]) -> Result<(usize, &'a Value), ProsodyError> {
        let expected = keys.join("' or '");
        let line = self.expect(&expected)?;
        match &line.entry {
            Entry::Assign { key, value } if keys.contains(&key.as_str()) => {
                Ok((line.number, value))
            }
            other => Err(ProsodyError::syntax(
                line.number,
                format!("expected '{expected} = ...', found {other:?}"),
            )),
        }
    }

    fn text_field(&mut self, key: &str) -> Result<(usize, String), ProsodyError> {
        let (line, value) = self.field(&[key])?;
        match value {
            Value::Text(text) => Ok((line, text.clone())),
            Value::Bare(raw) => Err(ProsodyError::syntax(
                line,
                format!("expected quoted {key}, found '{raw}'"),
            )),
        }
    }

    fn number_field(&mut self, key: &str) -> Result<f64, ProsodyError> {
        let (line, value) = self.field(&[key])?;
        number(line, value)
    }

    fn point_time(&mut self) -> Result<f64, ProsodyError> {
        let (line, value) = self.field(&["number", "time"])?;
        number(line, value)
    }
}

fn bare(line: usize, value: &Value) -> Result<&str, ProsodyError> {
    match value {
        Value::Bare(raw) => Ok(raw),
        Value::Text(text) => Err(ProsodyError::InvalidNumber {
            line,
            value: text.clone(),
        }),
    }
}

fn number(line: usize, value: &Value) -> Result<f64, ProsodyError> {
    let raw = bare(line, value)?;
    match raw.parse::<f64>() {
        Ok(parsed) if parsed.is_finite() => Ok(parsed),
        _ => Err(ProsodyError::InvalidNumber {
            line,
            value: raw.to_string(),
        }),
    }
}

fn count(line: usize, raw: &str) -> Result<usize, ProsodyError> {
    raw.trim()
        .parse::<usize>()
        .map_err(|_| ProsodyError::InvalidNumber {
            line,
            value: raw.to_string(),
        })
}
