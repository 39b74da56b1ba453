use std::collections::BTreeMap;

use serde::ser::{Serialize, SerializeMap, Serializer};

use crate::error::ProsodyError;
use crate::labels::ProsodyCategory;
use crate::types::{ProsodyLabel, WordInterval};

/// Why a category has no labels in this run.
#[derive(Debug, Clone, PartialEq)]
pub enum Unavailable {
    /// No engine column matched the category keywords.
    NoMatch,
    /// The engine returned an empty table for the feature set.
    EmptyFeatures,
    /// Engine call, extraction or row alignment failed.
    Failed(String),
}

#[derive(Debug, Clone, PartialEq)]
pub enum CategoryColumn {
    Labeled {
        /// Cleaned engine column the labels were derived from.
        source_column: String,
        labels: Vec<ProsodyLabel>,
    },
    Unavailable(Unavailable),
}

impl CategoryColumn {
    pub fn label(&self, row: usize) -> Option<ProsodyLabel> {
        match self {
            Self::Labeled { labels, .. } => labels.get(row).copied(),
            Self::Unavailable(_) => None,
        }
    }

    pub fn is_labeled(&self) -> bool {
        matches!(self, Self::Labeled { .. })
    }
}

/// Word rows plus one column per requested category.
///
/// Row order is the word order for the whole run. A category column is either
/// labeled for every row or unavailable for every row.
#[derive(Debug, Clone, PartialEq)]
pub struct ResultTable {
    words: Vec<WordInterval>,
    columns: BTreeMap<ProsodyCategory, CategoryColumn>,
}

impl ResultTable {
    pub fn new(words: Vec<WordInterval>) -> Self {
        Self {
            words,
            columns: BTreeMap::new(),
        }
    }

    pub fn words(&self) -> &[WordInterval] {
        &self.words
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    /// Stores labels for a category. Fails with `AlignmentMismatch` unless
    /// there is exactly one label per word; the table is left unchanged then.
    pub fn insert_labels(
        &mut self,
        category: ProsodyCategory,
        source_column: impl Into<String>,
        labels: Vec<ProsodyLabel>,
    ) -> Result<(), ProsodyError> {
        if labels.len() != self.words.len() {
            return Err(ProsodyError::AlignmentMismatch {
                category: category.column_name(),
                expected: self.words.len(),
                actual: labels.len(),
            });
        }
        self.columns.insert(
            category,
            CategoryColumn::Labeled {
                source_column: source_column.into(),
                labels,
            },
        );
        Ok(())
    }

    pub fn mark_unavailable(&mut self, category: ProsodyCategory, reason: Unavailable) {
        self.columns
            .insert(category, CategoryColumn::Unavailable(reason));
    }

    pub fn column(&self, category: ProsodyCategory) -> Option<&CategoryColumn> {
        self.columns.get(&category)
    }

    /// Categories present in the table, in result-column order.
    pub fn categories(&self) -> impl Iterator<Item = ProsodyCategory> + '_ {
        self.columns.keys().copied()
    }

    /// Header of the result schema: word fields then one column per category.
    pub fn column_names(&self) -> Vec<&'static str> {
        let mut names = vec!["word", "start_time", "end_time"];
        names.extend(self.categories().map(ProsodyCategory::column_name));
        names
    }

    pub fn rows(&self) -> impl Iterator<Item = ResultRow<'_>> {
        (0..self.words.len()).map(move |index| ResultRow { table: self, index })
    }
}

/// Borrowed view of one result row.
#[derive(Debug, Clone, Copy)]
pub struct ResultRow<'a> {
    table: &'a ResultTable,
    index: usize,
}

impl<'a> ResultRow<'a> {
    pub fn word(&self) -> &'a WordInterval {
        &self.table.words[self.index]
    }

    /// `None` when the category is unavailable for this run.
    pub fn label(&self, category: ProsodyCategory) -> Option<ProsodyLabel> {
        self.table.column(category)?.label(self.index)
    }

    pub fn labels(&self) -> impl Iterator<Item = (ProsodyCategory, Option<ProsodyLabel>)> + 'a {
        let (table, index) = (self.table, self.index);
        table
            .columns
            .iter()
            .map(move |(category, column)| (*category, column.label(index)))
    }
}

impl Serialize for ResultRow<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let word = self.word();
        let mut map = serializer.serialize_map(Some(3 + self.table.columns.len()))?;
        map.serialize_entry("word", &word.word)?;
        map.serialize_entry("start_time", &word.start_time)?;
        map.serialize_entry("end_time", &word.end_time)?;
        for (category, label) in self.labels() {
            map.serialize_entry(category.column_name(), &label)?;
        }
        map.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn words() -> Vec<WordInterval> {
        vec![
            WordInterval {
                word: "hello".to_string(),
                start_time: 0.0,
                end_time: 0.3,
            },
            WordInterval {
                word: "world".to_string(),
                start_time: 0.5,
                end_time: 1.0,
            },
        ]
    }

    #[test]
    fn insert_labels_requires_one_label_per_word() {
        let mut table = ResultTable::new(words());
        let err = table
            .insert_labels(
                ProsodyCategory::PitchAccent,
                "f0",
                vec![ProsodyLabel::Text("YES")],
            )
            .unwrap_err();
        assert!(matches!(
            err,
            ProsodyError::AlignmentMismatch {
                expected: 2,
                actual: 1,
                ..
            }
        ));
        assert!(table.column(ProsodyCategory::PitchAccent).is_none());
    }

    #[test]
    fn unavailable_category_is_none_for_every_row() {
        let mut table = ResultTable::new(words());
        table.mark_unavailable(ProsodyCategory::BoundaryTone, Unavailable::NoMatch);
        assert!(table
            .rows()
            .all(|row| row.label(ProsodyCategory::BoundaryTone).is_none()));
        assert_eq!(
            table.column_names(),
            vec!["word", "start_time", "end_time", "BoundaryTone"]
        );
    }

    #[test]
    fn columns_follow_category_order_regardless_of_insertion() {
        let mut table = ResultTable::new(words());
        table
            .insert_labels(
                ProsodyCategory::PhraseAccent,
                "accent",
                vec![ProsodyLabel::Text("H-"), ProsodyLabel::Text("")],
            )
            .expect("aligned");
        table
            .insert_labels(
                ProsodyCategory::PitchAccent,
                "f0",
                vec![ProsodyLabel::Text("YES"), ProsodyLabel::Text("NO")],
            )
            .expect("aligned");
        assert_eq!(
            table.categories().collect::<Vec<_>>(),
            vec![ProsodyCategory::PitchAccent, ProsodyCategory::PhraseAccent]
        );
        let second = table.rows().nth(1).expect("row");
        assert_eq!(second.word().word, "world");
        assert_eq!(
            second.label(ProsodyCategory::PhraseAccent),
            Some(ProsodyLabel::Text(""))
        );
    }

    #[test]
    fn row_serializes_in_schema_order() {
        let mut table = ResultTable::new(words());
        table
            .insert_labels(
                ProsodyCategory::IntonationalPhraseBoundary,
                "pause",
                vec![ProsodyLabel::Flag(0), ProsodyLabel::Flag(1)],
            )
            .expect("aligned");
        table.mark_unavailable(
            ProsodyCategory::BoundaryTone,
            Unavailable::Failed("engine down".to_string()),
        );
        let row = table.rows().nth(1).expect("row");
        let json = serde_json::to_string(&row).expect("serialize");
        assert_eq!(
            json,
            r#"{"word":"world","start_time":0.5,"end_time":1.0,"IntonationalPhraseBoundary":1,"BoundaryTone":null}"#
        );
    }
}
