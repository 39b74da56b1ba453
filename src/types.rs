use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};

/// A single non-silence word from the `words` tier.
/// Times are in seconds and satisfy `start_time < end_time`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WordInterval {
    pub word: String,
    pub start_time: f64,
    pub end_time: f64,
}

/// Per-word numeric output of the prosody engine for one feature set.
///
/// Column order is the engine's order and is significant: column selection
/// picks the first matching column. Rows are positionally aligned with the
/// word sequence the engine was given.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FeatureTable {
    #[serde(default)]
    pub columns: Vec<FeatureColumn>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureColumn {
    pub name: String,
    /// Missing engine values (`null` in JSON) are stored as NaN.
    #[serde(deserialize_with = "nullable_values")]
    pub values: Vec<f64>,
}

impl FeatureTable {
    pub fn new(columns: Vec<FeatureColumn>) -> Self {
        Self { columns }
    }

    /// Longest column length. Ragged tables are caught per selected column
    /// by the row alignment check.
    pub fn row_count(&self) -> usize {
        self.columns
            .iter()
            .map(|column| column.values.len())
            .max()
            .unwrap_or(0)
    }

    /// True when the engine produced no columns or no column has rows.
    pub fn is_empty(&self) -> bool {
        self.columns.iter().all(|column| column.values.is_empty())
    }

    pub fn column_names(&self) -> impl Iterator<Item = &str> {
        self.columns.iter().map(|column| column.name.as_str())
    }

    pub fn column(&self, name: &str) -> Option<&FeatureColumn> {
        self.columns.iter().find(|column| column.name == name)
    }
}

impl FeatureColumn {
    pub fn new(name: impl Into<String>, values: Vec<f64>) -> Self {
        Self {
            name: name.into(),
            values,
        }
    }
}

fn nullable_values<'de, D>(deserializer: D) -> Result<Vec<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Vec<Option<f64>> = Vec::deserialize(deserializer)?;
    Ok(raw.into_iter().map(|v| v.unwrap_or(f64::NAN)).collect())
}

/// Categorical prosody label for one word in one category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum ProsodyLabel {
    /// Tone or presence label such as `H*`, `L-`, `YES`; may be empty.
    Text(&'static str),
    /// Binary boundary indicator, `0` or `1`.
    Flag(u8),
}

impl fmt::Display for ProsodyLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text(text) => f.write_str(text),
            Self::Flag(flag) => write!(f, "{flag}"),
        }
    }
}
