use std::collections::HashSet;

use crate::labels::ProsodyCategory;
use crate::types::{FeatureColumn, FeatureTable};

/// Prefix for cleaned names that do not start with an ASCII letter.
pub const NAME_MARKER: &str = "F_";

/// Maps every character outside `[A-Za-z0-9_]` to `_` and prefixes
/// [`NAME_MARKER`] when the result does not start with a letter.
/// `clean_column_name(clean_column_name(s)) == clean_column_name(s)`.
pub fn clean_column_name(name: &str) -> String {
    let cleaned: String = name
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '_' { c } else { '_' })
        .collect();
    if cleaned.starts_with(|c: char| c.is_ascii_alphabetic()) {
        cleaned
    } else {
        format!("{NAME_MARKER}{cleaned}")
    }
}

/// Renames every column with [`clean_column_name`]. When two engine columns
/// clean to the same name only the first is kept.
pub fn clean_feature_table(table: FeatureTable) -> FeatureTable {
    let mut seen = HashSet::with_capacity(table.columns.len());
    let columns = table
        .columns
        .into_iter()
        .filter_map(|column| {
            let name = clean_column_name(&column.name);
            if !seen.insert(name.clone()) {
                tracing::debug!(
                    original = column.name.as_str(),
                    cleaned = name.as_str(),
                    "column selection: dropping column whose cleaned name collides"
                );
                return None;
            }
            Some(FeatureColumn {
                name,
                values: column.values,
            })
        })
        .collect();
    FeatureTable { columns }
}

/// First column, in engine order, whose cleaned lower-cased name contains
/// any of the category's keywords. `None` means no match, not an error.
pub fn select_column(table: &FeatureTable, category: ProsodyCategory) -> Option<&FeatureColumn> {
    let keywords = category.keywords();
    table.columns.iter().find(|column| {
        let name = clean_column_name(&column.name).to_ascii_lowercase();
        keywords.iter().any(|keyword| name.contains(keyword))
    })
}
