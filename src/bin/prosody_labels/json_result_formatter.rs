use std::fs::{self, File};
use std::io::Write;
use std::path::Path;

use chrono::Utc;
use prosody_labels::{CategoryColumn, LabelingInput, ResultRow, ResultTable, Unavailable};
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct LabelingReport<'a> {
    pub schema_version: u32,
    pub meta: Meta,
    pub categories: Vec<CategorySummary>,
    pub rows: Vec<ResultRow<'a>>,
}

#[derive(Debug, Serialize)]
pub struct Meta {
    pub generated_at: String,
    pub audio_path: String,
    pub annotation_path: String,
    pub engine: String,
    pub word_count: usize,
}

#[derive(Debug, Serialize)]
pub struct CategorySummary {
    pub column: &'static str,
    pub status: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source_column: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl<'a> LabelingReport<'a> {
    pub fn new(input: &LabelingInput, engine: &str, table: &'a ResultTable) -> Self {
        let categories = table
            .categories()
            .filter_map(|category| {
                let column = table.column(category)?;
                let (status, source_column, message) = match column {
                    CategoryColumn::Labeled { source_column, .. } => {
                        ("labeled", Some(source_column.clone()), None)
                    }
                    CategoryColumn::Unavailable(Unavailable::NoMatch) => ("no_match", None, None),
                    CategoryColumn::Unavailable(Unavailable::EmptyFeatures) => {
                        ("empty_features", None, None)
                    }
                    CategoryColumn::Unavailable(Unavailable::Failed(message)) => {
                        ("failed", None, Some(message.clone()))
                    }
                };
                Some(CategorySummary {
                    column: category.column_name(),
                    status,
                    source_column,
                    message,
                })
            })
            .collect();

        Self {
            schema_version: 1,
            meta: Meta {
                generated_at: Utc::now().to_rfc3339(),
                audio_path: input.audio_path.display().to_string(),
                annotation_path: input.annotation_path.display().to_string(),
                engine: engine.to_string(),
                word_count: table.len(),
            },
            categories,
            rows: table.rows().collect(),
        }
    }
}

pub fn write_report(path: &Path, report: &LabelingReport<'_>) -> Result<(), String> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|err| {
            format!(
                "Failed to create report output directory '{}': {err}",
                parent.display()
            )
        })?;
    }

    let mut file = File::create(path)
        .map_err(|err| format!("Failed to create report file '{}': {err}", path.display()))?;
    serde_json::to_writer_pretty(&mut file, report).map_err(|err| {
        format!(
            "Failed to serialize report JSON '{}': {err}",
            path.display()
        )
    })?;
    file.write_all(b"\n")
        .map_err(|err| format!("Failed to finalize report file '{}': {err}", path.display()))?;
    Ok(())
}
