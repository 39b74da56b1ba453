use std::path::Path;

use crate::error::ProsodyError;
use crate::labels::ProsodyCategory;
use crate::types::{FeatureColumn, FeatureTable, ProsodyLabel};

/// Inputs for one engine call.
#[derive(Debug, Clone, Copy)]
pub struct ExtractionRequest<'a> {
    pub audio_path: &'a Path,
    /// Reduced annotation already written to disk.
    pub annotation_path: &'a Path,
    pub annotation_text: &'a str,
    pub feature_set: &'a str,
}

/// External acoustic-prosody engine. Returns one row per word of the
/// annotation, in annotation order. An empty table means the feature set
/// produced nothing and is not an error.
pub trait ProsodyEngine: Send + Sync {
    fn extract(&self, request: &ExtractionRequest<'_>) -> Result<FeatureTable, ProsodyError>;

    fn engine_label(&self) -> String;
}

pub trait ColumnSelector: Send + Sync {
    fn select<'t>(
        &self,
        table: &'t FeatureTable,
        category: ProsodyCategory,
    ) -> Option<&'t FeatureColumn>;
}

pub trait LabelClassifier: Send + Sync {
    fn classify(&self, category: ProsodyCategory, value: f64) -> ProsodyLabel;
}
