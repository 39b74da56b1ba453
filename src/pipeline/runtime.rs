use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;

use crate::annotation::{parse_word_intervals, synthesize};
use crate::config::LabelerConfig;
use crate::error::ProsodyError;
use crate::labels::{clean_feature_table, ProsodyCategory, ResultTable, Unavailable};
use crate::pipeline::traits::{ColumnSelector, ExtractionRequest, LabelClassifier, ProsodyEngine};
use crate::types::WordInterval;

/// Audio and annotation pair for one labeling run.
#[derive(Debug, Clone)]
pub struct LabelingInput {
    pub audio_path: PathBuf,
    pub annotation_path: PathBuf,
}

pub struct ProsodyLabeler {
    config: LabelerConfig,
    engine: Box<dyn ProsodyEngine>,
    column_selector: Box<dyn ColumnSelector>,
    label_classifier: Box<dyn LabelClassifier>,
}

pub(crate) struct ProsodyLabelerParts {
    pub config: LabelerConfig,
    pub engine: Box<dyn ProsodyEngine>,
    pub column_selector: Box<dyn ColumnSelector>,
    pub label_classifier: Box<dyn LabelClassifier>,
}

impl ProsodyLabeler {
    pub(crate) fn from_parts(parts: ProsodyLabelerParts) -> Self {
        Self {
            config: parts.config,
            engine: parts.engine,
            column_selector: parts.column_selector,
            label_classifier: parts.label_classifier,
        }
    }

    pub fn config(&self) -> &LabelerConfig {
        &self.config
    }

    pub fn engine_label(&self) -> String {
        self.engine.engine_label()
    }

    /// Labels one audio/annotation pair.
    ///
    /// Missing inputs and annotation errors abort the run. Per-category
    /// failures are logged and leave that category unavailable.
    pub fn label(&self, input: &LabelingInput) -> Result<ResultTable, ProsodyError> {
        require_input(&input.audio_path)?;
        require_input(&input.annotation_path)?;

        let text = fs::read_to_string(&input.annotation_path)
            .map_err(|e| ProsodyError::io("read annotation", e))?;
        let words = parse_word_intervals(&text)?;
        if words.is_empty() {
            return Err(ProsodyError::NoWords);
        }
        tracing::info!(
            annotation = %input.annotation_path.display(),
            words = words.len(),
            "extracted word intervals"
        );

        let synthesized = synthesize(&words);
        let synthesized_path = self
            .config
            .synthesized_annotation_path(&input.annotation_path);
        if [&input.annotation_path, &input.audio_path]
            .into_iter()
            .any(|path| same_file(path, &synthesized_path))
        {
            return Err(ProsodyError::invalid_input(format!(
                "synthesized annotation path {} would overwrite an input file",
                synthesized_path.display()
            )));
        }
        let _cleanup = SynthesizedAnnotation::write(
            &synthesized_path,
            &synthesized,
            self.config.keep_synthesized_annotation,
        )?;

        Ok(self.label_words(words, &input.audio_path, &synthesized_path, &synthesized))
    }

    /// Runs every configured category against an already synthesized
    /// annotation. `words` must be the intervals the annotation was built from.
    pub fn label_words(
        &self,
        words: Vec<WordInterval>,
        audio_path: &Path,
        annotation_path: &Path,
        annotation_text: &str,
    ) -> ResultTable {
        let mut table = ResultTable::new(words);
        for &category in &self.config.categories {
            let request = ExtractionRequest {
                audio_path,
                annotation_path,
                annotation_text,
                feature_set: category.feature_set(),
            };
            let started = Instant::now();
            if let Err(err) = self.label_category(category, &request, &mut table) {
                tracing::warn!(
                    category = category.as_str(),
                    feature_set = request.feature_set,
                    error = %err,
                    "skipping category"
                );
                table.mark_unavailable(category, Unavailable::Failed(err.to_string()));
            }
            tracing::debug!(
                category = category.as_str(),
                elapsed_ms = started.elapsed().as_millis() as u64,
                labeled = table.column(category).is_some_and(|c| c.is_labeled()),
                "category finished"
            );
        }
        table
    }

    fn label_category(
        &self,
        category: ProsodyCategory,
        request: &ExtractionRequest<'_>,
        table: &mut ResultTable,
    ) -> Result<(), ProsodyError> {
        let features = self.engine.extract(request)?;
        if features.is_empty() {
            tracing::warn!(
                category = category.as_str(),
                feature_set = request.feature_set,
                "engine returned no features"
            );
            table.mark_unavailable(category, Unavailable::EmptyFeatures);
            return Ok(());
        }

        let features = clean_feature_table(features);
        tracing::debug!(
            category = category.as_str(),
            columns = ?features.column_names().collect::<Vec<_>>(),
            "engine feature columns"
        );

        let Some(column) = self.column_selector.select(&features, category) else {
            tracing::warn!(
                category = category.as_str(),
                "no feature column matches category keywords"
            );
            table.mark_unavailable(category, Unavailable::NoMatch);
            return Ok(());
        };

        let labels = column
            .values
            .iter()
            .map(|&value| self.label_classifier.classify(category, value))
            .collect();
        table.insert_labels(category, column.name.clone(), labels)?;
        tracing::info!(
            category = category.as_str(),
            column = column.name.as_str(),
            "labeled category"
        );
        Ok(())
    }
}

fn require_input(path: &Path) -> Result<(), ProsodyError> {
    if path.is_file() {
        return Ok(());
    }
    Err(ProsodyError::MissingInputFile {
        path: path.to_path_buf(),
    })
}

fn same_file(a: &Path, b: &Path) -> bool {
    if a == b {
        return true;
    }
    match (fs::canonicalize(a), fs::canonicalize(b)) {
        (Ok(a), Ok(b)) => a == b,
        _ => false,
    }
}

/// Reduced annotation on disk for the duration of a run; removed on drop
/// unless it should be kept.
struct SynthesizedAnnotation<'a> {
    path: &'a Path,
    keep: bool,
}

impl<'a> SynthesizedAnnotation<'a> {
    fn write(path: &'a Path, text: &str, keep: bool) -> Result<Self, ProsodyError> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)
                .map_err(|e| ProsodyError::io("create synthesized annotation directory", e))?;
        }
        fs::write(path, text).map_err(|e| ProsodyError::io("write synthesized annotation", e))?;
        tracing::debug!(path = %path.display(), "wrote synthesized annotation");
        Ok(Self { path, keep })
    }
}

impl Drop for SynthesizedAnnotation<'_> {
    fn drop(&mut self) {
        if self.keep {
            return;
        }
        if let Err(err) = fs::remove_file(self.path) {
            tracing::debug!(
                path = %self.path.display(),
                error = %err,
                "could not remove synthesized annotation"
            );
        }
    }
}
