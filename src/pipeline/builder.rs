use crate::config::LabelerConfig;
use crate::error::ProsodyError;
use crate::pipeline::defaults::{KeywordColumnSelector, ThresholdLabelClassifier};
use crate::pipeline::engines::{build_engine, EngineSource};
use crate::pipeline::runtime::{ProsodyLabeler, ProsodyLabelerParts};
use crate::pipeline::traits::{ColumnSelector, LabelClassifier, ProsodyEngine};

pub struct ProsodyLabelerBuilder {
    config: LabelerConfig,
    engine_source: Option<EngineSource>,
    engine: Option<Box<dyn ProsodyEngine>>,
    column_selector: Option<Box<dyn ColumnSelector>>,
    label_classifier: Option<Box<dyn LabelClassifier>>,
}

impl ProsodyLabelerBuilder {
    pub fn new(config: LabelerConfig) -> Self {
        Self {
            config,
            engine_source: None,
            engine: None,
            column_selector: None,
            label_classifier: None,
        }
    }

    pub fn with_engine_source(mut self, engine_source: EngineSource) -> Self {
        self.engine_source = Some(engine_source);
        self
    }

    /// Takes precedence over [`Self::with_engine_source`].
    pub fn with_engine(mut self, engine: Box<dyn ProsodyEngine>) -> Self {
        self.engine = Some(engine);
        self
    }

    pub fn with_column_selector(mut self, column_selector: Box<dyn ColumnSelector>) -> Self {
        self.column_selector = Some(column_selector);
        self
    }

    pub fn with_label_classifier(mut self, label_classifier: Box<dyn LabelClassifier>) -> Self {
        self.label_classifier = Some(label_classifier);
        self
    }

    pub fn build(self) -> Result<ProsodyLabeler, ProsodyError> {
        if self.config.categories.is_empty() {
            return Err(ProsodyError::invalid_input(
                "at least one prosody category must be configured",
            ));
        }
        if self.config.synthesized_annotation_name.trim().is_empty() {
            return Err(ProsodyError::invalid_input(
                "synthesized annotation name must not be empty",
            ));
        }

        let engine = match (self.engine, self.engine_source) {
            (Some(engine), _) => engine,
            (None, Some(source)) => build_engine(source)?,
            (None, None) => {
                return Err(ProsodyError::invalid_input(
                    "no prosody engine or engine source configured",
                ))
            }
        };
        tracing::info!(
            engine = engine.engine_label().as_str(),
            categories = self.config.categories.len(),
            "prosody labeler ready"
        );

        Ok(ProsodyLabeler::from_parts(ProsodyLabelerParts {
            config: self.config,
            engine,
            column_selector: self
                .column_selector
                .unwrap_or_else(|| Box::new(KeywordColumnSelector)),
            label_classifier: self
                .label_classifier
                .unwrap_or_else(|| Box::new(ThresholdLabelClassifier)),
        }))
    }
}
