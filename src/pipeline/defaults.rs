use crate::labels::{classify, select_column, ProsodyCategory};
use crate::pipeline::traits::{ColumnSelector, LabelClassifier};
use crate::types::{FeatureColumn, FeatureTable, ProsodyLabel};

pub struct KeywordColumnSelector;

impl ColumnSelector for KeywordColumnSelector {
    fn select<'t>(
        &self,
        table: &'t FeatureTable,
        category: ProsodyCategory,
    ) -> Option<&'t FeatureColumn> {
        select_column(table, category)
    }
}

pub struct ThresholdLabelClassifier;

impl LabelClassifier for ThresholdLabelClassifier {
    fn classify(&self, category: ProsodyCategory, value: f64) -> ProsodyLabel {
        classify(category, value)
    }
}
