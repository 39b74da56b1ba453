pub mod annotation;
pub mod config;
pub mod error;
pub mod labels;
pub mod pipeline;
pub mod types;

pub use annotation::{parse_word_intervals, synthesize, AnnotationDocument};
pub use config::{CommandEngineConfig, LabelerConfig};
pub use error::ProsodyError;
pub use labels::{CategoryColumn, ProsodyCategory, ResultRow, ResultTable, Unavailable};
pub use pipeline::builder::ProsodyLabelerBuilder;
pub use pipeline::engines::{CommandEngine, EngineSource, FeatureDumpEngine};
pub use pipeline::runtime::{LabelingInput, ProsodyLabeler};
pub use pipeline::traits::{ColumnSelector, ExtractionRequest, LabelClassifier, ProsodyEngine};
pub use types::{FeatureColumn, FeatureTable, ProsodyLabel, WordInterval};
