//! Reduction of engine feature tables to categorical prosody labels.

mod category;
pub mod classifier;
pub mod column_selector;
pub mod result_table;

pub use category::ProsodyCategory;
pub use classifier::{classify, classify_column};
pub use column_selector::{clean_column_name, clean_feature_table, select_column};
pub use result_table::{CategoryColumn, ResultRow, ResultTable, Unavailable};
