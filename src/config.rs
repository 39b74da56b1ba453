use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::error::ProsodyError;
use crate::labels::ProsodyCategory;

#[derive(Debug, Clone)]
pub struct LabelerConfig {
    /// Categories to label, each backed by one engine call.
    pub categories: Vec<ProsodyCategory>,
    /// File name of the reduced annotation written for the engine.
    /// `{stem}` is replaced with the input annotation's file stem.
    pub synthesized_annotation_name: String,
    pub keep_synthesized_annotation: bool,
    /// Directory for the reduced annotation; defaults to the input
    /// annotation's directory.
    pub work_dir: Option<PathBuf>,
}

impl LabelerConfig {
    pub const DEFAULT_SYNTHESIZED_ANNOTATION_NAME: &'static str = "{stem}_autobi_input.TextGrid";

    pub fn synthesized_annotation_path(&self, annotation_path: &Path) -> PathBuf {
        let stem = annotation_path
            .file_stem()
            .map(|stem| stem.to_string_lossy().into_owned())
            .unwrap_or_default();
        let file_name = self.synthesized_annotation_name.replace("{stem}", &stem);
        let dir = self
            .work_dir
            .clone()
            .or_else(|| annotation_path.parent().map(Path::to_path_buf))
            .unwrap_or_default();
        dir.join(file_name)
    }
}

impl Default for LabelerConfig {
    fn default() -> Self {
        Self {
            categories: ProsodyCategory::ALL.to_vec(),
            synthesized_annotation_name: Self::DEFAULT_SYNTHESIZED_ANNOTATION_NAME.to_string(),
            keep_synthesized_annotation: false,
            work_dir: None,
        }
    }
}

/// How to launch an external prosody engine process, read from JSON.
///
/// Arguments may contain `{audio}`, `{annotation}` and `{feature_set}`
/// placeholders. The process must print a feature table as JSON on stdout.
#[derive(Debug, Clone, serde::Deserialize)]
pub struct CommandEngineConfig {
    pub program: String,
    #[serde(default)]
    pub args: Vec<String>,
    #[serde(default)]
    pub timeout_secs: Option<u64>,
    #[serde(default)]
    pub working_dir: Option<PathBuf>,
}

impl CommandEngineConfig {
    pub fn load(path: &Path) -> Result<Self, ProsodyError> {
        let data = std::fs::read_to_string(path)
            .map_err(|e| ProsodyError::io("read engine config", e))?;
        let config: Self = serde_json::from_str(&data)
            .map_err(|e| ProsodyError::json("parse engine config", e))?;
        if config.program.trim().is_empty() {
            return Err(ProsodyError::invalid_input(
                "engine config 'program' must not be empty",
            ));
        }
        Ok(config)
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_secs
            .filter(|&secs| secs > 0)
            .map(Duration::from_secs)
    }
}
