use std::io::Read;
use std::path::PathBuf;
use std::process::{Child, Command, Stdio};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use crate::config::CommandEngineConfig;
use crate::error::ProsodyError;
use crate::pipeline::traits::{ExtractionRequest, ProsodyEngine};
use crate::types::FeatureTable;

const POLL_INTERVAL: Duration = Duration::from_millis(20);
const STDERR_TAIL_CHARS: usize = 400;

/// Where feature tables come from when no engine instance is supplied.
#[derive(Debug, Clone)]
pub enum EngineSource {
    /// Precomputed engine output: `<dir>/<audio stem>/<feature set>.json`,
    /// falling back to `<dir>/<feature set>.json`.
    FeatureDump { dir: PathBuf },
    /// Launch an external engine process per feature set.
    Command(CommandEngineConfig),
}

pub(crate) fn build_engine(source: EngineSource) -> Result<Box<dyn ProsodyEngine>, ProsodyError> {
    match source {
        EngineSource::FeatureDump { dir } => Ok(Box::new(FeatureDumpEngine::new(dir)?)),
        EngineSource::Command(config) => Ok(Box::new(CommandEngine::new(config))),
    }
}

pub struct FeatureDumpEngine {
    dir: PathBuf,
}

impl FeatureDumpEngine {
    pub fn new(dir: impl Into<PathBuf>) -> Result<Self, ProsodyError> {
        let dir = dir.into();
        if !dir.is_dir() {
            return Err(ProsodyError::invalid_input(format!(
                "feature dump directory does not exist: {}",
                dir.display()
            )));
        }
        Ok(Self { dir })
    }

    fn table_path(&self, request: &ExtractionRequest<'_>) -> Option<PathBuf> {
        let file_name = format!("{}.json", request.feature_set);
        let per_audio = request
            .audio_path
            .file_stem()
            .map(|stem| self.dir.join(stem).join(&file_name));
        per_audio
            .into_iter()
            .chain(std::iter::once(self.dir.join(&file_name)))
            .find(|path| path.is_file())
    }
}

impl ProsodyEngine for FeatureDumpEngine {
    fn extract(&self, request: &ExtractionRequest<'_>) -> Result<FeatureTable, ProsodyError> {
        let Some(path) = self.table_path(request) else {
            tracing::debug!(
                feature_set = request.feature_set,
                dir = %self.dir.display(),
                "feature dump: no table for feature set"
            );
            return Ok(FeatureTable::default());
        };
        let data = std::fs::read_to_string(&path)
            .map_err(|e| ProsodyError::io("read feature dump", e))?;
        serde_json::from_str(&data).map_err(|e| ProsodyError::json("parse feature dump", e))
    }

    fn engine_label(&self) -> String {
        format!("feature-dump:{}", self.dir.display())
    }
}

pub struct CommandEngine {
    config: CommandEngineConfig,
}

impl CommandEngine {
    pub fn new(config: CommandEngineConfig) -> Self {
        Self { config }
    }

    fn command_args(&self, request: &ExtractionRequest<'_>) -> Vec<String> {
        let audio = request.audio_path.to_string_lossy();
        let annotation = request.annotation_path.to_string_lossy();
        self.config
            .args
            .iter()
            .map(|arg| {
                arg.replace("{audio}", &audio)
                    .replace("{annotation}", &annotation)
                    .replace("{feature_set}", request.feature_set)
            })
            .collect()
    }
}

impl ProsodyEngine for CommandEngine {
    fn extract(&self, request: &ExtractionRequest<'_>) -> Result<FeatureTable, ProsodyError> {
        let feature_set = request.feature_set;
        let mut command = Command::new(&self.config.program);
        command
            .args(self.command_args(request))
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());
        if let Some(dir) = self.config.working_dir.as_deref() {
            command.current_dir(dir);
        }

        let started = Instant::now();
        let mut child = command.spawn().map_err(|e| {
            ProsodyError::engine_call(
                feature_set,
                format!("failed to start '{}': {e}", self.config.program),
            )
        })?;
        let stdout = drain(child.stdout.take());
        let stderr = drain(child.stderr.take());

        let status = wait_with_timeout(&mut child, self.config.timeout())
            .map_err(|e| ProsodyError::engine_call(feature_set, e))?;
        let stdout = join_drain(stdout).map_err(|e| ProsodyError::engine_call(feature_set, e))?;
        let stderr = join_drain(stderr).unwrap_or_default();

        tracing::debug!(
            feature_set,
            elapsed_ms = started.elapsed().as_millis() as u64,
            stdout_bytes = stdout.len(),
            "command engine: process finished"
        );

        if !status.success() {
            return Err(ProsodyError::engine_call(
                feature_set,
                format!("engine exited with {status}: {}", tail(&stderr)),
            ));
        }
        if stdout.iter().all(u8::is_ascii_whitespace) {
            return Ok(FeatureTable::default());
        }
        serde_json::from_slice(&stdout).map_err(|e| {
            ProsodyError::engine_call(feature_set, format!("invalid feature table JSON: {e}"))
        })
    }

    fn engine_label(&self) -> String {
        format!("command:{}", self.config.program)
    }
}

type DrainHandle = JoinHandle<std::io::Result<Vec<u8>>>;

fn drain<R: Read + Send + 'static>(pipe: Option<R>) -> Option<DrainHandle> {
    pipe.map(|mut pipe| {
        thread::spawn(move || {
            let mut buf = Vec::new();
            pipe.read_to_end(&mut buf).map(|_| buf)
        })
    })
}

fn join_drain(handle: Option<DrainHandle>) -> Result<Vec<u8>, String> {
    let Some(handle) = handle else {
        return Ok(Vec::new());
    };
    handle
        .join()
        .map_err(|_| "output reader thread panicked".to_string())?
        .map_err(|e| format!("failed to read engine output: {e}"))
}

fn wait_with_timeout(
    child: &mut Child,
    timeout: Option<Duration>,
) -> Result<std::process::ExitStatus, String> {
    let Some(timeout) = timeout else {
        return child.wait().map_err(|e| format!("failed to wait for engine: {e}"));
    };
    let deadline = Instant::now() + timeout;
    loop {
        match child.try_wait() {
            Ok(Some(status)) => return Ok(status),
            Ok(None) if Instant::now() >= deadline => {
                let _ = child.kill();
                let _ = child.wait();
                return Err(format!("engine timed out after {}s", timeout.as_secs()));
            }
            Ok(None) => thread::sleep(POLL_INTERVAL),
            Err(e) => return Err(format!("failed to poll engine: {e}")),
        }
    }
}

fn tail(stderr: &[u8]) -> String {
    let text = String::from_utf8_lossy(stderr);
    let text = text.trim();
    let skip = text.chars().count().saturating_sub(STDERR_TAIL_CHARS);
    text.chars().skip(skip).collect()
}
