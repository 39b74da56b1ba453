use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;

use clap::{Parser, ValueEnum};
use indicatif::{ProgressBar, ProgressStyle};
use prosody_labels::{
    CommandEngineConfig, EngineSource, LabelerConfig, LabelingInput, ProsodyCategory,
    ProsodyLabeler, ProsodyLabelerBuilder,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[path = "prosody_labels/csv_result_formatter.rs"]
mod csv_result_formatter;
#[path = "prosody_labels/json_result_formatter.rs"]
mod json_result_formatter;

const AUDIO_EXTENSION: &str = "wav";
const ANNOTATION_EXTENSION: &str = "TextGrid";

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Csv,
    Json,
}

impl OutputFormat {
    fn extension(self) -> &'static str {
        match self {
            Self::Csv => "csv",
            Self::Json => "json",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum EngineChoice {
    /// Read precomputed feature tables from --feature-dir.
    Dump,
    /// Run the external engine described by --engine-config.
    Command,
}

#[derive(Debug, Parser)]
#[command(name = "prosody_labels")]
#[command(about = "Label TextGrid words with categorical prosody from engine features")]
struct Args {
    #[arg(long, env = "PROSODY_LABELS_AUDIO", requires = "annotation")]
    audio: Option<PathBuf>,
    #[arg(long, env = "PROSODY_LABELS_ANNOTATION", requires = "audio")]
    annotation: Option<PathBuf>,
    /// Batch mode: pairs every `<stem>.wav` with `<stem>.TextGrid`.
    #[arg(long, env = "PROSODY_LABELS_INPUT_DIR", conflicts_with_all = ["audio", "annotation"])]
    input_dir: Option<PathBuf>,
    #[arg(
        long,
        env = "PROSODY_LABELS_ENGINE",
        value_enum,
        default_value_t = EngineChoice::Dump
    )]
    engine: EngineChoice,
    #[arg(long, env = "PROSODY_LABELS_FEATURE_DIR")]
    feature_dir: Option<PathBuf>,
    #[arg(long, env = "PROSODY_LABELS_ENGINE_CONFIG")]
    engine_config: Option<PathBuf>,
    #[arg(long, env = "PROSODY_LABELS_OUT_DIR", default_value = "prosody-labels")]
    out_dir: PathBuf,
    #[arg(
        long,
        env = "PROSODY_LABELS_FORMAT",
        value_enum,
        default_value_t = OutputFormat::Csv
    )]
    output_format: OutputFormat,
    /// Comma-separated subset of categories; all six when omitted.
    #[arg(long, env = "PROSODY_LABELS_CATEGORIES", value_delimiter = ',')]
    categories: Vec<ProsodyCategory>,
    #[arg(long, env = "PROSODY_LABELS_KEEP_ANNOTATION", default_value_t = false)]
    keep_annotation: bool,
    #[arg(long, env = "PROSODY_LABELS_LIMIT")]
    limit: Option<usize>,
}

fn main() {
    if let Err(err) = run() {
        eprintln!("prosody_labels: {err}");
        std::process::exit(1);
    }
}

fn run() -> Result<(), String> {
    let args = Args::parse();
    init_logging();

    let mut inputs = collect_inputs(&args)?;
    if let Some(limit) = args.limit {
        inputs.truncate(limit);
    }
    if inputs.is_empty() {
        return Err("No audio/annotation pairs selected.".to_string());
    }

    let labeler = build_labeler(&args)?;
    fs::create_dir_all(&args.out_dir).map_err(|err| {
        format!(
            "Failed to create output directory '{}': {err}",
            args.out_dir.display()
        )
    })?;

    let progress = ProgressBar::new(inputs.len() as u64);
    progress.set_style(
        ProgressStyle::with_template(
            "[{elapsed_precise}] [{wide_bar:.cyan/blue}] {pos}/{len} ({eta}) {msg}",
        )
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("=>-"),
    );
    progress.set_message("starting...");

    let started = Instant::now();
    let mut failed = 0usize;
    for input in &inputs {
        let stem = file_stem(&input.annotation_path);
        progress.set_message(stem.clone());
        if let Err(err) = label_one(&labeler, input, &args, &stem) {
            failed += 1;
            progress.suspend(|| {
                tracing::error!(
                    annotation = %input.annotation_path.display(),
                    error = %err,
                    "labeling failed"
                )
            });
        }
        progress.inc(1);
    }
    progress.finish_with_message("labeling pass complete");
    tracing::info!(
        pairs = inputs.len(),
        failed,
        elapsed_s = started.elapsed().as_secs_f64(),
        out_dir = %args.out_dir.display(),
        "done"
    );

    if failed > 0 {
        return Err(format!("{failed} of {} pairs failed", inputs.len()));
    }
    Ok(())
}

fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();
}

fn build_labeler(args: &Args) -> Result<ProsodyLabeler, String> {
    let engine_source = match args.engine {
        EngineChoice::Dump => {
            let dir = args
                .feature_dir
                .clone()
                .ok_or_else(|| "--engine dump requires --feature-dir.".to_string())?;
            EngineSource::FeatureDump { dir }
        }
        EngineChoice::Command => {
            let path = args
                .engine_config
                .as_ref()
                .ok_or_else(|| "--engine command requires --engine-config.".to_string())?;
            require_path_exists(path, "Missing engine config file.")?;
            EngineSource::Command(CommandEngineConfig::load(path).map_err(|err| err.to_string())?)
        }
    };

    let mut config = LabelerConfig {
        keep_synthesized_annotation: args.keep_annotation,
        ..LabelerConfig::default()
    };
    if !args.categories.is_empty() {
        // Result columns follow the fixed category order, not the flag order.
        config.categories = ProsodyCategory::ALL
            .into_iter()
            .filter(|category| args.categories.contains(category))
            .collect();
    }

    ProsodyLabelerBuilder::new(config)
        .with_engine_source(engine_source)
        .build()
        .map_err(|err| format!("Failed to build labeler: {err}"))
}

fn collect_inputs(args: &Args) -> Result<Vec<LabelingInput>, String> {
    if let Some(dir) = args.input_dir.as_ref() {
        return collect_batch_inputs(dir);
    }
    match (args.audio.as_ref(), args.annotation.as_ref()) {
        (Some(audio), Some(annotation)) => Ok(vec![LabelingInput {
            audio_path: audio.clone(),
            annotation_path: annotation.clone(),
        }]),
        _ => Err("Provide --audio and --annotation, or --input-dir.".to_string()),
    }
}

fn collect_batch_inputs(dir: &Path) -> Result<Vec<LabelingInput>, String> {
    require_path_exists(dir, "Missing input directory.")?;
    let entries = fs::read_dir(dir)
        .map_err(|err| format!("Failed to read input directory '{}': {err}", dir.display()))?;

    let mut audio_paths = Vec::new();
    for entry in entries {
        let path = entry
            .map_err(|err| format!("Failed to read entry in '{}': {err}", dir.display()))?
            .path();
        let is_audio = path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext.eq_ignore_ascii_case(AUDIO_EXTENSION));
        if is_audio && path.is_file() {
            audio_paths.push(path);
        }
    }
    audio_paths.sort();

    let mut inputs = Vec::with_capacity(audio_paths.len());
    for audio_path in audio_paths {
        let annotation_path = audio_path.with_extension(ANNOTATION_EXTENSION);
        if !annotation_path.is_file() {
            tracing::warn!(
                audio = %audio_path.display(),
                "no matching annotation, skipping"
            );
            continue;
        }
        inputs.push(LabelingInput {
            audio_path,
            annotation_path,
        });
    }
    Ok(inputs)
}

fn label_one(
    labeler: &ProsodyLabeler,
    input: &LabelingInput,
    args: &Args,
    stem: &str,
) -> Result<(), String> {
    let table = labeler.label(input).map_err(|err| err.to_string())?;
    let out_path = args
        .out_dir
        .join(format!("{stem}.{}", args.output_format.extension()));
    match args.output_format {
        OutputFormat::Csv => csv_result_formatter::write_results(&out_path, &table),
        OutputFormat::Json => {
            let report = json_result_formatter::LabelingReport::new(
                input,
                &labeler.engine_label(),
                &table,
            );
            json_result_formatter::write_report(&out_path, &report)
        }
    }
}

fn file_stem(path: &Path) -> String {
    path.file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_else(|| "output".to_string())
}

fn require_path_exists(path: &Path, message: &str) -> Result<(), String> {
    if path.exists() {
        return Ok(());
    }
    Err(format!("{message} Missing path: {}", path.display()))
}
