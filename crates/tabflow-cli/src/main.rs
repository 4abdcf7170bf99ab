//! tabflow CLI: validate, explain, and run declarative pipelines.

mod leaves;

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use clap::{Parser, Subcommand, ValueEnum};
use tabflow_core::config::ExecConfig;
use tabflow_core::types::Value;
use tabflow_io::{read_csv_path, value_to_json, CsvSnapshotObserver, CsvWriter};
use tabflow_operators::{Observers, TracingObserver};
use tabflow_planner::{build, explain, parse_yaml_pipeline, PipelineConfig};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[derive(Parser)]
#[command(name = "tabflow")]
#[command(about = "Composable table-transformation pipelines", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Execute a pipeline over one or more CSV inputs
    Run {
        /// Path to the pipeline YAML file
        #[arg(short, long)]
        pipeline: PathBuf,

        /// CSV files passed to the root operator, in order
        #[arg(short, long = "input", num_args = 1..)]
        inputs: Vec<PathBuf>,

        /// Worker count for parallel composites (overrides config)
        #[arg(long)]
        workers: Option<usize>,

        /// Output format for the pipeline results
        #[arg(long, value_enum, default_value_t = Format::Json)]
        format: Format,

        /// Write every observed output into this directory
        #[arg(long)]
        snapshot_dir: Option<PathBuf>,

        /// Log a summary of every observed output
        #[arg(long)]
        trace: bool,
    },

    /// Validate a pipeline YAML file (parse and build)
    Validate {
        /// Path to the pipeline YAML file
        #[arg(short, long)]
        pipeline: PathBuf,
    },

    /// Show the operator tree of a pipeline
    Explain {
        /// Path to the pipeline YAML file
        #[arg(short, long)]
        pipeline: PathBuf,
    },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum Format {
    Json,
    Csv,
}

type CliResult<T> = Result<T, Box<dyn std::error::Error>>;

fn main() {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Run {
            pipeline,
            inputs,
            workers,
            format,
            snapshot_dir,
            trace,
        } => {
            if let Err(e) = run_pipeline(&pipeline, &inputs, workers, format, snapshot_dir, trace) {
                eprintln!("Error: {}", e);
                std::process::exit(1);
            }
        }
        Commands::Validate { pipeline } => {
            if let Err(e) = validate_pipeline(&pipeline) {
                eprintln!("Validation failed: {}", e);
                std::process::exit(1);
            }
            println!("✓ Pipeline is valid");
        }
        Commands::Explain { pipeline } => {
            if let Err(e) = explain_pipeline(&pipeline) {
                eprintln!("Error: {}", e);
                std::process::exit(1);
            }
        }
    }
}

fn run_pipeline(
    pipeline_path: &Path,
    inputs: &[PathBuf],
    workers: Option<usize>,
    format: Format,
    snapshot_dir: Option<PathBuf>,
    trace: bool,
) -> CliResult<()> {
    let yaml_content = fs::read_to_string(pipeline_path)?;
    let parsed = parse_yaml_pipeline(&yaml_content)?;

    let config = resolve_config(ExecConfig::from_env(), &parsed.config, workers);
    let root = build(&parsed.spec, &leaves::registry(), &config)?;

    let mut observers: Observers = Vec::new();
    if trace {
        observers.push(Arc::new(TracingObserver));
    }
    if let Some(dir) = snapshot_dir {
        observers.push(Arc::new(CsvSnapshotObserver::new(dir)?));
    }
    if !observers.is_empty() {
        root.set_observers(observers);
    }

    let values = inputs
        .iter()
        .map(|p| {
            read_csv_path(p)
                .map(Value::Table)
                .map_err(|e| format!("{}: {}", p.display(), e))
        })
        .collect::<Result<Vec<Value>, String>>()?;

    tracing::info!(inputs = values.len(), workers = config.workers, root = root.name(), "running pipeline");
    let outputs = root.process(values)?;

    let stdout = io::stdout();
    write_outputs(&mut stdout.lock(), &outputs, format)?;
    Ok(())
}

fn write_outputs<W: Write>(out: &mut W, outputs: &[Value], format: Format) -> CliResult<()> {
    match format {
        Format::Json => {
            let doc = serde_json::Value::Array(outputs.iter().map(value_to_json).collect());
            serde_json::to_writer_pretty(&mut *out, &doc)?;
            writeln!(out)?;
        }
        Format::Csv => {
            for (i, value) in outputs.iter().enumerate() {
                if i > 0 {
                    writeln!(out)?;
                }
                match value {
                    Value::Table(t) => {
                        let mut w = CsvWriter::to_writer(&mut *out);
                        w.write_table(t)?;
                        w.into_inner()?;
                    }
                    other => writeln!(out, "{}", value_to_json(other))?,
                }
            }
        }
    }
    Ok(())
}

fn validate_pipeline(pipeline_path: &Path) -> CliResult<()> {
    let yaml_content = fs::read_to_string(pipeline_path)?;
    let parsed = parse_yaml_pipeline(&yaml_content)?;
    let config = resolve_config(ExecConfig::from_env(), &parsed.config, None);
    build(&parsed.spec, &leaves::registry(), &config)?;
    Ok(())
}

fn explain_pipeline(pipeline_path: &Path) -> CliResult<()> {
    let yaml_content = fs::read_to_string(pipeline_path)?;
    let parsed = parse_yaml_pipeline(&yaml_content)?;
    let config = resolve_config(ExecConfig::from_env(), &parsed.config, None);
    let root = build(&parsed.spec, &leaves::registry(), &config)?;

    println!("Pipeline");
    println!("========");
    println!();
    println!("Workers: {} (parallel above {})", config.workers, config.parallel_threshold);
    println!("Print rows: {}", config.print_rows);
    println!();
    print!("{}", explain(&root));
    Ok(())
}

/// Layer settings: environment first, then the document's `config:` block,
/// then command-line flags.
fn resolve_config(env: ExecConfig, doc: &PipelineConfig, workers_flag: Option<usize>) -> ExecConfig {
    let mut cfg = env;
    doc.apply(&mut cfg);
    if let Some(w) = workers_flag {
        cfg.workers = w;
    }
    cfg
}
