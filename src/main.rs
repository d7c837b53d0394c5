use clap::Parser;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

use logsheet::{LogPipeline, OutputFormat, PipelineConfig, ProcessingError};

#[derive(Parser)]
#[command(name = "logsheet")]
#[command(about = "Convert pipe-delimited service logs into a spreadsheet")]
#[command(version)]
struct Args {
    /// Log file to convert
    #[arg(value_name = "INPUT")]
    input_file: PathBuf,

    /// Directory the output file is written to
    #[arg(short = 'o', long = "output-dir", default_value = ".")]
    output_dir: PathBuf,

    /// Output format
    #[arg(short = 'F', long = "format", value_enum, default_value = "xlsx")]
    format: OutputFormat,

    /// Use this suffix instead of a random 8-character id
    #[arg(long, value_name = "ID")]
    run_id: Option<String>,

    /// Buffer size for I/O
    #[arg(long, default_value = "65536")] // 64KB
    buffer_size: usize,

    /// Debug mode - show per-line diagnostics
    #[arg(long, conflicts_with = "quiet")]
    debug: bool,

    /// Only report errors
    #[arg(short = 'q', long)]
    quiet: bool,
}

impl Args {
    fn log_level(&self) -> &'static str {
        if self.debug {
            "debug"
        } else if self.quiet {
            "error"
        } else {
            "info"
        }
    }

    fn into_config(self) -> PipelineConfig {
        PipelineConfig {
            input_path: self.input_file,
            output_dir: self.output_dir,
            output_format: self.format,
            run_id: self.run_id,
            buffer_size: self.buffer_size,
            debug: self.debug,
        }
    }
}

fn init_tracing(default_level: &str) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stdout)
        .with_target(false)
        .init();
}

fn main() {
    let args = Args::parse();
    init_tracing(args.log_level());

    let exit_code = match run(args) {
        Ok(path) => {
            tracing::debug!(path = %path.display(), "done");
            0
        }
        Err(e) => match e.downcast_ref::<ProcessingError>() {
            Some(ProcessingError::NoRecords) => {
                tracing::warn!("no matching lines were found, no output file written");
                2
            }
            _ => {
                tracing::error!("{:#}", e);
                1
            }
        },
    };
    std::process::exit(exit_code);
}

fn run(args: Args) -> anyhow::Result<PathBuf> {
    let mut pipeline = LogPipeline::new(args.into_config());
    let path = pipeline.run()?;
    Ok(path)
}
