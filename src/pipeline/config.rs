use std::path::PathBuf;

use crate::output_format::OutputFormat;

/// Length of the random suffix in output file names
pub const RUN_ID_LEN: usize = 8;

/// Configuration for a single conversion run
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    pub input_path: PathBuf,
    pub output_dir: PathBuf,
    pub output_format: OutputFormat,
    /// Fixed output suffix; a random one is drawn when unset
    pub run_id: Option<String>,
    pub buffer_size: usize,
    pub debug: bool,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        PipelineConfig {
            input_path: PathBuf::from("logs.csv"),
            output_dir: PathBuf::from("."),
            output_format: OutputFormat::default(),
            run_id: None,
            buffer_size: 65536, // 64KB
            debug: false,
        }
    }
}

impl PipelineConfig {
    pub fn new(input_path: impl Into<PathBuf>) -> Self {
        PipelineConfig {
            input_path: input_path.into(),
            ..Default::default()
        }
    }

    pub fn resolve_run_id(&self) -> String {
        match &self.run_id {
            Some(id) => id.clone(),
            None => uuid::Uuid::new_v4().simple().to_string()[..RUN_ID_LEN].to_string(),
        }
    }
}
