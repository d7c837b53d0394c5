// src/lib.rs
pub mod error;
pub mod metadata;
pub mod output_format;
pub mod pattern_extraction;
pub mod pipeline;
pub mod record;
pub mod sanitize;
pub mod table;

pub use error::*;
pub use pipeline::*;

pub use output_format::OutputFormat;
pub use pipeline::config::PipelineConfig;
pub use pipeline::context::ProcessingStats;
pub use record::{Record, COLUMNS};
pub use table::{NormalizedTable, Table};
