// src/pipeline.rs
pub mod config;
pub mod context;

use std::fs::File;
use std::io::{BufRead, BufReader, Read};
use std::path::PathBuf;
use std::time::Instant;

use crate::error::ProcessingError;
use crate::metadata::{extract_metadata, MetadataOutcome};
use crate::output_format::{export, output_path};
use crate::pattern_extraction::{extract_line, mine_content_fields, split_message, LineOutcome, LogFields};
use crate::record::Record;
use crate::sanitize::sanitize;
use crate::table::Table;

use config::PipelineConfig;
use context::ProcessingStats;

/// Enrich the grammar fields of one line into a full record
pub fn assemble_record(fields: LogFields) -> (Record, MetadataOutcome) {
    let (message_error, remaining) = split_message(&fields.message_content);
    let content = mine_content_fields(&remaining);
    let metadata = extract_metadata(&remaining);
    let meta = metadata.clone().into_fields();

    let record = Record {
        datetime: fields.datetime,
        message: fields.message,
        product: fields.product,
        product_name: fields.product_name,
        endpoint: fields.endpoint,
        transaction_id: fields.transaction_id,
        flow_id: fields.flow_id,
        service_type: content.service_type,
        kind: content.kind,
        status: content.status,
        metadata_service_type: meta.service_type,
        metadata_type: meta.kind,
        metadata_status: meta.status,
        metadata_name: meta.name,
        metadata_person_type: meta.person_type,
        metadata_msisdn: meta.msisdn,
        metadata_cpf: meta.cpf,
        message_error,
        message_content: sanitize(&remaining),
    };
    (record, metadata)
}

/// Split on `\n`, `\r\n` and lone `\r`, like a text-mode line iterator
pub fn universal_lines(text: &str) -> impl Iterator<Item = &str> {
    let mut rest = text;
    std::iter::from_fn(move || {
        if rest.is_empty() {
            return None;
        }
        match rest.find(|c: char| c == '\r' || c == '\n') {
            Some(idx) => {
                let line = &rest[..idx];
                let skip = if rest[idx..].starts_with("\r\n") { 2 } else { 1 };
                rest = &rest[idx + skip..];
                Some(line)
            }
            None => {
                let line = rest;
                rest = "";
                Some(line)
            }
        }
    })
}

/// Reads a log file line by line into a table and exports it
pub struct LogPipeline {
    config: PipelineConfig,
    stats: ProcessingStats,
}

impl LogPipeline {
    pub fn new(config: PipelineConfig) -> Self {
        LogPipeline {
            config,
            stats: ProcessingStats::default(),
        }
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    pub fn stats(&self) -> &ProcessingStats {
        &self.stats
    }

    /// Turn one physical line into a record, or `None` if it is dropped
    pub fn process_line(&mut self, line: &str) -> Option<Record> {
        let outcome = extract_line(line);
        self.stats.count_line(&outcome);
        if self.config.debug && outcome == LineOutcome::Unmatched {
            tracing::debug!(line = self.stats.lines_seen, "line does not match the log grammar, skipping");
        }

        let LineOutcome::Matched(fields) = outcome else {
            return None;
        };
        let (record, metadata) = assemble_record(fields);
        if metadata.is_found() {
            self.stats.metadata_found += 1;
        }
        Some(record)
    }

    pub fn process_stream<R: BufRead>(&mut self, mut input: R) -> Result<Table, ProcessingError> {
        let start_time = Instant::now();
        let mut table = Table::new();

        let mut content = String::new();
        input
            .read_to_string(&mut content)
            .map_err(|source| ProcessingError::Io {
                path: self.config.input_path.clone(),
                source,
            })?;

        for line in universal_lines(&content) {
            if let Some(record) = self.process_line(line) {
                table.push(record);
            }
        }

        self.stats.processing_time += start_time.elapsed();
        Ok(table)
    }

    /// Read the configured input file; the handle is closed before returning
    pub fn process_file(&mut self) -> Result<Table, ProcessingError> {
        let path = &self.config.input_path;
        let file = File::open(path).map_err(|source| ProcessingError::Io {
            path: path.clone(),
            source,
        })?;
        let reader = BufReader::with_capacity(self.config.buffer_size, file);
        self.process_stream(reader)
    }

    /// Full run: read, assemble, normalise, export. Returns the written path.
    pub fn run(&mut self) -> Result<PathBuf, ProcessingError> {
        let table = self.process_file()?;
        self.stats.log_summary();

        let table = table.finish()?;
        let path = output_path(
            &self.config.output_dir,
            &self.config.input_path,
            &self.config.resolve_run_id(),
            self.config.output_format,
        );
        let written = export(&table, &path, self.config.output_format)?;
        tracing::info!(path = %written.display(), rows = table.len(), "output file written");
        Ok(written)
    }
}
