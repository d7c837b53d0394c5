use std::time::Duration;

use crate::pattern_extraction::LineOutcome;

/// Runtime statistics
#[derive(Debug, Default, Clone, PartialEq)]
pub struct ProcessingStats {
    pub lines_seen: usize,
    pub records_output: usize,
    pub blank_lines: usize,
    pub header_lines: usize,
    pub unmatched_lines: usize,
    pub metadata_found: usize,
    pub processing_time: Duration,
}

impl ProcessingStats {
    /// Count a line by what the extractor made of it
    pub fn count_line(&mut self, outcome: &LineOutcome) {
        self.lines_seen += 1;
        match outcome {
            LineOutcome::Matched(_) => self.records_output += 1,
            LineOutcome::Blank => self.blank_lines += 1,
            LineOutcome::Header => self.header_lines += 1,
            LineOutcome::Unmatched => self.unmatched_lines += 1,
        }
    }

    pub fn lines_skipped(&self) -> usize {
        self.blank_lines + self.header_lines + self.unmatched_lines
    }

    pub fn log_summary(&self) {
        tracing::info!(
            lines_seen = self.lines_seen,
            records = self.records_output,
            skipped = self.lines_skipped(),
            blank = self.blank_lines,
            header = self.header_lines,
            unmatched = self.unmatched_lines,
            metadata = self.metadata_found,
            elapsed = ?self.processing_time,
            "processing finished"
        );
    }
}
