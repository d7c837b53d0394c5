use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use rust_xlsxwriter::{ColNum, Format, RowNum, Workbook};

use crate::error::ExportError;
use crate::record::{Record, COLUMNS};
use crate::sanitize::sanitize;
use crate::table::NormalizedTable;

const WORKSHEET_NAME: &str = "logs";

#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    #[value(name = "xlsx", help = "Excel workbook, falling back to CSV if it cannot be written")]
    Xlsx,
    #[value(name = "csv", help = "Comma-separated values")]
    Csv,
}

impl OutputFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            OutputFormat::Xlsx => "xlsx",
            OutputFormat::Csv => "csv",
        }
    }
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "xlsx" => Ok(OutputFormat::Xlsx),
            "csv" => Ok(OutputFormat::Csv),
            _ => Err(format!("Unknown output format: {}", s)),
        }
    }
}

impl Default for OutputFormat {
    fn default() -> Self {
        OutputFormat::Xlsx
    }
}

/// `<dir>/<input stem>-<run id>.<ext>`
pub fn output_path(output_dir: &Path, input_path: &Path, run_id: &str, format: OutputFormat) -> PathBuf {
    let stem = input_path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "logs".to_string());
    output_dir.join(format!("{}-{}.{}", stem, run_id, format.extension()))
}

/// Rows as written: `message_content` sanitized again and `datetime`
/// rendered back to text (empty when it did not parse)
pub fn export_rows(table: &NormalizedTable) -> Vec<Record> {
    table
        .rows()
        .iter()
        .map(|row| Record {
            datetime: row.formatted_datetime(),
            message_content: sanitize(&row.record.message_content),
            ..row.record.clone()
        })
        .collect()
}

/// Write the table, trying the spreadsheet first when asked for one.
/// Returns the path that was actually written.
pub fn export(table: &NormalizedTable, path: &Path, format: OutputFormat) -> Result<PathBuf, ExportError> {
    let rows = export_rows(table);

    match format {
        OutputFormat::Csv => {
            write_csv_file(&rows, path)?;
            Ok(path.to_path_buf())
        }
        OutputFormat::Xlsx => {
            let primary = match write_xlsx(&rows, path) {
                Ok(()) => return Ok(path.to_path_buf()),
                Err(e) => e,
            };
            tracing::warn!(path = %path.display(), error = %primary, "spreadsheet export failed, falling back to CSV");

            let fallback_path = path.with_extension(OutputFormat::Csv.extension());
            match write_csv_file(&rows, &fallback_path) {
                Ok(()) => Ok(fallback_path),
                Err(fallback) => Err(ExportError::Exhausted {
                    primary: Box::new(primary),
                    fallback: Box::new(fallback),
                }),
            }
        }
    }
}

pub fn write_xlsx(rows: &[Record], path: &Path) -> Result<(), ExportError> {
    let mut workbook = Workbook::new();
    let header_format = Format::new().set_bold();

    let worksheet = workbook.add_worksheet();
    worksheet.set_name(WORKSHEET_NAME)?;

    for (col, name) in COLUMNS.iter().enumerate() {
        worksheet.write_string_with_format(0, col as ColNum, *name, &header_format)?;
    }
    for (idx, record) in rows.iter().enumerate() {
        let row = (idx + 1) as RowNum;
        for (col, value) in record.values().iter().enumerate() {
            worksheet.write_string(row, col as ColNum, *value)?;
        }
    }

    workbook.save(path)?;
    Ok(())
}

pub fn write_csv<W: Write>(rows: &[Record], output: W) -> Result<(), ExportError> {
    let mut writer = csv::Writer::from_writer(output);
    if rows.is_empty() {
        writer.write_record(COLUMNS)?;
    }
    for record in rows {
        writer.serialize(record)?;
    }
    writer.flush()?;
    Ok(())
}

pub fn write_csv_file(rows: &[Record], path: &Path) -> Result<(), ExportError> {
    let file = File::create(path)?;
    write_csv(rows, BufWriter::new(file))
}
