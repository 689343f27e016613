//! CSV I/O for the loading and writing collaborators around the pipeline.
//!
//! - **Delimiter resolution**: extension-based auto-detection (`.csv` →
//!   comma, `.tsv` → tab) with manual override support.
//! - **stdin/stdout**: the `-` path convention routes through standard
//!   streams.
//! - **Quoting**: CSV output uses `QuoteStyle::Always` for round-trip safety.

use std::{
    fs::File,
    io::{BufReader, BufWriter, Read, Write},
    path::Path,
};

use anyhow::{Context, Result};
use csv::QuoteStyle;

use crate::model::LongRecord;

pub const DEFAULT_CSV_DELIMITER: u8 = b',';
pub const DEFAULT_TSV_DELIMITER: u8 = b'\t';

pub fn is_dash(path: &Path) -> bool {
    path == Path::new("-")
}

pub fn resolve_input_delimiter(path: &Path, provided: Option<u8>) -> u8 {
    provided.unwrap_or_else(|| match path.extension().and_then(|ext| ext.to_str()) {
        Some(ext) if ext.eq_ignore_ascii_case("tsv") => DEFAULT_TSV_DELIMITER,
        _ => DEFAULT_CSV_DELIMITER,
    })
}

pub fn resolve_output_delimiter(path: Option<&Path>, provided: Option<u8>, fallback: u8) -> u8 {
    if let Some(delim) = provided {
        return delim;
    }
    if let Some(path) = path {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("tsv") => return DEFAULT_TSV_DELIMITER,
            Some(ext) if ext.eq_ignore_ascii_case("csv") => return DEFAULT_CSV_DELIMITER,
            _ => {}
        }
    }
    fallback
}

pub fn open_csv_reader_from_path(
    path: &Path,
    delimiter: u8,
) -> Result<csv::Reader<Box<dyn Read>>> {
    let reader: Box<dyn Read> = if is_dash(path) {
        Box::new(std::io::stdin().lock())
    } else {
        Box::new(BufReader::new(
            File::open(path).with_context(|| format!("Opening input file {path:?}"))?,
        ))
    };
    let mut builder = csv::ReaderBuilder::new();
    builder
        .has_headers(true)
        .delimiter(delimiter)
        .double_quote(true)
        .flexible(true);
    Ok(builder.from_reader(reader))
}

pub fn open_csv_writer(path: Option<&Path>, delimiter: u8) -> Result<csv::Writer<Box<dyn Write>>> {
    let base: Box<dyn Write> = match path {
        Some(p) if !is_dash(p) => Box::new(BufWriter::new(
            File::create(p).with_context(|| format!("Creating output file {p:?}"))?,
        )),
        _ => Box::new(std::io::stdout()),
    };
    let mut builder = csv::WriterBuilder::new();
    builder
        .delimiter(delimiter)
        .quote_style(QuoteStyle::Always)
        .double_quote(true);
    Ok(builder.from_writer(base))
}

/// Reads a wide-format file into its header row and raw string rows, leaving
/// all coercion to the pipeline.
pub fn read_wide_table(path: &Path, delimiter: u8) -> Result<(Vec<String>, Vec<Vec<String>>)> {
    let mut reader = open_csv_reader_from_path(path, delimiter)?;
    let headers = reader
        .headers()
        .with_context(|| format!("Reading header row from {path:?}"))?
        .iter()
        .map(|h| h.to_string())
        .collect::<Vec<_>>();
    let mut rows = Vec::new();
    for (idx, record) in reader.records().enumerate() {
        let record = record.with_context(|| format!("Reading row {}", idx + 2))?;
        rows.push(record.iter().map(|cell| cell.to_string()).collect());
    }
    Ok((headers, rows))
}

pub const LONG_TABLE_HEADERS: [&str; 8] = [
    "country_name",
    "country_code",
    "year",
    "internet_usage",
    "data_source",
    "yoy_growth",
    "growth_category",
    "cagr_3yr",
];

/// Writes the processed long table, one record per country-year. Null
/// metrics render as empty cells.
pub fn write_long_table(
    path: Option<&Path>,
    delimiter: u8,
    rows: &[LongRecord],
) -> Result<()> {
    let mut writer = open_csv_writer(path, delimiter)?;
    writer
        .write_record(LONG_TABLE_HEADERS)
        .context("Writing output header row")?;
    for row in rows {
        writer
            .write_record(long_record_cells(row))
            .with_context(|| {
                format!("Writing row for '{}' {}", row.country_name, row.year)
            })?;
    }
    writer.flush().context("Flushing output")?;
    Ok(())
}

pub fn long_record_cells(row: &LongRecord) -> Vec<String> {
    vec![
        row.country_name.clone(),
        row.country_code.clone(),
        row.year.to_string(),
        format_metric(row.internet_usage),
        row.data_source.map(|s| s.label().to_string()).unwrap_or_default(),
        format_metric(row.yoy_growth),
        row.growth_category
            .map(|c| c.label().to_string())
            .unwrap_or_default(),
        format_metric(row.cagr_3yr),
    ]
}

pub fn format_metric(value: Option<f64>) -> String {
    match value {
        Some(v) if v.fract() == 0.0 => format!("{v:.0}"),
        Some(v) => format!("{v:.4}"),
        None => String::new(),
    }
}
