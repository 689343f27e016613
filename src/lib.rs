pub mod cli;
pub mod coerce;
pub mod error;
pub mod growth;
pub mod impute;
pub mod io_utils;
pub mod model;
pub mod pipeline;
pub mod reshape;
pub mod table;

use std::{env, sync::OnceLock};

use anyhow::{Context, Result};
use clap::Parser;
use log::{LevelFilter, info};

use crate::cli::{Cli, Commands};

static LOGGER: OnceLock<()> = OnceLock::new();

fn init_logging() {
    LOGGER.get_or_init(|| {
        let mut builder = env_logger::Builder::from_env(env_logger::Env::default());
        if env::var("RUST_LOG").is_err() {
            builder.filter_module("netusage", LevelFilter::Info);
        }
        let _ = builder.format_timestamp_millis().try_init();
    });
}

pub fn run() -> Result<()> {
    init_logging();
    let cli = Cli::parse();
    match cli.command {
        Commands::Process(args) => handle_process(&args),
        Commands::Preview(args) => handle_preview(&args),
    }
}

fn handle_process(args: &cli::ProcessArgs) -> Result<()> {
    let delimiter = io_utils::resolve_input_delimiter(&args.input, args.delimiter);
    info!(
        "Processing '{}' with delimiter '{}'",
        args.input.display(),
        printable_delimiter(delimiter)
    );
    let rows = load_and_process(&args.input, delimiter)?;
    let output_delimiter = io_utils::resolve_output_delimiter(
        args.output.as_deref(),
        args.output_delimiter,
        delimiter,
    );
    io_utils::write_long_table(args.output.as_deref(), output_delimiter, &rows)
        .with_context(|| format!("Writing long table to {:?}", args.output))?;
    info!("Wrote {} processed row(s)", rows.len());
    Ok(())
}

fn handle_preview(args: &cli::PreviewArgs) -> Result<()> {
    let delimiter = io_utils::resolve_input_delimiter(&args.input, args.delimiter);
    let rows = load_and_process(&args.input, delimiter)?;
    print!("{}", table::render_preview(&rows, args.rows));
    info!(
        "Previewed {} of {} processed row(s)",
        args.rows.min(rows.len()),
        rows.len()
    );
    Ok(())
}

fn load_and_process(
    input: &std::path::Path,
    delimiter: u8,
) -> Result<Vec<model::LongRecord>> {
    let (headers, raw_rows) = io_utils::read_wide_table(input, delimiter)
        .with_context(|| format!("Reading wide table from {input:?}"))?;
    let rows = pipeline::process_raw_table(&headers, &raw_rows)
        .with_context(|| format!("Processing {input:?}"))?;
    Ok(rows)
}

pub(crate) fn printable_delimiter(delimiter: u8) -> String {
    match delimiter {
        b',' => ",".to_string(),
        b'\t' => "\\t".to_string(),
        b'\n' => "\\n".to_string(),
        other => (other as char).to_string(),
    }
}
