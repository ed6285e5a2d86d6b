pub mod cli;
pub mod columns;
pub mod data;
pub mod dataset;
pub mod io_utils;
pub mod report;
pub mod schema;
pub mod table;

use std::{env, sync::OnceLock};

use anyhow::{Context, Result};
use clap::Parser;
use log::{LevelFilter, info};

use crate::{
    cli::{Cli, ColumnsArgs, Commands, ExportArgs, PreviewArgs},
    columns::FixedColumns,
    data::Cell,
    report::Report,
    schema::ReportSchema,
};

static LOGGER: OnceLock<()> = OnceLock::new();

fn init_logging() {
    LOGGER.get_or_init(|| {
        let mut builder = env_logger::Builder::from_env(env_logger::Env::default());
        if env::var("RUST_LOG").is_err() {
            builder.filter_module("request_export", LevelFilter::Info);
        }
        let _ = builder.format_timestamp_millis().try_init();
    });
}

pub fn run() -> Result<()> {
    init_logging();
    let cli = Cli::parse();
    match cli.command {
        Commands::Export(args) => handle_export(&args),
        Commands::Preview(args) => handle_preview(&args),
        Commands::Columns(args) => handle_columns(&args),
    }
}

fn handle_export(args: &ExportArgs) -> Result<()> {
    let dataset = dataset::load(&args.input)?;
    let report = Report::build(&FixedColumns::standard(), &dataset);
    let delimiter = io_utils::resolve_output_delimiter(
        args.output.as_deref(),
        args.output_delimiter,
        io_utils::DEFAULT_CSV_DELIMITER,
    );
    let encoding = io_utils::resolve_encoding(args.output_encoding.as_deref())?;
    info!(
        "Exporting {} request(s) across {} column(s) to {}",
        report.rows().len(),
        report.headers().len(),
        args.output
            .as_deref()
            .map(|p| p.display().to_string())
            .unwrap_or_else(|| "stdout".into())
    );
    io_utils::write_records(
        args.output.as_deref(),
        delimiter,
        encoding,
        &report.into_records(),
    )
    .with_context(|| format!("Writing report for {:?}", args.input))?;
    Ok(())
}

fn handle_preview(args: &PreviewArgs) -> Result<()> {
    let dataset = dataset::load(&args.input)?;
    let report = Report::build(&FixedColumns::standard(), &dataset);
    let total = report.rows().len();
    let shown = args.limit.map_or(total, |limit| limit.min(total));
    table::print_table(report.headers(), &report.rows()[..shown]);
    info!("Previewed {shown} of {total} request row(s)");
    Ok(())
}

fn handle_columns(args: &ColumnsArgs) -> Result<()> {
    let dataset = dataset::load(&args.input)?;
    let fixed = FixedColumns::standard();
    let schema = ReportSchema::infer(&fixed, &dataset.requests, &dataset.catalog);

    let mut rows = Vec::with_capacity(schema.width());
    for (idx, name) in schema.headers().iter().enumerate() {
        let kind = if idx < schema.fixed_count() {
            "fixed"
        } else if idx == schema.fallback_index() {
            "deleted-items"
        } else {
            "item"
        };
        rows.push(vec![
            Cell::Count(idx as u64 + 1),
            Cell::Text(name.clone()),
            Cell::Text(kind.to_string()),
        ]);
    }

    let headers = vec!["#".to_string(), "name".to_string(), "kind".to_string()];
    table::print_table(&headers, &rows);
    info!(
        "Listed {} column(s) inferred from {:?}",
        schema.width(),
        args.input
    );
    Ok(())
}
