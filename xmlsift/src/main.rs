//! xmlsift - inspect and filter XML elements
//!
//! This is the main CLI entry point: it selects a strategy, runs the search
//! or field listing, formats the records and optionally exports them.

mod cli;
mod logging;

use std::io::{self, Write};
use std::process::ExitCode;

use anyhow::{anyhow, Context, Result};
use clap::Parser;
use tracing::{debug, info};
use xmlsift_core::output::{format_field_names, format_field_values, should_use_color};
use xmlsift_core::{
    build_query, format_records, save_local, ElementRecord, ExportFormat, OutputFormat,
    OutputOptions, SearchFilter, StrategyKind,
};

use cli::Args;

fn main() -> ExitCode {
    let args = Args::parse();

    if let Err(e) = logging::init(args.verbose, args.log_file.as_deref()) {
        eprintln!("error: {:#}", e);
        return ExitCode::FAILURE;
    }

    if let Err(e) = run(args) {
        eprintln!("error: {:#}", e);
        return ExitCode::FAILURE;
    }

    ExitCode::SUCCESS
}

fn build_filter(args: &Args) -> SearchFilter {
    SearchFilter::new()
        .with_field_name(args.field.clone())
        .with_field_value(args.value.clone())
        .with_keyword(args.keyword.clone())
}

fn run(args: Args) -> Result<()> {
    // Validate choices before touching the document
    let kind = StrategyKind::parse(&args.strategy)?;
    let format = OutputFormat::from_str(&args.output).ok_or_else(|| {
        anyhow!(
            "invalid format '{}'. Valid formats: {}",
            args.output,
            OutputFormat::valid_formats().join(", ")
        )
    })?;
    let export = args
        .export
        .as_deref()
        .map(str::parse::<ExportFormat>)
        .transpose()?;

    let use_color = if args.no_color {
        false
    } else {
        should_use_color(&args.color)
    };

    let strategy = kind.build();
    let filter = build_filter(&args);
    let json = format == OutputFormat::Json;
    let mut stdout = io::stdout().lock();

    info!(
        event = "filtering",
        strategy = strategy.name(),
        file = %args.file.display(),
        tag = %args.tag,
        "loading document"
    );

    if args.field.is_some() != args.value.is_some() {
        debug!("--field and --value must be given together; field filter ignored");
    }

    if args.list_fields {
        let names = strategy.list_field_names(&args.file, &args.tag)?;
        write!(stdout, "{}", format_field_names(&names, json))?;
        return Ok(());
    }

    if args.list_values {
        let index = strategy.list_field_values(&args.file, &args.tag)?;
        write!(stdout, "{}", format_field_values(&index, json, use_color))?;
        return Ok(());
    }

    if args.show_query {
        writeln!(stdout, "{}", build_query(&args.tag, &filter))?;
    }

    let limit = args.limit.unwrap_or(usize::MAX);
    let records: Vec<ElementRecord> = strategy
        .search(&args.file, &args.tag, &filter)?
        .take(limit)
        .collect::<Result<_, _>>()?;

    info!(event = "filtering", records = records.len(), "search finished");

    let options = OutputOptions {
        message: args.message.clone(),
        use_color,
    };
    write!(stdout, "{}", format_records(&records, format, &options))?;

    if let Some(export) = export {
        let path = save_local(&args.export_dir, &records, export)
            .with_context(|| format!("cannot export to {}", args.export_dir.display()))?;
        eprintln!("saved {} record(s) to {}", records.len(), path.display());
    }

    Ok(())
}
