use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use fmtmap_cli::steps::{apply_steps, plan};
use fmtmap_cli::summary::{describe_value, formats_table, preview_table, steps_table};
use fmtmap_core::{FormatCatalog, FormatRegistry};
use fmtmap_frame::values::render_cell;
use fmtmap_frame::{read_csv_text, write_csv};
use polars::prelude::AnyValue;
use tracing::{info, info_span};

use crate::cli::{ApplyArgs, ParseArgs, RenderArgs};

pub fn run_formats() -> Result<()> {
    println!("{}", formats_table(FormatRegistry::global()));
    Ok(())
}

pub fn run_parse(args: &ParseArgs) -> Result<()> {
    let registry = FormatRegistry::global();
    for text in &args.texts {
        let value = registry
            .parse(text, &args.format)
            .with_context(|| format!("parse '{text}' with {}", args.format))?;
        println!("{}", describe_value(&value));
    }
    Ok(())
}

pub fn run_render(args: &RenderArgs) -> Result<()> {
    let registry = FormatRegistry::global();
    let definition = registry.get(&args.format)?;
    for raw in &args.values {
        let text = render_cell(definition.as_ref(), AnyValue::String(raw.as_str()))
            .transpose()
            .with_context(|| format!("render '{raw}' with {}", args.format))?;
        println!("{}", text.unwrap_or_default());
    }
    Ok(())
}

pub fn run_apply(args: &ApplyArgs) -> Result<()> {
    let span = info_span!("apply", input = %args.input.display());
    let _guard = span.enter();

    let catalog = args.catalog.as_deref().map(load_catalog).transpose()?;
    let mut df = read_csv_text(&args.input)
        .with_context(|| format!("read {}", args.input.display()))?;
    info!(rows = df.height(), columns = df.width(), "loaded input");

    let steps = plan(&args.parse, &args.lookup, &args.bin, &args.render);
    let reports = apply_steps(&mut df, &steps, catalog.as_ref(), FormatRegistry::global())?;

    match &args.output {
        Some(path) => {
            write_csv(&mut df, path).with_context(|| format!("write {}", path.display()))?;
            println!("{}", steps_table(&reports));
            println!("Output: {}", path.display());
        }
        None => {
            println!("{}", preview_table(&df, args.rows));
            if df.height() > args.rows {
                println!("({} of {} rows shown)", args.rows, df.height());
            }
        }
    }
    Ok(())
}

fn load_catalog(path: &Path) -> Result<FormatCatalog> {
    let text = fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
    let catalog = FormatCatalog::from_json_str(&text)
        .with_context(|| format!("load catalog {}", path.display()))?;
    info!(
        lookups = catalog.lookup_names().count(),
        bins = catalog.bin_names().count(),
        "loaded catalog"
    );
    Ok(catalog)
}
