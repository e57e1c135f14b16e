//! Decode and lookup commands - inspect scanner payloads

use anyhow::{Context, Result};
use clap::Args;
use serde::Serialize;
use stocktake::{
    decode_detailed, DecodeDetail, MaterialLookup, MaterialRecord, ScanKind, StocktakeConfig,
};

use crate::cli::error::HelpfulError;
use crate::cli::output::print_table;

/// Arguments for the `decode` command
#[derive(Debug, Args)]
pub struct DecodeArgs {
    /// Raw scans (numeric barcodes or GS1 payloads)
    #[arg(required = true)]
    pub raw: Vec<String>,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

/// Arguments for the `lookup` command
#[derive(Debug, Args)]
pub struct LookupArgs {
    /// Raw scan
    pub raw: String,

    /// Warehouse whose catalog is searched
    #[arg(short = 'w', long)]
    pub warehouse: String,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Debug, Serialize)]
struct DecodeRow<'a> {
    raw: &'a str,
    #[serde(flatten)]
    detail: DecodeDetail,
}

#[derive(Debug, Serialize)]
struct LookupResult {
    warehouse: String,
    #[serde(flatten)]
    detail: DecodeDetail,
    material: Option<MaterialRecord>,
}

pub fn run(args: DecodeArgs) -> Result<()> {
    let rows: Vec<DecodeRow<'_>> = args
        .raw
        .iter()
        .map(|raw| DecodeRow {
            raw: raw.as_str(),
            detail: decode_detailed(raw),
        })
        .collect();

    if args.json {
        println!("{}", serde_json::to_string_pretty(&rows)?);
        return Ok(());
    }

    let table_rows: Vec<Vec<String>> = rows
        .into_iter()
        .map(|row| {
            vec![
                row.raw.to_string(),
                row.detail.scan.barcode,
                row.detail.scan.batch,
                row.detail.kind.to_string(),
            ]
        })
        .collect();
    print_table(&["RAW", "BARCODE", "BATCH", "KIND"], table_rows);
    Ok(())
}

pub fn run_lookup(args: LookupArgs, config: &StocktakeConfig) -> Result<()> {
    let warehouse = args.warehouse.trim();
    if !config.catalogs.iter().any(|c| c.warehouse == warehouse) {
        return Err(HelpfulError::new(format!("No catalog configured for warehouse '{}'", warehouse))
            .with_context("Catalogs are listed under [[catalogs]] in the config file")
            .with_suggestion("TRY: Show the loaded configuration: stocktake config")
            .into());
    }

    let detail = decode_detailed(&args.raw);
    if detail.kind == ScanKind::Empty {
        return Err(HelpfulError::new("Nothing was scanned")
            .with_suggestion("TRY: stocktake lookup 6297000859002 --warehouse M02")
            .into());
    }

    let catalog = config
        .build_catalog()
        .context("Failed to load master data catalogs")?;
    let material = catalog.lookup(warehouse, &detail.scan.barcode);

    let result = LookupResult {
        warehouse: warehouse.to_string(),
        detail,
        material,
    };

    if args.json {
        println!("{}", serde_json::to_string_pretty(&result)?);
        return Ok(());
    }

    let (material, description) = match &result.material {
        Some(record) => (record.material.clone(), record.description.clone()),
        None => ("-".to_string(), "not in catalog, enter manually".to_string()),
    };
    print_table(
        &["BARCODE", "BATCH", "MATERIAL", "DESCRIPTION"],
        vec![vec![
            result.detail.scan.barcode.clone(),
            result.detail.scan.batch.clone(),
            material,
            description,
        ]],
    );
    Ok(())
}
