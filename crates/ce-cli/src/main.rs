//! Consensus Economics CLI
//!
//! Command-line tool for turning monthly survey workbooks into tidy forecast records.

use ce_core::{
    export, extract_forex_sheet, extract_worksheet, ForexLayout, Format, GridSource, Period,
    ReleaseDate, SheetLayout, WorkbookDir, DEFAULT_ENTITIES,
};
use clap::{Parser, Subcommand};
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};
use tracing_subscriber::{fmt, EnvFilter};

#[derive(Parser)]
#[command(name = "ce-cli")]
#[command(about = "Consensus Economics survey extractor", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List the sheets of a monthly workbook
    Sheets {
        /// Directory holding <YYYYMM>.xlsx workbooks
        #[arg(short, long)]
        root: PathBuf,

        /// Survey period (YYYYMM)
        #[arg(short, long)]
        period: String,
    },

    /// Extract country worksheets into long-format records
    Extract {
        /// Directory holding <YYYYMM>.xlsx workbooks
        #[arg(short, long)]
        root: PathBuf,

        /// Survey periods (YYYYMM)
        #[arg(short, long, required = true)]
        period: Vec<String>,

        /// Country sheets to extract (defaults to every surveyed country)
        #[arg(short, long)]
        entity: Vec<String>,

        /// Sheet layout (JSON); the standard layout is used when omitted
        #[arg(short, long)]
        layout: Option<PathBuf>,

        /// Output format (csv or json)
        #[arg(long, default_value = "csv")]
        format: Format,

        /// Output file path
        #[arg(short, long)]
        output: PathBuf,

        /// File receiving one line per failed worksheet
        #[arg(long)]
        error_log: Option<PathBuf>,
    },

    /// Show the release date parsed from one worksheet
    ReleaseDate {
        /// Directory holding <YYYYMM>.xlsx workbooks
        #[arg(short, long)]
        root: PathBuf,

        /// Survey period (YYYYMM)
        #[arg(short, long)]
        period: String,

        /// Country sheet
        #[arg(short, long)]
        entity: String,
    },

    /// Extract exchange-rate forecasts from the Forex sheet
    Forex {
        /// Directory holding <YYYYMM>.xlsx workbooks
        #[arg(short, long)]
        root: PathBuf,

        /// Survey periods (YYYYMM)
        #[arg(short, long, required = true)]
        period: Vec<String>,

        /// Forex layout (JSON); the standard layout is used when omitted
        #[arg(short, long)]
        layout: Option<PathBuf>,

        /// Output format (csv or json)
        #[arg(long, default_value = "csv")]
        format: Format,

        /// Output file path
        #[arg(short, long)]
        output: PathBuf,
    },

    /// Write the standard sheet layout as a JSON template
    Layout {
        /// Output path for the layout file
        #[arg(short, long)]
        output: PathBuf,
    },
}

fn main() {
    let env = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    fmt().with_env_filter(env).with_writer(std::io::stderr).init();

    if let Err(e) = run() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run() -> ce_core::Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Sheets { root, period } => cmd_sheets(&root, &period),
        Commands::Extract {
            root,
            period,
            entity,
            layout,
            format,
            output,
            error_log,
        } => cmd_extract(&root, &period, &entity, layout.as_deref(), format, &output, error_log.as_deref()),
        Commands::ReleaseDate {
            root,
            period,
            entity,
        } => cmd_release_date(&root, &period, &entity),
        Commands::Forex {
            root,
            period,
            layout,
            format,
            output,
        } => cmd_forex(&root, &period, layout.as_deref(), format, &output),
        Commands::Layout { output } => cmd_layout(&output),
    }
}

fn cmd_sheets(root: &Path, period: &str) -> ce_core::Result<()> {
    let period = Period::parse(period)?;
    let mut source = WorkbookDir::new(root);
    let names = source.sheet_names(&period.to_string())?;

    println!("{} ({} sheets):", source.path_for(&period.to_string()).display(), names.len());
    for name in &names {
        println!("  {}", name);
    }

    Ok(())
}

/// Unique (period, entity) work items in first-seen order
fn work_items(periods: &[String], entities: &[String]) -> Vec<(String, String)> {
    let entities: Vec<String> = if entities.is_empty() {
        DEFAULT_ENTITIES.iter().map(|e| e.to_string()).collect()
    } else {
        entities.iter().map(|e| e.trim().to_string()).collect()
    };

    let mut seen = HashSet::new();
    periods
        .iter()
        .flat_map(|p| entities.iter().map(move |e| (p.trim().to_string(), e.clone())))
        .filter(|item| seen.insert(item.clone()))
        .collect()
}

fn cmd_extract(
    root: &Path,
    periods: &[String],
    entities: &[String],
    layout_path: Option<&Path>,
    format: Format,
    output: &Path,
    error_log: Option<&Path>,
) -> ce_core::Result<()> {
    let layout = match layout_path {
        Some(path) => SheetLayout::load(path)?,
        None => SheetLayout::default(),
    };
    let mut source = WorkbookDir::new(root);

    let items = work_items(periods, entities);
    info!(items = items.len(), "extracting worksheets");

    let mut records = Vec::new();
    let mut failures = Vec::new();

    for (period, entity) in &items {
        // Workbooks are named after their period
        match extract_worksheet(&mut source, period, entity, period, &layout) {
            Ok(sheet_records) if sheet_records.is_empty() => {
                debug!(%period, %entity, "no data");
            }
            Ok(sheet_records) => {
                info!(%period, %entity, records = sheet_records.len(), "extracted");
                records.extend(sheet_records);
            }
            Err(e) => {
                warn!(%period, %entity, error = %e, "worksheet failed");
                failures.push(format!("Error processing {} for {}: {}", period, entity, e));
            }
        }
    }

    export::save(&records, output, format)?;
    println!("Exported {} records to {}", records.len(), output.display());

    if !failures.is_empty() {
        println!("\n{} of {} worksheets failed", failures.len(), items.len());
        if let Some(path) = error_log {
            fs::write(path, failures.join("\n") + "\n")?;
            println!("Failures written to {}", path.display());
        }
    }

    Ok(())
}

fn cmd_release_date(root: &Path, period: &str, entity: &str) -> ce_core::Result<()> {
    let period = Period::parse(period)?;
    let mut source = WorkbookDir::new(root);
    let grid = source.load(&period.to_string(), entity.trim())?;

    let release_date = ReleaseDate::from_grid(&grid);
    println!("Period: {}", period);
    println!("Entity: {}", entity.trim());
    println!("Release date: {}", release_date);
    if release_date.is_sentinel() {
        println!("(no parseable date found)");
    }

    Ok(())
}

fn cmd_forex(
    root: &Path,
    periods: &[String],
    layout_path: Option<&Path>,
    format: Format,
    output: &Path,
) -> ce_core::Result<()> {
    let layout = match layout_path {
        Some(path) => ForexLayout::load(path)?,
        None => ForexLayout::default(),
    };
    let mut source = WorkbookDir::new(root);

    let mut records = Vec::new();
    let mut failed = 0;
    let mut seen = HashSet::new();

    for period in periods.iter().map(|p| p.trim()).filter(|p| seen.insert(p.to_string())) {
        match extract_forex_sheet(&mut source, period, period, &layout) {
            Ok(period_records) => {
                info!(%period, records = period_records.len(), "extracted forex");
                records.extend(period_records);
            }
            Err(e) => {
                warn!(%period, error = %e, "forex sheet failed");
                failed += 1;
            }
        }
    }

    export::save(&records, output, format)?;
    println!("Exported {} forex records to {}", records.len(), output.display());
    if failed > 0 {
        println!("{} period(s) failed, see log output", failed);
    }

    Ok(())
}

fn cmd_layout(output: &Path) -> ce_core::Result<()> {
    SheetLayout::default().save(output)?;
    println!("Created layout file: {}", output.display());
    println!();
    println!("Edit the file to match your sheets, then run:");
    println!("  ce-cli extract --root <dir> --period <YYYYMM> --layout {} --output <file>", output.display());

    Ok(())
}
