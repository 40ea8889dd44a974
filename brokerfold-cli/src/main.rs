use anyhow::{bail, Context, Result};
use brokerfold_core::{AggregateResult, TracingSink};
use brokerfold_ingest::{process_statement, LinePatterns};
use brokerfold_report::{combine_all, export_month, MonthlyExport};
use clap::Parser;
use std::fs;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{debug, info};

mod config;
mod discover;
mod logging;

#[derive(Parser, Debug)]
#[command(
    name = "brokerfold",
    version = concat!(env!("CARGO_PKG_VERSION"), " (", env!("BROKERFOLD_BUILD_SHA"), ")"),
    about = "Combine a month of ADMIS statements into one activity and positions workbook"
)]
struct Cli {
    /// Statement month, 1-12
    #[arg(short, long, value_parser = clap::value_parser!(u32).range(1..=12))]
    month: u32,

    /// Statement year, e.g. 2016
    #[arg(short, long)]
    year: i32,

    /// Overwrite an existing combined export
    #[arg(long)]
    force: bool,

    /// Statements root holding one YYYY-MM directory per month (overrides config)
    #[arg(long)]
    dir: Option<PathBuf>,

    /// Config file (default: ~/.brokerfold/config.toml if present)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Print the combined records as JSON instead of writing the workbook
    #[arg(long)]
    dump_json: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let cfg = config::load_config(cli.config.as_deref())?;
    logging::init_logging(&cfg.log_level);

    let base = cli.dir.clone().unwrap_or_else(|| cfg.statements_dir.clone());
    let month_dir = discover::month_dir(&base, cli.year, cli.month);
    let files = discover::list_statements(&month_dir)?;
    if files.is_empty() {
        bail!("no statements in {}", month_dir.display());
    }
    info!(dir = %month_dir.display(), statements = files.len(), "processing month");

    let combined = combine_all(parse_all(files).await?);

    if cli.dump_json {
        println!("{}", serde_json::to_string_pretty(&combined)?);
        return Ok(());
    }

    print_summary(&combined);

    let target = MonthlyExport::in_dir(&month_dir, cli.year, cli.month);
    export_month(&combined, &target, cli.force).context("export failed")?;
    println!("Wrote {}", target.path.display());
    Ok(())
}

/// Parse every statement on the blocking pool; results come back in file order.
async fn parse_all(files: Vec<PathBuf>) -> Result<Vec<AggregateResult>> {
    let patterns = Arc::new(LinePatterns::new()?);

    let handles: Vec<_> = files
        .into_iter()
        .map(|path| {
            let patterns = Arc::clone(&patterns);
            tokio::task::spawn_blocking(move || -> Result<AggregateResult> {
                let bytes = fs::read(&path).with_context(|| format!("read {}", path.display()))?;
                debug!(file = %path.display(), bytes = bytes.len(), "read statement");
                let result = process_statement(&path, &bytes, &patterns, &mut TracingSink)
                    .with_context(|| format!("parsing {}", path.display()))?;
                Ok(result.into())
            })
        })
        .collect();

    let mut results = Vec::with_capacity(handles.len());
    for handle in handles {
        results.push(handle.await.context("statement worker failed")??);
    }
    Ok(results)
}

fn print_summary(combined: &AggregateResult) {
    println!(
        "{} activity, {} positions",
        combined.activity.len(),
        combined.positions.len()
    );
    for s in &combined.summary {
        println!("{:<30} {:>15.2}", s.kind.label(), s.amount);
    }
}
