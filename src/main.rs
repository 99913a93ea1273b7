use anyhow::{bail, Context, Result};
use chrono::Local;
use resultscraper::{aggregate, report};
use std::{env, fs::File, path::PathBuf};
use tracing::info;
use tracing_subscriber::{fmt, EnvFilter};

fn main() -> Result<()> {
    // ─── 1) init logging ─────────────────────────────────────────────
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    fmt::Subscriber::builder().with_env_filter(env_filter).init();
    info!("startup");

    // ─── 2) split args into inputs + optional trailing .csv output ──
    let mut inputs: Vec<PathBuf> = env::args_os().skip(1).map(PathBuf::from).collect();
    if inputs.is_empty() {
        bail!("usage: resultscraper <results.html>... [output.csv]");
    }
    let trailing_csv = inputs.len() > 1
        && inputs
            .last()
            .and_then(|path| path.extension())
            .and_then(|ext| ext.to_str())
            .map(|ext| ext.eq_ignore_ascii_case("csv"))
            .unwrap_or(false);
    let output = if trailing_csv {
        inputs.pop().unwrap_or_default()
    } else {
        let stamp = Local::now().format("%d.%m.%y %H-%M");
        PathBuf::from(format!("team_results_{}.csv", stamp))
    };

    // ─── 3) extract + aggregate ──────────────────────────────────────
    info!(files = inputs.len(), "processing batch");
    let results = aggregate::aggregate_files(&inputs);
    if results.is_empty() {
        bail!("no data extracted from any input file");
    }
    info!(
        teams = results.team_count(),
        participants = results.participant_count(),
        "aggregated"
    );

    // ─── 4) write the report ─────────────────────────────────────────
    let rows = report::report_rows(&results);
    let file = File::create(&output)
        .with_context(|| format!("creating report file {}", output.display()))?;
    report::write_csv(&rows, file)?;
    info!(output = %output.display(), "report written");

    Ok(())
}
