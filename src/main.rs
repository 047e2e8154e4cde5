use anyhow::{Context, Result};
use tracing::info;

use stats_import::backend::RestBackend;
use stats_import::config::ImportConfig;
use stats_import::import::run_import;
use stats_import::row_source::RowSource;

fn main() -> Result<()> {
    let _ = dotenvy::from_filename(".env.local");
    let _ = dotenvy::from_filename(".env");
    init_tracing()?;

    let args = std::env::args().skip(1).collect::<Vec<_>>();
    let mut cfg = ImportConfig::from_env().context("incomplete configuration")?;
    cfg.apply_args(&args)?;

    info!(
        csv = %cfg.csv_path.display(),
        skip_rows = cfg.skip_rows,
        upsert = cfg.upsert_stats,
        "starting import"
    );

    let backend = RestBackend::new(&cfg)?;
    let rows = RowSource::from_path(&cfg.csv_path, cfg.skip_rows)
        .with_context(|| format!("unable to read {}", cfg.csv_path.display()))?;
    let summary = run_import(&backend, rows);

    println!("Import complete");
    println!("CSV: {}", cfg.csv_path.display());
    println!("Rows: {}", summary.rows_seen);
    println!("Stats submitted: {}", summary.submitted);
    println!("Players created: {}", summary.players_created);
    if summary.skipped > 0 || summary.failed > 0 || summary.unreadable > 0 {
        println!(
            "Skipped: {} Failed: {} Unreadable: {}",
            summary.skipped, summary.failed, summary.unreadable
        );
    }

    Ok(())
}

fn init_tracing() -> Result<()> {
    use tracing_subscriber::EnvFilter;
    use tracing_subscriber::fmt;

    let subscriber = fmt::Subscriber::builder()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("stats_import=info,warn")),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .context("failed to set tracing subscriber")?;

    Ok(())
}
