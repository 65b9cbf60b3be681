use anyhow::Context;
use chrono::{NaiveDate, Utc};
use clap::Parser;
use kairos::bodies::{Body, BodySet};
use kairos::config::{discover_source, ConfigResolver};
use kairos::ephemeris::TablePositionProvider;
use kairos::natal::NatalChart;
use kairos::period::{Scope, Tier};
use kairos::pipeline::{BodyFilter, PeriodPipeline, PipelineOptions};
use log::info;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

#[derive(Parser, Debug)]
#[command(author, version, about = "Score transits against a natal chart for one period")]
struct Args {
    /// daily, weekly, monthly or yearly
    #[arg(long, default_value = "daily")]
    scope: Scope,

    /// free or premium
    #[arg(long, default_value = "free")]
    tier: Tier,

    /// Reference date (YYYY-MM-DD); defaults to today in UTC.
    #[arg(long)]
    date: Option<NaiveDate>,

    /// Natal chart JSON: `{"positions": {...}, "house_system": "equal"}` or explicit `cusps`.
    #[arg(long)]
    natal: PathBuf,

    /// Daily ephemeris table JSON: `{"rows": [{"date": ..., "positions": {...}}]}`.
    #[arg(long)]
    ephemeris: PathBuf,

    /// Config directory; falls back to KAIROS_CONFIG_DIR, then the built-in defaults.
    #[arg(long)]
    config_dir: Option<PathBuf>,

    /// Timeout for one position lookup.
    #[arg(long, default_value_t = 5000)]
    timeout_ms: u64,

    /// Comma-separated transit bodies to keep (e.g. `sun,mars,saturn`).
    #[arg(long, value_delimiter = ',')]
    transit: Vec<Body>,

    /// Comma-separated natal bodies to keep.
    #[arg(long, value_delimiter = ',')]
    natal_bodies: Vec<Body>,

    /// Force pretty-printed JSON regardless of the presentation config.
    #[arg(long)]
    pretty: bool,
}

fn body_set(bodies: &[Body]) -> Option<BodySet> {
    if bodies.is_empty() {
        None
    } else {
        Some(bodies.iter().copied().collect())
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    env_logger::init();
    let args = Args::parse();

    let chart = NatalChart::from_path(&args.natal)
        .with_context(|| format!("Failed to load natal chart {}", args.natal.display()))?;
    let table = TablePositionProvider::from_path(&args.ephemeris)
        .with_context(|| format!("Failed to load ephemeris table {}", args.ephemeris.display()))?;
    info!("Loaded {} ephemeris rows", table.len());

    let resolver = Arc::new(ConfigResolver::new(discover_source(args.config_dir.as_deref())));
    info!("Using {} config", resolver.source_name());
    let presentation = resolver
        .presentation(args.scope, args.tier)
        .context("Failed to load presentation config")?;

    let options = PipelineOptions {
        position_timeout: Duration::from_millis(args.timeout_ms),
    };
    let pipeline = PeriodPipeline::with_options(Arc::clone(&resolver), Arc::new(table), options);

    let filter = BodyFilter {
        transit: body_set(&args.transit),
        natal: body_set(&args.natal_bodies),
    };
    let date = args.date.unwrap_or_else(|| Utc::now().date_naive());

    let mut summary = pipeline
        .run(args.scope, args.tier, &chart, date, &filter)
        .await
        .with_context(|| format!("Failed to run {}/{} for {}", args.scope, args.tier, date))?;

    if let Some(limit) = presentation.max_listed_aspects {
        summary.truncate_aspects(limit);
    }

    let json = if args.pretty || presentation.pretty_json {
        serde_json::to_string_pretty(&summary)?
    } else {
        serde_json::to_string(&summary)?
    };
    println!("{}", json);
    Ok(())
}
