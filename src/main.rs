use anyhow::{Context, Result};
use bankdeck::{render::RendererChoice, ChartDeck, DeckConfig};
use clap::Parser;
use std::{fs, path::PathBuf, time::Instant};
use tracing::{error, info};
use tracing_subscriber::{fmt, EnvFilter};

/// Render the banking deck charts from their CSV fixtures.
#[derive(Debug, Parser)]
#[command(name = "bankdeck", version)]
struct Args {
    /// YAML config file; every setting has a default.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Directory or http(s) base URL holding `data/*.csv`.
    #[arg(long)]
    data_source: Option<String>,

    /// Directory the rendered SVG surfaces and metrics.json are written to.
    #[arg(long)]
    out: Option<PathBuf>,

    #[arg(long, value_enum)]
    renderer: Option<RendererChoice>,
}

#[tokio::main]
async fn main() -> Result<()> {
    // ─── 1) init logging ─────────────────────────────────────────────
    let env = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    fmt::Subscriber::builder()
        .with_env_filter(env)
        .with_span_events(fmt::format::FmtSpan::CLOSE)
        .init();
    info!("startup");

    // ─── 2) config ───────────────────────────────────────────────────
    let args = Args::parse();
    let mut config = DeckConfig::load(args.config.as_deref())?;
    if let Some(source) = args.data_source {
        config.data_source = source;
    }
    if let Some(out) = args.out {
        config.output_dir = out;
    }
    if let Some(renderer) = args.renderer {
        config.renderer = renderer;
    }
    info!(
        data_source = %config.data_source,
        out = %config.output_dir.display(),
        "config loaded"
    );

    // ─── 3) build the deck & render ──────────────────────────────────
    let deck = ChartDeck::from_config(&config)?;
    let start = Instant::now();
    let report = deck.init_charts().await;
    for (surface, err) in &report.failed {
        error!(surface = %surface, "chart failed: {}", err);
    }
    let metrics = deck.dashboard_metrics().await;
    info!(
        elapsed = ?start.elapsed(),
        revenue = %metrics.revenue_card(),
        "charts and metrics ready"
    );

    // ─── 4) write outputs ────────────────────────────────────────────
    let written = deck.write_surfaces(&config.output_dir)?;
    for path in &written {
        info!("wrote {}", path.display());
    }
    let metrics_path = config.output_dir.join("metrics.json");
    fs::write(&metrics_path, serde_json::to_string_pretty(&metrics)?)
        .with_context(|| format!("writing {}", metrics_path.display()))?;
    info!("wrote {}", metrics_path.display());

    info!("all done");
    Ok(())
}
