// Engine main entry point
use anyhow::Context;
use clap::Parser;
use engine::{build_router, CandleEngine, EngineSettings};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[derive(Parser, Debug)]
#[command(name = "candle-engine", version, about = "Hourly candle service over an order book CSV")]
struct Cli {
    /// Configuration file (TOML, JSON or YAML)
    #[arg(short, long, value_name = "FILE")]
    config: Option<String>,

    /// Order book CSV, overrides `data_file`
    #[arg(long, value_name = "FILE")]
    data_file: Option<String>,

    #[arg(long)]
    host: Option<String>,

    #[arg(short, long)]
    port: Option<u16>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "engine=info,candle_engine=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();

    let mut settings = EngineSettings::load(cli.config.as_deref())
        .context("Failed to load engine settings")?;
    if let Some(data_file) = cli.data_file {
        settings.data_file = data_file;
    }
    if let Some(host) = cli.host {
        settings.host = host;
    }
    if let Some(port) = cli.port {
        settings.port = port;
    }

    info!("Starting candle engine v{}...", env!("CARGO_PKG_VERSION"));
    info!(
        data_file = %settings.data_file,
        timezone = %settings.timezone,
        "Candles are computed from the order book file on every request"
    );

    let engine = CandleEngine::from_settings(&settings)?;
    let app = build_router(engine, settings.request_timeout());

    let addr = settings.server_address();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind to {}", addr))?;
    info!("Engine listening on {}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
