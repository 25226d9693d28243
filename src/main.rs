use anyhow::Result;
use silversmith::{config::Config, pipeline};
use tracing::info;
use tracing_subscriber::{fmt, EnvFilter};

fn main() -> Result<()> {
    // ─── 1) init logging ─────────────────────────────────────────────
    let env = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    fmt::Subscriber::builder()
        .with_env_filter(env)
        .with_span_events(fmt::format::FmtSpan::CLOSE)
        .init();
    info!("startup");

    // ─── 2) load pipeline configuration ──────────────────────────────
    let config = Config::load(Config::DEFAULT_PATH)?;

    // ─── 3) bronze → silver refresh ──────────────────────────────────
    pipeline::run(&config)?;

    info!("all done");
    Ok(())
}
