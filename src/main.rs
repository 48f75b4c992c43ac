use clap::Parser;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use scanwarte::{app, cli::Cli, config};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Logging (nur tägliche Datei-Rotation unter ./logs, stdout gehört dem Terminal-UI)
    std::fs::create_dir_all("logs").ok();
    let file_appender = tracing_appender::rolling::daily("logs", "scanwarte.log");
    let (file_nb, file_guard) = tracing_appender::non_blocking(file_appender);
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "info,reqwest=warn".into());
    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer().with_ansi(false).with_writer(file_nb))
        .init();
    // Guards am Leben halten (nicht fallen lassen), damit Non-Blocking Writer korrekt flushen
    let _log_guards = file_guard;

    // Load configuration (embedded defaults -> scanwarte.toml -> env/.env)
    let mut app_cfg = config::load()?;
    if let Some(base_url) = cli.base_url {
        let base_url = base_url.trim_end_matches('/').to_string();
        if !base_url.starts_with("http://") && !base_url.starts_with("https://") {
            return Err(anyhow::anyhow!(
                "--base-url must start with http:// or https://, got '{}'",
                base_url
            ));
        }
        app_cfg.server.base_url = base_url;
    }

    info!(job_id = %cli.job_id, base_url = %app_cfg.server.base_url, "Scanwarte starting");
    app::run(&app_cfg, cli.job_id, cli.sort).await?;
    info!(job_id = %cli.job_id, "Scanwarte exited");

    Ok(())
}
