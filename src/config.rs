use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub base_url: String,
    pub connect_timeout_ms: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct UiConfig {
    pub tick_ms: u64,
    pub notice_ttl_ms: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ThumbnailConfig {
    pub cache_capacity: usize,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub ui: UiConfig,
    pub thumbnails: ThumbnailConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        // Fallback: parse the embedded default TOML
        let defaults: &str = include_str!("../config/default.toml");
        match ::config::Config::builder()
            .add_source(::config::File::from_str(defaults, ::config::FileFormat::Toml))
            .build()
        {
            Ok(cfg) => match cfg.try_deserialize() {
                Ok(app_cfg) => app_cfg,
                Err(e) => {
                    eprintln!("FATAL: Failed to deserialize default config: {}", e);
                    panic!("Failed to deserialize default config: {}", e);
                }
            },
            Err(e) => {
                eprintln!("FATAL: Failed to parse default config: {}", e);
                panic!("Failed to parse default config: {}", e);
            }
        }
    }
}

pub fn load() -> anyhow::Result<AppConfig> {
    // Load .env first (optional)
    let _ = dotenvy::dotenv();

    let defaults: &str = include_str!("../config/default.toml");
    let mut builder = ::config::Config::builder()
        .add_source(::config::File::from_str(defaults, ::config::FileFormat::Toml))
        // Optional local file: scanwarte.toml (in CWD)
        .add_source(::config::File::with_name("scanwarte").required(false));

    if let Ok(custom_path) = std::env::var("SCANWARTE_CONFIG") {
        builder = builder.add_source(::config::File::with_name(&custom_path).required(false));
    }
    // Environment variables last to have highest precedence
    builder = builder.add_source(::config::Environment::with_prefix("SCANWARTE").separator("__"));

    let cfg = builder.build()?;
    let mut app_cfg: AppConfig = cfg.try_deserialize()?;
    normalize(&mut app_cfg);
    validate(&app_cfg)?;
    Ok(app_cfg)
}

/// Strips trailing slashes so path joins produce exactly one separator.
fn normalize(cfg: &mut AppConfig) {
    while cfg.server.base_url.ends_with('/') {
        cfg.server.base_url.pop();
    }
}

fn validate(cfg: &AppConfig) -> anyhow::Result<()> {
    // Server
    if cfg.server.base_url.is_empty() {
        return Err(anyhow::anyhow!("server.base_url must not be empty"));
    }
    if !cfg.server.base_url.starts_with("http://") && !cfg.server.base_url.starts_with("https://") {
        return Err(anyhow::anyhow!(
            "server.base_url must start with http:// or https://, got '{}'",
            cfg.server.base_url
        ));
    }
    if cfg.server.connect_timeout_ms == 0 {
        return Err(anyhow::anyhow!("server.connect_timeout_ms must be > 0"));
    }

    // UI
    if cfg.ui.tick_ms == 0 {
        return Err(anyhow::anyhow!("ui.tick_ms must be > 0"));
    }
    if cfg.ui.tick_ms > 10_000 {
        return Err(anyhow::anyhow!("ui.tick_ms must be <= 10000"));
    }
    if cfg.ui.notice_ttl_ms == 0 {
        return Err(anyhow::anyhow!("ui.notice_ttl_ms must be > 0"));
    }

    // Thumbnails
    if cfg.thumbnails.cache_capacity == 0 {
        return Err(anyhow::anyhow!("thumbnails.cache_capacity must be > 0"));
    }

    Ok(())
}
