use super::config::{default_config_path, ConfigError, GateConfig};
use consent_gate::{ConsentBot, ConsentCoordinator, TelegramGateway};
use std::path::{Path, PathBuf};
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Run the bot service
///
/// ## Configuration Loading
///
/// Configuration is loaded from `--config` if provided, otherwise from
/// `~/.local/share/consent-gate/config.toml`. If the file doesn't exist, a
/// default one is generated (the bot token still has to be supplied).
///
/// ## Token Loading
///
/// 1. `CONSENT_GATE_BOT_TOKEN` environment variable
/// 2. `telegram.token` in the config file
pub async fn execute(config_path: Option<String>) -> Result<(), Box<dyn std::error::Error>> {
    let config_path = config_path
        .map(PathBuf::from)
        .unwrap_or_else(default_config_path);

    let config = load_or_create(&config_path)?;

    // Validate everything before touching the network
    let settings = config.consent_settings()?;
    let poll_timeout = config.poll_timeout()?;
    let token = config.bot_token()?;

    init_logging(&config.logging.level);

    info!(
        config = %config_path.display(),
        timeout = %humantime::format_duration(settings.timeout),
        expiry = ?settings.expiry_removal,
        "Starting consent gate"
    );

    let gateway = TelegramGateway::new(&token, &config.telegram.api_url, poll_timeout)?;
    let identity = gateway.get_me().await?;
    info!(
        bot = identity.username.as_deref().unwrap_or("<unnamed>"),
        "Connected to Telegram"
    );

    let coordinator = ConsentCoordinator::with_tokio_timers(gateway.clone(), settings);
    ConsentBot::new(gateway, coordinator).run().await;

    Ok(())
}

/// Load the config, writing the commented default first if the file is missing
fn load_or_create(config_path: &Path) -> Result<GateConfig, ConfigError> {
    if !config_path.exists() {
        println!("📝 No config file found. Creating default configuration...");
        GateConfig::create_default(config_path)?;
        println!("   Created: {}", config_path.display());
    }
    GateConfig::load(config_path)
}

/// Install the global tracing subscriber. `RUST_LOG` overrides `level`.
pub fn init_logging(level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    // Already installed (tests) is fine
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}
