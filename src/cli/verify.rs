use super::config::{default_config_path, GateConfig};
use consent_gate::TelegramGateway;
use std::path::PathBuf;

/// Verify the configuration and the bot credential
///
/// - Config file parses
/// - Durations and the expiry ban are valid
/// - A bot token is available
/// - The token is accepted by the Bot API (`getMe`)
pub async fn execute(config_path: Option<String>) -> Result<(), Box<dyn std::error::Error>> {
    let config_path = config_path
        .map(PathBuf::from)
        .unwrap_or_else(default_config_path);

    println!("🔍 Verifying consent-gate setup...");
    println!();

    print!("  Config: ");
    let config = GateConfig::load(&config_path)?;
    println!("✅ Loaded {}", config_path.display());

    print!("  Consent settings: ");
    let settings = config.consent_settings()?;
    println!(
        "✅ timeout {}, expiry {:?}",
        humantime::format_duration(settings.timeout),
        settings.expiry_removal
    );

    print!("  Bot token: ");
    let token = config.bot_token()?;
    println!("✅ Present");

    print!("  Bot API: ");
    let gateway = TelegramGateway::new(&token, &config.telegram.api_url, config.poll_timeout()?)?;
    let identity = gateway.get_me().await?;
    println!(
        "✅ Authenticated as @{} ({})",
        identity.username.as_deref().unwrap_or("<unnamed>"),
        identity.id
    );

    println!();
    println!("✅ All checks passed");
    Ok(())
}
