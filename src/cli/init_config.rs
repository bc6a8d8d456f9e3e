use super::config::{default_config_path, ConfigError, GateConfig};
use std::path::PathBuf;

/// Write the commented default configuration
///
/// Refuses to replace an existing file unless `force` is set.
pub fn execute(config_path: Option<String>, force: bool) -> Result<(), Box<dyn std::error::Error>> {
    let config_path = config_path
        .map(PathBuf::from)
        .unwrap_or_else(default_config_path);

    if config_path.exists() && !force {
        return Err(ConfigError::AlreadyExists(config_path).into());
    }

    GateConfig::create_default(&config_path)?;

    println!("✅ Wrote default configuration to {}", config_path.display());
    println!();
    println!("Next steps:");
    println!("  1. Set CONSENT_GATE_BOT_TOKEN (or telegram.token in the file)");
    println!("  2. Set consent.policy_url to your privacy policy");
    println!("  3. Run: consent-gate verify");

    Ok(())
}
