//! consent-gate configuration file handling
//!
//! Provides default configuration generation and loading for the bot.
//! Configuration files are TOML and live in the user data directory unless
//! `--config` points elsewhere.
//!
//! ## Bot token
//!
//! The token may be written to the file, but the `CONSENT_GATE_BOT_TOKEN`
//! environment variable always wins so that container deployments never need
//! the secret on disk.

use consent_gate::consent::ConsentSettings;
use consent_gate::gateway::Removal;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Environment variable overriding `telegram.token`
pub const TOKEN_ENV_VAR: &str = "CONSENT_GATE_BOT_TOKEN";

/// Default log level
const DEFAULT_LOG_LEVEL: &str = "info";

const DEFAULT_API_URL: &str = "https://api.telegram.org";

/// Platform limits for a timed ban: shorter or longer bans are permanent
const MIN_EXPIRY_BAN: Duration = Duration::from_secs(30);
const MAX_EXPIRY_BAN: Duration = Duration::from_secs(366 * 24 * 3600);

const MIN_TIMEOUT: Duration = Duration::from_secs(1);
const MAX_NOTICE_TTL: Duration = Duration::from_secs(60);

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file '{}': {source}", .path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse config file '{}': {source}", .path.display())]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[error("Failed to write config file '{}': {source}", .path.display())]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Config file '{}' already exists (use --force to overwrite)", .0.display())]
    AlreadyExists(PathBuf),

    #[error("Invalid duration for {field} ('{value}'): {reason}")]
    InvalidDuration {
        field: &'static str,
        value: String,
        reason: String,
    },

    #[error("No bot token: set CONSENT_GATE_BOT_TOKEN or telegram.token")]
    MissingToken,
}

/// consent-gate configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GateConfig {
    /// Telegram Bot API settings
    #[serde(default)]
    pub telegram: TelegramConfig,

    /// Consent flow settings
    #[serde(default)]
    pub consent: ConsentConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Telegram-related configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TelegramConfig {
    /// Bot token (prefer the environment variable)
    pub token: Option<String>,

    /// Bot API base URL
    #[serde(default = "default_api_url")]
    pub api_url: String,

    /// Long polling timeout
    #[serde(default = "default_poll_timeout")]
    pub poll_timeout: String,
}

/// Consent flow configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConsentConfig {
    /// Decision window
    #[serde(default = "default_timeout")]
    pub timeout: String,

    /// Privacy policy link shown in the prompt
    #[serde(default = "default_policy_url")]
    pub policy_url: String,

    /// Consent version tag shown in the prompt
    #[serde(default = "default_version")]
    pub version: String,

    /// Ban length after an unanswered prompt ("0" = removed but may rejoin)
    #[serde(default = "default_expiry_ban")]
    pub expiry_ban: String,

    /// Lifetime of transient confirmations
    #[serde(default = "default_notice_ttl")]
    pub notice_ttl: String,
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error); RUST_LOG takes precedence
    #[serde(default = "default_log_level")]
    pub level: String,
}

fn default_api_url() -> String {
    DEFAULT_API_URL.to_string()
}

fn default_poll_timeout() -> String {
    "30s".to_string()
}

fn default_timeout() -> String {
    "5m".to_string()
}

fn default_policy_url() -> String {
    "https://example.com/privacy".to_string()
}

fn default_version() -> String {
    "1.0".to_string()
}

fn default_expiry_ban() -> String {
    "0".to_string()
}

fn default_notice_ttl() -> String {
    "5s".to_string()
}

fn default_log_level() -> String {
    DEFAULT_LOG_LEVEL.to_string()
}

impl Default for TelegramConfig {
    fn default() -> Self {
        Self {
            token: None,
            api_url: default_api_url(),
            poll_timeout: default_poll_timeout(),
        }
    }
}

impl Default for ConsentConfig {
    fn default() -> Self {
        Self {
            timeout: default_timeout(),
            policy_url: default_policy_url(),
            version: default_version(),
            expiry_ban: default_expiry_ban(),
            notice_ttl: default_notice_ttl(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

/// Parse a human-readable duration ("5m", "30s", "1 hour").
///
/// "0" and "off" mean zero.
pub fn parse_duration(field: &'static str, input: &str) -> Result<Duration, ConfigError> {
    let input = input.trim();
    if input == "off" || input == "0" {
        return Ok(Duration::ZERO);
    }

    humantime::parse_duration(input).map_err(|e| ConfigError::InvalidDuration {
        field,
        value: input.to_string(),
        reason: e.to_string(),
    })
}

fn out_of_range(field: &'static str, value: &str, reason: &str) -> ConfigError {
    ConfigError::InvalidDuration {
        field,
        value: value.to_string(),
        reason: reason.to_string(),
    }
}

impl GateConfig {
    /// Load configuration from a TOML file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let contents = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;

        toml::from_str(&contents).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Validated consent settings
    pub fn consent_settings(&self) -> Result<ConsentSettings, ConfigError> {
        let consent = &self.consent;

        let timeout = parse_duration("consent.timeout", &consent.timeout)?;
        if timeout < MIN_TIMEOUT {
            return Err(out_of_range(
                "consent.timeout",
                &consent.timeout,
                "must be at least 1s",
            ));
        }

        let expiry_ban = parse_duration("consent.expiry_ban", &consent.expiry_ban)?;
        let expiry_removal = if expiry_ban.is_zero() {
            Removal::Reversible
        } else if (MIN_EXPIRY_BAN..=MAX_EXPIRY_BAN).contains(&expiry_ban) {
            Removal::Cooldown(expiry_ban)
        } else {
            return Err(out_of_range(
                "consent.expiry_ban",
                &consent.expiry_ban,
                "must be 0 or between 30s and 366 days",
            ));
        };

        let notice_ttl = parse_duration("consent.notice_ttl", &consent.notice_ttl)?;
        if notice_ttl > MAX_NOTICE_TTL {
            return Err(out_of_range(
                "consent.notice_ttl",
                &consent.notice_ttl,
                "must be at most 1m",
            ));
        }

        Ok(ConsentSettings {
            timeout,
            policy_url: consent.policy_url.clone(),
            version: consent.version.clone(),
            expiry_removal,
            notice_ttl,
        })
    }

    /// Long polling timeout
    pub fn poll_timeout(&self) -> Result<Duration, ConfigError> {
        parse_duration("telegram.poll_timeout", &self.telegram.poll_timeout)
    }

    /// Bot token from the environment, falling back to the config file
    pub fn bot_token(&self) -> Result<String, ConfigError> {
        self.token_with_override(std::env::var(TOKEN_ENV_VAR).ok())
    }

    fn token_with_override(&self, env_token: Option<String>) -> Result<String, ConfigError> {
        env_token
            .or_else(|| self.telegram.token.clone())
            .map(|token| token.trim().to_string())
            .filter(|token| !token.is_empty())
            .ok_or(ConfigError::MissingToken)
    }

    /// Generate default configuration content as a string with comments
    pub fn generate_default_toml() -> String {
        format!(
            r#"# consent-gate configuration
#
# New members are muted until they press "I Consent" on the prompt the bot
# posts. Pending decisions are kept in memory only and are lost on restart.
#
# The bot must be a group admin with the rights to restrict members,
# ban users and delete messages.

[telegram]
# Bot token from @BotFather. Prefer the {TOKEN_ENV_VAR} environment
# variable, which always takes precedence over this value.
# token = "123456:ABC..."

api_url = "{DEFAULT_API_URL}"

# Long polling timeout for getUpdates
poll_timeout = "30s"

[consent]
# How long a new member has to answer before being removed
timeout = "5m"

# Shown in the consent prompt
policy_url = "https://example.com/privacy"
version = "1.0"

# Ban length for members who never answered.
# "0" removes them but lets them rejoin right away; otherwise between
# "30s" and "366days" (the ban is lifted automatically afterwards).
expiry_ban = "0"

# How long confirmations stay visible before deleting themselves
notice_ttl = "5s"

[logging]
# Log level: trace, debug, info, warn, error (RUST_LOG overrides)
level = "{DEFAULT_LOG_LEVEL}"
"#
        )
    }

    /// Create and save a default configuration file
    pub fn create_default(config_path: &Path) -> Result<(), ConfigError> {
        write_file(config_path, &Self::generate_default_toml())
    }
}

fn write_file(path: &Path, contents: &str) -> Result<(), ConfigError> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|source| ConfigError::Write {
            path: parent.to_path_buf(),
            source,
        })?;
    }

    fs::write(path, contents).map_err(|source| ConfigError::Write {
        path: path.to_path_buf(),
        source,
    })
}

/// Get the default config file path (`<data_dir>/consent-gate/config.toml`)
pub fn default_config_path() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("consent-gate")
        .join("config.toml")
}
