use secrecy::{ExposeSecret, Secret};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::env;

/// Default per-request timeout for partner API calls.
pub const DEFAULT_TIMEOUT_SECONDS: u64 = 10;

#[derive(Debug, Clone)]
pub struct ExchangeConfig {
    pub api_key: Secret<String>,
    pub secret_key: Secret<String>,
    pub passphrase: Option<Secret<String>>,
    pub base_url: Option<String>,
    pub timeout_seconds: u64,
}

// Custom Serialize implementation - never expose secrets in serialization
impl Serialize for ExchangeConfig {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        use serde::ser::SerializeStruct;
        let mut state = serializer.serialize_struct("ExchangeConfig", 5)?;
        state.serialize_field("api_key", "[REDACTED]")?;
        state.serialize_field("secret_key", "[REDACTED]")?;
        state.serialize_field(
            "passphrase",
            &self.passphrase.as_ref().map(|_| "[REDACTED]"),
        )?;
        state.serialize_field("base_url", &self.base_url)?;
        state.serialize_field("timeout_seconds", &self.timeout_seconds)?;
        state.end()
    }
}

impl<'de> Deserialize<'de> for ExchangeConfig {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        #[derive(Deserialize)]
        struct ExchangeConfigHelper {
            api_key: String,
            secret_key: String,
            passphrase: Option<String>,
            base_url: Option<String>,
            timeout_seconds: Option<u64>,
        }

        let helper = ExchangeConfigHelper::deserialize(deserializer)?;
        Ok(Self {
            api_key: Secret::new(helper.api_key),
            secret_key: Secret::new(helper.secret_key),
            passphrase: helper.passphrase.map(Secret::new),
            base_url: helper.base_url,
            timeout_seconds: helper.timeout_seconds.unwrap_or(DEFAULT_TIMEOUT_SECONDS),
        })
    }
}

impl ExchangeConfig {
    /// Create a new configuration with API credentials
    #[must_use]
    pub fn new(api_key: String, secret_key: String) -> Self {
        Self {
            api_key: Secret::new(api_key),
            secret_key: Secret::new(secret_key),
            passphrase: None,
            base_url: None,
            timeout_seconds: DEFAULT_TIMEOUT_SECONDS,
        }
    }

    /// Create configuration from environment variables
    ///
    /// Expected environment variables:
    /// - `{EXCHANGE}_API_KEY` (e.g., `BITGET_API_KEY`)
    /// - `{EXCHANGE}_SECRET_KEY` (e.g., `BITGET_SECRET_KEY`)
    /// - `{EXCHANGE}_PASSPHRASE` (optional, empty values are ignored)
    /// - `{EXCHANGE}_BASE_URL` (optional)
    /// - `{EXCHANGE}_TIMEOUT_SECONDS` (optional, defaults to 10)
    pub fn from_env(exchange_prefix: &str) -> Result<Self, ConfigError> {
        let prefix = exchange_prefix.to_uppercase();
        let api_key_var = format!("{}_API_KEY", prefix);
        let secret_key_var = format!("{}_SECRET_KEY", prefix);

        let api_key = non_empty_var(&api_key_var)
            .ok_or(ConfigError::MissingEnvironmentVariable(api_key_var))?;

        let secret_key = non_empty_var(&secret_key_var)
            .ok_or(ConfigError::MissingEnvironmentVariable(secret_key_var))?;

        let passphrase = non_empty_var(&format!("{}_PASSPHRASE", prefix)).map(Secret::new);
        let base_url = non_empty_var(&format!("{}_BASE_URL", prefix));

        let timeout_var = format!("{}_TIMEOUT_SECONDS", prefix);
        let timeout_seconds = match non_empty_var(&timeout_var) {
            Some(raw) => raw.parse::<u64>().map_err(|e| {
                ConfigError::InvalidConfiguration(format!("{}: {}", timeout_var, e))
            })?,
            None => DEFAULT_TIMEOUT_SECONDS,
        };

        Ok(Self {
            api_key: Secret::new(api_key),
            secret_key: Secret::new(secret_key),
            passphrase,
            base_url,
            timeout_seconds,
        })
    }

    /// Check if this configuration has valid credentials for authenticated operations
    #[must_use]
    pub fn has_credentials(&self) -> bool {
        !self.api_key.expose_secret().is_empty() && !self.secret_key.expose_secret().is_empty()
    }

    /// Set the passphrase
    #[must_use]
    pub fn passphrase(mut self, passphrase: String) -> Self {
        self.passphrase = Some(Secret::new(passphrase));
        self
    }

    /// Set custom base URL
    #[must_use]
    pub fn base_url(mut self, base_url: String) -> Self {
        self.base_url = Some(base_url);
        self
    }

    /// Set the request timeout
    #[must_use]
    pub const fn timeout_seconds(mut self, timeout_seconds: u64) -> Self {
        self.timeout_seconds = timeout_seconds;
        self
    }

    /// Get API key (use carefully - exposes secret)
    pub fn api_key(&self) -> &str {
        self.api_key.expose_secret()
    }

    /// Get secret key (use carefully - exposes secret)
    pub fn secret_key(&self) -> &str {
        self.secret_key.expose_secret()
    }

    /// Get passphrase (use carefully - exposes secret)
    pub fn passphrase_value(&self) -> Option<&str> {
        self.passphrase.as_ref().map(|p| p.expose_secret().as_str())
    }
}

/// Links and handles shown in the chat menu.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MenuConfig {
    pub support_contact: String,
    pub channel_link: String,
    pub welcome_photo_url: String,
    pub bitget_referral_link: String,
    pub bitunix_referral_link: String,
}

impl Default for MenuConfig {
    fn default() -> Self {
        Self {
            support_contact: "@YWFHDD".to_string(),
            channel_link: "https://t.me/+erjKpMQ1izM3MmU1".to_string(),
            welcome_photo_url: "https://postimg.cc/qNBp9NVS".to_string(),
            bitget_referral_link: "https://partner.bitget.cloud/bg/ywfh2025".to_string(),
            bitunix_referral_link: "https://www.bitunix.com/act/partner?landingCode=nuffruqk"
                .to_string(),
        }
    }
}

pub const DEFAULT_REWARD_GROUP_LINK: &str = "https://t.me/+W-zLWXqDxHdlYzZl";

/// Process-wide configuration, loaded once at startup.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub telegram_token: Secret<String>,
    pub bitget: ExchangeConfig,
    pub bitunix: ExchangeConfig,
    pub bitget_referral_code: Option<String>,
    pub reward_group_link: String,
    /// Offset applied when showing registration times to users.
    pub display_utc_offset_hours: i32,
    pub menu: MenuConfig,
}

impl AppConfig {
    /// Load the full configuration from environment variables.
    ///
    /// Fails when the bot token or either exchange's credentials are missing,
    /// or when Bitget has no passphrase.
    pub fn from_env() -> Result<Self, ConfigError> {
        let telegram_token = non_empty_var("TELEGRAM_BOT_TOKEN").ok_or_else(|| {
            ConfigError::MissingEnvironmentVariable("TELEGRAM_BOT_TOKEN".to_string())
        })?;

        let bitget = ExchangeConfig::from_env("BITGET")?;
        if bitget.passphrase.is_none() {
            return Err(ConfigError::MissingEnvironmentVariable(
                "BITGET_PASSPHRASE".to_string(),
            ));
        }
        let bitunix = ExchangeConfig::from_env("BITUNIX")?;

        let display_utc_offset_hours = match non_empty_var("DISPLAY_UTC_OFFSET_HOURS") {
            Some(raw) => {
                let hours = raw.parse::<i32>().map_err(|e| {
                    ConfigError::InvalidConfiguration(format!("DISPLAY_UTC_OFFSET_HOURS: {}", e))
                })?;
                if !(-23..=23).contains(&hours) {
                    return Err(ConfigError::InvalidConfiguration(format!(
                        "DISPLAY_UTC_OFFSET_HOURS out of range: {}",
                        hours
                    )));
                }
                hours
            }
            None => 8,
        };

        let defaults = MenuConfig::default();
        let menu = MenuConfig {
            support_contact: non_empty_var("SUPPORT_CONTACT").unwrap_or(defaults.support_contact),
            channel_link: non_empty_var("CHANNEL_LINK").unwrap_or(defaults.channel_link),
            welcome_photo_url: non_empty_var("WELCOME_PHOTO_URL")
                .unwrap_or(defaults.welcome_photo_url),
            bitget_referral_link: non_empty_var("BITGET_REFERRAL_LINK")
                .unwrap_or(defaults.bitget_referral_link),
            bitunix_referral_link: non_empty_var("BITUNIX_REFERRAL_LINK")
                .unwrap_or(defaults.bitunix_referral_link),
        };

        Ok(Self {
            telegram_token: Secret::new(telegram_token),
            bitget,
            bitunix,
            bitget_referral_code: non_empty_var("BITGET_REFERRAL_CODE"),
            reward_group_link: non_empty_var("FREE_VIP_GROUP_LINK")
                .unwrap_or_else(|| DEFAULT_REWARD_GROUP_LINK.to_string()),
            display_utc_offset_hours,
            menu,
        })
    }

    /// Create configuration from .env file and environment variables
    ///
    /// **Security Warning**: Never commit .env files to version control!
    #[cfg(feature = "env-file")]
    pub fn from_env_file(env_file_path: &str) -> Result<Self, ConfigError> {
        match dotenv::from_path(env_file_path) {
            Ok(()) => {}
            Err(dotenv::Error::Io(io_err)) if io_err.kind() == std::io::ErrorKind::NotFound => {
                // .env file doesn't exist, that's okay - continue with system env vars
            }
            Err(e) => {
                return Err(ConfigError::InvalidConfiguration(format!(
                    "Failed to load .env file '{}': {}",
                    env_file_path, e
                )));
            }
        }

        Self::from_env()
    }

    /// Load configuration with automatic .env file detection
    ///
    /// Tries `.env.local`, then `.env.{ENVIRONMENT}`, then `.env`, loading only
    /// the first file found. Falls back to system environment variables.
    #[cfg(feature = "env-file")]
    pub fn from_env_auto() -> Result<Self, ConfigError> {
        let env_files = [
            ".env.local".to_string(),
            format!(
                ".env.{}",
                env::var("ENVIRONMENT").unwrap_or_else(|_| "development".to_string())
            ),
            ".env".to_string(),
        ];

        for env_file in &env_files {
            match dotenv::from_path(env_file) {
                Ok(()) => break,
                Err(dotenv::Error::Io(io_err)) if io_err.kind() == std::io::ErrorKind::NotFound => {
                    // File doesn't exist, try next
                }
                Err(e) => {
                    return Err(ConfigError::InvalidConfiguration(format!(
                        "Failed to load .env file '{}': {}",
                        env_file, e
                    )));
                }
            }
        }

        Self::from_env()
    }
}

fn non_empty_var(name: &str) -> Option<String> {
    env::var(name).ok().filter(|v| !v.trim().is_empty())
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvironmentVariable(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),
}
