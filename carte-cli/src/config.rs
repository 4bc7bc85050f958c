use carte_core::admin::DEFAULT_PASSCODE;
use carte_core::checkout::{DEFAULT_CURRENCY, DEFAULT_SPECIAL_REQUEST_FEE};
use carte_core::{CheckoutOptions, BUNDLED_SEED};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Source of a configuration value
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ConfigSource {
    Default,
    File,
    Environment,
}

impl std::fmt::Display for ConfigSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigSource::Default => write!(f, "default"),
            ConfigSource::File => write!(f, "file"),
            ConfigSource::Environment => write!(f, "environment"),
        }
    }
}

/// A configuration value with its source
#[derive(Debug, Clone, Serialize)]
pub struct ConfigValue<T> {
    pub value: T,
    pub source: ConfigSource,
}

impl<T> ConfigValue<T> {
    pub fn new(value: T, source: ConfigSource) -> Self {
        Self { value, source }
    }
}

/// Checkout hand-off settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CheckoutConfig {
    /// Restaurant phone number receiving orders (digits, optional leading +)
    pub phone: Option<String>,
    /// Currency label shown after amounts
    pub currency: String,
    /// Fee disclosed when a special request is attached (never charged)
    pub special_request_fee: f64,
}

impl Default for CheckoutConfig {
    fn default() -> Self {
        Self {
            phone: None,
            currency: DEFAULT_CURRENCY.to_string(),
            special_request_fee: DEFAULT_SPECIAL_REQUEST_FEE,
        }
    }
}

impl CheckoutConfig {
    pub fn options(&self) -> CheckoutOptions {
        CheckoutOptions {
            currency: self.currency.clone(),
            special_request_fee: self.special_request_fee,
        }
    }
}

/// Application configuration with source tracking
#[derive(Debug, Clone, Serialize)]
pub struct Config {
    /// Directory holding the persisted menu, cart, favorites and stats
    pub data_dir: ConfigValue<PathBuf>,
    /// Admin passcode (a deterrent, not a credential)
    #[serde(skip_serializing)]
    pub admin_passcode: ConfigValue<String>,
    /// Seed menu replacing the bundled one
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seed_file: Option<ConfigValue<PathBuf>>,
    /// Config file path used (if any)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub config_file: Option<PathBuf>,
    /// Checkout configuration
    pub checkout: CheckoutConfig,
}

/// Internal struct for deserializing config file
#[derive(Debug, Deserialize, Default)]
#[serde(default)]
struct ConfigFile {
    data_dir: Option<PathBuf>,
    admin_passcode: Option<String>,
    seed_file: Option<PathBuf>,
    checkout: Option<CheckoutConfig>,
}

impl Config {
    /// Load configuration with priority: env vars > config file > defaults
    pub fn load(config_path: Option<PathBuf>) -> Result<Self, ConfigError> {
        // Start with defaults
        let mut data_dir = ConfigValue::new(Self::default_data_dir(), ConfigSource::Default);
        let mut admin_passcode =
            ConfigValue::new(DEFAULT_PASSCODE.to_string(), ConfigSource::Default);
        let mut seed_file = None;
        let mut config_file = None;
        let mut checkout = CheckoutConfig::default();

        // Try to load from config file
        let path = config_path.unwrap_or_else(Self::default_config_path);
        if path.exists() {
            let contents = std::fs::read_to_string(&path)
                .map_err(|e| ConfigError::ReadError(path.clone(), e))?;
            let file_config: ConfigFile = serde_yaml::from_str(&contents)
                .map_err(|e| ConfigError::ParseError(path.clone(), e))?;

            config_file = Some(path.clone());

            if let Some(dir) = file_config.data_dir {
                data_dir = ConfigValue::new(resolve_relative(&path, dir), ConfigSource::File);
            }
            if let Some(passcode) = file_config.admin_passcode {
                admin_passcode = ConfigValue::new(passcode, ConfigSource::File);
            }
            if let Some(seed) = file_config.seed_file {
                seed_file = Some(ConfigValue::new(
                    resolve_relative(&path, seed),
                    ConfigSource::File,
                ));
            }
            if let Some(checkout_config) = file_config.checkout {
                checkout = checkout_config;
            }
        }

        // Apply environment variable overrides
        if let Ok(dir) = std::env::var("CARTE_DATA_DIR") {
            data_dir = ConfigValue::new(PathBuf::from(dir), ConfigSource::Environment);
        }
        if let Ok(passcode) = std::env::var("CARTE_ADMIN_PASSCODE") {
            admin_passcode = ConfigValue::new(passcode, ConfigSource::Environment);
        }
        if let Ok(seed) = std::env::var("CARTE_SEED_FILE") {
            seed_file = Some(ConfigValue::new(
                PathBuf::from(seed),
                ConfigSource::Environment,
            ));
        }
        if let Ok(phone) = std::env::var("CARTE_CHECKOUT_PHONE") {
            checkout.phone = Some(phone);
        }

        Ok(Self {
            data_dir,
            admin_passcode,
            seed_file,
            config_file,
            checkout,
        })
    }

    /// Seed menu document: the configured seed file, or the bundled menu.
    pub fn seed(&self) -> Result<String, ConfigError> {
        match &self.seed_file {
            Some(seed) => std::fs::read_to_string(&seed.value)
                .map_err(|e| ConfigError::SeedError(seed.value.clone(), e)),
            None => Ok(BUNDLED_SEED.to_string()),
        }
    }

    /// Default config directory (platform-specific):
    /// - Linux: ~/.config/carte/
    /// - macOS: ~/Library/Application Support/carte/
    /// - Windows: %APPDATA%/carte/
    pub fn default_config_dir() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("carte")
    }

    /// Default data directory (platform-specific):
    /// - Linux: ~/.local/share/carte/
    /// - macOS: ~/Library/Application Support/carte/
    /// - Windows: %APPDATA%/carte/
    pub fn default_data_dir() -> PathBuf {
        dirs::data_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("carte")
    }

    /// Default config file path (platform-specific config dir + config.yaml)
    pub fn default_config_path() -> PathBuf {
        Self::default_config_dir().join("config.yaml")
    }
}

/// Resolve relative paths against the config file's directory
fn resolve_relative(config_path: &Path, path: PathBuf) -> PathBuf {
    if path.is_relative() {
        config_path
            .parent()
            .map(|p| p.join(&path))
            .unwrap_or(path)
    } else {
        path
    }
}

#[derive(Debug)]
pub enum ConfigError {
    ReadError(PathBuf, std::io::Error),
    ParseError(PathBuf, serde_yaml::Error),
    SeedError(PathBuf, std::io::Error),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::ReadError(path, e) => {
                write!(f, "Failed to read config file '{}': {}", path.display(), e)
            }
            ConfigError::ParseError(path, e) => {
                write!(f, "Failed to parse config file '{}': {}", path.display(), e)
            }
            ConfigError::SeedError(path, e) => {
                write!(f, "Failed to read seed menu '{}': {}", path.display(), e)
            }
        }
    }
}

impl std::error::Error for ConfigError {}
