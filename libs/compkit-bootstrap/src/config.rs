use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;

/// Main application configuration with strongly-typed global sections
/// and a flexible per-component configuration bag.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct AppConfig {
    /// Application identity and verbosity.
    pub app: AppSection,
    /// Logging configuration (optional, uses defaults if None).
    pub logging: Option<LoggingConfig>,
    /// Plugin discovery (optional, no plugins if None).
    pub plugins: Option<PluginsConfig>,
    /// Per-component configuration bag: category → arbitrary JSON/YAML value.
    #[serde(default)]
    pub components: HashMap<String, serde_json::Value>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct AppSection {
    pub name: String,
    /// Lifecycle events are reported above level 1.
    #[serde(default)]
    pub debug: i32,
    /// Base directory for relative log paths; empty means the working directory.
    #[serde(default)]
    pub home_dir: String,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct PluginsConfig {
    pub dir: String,
    #[serde(default = "default_plugin_symbol")]
    pub symbol: String,
}

fn default_plugin_symbol() -> String {
    "Export".to_string()
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct LoggingConfig {
    pub console_level: String, // "info", "debug", "error", "off"
    #[serde(default)]
    pub file: String, // "logs/app.log", empty disables the file sink
    #[serde(default)]
    pub file_level: String,
    pub max_age_days: Option<u32>,
    #[serde(default)]
    pub max_backups: Option<usize>, // How many files to keep
    #[serde(default)]
    pub max_size_mb: Option<u64>, // Max size of the file in MB
}

impl Default for AppSection {
    fn default() -> Self {
        Self {
            name: "compkit".to_string(),
            debug: 0,
            home_dir: String::new(),
        }
    }
}

/// Create a default logging configuration.
pub fn default_logging_config() -> LoggingConfig {
    LoggingConfig {
        console_level: "info".to_string(),
        file: "logs/compkit.log".to_string(),
        file_level: "debug".to_string(),
        max_age_days: Some(7),
        max_backups: Some(3),
        max_size_mb: Some(100),
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            app: AppSection::default(),
            logging: Some(default_logging_config()),
            plugins: None,
            components: HashMap::new(),
        }
    }
}

impl AppConfig {
    /// Load configuration with layered loading: defaults → YAML file → environment variables.
    pub fn load_layered<P: AsRef<Path>>(config_path: P) -> Result<Self> {
        use figment::{
            providers::{Env, Format, Serialized, Yaml},
            Figment,
        };

        // For layered loading, start from a minimal base where optional sections are None,
        // so they remain None unless explicitly provided by YAML/ENV.
        let base = AppConfig {
            app: AppSection::default(),
            logging: None,
            plugins: None,
            components: HashMap::new(),
        };

        let figment = Figment::new()
            .merge(Serialized::defaults(base))
            .merge(Yaml::file(config_path.as_ref()))
            // Example: APP__APP__DEBUG=2 maps to app.debug
            .merge(Env::prefixed("APP__").split("__"));

        figment
            .extract()
            .with_context(|| "Failed to extract config from figment".to_string())
    }

    /// Load configuration from file or create with default values.
    pub fn load_or_default<P: AsRef<Path>>(config_path: Option<P>) -> Result<Self> {
        match config_path {
            Some(path) => Self::load_layered(path),
            None => Ok(Self::default()),
        }
    }

    /// Serialize configuration to YAML.
    pub fn to_yaml(&self) -> Result<String> {
        serde_yaml::to_string(self).context("Failed to serialize config to YAML")
    }

    /// Apply overrides from command line arguments.
    pub fn apply_cli_overrides(&mut self, args: &CliArgs) {
        if args.verbose > 0 {
            self.app.debug = self.app.debug.max(i32::from(args.verbose));
        }

        // Set console level based on verbose flags.
        let logging = self.logging.get_or_insert_with(default_logging_config);
        logging.console_level = match args.verbose {
            0 => logging.console_level.clone(), // keep
            1 => "debug".to_string(),
            _ => "trace".to_string(),
        };
    }
}

/// Command line arguments structure.
#[derive(Debug, Clone, Default)]
pub struct CliArgs {
    /// Count of `-v` flags.
    pub verbose: u8,
}
