//! Configuration management with layered hierarchy

use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::warn;

/// Year used when the year field is left blank
pub const BUILTIN_DEFAULT_YEAR: i32 = 2024;

/// Price used when the price field is left blank
pub const BUILTIN_DEFAULT_PRICE: f64 = 0.0;

/// whs configuration with layered hierarchy
#[derive(Debug, Default, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Year for new items when none is entered
    pub default_year: Option<i32>,

    /// Price for new items when none is entered
    pub default_price: Option<f64>,

    /// Default output format
    pub default_format: Option<String>,
}

impl Config {
    /// Load configuration from all sources, merging in priority order
    pub fn load(explicit: Option<&Path>) -> Self {
        Self::load_with(
            Self::global_config_path().as_deref(),
            explicit,
            |key| std::env::var(key).ok(),
        )
    }

    /// Load from the given files and environment lookup, later layers winning
    pub fn load_with(
        global: Option<&Path>,
        explicit: Option<&Path>,
        env: impl Fn(&str) -> Option<String>,
    ) -> Self {
        let mut config = Config::default();

        // 1. Built-in defaults (see accessors)

        // 2. Global user config (~/.config/whs/config.yaml)
        if let Some(path) = global {
            if path.exists() {
                if let Some(global) = Self::read_file(path) {
                    config.merge(global);
                }
            }
        }

        // 3. File given on the command line
        if let Some(path) = explicit {
            if let Some(file) = Self::read_file(path) {
                config.merge(file);
            }
        }

        // 4. Environment variables
        if let Some(year) = env("WHS_DEFAULT_YEAR") {
            match year.trim().parse() {
                Ok(year) => config.default_year = Some(year),
                Err(_) => warn!(value = %year, "ignoring invalid WHS_DEFAULT_YEAR"),
            }
        }
        if let Some(price) = env("WHS_DEFAULT_PRICE") {
            match price.trim().parse::<f64>() {
                Ok(price) if price.is_finite() => config.default_price = Some(price),
                _ => warn!(value = %price, "ignoring invalid WHS_DEFAULT_PRICE"),
            }
        }
        if let Some(format) = env("WHS_FORMAT") {
            config.default_format = Some(format);
        }

        config
    }

    fn read_file(path: &Path) -> Option<Config> {
        let contents = match std::fs::read_to_string(path) {
            Ok(contents) => contents,
            Err(e) => {
                warn!(path = %path.display(), error = %e, "could not read config file");
                return None;
            }
        };
        match serde_yml::from_str::<Config>(&contents) {
            Ok(config) => Some(config),
            Err(e) => {
                warn!(path = %path.display(), error = %e, "ignoring malformed config file");
                None
            }
        }
    }

    /// Get the path to the global config file
    fn global_config_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("", "", "whs")
            .map(|dirs| dirs.config_dir().join("config.yaml"))
    }

    /// Merge another config into this one (other takes precedence)
    fn merge(&mut self, other: Config) {
        if other.default_year.is_some() {
            self.default_year = other.default_year;
        }
        if other.default_price.is_some() {
            self.default_price = other.default_price;
        }
        if other.default_format.is_some() {
            self.default_format = other.default_format;
        }
    }

    pub fn default_year(&self) -> i32 {
        self.default_year.unwrap_or(BUILTIN_DEFAULT_YEAR)
    }

    pub fn default_price(&self) -> f64 {
        self.default_price.unwrap_or(BUILTIN_DEFAULT_PRICE)
    }
}
