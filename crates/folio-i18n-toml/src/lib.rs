//! `i18n.toml` configuration for folio-i18n.
//!
//! ```toml
//! default_locale = "fr"
//! assets_dir = "i18n"
//! storage_key = "portfolio-locale"
//! initial_load_timeout_ms = 5000
//! ```

use folio_i18n_core::{Locale, LocaleError};
use serde::{Deserialize, Serialize};
use std::env;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

/// Storage key used when `i18n.toml` does not set one.
pub const DEFAULT_STORAGE_KEY: &str = "portfolio-locale";

/// Initial bundle load timeout used when `i18n.toml` does not set one.
pub const DEFAULT_INITIAL_LOAD_TIMEOUT_MS: u64 = 5_000;

#[derive(Debug, Error)]
pub enum I18nConfigError {
    /// Configuration file not found.
    #[error("i18n.toml configuration file not found")]
    NotFound,
    /// Failed to read configuration file or assets directory.
    #[error("Failed to read configuration file: {0}")]
    ReadError(#[from] std::io::Error),
    /// Failed to parse configuration file.
    #[error("Failed to parse configuration file: {0}")]
    ParseError(#[from] toml::de::Error),
    /// A locale in the configuration or the assets directory is not supported.
    #[error("Unsupported locale '{name}'")]
    UnsupportedLocale {
        name: String,
        #[source]
        source: LocaleError,
    },
    /// The initial load timeout must be positive.
    #[error("initial_load_timeout_ms must be greater than zero")]
    InvalidTimeout,
}

/// The configuration for folio-i18n.
#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct I18nConfig {
    /// Locale used when no valid preference is stored (e.g. "fr").
    pub default_locale: String,
    /// Path to the directory holding one `{locale}.json` bundle per locale.
    pub assets_dir: PathBuf,
    /// Key under which the chosen locale is persisted.
    #[serde(default = "default_storage_key")]
    pub storage_key: String,
    /// How long the first bundle load may take before initialization fails.
    #[serde(default = "default_initial_load_timeout_ms")]
    pub initial_load_timeout_ms: u64,
}

fn default_storage_key() -> String {
    DEFAULT_STORAGE_KEY.to_string()
}

fn default_initial_load_timeout_ms() -> u64 {
    DEFAULT_INITIAL_LOAD_TIMEOUT_MS
}

impl I18nConfig {
    /// Builds a configuration with default storage key and timeout.
    pub fn new(default_locale: Locale, assets_dir: impl Into<PathBuf>) -> Self {
        Self {
            default_locale: default_locale.code().to_string(),
            assets_dir: assets_dir.into(),
            storage_key: default_storage_key(),
            initial_load_timeout_ms: default_initial_load_timeout_ms(),
        }
    }

    /// Reads the configuration from a path.
    pub fn read_from_path<P: AsRef<Path>>(path: P) -> Result<Self, I18nConfigError> {
        let path = path.as_ref();

        if !path.exists() {
            return Err(I18nConfigError::NotFound);
        }

        let content = fs_err::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    /// Parses and validates configuration text, e.g. an `include_str!`ed file.
    pub fn from_toml_str(content: &str) -> Result<Self, I18nConfigError> {
        let config: I18nConfig = toml::from_str(content)?;
        config.validate()?;

        Ok(config)
    }

    /// Reads the configuration from the manifest directory.
    pub fn read_from_manifest_dir() -> Result<Self, I18nConfigError> {
        let manifest_dir = env::var("CARGO_MANIFEST_DIR").map_err(|_| I18nConfigError::NotFound)?;
        Self::from_manifest_dir(Path::new(&manifest_dir))
    }

    /// Reads `i18n.toml` from the given directory.
    pub fn from_manifest_dir(manifest_dir: &Path) -> Result<Self, I18nConfigError> {
        Self::read_from_path(manifest_dir.join("i18n.toml"))
    }

    /// Checks the values that serde cannot.
    pub fn validate(&self) -> Result<(), I18nConfigError> {
        self.default_locale()?;
        if self.initial_load_timeout_ms == 0 {
            return Err(I18nConfigError::InvalidTimeout);
        }
        Ok(())
    }

    /// Returns the configured default locale.
    pub fn default_locale(&self) -> Result<Locale, I18nConfigError> {
        parse_locale(&self.default_locale)
    }

    pub fn initial_load_timeout(&self) -> Duration {
        Duration::from_millis(self.initial_load_timeout_ms)
    }

    /// Returns the path to the assets directory from a base directory.
    /// If `base_dir` is `None`, uses `CARGO_MANIFEST_DIR` environment variable.
    pub fn assets_dir_from_base(
        &self,
        base_dir: Option<&Path>,
    ) -> Result<PathBuf, I18nConfigError> {
        let base = match base_dir {
            Some(dir) => dir.to_path_buf(),
            None => {
                let manifest_dir =
                    env::var("CARGO_MANIFEST_DIR").map_err(|_| I18nConfigError::NotFound)?;
                PathBuf::from(manifest_dir)
            },
        };

        Ok(base.join(&self.assets_dir))
    }

    /// Returns the locales that have a `{locale}.json` bundle in the assets directory.
    ///
    /// Any other `.json` file is an error: a bundle for an unsupported locale
    /// would never be served.
    pub fn available_locales_from_base(
        &self,
        base_dir: Option<&Path>,
    ) -> Result<Vec<Locale>, I18nConfigError> {
        let assets_path = self.assets_dir_from_base(base_dir)?;

        let mut locales = Vec::new();
        for entry in fs_err::read_dir(&assets_path)? {
            let path = entry?.path();
            if !path.is_file() || path.extension().and_then(|ext| ext.to_str()) != Some("json") {
                continue;
            }
            let Some(stem) = path.file_stem().and_then(|stem| stem.to_str()) else {
                continue;
            };
            locales.push(parse_locale(stem)?);
        }

        locales.sort();
        locales.dedup();
        Ok(locales)
    }
}

fn parse_locale(name: &str) -> Result<Locale, I18nConfigError> {
    name.parse::<Locale>()
        .map_err(|source| I18nConfigError::UnsupportedLocale {
            name: name.to_string(),
            source,
        })
}
