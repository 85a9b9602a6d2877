use folio_i18n_core::Locale;
use folio_i18n_toml::{
    DEFAULT_INITIAL_LOAD_TIMEOUT_MS, DEFAULT_STORAGE_KEY, I18nConfig, I18nConfigError,
};
use std::time::Duration;

/// Settings for a [`LocaleManager`](crate::LocaleManager).
///
/// ```
/// use folio_i18n_core::Locale;
/// use folio_i18n_manager::ManagerOptions;
/// use std::time::Duration;
///
/// let options = ManagerOptions::builder()
///     .default_locale(Locale::En)
///     .initial_load_timeout(Duration::from_secs(2))
///     .build();
/// assert_eq!(options.storage_key, "portfolio-locale");
/// ```
#[derive(Clone, Debug, Eq, PartialEq, bon::Builder)]
pub struct ManagerOptions {
    /// Locale used when no valid preference is stored.
    #[builder(default = Locale::DEFAULT)]
    pub default_locale: Locale,

    /// Key of the persisted preference.
    #[builder(into, default = DEFAULT_STORAGE_KEY.to_string())]
    pub storage_key: String,

    /// Upper bound for the first bundle load.
    #[builder(default = Duration::from_millis(DEFAULT_INITIAL_LOAD_TIMEOUT_MS))]
    pub initial_load_timeout: Duration,
}

impl Default for ManagerOptions {
    fn default() -> Self {
        Self::builder().build()
    }
}

impl ManagerOptions {
    pub fn from_config(config: &I18nConfig) -> Result<Self, I18nConfigError> {
        config.validate()?;
        Ok(Self {
            default_locale: config.default_locale()?,
            storage_key: config.storage_key.clone(),
            initial_load_timeout: config.initial_load_timeout(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_config_defaults() {
        let options = ManagerOptions::default();
        assert_eq!(options.default_locale, Locale::Fr);
        assert_eq!(options.storage_key, DEFAULT_STORAGE_KEY);
        assert_eq!(options.initial_load_timeout, Duration::from_secs(5));
    }

    #[test]
    fn from_config_copies_values() {
        let mut config = I18nConfig::new(Locale::En, "i18n");
        config.storage_key = "lang".to_string();
        config.initial_load_timeout_ms = 100;

        let options = ManagerOptions::from_config(&config).unwrap();
        assert_eq!(options.default_locale, Locale::En);
        assert_eq!(options.storage_key, "lang");
        assert_eq!(options.initial_load_timeout, Duration::from_millis(100));
    }

    #[test]
    fn from_config_rejects_invalid_values() {
        let mut config = I18nConfig::new(Locale::En, "i18n");
        config.initial_load_timeout_ms = 0;
        assert!(matches!(
            ManagerOptions::from_config(&config),
            Err(I18nConfigError::InvalidTimeout)
        ));
    }
}
