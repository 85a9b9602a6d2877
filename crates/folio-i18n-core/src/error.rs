use crate::locale::Locale;
use std::path::PathBuf;
use thiserror::Error;

/// A locale code outside the supported set.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum LocaleError {
    #[error("Locale '{0}' is not supported (expected one of: fr, en)")]
    Unsupported(String),
}

/// Failure to produce a [`MessageBundle`](crate::MessageBundle) for a locale.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("No message bundle is registered for locale '{0}'")]
    NotFound(Locale),
    #[error("Failed to parse message bundle for '{locale}': {source}")]
    Parse {
        locale: Locale,
        #[source]
        source: serde_json::Error,
    },
    #[error("Invalid UTF-8 in message bundle '{path}' for '{locale}'")]
    InvalidUtf8 { locale: Locale, path: String },
    #[error("Message bundle for '{0}' must be a JSON object at the root")]
    InvalidRoot(Locale),
    #[error("Failed to read message bundle '{}': {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("An underlying bundle backend error occurred: {0}")]
    Backend(#[from] anyhow::Error),
}

/// A key lookup that cannot be satisfied by the current bundle.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum TranslateError {
    #[error("Invalid key path '{0}'")]
    InvalidKey(String),
    #[error("Missing translation key '{key}' in locale '{locale}'")]
    MissingKey { locale: Locale, key: String },
    #[error("Translation key '{key}' in locale '{locale}' is not a string")]
    NotText { locale: Locale, key: String },
    #[error("Translation key '{key}' in locale '{locale}' is not a list of strings")]
    NotList { locale: Locale, key: String },
}

impl TranslateError {
    /// The key the failed lookup was made with.
    pub fn key(&self) -> &str {
        match self {
            Self::InvalidKey(key) => key,
            Self::MissingKey { key, .. } | Self::NotText { key, .. } | Self::NotList { key, .. } => {
                key
            },
        }
    }
}
