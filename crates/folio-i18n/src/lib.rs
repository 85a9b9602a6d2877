//! Localization for the portfolio site.
//!
//! Ships the French and English message bundles and wires them into a
//! [`LocaleManager`]:
//!
//! ```no_run
//! # async fn run() -> Result<(), folio_i18n::InitError> {
//! use folio_i18n::{Locale, MemoryStore, NoopDocument};
//! use std::sync::Arc;
//!
//! let manager = folio_i18n::start(Arc::new(MemoryStore::new()), Arc::new(NoopDocument)).await?;
//! manager.switch_to(Locale::En).await.ok();
//! println!("{}", manager.translator().text("navbar.home"));
//! # Ok(())
//! # }
//! ```

use rust_embed::RustEmbed;
use std::sync::Arc;

pub use folio_i18n_core::{
    ArgValue, Args, BundleLoader, DirectoryBundleLoader, EmbeddedBundleLoader, EmbeddedBundles,
    KeyPath, KeySchema, LeafKind, LoadError, Locale, LocaleError, MemoizedLoader, MessageBundle,
    MissingKeyReporter, ParityIssue, ParityReport, StaticBundleLoader, TranslateError, Translator,
    check_parity,
};
pub use folio_i18n_manager::{
    DocumentElement, DocumentLang, InitError, JsonFileStore, LocaleManager, LocaleSnapshot,
    ManagerOptions, MemoryStore, NoopDocument, PreferenceStore, StoreError,
};
pub use folio_i18n_toml::{I18nConfig, I18nConfigError};

/// The portfolio's `i18n.toml`.
pub const CONFIG: &str = include_str!("../i18n.toml");

#[derive(RustEmbed)]
#[folder = "i18n/"]
pub struct PortfolioBundles;

impl EmbeddedBundles for PortfolioBundles {}

pub type PortfolioLoader = EmbeddedBundleLoader<PortfolioBundles>;

/// Parses the embedded [`CONFIG`].
pub fn config() -> Result<I18nConfig, I18nConfigError> {
    I18nConfig::from_toml_str(CONFIG)
}

/// Manager options from the embedded [`CONFIG`].
pub fn options() -> Result<ManagerOptions, I18nConfigError> {
    ManagerOptions::from_config(&config()?)
}

/// A loader over the embedded bundles that keeps each locale once loaded.
pub fn loader() -> MemoizedLoader<PortfolioLoader> {
    MemoizedLoader::new(PortfolioLoader::new())
}

/// Initializes a [`LocaleManager`] over the embedded bundles.
///
/// Falls back to [`ManagerOptions::default`] if the embedded configuration
/// does not parse.
pub async fn start(
    store: Arc<dyn PreferenceStore>,
    document: Arc<dyn DocumentLang>,
) -> Result<LocaleManager, InitError> {
    let options = options().unwrap_or_else(|err| {
        tracing::warn!("Ignoring embedded i18n.toml: {}", err);
        ManagerOptions::default()
    });
    LocaleManager::initialize(options, Arc::new(loader()), store, document).await
}
