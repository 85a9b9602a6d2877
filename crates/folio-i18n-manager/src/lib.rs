//! Locale manager for folio-i18n.
//!
//! A [`LocaleManager`] owns the current [`Locale`](folio_i18n_core::Locale) and
//! its bundle for one running page. It is created once at startup with
//! [`LocaleManager::initialize`], which doubles as the render gate, and then
//! passed to every component that needs text. Components read a
//! [`Translator`](folio_i18n_core::Translator) from it and re-render when the
//! [`watch`](tokio::sync::watch) channel from [`LocaleManager::subscribe`]
//! reports a change.

pub mod document;
pub mod manager;
pub mod options;
pub mod store;

pub use document::{DocumentElement, DocumentLang, NoopDocument};
pub use manager::{InitError, LocaleManager, LocaleSnapshot};
pub use options::ManagerOptions;
pub use store::{JsonFileStore, MemoryStore, PreferenceStore, StoreError};
