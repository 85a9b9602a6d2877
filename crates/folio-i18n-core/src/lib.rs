//! Core functionality for folio-i18n.
//!
//! This crate provides the locale set, the JSON message bundles, the loaders that
//! produce them and the [`Translator`] handed to every section of the page. It
//! holds no global state: managers (see `folio-i18n-manager`) own the current
//! bundle and pass translators down explicitly.

pub mod bundle;
pub mod error;
pub mod loader;
pub mod locale;
pub mod path;
pub mod schema;
pub mod translator;

pub use bundle::{LeafKind, MessageBundle};
pub use error::{LoadError, LocaleError, TranslateError};
pub use loader::{
    BundleLoader, DirectoryBundleLoader, EmbeddedBundleLoader, EmbeddedBundles, MemoizedLoader,
    StaticBundleLoader,
};
pub use locale::Locale;
pub use path::KeyPath;
pub use schema::{KeySchema, ParityIssue, ParityReport, check_parity};
pub use translator::{ArgValue, Args, MissingKeyReporter, Translator};
