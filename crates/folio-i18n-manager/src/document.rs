//! The document-level `lang` attribute, updated as a side effect of locale changes.

use parking_lot::RwLock;
use unic_langid::LanguageIdentifier;

pub trait DocumentLang: Send + Sync {
    fn set_lang(&self, lang: &LanguageIdentifier);
}

/// Holds the attribute value so embedders (and tests) can read it back.
#[derive(Debug, Default)]
pub struct DocumentElement {
    lang: RwLock<Option<LanguageIdentifier>>,
}

impl DocumentElement {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn lang(&self) -> Option<LanguageIdentifier> {
        self.lang.read().clone()
    }
}

impl DocumentLang for DocumentElement {
    fn set_lang(&self, lang: &LanguageIdentifier) {
        tracing::debug!("Setting document language to '{}'", lang);
        *self.lang.write() = Some(lang.clone());
    }
}

/// Discards the attribute, for headless use.
#[derive(Debug, Default)]
pub struct NoopDocument;

impl DocumentLang for NoopDocument {
    fn set_lang(&self, _lang: &LanguageIdentifier) {}
}
