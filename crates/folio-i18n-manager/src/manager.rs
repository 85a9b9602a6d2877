use crate::document::DocumentLang;
use crate::options::ManagerOptions;
use crate::store::PreferenceStore;
use folio_i18n_core::{
    BundleLoader, LoadError, Locale, MessageBundle, MissingKeyReporter, Translator,
};
use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;
use thiserror::Error;
use tokio::sync::watch;
use tokio::task::JoinHandle;

/// Failure of the initial load; the page should show an error state instead of nothing.
#[derive(Debug, Error)]
pub enum InitError {
    #[error("Failed to load the '{locale}' message bundle: {source}")]
    Load {
        locale: Locale,
        #[source]
        source: LoadError,
    },
    #[error("Loading the '{locale}' message bundle timed out after {timeout:?}")]
    Timeout { locale: Locale, timeout: Duration },
}

/// What every subscriber sees: the selected locale and the bundle being served.
///
/// Right after a switch `locale` already names the new language while
/// `bundle` still holds the previous one; `pending` stays `true` until the
/// new bundle arrives or its load fails.
#[derive(Clone, Debug)]
pub struct LocaleSnapshot {
    pub locale: Locale,
    pub bundle: Arc<MessageBundle>,
    pub pending: bool,
    pub last_error: Option<Arc<LoadError>>,
}

impl LocaleSnapshot {
    /// Whether the served bundle belongs to the selected locale.
    pub fn is_consistent(&self) -> bool {
        self.bundle.locale() == self.locale
    }
}

struct Inner {
    options: ManagerOptions,
    loader: Arc<dyn BundleLoader>,
    store: Arc<dyn PreferenceStore>,
    document: Arc<dyn DocumentLang>,
    reporter: Arc<MissingKeyReporter>,
    state: watch::Sender<LocaleSnapshot>,
    latest_request: AtomicU64,
}

/// Owns the current locale and bundle of one running page.
///
/// Cloning is cheap and every clone drives the same state.
#[derive(Clone)]
pub struct LocaleManager {
    inner: Arc<Inner>,
}

impl fmt::Debug for LocaleManager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let snapshot = self.snapshot();
        f.debug_struct("LocaleManager")
            .field("locale", &snapshot.locale)
            .field("bundle_locale", &snapshot.bundle.locale())
            .field("pending", &snapshot.pending)
            .field("loader", &self.inner.loader.name())
            .finish_non_exhaustive()
    }
}

impl LocaleManager {
    /// Reads the stored preference and loads its bundle.
    ///
    /// Nothing should render until this resolves. A stored locale whose
    /// bundle fails to load falls back once to the default locale; each
    /// attempt is bounded by [`ManagerOptions::initial_load_timeout`].
    pub async fn initialize(
        options: ManagerOptions,
        loader: Arc<dyn BundleLoader>,
        store: Arc<dyn PreferenceStore>,
        document: Arc<dyn DocumentLang>,
    ) -> Result<Self, InitError> {
        let stored = store.get(&options.storage_key);
        let preferred = Locale::from_stored(stored.as_deref(), options.default_locale);

        let (locale, bundle) = match load_with_timeout(&options, loader.as_ref(), preferred).await {
            Ok(bundle) => (preferred, bundle),
            Err(err) if preferred != options.default_locale => {
                let fallback = options.default_locale;
                tracing::warn!("{}; falling back to '{}'", err, fallback);
                (
                    fallback,
                    load_with_timeout(&options, loader.as_ref(), fallback).await?,
                )
            },
            Err(err) => return Err(err),
        };

        document.set_lang(&locale.language_identifier());
        tracing::info!(
            "Locale manager ready with '{}' (loader: {})",
            locale,
            loader.name()
        );

        let (state, _) = watch::channel(LocaleSnapshot {
            locale,
            bundle,
            pending: false,
            last_error: None,
        });

        Ok(Self {
            inner: Arc::new(Inner {
                options,
                loader,
                store,
                document,
                reporter: Arc::new(MissingKeyReporter::new()),
                state,
                latest_request: AtomicU64::new(0),
            }),
        })
    }

    pub fn current(&self) -> Locale {
        self.inner.state.borrow().locale
    }

    pub fn snapshot(&self) -> LocaleSnapshot {
        self.inner.state.borrow().clone()
    }

    pub fn options(&self) -> &ManagerOptions {
        &self.inner.options
    }

    /// A translator bound to the bundle served right now.
    pub fn translator(&self) -> Translator {
        let bundle = self.inner.state.borrow().bundle.clone();
        Translator::with_reporter(bundle, self.inner.reporter.clone())
    }

    /// Change notifications for re-rendering.
    pub fn subscribe(&self) -> watch::Receiver<LocaleSnapshot> {
        self.inner.state.subscribe()
    }

    /// Switches the locale.
    ///
    /// The new locale is reported immediately, persisted and written to the
    /// document; its bundle loads in the background. Only the most recent
    /// request may install a bundle, so rapid switches settle on the last
    /// locale asked for. A failed load keeps the previous bundle and records
    /// the error in [`LocaleSnapshot::last_error`].
    ///
    /// Must be called from within a tokio runtime. Awaiting the returned
    /// handle is optional.
    pub fn switch_to(&self, locale: Locale) -> JoinHandle<()> {
        let inner = &self.inner;

        let mut request = 0;
        inner.state.send_modify(|snapshot| {
            request = inner.latest_request.fetch_add(1, Ordering::SeqCst) + 1;
            snapshot.locale = locale;
            snapshot.pending = true;
        });

        if let Err(err) = inner.store.set(&inner.options.storage_key, locale.code()) {
            tracing::warn!("Failed to persist locale preference: {}", err);
        }
        inner.document.set_lang(&locale.language_identifier());
        tracing::debug!("Switching to '{}' (request {})", locale, request);

        let pending = inner.loader.load(locale);
        let manager = self.clone();
        tokio::spawn(async move {
            let result = pending.await;
            manager.finish_load(request, locale, result);
        })
    }

    /// Switches to the next supported locale.
    pub fn toggle(&self) -> JoinHandle<()> {
        self.switch_to(self.current().next())
    }

    /// Re-requests the current locale after a failed load.
    ///
    /// Returns `None` when the served bundle already matches and no error is recorded.
    pub fn retry(&self) -> Option<JoinHandle<()>> {
        let snapshot = self.snapshot();
        if snapshot.last_error.is_none() && snapshot.is_consistent() {
            return None;
        }
        Some(self.switch_to(snapshot.locale))
    }

    /// Waits until no bundle load is pending and returns the resulting snapshot.
    pub async fn settled(&self) -> LocaleSnapshot {
        let mut receiver = self.subscribe();
        match receiver.wait_for(|snapshot| !snapshot.pending).await {
            Ok(snapshot) => snapshot.clone(),
            Err(_) => self.snapshot(),
        }
    }

    fn finish_load(
        &self,
        request: u64,
        locale: Locale,
        result: Result<Arc<MessageBundle>, LoadError>,
    ) {
        let inner = &self.inner;
        inner.state.send_if_modified(|snapshot| {
            if inner.latest_request.load(Ordering::SeqCst) != request {
                tracing::debug!(
                    "Discarding '{}' bundle from superseded request {}",
                    locale,
                    request
                );
                return false;
            }

            snapshot.pending = false;
            match result {
                Ok(bundle) => {
                    snapshot.bundle = bundle;
                    snapshot.last_error = None;
                },
                Err(err) => {
                    tracing::error!(
                        "Failed to load '{}' bundle, keeping '{}': {}",
                        locale,
                        snapshot.bundle.locale(),
                        err
                    );
                    snapshot.last_error = Some(Arc::new(err));
                },
            }
            true
        });
    }
}

async fn load_with_timeout(
    options: &ManagerOptions,
    loader: &dyn BundleLoader,
    locale: Locale,
) -> Result<Arc<MessageBundle>, InitError> {
    let timeout = options.initial_load_timeout;
    match tokio::time::timeout(timeout, loader.load(locale)).await {
        Ok(Ok(bundle)) => Ok(bundle),
        Ok(Err(source)) => Err(InitError::Load { locale, source }),
        Err(_) => Err(InitError::Timeout { locale, timeout }),
    }
}
