//! Bundle loaders: the asynchronous seam between a locale and its messages.

use crate::bundle::MessageBundle;
use crate::error::LoadError;
use crate::locale::Locale;
use futures::FutureExt as _;
use futures::future::{self, BoxFuture};
use parking_lot::Mutex;
use rust_embed::RustEmbed;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Produces the [`MessageBundle`] for a locale.
///
/// Loads may complete in any order; callers that issue several loads are
/// responsible for sequencing them.
pub trait BundleLoader: Send + Sync {
    /// A short name used in diagnostics.
    fn name(&self) -> &'static str;

    fn load(&self, locale: Locale) -> BoxFuture<'static, Result<Arc<MessageBundle>, LoadError>>;
}

impl<L: BundleLoader + ?Sized> BundleLoader for Arc<L> {
    fn name(&self) -> &'static str {
        (**self).name()
    }

    fn load(&self, locale: Locale) -> BoxFuture<'static, Result<Arc<MessageBundle>, LoadError>> {
        (**self).load(locale)
    }
}

/// Bundles compiled into the binary with `rust-embed`.
///
/// The embedded folder is expected to contain one `{locale}.json` per
/// supported locale.
pub trait EmbeddedBundles: RustEmbed + Send + Sync + 'static {
    fn bundle_path(locale: Locale) -> String {
        format!("{}.json", locale.code())
    }
}

#[derive(Debug)]
pub struct EmbeddedBundleLoader<T: EmbeddedBundles> {
    _phantom: std::marker::PhantomData<T>,
}

impl<T: EmbeddedBundles> Default for EmbeddedBundleLoader<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: EmbeddedBundles> EmbeddedBundleLoader<T> {
    pub const fn new() -> Self {
        Self {
            _phantom: std::marker::PhantomData,
        }
    }

    /// Loads a bundle synchronously.
    pub fn load_now(locale: Locale) -> Result<MessageBundle, LoadError> {
        let file_path = T::bundle_path(locale);
        let Some(file) = T::get(&file_path) else {
            return Err(LoadError::NotFound(locale));
        };

        let content = std::str::from_utf8(&file.data).map_err(|_| LoadError::InvalidUtf8 {
            locale,
            path: file_path.clone(),
        })?;
        MessageBundle::from_json_str(locale, content)
    }

    /// The supported locales that have an embedded bundle.
    pub fn discover_locales() -> Vec<Locale> {
        Locale::ALL
            .into_iter()
            .filter(|locale| T::get(&T::bundle_path(*locale)).is_some())
            .collect()
    }
}

impl<T: EmbeddedBundles> BundleLoader for EmbeddedBundleLoader<T> {
    fn name(&self) -> &'static str {
        "embedded"
    }

    fn load(&self, locale: Locale) -> BoxFuture<'static, Result<Arc<MessageBundle>, LoadError>> {
        future::ready(Self::load_now(locale).map(Arc::new)).boxed()
    }
}

/// Bundles given as static JSON sources, typically `include_str!`ed.
#[derive(Debug)]
pub struct StaticBundleLoader {
    sources: &'static [(Locale, &'static str)],
}

impl StaticBundleLoader {
    pub const fn new(sources: &'static [(Locale, &'static str)]) -> Self {
        Self { sources }
    }
}

impl BundleLoader for StaticBundleLoader {
    fn name(&self) -> &'static str {
        "static"
    }

    fn load(&self, locale: Locale) -> BoxFuture<'static, Result<Arc<MessageBundle>, LoadError>> {
        let result = self
            .sources
            .iter()
            .find(|(source_locale, _)| *source_locale == locale)
            .ok_or(LoadError::NotFound(locale))
            .and_then(|(_, content)| MessageBundle::from_json_str(locale, content))
            .map(Arc::new);
        future::ready(result).boxed()
    }
}

/// Bundles read from `{dir}/{locale}.json` on every load.
#[derive(Clone, Debug)]
pub struct DirectoryBundleLoader {
    dir: PathBuf,
}

impl DirectoryBundleLoader {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn bundle_path(&self, locale: Locale) -> PathBuf {
        self.dir.join(format!("{}.json", locale.code()))
    }

    pub fn load_now(&self, locale: Locale) -> Result<MessageBundle, LoadError> {
        let path = self.bundle_path(locale);
        match fs_err::read(&path) {
            Ok(content) => MessageBundle::from_json_slice(locale, &content),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                Err(LoadError::NotFound(locale))
            },
            Err(source) => Err(LoadError::Io { path, source }),
        }
    }
}

impl BundleLoader for DirectoryBundleLoader {
    fn name(&self) -> &'static str {
        "directory"
    }

    fn load(&self, locale: Locale) -> BoxFuture<'static, Result<Arc<MessageBundle>, LoadError>> {
        let loader = self.clone();
        async move { loader.load_now(locale).map(Arc::new) }.boxed()
    }
}

/// Remembers successful loads for the rest of the session.
///
/// Failures are not cached, so a later load of the same locale retries.
pub struct MemoizedLoader<L> {
    inner: Arc<L>,
    cache: Arc<Mutex<HashMap<Locale, Arc<MessageBundle>>>>,
}

impl<L: BundleLoader + 'static> MemoizedLoader<L> {
    pub fn new(inner: L) -> Self {
        Self {
            inner: Arc::new(inner),
            cache: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    pub fn is_cached(&self, locale: Locale) -> bool {
        self.cache.lock().contains_key(&locale)
    }

    pub fn clear(&self) {
        self.cache.lock().clear();
    }
}

impl<L: BundleLoader + 'static> BundleLoader for MemoizedLoader<L> {
    fn name(&self) -> &'static str {
        self.inner.name()
    }

    fn load(&self, locale: Locale) -> BoxFuture<'static, Result<Arc<MessageBundle>, LoadError>> {
        if let Some(bundle) = self.cache.lock().get(&locale) {
            return future::ready(Ok(bundle.clone())).boxed();
        }

        let pending = self.inner.load(locale);
        let cache = self.cache.clone();
        async move {
            let bundle = pending.await?;
            cache.lock().insert(locale, bundle.clone());
            tracing::debug!("Cached message bundle for '{}'", locale);
            Ok(bundle)
        }
        .boxed()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::executor::block_on;
    use std::sync::atomic::{AtomicUsize, Ordering};

    static SOURCES: &[(Locale, &str)] = &[
        (Locale::Fr, r#"{ "navbar": { "home": "Accueil" } }"#),
        (Locale::En, r#"{ "navbar": { "home": "Home" } }"#),
    ];

    #[test]
    fn static_loader_resolves_registered_locales() {
        let loader = StaticBundleLoader::new(SOURCES);
        let bundle = block_on(loader.load(Locale::En)).unwrap();
        assert_eq!(bundle.locale(), Locale::En);
        assert_eq!(
            bundle.tree()["navbar"]["home"],
            serde_json::Value::from("Home")
        );
    }

    #[test]
    fn static_loader_reports_missing_locale() {
        let loader = StaticBundleLoader::new(&SOURCES[..1]);
        let result = block_on(loader.load(Locale::En));
        assert!(matches!(result, Err(LoadError::NotFound(Locale::En))));
    }

    #[test]
    fn directory_loader_reads_json_files() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("fr.json"), r#"{ "title": "Projets" }"#).unwrap();
        std::fs::write(dir.path().join("en.json"), "{ broken").unwrap();

        let loader = DirectoryBundleLoader::new(dir.path());

        let fr = block_on(loader.load(Locale::Fr)).unwrap();
        assert_eq!(fr.tree()["title"], serde_json::Value::from("Projets"));

        let en = block_on(loader.load(Locale::En));
        assert!(matches!(en, Err(LoadError::Parse { .. })));
    }

    #[test]
    fn directory_loader_maps_missing_file_to_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let loader = DirectoryBundleLoader::new(dir.path());
        let result = block_on(loader.load(Locale::Fr));
        assert!(matches!(result, Err(LoadError::NotFound(Locale::Fr))));
    }

    struct CountingLoader {
        calls: Arc<AtomicUsize>,
        fail: bool,
    }

    impl BundleLoader for CountingLoader {
        fn name(&self) -> &'static str {
            "counting"
        }

        fn load(
            &self,
            locale: Locale,
        ) -> BoxFuture<'static, Result<Arc<MessageBundle>, LoadError>> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            let result = if self.fail {
                Err(LoadError::NotFound(locale))
            } else {
                Ok(Arc::new(MessageBundle::empty(locale)))
            };
            future::ready(result).boxed()
        }
    }

    #[test]
    fn memoized_loader_reuses_successful_loads() {
        let calls = Arc::new(AtomicUsize::new(0));
        let loader = MemoizedLoader::new(CountingLoader {
            calls: calls.clone(),
            fail: false,
        });

        let first = block_on(loader.load(Locale::Fr)).unwrap();
        let second = block_on(loader.load(Locale::Fr)).unwrap();

        assert!(Arc::ptr_eq(&first, &second));
        assert!(loader.is_cached(Locale::Fr));
        assert!(!loader.is_cached(Locale::En));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn memoized_loader_does_not_cache_failures() {
        let calls = Arc::new(AtomicUsize::new(0));
        let loader = MemoizedLoader::new(CountingLoader {
            calls: calls.clone(),
            fail: true,
        });

        assert!(block_on(loader.load(Locale::En)).is_err());
        assert!(block_on(loader.load(Locale::En)).is_err());
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }
}
