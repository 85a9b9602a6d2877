//! The translation accessor handed to every section of the page.

use crate::bundle::MessageBundle;
use crate::error::TranslateError;
use crate::locale::Locale;
use crate::path::KeyPath;
use parking_lot::Mutex;
use serde_json::Value;
use std::collections::HashSet;
use std::fmt;
use std::sync::Arc;

/// A value substituted into a `{placeholder}`.
#[derive(Clone, Debug, PartialEq)]
pub enum ArgValue {
    Text(String),
    Integer(i64),
    Float(f64),
}

impl fmt::Display for ArgValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text(text) => f.write_str(text),
            Self::Integer(value) => write!(f, "{value}"),
            Self::Float(value) => write!(f, "{value}"),
        }
    }
}

impl From<&str> for ArgValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for ArgValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<i64> for ArgValue {
    fn from(value: i64) -> Self {
        Self::Integer(value)
    }
}

impl From<i32> for ArgValue {
    fn from(value: i32) -> Self {
        Self::Integer(value.into())
    }
}

impl From<u32> for ArgValue {
    fn from(value: u32) -> Self {
        Self::Integer(value.into())
    }
}

impl From<f64> for ArgValue {
    fn from(value: f64) -> Self {
        Self::Float(value)
    }
}

/// Named placeholder values, e.g. `Args::new().with("year", 2025)`.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Args {
    values: Vec<(String, ArgValue)>,
}

impl Args {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, name: impl Into<String>, value: impl Into<ArgValue>) -> Self {
        self.set(name, value);
        self
    }

    /// Sets a value, replacing any earlier value with the same name.
    pub fn set(&mut self, name: impl Into<String>, value: impl Into<ArgValue>) {
        let name = name.into();
        let value = value.into();
        match self.values.iter_mut().find(|(existing, _)| *existing == name) {
            Some((_, slot)) => *slot = value,
            None => self.values.push((name, value)),
        }
    }

    pub fn get(&self, name: &str) -> Option<&ArgValue> {
        self.values
            .iter()
            .find(|(existing, _)| existing == name)
            .map(|(_, value)| value)
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// Logs each missing or mistyped key once per locale.
#[derive(Debug, Default)]
pub struct MissingKeyReporter {
    reported: Mutex<HashSet<(Option<Locale>, String)>>,
}

impl MissingKeyReporter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a failed lookup. Returns `true` the first time it is seen.
    pub fn report(&self, error: &TranslateError) -> bool {
        let locale = match error {
            TranslateError::InvalidKey(_) => None,
            TranslateError::MissingKey { locale, .. }
            | TranslateError::NotText { locale, .. }
            | TranslateError::NotList { locale, .. } => Some(*locale),
        };

        let first = self
            .reported
            .lock()
            .insert((locale, error.key().to_string()));
        if first {
            tracing::warn!("{}", error);
        }
        first
    }

    pub fn reported_count(&self) -> usize {
        self.reported.lock().len()
    }
}

/// Resolves dotted keys against one loaded [`MessageBundle`].
///
/// A translator never changes language: when the locale switches, consumers
/// ask their manager for a fresh translator bound to the new bundle.
#[derive(Clone, Debug)]
pub struct Translator {
    bundle: Arc<MessageBundle>,
    namespace: Option<String>,
    reporter: Arc<MissingKeyReporter>,
}

impl Translator {
    pub fn new(bundle: Arc<MessageBundle>) -> Self {
        Self::with_reporter(bundle, Arc::new(MissingKeyReporter::new()))
    }

    pub fn with_reporter(bundle: Arc<MessageBundle>, reporter: Arc<MissingKeyReporter>) -> Self {
        Self {
            bundle,
            namespace: None,
            reporter,
        }
    }

    pub fn locale(&self) -> Locale {
        self.bundle.locale()
    }

    pub fn bundle(&self) -> &Arc<MessageBundle> {
        &self.bundle
    }

    pub fn namespace(&self) -> Option<&str> {
        self.namespace.as_deref()
    }

    pub fn reporter(&self) -> &Arc<MissingKeyReporter> {
        &self.reporter
    }

    /// A translator whose keys are relative to `namespace`.
    ///
    /// `t.scoped("about").text("title")` reads `about.title`. Scopes nest.
    pub fn scoped(&self, namespace: &str) -> Self {
        Self {
            bundle: self.bundle.clone(),
            namespace: Some(self.full_key(namespace)),
            reporter: self.reporter.clone(),
        }
    }

    /// The string at `key`, or the raw key when it does not resolve to one.
    pub fn text(&self, key: &str) -> String {
        self.text_or_key(key, None)
    }

    /// Like [`Translator::text`], substituting `{name}` placeholders from `args`.
    pub fn text_with(&self, key: &str, args: &Args) -> String {
        self.text_or_key(key, Some(args))
    }

    pub fn try_text(&self, key: &str, args: Option<&Args>) -> Result<String, TranslateError> {
        let full_key = self.full_key(key);
        match self.lookup(&full_key)? {
            Value::String(template) => Ok(match args {
                Some(args) if !args.is_empty() => interpolate(template, args),
                _ => template.clone(),
            }),
            _ => Err(TranslateError::NotText {
                locale: self.locale(),
                key: full_key,
            }),
        }
    }

    /// Whether `key` resolves to any value (string, list or nested object).
    pub fn has(&self, key: &str) -> bool {
        KeyPath::parse(&self.full_key(key))
            .ok()
            .and_then(|path| self.bundle.resolve(&path))
            .is_some()
    }

    /// The list of strings at `key`, or an empty list when it does not resolve to one.
    pub fn list(&self, key: &str) -> Vec<String> {
        self.try_list(key).unwrap_or_else(|err| {
            self.reporter.report(&err);
            Vec::new()
        })
    }

    pub fn try_list(&self, key: &str) -> Result<Vec<String>, TranslateError> {
        let full_key = self.full_key(key);
        let not_list = || TranslateError::NotList {
            locale: self.locale(),
            key: full_key.clone(),
        };

        match self.lookup(&full_key)? {
            Value::Array(items) => items
                .iter()
                .map(|item| item.as_str().map(str::to_string).ok_or_else(not_list))
                .collect(),
            _ => Err(not_list()),
        }
    }

    /// Number of entries at `key`: array items or object fields, 0 otherwise.
    ///
    /// Used to iterate repeated content such as `about.formations.{i}`.
    pub fn count(&self, key: &str) -> usize {
        let full_key = self.full_key(key);
        match self.lookup(&full_key) {
            Ok(Value::Array(items)) => items.len(),
            Ok(Value::Object(map)) => map.len(),
            _ => 0,
        }
    }

    fn text_or_key(&self, key: &str, args: Option<&Args>) -> String {
        self.try_text(key, args).unwrap_or_else(|err| {
            self.reporter.report(&err);
            self.full_key(key)
        })
    }

    fn lookup(&self, full_key: &str) -> Result<&Value, TranslateError> {
        let path = KeyPath::parse(full_key)?;
        self.bundle
            .resolve(&path)
            .ok_or_else(|| TranslateError::MissingKey {
                locale: self.locale(),
                key: full_key.to_string(),
            })
    }

    fn full_key(&self, key: &str) -> String {
        match &self.namespace {
            Some(namespace) => format!("{namespace}.{key}"),
            None => key.to_string(),
        }
    }
}

/// Single-pass `{name}` substitution. Unknown placeholders are left as-is.
fn interpolate(template: &str, args: &Args) -> String {
    let mut result = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(open) = rest.find('{') {
        result.push_str(&rest[..open]);
        let after_open = &rest[open + 1..];
        let Some(close) = after_open.find('}') else {
            result.push_str(&rest[open..]);
            rest = "";
            break;
        };

        let name = &after_open[..close];
        match args.get(name.trim()) {
            Some(value) => result.push_str(&value.to_string()),
            None => {
                result.push('{');
                result.push_str(name);
                result.push('}');
            },
        }
        rest = &after_open[close + 1..];
    }

    result.push_str(rest);
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::{fixture, rstest};

    #[fixture]
    fn translator() -> Translator {
        let bundle = MessageBundle::from_json_str(
            Locale::Fr,
            r#"{
                "navbar": { "home": "Accueil", "projects": "Projets" },
                "footer": { "copyright": "© {year} Daonguyen TRAN. Tous droits réservés." },
                "skills": { "tags": ["Rust", "TypeScript", "SQL"] },
                "about": {
                    "title": "À propos",
                    "formations": [
                        { "title": "BUT Informatique", "highlight": "En cours" },
                        { "title": "Baccalauréat" }
                    ]
                },
                "mixed": ["a", 1]
            }"#,
        )
        .unwrap();
        Translator::new(Arc::new(bundle))
    }

    #[rstest]
    fn text_resolves_nested_keys(translator: Translator) {
        assert_eq!(translator.text("navbar.home"), "Accueil");
        assert_eq!(translator.text("about.formations.0.title"), "BUT Informatique");
    }

    #[rstest]
    fn text_substitutes_named_placeholders(translator: Translator) {
        let args = Args::new().with("year", 2025);
        assert_eq!(
            translator.text_with("footer.copyright", &args),
            "© 2025 Daonguyen TRAN. Tous droits réservés."
        );
    }

    #[rstest]
    fn text_without_args_keeps_placeholders(translator: Translator) {
        assert_eq!(
            translator.text("footer.copyright"),
            "© {year} Daonguyen TRAN. Tous droits réservés."
        );
    }

    #[rstest]
    fn missing_text_renders_raw_key(translator: Translator) {
        assert_eq!(translator.text("navbar.contact"), "navbar.contact");
        assert_eq!(
            translator.try_text("navbar.contact", None),
            Err(TranslateError::MissingKey {
                locale: Locale::Fr,
                key: "navbar.contact".to_string(),
            })
        );
    }

    #[rstest]
    fn text_on_non_string_is_not_text(translator: Translator) {
        assert_eq!(translator.text("navbar"), "navbar");
        assert!(matches!(
            translator.try_text("skills.tags", None),
            Err(TranslateError::NotText { .. })
        ));
    }

    #[rstest]
    fn has_detects_optional_fields(translator: Translator) {
        assert!(translator.has("about.formations.0.highlight"));
        assert!(!translator.has("about.formations.1.highlight"));
        assert!(translator.has("about.formations"));
        assert!(translator.has("skills.tags"));
        assert!(!translator.has("about.formations.3.highlight"));
        assert!(!translator.has(""));
    }

    #[rstest]
    fn list_returns_string_arrays(translator: Translator) {
        assert_eq!(translator.list("skills.tags"), vec!["Rust", "TypeScript", "SQL"]);
        assert!(translator.list("skills.missing").is_empty());
        assert!(matches!(
            translator.try_list("mixed"),
            Err(TranslateError::NotList { .. })
        ));
        assert!(matches!(
            translator.try_list("navbar.home"),
            Err(TranslateError::NotList { .. })
        ));
    }

    #[rstest]
    fn scoped_translator_prefixes_keys(translator: Translator) {
        let about = translator.scoped("about");
        assert_eq!(about.text("title"), "À propos");
        assert_eq!(about.scoped("formations.1").text("title"), "Baccalauréat");
        assert_eq!(about.text("nope"), "about.nope");
        assert_eq!(about.namespace(), Some("about"));
    }

    #[rstest]
    fn count_reports_repeated_content(translator: Translator) {
        assert_eq!(translator.count("about.formations"), 2);
        assert_eq!(translator.count("navbar"), 2);
        assert_eq!(translator.count("navbar.home"), 0);
        assert_eq!(translator.count("missing"), 0);
    }

    #[rstest]
    fn missing_keys_are_reported_once(translator: Translator) {
        let reporter = translator.reporter.clone();
        translator.text("missing.one");
        translator.text("missing.one");
        translator.list("missing.two");
        assert_eq!(reporter.reported_count(), 2);
    }

    #[rstest]
    #[case("Hello {name}!", "Hello Ada!")]
    #[case("{ name }", "Ada")]
    #[case("{unknown} {name}", "{unknown} Ada")]
    #[case("open { brace", "open { brace")]
    #[case("no placeholders", "no placeholders")]
    #[case("{name}{name}", "AdaAda")]
    fn interpolation_cases(#[case] template: &str, #[case] expected: &str) {
        let args = Args::new().with("name", "Ada");
        assert_eq!(interpolate(template, &args), expected);
    }

    #[test]
    fn args_replace_existing_values() {
        let mut args = Args::new().with("year", 2024);
        args.set("year", 2025);
        assert_eq!(args.get("year"), Some(&ArgValue::Integer(2025)));
        assert_eq!(ArgValue::from(1.5).to_string(), "1.5");
    }
}
