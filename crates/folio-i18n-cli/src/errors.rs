//! Diagnostics reported by the CLI, rendered by miette.

use folio_i18n_core::{LoadError, Locale, ParityIssue, TranslateError};
use folio_i18n_toml::I18nConfigError;
use miette::{Diagnostic, NamedSource, SourceSpan};
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Diagnostic, Error)]
#[error("i18n.toml configuration file not found at {}", expected_path.display())]
#[diagnostic(
    code(folio_i18n::config::not_found),
    help(
        "Create an i18n.toml file with the following content:\n\n  \
          default_locale = \"fr\"\n  \
          assets_dir = \"i18n\"\n"
    )
)]
pub struct ConfigNotFoundError {
    pub expected_path: PathBuf,
}

#[derive(Debug, Diagnostic, Error)]
#[error("assets directory not found: {}", path.display())]
#[diagnostic(
    code(folio_i18n::config::assets_not_found),
    help("Create the assets directory or update assets_dir in i18n.toml")
)]
pub struct AssetsNotFoundError {
    pub path: PathBuf,
}

#[derive(Debug, Diagnostic, Error)]
#[error("no bundle for the default locale '{locale}'")]
#[diagnostic(
    code(folio_i18n::config::default_missing),
    help("Add {locale}.json to the assets directory")
)]
pub struct DefaultBundleMissingError {
    pub locale: Locale,
}

#[derive(Debug, Diagnostic, Error)]
#[error("failed to parse the '{locale}' bundle")]
#[diagnostic(code(folio_i18n::bundle::parse_error))]
pub struct BundleParseError {
    #[source_code]
    pub src: NamedSource<String>,

    #[label("{message}")]
    pub span: SourceSpan,

    pub locale: Locale,

    pub message: String,
}

/// A key that is missing, extra or of the wrong kind in one locale.
#[derive(Debug, Diagnostic, Error)]
#[error("{issue} in locale '{locale}'")]
#[diagnostic(code(folio_i18n::check::parity), severity(Error))]
pub struct ParityError {
    #[source_code]
    pub src: NamedSource<String>,

    #[label("defined here")]
    pub span: Option<SourceSpan>,

    pub issue: ParityIssue,

    pub locale: Locale,

    #[help]
    pub help: String,
}

#[derive(Debug, Diagnostic, Error)]
#[error("key '{key}' is an empty string in locale '{locale}'")]
#[diagnostic(code(folio_i18n::check::empty_text), severity(Warning))]
pub struct EmptyTextWarning {
    #[source_code]
    pub src: NamedSource<String>,

    #[label("empty")]
    pub span: Option<SourceSpan>,

    pub key: String,

    pub locale: Locale,
}

#[derive(Debug, Diagnostic, Error)]
pub enum CheckIssue {
    #[error(transparent)]
    #[diagnostic(transparent)]
    Parity(#[from] ParityError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    EmptyText(#[from] EmptyTextWarning),
}

impl CheckIssue {
    pub fn is_error(&self) -> bool {
        matches!(self, Self::Parity(_))
    }
}

#[derive(Debug, Diagnostic, Error)]
#[error("check found {error_count} error(s) and {warning_count} warning(s)")]
#[diagnostic(code(folio_i18n::check::report))]
pub struct CheckReport {
    pub error_count: usize,

    pub warning_count: usize,

    #[related]
    pub issues: Vec<CheckIssue>,
}

#[derive(Debug, Diagnostic, Error)]
#[error("{source}")]
#[diagnostic(code(folio_i18n::get::lookup))]
pub struct LookupError {
    pub source: TranslateError,

    #[help]
    pub help: Option<String>,
}

#[derive(Debug, Diagnostic, Error)]
pub enum CliError {
    #[error(transparent)]
    #[diagnostic(transparent)]
    ConfigNotFound(#[from] ConfigNotFoundError),

    #[error("invalid i18n.toml: {0}")]
    #[diagnostic(code(folio_i18n::config::invalid))]
    Config(#[from] I18nConfigError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    AssetsNotFound(#[from] AssetsNotFoundError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    DefaultBundleMissing(#[from] DefaultBundleMissingError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    BundleParse(#[from] BundleParseError),

    #[error(transparent)]
    #[diagnostic(code(folio_i18n::bundle::load))]
    Load(#[from] LoadError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Check(#[from] CheckReport),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Lookup(#[from] LookupError),

    #[error("{0}")]
    #[diagnostic(code(folio_i18n::other))]
    Other(String),
}

impl From<anyhow::Error> for CliError {
    fn from(err: anyhow::Error) -> Self {
        CliError::Other(format!("{err:#}"))
    }
}

/// Converts a 1-based line and column into a span of `len` bytes.
pub fn span_from_line_col(source: &str, line: usize, col: usize, len: usize) -> SourceSpan {
    let mut offset = 0;
    for (i, line_content) in source.split_inclusive('\n').enumerate() {
        if i + 1 == line {
            let content = line_content.trim_end_matches(['\r', '\n']);
            offset += col.saturating_sub(1).min(content.len());
            break;
        }
        offset += line_content.len();
    }
    SourceSpan::new(offset.min(source.len()).into(), len)
}

/// Locates the JSON property of a dotted key, following the path one object key at a time.
///
/// Array indices are skipped, so for `a.0.b` the span points at the first
/// `"b"` after `"a"`.
pub fn find_key_span(source: &str, key: &str) -> Option<SourceSpan> {
    let mut cursor = 0;
    let mut found = None;
    for segment in key.split('.') {
        if segment.parse::<usize>().is_ok() {
            continue;
        }
        let needle = format!("\"{segment}\"");
        let mut search_from = cursor;
        loop {
            let start = search_from + source.get(search_from..)?.find(&needle)?;
            let after = start + needle.len();
            if source[after..].trim_start().starts_with(':') {
                found = Some(SourceSpan::new(start.into(), needle.len()));
                cursor = after;
                break;
            }
            search_from = after;
        }
    }
    found
}
