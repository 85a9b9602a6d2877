mod check;
mod get;

pub use check::{CheckArgs, run_check};
pub use get::{GetArgs, parse_arg, run_get};

use crate::errors::{
    AssetsNotFoundError, BundleParseError, CliError, ConfigNotFoundError, span_from_line_col,
};
use anyhow::Context as _;
use clap::Args;
use folio_i18n_core::{LoadError, Locale, MessageBundle};
use folio_i18n_toml::{I18nConfig, I18nConfigError};
use miette::NamedSource;
use std::path::{Path, PathBuf};
use std::sync::Arc;

#[derive(Debug, Clone, Args)]
pub struct ProjectArgs {
    /// Directory containing i18n.toml (defaults to current directory).
    #[arg(short, long)]
    pub path: Option<PathBuf>,
}

/// A directory with an `i18n.toml` and its bundles.
#[derive(Debug, Clone)]
pub struct Project {
    pub root: PathBuf,
    pub config: I18nConfig,
    pub assets_dir: PathBuf,
}

/// A bundle together with the text it was parsed from.
#[derive(Debug, Clone)]
pub struct SourceBundle {
    pub bundle: Arc<MessageBundle>,
    pub path: PathBuf,
    pub source: String,
}

impl SourceBundle {
    pub fn named_source(&self) -> NamedSource<String> {
        NamedSource::new(self.path.display().to_string(), self.source.clone())
    }
}

impl Project {
    pub fn open(args: &ProjectArgs) -> Result<Self, CliError> {
        let root = args.path.clone().unwrap_or_else(|| PathBuf::from("."));
        let config = match I18nConfig::from_manifest_dir(&root) {
            Ok(config) => config,
            Err(I18nConfigError::NotFound) => {
                return Err(ConfigNotFoundError {
                    expected_path: root.join("i18n.toml"),
                }
                .into());
            },
            Err(err) => return Err(err.into()),
        };

        let assets_dir = config.assets_dir_from_base(Some(&root))?;
        if !assets_dir.is_dir() {
            return Err(AssetsNotFoundError { path: assets_dir }.into());
        }
        tracing::debug!("Opened project at {}", root.display());

        Ok(Self {
            root,
            config,
            assets_dir,
        })
    }

    pub fn default_locale(&self) -> Result<Locale, CliError> {
        Ok(self.config.default_locale()?)
    }

    pub fn locales(&self) -> Result<Vec<Locale>, CliError> {
        Ok(self.config.available_locales_from_base(Some(&self.root))?)
    }

    pub fn bundle_path(&self, locale: Locale) -> PathBuf {
        self.assets_dir.join(format!("{}.json", locale.code()))
    }

    pub fn load(&self, locale: Locale) -> Result<SourceBundle, CliError> {
        let path = self.bundle_path(locale);
        if !path.is_file() {
            return Err(LoadError::NotFound(locale).into());
        }
        let source = read_source(&path)?;

        match MessageBundle::from_json_str(locale, &source) {
            Ok(bundle) => Ok(SourceBundle {
                bundle: Arc::new(bundle),
                path,
                source,
            }),
            Err(LoadError::Parse { source: err, .. }) => {
                let span = span_from_line_col(&source, err.line(), err.column(), 1);
                Err(BundleParseError {
                    src: NamedSource::new(path.display().to_string(), source),
                    span,
                    locale,
                    message: err.to_string(),
                }
                .into())
            },
            Err(err) => Err(err.into()),
        }
    }
}

fn read_source(path: &Path) -> anyhow::Result<String> {
    fs_err::read_to_string(path).with_context(|| format!("reading bundle {}", path.display()))
}
