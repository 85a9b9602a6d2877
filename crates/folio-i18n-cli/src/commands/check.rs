//! Key parity between the default locale and every other bundle.

use crate::commands::{Project, ProjectArgs, SourceBundle};
use crate::errors::{
    CheckIssue, CheckReport, CliError, DefaultBundleMissingError, EmptyTextWarning, ParityError,
    find_key_span,
};
use crate::ui;
use clap::Parser;
use folio_i18n_core::{KeySchema, ParityIssue};

#[derive(Debug, Parser)]
pub struct CheckArgs {
    #[command(flatten)]
    pub project: ProjectArgs,
}

pub fn run_check(args: CheckArgs) -> Result<(), CliError> {
    let project = Project::open(&args.project)?;
    ui::print_check_header(&project.assets_dir);

    let default_locale = project.default_locale()?;
    let locales = project.locales()?;
    if !locales.contains(&default_locale) {
        return Err(DefaultBundleMissingError {
            locale: default_locale,
        }
        .into());
    }

    let reference = project.load(default_locale)?;
    let schema = KeySchema::from_bundle(&reference.bundle);

    let mut issues = Vec::new();
    for locale in &locales {
        let loaded = if *locale == default_locale {
            reference.clone()
        } else {
            project.load(*locale)?
        };

        let report = schema.compare(&loaded.bundle);
        ui::print_locale_checked(*locale, default_locale, schema.len());
        issues.extend(
            report
                .issues
                .into_iter()
                .map(|issue| to_diagnostic(issue, &loaded, &reference)),
        );
    }

    let error_count = issues.iter().filter(|issue| issue.is_error()).count();
    let warning_count = issues.len() - error_count;

    if error_count > 0 {
        return Err(CheckReport {
            error_count,
            warning_count,
            issues,
        }
        .into());
    }

    if warning_count > 0 {
        eprintln!(
            "{:?}",
            miette::Report::new(CheckReport {
                error_count,
                warning_count,
                issues,
            })
        );
        ui::print_warning_count(warning_count);
    }
    ui::print_check_success(locales.len());
    Ok(())
}

fn to_diagnostic(
    issue: ParityIssue,
    loaded: &SourceBundle,
    reference: &SourceBundle,
) -> CheckIssue {
    let locale = loaded.bundle.locale();
    let reference_locale = reference.bundle.locale();

    if let ParityIssue::EmptyText { key } = issue {
        return EmptyTextWarning {
            src: loaded.named_source(),
            span: find_key_span(&loaded.source, &key),
            key,
            locale,
        }
        .into();
    }

    // Missing keys can only be pointed at in the reference bundle.
    let (source, help) = match &issue {
        ParityIssue::Missing { key, .. } => (
            reference,
            format!("Add '{key}' to {}", loaded.path.display()),
        ),
        ParityIssue::Extra { key, .. } => (
            loaded,
            format!("Remove '{key}' or add it to the '{reference_locale}' bundle"),
        ),
        ParityIssue::KindMismatch { expected, .. } => (
            loaded,
            format!("Use a {expected:?} value, as in the '{reference_locale}' bundle"),
        ),
        ParityIssue::EmptyText { .. } => (loaded, String::new()),
    };

    ParityError {
        src: source.named_source(),
        span: find_key_span(&source.source, issue.key()),
        issue,
        locale,
        help,
    }
    .into()
}
