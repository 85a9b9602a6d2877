// Command output goes through println!/eprintln!; tracing is reserved for library diagnostics.

use colored::Colorize as _;
use folio_i18n_core::Locale;
use std::path::Path;
use tracing_subscriber::EnvFilter;

/// Installs a stderr subscriber filtered by `RUST_LOG` (default `warn`).
pub fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

pub fn print_check_header(assets_dir: &Path) {
    println!(
        "{} {}",
        "Checking bundles in".dimmed(),
        assets_dir.display().to_string().green()
    );
}

pub fn print_locale_checked(locale: Locale, reference: Locale, key_count: usize) {
    println!(
        "{} {} {}",
        locale.code().cyan(),
        format!("against {reference}:").dimmed(),
        format!("{key_count} key(s)").green()
    );
}

pub fn print_check_success(locale_count: usize) {
    println!(
        "{}",
        format!("No issues found in {locale_count} locale(s)!").green()
    );
}

pub fn print_warning_count(count: usize) {
    eprintln!("{}", format!("{count} warning(s)").yellow());
}
