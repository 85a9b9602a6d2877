//! Single-key lookup, mostly for scripting and debugging bundles.

use crate::commands::{Project, ProjectArgs};
use crate::errors::{CliError, LookupError};
use clap::Parser;
use folio_i18n_core::{ArgValue, Args, KeySchema, Locale, TranslateError, Translator};

#[derive(Debug, Parser)]
pub struct GetArgs {
    /// Dotted key path, e.g. `navbar.home` or `about.formations.0.title`.
    pub key: String,

    /// Locale to read (defaults to the configured default locale).
    #[arg(short, long)]
    pub locale: Option<Locale>,

    /// Placeholder value as `name=value`; may be repeated.
    #[arg(short, long = "arg", value_parser = parse_arg)]
    pub args: Vec<(String, ArgValue)>,

    #[command(flatten)]
    pub project: ProjectArgs,
}

/// Parses `name=value`; integers and floats keep their numeric type.
pub fn parse_arg(raw: &str) -> Result<(String, ArgValue), String> {
    let (name, value) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected name=value, got '{raw}'"))?;
    let name = name.trim();
    if name.is_empty() {
        return Err(format!("missing placeholder name in '{raw}'"));
    }

    let value = if let Ok(integer) = value.parse::<i64>() {
        ArgValue::Integer(integer)
    } else if let Ok(float) = value.parse::<f64>() {
        ArgValue::Float(float)
    } else {
        ArgValue::Text(value.to_string())
    };
    Ok((name.to_string(), value))
}

pub fn run_get(args: GetArgs) -> Result<(), CliError> {
    let project = Project::open(&args.project)?;
    let locale = match args.locale {
        Some(locale) => locale,
        None => project.default_locale()?,
    };
    let loaded = project.load(locale)?;
    let t = Translator::new(loaded.bundle.clone());

    let mut placeholders = Args::new();
    for (name, value) in args.args {
        placeholders.set(name, value);
    }

    match t.try_text(&args.key, Some(&placeholders)) {
        Ok(text) => {
            println!("{text}");
            Ok(())
        },
        Err(TranslateError::NotText { .. }) => match t.try_list(&args.key) {
            Ok(items) => {
                for item in items {
                    println!("{item}");
                }
                Ok(())
            },
            Err(source) => Err(lookup_error(source, &KeySchema::from_bundle(&loaded.bundle))),
        },
        Err(source) => Err(lookup_error(source, &KeySchema::from_bundle(&loaded.bundle))),
    }
}

fn lookup_error(source: TranslateError, schema: &KeySchema) -> CliError {
    let prefix = match source.key().rsplit_once('.') {
        Some((parent, _)) => format!("{parent}."),
        None => String::new(),
    };
    let siblings: Vec<&str> = schema
        .keys()
        .map(|(key, _)| key)
        .filter(|key| key.starts_with(&prefix))
        .take(8)
        .collect();

    let help = (!siblings.is_empty() && !prefix.is_empty())
        .then(|| format!("Keys under '{prefix}': {}", siblings.join(", ")));
    LookupError { source, help }.into()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("year=2025", "year", ArgValue::Integer(2025))]
    #[case("ratio=0.5", "ratio", ArgValue::Float(0.5))]
    #[case("name=Ada", "name", ArgValue::Text("Ada".to_string()))]
    #[case("name=a=b", "name", ArgValue::Text("a=b".to_string()))]
    #[case(" name =", "name", ArgValue::Text(String::new()))]
    fn parses_placeholder_values(
        #[case] raw: &str,
        #[case] name: &str,
        #[case] value: ArgValue,
    ) {
        assert_eq!(parse_arg(raw).unwrap(), (name.to_string(), value));
    }

    #[rstest]
    #[case("year")]
    #[case("=2025")]
    fn rejects_malformed_placeholders(#[case] raw: &str) {
        assert!(parse_arg(raw).is_err());
    }
}
