use crate::error::LocaleError;
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use strum::{Display, EnumIter, IntoStaticStr};
use unic_langid::{LanguageIdentifier, langid};

/// A display language from the fixed supported set.
#[derive(
    Clone,
    Copy,
    Debug,
    Deserialize,
    Display,
    EnumIter,
    Eq,
    Hash,
    IntoStaticStr,
    Ord,
    PartialEq,
    PartialOrd,
    Serialize,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Locale {
    Fr,
    En,
}

impl Locale {
    /// Every supported locale, in toggle order.
    pub const ALL: [Locale; 2] = [Locale::Fr, Locale::En];

    /// The locale used when no valid preference exists.
    pub const DEFAULT: Locale = Locale::Fr;

    /// The raw code stored in the preference store and used as bundle file stem.
    pub fn code(self) -> &'static str {
        self.into()
    }

    /// Short label shown by the language switcher.
    pub fn label(self) -> &'static str {
        match self {
            Locale::Fr => "FR",
            Locale::En => "ENG",
        }
    }

    /// The locale after this one in [`Locale::ALL`], wrapping around.
    ///
    /// With two locales this is always "the other one".
    pub fn next(self) -> Locale {
        let index = Self::ALL
            .iter()
            .position(|locale| *locale == self)
            .unwrap_or_default();
        Self::ALL[(index + 1) % Self::ALL.len()]
    }

    /// The BCP 47 identifier written to the document `lang` attribute.
    pub fn language_identifier(self) -> LanguageIdentifier {
        match self {
            Locale::Fr => langid!("fr"),
            Locale::En => langid!("en"),
        }
    }

    /// Resolves a persisted preference.
    ///
    /// Absent or unsupported values yield `default`.
    pub fn from_stored(stored: Option<&str>, default: Locale) -> Locale {
        match stored {
            None => default,
            Some(raw) => raw.parse().unwrap_or_else(|err| {
                tracing::warn!("Ignoring stored locale preference: {}", err);
                default
            }),
        }
    }
}

impl Default for Locale {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl FromStr for Locale {
    type Err = LocaleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        Self::ALL
            .into_iter()
            .find(|locale| locale.code().eq_ignore_ascii_case(trimmed))
            .ok_or_else(|| LocaleError::Unsupported(s.to_string()))
    }
}
