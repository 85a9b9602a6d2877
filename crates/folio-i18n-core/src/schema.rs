//! Key schemas shared by every locale's bundle.
//!
//! Nothing at runtime forces the `fr` and `en` documents to carry the same
//! keys, so the reference bundle's leaf paths become a [`KeySchema`] that
//! other bundles are checked against in tests and by the `check` command.

use crate::bundle::{LeafKind, MessageBundle};
use crate::error::TranslateError;
use crate::locale::Locale;
use crate::path::KeyPath;
use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

/// The leaf paths (and their kinds) of a reference bundle.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct KeySchema {
    reference: Locale,
    entries: BTreeMap<String, LeafKind>,
}

/// A single divergence between a bundle and the schema.
#[derive(Clone, Debug, Eq, Ord, PartialEq, PartialOrd)]
pub enum ParityIssue {
    /// The key exists in the reference but not in this bundle.
    Missing { key: String, kind: LeafKind },
    /// The key exists in this bundle but not in the reference.
    Extra { key: String, kind: LeafKind },
    /// Both bundles have the key with different value kinds.
    KindMismatch {
        key: String,
        expected: LeafKind,
        found: LeafKind,
    },
    /// The key resolves to an empty string.
    EmptyText { key: String },
}

impl ParityIssue {
    pub fn key(&self) -> &str {
        match self {
            Self::Missing { key, .. }
            | Self::Extra { key, .. }
            | Self::KindMismatch { key, .. }
            | Self::EmptyText { key } => key,
        }
    }
}

impl fmt::Display for ParityIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Missing { key, kind } => write!(f, "missing {kind:?} key '{key}'"),
            Self::Extra { key, kind } => write!(f, "extra {kind:?} key '{key}'"),
            Self::KindMismatch {
                key,
                expected,
                found,
            } => write!(f, "key '{key}' is {found:?}, expected {expected:?}"),
            Self::EmptyText { key } => write!(f, "key '{key}' is an empty string"),
        }
    }
}

/// Result of checking one bundle against a schema.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ParityReport {
    pub reference: Locale,
    pub locale: Locale,
    pub issues: Vec<ParityIssue>,
}

impl ParityReport {
    pub fn is_clean(&self) -> bool {
        self.issues.is_empty()
    }
}

impl KeySchema {
    pub fn from_bundle(bundle: &MessageBundle) -> Self {
        let entries = bundle
            .leaf_paths()
            .into_iter()
            .map(|(path, kind)| (path.to_string(), kind))
            .collect();
        Self {
            reference: bundle.locale(),
            entries,
        }
    }

    pub fn reference(&self) -> Locale {
        self.reference
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn keys(&self) -> impl Iterator<Item = (&str, LeafKind)> {
        self.entries.iter().map(|(key, kind)| (key.as_str(), *kind))
    }

    /// Checks that `key` is a leaf of the expected kind.
    ///
    /// Components call this at startup (or in tests) for keys they build
    /// dynamically, so a typo surfaces before anything renders.
    pub fn require(&self, key: &str, kind: LeafKind) -> Result<(), TranslateError> {
        KeyPath::parse(key)?;
        match self.entries.get(key) {
            None => Err(TranslateError::MissingKey {
                locale: self.reference,
                key: key.to_string(),
            }),
            Some(found) if *found == kind => Ok(()),
            Some(_) if kind == LeafKind::List => Err(TranslateError::NotList {
                locale: self.reference,
                key: key.to_string(),
            }),
            Some(_) => Err(TranslateError::NotText {
                locale: self.reference,
                key: key.to_string(),
            }),
        }
    }

    /// Lists every divergence between `bundle` and this schema.
    pub fn compare(&self, bundle: &MessageBundle) -> ParityReport {
        let mut issues = Vec::new();
        let mut seen = BTreeMap::new();

        for (path, kind) in bundle.leaf_paths() {
            if kind == LeafKind::Text
                && matches!(bundle.resolve(&path), Some(Value::String(text)) if text.trim().is_empty())
            {
                issues.push(ParityIssue::EmptyText {
                    key: path.to_string(),
                });
            }
            seen.insert(path.to_string(), kind);
        }

        for (key, expected) in &self.entries {
            match seen.get(key) {
                None => issues.push(ParityIssue::Missing {
                    key: key.clone(),
                    kind: *expected,
                }),
                Some(found) if found != expected => issues.push(ParityIssue::KindMismatch {
                    key: key.clone(),
                    expected: *expected,
                    found: *found,
                }),
                Some(_) => {},
            }
        }

        for (key, kind) in &seen {
            if !self.entries.contains_key(key) {
                issues.push(ParityIssue::Extra {
                    key: key.clone(),
                    kind: *kind,
                });
            }
        }

        ParityReport {
            reference: self.reference,
            locale: bundle.locale(),
            issues,
        }
    }
}

/// Checks every bundle against the schema of the first one.
///
/// The first report covers the reference itself and can only contain
/// [`ParityIssue::EmptyText`] entries.
pub fn check_parity(bundles: &[Arc<MessageBundle>]) -> Vec<ParityReport> {
    let Some(reference) = bundles.first() else {
        return Vec::new();
    };

    let schema = KeySchema::from_bundle(reference);
    bundles.iter().map(|bundle| schema.compare(bundle)).collect()
}
