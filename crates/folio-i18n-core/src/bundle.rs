//! Message bundles: one parsed JSON tree per locale.

use crate::error::LoadError;
use crate::locale::Locale;
use crate::path::KeyPath;
use serde_json::Value;

/// The kind of value found at a leaf of a bundle.
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub enum LeafKind {
    /// A string, possibly with `{placeholder}` tokens.
    Text,
    /// An array of strings.
    List,
    /// Any other JSON scalar (numbers, booleans, null).
    Other,
}

/// The complete set of translated strings for one [`Locale`].
///
/// Bundles are immutable once built; managers swap whole bundles behind an
/// `Arc` so readers never observe a mix of two languages.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct MessageBundle {
    locale: Locale,
    tree: Value,
}

impl MessageBundle {
    /// Wraps an already-parsed tree. The root must be a JSON object.
    pub fn new(locale: Locale, tree: Value) -> Result<Self, LoadError> {
        if !tree.is_object() {
            return Err(LoadError::InvalidRoot(locale));
        }
        Ok(Self { locale, tree })
    }

    pub fn from_json_str(locale: Locale, content: &str) -> Result<Self, LoadError> {
        let tree = serde_json::from_str(content)
            .map_err(|source| LoadError::Parse { locale, source })?;
        Self::new(locale, tree)
    }

    pub fn from_json_slice(locale: Locale, content: &[u8]) -> Result<Self, LoadError> {
        let tree = serde_json::from_slice(content)
            .map_err(|source| LoadError::Parse { locale, source })?;
        Self::new(locale, tree)
    }

    /// An empty bundle, useful as a placeholder in tests and fallbacks.
    pub fn empty(locale: Locale) -> Self {
        Self {
            locale,
            tree: Value::Object(serde_json::Map::new()),
        }
    }

    pub fn locale(&self) -> Locale {
        self.locale
    }

    pub fn tree(&self) -> &Value {
        &self.tree
    }

    pub fn resolve(&self, path: &KeyPath) -> Option<&Value> {
        path.resolve(&self.tree)
    }

    /// Every leaf path in the bundle, object keys in sorted order.
    ///
    /// Arrays made only of strings are a single [`LeafKind::List`] leaf; other
    /// arrays are descended with numeric segments. Empty nested objects are
    /// [`LeafKind::Other`] leaves.
    pub fn leaf_paths(&self) -> Vec<(KeyPath, LeafKind)> {
        let mut leaves = Vec::new();
        let mut prefix = Vec::new();
        collect_leaves(&self.tree, &mut prefix, &mut leaves);
        leaves
    }
}

fn collect_leaves(node: &Value, prefix: &mut Vec<String>, out: &mut Vec<(KeyPath, LeafKind)>) {
    match node {
        Value::Object(map) if map.is_empty() && !prefix.is_empty() => {
            out.push((KeyPath::from_segments(prefix.clone()), LeafKind::Other));
        },
        Value::Object(map) => {
            for (key, child) in map {
                prefix.push(key.clone());
                collect_leaves(child, prefix, out);
                prefix.pop();
            }
        },
        Value::Array(items) if items.iter().all(Value::is_string) => {
            out.push((KeyPath::from_segments(prefix.clone()), LeafKind::List));
        },
        Value::Array(items) => {
            for (index, child) in items.iter().enumerate() {
                prefix.push(index.to_string());
                collect_leaves(child, prefix, out);
                prefix.pop();
            }
        },
        Value::String(_) => out.push((KeyPath::from_segments(prefix.clone()), LeafKind::Text)),
        _ => out.push((KeyPath::from_segments(prefix.clone()), LeafKind::Other)),
    }
}
