//! Dotted key paths such as `about.formations.0.title`.

use crate::error::TranslateError;
use serde_json::Value;
use std::fmt;

/// A parsed, non-empty dotted key path.
///
/// Segments that parse as `usize` also address array elements, so
/// `projects.items.2.title` reaches into repeated content.
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub struct KeyPath {
    segments: Vec<String>,
}

impl KeyPath {
    pub fn parse(raw: &str) -> Result<Self, TranslateError> {
        if raw.is_empty() {
            return Err(TranslateError::InvalidKey(raw.to_string()));
        }

        let segments: Vec<String> = raw.split('.').map(str::to_string).collect();
        if segments.iter().any(String::is_empty) {
            return Err(TranslateError::InvalidKey(raw.to_string()));
        }

        Ok(Self { segments })
    }

    /// Joins a namespace and a key into one path (`about` + `title`).
    pub fn join(namespace: &str, key: &str) -> Result<Self, TranslateError> {
        let mut path = Self::parse(namespace)?;
        path.segments.extend(Self::parse(key)?.segments);
        Ok(path)
    }

    pub(crate) fn from_segments(segments: Vec<String>) -> Self {
        Self { segments }
    }

    pub fn segments(&self) -> impl Iterator<Item = &str> {
        self.segments.iter().map(String::as_str)
    }

    /// Walks `tree` along this path.
    pub fn resolve<'v>(&self, tree: &'v Value) -> Option<&'v Value> {
        self.segments
            .iter()
            .try_fold(tree, |node, segment| match node {
                Value::Object(map) => map.get(segment),
                Value::Array(items) => segment
                    .parse::<usize>()
                    .ok()
                    .and_then(|index| items.get(index)),
                _ => None,
            })
    }
}

impl fmt::Display for KeyPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.segments.join("."))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use serde_json::json;

    fn tree() -> Value {
        json!({
            "navbar": { "home": "Accueil" },
            "about": {
                "formations": [
                    { "title": "BUT Informatique", "highlight": "Alternance" },
                    { "title": "Baccalauréat" }
                ]
            },
            "7": { "days": "sept jours" }
        })
    }

    #[rstest]
    #[case("navbar.home", Some(json!("Accueil")))]
    #[case("about.formations.0.highlight", Some(json!("Alternance")))]
    #[case("about.formations.1.title", Some(json!("Baccalauréat")))]
    #[case("about.formations.1.highlight", None)]
    #[case("about.formations.9.title", None)]
    #[case("about.formations.first", None)]
    #[case("navbar.home.deeper", None)]
    #[case("7.days", Some(json!("sept jours")))]
    fn resolves_dotted_paths(#[case] raw: &str, #[case] expected: Option<Value>) {
        let tree = tree();
        let path = KeyPath::parse(raw).unwrap();
        assert_eq!(path.resolve(&tree), expected.as_ref());
    }

    #[rstest]
    #[case("")]
    #[case(".")]
    #[case("navbar.")]
    #[case(".home")]
    #[case("a..b")]
    fn rejects_empty_segments(#[case] raw: &str) {
        assert_eq!(
            KeyPath::parse(raw),
            Err(TranslateError::InvalidKey(raw.to_string()))
        );
    }

    #[test]
    fn join_prefixes_namespace() {
        let path = KeyPath::join("about.formations", "0.title").unwrap();
        assert_eq!(path.to_string(), "about.formations.0.title");
        assert_eq!(path.segments().count(), 4);
    }
}
