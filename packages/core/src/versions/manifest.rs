//! `.versions.env` manifest parsing
//!
//! The manifest is a flat `KEY=VALUE` file. Parsing is tolerant: blank lines
//! and `#` comments are ignored, malformed lines are skipped with a warning.

use std::fmt;
use tracing::warn;

/// Ordered tool-key to version mapping
///
/// Keys keep the position of their first occurrence; a repeated key
/// overwrites the earlier value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VersionManifest {
    entries: Vec<(String, String)>,
}

/// A manifest line that could not be parsed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedLine {
    /// 1-based line number
    pub line_number: usize,
    pub content: String,
}

/// Parsed manifest plus the lines that were skipped
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ManifestParse {
    pub manifest: VersionManifest,
    pub skipped: Vec<SkippedLine>,
}

impl VersionManifest {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse manifest text, logging a warning for each skipped line
    pub fn parse(content: &str) -> ManifestParse {
        let mut parsed = ManifestParse::default();

        for (index, raw_line) in content.lines().enumerate() {
            let line = raw_line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }

            match parse_line(line) {
                Some((key, value)) => parsed.manifest.insert(key, value),
                None => {
                    let line_number = index + 1;
                    warn!("Cannot parse line {line_number}: {line}");
                    parsed.skipped.push(SkippedLine {
                        line_number,
                        content: line.to_string(),
                    });
                }
            }
        }

        parsed
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(existing, _)| existing == key)
            .map(|(_, value)| value.as_str())
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        let key = key.into();
        let value = value.into();
        match self.entries.iter_mut().find(|(existing, _)| *existing == key) {
            Some(entry) => entry.1 = value,
            None => self.entries.push((key, value)),
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries
            .iter()
            .map(|(key, value)| (key.as_str(), value.as_str()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl fmt::Display for VersionManifest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{")?;
        for (i, (key, value)) in self.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{key}={value}")?;
        }
        write!(f, "}}")
    }
}

fn parse_line(line: &str) -> Option<(&str, &str)> {
    let (key, value) = line.split_once('=')?;
    let key = key.trim();
    if key.is_empty() {
        return None;
    }
    let value = value.trim().trim_matches(|c| c == '"' || c == '\'');
    Some((key, value))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_simple_entries_in_order() {
        let parsed = VersionManifest::parse("GO_VERSION=1.22.0\nGH_VERSION=2.40.0\n");
        let entries: Vec<_> = parsed.manifest.iter().collect();
        assert_eq!(
            entries,
            vec![("GO_VERSION", "1.22.0"), ("GH_VERSION", "2.40.0")]
        );
        assert!(parsed.skipped.is_empty());
    }

    #[test]
    fn parse_strips_quotes() {
        let parsed = VersionManifest::parse(
            "GO_VERSION=\"1.22.0\"\nTINYGO_VERSION='0.31.2'\nVS_CODE_VERSION = \"1.90.0\"",
        );
        let manifest = parsed.manifest;
        assert_eq!(manifest.get("GO_VERSION"), Some("1.22.0"));
        assert_eq!(manifest.get("TINYGO_VERSION"), Some("0.31.2"));
        assert_eq!(manifest.get("VS_CODE_VERSION"), Some("1.90.0"));
    }

    #[test]
    fn parse_ignores_comments_and_blank_lines() {
        let parsed = VersionManifest::parse("# tools\n\n   \n  # indented comment\nGO_VERSION=1.22.0\n");
        assert_eq!(parsed.manifest.len(), 1);
        assert!(parsed.skipped.is_empty());
    }

    #[test]
    fn parse_skips_line_without_equals_and_continues() {
        let parsed = VersionManifest::parse("GO_VERSION=1.22.0\nnot a pair\nGH_VERSION=2.40.0\n");
        assert_eq!(parsed.manifest.get("GO_VERSION"), Some("1.22.0"));
        assert_eq!(parsed.manifest.get("GH_VERSION"), Some("2.40.0"));
        assert_eq!(
            parsed.skipped,
            vec![SkippedLine {
                line_number: 2,
                content: "not a pair".to_string()
            }]
        );
    }

    #[test]
    fn parse_skips_empty_key() {
        let parsed = VersionManifest::parse("=1.0\nGO_VERSION=1.22.0");
        assert_eq!(parsed.manifest.len(), 1);
        assert_eq!(parsed.skipped.len(), 1);
        assert_eq!(parsed.skipped[0].line_number, 1);
    }

    #[test]
    fn parse_splits_on_first_equals() {
        let parsed = VersionManifest::parse("FLAGS=a=b");
        assert_eq!(parsed.manifest.get("FLAGS"), Some("a=b"));
    }

    #[test]
    fn repeated_key_overwrites_in_place() {
        let parsed = VersionManifest::parse("A=1\nB=2\nA=3");
        let entries: Vec<_> = parsed.manifest.iter().collect();
        assert_eq!(entries, vec![("A", "3"), ("B", "2")]);
    }

    #[test]
    fn display_lists_entries() {
        let mut manifest = VersionManifest::new();
        manifest.insert("GO_VERSION", "1.22.0");
        manifest.insert("GH_VERSION", "2.40.0");
        assert_eq!(
            manifest.to_string(),
            "{GO_VERSION=1.22.0, GH_VERSION=2.40.0}"
        );
    }
}
