//! The version 3 source map JSON document.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

fn default_version() -> u32 {
    3
}

/// A source map as it appears on disk.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawSourceMap {
    /// Format version (always 3 for maps produced here).
    #[serde(default = "default_version")]
    pub version: u32,

    /// Name of the generated file this map describes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file: Option<String>,

    /// Prefix applied to every entry of `sources`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_root: Option<String>,

    /// Original source paths.
    #[serde(default)]
    pub sources: Vec<String>,

    /// Symbol names referenced by 5-field segments.
    #[serde(default)]
    pub names: Vec<String>,

    /// VLQ encoded mappings.
    pub mappings: String,

    /// Original source contents, parallel to `sources`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sources_content: Option<Vec<Option<String>>>,
}

impl Default for RawSourceMap {
    fn default() -> Self {
        Self {
            version: default_version(),
            file: None,
            source_root: None,
            sources: Vec::new(),
            names: Vec::new(),
            mappings: String::new(),
            sources_content: None,
        }
    }
}

impl RawSourceMap {
    /// Parse from JSON.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Convert to JSON.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Convert to compact JSON.
    pub fn to_json_compact(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Inline content for the source at `index`, if the map carries any.
    pub fn source_content(&self, index: usize) -> Option<&str> {
        self.sources_content
            .as_ref()?
            .get(index)?
            .as_deref()
            .filter(|content| !content.is_empty())
    }
}

/// A raw source map together with the file it was read from.
///
/// `map_path` is `None` when the map came from an inline comment or was
/// handed over in memory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MapAndPath {
    pub map: RawSourceMap,
    pub map_path: Option<PathBuf>,
}

impl MapAndPath {
    pub fn new(map: RawSourceMap, map_path: Option<PathBuf>) -> Self {
        Self { map, map_path }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_minimal_map() {
        let map = RawSourceMap::from_json(r#"{"version":3,"sources":["a.ts"],"mappings":"AAAA"}"#)
            .unwrap();
        assert_eq!(map.version, 3);
        assert_eq!(map.file, None);
        assert!(map.names.is_empty());
        assert_eq!(map.sources, vec!["a.ts".to_string()]);
        assert_eq!(map.sources_content, None);
    }

    #[test]
    fn test_parse_camel_case_fields() {
        let map = RawSourceMap::from_json(
            r#"{
                "version": 3,
                "file": "out.js",
                "sourceRoot": "src",
                "sources": ["a.ts", "b.ts"],
                "sourcesContent": ["let a;", null],
                "names": ["a"],
                "mappings": ""
            }"#,
        )
        .unwrap();
        assert_eq!(map.source_root.as_deref(), Some("src"));
        assert_eq!(map.source_content(0), Some("let a;"));
        assert_eq!(map.source_content(1), None);
        assert_eq!(map.source_content(2), None);
    }

    #[test]
    fn test_compact_json_field_order() {
        let map = RawSourceMap {
            version: 3,
            file: Some("index.js".to_string()),
            source_root: None,
            sources: vec!["index.ts".to_string()],
            names: vec![],
            mappings: "AAAA".to_string(),
            sources_content: Some(vec![Some("x".to_string())]),
        };
        insta::assert_snapshot!(
            map.to_json_compact().unwrap(),
            @r#"{"version":3,"file":"index.js","sources":["index.ts"],"names":[],"mappings":"AAAA","sourcesContent":["x"]}"#
        );
    }
}
