//! Loader configuration.

use rustc_hash::FxHashMap;

/// Configuration for the source file loader.
#[derive(Debug, Clone)]
pub struct LoaderConfig {
    /// Replacement paths for URL schemes in `sources`, keyed by lower-case scheme
    pub scheme_map: FxHashMap<String, String>,
    /// Whether to look for a `<file>.map` next to files without a map comment
    pub infer_map_files: bool,
}

impl Default for LoaderConfig {
    fn default() -> Self {
        Self {
            scheme_map: FxHashMap::default(),
            infer_map_files: true,
        }
    }
}

impl LoaderConfig {
    /// Create config from environment variables.
    pub fn from_env() -> Self {
        let scheme_map = std::env::var("REMAP_SCHEME_MAP")
            .map(|v| v.split(',').filter_map(parse_scheme_entry).collect())
            .unwrap_or_default();

        let infer_map_files = std::env::var("REMAP_INFER_MAP_FILES")
            .map(|v| !(v == "0" || v.to_lowercase() == "false"))
            .unwrap_or(true);

        Self {
            scheme_map,
            infer_map_files,
        }
    }

    /// Create a builder for configuration.
    pub fn builder() -> LoaderConfigBuilder {
        LoaderConfigBuilder::default()
    }
}

/// Parse a `scheme=path` entry. The scheme is lower-cased.
pub fn parse_scheme_entry(entry: &str) -> Option<(String, String)> {
    let (scheme, path) = entry.split_once('=')?;
    let scheme = scheme.trim();
    if scheme.is_empty() {
        return None;
    }
    Some((scheme.to_lowercase(), path.trim().to_string()))
}

/// Builder for loader configuration.
#[derive(Debug, Default)]
pub struct LoaderConfigBuilder {
    config: LoaderConfig,
}

impl LoaderConfigBuilder {
    pub fn scheme(mut self, scheme: impl AsRef<str>, path: impl Into<String>) -> Self {
        self.config
            .scheme_map
            .insert(scheme.as_ref().to_lowercase(), path.into());
        self
    }

    pub fn infer_map_files(mut self, infer: bool) -> Self {
        self.config.infer_map_files = infer;
        self
    }

    pub fn build(self) -> LoaderConfig {
        self.config
    }
}
