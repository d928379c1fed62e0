//! Recursive loading of source files together with their source maps.

use crate::config::LoaderConfig;
use crate::error::LoadError;
use crate::origin::ContentOrigin;
use lazy_static::lazy_static;
use regex::{Captures, Regex};
use remap_core::comment::{find_external_map_url, find_inline_map, last_non_empty_line};
use remap_core::{FileSystem, MapAndPath, RawSourceMap, SourceFileId, SourceFileStore};
use rustc_hash::FxHashMap;
use std::path::{Path, PathBuf};

lazy_static! {
    static ref SCHEME_MATCHER: Regex =
        Regex::new(r"(?i)^([a-z][a-z0-9.-]*)://").expect("scheme pattern");
}

/// A source map together with where it was found.
struct SourceMapInfo {
    map: RawSourceMap,
    map_path: Option<PathBuf>,
    origin: ContentOrigin,
}

/// Loads source files and, recursively, the files their source maps name.
///
/// Every file is flattened as soon as its sources are loaded, so the
/// mappings of the file handed to [`SourceFileLoader::load_source_file`]
/// lead straight to the original sources.
pub struct SourceFileLoader<'fs> {
    fs: &'fs dyn FileSystem,
    config: LoaderConfig,
    files: SourceFileStore,
    /// Files read while loading the current chain, outermost first.
    current_paths: Vec<PathBuf>,
    /// Files already loaded from disk.
    loaded: FxHashMap<PathBuf, SourceFileId>,
}

impl<'fs> SourceFileLoader<'fs> {
    pub fn new(fs: &'fs dyn FileSystem, config: LoaderConfig) -> Self {
        Self {
            fs,
            config,
            files: SourceFileStore::new(),
            current_paths: Vec::new(),
            loaded: FxHashMap::default(),
        }
    }

    /// The files loaded so far.
    pub fn files(&self) -> &SourceFileStore {
        &self.files
    }

    pub fn into_files(self) -> SourceFileStore {
        self.files
    }

    /// Load the source file at `source_path`.
    ///
    /// The path is normalised first, so `./` and `..` segments name the
    /// same file as the resolved paths of map sources.
    ///
    /// `contents` and `map_and_path` are read from disk when not given. If
    /// no map is given, one is looked for in the contents and then next to
    /// the file. Returns `Ok(None)` if the file does not exist or cannot be
    /// loaded; the reason is logged. A circular dependency between files is
    /// an error.
    pub fn load_source_file(
        &mut self,
        source_path: &Path,
        contents: Option<String>,
        map_and_path: Option<MapAndPath>,
    ) -> Result<Option<SourceFileId>, LoadError> {
        let contents_origin = if contents.is_some() {
            ContentOrigin::Provided
        } else {
            ContentOrigin::FileSystem
        };
        let map_info = map_and_path.map(|map_and_path| SourceMapInfo {
            map: map_and_path.map,
            map_path: map_and_path.map_path,
            origin: ContentOrigin::Provided,
        });
        let source_path = self.fs.resolve(source_path, "");
        self.load_source_file_internal(&source_path, contents, contents_origin, map_info)
    }

    fn load_source_file_internal(
        &mut self,
        source_path: &Path,
        contents: Option<String>,
        contents_origin: ContentOrigin,
        map_info: Option<SourceMapInfo>,
    ) -> Result<Option<SourceFileId>, LoadError> {
        let depth = self.current_paths.len();
        let result = self.try_load_source_file(source_path, contents, contents_origin, map_info);
        self.current_paths.truncate(depth);

        match result {
            Err(err) if !err.is_fatal() => {
                tracing::warn!(
                    "Unable to fully load {} for source-map flattening: {err}",
                    source_path.display()
                );
                Ok(None)
            }
            result => result,
        }
    }

    fn try_load_source_file(
        &mut self,
        source_path: &Path,
        contents: Option<String>,
        contents_origin: ContentOrigin,
        map_info: Option<SourceMapInfo>,
    ) -> Result<Option<SourceFileId>, LoadError> {
        let from_disk = contents.is_none() && map_info.is_none();
        if from_disk {
            if let Some(&id) = self.loaded.get(source_path) {
                tracing::trace!(path = %source_path.display(), "source file already loaded");
                return Ok(Some(id));
            }
        }

        let contents = match contents {
            Some(contents) => contents,
            None => {
                if !self.fs.exists(source_path) {
                    tracing::debug!(path = %source_path.display(), "source file does not exist");
                    return Ok(None);
                }
                self.read_source_file(source_path)?
            }
        };

        let map_info = match map_info {
            Some(map_info) => Some(map_info),
            None => self.load_source_map(source_path, &contents, contents_origin)?,
        };

        let sources = match &map_info {
            Some(map_info) => {
                let base_path = map_info.map_path.as_deref().unwrap_or(source_path);
                self.process_sources(base_path, map_info)?
            }
            None => Vec::new(),
        };

        let raw_map = map_info.map(|map_info| MapAndPath::new(map_info.map, map_info.map_path));
        let id = self
            .files
            .add(source_path, &contents, raw_map, sources)
            .map_err(|source| LoadError::Mapping {
                path: source_path.to_path_buf(),
                source,
            })?;

        if from_disk {
            self.loaded.insert(source_path.to_path_buf(), id);
        }
        Ok(Some(id))
    }

    /// Find the source map for a file with the given `contents`.
    ///
    /// An inline map wins. Files whose contents were themselves inline only
    /// look for an inline map. Otherwise an external map comment is followed,
    /// then an implied `<file>.map` is tried.
    fn load_source_map(
        &mut self,
        source_path: &Path,
        contents: &str,
        contents_origin: ContentOrigin,
    ) -> Result<Option<SourceMapInfo>, LoadError> {
        let last_line = last_non_empty_line(contents);

        if let Some(inline) = find_inline_map(last_line) {
            let map = inline.map_err(|source| LoadError::InlineMap {
                path: source_path.to_path_buf(),
                source,
            })?;
            tracing::debug!(path = %source_path.display(), "found inline source map");
            return Ok(Some(SourceMapInfo {
                map,
                map_path: None,
                origin: ContentOrigin::Inline,
            }));
        }

        if contents_origin == ContentOrigin::Inline {
            return Ok(None);
        }

        if let Some(url) = find_external_map_url(last_line) {
            let map_path = self.fs.resolve(&self.fs.dirname(source_path), url);
            return match self.read_raw_source_map(&map_path) {
                Ok(map) => {
                    tracing::debug!(path = %map_path.display(), "found external source map");
                    Ok(Some(SourceMapInfo {
                        map,
                        map_path: Some(map_path),
                        origin: ContentOrigin::FileSystem,
                    }))
                }
                Err(err) if err.is_fatal() => Err(err),
                Err(err) => {
                    tracing::warn!(
                        "Unable to fully load {} for source-map flattening: {err}",
                        source_path.display()
                    );
                    Ok(None)
                }
            };
        }

        if !self.config.infer_map_files {
            return Ok(None);
        }

        let implied_path = self.fs.resolve(
            &self.fs.dirname(source_path),
            &format!("{}.map", self.fs.basename(source_path)),
        );
        if self.fs.exists(&implied_path) {
            let map = self.read_raw_source_map(&implied_path)?;
            tracing::debug!(path = %implied_path.display(), "found implied source map");
            return Ok(Some(SourceMapInfo {
                map,
                map_path: Some(implied_path),
                origin: ContentOrigin::FileSystem,
            }));
        }

        Ok(None)
    }

    /// Load every file named in the map's `sources`, preserving gaps.
    fn process_sources(
        &mut self,
        base_path: &Path,
        map_info: &SourceMapInfo,
    ) -> Result<Vec<Option<SourceFileId>>, LoadError> {
        let map = &map_info.map;
        let source_root = self.fs.resolve(
            &self.fs.dirname(base_path),
            &self.replace_scheme_with_path(map.source_root.as_deref().unwrap_or_default()),
        );

        let mut sources = Vec::with_capacity(map.sources.len());
        for (index, source) in map.sources.iter().enumerate() {
            let path = self
                .fs
                .resolve(&source_root, &self.replace_scheme_with_path(source));
            let contents = map.source_content(index).map(str::to_string);
            // Contents carried by a provided map are treated like disk contents.
            let contents_origin =
                if contents.is_some() && map_info.origin != ContentOrigin::Provided {
                    ContentOrigin::Inline
                } else {
                    ContentOrigin::FileSystem
                };
            sources.push(self.load_source_file_internal(&path, contents, contents_origin, None)?);
        }
        Ok(sources)
    }

    fn read_source_file(&mut self, source_path: &Path) -> Result<String, LoadError> {
        self.track_path(source_path)?;
        self.fs.read_file(source_path).map_err(|source| LoadError::Io {
            path: source_path.to_path_buf(),
            source,
        })
    }

    fn read_raw_source_map(&mut self, map_path: &Path) -> Result<RawSourceMap, LoadError> {
        self.track_path(map_path)?;
        let json = self.fs.read_file(map_path).map_err(|source| LoadError::Io {
            path: map_path.to_path_buf(),
            source,
        })?;
        RawSourceMap::from_json(&json).map_err(|source| LoadError::Json {
            path: map_path.to_path_buf(),
            source,
        })
    }

    /// Record that `path` is being read, failing if it already is.
    fn track_path(&mut self, path: &Path) -> Result<(), LoadError> {
        if self.current_paths.iter().any(|current| current == path) {
            let chain = self
                .current_paths
                .iter()
                .chain(std::iter::once(&path.to_path_buf()))
                .map(|path| path.display().to_string())
                .collect::<Vec<_>>()
                .join(" -> ");
            return Err(LoadError::CircularDependency { chain });
        }
        self.current_paths.push(path.to_path_buf());
        Ok(())
    }

    /// Replace a leading `scheme://` with its configured path, or drop it.
    fn replace_scheme_with_path(&self, path: &str) -> String {
        SCHEME_MATCHER
            .replace(path, |captures: &Captures| {
                self.config
                    .scheme_map
                    .get(&captures[1].to_lowercase())
                    .cloned()
                    .unwrap_or_default()
            })
            .into_owned()
    }
}
