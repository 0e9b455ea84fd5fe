//! Collection building: content roots in, ordered [`Collection`] out.
//!
//! For each configured content root the builder walks the tree (see
//! [`crate::walk`]) and turns entries into items:
//!
//! - A **directory** is described by its index file. The index file becomes
//!   the directory's item and is remembered as consumed.
//! - A **file** becomes an item unless its extension is not allowed or it
//!   was already consumed as an index file.
//!
//! Items for another language than the requested one are skipped by the
//! [`ItemFactory`]. Items keep walk order.
//!
//! ## Caching
//!
//! With a cache attached, a full build first tries to restore the stored
//! collection and returns it without touching the filesystem. Otherwise it
//! scans and stores the result. Builds over custom paths never read or
//! write the cache.
//!
//! ## Failures
//!
//! A content root that cannot be walked aborts the build. A single file
//! that cannot be read is logged and left out.

use crate::cache::{self, COLLECTION_CACHE_KEY, CacheStore};
use crate::collection::Collection;
use crate::filter::extension;
use crate::front_matter::{FrontMatterLoader, YamlFrontMatter};
use crate::item::{Item, ItemFactory};
use crate::walk::{DirectoryWalker, WalkEntry, WalkError};
use std::collections::HashSet;
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use thiserror::Error;
use tracing::{debug, info, warn};

#[derive(Error, Debug)]
pub enum BuildError {
    #[error("Cannot scan content path {alias} ({}): {source}", path.display())]
    Walk {
        alias: String,
        path: PathBuf,
        #[source]
        source: WalkError,
    },
}

/// A content root and the alias its item paths are prefixed with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContentPath {
    pub alias: String,
    pub path: PathBuf,
}

impl ContentPath {
    pub fn new(alias: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        Self {
            alias: alias.into(),
            path: path.into(),
        }
    }
}

impl fmt::Display for ContentPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}={}", self.alias, self.path.display())
    }
}

/// Parses `ALIAS=DIR`.
impl FromStr for ContentPath {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.split_once('=') {
            Some((alias, path)) if !alias.is_empty() && !path.is_empty() => {
                Ok(Self::new(alias, path))
            }
            _ => Err(format!("expected ALIAS=DIR, got '{s}'")),
        }
    }
}

/// Index files already used to describe their directory.
///
/// Scoped to one content root of one build.
#[derive(Debug, Default)]
struct IndexFiles(HashSet<PathBuf>);

impl IndexFiles {
    fn consume(&mut self, path: PathBuf) {
        self.0.insert(path);
    }

    fn is_consumed(&self, path: &Path) -> bool {
        self.0.contains(path)
    }
}

/// Scans content roots into a [`Collection`].
pub struct CollectionBuilder<L = YamlFrontMatter> {
    paths: Vec<ContentPath>,
    walker: DirectoryWalker,
    factory: ItemFactory<L>,
    languages: Vec<String>,
    cache: Option<Box<dyn CacheStore>>,
}

impl CollectionBuilder<YamlFrontMatter> {
    /// Builder with the YAML front-matter loader and no cache.
    ///
    /// `languages` are the language markers recognized in file names.
    pub fn new(paths: Vec<ContentPath>, walker: DirectoryWalker, languages: &[String]) -> Self {
        Self {
            paths,
            walker,
            factory: ItemFactory::new(YamlFrontMatter, languages),
            languages: languages.to_vec(),
            cache: None,
        }
    }
}

impl<L: FrontMatterLoader> CollectionBuilder<L> {
    /// Replace the front-matter loader.
    pub fn with_loader<M: FrontMatterLoader>(self, loader: M) -> CollectionBuilder<M> {
        CollectionBuilder {
            factory: ItemFactory::new(loader, &self.languages),
            paths: self.paths,
            walker: self.walker,
            languages: self.languages,
            cache: self.cache,
        }
    }

    pub fn with_cache(mut self, cache: impl CacheStore + 'static) -> Self {
        self.set_cache(Box::new(cache));
        self
    }

    pub fn set_cache(&mut self, cache: Box<dyn CacheStore>) {
        self.cache = Some(cache);
    }

    pub fn unset_cache(&mut self) {
        self.cache = None;
    }

    pub fn cache(&self) -> Option<&dyn CacheStore> {
        self.cache.as_deref()
    }

    pub fn paths(&self) -> &[ContentPath] {
        &self.paths
    }

    /// Build the collection for `language`.
    ///
    /// With `custom_paths`, those roots are scanned instead of the configured
    /// ones and the cache is bypassed in both directions.
    pub fn build(
        &self,
        language: &str,
        custom_paths: Option<&[ContentPath]>,
    ) -> Result<Collection, BuildError> {
        let fingerprint = self.fingerprint(language);

        if custom_paths.is_none()
            && let Some(collection) = self.restore(&fingerprint)
        {
            debug!(items = collection.len(), language, "restored collection from cache");
            return Ok(collection);
        }

        let mut collection = Collection::new();
        for content_path in custom_paths.unwrap_or(&self.paths) {
            self.scan_path(content_path, language, &mut collection)?;
        }

        if custom_paths.is_none() {
            self.store(&collection, &fingerprint);
        }

        info!(
            items = collection.len(),
            language,
            custom = custom_paths.is_some(),
            "built collection"
        );
        Ok(collection)
    }

    fn scan_path(
        &self,
        content_path: &ContentPath,
        language: &str,
        collection: &mut Collection,
    ) -> Result<(), BuildError> {
        debug!(alias = %content_path.alias, path = %content_path.path.display(), "scanning");
        let walk_error = |source| BuildError::Walk {
            alias: content_path.alias.clone(),
            path: content_path.path.clone(),
            source,
        };

        let mut index_files = IndexFiles::default();
        for entry in self.walker.walk(&content_path.path) {
            let entry = entry.map_err(walk_error)?;
            let item = self
                .process_entry(&entry, &content_path.alias, language, &mut index_files)
                .map_err(walk_error)?;
            if let Some(item) = item {
                collection.add_item(item);
            }
        }
        Ok(())
    }

    fn process_entry(
        &self,
        entry: &WalkEntry,
        alias: &str,
        language: &str,
        index_files: &mut IndexFiles,
    ) -> Result<Option<Item>, WalkError> {
        if entry.is_dir {
            let Some(index_file) = self.walker.find_index_file(&entry.path)? else {
                return Ok(None);
            };
            let file_name = index_file
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_default();
            let relative_path = format!("{}/{file_name}", entry.relative_path);

            let item = self.create_item(&index_file, &relative_path, alias, language);
            index_files.consume(index_file);
            return Ok(item);
        }

        let allowed = self
            .walker
            .filter()
            .allows_extension(extension(entry.file_name()));
        if !allowed || index_files.is_consumed(&entry.path) {
            return Ok(None);
        }
        Ok(self.create_item(&entry.path, &entry.relative_path, alias, language))
    }

    fn create_item(
        &self,
        absolute_path: &Path,
        relative_path: &str,
        alias: &str,
        language: &str,
    ) -> Option<Item> {
        match self
            .factory
            .create(absolute_path, relative_path, alias, language)
        {
            Ok(item) => item,
            Err(err) => {
                warn!(%err, "skipping unreadable file");
                None
            }
        }
    }

    fn restore(&self, fingerprint: &str) -> Option<Collection> {
        let cache = self.cache.as_deref()?;
        let Some(payload) = cache.get(COLLECTION_CACHE_KEY) else {
            debug!("collection cache miss");
            return None;
        };
        let collection = cache::decode_collection(&payload, fingerprint);
        if collection.is_none() {
            debug!("stored collection is stale or unreadable, rebuilding");
        }
        collection
    }

    fn store(&self, collection: &Collection, fingerprint: &str) {
        let Some(cache) = self.cache.as_deref() else {
            return;
        };
        let stored = cache::encode_collection(collection, fingerprint)
            .and_then(|payload| cache.set(COLLECTION_CACHE_KEY, &payload));
        match stored {
            Ok(()) => debug!(items = collection.len(), "stored collection in cache"),
            Err(err) => warn!(%err, "failed to store collection in cache"),
        }
    }

    /// Hash of everything that shapes a full build's result.
    fn fingerprint(&self, language: &str) -> String {
        let extensions = self.walker.filter().extensions();
        let mut fields = vec![format!("paths:{}", self.paths.len())];
        for content_path in &self.paths {
            fields.push(content_path.alias.clone());
            fields.push(content_path.path.to_string_lossy().into_owned());
        }
        fields.push(format!("extensions:{}", extensions.len()));
        fields.extend(extensions.iter().cloned());
        fields.push(format!("languages:{}", self.languages.len()));
        fields.extend(self.languages.iter().cloned());
        fields.push(format!("index:{}", self.walker.index_name()));
        fields.push(format!("language:{language}"));

        cache::hash_build_params(fields.iter().map(String::as_str))
    }
}
