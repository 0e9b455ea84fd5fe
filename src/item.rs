//! Content items and their construction from source files.
//!
//! One item describes one page. Its typed fields are derived by the scan;
//! every other front-matter key is carried along in [`Item::data`].
//!
//! ## Derived fields
//!
//! | Field | Source |
//! |-------|--------|
//! | `path` | `<alias>/<relative path>`, always |
//! | `route` | [`normalize_route`] + [`translate_route`], always |
//! | `language` | [`detect_language`], always |
//! | `modified` | front matter, else file modification time |
//! | `date` | front matter, else file status-change time |
//! | `hidden` | front matter, else `true` unless the file name has a sort prefix |
//!
//! The extension is trimmed from the route unless the front matter sets
//! `keep_extension` to a truthy value (`feed.xml` stays `feed.xml`).

use crate::front_matter::{FrontMatterLoader, LoadError, Metadata};
use crate::naming::has_sort_prefix;
use crate::route::{detect_language, normalize_route, translate_route};
use chrono::{DateTime, Local, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fs;
use std::path::Path;

/// A single page of the site.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Item {
    /// Source path, prefixed with the content root's alias (`@page/02-about/01-index.md`).
    pub path: String,
    /// Canonical URL path; `""` for the site index.
    pub route: String,
    /// Language code, or `"default"`.
    pub language: String,
    /// ISO-8601 timestamp.
    pub modified: String,
    /// ISO-8601 timestamp.
    pub date: String,
    pub hidden: bool,
    /// Remaining front-matter keys.
    #[serde(flatten)]
    pub data: Metadata,
}

impl Item {
    /// Front-matter `title`, if it is a string.
    pub fn title(&self) -> Option<&str> {
        self.data.get("title").and_then(Value::as_str)
    }

    /// Label for menus: the title, falling back to the last route segment.
    pub fn menu_title(&self) -> &str {
        self.title()
            .unwrap_or_else(|| self.route.rsplit('/').next().unwrap_or_default())
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.data.get(key)
    }

    /// Route of the enclosing page; `""` for top-level pages.
    pub fn parent_route(&self) -> &str {
        self.route.rsplit_once('/').map_or("", |(parent, _)| parent)
    }

    pub fn is_index(&self) -> bool {
        self.route.is_empty()
    }
}

/// Truthiness of a front-matter value: null, false, zero, `""`, `"0"` and
/// empty collections are false.
pub fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty() && s != "0",
        Value::Array(a) => !a.is_empty(),
        Value::Object(o) => !o.is_empty(),
    }
}

fn value_to_string(value: Value) -> String {
    match value {
        Value::String(s) => s,
        other => other.to_string(),
    }
}

/// Builds [`Item`]s from content files.
#[derive(Debug, Clone)]
pub struct ItemFactory<L> {
    loader: L,
    languages: Vec<String>,
}

impl<L: FrontMatterLoader> ItemFactory<L> {
    pub fn new(loader: L, languages: &[String]) -> Self {
        Self {
            loader,
            languages: languages.to_vec(),
        }
    }

    /// Build the item for one file.
    ///
    /// Returns `Ok(None)` when the file is a variant for another language
    /// than `requested_language`. Fails only when the file cannot be read.
    pub fn create(
        &self,
        absolute_path: &Path,
        relative_path: &str,
        alias: &str,
        requested_language: &str,
    ) -> Result<Option<Item>, LoadError> {
        let mut data = self.loader.load(absolute_path)?.data;

        let trim_extension = !data.get("keep_extension").is_some_and(is_truthy);
        let route = normalize_route(relative_path, trim_extension);

        let language = detect_language(relative_path, &self.languages);
        if language != requested_language {
            tracing::trace!(path = relative_path, language, "skipping other language");
            return Ok(None);
        }
        let route = translate_route(&route, language);

        for key in ["path", "route", "language"] {
            data.remove(key);
        }

        let mut times = FileTimes::new(absolute_path);
        let modified = match data.remove("modified").filter(is_truthy) {
            Some(value) => value_to_string(value),
            None => times.modified()?,
        };
        let date = match data.remove("date").filter(is_truthy) {
            Some(value) => value_to_string(value),
            None => times.changed()?,
        };

        let hidden = match data.remove("hidden").filter(|v| !v.is_null()) {
            Some(value) => is_truthy(&value),
            None => {
                let filename = relative_path.rsplit('/').next().unwrap_or(relative_path);
                !has_sort_prefix(filename)
            }
        };

        Ok(Some(Item {
            path: format!("{alias}/{relative_path}"),
            route,
            language: language.to_string(),
            modified,
            date,
            hidden,
            data,
        }))
    }
}

/// Filesystem timestamps of a file, read on first use.
struct FileTimes<'a> {
    path: &'a Path,
    metadata: Option<fs::Metadata>,
}

impl<'a> FileTimes<'a> {
    fn new(path: &'a Path) -> Self {
        Self {
            path,
            metadata: None,
        }
    }

    fn metadata(&mut self) -> Result<&fs::Metadata, LoadError> {
        let metadata = match self.metadata.take() {
            Some(metadata) => metadata,
            None => fs::metadata(self.path).map_err(|source| self.io_error(source))?,
        };
        Ok(self.metadata.insert(metadata))
    }

    fn io_error(&self, source: std::io::Error) -> LoadError {
        LoadError::Io {
            path: self.path.to_path_buf(),
            source,
        }
    }

    fn modified(&mut self) -> Result<String, LoadError> {
        let modified = self.metadata()?.modified();
        let modified = modified.map_err(|source| self.io_error(source))?;
        Ok(iso8601(DateTime::<Utc>::from(modified)))
    }

    /// Inode change time on Unix; creation time elsewhere.
    fn changed(&mut self) -> Result<String, LoadError> {
        let metadata = self.metadata()?;

        #[cfg(unix)]
        let changed = {
            use std::os::unix::fs::MetadataExt;
            let nanos = u32::try_from(metadata.ctime_nsec()).unwrap_or(0);
            DateTime::<Utc>::from_timestamp(metadata.ctime(), nanos)
        };
        #[cfg(not(unix))]
        let changed = metadata
            .created()
            .or_else(|_| metadata.modified())
            .ok()
            .map(DateTime::<Utc>::from);

        match changed {
            Some(time) => Ok(iso8601(time)),
            None => self.modified(),
        }
    }
}

/// `2024-05-01T14:03:22+02:00`, in local time.
fn iso8601(time: DateTime<Utc>) -> String {
    time.with_timezone(&Local)
        .format("%Y-%m-%dT%H:%M:%S%:z")
        .to_string()
}
