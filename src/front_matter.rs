//! Front matter: the metadata block at the top of a content file.
//!
//! ```text
//! ---
//! title: About us
//! keep_extension: false
//! ---
//! Body text follows the closing fence.
//! ```
//!
//! The block is YAML between two `---` lines. A file without a block, or
//! with a block that does not parse into a mapping, yields empty metadata
//! and is still a valid page. Only an unreadable file is an error.

use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Front-matter keys and values, as JSON values.
pub type Metadata = serde_json::Map<String, serde_json::Value>;

const FENCE: &str = "---";

#[derive(Error, Debug)]
pub enum LoadError {
    #[error("Cannot read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Metadata plus the raw body that follows it.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FrontMatter {
    pub data: Metadata,
    pub body: String,
}

impl FrontMatter {
    fn body_only(text: &str) -> Self {
        Self {
            data: Metadata::new(),
            body: text.to_string(),
        }
    }
}

/// Loads the front matter of one content file.
pub trait FrontMatterLoader {
    fn load(&self, path: &Path) -> Result<FrontMatter, LoadError>;
}

impl<F> FrontMatterLoader for F
where
    F: Fn(&Path) -> Result<FrontMatter, LoadError>,
{
    fn load(&self, path: &Path) -> Result<FrontMatter, LoadError> {
        self(path)
    }
}

/// Default loader for `---`-fenced YAML front matter.
#[derive(Debug, Clone, Copy, Default)]
pub struct YamlFrontMatter;

impl FrontMatterLoader for YamlFrontMatter {
    fn load(&self, path: &Path) -> Result<FrontMatter, LoadError> {
        let bytes = fs::read(path).map_err(|source| LoadError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(parse(&String::from_utf8_lossy(&bytes)))
    }
}

/// Split a document into front matter and body.
pub fn parse(text: &str) -> FrontMatter {
    let text = text.strip_prefix('\u{feff}').unwrap_or(text);

    let Some(rest) = strip_opening_fence(text) else {
        return FrontMatter::body_only(text);
    };

    let mut offset = 0;
    for line in rest.split_inclusive('\n') {
        if line.trim_end() == FENCE {
            return FrontMatter {
                data: parse_yaml(&rest[..offset]),
                body: rest[offset + line.len()..].to_string(),
            };
        }
        offset += line.len();
    }

    // Opening fence without a closing one: plain content
    FrontMatter::body_only(text)
}

fn strip_opening_fence(text: &str) -> Option<&str> {
    let first_len = text.find('\n').map_or(text.len(), |pos| pos + 1);
    (text[..first_len].trim_end() == FENCE).then(|| &text[first_len..])
}

fn parse_yaml(yaml: &str) -> Metadata {
    match serde_yaml_ng::from_str::<serde_json::Value>(yaml) {
        Ok(serde_json::Value::Object(map)) => map,
        Ok(serde_json::Value::Null) => Metadata::new(),
        Ok(other) => {
            tracing::debug!(kind = ?other, "front matter is not a mapping, ignoring");
            Metadata::new()
        }
        Err(err) => {
            tracing::debug!(%err, "malformed front matter, ignoring");
            Metadata::new()
        }
    }
}
