//! Shared test utilities for the sitemenu test suite.
//!
//! Provides fixture setup, item construction, and lookups over built
//! collections and trees.
//!
//! # Usage
//!
//! ```rust
//! use crate::test_helpers::*;
//!
//! let tmp = setup_fixtures();
//! let collection = fixture_builder(&tmp).build(DEFAULT_LANGUAGE, None).unwrap();
//!
//! let about = find_item(&collection, "about");
//! assert_eq!(about.title(), Some("About"));
//! assert_eq!(routes(&collection)[..2], ["", "about"]);
//! ```

use serde_json::json;
use std::path::Path;
use tempfile::TempDir;

use crate::builder::{CollectionBuilder, ContentPath};
use crate::collection::Collection;
use crate::filter::FileFilter;
use crate::front_matter::Metadata;
use crate::item::Item;
use crate::route::DEFAULT_LANGUAGE;
use crate::walk::DirectoryWalker;

// =========================================================================
// Fixture setup
// =========================================================================

/// Copy `fixtures/content/` to a temp directory and return it.
///
/// The copy holds `config.toml` and the `pages/` content root. Tests may
/// mutate it freely.
pub fn setup_fixtures() -> TempDir {
    let tmp = TempDir::new().unwrap();
    let fixtures = Path::new(env!("CARGO_MANIFEST_DIR")).join("fixtures/content");
    copy_dir_recursive(&fixtures, tmp.path()).unwrap();
    tmp
}

fn copy_dir_recursive(src: &Path, dst: &Path) -> std::io::Result<()> {
    for entry in std::fs::read_dir(src)? {
        let entry = entry?;
        let src_path = entry.path();
        let dst_path = dst.join(entry.file_name());

        if src_path.is_dir() {
            std::fs::create_dir_all(&dst_path)?;
            copy_dir_recursive(&src_path, &dst_path)?;
        } else {
            std::fs::copy(&src_path, &dst_path)?;
        }
    }
    Ok(())
}

/// Default extensions, as owned strings.
pub fn extensions() -> Vec<String> {
    ["txt", "md", "markdown", "textile", "htm", "html", "rss", "xml"]
        .iter()
        .map(|s| s.to_string())
        .collect()
}

/// Builder over the fixture's `pages/` root (alias `@page`), without a cache.
pub fn fixture_builder(tmp: &TempDir) -> CollectionBuilder {
    let walker = DirectoryWalker::new(FileFilter::new(&extensions()), "index");
    CollectionBuilder::new(
        vec![ContentPath::new("@page", tmp.path().join("pages"))],
        walker,
        &["en".to_string()],
    )
}

// =========================================================================
// Item construction
// =========================================================================

/// An item with only a route, a title and a hidden flag set.
pub fn make_item(route: &str, title: &str, hidden: bool) -> Item {
    let mut data = Metadata::new();
    data.insert("title".to_string(), json!(title));
    let path = if route.is_empty() {
        "@page/index.md".to_string()
    } else {
        format!("@page/{route}.md")
    };
    Item {
        path,
        route: route.to_string(),
        language: DEFAULT_LANGUAGE.to_string(),
        modified: "2024-01-01T00:00:00+00:00".to_string(),
        date: "2024-01-01T00:00:00+00:00".to_string(),
        hidden,
        data,
    }
}

/// Collection of visible items titled after their routes.
pub fn collection_of(routes: &[&str]) -> Collection {
    let mut collection = Collection::new();
    for route in routes {
        collection.add_item(make_item(route, &title_for(route), false));
    }
    collection
}

/// `"about/team"` → `"Team"`, `""` → `"Home"`.
pub fn title_for(route: &str) -> String {
    let last = route.rsplit('/').next().unwrap_or_default();
    let mut chars = last.chars();
    match chars.next() {
        None => "Home".to_string(),
        Some(first) => first.to_uppercase().chain(chars).collect(),
    }
}

// =========================================================================
// Collection lookups — panics with a clear message on miss
// =========================================================================

/// Find an item by route. Panics if not found.
pub fn find_item<'a>(collection: &'a Collection, route: &str) -> &'a Item {
    collection.find(route).unwrap_or_else(|| {
        let available = routes(collection);
        panic!("item '{route}' not found. Available: {available:?}")
    })
}

/// All routes in collection order.
pub fn routes(collection: &Collection) -> Vec<&str> {
    collection.iter().map(|i| i.route.as_str()).collect()
}
