//! # sitemenu
//!
//! Content indexing and navigation menus for flat-file websites. Your
//! content directories are the data source: every accepted file becomes an
//! item with a canonical route, directories are described by their index
//! files, and the result renders as a nested HTML menu.
//!
//! # Architecture: Build, Then Render
//!
//! ```text
//! 1. Build    pages/      →  Collection   (walk + front matter + routes, cached)
//! 2. Arrange  Collection  →  PageTree     (parent routes → hierarchy)
//! 3. Render   PageTree    →  HTML         (boundary templates + item formatter)
//! ```
//!
//! The renderer only depends on the [`tree::TreeNode`] capability, so any tree
//! of items can be rendered, not just a [`tree::PageTree`].
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`naming`] | `NNN-name` sort-prefix parser shared by routes and the hidden flag |
//! | [`filter`] | Which files and directories take part in a scan |
//! | [`walk`] | Sorted pre-order directory walk, index-file lookup |
//! | [`route`] | Paths to routes, language markers, request languages |
//! | [`front_matter`] | YAML front-matter loading |
//! | [`item`] | The `Item` model and its construction from a file |
//! | [`collection`] | Ordered items of one build |
//! | [`cache`] | Cache stores and the stored collection format |
//! | [`builder`] | Content roots to collection, cache-aware |
//! | [`tree`] | Tree capability and the navigation hierarchy |
//! | [`render`] | Nested-list HTML for any tree |
//! | [`config`] | `config.toml` loading, validation, and merging |
//! | [`output`] | CLI output formatting |
//!
//! # Design Decisions
//!
//! ## NNN-Prefix Ordering
//!
//! Directories and files use a numeric prefix (`01-`, `020-`) for explicit
//! ordering. The prefix is stripped from every route segment. Files without a
//! prefix still get an item and a route but are hidden from menus unless their
//! front matter says otherwise, which keeps drafts reachable by direct URL.
//!
//! ## Language Variants Beside Their Default
//!
//! `contact.en.md` is the English variant of `contact.md`. A build is for one
//! language: items of any other language are skipped, and variant routes move
//! under their language segment (`en/contact`). The requested language is an
//! explicit parameter, resolved from a request path by
//! [`route::requested_language`] when needed.
//!
//! ## Extension Trimming
//!
//! Routes drop the file extension unless the front matter sets a truthy
//! `keep_extension`, so `feed.xml` can keep its extension while pages do not.
//!
//! ## Cached Collections
//!
//! A full build stores its collection; the next build restores it without
//! touching the filesystem. The stored payload carries a format version and a
//! fingerprint of the build parameters, so a stale or foreign entry reads as a
//! miss. Content edits are not detected: clear the cache after editing.
//!
//! ## Maud for Item Markup
//!
//! Item labels are rendered with [Maud](https://maud.lambda.xyz/), which
//! escapes all interpolation. The surrounding list markup comes from plain
//! string templates so sites can match their existing menus.

pub mod builder;
pub mod cache;
pub mod collection;
pub mod config;
pub mod filter;
pub mod front_matter;
pub mod item;
pub mod naming;
pub mod output;
pub mod render;
pub mod route;
pub mod tree;
pub mod walk;

#[cfg(test)]
pub(crate) mod test_helpers;
