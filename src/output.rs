//! CLI output formatting.
//!
//! # Information-First Display
//!
//! Every item leads with its positional index and title, followed by its
//! route. The source file and flags are indented context lines, so the
//! listing reads as a content inventory that still traces back to files.
//!
//! # Output Format
//!
//! ```text
//! Items (default)
//! 001 Home → /
//!     Source: @page/01-index.md
//! 002 About → /about
//!     Source: @page/02-about/01-index.md
//! 003 Notes → /about/notes
//!     Source: @page/02-about/notes.md
//!     Hidden
//!
//! Menu
//! 001 Home → /
//! 002 About → /about
//!     001 Team → /about/team
//!
//! 3 items, 1 hidden, scanned
//! ```
//!
//! # Architecture
//!
//! Each listing has a `format_*` function (returns `Vec<String>`) for
//! testability and a `print_*` wrapper that writes to stdout. Format
//! functions are pure.

use crate::collection::Collection;
use crate::item::Item;
use crate::route::DEFAULT_LANGUAGE;
use crate::tree::{PageNode, PageTree, TreeNode};

/// Format a 1-based positional index as 3-digit zero-padded.
fn format_index(pos: usize) -> String {
    format!("{:0>3}", pos)
}

/// Return indentation string: 4 spaces per depth level.
fn indent(depth: usize) -> String {
    "    ".repeat(depth)
}

/// `001 About → /about`
fn item_header(index: usize, item: &Item) -> String {
    format!(
        "{} {} → /{}",
        format_index(index),
        item.menu_title(),
        item.route
    )
}

/// Format the full collection in build order.
pub fn format_collection(collection: &Collection, language: &str) -> Vec<String> {
    let mut lines = vec![format!("Items ({language})")];
    for (i, item) in collection.iter().enumerate() {
        lines.push(item_header(i + 1, item));
        lines.push(format!("{}Source: {}", indent(1), item.path));
        if item.language != DEFAULT_LANGUAGE {
            lines.push(format!("{}Language: {}", indent(1), item.language));
        }
        if item.hidden {
            lines.push(format!("{}Hidden", indent(1)));
        }
    }
    lines
}

/// Format the menu outline, positions counted per sibling level.
pub fn format_tree(tree: &PageTree<'_>) -> Vec<String> {
    let mut lines = vec!["Menu".to_string()];
    for (i, root) in tree.roots().enumerate() {
        format_node(root, i + 1, 0, &mut lines);
    }
    lines
}

fn format_node(node: PageNode<'_, '_>, position: usize, depth: usize, lines: &mut Vec<String>) {
    lines.push(format!("{}{}", indent(depth), item_header(position, node.page())));
    for (i, child) in node.children().enumerate() {
        format_node(child, i + 1, depth + 1, lines);
    }
}

/// `9 items, 2 hidden, restored from cache`
pub fn format_summary(collection: &Collection) -> String {
    let hidden = collection.iter().filter(|i| i.hidden).count();
    let source = if collection.from_cache() {
        "restored from cache"
    } else {
        "scanned"
    };
    let noun = if collection.len() == 1 { "item" } else { "items" };
    format!("{} {noun}, {hidden} hidden, {source}", collection.len())
}

/// Print the collection, its menu outline and a summary line.
pub fn print_collection(collection: &Collection, language: &str) {
    for line in format_collection(collection, language) {
        println!("{}", line);
    }
    println!();
    for line in format_tree(&PageTree::from_collection(collection, false)) {
        println!("{}", line);
    }
    println!();
    println!("{}", format_summary(collection));
}
