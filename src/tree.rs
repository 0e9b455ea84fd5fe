//! Tree shape for menus.
//!
//! [`TreeNode`] is all the renderer needs from a tree: the node's item and
//! its children in order. [`PageTree`] is the navigation hierarchy of a
//! [`Collection`], stored as an arena of item references with child index
//! lists.
//!
//! ## Hierarchy
//!
//! An item is placed under the item whose route equals its parent route:
//!
//! ```text
//! ""            Home         (root)
//! about         About        (root)
//! about/team      Team       (child of about)
//! en/contact    Contact us   (root when there is no "en" item)
//! archive/old   Old page     (dropped: no "archive" item)
//! ```
//!
//! Routes without a parent segment are roots. So are the pages of a
//! language variant (`en/contact`) when the language has no index page of
//! its own. Any other item whose parent is missing is left out together
//! with its descendants. Siblings keep collection order.

use crate::collection::Collection;
use crate::item::Item;
use crate::route::DEFAULT_LANGUAGE;
use std::collections::HashMap;

/// A node of a tree that can be rendered depth-first.
pub trait TreeNode: Sized {
    type Item;

    fn item(&self) -> &Self::Item;

    /// Direct children, in display order.
    fn children(&self) -> impl Iterator<Item = Self>;

    fn has_children(&self) -> bool {
        self.children().next().is_some()
    }
}

#[derive(Debug)]
struct Slot<'c> {
    item: &'c Item,
    children: Vec<usize>,
}

/// Navigation hierarchy over the items of a collection.
#[derive(Debug)]
pub struct PageTree<'c> {
    slots: Vec<Slot<'c>>,
    roots: Vec<usize>,
}

impl<'c> PageTree<'c> {
    /// Arrange the items of `collection` by route.
    ///
    /// Hidden items (and so their subtrees) are left out unless
    /// `include_hidden` is set.
    pub fn from_collection(collection: &'c Collection, include_hidden: bool) -> Self {
        let items: Vec<&'c Item> = collection
            .iter()
            .filter(|item| include_hidden || !item.hidden)
            .collect();

        let mut by_route: HashMap<&'c str, usize> = HashMap::new();
        for (index, item) in items.iter().enumerate() {
            by_route.entry(item.route.as_str()).or_insert(index);
        }

        let mut slots: Vec<Slot<'c>> = items
            .iter()
            .map(|&item| Slot {
                item,
                children: Vec::new(),
            })
            .collect();

        let mut roots = Vec::new();
        for (index, item) in items.into_iter().enumerate() {
            let parent_route = item.parent_route();
            if item.is_index() || parent_route.is_empty() {
                roots.push(index);
                continue;
            }

            match by_route.get(parent_route) {
                Some(&parent) => slots[parent].children.push(index),
                None if is_language_root(item, parent_route) => roots.push(index),
                None => tracing::debug!(route = %item.route, "no parent page, leaving out of menu"),
            }
        }

        Self { slots, roots }
    }

    /// Top-level nodes.
    pub fn roots(&self) -> impl Iterator<Item = PageNode<'_, 'c>> {
        self.roots.iter().map(|&index| PageNode { tree: self, index })
    }

    /// Number of items reachable from the roots.
    pub fn len(&self) -> usize {
        fn count(tree: &PageTree<'_>, index: usize) -> usize {
            1 + tree.slots[index]
                .children
                .iter()
                .map(|&child| count(tree, child))
                .sum::<usize>()
        }
        self.roots.iter().map(|&root| count(self, root)).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.roots.is_empty()
    }

    /// Routes from the root down to `route`, or empty when it is not in the
    /// tree. Useful for highlighting the active branch of a menu.
    pub fn trail(&self, route: &str) -> Vec<&'c str> {
        fn search<'c>(
            tree: &PageTree<'c>,
            index: usize,
            route: &str,
            trail: &mut Vec<&'c str>,
        ) -> bool {
            let item = tree.slots[index].item;
            trail.push(item.route.as_str());
            if item.route == route
                || tree.slots[index]
                    .children
                    .iter()
                    .any(|&child| search(tree, child, route, trail))
            {
                return true;
            }
            trail.pop();
            false
        }

        let mut trail = Vec::new();
        for &root in &self.roots {
            if search(self, root, route, &mut trail) {
                break;
            }
        }
        trail
    }
}

/// A language variant's page whose parent is the bare language segment.
fn is_language_root(item: &Item, parent_route: &str) -> bool {
    item.language != DEFAULT_LANGUAGE && parent_route == item.language
}

/// Handle to one node of a [`PageTree`].
#[derive(Debug, Clone, Copy)]
pub struct PageNode<'t, 'c> {
    tree: &'t PageTree<'c>,
    index: usize,
}

impl<'t, 'c> PageNode<'t, 'c> {
    /// The item, borrowed for as long as the collection.
    pub fn page(&self) -> &'c Item {
        self.tree.slots[self.index].item
    }
}

impl<'t, 'c> TreeNode for PageNode<'t, 'c> {
    type Item = Item;

    fn item(&self) -> &Item {
        self.page()
    }

    fn children(&self) -> impl Iterator<Item = Self> {
        let tree = self.tree;
        tree.slots[self.index]
            .children
            .iter()
            .map(move |&index| PageNode { tree, index })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::*;

    /// `(route, [child routes])` for every root.
    fn shape(tree: &PageTree<'_>) -> Vec<(String, Vec<String>)> {
        tree.roots()
            .map(|node| {
                let children = node.children().map(|c| c.item().route.clone()).collect();
                (node.item().route.clone(), children)
            })
            .collect()
    }

    fn owned(expected: &[(&str, &[&str])]) -> Vec<(String, Vec<String>)> {
        expected
            .iter()
            .map(|(route, children)| {
                (
                    route.to_string(),
                    children.iter().map(|c| c.to_string()).collect(),
                )
            })
            .collect()
    }

    #[test]
    fn nests_by_parent_route() {
        let collection = collection_of(&["", "about", "about/team", "blog", "blog/first"]);
        let tree = PageTree::from_collection(&collection, false);

        assert_eq!(
            shape(&tree),
            owned(&[
                ("", &[]),
                ("about", &["about/team"]),
                ("blog", &["blog/first"]),
            ])
        );
        assert_eq!(tree.len(), 5);
    }

    #[test]
    fn deep_nesting() {
        let collection = collection_of(&["a", "a/b", "a/b/c"]);
        let tree = PageTree::from_collection(&collection, false);

        let a = tree.roots().next().unwrap();
        let b = a.children().next().unwrap();
        let c = b.children().next().unwrap();
        assert_eq!(c.page().route, "a/b/c");
        assert!(!c.has_children());
        assert!(a.has_children());
    }

    #[test]
    fn children_before_parent_in_collection() {
        let collection = collection_of(&["about/team", "about"]);
        let tree = PageTree::from_collection(&collection, false);
        assert_eq!(shape(&tree), owned(&[("about", &["about/team"])]));
    }

    #[test]
    fn orphans_dropped_with_descendants() {
        let collection = collection_of(&["contact", "archive/old", "archive/old/deep"]);
        let tree = PageTree::from_collection(&collection, false);
        assert_eq!(shape(&tree), owned(&[("contact", &[])]));
        assert_eq!(tree.len(), 1);
    }

    #[test]
    fn hidden_items_excluded_by_default() {
        let mut collection = collection_of(&["about"]);
        collection.add_item(make_item("about/notes", "Notes", true));
        collection.add_item(make_item("drafts", "Drafts", true));
        collection.add_item(make_item("drafts/one", "One", false));

        let tree = PageTree::from_collection(&collection, false);
        assert_eq!(shape(&tree), owned(&[("about", &[])]));

        let tree = PageTree::from_collection(&collection, true);
        assert_eq!(
            shape(&tree),
            owned(&[("about", &["about/notes"]), ("drafts", &["drafts/one"])])
        );
    }

    #[test]
    fn language_pages_nest_under_language_index() {
        let mut collection = Collection::new();
        for route in ["en", "en/contact"] {
            let mut item = make_item(route, &title_for(route), false);
            item.language = "en".to_string();
            collection.add_item(item);
        }
        let tree = PageTree::from_collection(&collection, false);
        assert_eq!(shape(&tree), owned(&[("en", &["en/contact"])]));
    }

    #[test]
    fn language_pages_without_index_are_roots() {
        let mut collection = Collection::new();
        for route in ["en/about", "en/contact"] {
            let mut item = make_item(route, &title_for(route), false);
            item.language = "en".to_string();
            collection.add_item(item);
        }
        let tree = PageTree::from_collection(&collection, false);
        assert_eq!(shape(&tree), owned(&[("en/about", &[]), ("en/contact", &[])]));
    }

    #[test]
    fn empty_collection_is_empty_tree() {
        let collection = Collection::new();
        let tree = PageTree::from_collection(&collection, false);
        assert!(tree.is_empty());
        assert_eq!(tree.len(), 0);
    }

    #[test]
    fn trail_to_nested_route() {
        let collection = collection_of(&["", "about", "about/team", "blog"]);
        let tree = PageTree::from_collection(&collection, false);

        assert_eq!(tree.trail("about/team"), vec!["about", "about/team"]);
        assert_eq!(tree.trail("blog"), vec!["blog"]);
        assert_eq!(tree.trail(""), vec![""]);
        assert!(tree.trail("missing").is_empty());
    }

    #[test]
    fn fixture_tree_shape() {
        let tmp = setup_fixtures();
        let collection = fixture_builder(&tmp)
            .build(DEFAULT_LANGUAGE, None)
            .unwrap();
        let tree = PageTree::from_collection(&collection, false);

        assert_eq!(
            shape(&tree),
            owned(&[
                ("", &[]),
                ("about", &["about/team"]),
                ("blog", &["blog/first-post"]),
                ("contact", &[]),
            ])
        );
    }
}
