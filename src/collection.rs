//! The ordered set of items produced by a build.

use crate::item::Item;
use serde::{Deserialize, Serialize};

/// Items in scan order, plus whether they were restored from a cache.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Collection {
    items: Vec<Item>,
    #[serde(default)]
    from_cache: bool,
}

impl Collection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_item(&mut self, item: Item) {
        self.items.push(item);
    }

    pub fn items(&self) -> &[Item] {
        &self.items
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Item> {
        self.items.iter()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// True when this collection came out of the cache rather than a scan.
    pub fn from_cache(&self) -> bool {
        self.from_cache
    }

    pub(crate) fn set_from_cache(&mut self, from_cache: bool) {
        self.from_cache = from_cache;
    }

    /// The first item with the given route.
    pub fn find(&self, route: &str) -> Option<&Item> {
        self.items.iter().find(|item| item.route == route)
    }

    /// Items that appear in menus.
    pub fn visible(&self) -> impl Iterator<Item = &Item> {
        self.items.iter().filter(|item| !item.hidden)
    }
}

impl<'a> IntoIterator for &'a Collection {
    type Item = &'a Item;
    type IntoIter = std::slice::Iter<'a, Item>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::make_item;

    fn sample() -> Collection {
        let mut collection = Collection::new();
        collection.add_item(make_item("", "Home", false));
        collection.add_item(make_item("about", "About", false));
        collection.add_item(make_item("drafts", "Drafts", true));
        collection
    }

    #[test]
    fn new_collection_is_empty_and_fresh() {
        let collection = Collection::new();
        assert!(collection.is_empty());
        assert!(!collection.from_cache());
    }

    #[test]
    fn preserves_insertion_order() {
        let collection = sample();
        let routes: Vec<&str> = collection.iter().map(|i| i.route.as_str()).collect();
        assert_eq!(routes, vec!["", "about", "drafts"]);
    }

    #[test]
    fn find_by_route() {
        let collection = sample();
        assert_eq!(collection.find("about").unwrap().menu_title(), "About");
        assert!(collection.find("missing").is_none());
        assert!(collection.find("").unwrap().is_index());
    }

    #[test]
    fn visible_skips_hidden() {
        let collection = sample();
        let routes: Vec<&str> = collection.visible().map(|i| i.route.as_str()).collect();
        assert_eq!(routes, vec!["", "about"]);
    }

    #[test]
    fn from_cache_survives_serialization() {
        let mut collection = sample();
        collection.set_from_cache(true);

        let json = serde_json::to_string(&collection).unwrap();
        let back: Collection = serde_json::from_str(&json).unwrap();
        assert!(back.from_cache());
        assert_eq!(back.len(), 3);
    }
}
