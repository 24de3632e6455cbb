use std::collections::HashMap;
use std::rc::Rc;

use crate::bookmarks::model::BookmarkNode;

/// Maps node ids to the node whose markup is currently live.
///
/// Nodes with an empty id are never indexed.
#[derive(Debug, Default)]
pub struct RenderedIndex {
    items: HashMap<String, Rc<BookmarkNode>>,
}

impl RenderedIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record `node` under its id. A previous entry for the same id is
    /// replaced and reported as a warning.
    pub fn register(&mut self, node: &Rc<BookmarkNode>) {
        if node.id().is_empty() {
            return;
        }
        if let Some(old) = self.items.insert(node.id().to_string(), Rc::clone(node)) {
            tracing::warn!(
                id = node.id(),
                old = old.name(),
                new = node.name(),
                "an item with this id was already indexed; the new item takes precedence"
            );
        }
    }

    /// Move every entry of `fresh` into this index, replacing entries with
    /// the same id without a warning.
    ///
    /// Used after an in-place replacement: the re-rendered subtree is indexed
    /// on its own (so duplicates within it are still reported) and then
    /// supersedes the entries of the markup it replaced.
    pub fn absorb(&mut self, fresh: RenderedIndex) {
        self.items.extend(fresh.items);
    }

    pub fn get(&self, id: &str) -> Option<&Rc<BookmarkNode>> {
        self.items.get(id)
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    #[cfg(test)]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bookmarks::model::Link;

    fn link(id: &str, name: &str) -> Rc<BookmarkNode> {
        Rc::new(BookmarkNode::Link(Link {
            id: id.into(),
            name: name.into(),
            date_added: None,
            date_modified: None,
            url: "http://x".into(),
        }))
    }

    #[test]
    fn register_last_writer_wins() {
        let mut index = RenderedIndex::new();
        let first = link("1", "first");
        let second = link("1", "second");
        index.register(&first);
        index.register(&second);
        assert_eq!(index.len(), 1);
        assert!(Rc::ptr_eq(index.get("1").unwrap(), &second));
    }

    #[test]
    fn empty_ids_are_not_indexed() {
        let mut index = RenderedIndex::new();
        index.register(&link("", "anon"));
        assert!(index.is_empty());
    }

    #[test]
    fn absorb_supersedes_existing_entries() {
        let child = link("2", "child");
        let mut fresh = RenderedIndex::new();
        fresh.register(&child);
        fresh.register(&link("3", "new"));

        let mut index = RenderedIndex::new();
        index.register(&link("1", "kept"));
        index.register(&link("2", "stale"));
        index.absorb(fresh);

        assert_eq!(index.len(), 3);
        assert!(Rc::ptr_eq(index.get("2").unwrap(), &child));
        assert_eq!(index.get("1").unwrap().name(), "kept");
    }

    #[test]
    fn clear_empties_the_index() {
        let mut index = RenderedIndex::new();
        index.register(&link("1", "a"));
        index.clear();
        assert!(index.get("1").is_none());
    }
}
