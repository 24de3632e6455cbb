use std::rc::Rc;

use crate::bookmarks::model::BookmarkNode;
use crate::bookmarks::sort::{sorted, SortCriterion};
use crate::bookmarks::timestamp::{display_date, DateStyle};
use crate::render::index::RenderedIndex;
use crate::render::markup::{Container, Entry, Markup};

/// Turns bookmark nodes into markup.
///
/// Rendering is pure apart from the optional index: when one is passed,
/// every visited node is registered into it after its own markup is complete
/// (folders after all of their children).
pub struct Renderer<'a> {
    dates: &'a DateStyle,
}

impl<'a> Renderer<'a> {
    pub fn new(dates: &'a DateStyle) -> Self {
        Self { dates }
    }

    /// Render a sequence of sibling nodes, sorted by `sort_by`.
    ///
    /// Sorting works on a copy; `nodes` keeps its order.
    pub fn render(
        &self,
        nodes: &[Rc<BookmarkNode>],
        sort_by: SortCriterion,
        mut index: Option<&mut RenderedIndex>,
    ) -> Vec<Markup> {
        sorted(nodes, sort_by)
            .iter()
            .map(|node| self.render_node(node, sort_by, index.as_deref_mut()))
            .collect()
    }

    /// Render one node; folders recurse with the same criterion and index.
    pub fn render_node(
        &self,
        node: &Rc<BookmarkNode>,
        sort_by: SortCriterion,
        mut index: Option<&mut RenderedIndex>,
    ) -> Markup {
        let markup = match node.as_ref() {
            BookmarkNode::Folder(folder) => Markup::Container(Container {
                id: folder.id.clone(),
                title: folder.name.clone(),
                date: display_date(folder.date_added.as_deref(), self.dates),
                active: sort_by,
                children: self.render(&folder.children, sort_by, index.as_deref_mut()),
            }),
            BookmarkNode::Link(link) => Markup::Entry(Entry {
                id: link.id.clone(),
                label: link.name.clone(),
                href: link.url.clone(),
                date: display_date(link.date_added.as_deref(), self.dates),
            }),
        };

        if let Some(index) = index {
            index.register(node);
        }
        markup
    }
}
