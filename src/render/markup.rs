use crate::bookmarks::sort::SortCriterion;

/// A rendered folder: title, sort controls, date and nested children.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Container {
    pub id: String,
    /// Unescaped folder name; writers escape it for their medium.
    pub title: String,
    pub date: Option<String>,
    /// Criterion this container's children were rendered with.
    pub active: SortCriterion,
    pub children: Vec<Markup>,
}

impl Container {
    /// The four sort controls with their active flag.
    pub fn controls(&self) -> impl Iterator<Item = (SortCriterion, bool)> + '_ {
        SortCriterion::ALL
            .into_iter()
            .map(move |criterion| (criterion, criterion == self.active))
    }
}

/// A rendered link: label, target and date.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry {
    pub id: String,
    pub label: String,
    /// Emitted as-is into the link target.
    pub href: String,
    pub date: Option<String>,
}

/// One id-addressable element of rendered output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Markup {
    Container(Container),
    Entry(Entry),
}

impl Markup {
    pub fn id(&self) -> &str {
        match self {
            Markup::Container(c) => &c.id,
            Markup::Entry(e) => &e.id,
        }
    }

    pub fn as_container(&self) -> Option<&Container> {
        match self {
            Markup::Container(c) => Some(c),
            Markup::Entry(_) => None,
        }
    }
}

/// Depth-first search for the first element carrying `id`.
pub fn find<'a>(items: &'a [Markup], id: &str) -> Option<&'a Markup> {
    for item in items {
        if item.id() == id {
            return Some(item);
        }
        if let Markup::Container(c) = item {
            if let Some(found) = find(&c.children, id) {
                return Some(found);
            }
        }
    }
    None
}

/// Replace the first container carrying `id` with `replacement`, keeping its
/// position among its siblings. The new element is inserted right after the
/// old one before the old one is removed. Returns `false` if no container
/// with that id exists.
pub fn replace_container(items: &mut Vec<Markup>, id: &str, replacement: Markup) -> bool {
    let mut replacement = Some(replacement);
    replace_in(items, id, &mut replacement)
}

fn replace_in(items: &mut Vec<Markup>, id: &str, replacement: &mut Option<Markup>) -> bool {
    if let Some(pos) = items
        .iter()
        .position(|item| matches!(item, Markup::Container(c) if c.id == id))
    {
        if let Some(new) = replacement.take() {
            items.insert(pos + 1, new);
            items.remove(pos);
            return true;
        }
        return false;
    }

    for item in items.iter_mut() {
        if let Markup::Container(c) = item {
            if replace_in(&mut c.children, id, replacement) {
                return true;
            }
        }
    }
    false
}
