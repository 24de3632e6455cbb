use std::cmp::Ordering;
use std::rc::Rc;

use crate::bookmarks::model::BookmarkNode;

/// Ordering applied to a folder's children for one render pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum SortCriterion {
    /// Order as found in the file.
    #[default]
    Original,
    ByText,
    ByDate,
    ByUrl,
}

impl SortCriterion {
    /// Controls in the order they are shown on a folder.
    pub const ALL: [SortCriterion; 4] = [
        SortCriterion::ByText,
        SortCriterion::ByDate,
        SortCriterion::ByUrl,
        SortCriterion::Original,
    ];

    /// Parse the markup attribute value (`text`, `date`, `url`, `org`).
    pub fn from_attr(s: &str) -> Option<Self> {
        match s {
            "text" => Some(SortCriterion::ByText),
            "date" => Some(SortCriterion::ByDate),
            "url" => Some(SortCriterion::ByUrl),
            "org" | "original" => Some(SortCriterion::Original),
            _ => None,
        }
    }

    /// Markup attribute value identifying this control.
    pub fn attr(self) -> &'static str {
        match self {
            SortCriterion::ByText => "text",
            SortCriterion::ByDate => "date",
            SortCriterion::ByUrl => "url",
            SortCriterion::Original => "org",
        }
    }

    /// One-letter control label.
    pub fn short_label(self) -> &'static str {
        match self {
            SortCriterion::ByText => "T",
            SortCriterion::ByDate => "D",
            SortCriterion::ByUrl => "U",
            SortCriterion::Original => "O",
        }
    }

    /// Tooltip / status text for the control.
    pub fn title(self) -> &'static str {
        match self {
            SortCriterion::ByText => "Sort by text",
            SortCriterion::ByDate => "Sort by date",
            SortCriterion::ByUrl => "Sort by url",
            SortCriterion::Original => "Original sorting",
        }
    }

    /// Lowercased sort key of `node`, `""` when the field is absent.
    ///
    /// Dates compare as raw strings, not as decoded values.
    fn key(self, node: &BookmarkNode) -> String {
        let field = match self {
            SortCriterion::Original => return String::new(),
            SortCriterion::ByText => Some(node.name()),
            SortCriterion::ByDate => node.date_added(),
            SortCriterion::ByUrl => node.url(),
        };
        field.unwrap_or("").to_lowercase()
    }
}

/// Null-safe string comparison: `None` sorts before everything, two `None`s
/// are equal, otherwise lexicographic order by code point.
pub fn compare_strings(a: Option<&str>, b: Option<&str>) -> Ordering {
    match (a, b) {
        (None, None) => Ordering::Equal,
        (None, Some(_)) => Ordering::Less,
        (Some(_), None) => Ordering::Greater,
        (Some(a), Some(b)) => a.cmp(b),
    }
}

/// A copy of `nodes` stable-sorted by `criterion`. The input is untouched;
/// `Original` returns the nodes in input order.
pub fn sorted(nodes: &[Rc<BookmarkNode>], criterion: SortCriterion) -> Vec<Rc<BookmarkNode>> {
    if criterion == SortCriterion::Original {
        return nodes.to_vec();
    }

    let mut keyed: Vec<(String, Rc<BookmarkNode>)> = nodes
        .iter()
        .map(|node| (criterion.key(node), Rc::clone(node)))
        .collect();
    keyed.sort_by(|(a, _), (b, _)| compare_strings(Some(a), Some(b)));
    keyed.into_iter().map(|(_, node)| node).collect()
}
