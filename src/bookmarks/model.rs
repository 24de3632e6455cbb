use std::rc::Rc;

use serde::Deserialize;
use serde_json::{Map, Value};

use crate::error::Result;

/// A bookmark folder: a named container with ordered children.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Folder {
    pub id: String,
    pub name: String,
    /// Raw offset-epoch microseconds, as found in the file.
    pub date_added: Option<String>,
    /// Accepted but never rendered.
    #[allow(dead_code)]
    pub date_modified: Option<String>,
    pub children: Vec<Rc<BookmarkNode>>,
}

/// A bookmark pointing to a URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Link {
    pub id: String,
    pub name: String,
    pub date_added: Option<String>,
    #[allow(dead_code)]
    pub date_modified: Option<String>,
    pub url: String,
}

/// A node of the bookmark tree, discriminated once at parse time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BookmarkNode {
    Folder(Folder),
    Link(Link),
}

impl BookmarkNode {
    pub fn id(&self) -> &str {
        match self {
            BookmarkNode::Folder(f) => &f.id,
            BookmarkNode::Link(l) => &l.id,
        }
    }

    pub fn name(&self) -> &str {
        match self {
            BookmarkNode::Folder(f) => &f.name,
            BookmarkNode::Link(l) => &l.name,
        }
    }

    pub fn date_added(&self) -> Option<&str> {
        match self {
            BookmarkNode::Folder(f) => f.date_added.as_deref(),
            BookmarkNode::Link(l) => l.date_added.as_deref(),
        }
    }

    /// Folders have no URL.
    pub fn url(&self) -> Option<&str> {
        match self {
            BookmarkNode::Folder(_) => None,
            BookmarkNode::Link(l) => Some(&l.url),
        }
    }

    pub fn as_folder(&self) -> Option<&Folder> {
        match self {
            BookmarkNode::Folder(f) => Some(f),
            BookmarkNode::Link(_) => None,
        }
    }

    /// Classify a JSON value as a folder, a link, or nothing.
    ///
    /// Presence of a `children` array makes a folder (even when empty);
    /// otherwise a non-empty `url` string makes a link. Anything else yields
    /// `None`. Other fields are read leniently: a numeric `id` or date keeps
    /// its decimal form and a missing or null `name` is empty.
    pub fn from_value(value: Value) -> Option<Self> {
        let Value::Object(mut fields) = value else {
            return None;
        };
        let id = text_field(&fields, "id");
        let name = text_field(&fields, "name");
        let date_added = date_field(&fields, "date_added");
        let date_modified = date_field(&fields, "date_modified");

        if let Some(Value::Array(children)) = fields.remove("children") {
            let children = children
                .into_iter()
                .filter_map(BookmarkNode::from_value)
                .map(Rc::new)
                .collect();
            return Some(BookmarkNode::Folder(Folder {
                id,
                name,
                date_added,
                date_modified,
                children,
            }));
        }

        match fields.remove("url") {
            Some(Value::String(url)) if !url.is_empty() => Some(BookmarkNode::Link(Link {
                id,
                name,
                date_added,
                date_modified,
                url,
            })),
            _ => None,
        }
    }
}

/// String form of a scalar field; empty when missing, null or structured.
fn text_field(fields: &Map<String, Value>, key: &str) -> String {
    match fields.get(key) {
        Some(Value::String(s)) => s.clone(),
        Some(Value::Number(n)) => n.to_string(),
        Some(Value::Bool(b)) => b.to_string(),
        _ => String::new(),
    }
}

/// Raw timestamp digits, from either a string or a number.
fn date_field(fields: &Map<String, Value>, key: &str) -> Option<String> {
    match fields.get(key) {
        Some(Value::String(s)) => Some(s.clone()),
        Some(Value::Number(n)) => Some(n.to_string()),
        _ => None,
    }
}

#[derive(Debug, Deserialize)]
struct RawDocument {
    roots: RawRoots,
}

#[derive(Debug, Deserialize)]
struct RawRoots {
    #[serde(default)]
    bookmark_bar: Option<Value>,
    #[serde(default)]
    other: Option<Value>,
}

/// A parsed bookmarks file: the two roots the viewer renders.
#[derive(Debug, Clone, Default)]
pub struct BookmarkDocument {
    pub bookmark_bar: Option<Rc<BookmarkNode>>,
    pub other: Option<Rc<BookmarkNode>>,
}

impl BookmarkDocument {
    /// Parse a bookmarks JSON document.
    ///
    /// A missing `roots` object is a parse error; a missing or non-folder
    /// root is simply absent.
    pub fn parse(text: &str) -> Result<Self> {
        let raw: RawDocument = serde_json::from_str(text)?;
        Ok(Self {
            bookmark_bar: Self::root(raw.roots.bookmark_bar),
            other: Self::root(raw.roots.other),
        })
    }

    fn root(value: Option<Value>) -> Option<Rc<BookmarkNode>> {
        match BookmarkNode::from_value(value?)? {
            node @ BookmarkNode::Folder(_) => Some(Rc::new(node)),
            BookmarkNode::Link(_) => None,
        }
    }

    /// Present roots in render order: bookmark bar, then other.
    pub fn roots(&self) -> impl Iterator<Item = &Rc<BookmarkNode>> {
        self.bookmark_bar.iter().chain(self.other.iter())
    }
}
