//! Load/render orchestration and in-place folder resorting.
//!
//! The `Viewer` owns the live output (top-level rendered containers) and the
//! index of rendered nodes. A full load clears and refills both; a resort
//! re-renders one folder and splices it back where the old one was.

use std::rc::Rc;

use crate::bookmarks::model::{BookmarkDocument, BookmarkNode};
use crate::bookmarks::sort::SortCriterion;
use crate::bookmarks::timestamp::DateStyle;
use crate::error::Result;
use crate::render::index::RenderedIndex;
use crate::render::markup::{self, Markup};
use crate::render::renderer::Renderer;

/// Resort controller state.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum ControllerState {
    #[default]
    Idle,
    Resorting { folder_id: String },
}

/// Result of a resort request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResortOutcome {
    /// The folder was re-rendered and replaced in place.
    Replaced,
    /// No folder with that id is currently rendered.
    NotFound,
    /// Another resort is in flight.
    Busy,
}

/// Folder and link counts of the live output.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct OutputStats {
    pub folders: usize,
    pub links: usize,
}

pub struct Viewer {
    output: Vec<Markup>,
    index: RenderedIndex,
    dates: DateStyle,
    state: ControllerState,
    highlighted: Option<String>,
}

impl Viewer {
    pub fn new(dates: DateStyle) -> Self {
        Self {
            output: Vec::new(),
            index: RenderedIndex::new(),
            dates,
            state: ControllerState::Idle,
            highlighted: None,
        }
    }

    /// Decode, parse and fully render a bookmarks file.
    ///
    /// Decoding and parsing happen before anything is cleared, so a failure
    /// leaves the previous output and index in place.
    pub fn load_and_render(&mut self, bytes: &[u8]) -> Result<()> {
        let bytes = bytes.strip_prefix(b"\xEF\xBB\xBF").unwrap_or(bytes);
        let text = std::str::from_utf8(bytes)?;
        let document = BookmarkDocument::parse(text)?;
        self.render_document(&document);
        tracing::debug!(
            containers = self.output.len(),
            indexed = self.index.len(),
            "bookmarks rendered"
        );
        Ok(())
    }

    /// Replace the live output with `document`'s roots, indexing as it goes.
    pub fn render_document(&mut self, document: &BookmarkDocument) {
        self.output.clear();
        self.index.clear();
        self.highlighted = None;

        let renderer = Renderer::new(&self.dates);
        for root in document.roots() {
            let markup = renderer.render_node(root, SortCriterion::Original, Some(&mut self.index));
            self.output.push(markup);
        }
    }

    /// Re-render the folder `folder_id` sorted by `criterion` and swap it into
    /// the live output in place of its current markup.
    ///
    /// Unknown ids (and ids naming a link) are logged and ignored.
    pub fn resort(&mut self, folder_id: &str, criterion: SortCriterion) -> ResortOutcome {
        if let ControllerState::Resorting { folder_id: busy } = &self.state {
            tracing::warn!(requested = folder_id, busy = %busy, "resort already in progress");
            return ResortOutcome::Busy;
        }

        self.state = ControllerState::Resorting {
            folder_id: folder_id.to_string(),
        };
        let outcome = self.resort_folder(folder_id, criterion);
        self.state = ControllerState::Idle;
        outcome
    }

    fn resort_folder(&mut self, folder_id: &str, criterion: SortCriterion) -> ResortOutcome {
        let node = match self.index.get(folder_id) {
            Some(node) if matches!(node.as_ref(), BookmarkNode::Folder(_)) => Rc::clone(node),
            _ => {
                tracing::warn!(id = folder_id, "could not find folder with this id");
                return ResortOutcome::NotFound;
            }
        };

        let mut fresh = RenderedIndex::new();
        let markup = Renderer::new(&self.dates).render_node(&node, criterion, Some(&mut fresh));
        if !markup::replace_container(&mut self.output, folder_id, markup) {
            tracing::warn!(id = folder_id, "indexed folder is not in the live output");
            return ResortOutcome::NotFound;
        }
        self.index.absorb(fresh);
        self.highlighted = Some(folder_id.to_string());

        tracing::debug!(id = folder_id, sort = criterion.attr(), "folder resorted");
        ResortOutcome::Replaced
    }

    pub fn output(&self) -> &[Markup] {
        &self.output
    }

    pub fn index(&self) -> &RenderedIndex {
        &self.index
    }

    #[cfg(test)]
    pub fn state(&self) -> &ControllerState {
        &self.state
    }

    /// Id of the container replaced by the last resort, if any.
    pub fn highlighted(&self) -> Option<&str> {
        self.highlighted.as_deref()
    }

    pub fn clear_highlight(&mut self) {
        self.highlighted = None;
    }

    pub fn stats(&self) -> OutputStats {
        fn count(items: &[Markup], stats: &mut OutputStats) {
            for item in items {
                match item {
                    Markup::Container(c) => {
                        stats.folders += 1;
                        count(&c.children, stats);
                    }
                    Markup::Entry(_) => stats.links += 1,
                }
            }
        }

        let mut stats = OutputStats::default();
        count(&self.output, &mut stats);
        stats
    }
}
