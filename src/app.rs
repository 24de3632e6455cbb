use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use crate::bookmarks::sort::SortCriterion;
use crate::error::Result;
use crate::render::html;
use crate::render::markup::Markup;
use crate::viewer::{ResortOutcome, Viewer};

/// What a visible line shows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LineKind {
    Folder {
        active: SortCriterion,
        collapsed: bool,
        child_count: usize,
    },
    Link {
        url: String,
    },
}

/// A flattened representation of one rendered element for the tree view.
#[derive(Debug, Clone)]
pub struct FlatLine {
    pub id: String,
    /// Id of the enclosing folder; `None` for top-level containers.
    pub parent_id: Option<String>,
    pub kind: LineKind,
    pub label: String,
    pub date: Option<String>,
    pub depth: usize,
    pub is_last_sibling: bool,
    /// Part of the container replaced by the latest resort.
    pub highlighted: bool,
}

/// Main application state.
pub struct App {
    pub viewer: Viewer,
    /// Bookmarks file being shown.
    pub source: PathBuf,
    pub lines: Vec<FlatLine>,
    pub selected_index: usize,
    pub scroll_offset: usize,
    /// Folder ids collapsed in the view.
    pub collapsed: HashSet<String>,
    pub should_quit: bool,
    /// Whether a file read is in flight.
    pub loading: bool,
    pub status_message: Option<(String, Instant, bool)>,
    pub export_path: PathBuf,
    highlight_duration: Duration,
    highlight_until: Option<Instant>,
}

impl App {
    pub fn new(viewer: Viewer, source: &Path, export_path: PathBuf, highlight_ms: u64) -> Self {
        let mut app = Self {
            viewer,
            source: source.to_path_buf(),
            lines: Vec::new(),
            selected_index: 0,
            scroll_offset: 0,
            collapsed: HashSet::new(),
            should_quit: false,
            loading: false,
            status_message: None,
            export_path,
            highlight_duration: Duration::from_millis(highlight_ms),
            highlight_until: None,
        };
        app.flatten();
        app
    }

    /// Rebuild the visible lines from the live output, respecting collapsed
    /// folders and keeping the selection on the same id when possible.
    pub fn flatten(&mut self) {
        let selected_id = self.selected_line().map(|l| l.id.clone());

        let mut lines = Vec::new();
        Self::flatten_items(
            self.viewer.output(),
            None,
            0,
            self.viewer.highlighted(),
            false,
            &self.collapsed,
            &mut lines,
        );
        self.lines = lines;

        if let Some(id) = selected_id {
            if let Some(idx) = self.lines.iter().position(|l| l.id == id) {
                self.selected_index = idx;
            }
        }
        if self.lines.is_empty() {
            self.selected_index = 0;
        } else if self.selected_index >= self.lines.len() {
            self.selected_index = self.lines.len() - 1;
        }
    }

    fn flatten_items(
        items: &[Markup],
        parent_id: Option<&str>,
        depth: usize,
        highlight_id: Option<&str>,
        in_highlight: bool,
        collapsed: &HashSet<String>,
        lines: &mut Vec<FlatLine>,
    ) {
        for (i, item) in items.iter().enumerate() {
            let is_last_sibling = i + 1 == items.len();
            let parent_id = parent_id.map(str::to_string);
            match item {
                Markup::Container(c) => {
                    let highlighted = in_highlight || highlight_id == Some(c.id.as_str());
                    let is_collapsed = collapsed.contains(&c.id);
                    lines.push(FlatLine {
                        id: c.id.clone(),
                        parent_id,
                        kind: LineKind::Folder {
                            active: c.active,
                            collapsed: is_collapsed,
                            child_count: c.children.len(),
                        },
                        label: c.title.clone(),
                        date: c.date.clone(),
                        depth,
                        is_last_sibling,
                        highlighted,
                    });
                    if !is_collapsed {
                        Self::flatten_items(
                            &c.children,
                            Some(&c.id),
                            depth + 1,
                            highlight_id,
                            highlighted,
                            collapsed,
                            lines,
                        );
                    }
                }
                Markup::Entry(e) => lines.push(FlatLine {
                    id: e.id.clone(),
                    parent_id,
                    kind: LineKind::Link {
                        url: e.href.clone(),
                    },
                    label: e.label.clone(),
                    date: e.date.clone(),
                    depth,
                    is_last_sibling,
                    highlighted: in_highlight,
                }),
            }
        }
    }

    pub fn selected_line(&self) -> Option<&FlatLine> {
        self.lines.get(self.selected_index)
    }

    /// Folder a sort key applies to: the selected folder, or the folder
    /// enclosing the selected link.
    pub fn target_folder(&self) -> Option<String> {
        let line = self.selected_line()?;
        match line.kind {
            LineKind::Folder { .. } => Some(line.id.clone()),
            LineKind::Link { .. } => line.parent_id.clone(),
        }
    }

    /// Resort the target folder and highlight it.
    pub fn resort_selected(&mut self, criterion: SortCriterion) {
        let Some(folder_id) = self.target_folder() else {
            return;
        };
        match self.viewer.resort(&folder_id, criterion) {
            ResortOutcome::Replaced => {
                self.highlight_until = Some(Instant::now() + self.highlight_duration);
                self.flatten();
                self.set_status_message(criterion.title().to_string());
            }
            ResortOutcome::NotFound => {
                self.set_error_message(format!("Folder '{}' is not rendered", folder_id));
            }
            ResortOutcome::Busy => {}
        }
    }

    /// Apply the result of an asynchronous file read.
    ///
    /// On failure the current tree stays on screen and the error is shown.
    pub fn handle_file_loaded(&mut self, result: std::io::Result<Vec<u8>>) {
        self.loading = false;
        let outcome = result
            .map_err(Into::into)
            .and_then(|bytes| self.viewer.load_and_render(&bytes));
        match outcome {
            Ok(()) => {
                self.collapsed.clear();
                self.highlight_until = None;
                self.selected_index = 0;
                self.scroll_offset = 0;
                self.flatten();
                let stats = self.viewer.stats();
                self.set_status_message(format!(
                    "Loaded {} folders, {} links",
                    stats.folders, stats.links
                ));
            }
            Err(e) => {
                tracing::warn!(path = %self.source.display(), error = %e, "load failed");
                self.set_error_message(e.to_string());
            }
        }
    }

    /// Write the live output as a standalone HTML page.
    pub fn export(&mut self) {
        match self.write_export() {
            Ok(()) => {
                tracing::info!(path = %self.export_path.display(), "exported");
                self.set_status_message(format!("Exported to {}", self.export_path.display()));
            }
            Err(e) => self.set_error_message(format!("Export failed: {}", e)),
        }
    }

    fn write_export(&self) -> Result<()> {
        let title = self
            .source
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| "Bookmarks".to_string());
        let page = html::write_page(&title, self.viewer.output(), self.viewer.highlighted());
        std::fs::write(&self.export_path, page)?;
        Ok(())
    }

    /// Periodic housekeeping: fade the resort highlight, expire status text.
    pub fn tick(&mut self) {
        if let Some(until) = self.highlight_until {
            if Instant::now() >= until {
                self.highlight_until = None;
                self.viewer.clear_highlight();
                self.flatten();
            }
        }
        self.clear_expired_status();
    }

    /// Set a status message with current timestamp.
    pub fn set_status_message(&mut self, msg: String) {
        self.status_message = Some((msg, Instant::now(), false));
    }

    pub fn set_error_message(&mut self, msg: String) {
        self.status_message = Some((msg, Instant::now(), true));
    }

    /// Clear the status message if it has been displayed for more than 3 seconds.
    pub fn clear_expired_status(&mut self) {
        if let Some((_, ref created, _)) = self.status_message {
            if created.elapsed().as_secs() > 3 {
                self.status_message = None;
            }
        }
    }

    /// Collapse or expand the selected folder.
    pub fn toggle_selected(&mut self) {
        if let Some(line) = self.selected_line() {
            if matches!(line.kind, LineKind::Folder { .. }) {
                let id = line.id.clone();
                if !self.collapsed.remove(&id) {
                    self.collapsed.insert(id);
                }
                self.flatten();
            }
        }
    }

    /// Expand the selected folder.
    pub fn expand_selected(&mut self) {
        if let Some(line) = self.selected_line() {
            if matches!(line.kind, LineKind::Folder { collapsed: true, .. }) {
                let id = line.id.clone();
                self.collapsed.remove(&id);
                self.flatten();
            }
        }
    }

    /// Collapse the selected folder, or jump to the enclosing folder.
    pub fn collapse_selected(&mut self) {
        let Some(line) = self.selected_line() else {
            return;
        };
        if matches!(line.kind, LineKind::Folder { collapsed: false, .. }) {
            let id = line.id.clone();
            self.collapsed.insert(id);
            self.flatten();
            return;
        }
        if let Some(parent) = line.parent_id.clone() {
            if let Some(idx) = self.lines.iter().position(|l| l.id == parent) {
                self.selected_index = idx;
            }
        }
    }

    /// Update the scroll offset to ensure the selected item is visible.
    pub fn update_scroll(&mut self, visible_height: usize) {
        if visible_height == 0 {
            return;
        }
        if self.selected_index < self.scroll_offset {
            self.scroll_offset = self.selected_index;
        } else if self.selected_index >= self.scroll_offset + visible_height {
            self.scroll_offset = self.selected_index - visible_height + 1;
        }
    }

    /// Quit the application.
    pub fn quit(&mut self) {
        self.should_quit = true;
    }

    /// Move selection down by one item.
    pub fn select_next(&mut self) {
        let len = self.lines.len();
        if len > 0 && self.selected_index < len - 1 {
            self.selected_index += 1;
        }
    }

    /// Move selection up by one item.
    pub fn select_previous(&mut self) {
        if self.selected_index > 0 {
            self.selected_index -= 1;
        }
    }

    /// Jump to the first item.
    pub fn select_first(&mut self) {
        self.selected_index = 0;
    }

    /// Jump to the last item.
    pub fn select_last(&mut self) {
        if !self.lines.is_empty() {
            self.selected_index = self.lines.len() - 1;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bookmarks::timestamp::{DateStyle, DEFAULT_DATE_FORMAT};

    const DOC: &str = r#"{"roots":{
        "bookmark_bar":{"id":"1","name":"Bar","children":[
            {"id":"10","name":"Sub","children":[
                {"id":"11","name":"B","url":"b.com"},
                {"id":"12","name":"A","url":"a.com"}
            ]},
            {"id":"20","name":"Site","url":"z.com"}
        ]},
        "other":{"id":"3","name":"Other","children":[]}
    }}"#;

    fn app() -> App {
        let mut app = App::new(
            Viewer::new(DateStyle::utc(DEFAULT_DATE_FORMAT)),
            Path::new("/tmp/Bookmarks"),
            PathBuf::from("/tmp/out.html"),
            1000,
        );
        app.handle_file_loaded(Ok(DOC.as_bytes().to_vec()));
        app
    }

    fn labels(app: &App) -> Vec<&str> {
        app.lines.iter().map(|l| l.label.as_str()).collect()
    }

    #[test]
    fn load_flattens_all_lines() {
        let app = app();
        assert_eq!(labels(&app), vec!["Bar", "Sub", "B", "A", "Site", "Other"]);
        assert_eq!(app.lines[2].depth, 2);
        assert_eq!(app.lines[2].parent_id.as_deref(), Some("10"));
        assert!(app.lines[3].is_last_sibling);
        assert!(app.status_message.as_ref().unwrap().0.contains("3 folders, 3 links"));
    }

    #[test]
    fn target_folder_of_link_is_its_parent() {
        let mut app = app();
        app.selected_index = 2; // "B"
        assert_eq!(app.target_folder().as_deref(), Some("10"));
        app.selected_index = 1; // "Sub"
        assert_eq!(app.target_folder().as_deref(), Some("10"));
    }

    #[test]
    fn resort_from_link_reorders_and_keeps_selection() {
        let mut app = app();
        app.selected_index = 2; // "B"
        app.resort_selected(SortCriterion::ByUrl);
        assert_eq!(labels(&app), vec!["Bar", "Sub", "A", "B", "Site", "Other"]);
        assert_eq!(app.selected_line().unwrap().label, "B");
        assert!(app.lines[1].highlighted);
        assert!(app.lines[2].highlighted);
        assert!(!app.lines[4].highlighted);
        assert!(matches!(
            app.lines[1].kind,
            LineKind::Folder { active: SortCriterion::ByUrl, .. }
        ));
    }

    #[test]
    fn failed_reload_keeps_tree() {
        let mut app = app();
        app.handle_file_loaded(Ok(b"garbage".to_vec()));
        assert_eq!(app.lines.len(), 6);
        assert!(app.status_message.as_ref().unwrap().2);

        app.handle_file_loaded(Err(std::io::Error::new(std::io::ErrorKind::NotFound, "gone")));
        assert_eq!(app.lines.len(), 6);
        assert!(app.status_message.as_ref().unwrap().0.contains("gone"));
    }

    #[test]
    fn collapse_hides_children() {
        let mut app = app();
        app.selected_index = 1; // "Sub"
        app.toggle_selected();
        assert_eq!(labels(&app), vec!["Bar", "Sub", "Site", "Other"]);
        app.expand_selected();
        assert_eq!(app.lines.len(), 6);
    }

    #[test]
    fn collapse_on_link_jumps_to_parent() {
        let mut app = app();
        app.selected_index = 4; // "Site"
        app.collapse_selected();
        assert_eq!(app.selected_line().unwrap().label, "Bar");
    }

    #[test]
    fn tick_clears_expired_highlight() {
        let mut app = App::new(
            Viewer::new(DateStyle::utc(DEFAULT_DATE_FORMAT)),
            Path::new("/tmp/Bookmarks"),
            PathBuf::from("/tmp/out.html"),
            0,
        );
        app.handle_file_loaded(Ok(DOC.as_bytes().to_vec()));
        app.selected_index = 0;
        app.resort_selected(SortCriterion::ByText);
        app.tick();
        assert!(app.viewer.highlighted().is_none());
        assert!(app.lines.iter().all(|l| !l.highlighted));
    }

    #[test]
    fn export_writes_page() {
        let dir = tempfile::tempdir().expect("tempdir");
        let mut app = app();
        app.export_path = dir.path().join("out.html");
        app.export();
        let page = std::fs::read_to_string(&app.export_path).expect("read export");
        assert!(page.contains("<title>Bookmarks</title>"));
        assert!(page.contains(r#"<a href="z.com">Site</a>"#));
        assert!(!app.status_message.as_ref().unwrap().2);
    }

    #[test]
    fn navigation_bounds() {
        let mut app = app();
        app.select_previous();
        assert_eq!(app.selected_index, 0);
        app.select_last();
        assert_eq!(app.selected_index, 5);
        app.select_next();
        assert_eq!(app.selected_index, 5);
        app.select_first();
        assert_eq!(app.selected_index, 0);
    }
}
