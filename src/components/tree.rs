use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Widget},
};

use crate::app::{FlatLine, LineKind};
use crate::bookmarks::sort::SortCriterion;
use crate::theme::ThemeColors;

/// Bookmark tree widget: box-drawing guides, folder sort controls, dates.
pub struct TreeWidget<'a> {
    lines: &'a [FlatLine],
    selected: usize,
    scroll: usize,
    theme: &'a ThemeColors,
    use_icons: bool,
    show_dates: bool,
    block: Option<Block<'a>>,
}

impl<'a> TreeWidget<'a> {
    pub fn new(lines: &'a [FlatLine], selected: usize, scroll: usize, theme: &'a ThemeColors) -> Self {
        Self {
            lines,
            selected,
            scroll,
            theme,
            use_icons: false,
            show_dates: true,
            block: None,
        }
    }

    pub fn use_icons(mut self, use_icons: bool) -> Self {
        self.use_icons = use_icons;
        self
    }

    pub fn show_dates(mut self, show_dates: bool) -> Self {
        self.show_dates = show_dates;
        self
    }

    pub fn block(mut self, block: Block<'a>) -> Self {
        self.block = block.into();
        self
    }

    /// Build the indentation prefix for a line.
    ///
    /// Each ancestor level gets a continuation bar unless that ancestor was
    /// the last of its siblings.
    fn build_prefix(line: &FlatLine, lines: &[FlatLine], index: usize) -> String {
        if line.depth == 0 {
            return String::new();
        }

        let mut prefix = String::new();
        for d in 1..line.depth {
            let ancestor_is_last = lines[..index]
                .iter()
                .rev()
                .take_while(|l| l.depth >= d)
                .find(|l| l.depth == d)
                .map(|l| l.is_last_sibling)
                .unwrap_or(false);
            prefix.push_str(if ancestor_is_last { "   " } else { "│  " });
        }
        prefix.push_str(if line.is_last_sibling { "└──" } else { "├──" });
        prefix
    }

    fn indicator(&self, kind: &LineKind) -> &'static str {
        match (kind, self.use_icons) {
            (LineKind::Folder { collapsed: true, .. }, true) => "\u{f07b} ",
            (LineKind::Folder { .. }, true) => "\u{f07c} ",
            (LineKind::Link { .. }, true) => "\u{f0c1} ",
            (LineKind::Folder { collapsed: true, .. }, false) => "[+] ",
            (LineKind::Folder { .. }, false) => "[-] ",
            (LineKind::Link { .. }, false) => " ",
        }
    }

    /// `T D U O` controls, the active one emphasized.
    fn sort_controls(&self, active: SortCriterion, base: Style) -> Vec<Span<'static>> {
        let mut spans = vec![Span::styled(" ", base)];
        for criterion in SortCriterion::ALL {
            let style = if criterion == active {
                base.fg(self.theme.sort_active_fg).add_modifier(Modifier::BOLD)
            } else {
                base.fg(self.theme.sort_inactive_fg)
            };
            spans.push(Span::styled(format!("[{}]", criterion.short_label()), style));
        }
        spans
    }
}

impl<'a> Widget for TreeWidget<'a> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let inner_area = if let Some(block) = &self.block {
            let inner = block.inner(area);
            block.clone().render(area, buf);
            inner
        } else {
            area
        };

        let visible_height = inner_area.height as usize;
        if self.lines.is_empty() || visible_height == 0 {
            return;
        }

        let visible = self
            .lines
            .iter()
            .enumerate()
            .skip(self.scroll)
            .take(visible_height);

        for (row, (idx, line)) in visible.enumerate() {
            let y = inner_area.y + row as u16;

            let mut base = Style::default();
            if line.highlighted {
                base = base.bg(self.theme.highlight_bg);
            }
            if idx == self.selected {
                base = base
                    .bg(self.theme.tree_selected_bg)
                    .fg(self.theme.tree_selected_fg);
            }

            let name_style = match line.kind {
                LineKind::Folder { .. } => base
                    .fg(self.theme.tree_folder_fg)
                    .add_modifier(Modifier::BOLD),
                LineKind::Link { .. } => base.fg(self.theme.tree_link_fg),
            };
            let dim = base.fg(self.theme.date_fg);

            let mut spans = vec![
                Span::styled(Self::build_prefix(line, self.lines, idx), base.fg(self.theme.tree_fg)),
                Span::styled(self.indicator(&line.kind), name_style),
                Span::styled(line.label.clone(), name_style),
            ];

            match &line.kind {
                LineKind::Folder { active, child_count, .. } => {
                    spans.push(Span::styled(format!(" ({})", child_count), dim));
                    spans.extend(self.sort_controls(*active, base));
                }
                LineKind::Link { url } => {
                    spans.push(Span::styled(format!("  {}", url), dim));
                }
            }

            if self.show_dates {
                if let Some(date) = &line.date {
                    spans.push(Span::styled(format!("  {}", date), dim));
                }
            }

            buf.set_line(inner_area.x, y, &Line::from(spans), inner_area.width);
        }
    }
}
