use ratatui::{
    layout::{Constraint, Direction, Layout},
    style::Style,
    widgets::{Block, Borders},
    Frame,
};

use crate::app::App;
use crate::components::status_bar::StatusBarWidget;
use crate::components::tree::TreeWidget;
use crate::theme::ThemeColors;

/// Display settings resolved from config.
#[derive(Debug, Clone)]
pub struct ViewOptions {
    pub theme: ThemeColors,
    pub use_icons: bool,
    pub show_dates: bool,
}

/// Render the application UI.
pub fn render(app: &mut App, frame: &mut Frame, options: &ViewOptions) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(1), Constraint::Length(1)])
        .split(frame.area());

    // Keep the selected line visible (borders take two rows)
    let visible_height = chunks[0].height.saturating_sub(2) as usize;
    app.update_scroll(visible_height);

    let title = match app.source.file_name() {
        Some(name) => format!(" {} ", name.to_string_lossy()),
        None => " Bookmarks ".to_string(),
    };
    let block = Block::default()
        .title(title)
        .borders(Borders::ALL)
        .border_style(Style::default().fg(options.theme.border_fg));

    let tree = TreeWidget::new(&app.lines, app.selected_index, app.scroll_offset, &options.theme)
        .use_icons(options.use_icons)
        .show_dates(options.show_dates)
        .block(block);
    frame.render_widget(tree, chunks[0]);

    let path = app.source.display().to_string();
    let stats = app.viewer.stats();
    let info = if app.loading {
        "loading…".to_string()
    } else {
        format!("{} folders, {} links", stats.folders, stats.links)
    };
    let mut status = StatusBarWidget::new(&path, &info, &options.theme);
    if let Some((msg, _, is_error)) = &app.status_message {
        status = status.status_message(msg, *is_error);
    }
    frame.render_widget(status, chunks[1]);
}
