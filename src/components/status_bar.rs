use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::Widget,
};

use crate::theme::ThemeColors;

const KEY_HINTS: &str = " t/d/u/o:sort  r:reload  e:export  q:quit ";

/// Status bar: file path and counts, key hints, or a transient message.
pub struct StatusBarWidget<'a> {
    path_str: &'a str,
    info: &'a str,
    theme: &'a ThemeColors,
    status_message: Option<&'a str>,
    is_error: bool,
}

impl<'a> StatusBarWidget<'a> {
    pub fn new(path_str: &'a str, info: &'a str, theme: &'a ThemeColors) -> Self {
        Self {
            path_str,
            info,
            theme,
            status_message: None,
            is_error: false,
        }
    }

    pub fn status_message(mut self, msg: &'a str, is_error: bool) -> Self {
        self.status_message = Some(msg);
        self.is_error = is_error;
        self
    }
}

/// Keep the last `width` characters, prefixed with `...` when cut.
fn truncate_left(s: &str, width: usize) -> String {
    let len = s.chars().count();
    if len <= width {
        return s.to_string();
    }
    if width <= 3 {
        return s.chars().skip(len - width).collect();
    }
    let tail: String = s.chars().skip(len - (width - 3)).collect();
    format!("...{}", tail)
}

impl<'a> Widget for StatusBarWidget<'a> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.height == 0 || area.width == 0 {
            return;
        }

        let width = area.width as usize;
        let bar = Style::default().bg(self.theme.status_bg).fg(self.theme.status_fg);

        if let Some(msg) = self.status_message {
            let style = if self.is_error {
                Style::default()
                    .bg(self.theme.error_fg)
                    .fg(self.theme.status_bg)
            } else {
                bar.fg(self.theme.success_fg)
            };
            let display: String = msg.chars().take(width).collect();
            let display = format!("{:<width$}", display, width = width);
            buf.set_line(area.x, area.y, &Line::from(Span::styled(display, style)), area.width);
            return;
        }

        // Normal bar: [path] [info] ... [key_hints]
        let hints_len = KEY_HINTS.chars().count();
        let remaining = width.saturating_sub(hints_len);
        let info = format!(" {} ", self.info);
        let path_budget = remaining.saturating_sub(info.chars().count());
        let path = truncate_left(self.path_str, path_budget);
        let gap = remaining
            .saturating_sub(path.chars().count())
            .saturating_sub(info.chars().count());

        let mut spans = vec![
            Span::styled(path, bar.add_modifier(Modifier::BOLD)),
            Span::styled(info, bar),
            Span::styled(" ".repeat(gap), bar),
        ];
        if width >= hints_len {
            spans.push(Span::styled(KEY_HINTS, bar.fg(self.theme.sort_active_fg)));
        }
        buf.set_line(area.x, area.y, &Line::from(spans), area.width);
    }
}
