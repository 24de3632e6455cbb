//! HTML serialization of rendered markup.

use std::fmt::Write;

use crate::render::markup::{Container, Entry, Markup};

/// Highlight animation length used by the page stylesheet.
const HIGHLIGHT_MS: u64 = 1000;

/// Escape every character that is significant in HTML text or attributes.
pub fn escape_html(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

/// Serialize a fragment: `<dl>` per folder, `<dt>` per link.
///
/// Names are escaped; link targets are written verbatim.
pub fn write_fragment(items: &[Markup]) -> String {
    write_items(items, None)
}

fn write_items(items: &[Markup], mut highlighted: Option<&str>) -> String {
    let mut out = String::new();
    for item in items {
        write_markup(&mut out, item, &mut highlighted);
    }
    out
}

fn write_markup(out: &mut String, item: &Markup, highlighted: &mut Option<&str>) {
    match item {
        Markup::Container(c) => write_container(out, c, highlighted),
        Markup::Entry(e) => write_entry(out, e),
    }
}

/// Only the first container with the highlighted id is marked.
fn write_container(out: &mut String, c: &Container, highlighted: &mut Option<&str>) {
    let class = if *highlighted == Some(c.id.as_str()) {
        *highlighted = None;
        r#" class="item-highlight""#
    } else {
        ""
    };
    let _ = write!(
        out,
        r#"<dl id="item-{}"{}><span class="title">{}</span>"#,
        escape_html(&c.id),
        class,
        escape_html(&c.title)
    );
    for (criterion, active) in c.controls() {
        let _ = write!(
            out,
            r#"<span class="sort-btn{}" data-sortby="{}" title="{}">{}</span>"#,
            if active { " active" } else { "" },
            criterion.attr(),
            criterion.title(),
            criterion.short_label()
        );
    }
    write_date(out, c.date.as_deref());
    for child in &c.children {
        write_markup(out, child, highlighted);
    }
    out.push_str("</dl>");
}

fn write_entry(out: &mut String, e: &Entry) {
    let _ = write!(
        out,
        r#"<dt id="item-{}"><a href="{}">{}</a>"#,
        escape_html(&e.id),
        e.href,
        escape_html(&e.label)
    );
    write_date(out, e.date.as_deref());
    out.push_str("</dt>");
}

fn write_date(out: &mut String, date: Option<&str>) {
    let _ = write!(
        out,
        r#"<span class="date">{}</span>"#,
        escape_html(date.unwrap_or(""))
    );
}

/// Wrap a fragment in a standalone page. The container whose id is
/// `highlighted`, if any, carries the highlight class.
pub fn write_page(title: &str, items: &[Markup], highlighted: Option<&str>) -> String {
    let body = write_items(items, highlighted);

    format!(
        r#"<!DOCTYPE html>
<html>
<head>
<meta charset="utf-8">
<title>{title}</title>
<style>
body {{ font-family: sans-serif; }}
dl {{ margin: 0.2em 0 0.2em 1.2em; }}
dt {{ margin-left: 1.2em; }}
.title {{ font-weight: bold; margin-right: 0.5em; }}
.sort-btn {{ display: inline-block; padding: 0 0.3em; margin: 0 0.1em; border: 1px solid #ccc; font-size: 0.8em; }}
.sort-btn.active {{ background: #ddd; }}
.date {{ color: #888; margin-left: 0.5em; font-size: 0.8em; }}
@keyframes highlightFxAnim {{ from {{ background: #ffff99; }} to {{ background: transparent; }} }}
.item-highlight {{ animation: highlightFxAnim {HIGHLIGHT_MS}ms; }}
</style>
</head>
<body>
<div id="result">{body}</div>
</body>
</html>
"#,
        title = escape_html(title),
    )
}
