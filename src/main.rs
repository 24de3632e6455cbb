mod app;
mod bookmarks;
mod components;
mod config;
mod error;
mod event;
mod handler;
mod logging;
mod render;
mod theme;
mod tui;
mod ui;
mod viewer;

use std::path::{Path, PathBuf};
use std::time::Duration;

use clap::Parser;

use crate::app::App;
use crate::bookmarks::sort::SortCriterion;
use crate::config::{AppConfig, LoggingConfig};
use crate::error::{AppError, Result};
use crate::event::{Event, EventHandler};
use crate::render::html;
use crate::tui::{install_panic_hook, Tui};
use crate::ui::ViewOptions;
use crate::viewer::{ResortOutcome, Viewer};

/// View a browser bookmarks file as sortable nested lists.
#[derive(Parser, Debug)]
#[command(name = "bmv", version, about)]
struct Cli {
    /// Bookmarks file (defaults to `general.default_file` from config)
    file: Option<PathBuf>,

    /// Write the bookmarks as a standalone HTML page and exit
    #[arg(long, value_name = "PATH")]
    export: Option<PathBuf>,

    /// Resort a folder after loading, as ID=text|date|url|org (repeatable)
    #[arg(long = "sort", value_name = "ID=CRITERION")]
    sorts: Vec<String>,

    /// Explicit config file
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Append diagnostics to this file
    #[arg(long, value_name = "PATH")]
    log_file: Option<PathBuf>,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

impl Cli {
    /// Config values set by flags.
    fn overrides(&self) -> AppConfig {
        AppConfig {
            logging: LoggingConfig {
                file: self
                    .log_file
                    .as_ref()
                    .map(|p| p.to_string_lossy().to_string()),
                ..Default::default()
            },
            ..Default::default()
        }
    }
}

/// Parse a `--sort` value such as `12=url`.
fn parse_sort(arg: &str) -> Result<(String, SortCriterion)> {
    let (id, criterion) = arg
        .split_once('=')
        .ok_or_else(|| AppError::InvalidSort(format!("{} (expected ID=CRITERION)", arg)))?;
    let criterion = SortCriterion::from_attr(criterion.trim()).ok_or_else(|| {
        AppError::InvalidSort(format!("{} (criterion must be text, date, url or org)", arg))
    })?;
    let id = id.trim();
    if id.is_empty() {
        return Err(AppError::InvalidSort(format!("{} (empty folder id)", arg)));
    }
    Ok((id.to_string(), criterion))
}

/// Read, render and apply the requested resorts.
async fn load_viewer(path: &Path, config: &AppConfig, sorts: &[(String, SortCriterion)]) -> Result<Viewer> {
    let bytes = tokio::fs::read(path).await?;
    let mut viewer = Viewer::new(config.date_style());
    viewer.load_and_render(&bytes)?;
    for (id, criterion) in sorts {
        if viewer.resort(id, *criterion) == ResortOutcome::NotFound {
            eprintln!("Warning: no folder with id '{}' to sort", id);
        }
    }
    Ok(viewer)
}

async fn run_export(path: &Path, out: &Path, config: &AppConfig, sorts: &[(String, SortCriterion)]) -> Result<()> {
    let viewer = load_viewer(path, config, sorts).await?;
    let title = path
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| "Bookmarks".to_string());
    let page = html::write_page(&title, viewer.output(), None);
    tokio::fs::write(out, page).await?;

    let stats = viewer.stats();
    tracing::info!(
        path = %out.display(),
        folders = stats.folders,
        links = stats.links,
        indexed = viewer.index().len(),
        "exported"
    );
    Ok(())
}

async fn run_tui(path: &Path, config: &AppConfig, sorts: &[(String, SortCriterion)]) -> Result<()> {
    let viewer = load_viewer(path, config, sorts).await?;
    let mut app = App::new(viewer, path, config.export_path(), config.highlight_ms());
    let options = ViewOptions {
        theme: theme::resolve_theme(&config.theme),
        use_icons: config.use_icons(),
        show_dates: config.show_dates(),
    };

    tracing::debug!(scheme = config.theme_scheme(), "resolved theme");

    install_panic_hook();

    let mut tui = Tui::new(config.mouse_enabled())?;
    let mut events = EventHandler::new(Duration::from_millis(50));
    let event_tx = events.sender();

    loop {
        tui.draw(|frame| ui::render(&mut app, frame, &options))?;

        match events.next().await? {
            Event::Key(key) => handler::handle_key_event(&mut app, key, &event_tx),
            Event::Mouse(mouse) => handler::handle_mouse_event(&mut app, mouse),
            Event::Tick => app.tick(),
            Event::Resize(_, _) => {}
            Event::FileLoaded(result) => app.handle_file_loaded(result),
        }

        if app.should_quit {
            break;
        }
    }

    tui.restore()?;
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = AppConfig::load(cli.config.as_deref(), Some(&cli.overrides()));

    let sorts = cli
        .sorts
        .iter()
        .map(|s| parse_sort(s))
        .collect::<Result<Vec<_>>>()?;

    let path = cli
        .file
        .clone()
        .or_else(|| config.default_file())
        .ok_or(AppError::NoFileSelected)?;
    if !path.is_file() {
        return Err(AppError::InvalidPath(format!(
            "{} is not a readable file",
            path.display()
        )));
    }

    match &cli.export {
        Some(out) => {
            logging::init_logging(cli.verbose, config.log_level(), cli.log_file.as_deref())?;
            run_export(&path, out, &config, &sorts).await
        }
        None => {
            let log_file = config.log_file();
            logging::init_logging(cli.verbose, config.log_level(), log_file.as_deref())?;
            run_tui(&path, &config, &sorts).await
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_sort_accepts_id_and_criterion() {
        assert_eq!(parse_sort("12=url").unwrap(), ("12".to_string(), SortCriterion::ByUrl));
        assert_eq!(parse_sort(" 3 = org ").unwrap(), ("3".to_string(), SortCriterion::Original));
    }

    #[test]
    fn parse_sort_rejects_malformed() {
        assert!(matches!(parse_sort("12"), Err(AppError::InvalidSort(_))));
        assert!(matches!(parse_sort("12=size"), Err(AppError::InvalidSort(_))));
        assert!(matches!(parse_sort("=text"), Err(AppError::InvalidSort(_))));
    }

    #[test]
    fn cli_parses_flags() {
        let cli = Cli::parse_from([
            "bmv", "Bookmarks", "--export", "out.html", "--sort", "1=text", "--sort", "2=date", "-vv",
        ]);
        assert_eq!(cli.file, Some(PathBuf::from("Bookmarks")));
        assert_eq!(cli.export, Some(PathBuf::from("out.html")));
        assert_eq!(cli.sorts, vec!["1=text", "2=date"]);
        assert_eq!(cli.verbose, 2);
    }

    #[tokio::test]
    async fn export_writes_sorted_page() {
        let dir = tempfile::tempdir().expect("tempdir");
        let input = dir.path().join("Bookmarks");
        let out = dir.path().join("out.html");
        std::fs::write(
            &input,
            r#"{"roots":{"bookmark_bar":{"id":"1","name":"Bar","children":[
                {"id":"2","name":"B","url":"http://b.com"},
                {"id":"3","name":"A","url":"http://a.com"}
            ]}}}"#,
        )
        .expect("write input");

        let sorts = vec![("1".to_string(), SortCriterion::ByUrl)];
        run_export(&input, &out, &AppConfig::default(), &sorts)
            .await
            .expect("export");

        let page = std::fs::read_to_string(&out).expect("read output");
        let a = page.find("http://a.com").expect("a.com present");
        let b = page.find("http://b.com").expect("b.com present");
        assert!(a < b);
        assert!(page.contains(r#"class="sort-btn active" data-sortby="url""#));
    }

    #[tokio::test]
    async fn export_of_malformed_file_fails_without_output() {
        let dir = tempfile::tempdir().expect("tempdir");
        let input = dir.path().join("Bookmarks");
        let out = dir.path().join("out.html");
        std::fs::write(&input, "not json").expect("write input");

        let err = run_export(&input, &out, &AppConfig::default(), &[])
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Parse(_)));
        assert!(!out.exists());
    }
}
