//! Application configuration: TOML file loading, CLI overrides, and defaults.
//!
//! Resolution order (first found wins, values merge/override):
//! 1. CLI flags (`--config`, `--log-file`, positional file, etc.)
//! 2. `$BMV_CONFIG` environment variable (path to config file)
//! 3. Project-local `.bmv.toml` in the current working directory
//! 4. Global `~/.config/bmv/config.toml`
//! 5. Built-in defaults

use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::bookmarks::timestamp::{DateStyle, DEFAULT_DATE_FORMAT};

// ── Section configs ──────────────────────────────────────────────────────────

/// General application settings.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct GeneralConfig {
    /// Bookmarks file opened when none is given on the command line.
    pub default_file: Option<String>,
    /// Enable mouse capture in the terminal view.
    pub mouse: Option<bool>,
}

/// How bookmarks are displayed.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct DisplayConfig {
    /// strftime pattern for dates (numeric day, month, year by default).
    pub date_format: Option<String>,
    /// Show dates in local time (`false` = UTC).
    pub local_time: Option<bool>,
    /// Show the date column in the terminal view.
    pub show_dates: Option<bool>,
    /// Use nerd font icons (false = ASCII fallback).
    pub use_icons: Option<bool>,
    /// How long a resorted folder stays highlighted, in milliseconds.
    pub highlight_ms: Option<u64>,
}

/// HTML export settings.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct ExportConfig {
    /// Target of the in-app export key.
    pub path: Option<String>,
}

/// Diagnostics settings.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct LoggingConfig {
    /// Default level filter when `RUST_LOG` is unset: "error" .. "trace".
    pub level: Option<String>,
    /// Log file used by the terminal view.
    pub file: Option<String>,
}

/// Color settings for a single theme palette.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct ThemeColorsConfig {
    pub tree_fg: Option<String>,
    pub tree_selected_bg: Option<String>,
    pub tree_selected_fg: Option<String>,
    pub tree_folder_fg: Option<String>,
    pub tree_link_fg: Option<String>,
    pub date_fg: Option<String>,
    pub sort_active_fg: Option<String>,
    pub highlight_bg: Option<String>,
    pub status_bg: Option<String>,
    pub status_fg: Option<String>,
    pub border_fg: Option<String>,
}

/// Theme configuration section.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct ThemeConfig {
    /// Color scheme: "dark", "light", "custom".
    pub scheme: Option<String>,
    /// Custom color overrides.
    pub custom: Option<ThemeColorsConfig>,
}

// ── Top-level config ─────────────────────────────────────────────────────────

/// Top-level application configuration.
///
/// All fields are optional so that partial configs from different sources
/// can be merged together (CLI overrides file, file overrides defaults).
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct AppConfig {
    pub general: GeneralConfig,
    pub display: DisplayConfig,
    pub export: ExportConfig,
    pub logging: LoggingConfig,
    pub theme: ThemeConfig,
}

// ── Default constants ────────────────────────────────────────────────────────

/// Default highlight duration after a resort.
pub const DEFAULT_HIGHLIGHT_MS: u64 = 1000;
/// Default export target, relative to the working directory.
pub const DEFAULT_EXPORT_PATH: &str = "bookmarks.html";
/// Default log level.
pub const DEFAULT_LOG_LEVEL: &str = "warn";

// ── Config file locator ──────────────────────────────────────────────────────

/// Return the list of candidate config file paths in priority order.
///
/// Does NOT include the CLI `--config` path; that is handled separately.
fn candidate_paths() -> Vec<PathBuf> {
    let mut paths = Vec::new();

    if let Ok(env_path) = std::env::var("BMV_CONFIG") {
        paths.push(PathBuf::from(env_path));
    }

    if let Ok(cwd) = std::env::current_dir() {
        paths.push(cwd.join(".bmv.toml"));
    }

    if let Some(config_dir) = dirs::config_dir() {
        paths.push(config_dir.join("bmv").join("config.toml"));
    }

    paths
}

/// Try to read and parse a TOML config file. Returns `None` if the file
/// doesn't exist or can't be parsed (with a warning printed to stderr).
///
/// Config is loaded before logging is set up, hence stderr.
fn load_file(path: &Path) -> Option<AppConfig> {
    let content = match std::fs::read_to_string(path) {
        Ok(c) => c,
        Err(_) => return None,
    };
    match toml::from_str::<AppConfig>(&content) {
        Ok(cfg) => Some(cfg),
        Err(e) => {
            eprintln!(
                "Warning: failed to parse config file {}: {}",
                path.display(),
                e
            );
            None
        }
    }
}

// ── Merge logic ──────────────────────────────────────────────────────────────

impl AppConfig {
    /// Merge `other` on top of `self`; `other`'s `Some` values win.
    pub fn merge(self, other: &AppConfig) -> AppConfig {
        AppConfig {
            general: GeneralConfig {
                default_file: other
                    .general
                    .default_file
                    .clone()
                    .or(self.general.default_file),
                mouse: other.general.mouse.or(self.general.mouse),
            },
            display: DisplayConfig {
                date_format: other
                    .display
                    .date_format
                    .clone()
                    .or(self.display.date_format),
                local_time: other.display.local_time.or(self.display.local_time),
                show_dates: other.display.show_dates.or(self.display.show_dates),
                use_icons: other.display.use_icons.or(self.display.use_icons),
                highlight_ms: other.display.highlight_ms.or(self.display.highlight_ms),
            },
            export: ExportConfig {
                path: other.export.path.clone().or(self.export.path),
            },
            logging: LoggingConfig {
                level: other.logging.level.clone().or(self.logging.level),
                file: other.logging.file.clone().or(self.logging.file),
            },
            theme: ThemeConfig {
                scheme: other.theme.scheme.clone().or(self.theme.scheme),
                custom: match (&self.theme.custom, &other.theme.custom) {
                    (_, Some(o)) => Some(o.clone()),
                    (Some(s), None) => Some(s.clone()),
                    (None, None) => None,
                },
            },
        }
    }

    /// Load the final merged configuration.
    ///
    /// `cli_config_path` is an explicit config file path from `--config`.
    /// `cli_overrides` are partial overrides derived from CLI flags.
    pub fn load(cli_config_path: Option<&Path>, cli_overrides: Option<&AppConfig>) -> AppConfig {
        let mut config = AppConfig::default();

        // Walk in reverse so that highest-priority (env var) overwrites lower.
        let paths = candidate_paths();
        for path in paths.iter().rev() {
            if let Some(file_cfg) = load_file(path) {
                config = config.merge(&file_cfg);
            }
        }

        if let Some(cli_path) = cli_config_path {
            if let Some(file_cfg) = load_file(cli_path) {
                config = config.merge(&file_cfg);
            }
        }

        if let Some(overrides) = cli_overrides {
            config = config.merge(overrides);
        }

        config
    }

    // ── Convenience getters with built-in defaults ──────────────────────────

    /// Bookmarks file to open when none is given on the command line.
    pub fn default_file(&self) -> Option<PathBuf> {
        self.general.default_file.as_deref().map(expand_home)
    }

    /// Whether mouse capture is enabled.
    pub fn mouse_enabled(&self) -> bool {
        self.general.mouse.unwrap_or(false)
    }

    /// strftime pattern for dates.
    pub fn date_format(&self) -> &str {
        self.display
            .date_format
            .as_deref()
            .unwrap_or(DEFAULT_DATE_FORMAT)
    }

    /// Whether dates are shown in local time.
    pub fn local_time(&self) -> bool {
        self.display.local_time.unwrap_or(true)
    }

    /// The resolved date display profile.
    pub fn date_style(&self) -> DateStyle {
        DateStyle::new(self.date_format(), self.local_time())
    }

    /// Whether the terminal view shows dates.
    pub fn show_dates(&self) -> bool {
        self.display.show_dates.unwrap_or(true)
    }

    /// Whether to use nerd font icons.
    pub fn use_icons(&self) -> bool {
        self.display.use_icons.unwrap_or(false)
    }

    /// Highlight duration in milliseconds.
    pub fn highlight_ms(&self) -> u64 {
        self.display.highlight_ms.unwrap_or(DEFAULT_HIGHLIGHT_MS)
    }

    /// Target of the in-app export.
    pub fn export_path(&self) -> PathBuf {
        expand_home(self.export.path.as_deref().unwrap_or(DEFAULT_EXPORT_PATH))
    }

    /// Default log level filter.
    pub fn log_level(&self) -> &str {
        self.logging.level.as_deref().unwrap_or(DEFAULT_LOG_LEVEL)
    }

    /// Log file for the terminal view: configured path, or
    /// `<cache dir>/bmv/bmv.log`.
    pub fn log_file(&self) -> Option<PathBuf> {
        match self.logging.file.as_deref() {
            Some(path) => Some(expand_home(path)),
            None => dirs::cache_dir().map(|dir| dir.join("bmv").join("bmv.log")),
        }
    }

    /// Theme scheme: "dark", "light", or "custom".
    pub fn theme_scheme(&self) -> &str {
        self.theme.scheme.as_deref().unwrap_or("dark")
    }
}

/// Expand a leading `~/` to the home directory.
fn expand_home(path: &str) -> PathBuf {
    if let Some(rest) = path.strip_prefix("~/") {
        if let Some(home) = dirs::home_dir() {
            return home.join(rest);
        }
    }
    PathBuf::from(path)
}

// ── Tests ────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_values() {
        let cfg = AppConfig::default();
        assert_eq!(cfg.default_file(), None);
        assert_eq!(cfg.mouse_enabled(), false);
        assert_eq!(cfg.date_format(), "%-d.%-m.%Y");
        assert_eq!(cfg.local_time(), true);
        assert_eq!(cfg.show_dates(), true);
        assert_eq!(cfg.use_icons(), false);
        assert_eq!(cfg.highlight_ms(), 1000);
        assert_eq!(cfg.export_path(), PathBuf::from("bookmarks.html"));
        assert_eq!(cfg.log_level(), "warn");
        assert_eq!(cfg.theme_scheme(), "dark");
    }

    #[test]
    fn test_toml_parsing_full() {
        let toml = r#"
[general]
default_file = "/tmp/Bookmarks"
mouse = true

[display]
date_format = "%Y-%m-%d"
local_time = false
show_dates = false
use_icons = true
highlight_ms = 250

[export]
path = "/tmp/out.html"

[logging]
level = "debug"
file = "/tmp/bmv.log"

[theme]
scheme = "light"
"#;
        let cfg: AppConfig = toml::from_str(toml).expect("parse failed");
        assert_eq!(cfg.default_file(), Some(PathBuf::from("/tmp/Bookmarks")));
        assert_eq!(cfg.mouse_enabled(), true);
        assert_eq!(cfg.date_format(), "%Y-%m-%d");
        assert_eq!(cfg.local_time(), false);
        assert_eq!(cfg.show_dates(), false);
        assert_eq!(cfg.use_icons(), true);
        assert_eq!(cfg.highlight_ms(), 250);
        assert_eq!(cfg.export_path(), PathBuf::from("/tmp/out.html"));
        assert_eq!(cfg.log_level(), "debug");
        assert_eq!(cfg.log_file(), Some(PathBuf::from("/tmp/bmv.log")));
        assert_eq!(cfg.theme_scheme(), "light");
        assert_eq!(cfg.date_style(), DateStyle::utc("%Y-%m-%d"));
    }

    #[test]
    fn test_toml_parsing_partial() {
        let toml = r#"
[display]
local_time = false
"#;
        let cfg: AppConfig = toml::from_str(toml).expect("parse failed");
        assert_eq!(cfg.local_time(), false);
        // Everything else should be defaults
        assert_eq!(cfg.date_format(), DEFAULT_DATE_FORMAT);
        assert_eq!(cfg.highlight_ms(), 1000);
    }

    #[test]
    fn test_toml_parsing_empty() {
        let cfg: AppConfig = toml::from_str("").expect("parse failed");
        assert_eq!(cfg.show_dates(), true);
        assert_eq!(cfg.theme_scheme(), "dark");
    }

    #[test]
    fn test_invalid_date_format_falls_back() {
        let toml = r#"
[display]
date_format = "%"
local_time = false
"#;
        let cfg: AppConfig = toml::from_str(toml).expect("parse failed");
        assert_eq!(cfg.date_style(), DateStyle::utc(DEFAULT_DATE_FORMAT));
    }

    #[test]
    fn test_merge_overrides() {
        let base = AppConfig {
            display: DisplayConfig {
                date_format: Some("%Y".into()),
                highlight_ms: Some(500),
                ..Default::default()
            },
            ..Default::default()
        };

        let over = AppConfig {
            display: DisplayConfig {
                date_format: Some("%d/%m/%Y".into()),
                // highlight_ms not set: should keep base
                ..Default::default()
            },
            ..Default::default()
        };

        let merged = base.merge(&over);
        assert_eq!(merged.date_format(), "%d/%m/%Y"); // overridden
        assert_eq!(merged.highlight_ms(), 500); // from base
    }

    #[test]
    fn test_merge_none_does_not_clear_some() {
        let base = AppConfig {
            logging: LoggingConfig {
                level: Some("info".into()),
                file: Some("/tmp/a.log".into()),
            },
            ..Default::default()
        };
        let over = AppConfig::default();

        let merged = base.merge(&over);
        assert_eq!(merged.log_level(), "info");
        assert_eq!(merged.log_file(), Some(PathBuf::from("/tmp/a.log")));
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().expect("tempdir");
        let cfg_path = dir.path().join("test-config.toml");
        let mut f = std::fs::File::create(&cfg_path).expect("create");
        writeln!(
            f,
            r#"
[general]
default_file = "/data/Bookmarks"

[display]
show_dates = false
"#
        )
        .expect("write");

        let cfg = load_file(&cfg_path).expect("load");
        assert_eq!(cfg.default_file(), Some(PathBuf::from("/data/Bookmarks")));
        assert_eq!(cfg.show_dates(), false);
        // Unset fields fall through to defaults
        assert_eq!(cfg.highlight_ms(), 1000);
    }

    #[test]
    fn test_load_missing_file() {
        let result = load_file(Path::new("/nonexistent/config.toml"));
        assert!(result.is_none());
    }

    #[test]
    fn test_load_invalid_toml_returns_none() {
        let dir = tempfile::tempdir().expect("tempdir");
        let cfg_path = dir.path().join("bad.toml");
        std::fs::write(&cfg_path, "this is { not valid toml").expect("write");
        let result = load_file(&cfg_path);
        assert!(result.is_none());
    }

    #[test]
    fn test_load_with_cli_overrides() {
        let dir = tempfile::tempdir().expect("tempdir");
        let cfg_path = dir.path().join("config.toml");
        std::fs::write(
            &cfg_path,
            r#"
[general]
default_file = "/from/file"

[logging]
level = "info"
"#,
        )
        .expect("write");

        let cli_overrides = AppConfig {
            general: GeneralConfig {
                default_file: Some("/from/cli".into()),
                ..Default::default()
            },
            ..Default::default()
        };

        let cfg = AppConfig::load(Some(&cfg_path), Some(&cli_overrides));
        // CLI override wins
        assert_eq!(cfg.default_file(), Some(PathBuf::from("/from/cli")));
        // File value preserved (not overridden by CLI)
        assert_eq!(cfg.log_level(), "info");
    }

    #[test]
    fn test_theme_custom_colors() {
        let toml = r##"
[theme]
scheme = "custom"

[theme.custom]
tree_fg = "#c0caf5"
highlight_bg = "#565f89"
"##;
        let cfg: AppConfig = toml::from_str(toml).expect("parse");
        assert_eq!(cfg.theme_scheme(), "custom");
        let custom = cfg.theme.custom.as_ref().expect("custom present");
        assert_eq!(custom.tree_fg.as_deref(), Some("#c0caf5"));
        assert_eq!(custom.highlight_bg.as_deref(), Some("#565f89"));
        assert!(custom.status_bg.is_none());
    }

    #[test]
    fn test_expand_home() {
        assert_eq!(expand_home("/abs/path"), PathBuf::from("/abs/path"));
        if let Some(home) = dirs::home_dir() {
            assert_eq!(expand_home("~/x.json"), home.join("x.json"));
        }
    }
}
