use std::fs::OpenOptions;
use std::path::Path;
use std::sync::Mutex;

use tracing_subscriber::{fmt, EnvFilter};

use crate::error::Result;

/// Level filter from `-v` count, or `default` when no flag was given.
fn level_for(verbose: u8, default: &str) -> &str {
    match verbose {
        0 => default,
        1 => "info",
        2 => "debug",
        _ => "trace",
    }
}

/// Install the global tracing subscriber.
///
/// `RUST_LOG` takes precedence over `verbose` and `default_level`. With a
/// `log_file`, output is appended there without ANSI colors (the terminal
/// view owns stdout); otherwise it goes to stderr.
pub fn init_logging(verbose: u8, default_level: &str, log_file: Option<&Path>) -> Result<()> {
    let filter = std::env::var("RUST_LOG").map_or_else(
        |_| EnvFilter::new(level_for(verbose, default_level)),
        EnvFilter::new,
    );

    match log_file {
        Some(path) => {
            if let Some(parent) = path.parent() {
                std::fs::create_dir_all(parent)?;
            }
            let file = OpenOptions::new().create(true).append(true).open(path)?;
            fmt()
                .with_env_filter(filter)
                .with_ansi(false)
                .with_writer(Mutex::new(file))
                .init();
        }
        None => {
            fmt()
                .with_env_filter(filter)
                .with_writer(std::io::stderr)
                .init();
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn verbose_flag_overrides_default() {
        assert_eq!(level_for(0, "warn"), "warn");
        assert_eq!(level_for(1, "warn"), "info");
        assert_eq!(level_for(2, "error"), "debug");
        assert_eq!(level_for(7, "warn"), "trace");
    }
}
