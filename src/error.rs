use thiserror::Error;

/// Application-wide result type alias.
pub type Result<T> = std::result::Result<T, AppError>;

/// Application error types.
#[derive(Debug, Error)]
pub enum AppError {
    /// I/O errors from reading the bookmarks file or writing an export.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Terminal initialization or rendering errors.
    #[error("Terminal error: {0}")]
    Terminal(String),

    /// Invalid path provided by the user.
    #[error("Invalid path: {0}")]
    InvalidPath(String),

    /// Neither a CLI argument nor `general.default_file` named a file.
    #[error("No bookmarks file selected: pass a path or set general.default_file")]
    NoFileSelected,

    /// The bookmarks file is not valid UTF-8.
    #[error("Bookmarks file is not valid UTF-8: {0}")]
    Encoding(#[from] std::str::Utf8Error),

    /// The bookmarks file is not a valid bookmarks JSON document.
    #[error("Failed to parse bookmarks: {0}")]
    Parse(#[from] serde_json::Error),

    /// A `--sort` argument that is not `ID=CRITERION`.
    #[error("Invalid sort request: {0}")]
    InvalidSort(String),
}
