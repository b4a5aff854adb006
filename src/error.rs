// One error type for the whole crate.
// Every variant states *where* things went wrong.
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("Window init error: {0}")]
    WindowInit(String), // Creating the window failed
    #[error("Window update error: {0}")]
    WindowUpdate(String), // Updating the window buffer failed
    #[error("Image load error: {0}")]
    ImageLoad(String), // Opening/decoding the source picture failed

    /// A single run kept growing past the iteration cap.
    /// Means a glyph was mismeasured (e.g. zero advance), never legitimate text.
    #[error("Packing overflow: run at ({x}, {y}) exceeded {limit} characters")]
    PackingOverflow { x: f32, y: f32, limit: usize },

    #[error("Invalid style: {0}")]
    InvalidStyle(String),
    #[error("Invalid attribute {name}={value:?}")]
    InvalidAttribute { name: String, value: String },

    #[error("No source image loaded yet")]
    NotLoaded,

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
