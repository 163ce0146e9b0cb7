use thiserror::Error;

#[derive(Error, Debug)]
pub enum CoalignError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Image format error: {0}")]
    Image(#[from] image::ImageError),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid TOML: {0}")]
    Toml(#[from] toml::de::Error),

    #[error(
        "Image and template are incompatible: image is {image_h}x{image_w}, template is {template_h}x{template_w}"
    )]
    ShapeMismatch {
        image_h: usize,
        image_w: usize,
        template_h: usize,
        template_w: usize,
    },

    #[error("{what} must be a {expected} array, got rank {rank}")]
    Dimensionality {
        what: &'static str,
        expected: &'static str,
        rank: usize,
    },

    #[error("Degenerate correlation peak at ({row}, {col}): flat neighbourhood")]
    DegeneratePeak { row: usize, col: usize },

    #[error("Empty frame sequence")]
    EmptySequence,

    #[error("Length mismatch: {frames} frames but {angles} rotation angles")]
    LengthMismatch { frames: usize, angles: usize },

    #[error("Invalid raster bounds: {0}")]
    InvalidBounds(String),

    #[error("Invalid timestamp {value:?}: {reason}")]
    InvalidTimestamp { value: String, reason: String },

    #[error("Frame source error: {0}")]
    FrameSource(String),

    #[error("Missing record: {0}")]
    MissingRecord(String),

    #[error("Alignment cancelled after {completed} of {total} steps")]
    Cancelled { completed: usize, total: usize },
}

pub type Result<T> = std::result::Result<T, CoalignError>;
