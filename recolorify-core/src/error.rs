use thiserror::Error;

#[derive(Debug, Error)]
pub enum RecolorError {
    #[error("invalid hex color '{input}': {reason}")]
    InvalidColor { input: String, reason: &'static str },

    #[error("invalid palette: {0}")]
    InvalidPalette(String),

    #[error("palette contained no valid colors")]
    EmptyPalette,

    #[error("pixel buffer length {len} does not match dimensions {width}x{height}")]
    DimensionMismatch {
        len: usize,
        width: u32,
        height: u32,
    },

    #[error(transparent)]
    Image(#[from] image::ImageError),
}

pub type Result<T> = std::result::Result<T, RecolorError>;
