use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum DisplayError {
    #[error("invalid display dimensions {lines}x{bits_per_line} (each must be 1..={max})")]
    InvalidDimensions {
        lines: usize,
        bits_per_line: usize,
        max: usize,
    },
    #[error("output path is empty")]
    EmptyOutputPath,
    #[error("cannot infer an image format from {0:?}")]
    UnsupportedFormat(PathBuf),
    #[error("output directory {0:?} does not exist")]
    MissingOutputDir(PathBuf),
    #[error("image error: {0}")]
    Image(#[from] image::ImageError),
}
