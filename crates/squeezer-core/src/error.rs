use thiserror::Error;

#[derive(Debug, Error)]
pub enum SqueezerError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),
    #[error("Directory walk error: {0}")]
    Walk(#[from] walkdir::Error),
    #[error("Invalid glob pattern: {0}")]
    Glob(#[from] globset::Error),
    #[error("Invalid input: {0}")]
    InvalidInput(String),
    #[error("Invalid bin dimensions: {width}x{height}")]
    InvalidDimensions { width: u32, height: u32 },
    #[error("Nothing to pack")]
    Empty,
    #[error("Sprites do not fit the bin: placed {placed} of {total}")]
    OutOfSpace { placed: usize, total: usize },
    #[error("No bin size up to {width}x{height} fits all sprites ({attempts} attempts)")]
    SearchExhausted {
        attempts: usize,
        width: u32,
        height: u32,
    },
    #[error("Template error: {0}")]
    Template(String),
    #[error("No packed atlas available; run packing first")]
    NotPacked,
}

pub type Result<T> = std::result::Result<T, SqueezerError>;
