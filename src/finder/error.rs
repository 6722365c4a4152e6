use thiserror::Error;

#[derive(Debug, Error)]
pub enum FinderError {
    #[error("invalid plate scale: {0} arcmin/pixel")]
    InvalidScale(f64),
    #[error("invalid image width: {0} pixels")]
    InvalidPixelWidth(u32),
    #[error("invalid pointer: {0}")]
    InvalidPointer(String),
}
