use thiserror::Error;

#[derive(Debug, Error)]
pub enum CoordError {
    #[error("invalid coordinate format: {0}")]
    InvalidCoordinateFormat(String),
    #[error("expected 1 to 3 sexagesimal fields: {0}")]
    WrongFieldCount(String),
    #[error("hours may not be negative: {0}")]
    NegativeHours(String),
}
