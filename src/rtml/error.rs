use thiserror::Error;

#[derive(Debug, Error)]
pub enum DocumentError {
    #[error("cannot {0} a closed document")]
    InvalidDocumentState(&'static str),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("render error: {0}")]
    Render(#[from] askama::Error),
}
