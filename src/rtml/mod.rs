mod document;
mod error;
mod options;
mod template;
mod types;

pub use document::Document;
pub use error::DocumentError;
pub use options::RenderOptions;
pub use types::{Constraints, Contact, ExposureSpec, Request};
