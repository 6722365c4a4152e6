mod error;
mod position;
mod sexagesimal;

pub use error::CoordError;
pub use position::SkyPosition;
pub use sexagesimal::{AngleUnit, Sexagesimal, Sign};
