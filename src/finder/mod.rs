mod cutout;
mod error;
mod instrument;
mod overlay;
mod session;
mod wcs;

pub use cutout::{CutoutRequest, CutoutSettings};
pub use error::FinderError;
pub use instrument::{Footprint, GuideOffset, InstrumentCalibration};
pub use overlay::{
    place, Camera, CircleAperture, Overlay, PixelPoint, Pointer, RectAperture, ViewportScale,
};
pub use session::{parse_click, parse_pixel, Finder, Report};
pub use wcs::Wcs;
