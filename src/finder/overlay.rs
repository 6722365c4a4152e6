use serde::{Deserialize, Serialize};

use crate::finder::{FinderError, InstrumentCalibration};

/// Linear angular scale of the cutout in arcminutes per pixel.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ViewportScale(f64);

impl ViewportScale {
    pub fn new(arcmin_per_pixel: f64) -> Result<Self, FinderError> {
        if arcmin_per_pixel.is_finite() && arcmin_per_pixel > 0.0 {
            Ok(Self(arcmin_per_pixel))
        } else {
            Err(FinderError::InvalidScale(arcmin_per_pixel))
        }
    }

    /// Scale of a square cutout `fov_deg` wide rendered over `pixel_width`
    /// pixels.
    pub fn from_field(fov_deg: f64, pixel_width: u32) -> Result<Self, FinderError> {
        if pixel_width == 0 {
            return Err(FinderError::InvalidPixelWidth(pixel_width));
        }
        Self::new(fov_deg * 60.0 / pixel_width as f64)
    }

    pub fn arcmin_per_pixel(&self) -> f64 {
        self.0
    }

    pub fn to_pixels(&self, arcmin: f64) -> f64 {
        arcmin / self.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PixelPoint {
    pub x: f64,
    pub y: f64,
}

impl PixelPoint {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Center of a square image `pixel_width` wide.
    pub fn image_center(pixel_width: u32) -> Self {
        let half = pixel_width as f64 / 2.0;
        Self::new(half, half)
    }
}

#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Serialize,
    Deserialize,
    clap::ValueEnum,
    strum_macros::Display,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum Camera {
    Science,
    Guide,
}

/// A pixel picked by the user and the camera whose center it sets.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Pointer {
    pub position: PixelPoint,
    pub camera: Camera,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RectAperture {
    pub center: PixelPoint,
    pub width: f64,
    pub height: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CircleAperture {
    pub center: PixelPoint,
    pub radius: f64,
}

/// Pixel-space apertures for one placement.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Overlay {
    pub target_marker: CircleAperture,
    pub science: RectAperture,
    pub guide: RectAperture,
    pub guide_star: CircleAperture,
}

/// Place the science and guide apertures.
///
/// Exactly one camera follows the pointer; the other sits at the calibrated
/// offset from it. Without a pointer the science camera is centered on the
/// image. Pixel rows run opposite to declination, so the DEC offset enters
/// with the opposite sign of the RA offset.
pub fn place(
    pointer: Option<Pointer>,
    image_center: PixelPoint,
    calibration: &InstrumentCalibration,
    scale: ViewportScale,
) -> Overlay {
    let dx = scale.to_pixels(calibration.guide_offset.ra_arcmin);
    let dy = scale.to_pixels(calibration.guide_offset.dec_arcmin);

    let guide_from_science = |p: PixelPoint| PixelPoint::new(p.x - dx, p.y + dy);
    let science_from_guide = |p: PixelPoint| PixelPoint::new(p.x + dx, p.y - dy);

    let (science_center, guide_center) = match pointer {
        None => (image_center, guide_from_science(image_center)),
        Some(Pointer {
            position,
            camera: Camera::Guide,
        }) => (science_from_guide(position), position),
        Some(Pointer {
            position,
            camera: Camera::Science,
        }) => (position, guide_from_science(position)),
    };

    let marker_radius = scale.to_pixels(calibration.marker_radius_arcmin);

    Overlay {
        target_marker: CircleAperture {
            center: image_center,
            radius: marker_radius,
        },
        science: RectAperture {
            center: science_center,
            width: scale.to_pixels(calibration.science.width_arcmin),
            height: scale.to_pixels(calibration.science.height_arcmin),
        },
        guide: RectAperture {
            center: guide_center,
            width: scale.to_pixels(calibration.guide.width_arcmin),
            height: scale.to_pixels(calibration.guide.height_arcmin),
        },
        guide_star: CircleAperture {
            center: guide_center,
            radius: marker_radius,
        },
    }
}
