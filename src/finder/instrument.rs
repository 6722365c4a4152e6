use serde::{Deserialize, Serialize};

/// Angular size of a detector on the sky.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize, Serialize)]
pub struct Footprint {
    pub width_arcmin: f64,
    pub height_arcmin: f64,
}

/// Position of the guide camera center relative to the science camera center.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize, Serialize)]
pub struct GuideOffset {
    pub ra_arcmin: f64,
    pub dec_arcmin: f64,
}

/// Per-observatory instrument calibration used by the overlay geometry.
///
/// All angles share the unit of [`super::ViewportScale`] (arcminutes), so a
/// single division turns any of them into pixels.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize, Serialize)]
pub struct InstrumentCalibration {
    #[serde(default = "default_science")]
    pub science: Footprint,
    #[serde(default = "default_guide")]
    pub guide: Footprint,
    #[serde(default = "default_guide_offset")]
    pub guide_offset: GuideOffset,
    /// Radius of the target and guide-star markers.
    #[serde(default = "default_marker_radius")]
    pub marker_radius_arcmin: f64,
}

// Tortugas Mountain Observatory
fn default_science() -> Footprint {
    Footprint {
        width_arcmin: 36.8,
        height_arcmin: 24.8,
    }
}

fn default_guide() -> Footprint {
    Footprint {
        width_arcmin: 6.14,
        height_arcmin: 4.85,
    }
}

fn default_guide_offset() -> GuideOffset {
    GuideOffset {
        ra_arcmin: 5.0,
        dec_arcmin: -34.0,
    }
}

fn default_marker_radius() -> f64 {
    0.46
}

impl Default for InstrumentCalibration {
    fn default() -> Self {
        Self {
            science: default_science(),
            guide: default_guide(),
            guide_offset: default_guide_offset(),
            marker_radius_arcmin: default_marker_radius(),
        }
    }
}
