use log::info;
use serde::Serialize;

use crate::coords::SkyPosition;
use crate::finder::{
    place, Camera, CutoutRequest, CutoutSettings, FinderError, InstrumentCalibration, Overlay,
    PixelPoint, Pointer, ViewportScale, Wcs,
};

/// Result of one placement: the apertures and where the science camera points.
#[derive(Debug, Clone, Serialize)]
pub struct Report {
    pub driven: Option<Camera>,
    pub overlay: Overlay,
    pub science_center: SkyPosition,
}

/// Guide-star finder for one cutout. Every placement is recomputed from
/// scratch; nothing carries over between clicks.
pub struct Finder {
    target: SkyPosition,
    calibration: InstrumentCalibration,
    scale: ViewportScale,
    image_center: PixelPoint,
    wcs: Wcs,
    cutout_url: String,
}

impl Finder {
    pub fn new(
        target: SkyPosition,
        cutout: CutoutRequest<'_>,
        calibration: InstrumentCalibration,
    ) -> Result<Self, FinderError> {
        let scale = ViewportScale::from_field(cutout.fov_deg, cutout.pixels)?;
        let image_center = PixelPoint::image_center(cutout.pixels);

        Ok(Self {
            target,
            calibration,
            scale,
            image_center,
            wcs: Wcs::for_cutout(cutout.position, image_center, scale),
            cutout_url: cutout.url(),
        })
    }

    pub fn from_settings(
        target: SkyPosition,
        settings: &CutoutSettings,
        calibration: InstrumentCalibration,
    ) -> Result<Self, FinderError> {
        Self::new(target, CutoutRequest::new(settings, target), calibration)
    }

    pub fn target(&self) -> SkyPosition {
        self.target
    }

    pub fn scale(&self) -> ViewportScale {
        self.scale
    }

    pub fn cutout_url(&self) -> &str {
        &self.cutout_url
    }

    /// Science camera on the image center, guide camera at its offset.
    pub fn initial(&self) -> Report {
        self.report(None)
    }

    pub fn click(&self, pointer: Pointer) -> Result<Report, FinderError> {
        let PixelPoint { x, y } = pointer.position;
        if !x.is_finite() || !y.is_finite() {
            return Err(FinderError::InvalidPointer(format!("{x}, {y}")));
        }
        Ok(self.report(Some(pointer)))
    }

    fn report(&self, pointer: Option<Pointer>) -> Report {
        let overlay = place(pointer, self.image_center, &self.calibration, self.scale);
        let science_center = self.wcs.pixel_to_sky(overlay.science.center);
        info!("Science camera center: {}", science_center);

        Report {
            driven: pointer.map(|p| p.camera),
            overlay,
            science_center,
        }
    }
}

/// Parse a click line: `x y` or `x,y`, optionally followed by the camera it
/// drives (`s`/`science`/`1` or `g`/`guide`/`3`, mouse-button style).
pub fn parse_click(line: &str, default_camera: Camera) -> Result<Pointer, FinderError> {
    let err = || FinderError::InvalidPointer(line.trim().to_string());

    let tokens: Vec<&str> = line
        .split(|c: char| c == ',' || c.is_whitespace())
        .filter(|t| !t.is_empty())
        .collect();

    let (x, y, camera) = match tokens.as_slice() {
        [x, y] => (x, y, default_camera),
        [x, y, camera] => {
            let camera = match camera.to_ascii_lowercase().as_str() {
                "s" | "science" | "1" => Camera::Science,
                "g" | "guide" | "3" => Camera::Guide,
                _ => return Err(err()),
            };
            (x, y, camera)
        }
        _ => return Err(err()),
    };

    let x: f64 = x.parse().map_err(|_| err())?;
    let y: f64 = y.parse().map_err(|_| err())?;

    Ok(Pointer {
        position: PixelPoint::new(x, y),
        camera,
    })
}

/// A bare `x,y` or `x y` pixel without a camera token.
pub fn parse_pixel(text: &str) -> Result<PixelPoint, FinderError> {
    let tokens = text
        .split(|c: char| c == ',' || c.is_whitespace())
        .filter(|t| !t.is_empty())
        .count();
    if tokens != 2 {
        return Err(FinderError::InvalidPointer(text.trim().to_string()));
    }
    parse_click(text, Camera::Science).map(|p| p.position)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::*;

    fn finder() -> Finder {
        Finder::from_settings(
            SkyPosition::new(180.0, 30.0),
            &CutoutSettings::default(),
            InstrumentCalibration::default(),
        )
        .unwrap()
    }

    #[test]
    fn test_initial_points_at_target() {
        let report = finder().initial();
        assert_eq!(report.driven, None);
        assert_eq!(report.overlay.science.center, PixelPoint::new(375.0, 375.0));
        assert_abs_diff_eq!(report.science_center.ra_deg(), 180.0, epsilon = 1e-9);
        assert_abs_diff_eq!(report.science_center.dec_deg(), 30.0, epsilon = 1e-9);
    }

    #[test]
    fn test_guide_click_moves_science_camera() {
        let finder = finder();
        let report = finder
            .click(Pointer {
                position: PixelPoint::new(375.0, 375.0),
                camera: Camera::Guide,
            })
            .unwrap();

        // 0.12 arcmin/pixel; the science camera sits 34 arcmin north of the
        // guide camera
        let science = report.overlay.science.center;
        assert_abs_diff_eq!(science.y, 375.0 + 34.0 / 0.12, epsilon = 1e-9);
        assert!(report.science_center.dec_deg() > 30.5);
        assert_eq!(report.driven, Some(Camera::Guide));
    }

    #[test]
    fn test_clicks_are_independent() {
        let finder = finder();
        let pointer = Pointer {
            position: PixelPoint::new(200.0, 500.0),
            camera: Camera::Science,
        };
        let first = finder.click(pointer).unwrap();
        finder
            .click(Pointer {
                position: PixelPoint::new(10.0, 10.0),
                camera: Camera::Guide,
            })
            .unwrap();
        let again = finder.click(pointer).unwrap();
        assert_eq!(first.overlay, again.overlay);
    }

    #[test]
    fn test_non_finite_click() {
        let result = finder().click(Pointer {
            position: PixelPoint::new(f64::NAN, 1.0),
            camera: Camera::Science,
        });
        assert!(matches!(result, Err(FinderError::InvalidPointer(_))));
    }

    #[test]
    fn test_parse_click() {
        let p = parse_click("120.5 300", Camera::Science).unwrap();
        assert_eq!(p.position, PixelPoint::new(120.5, 300.0));
        assert_eq!(p.camera, Camera::Science);

        let p = parse_click("10,20 g", Camera::Science).unwrap();
        assert_eq!(p.camera, Camera::Guide);

        let p = parse_click("10 20 3", Camera::Science).unwrap();
        assert_eq!(p.camera, Camera::Guide);

        assert!(parse_click("10", Camera::Science).is_err());
        assert!(parse_click("10 20 left", Camera::Science).is_err());
        assert!(parse_click("ten 20", Camera::Science).is_err());
    }

    #[test]
    fn test_parse_pixel() {
        let p = parse_pixel("10,20").unwrap();
        assert_abs_diff_eq!(p.x, 10.0);
        assert_abs_diff_eq!(p.y, 20.0);

        assert!(matches!(
            parse_pixel("10 20 g"),
            Err(FinderError::InvalidPointer(_))
        ));
        assert!(parse_pixel("10").is_err());
    }
}
