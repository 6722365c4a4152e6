//! Gnomonic (tangent plane) world coordinate system of a survey cutout.
//!
//! Survey cutouts are TAN projections centered on the requested position with
//! north up and east to the left, so the mapping is fully determined by the
//! requested center, the image center pixel and the plate scale.

use crate::coords::SkyPosition;
use crate::finder::{PixelPoint, ViewportScale};

#[derive(Debug, Clone, Copy)]
pub struct Wcs {
    /// Reference pixel (CRPIX1, CRPIX2)
    crpix: PixelPoint,
    /// Reference sky position in degrees (CRVAL1, CRVAL2)
    crval: (f64, f64),
    /// Pixel offset to intermediate world coordinates, degrees
    cd: [[f64; 2]; 2],
}

impl Wcs {
    pub fn for_cutout(center: SkyPosition, image_center: PixelPoint, scale: ViewportScale) -> Self {
        let deg_per_pixel = scale.arcmin_per_pixel() / 60.0;
        Self {
            crpix: image_center,
            crval: (center.ra_deg(), center.dec_deg()),
            cd: [[-deg_per_pixel, 0.0], [0.0, deg_per_pixel]],
        }
    }

    pub fn pixel_to_sky(&self, pixel: PixelPoint) -> SkyPosition {
        let dx = pixel.x - self.crpix.x;
        let dy = pixel.y - self.crpix.y;

        let xi = (self.cd[0][0] * dx + self.cd[0][1] * dy).to_radians();
        let eta = (self.cd[1][0] * dx + self.cd[1][1] * dy).to_radians();

        let ra0 = self.crval.0.to_radians();
        let (sin_dec0, cos_dec0) = self.crval.1.to_radians().sin_cos();
        let denom = cos_dec0 - eta * sin_dec0;

        let ra = (ra0 + xi.atan2(denom)).to_degrees().rem_euclid(360.0);
        let dec = (sin_dec0 + eta * cos_dec0)
            .atan2((xi * xi + denom * denom).sqrt())
            .to_degrees();

        SkyPosition::new(ra, dec)
    }

    /// Returns `None` for positions on the far side of the tangent plane.
    pub fn sky_to_pixel(&self, position: SkyPosition) -> Option<PixelPoint> {
        let (sin_dec, cos_dec) = position.dec_deg().to_radians().sin_cos();
        let (sin_dec0, cos_dec0) = self.crval.1.to_radians().sin_cos();
        let (sin_dra, cos_dra) = (position.ra_deg() - self.crval.0).to_radians().sin_cos();

        let d = sin_dec * sin_dec0 + cos_dec * cos_dec0 * cos_dra;
        if d <= 0.0 {
            return None;
        }

        let xi = (cos_dec * sin_dra / d).to_degrees();
        let eta = ((sin_dec * cos_dec0 - cos_dec * sin_dec0 * cos_dra) / d).to_degrees();

        // Invert the CD matrix
        let det = self.cd[0][0] * self.cd[1][1] - self.cd[0][1] * self.cd[1][0];
        let dx = (self.cd[1][1] * xi - self.cd[0][1] * eta) / det;
        let dy = (-self.cd[1][0] * xi + self.cd[0][0] * eta) / det;

        Some(PixelPoint::new(self.crpix.x + dx, self.crpix.y + dy))
    }
}
