use std::fmt;

use log::warn;
use serde::Serialize;

use crate::coords::{AngleUnit, CoordError, Sexagesimal};

/// A position on the sky in decimal degrees.
///
/// Values outside RA [0, 360) or DEC [-90, 90] are kept as given; they are
/// never wrapped or clamped.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SkyPosition {
    ra_deg: f64,
    dec_deg: f64,
}

impl SkyPosition {
    pub fn new(ra_deg: f64, dec_deg: f64) -> Self {
        if !(0.0..360.0).contains(&ra_deg) || !(-90.0..=90.0).contains(&dec_deg) {
            warn!(
                "Sky position out of range (ra={}, dec={}); passing through unchanged",
                ra_deg, dec_deg
            );
        }
        Self { ra_deg, dec_deg }
    }

    pub fn from_sexagesimal(ra: &Sexagesimal, dec: &Sexagesimal) -> Self {
        Self::new(
            ra.to_degrees(AngleUnit::Hours),
            dec.to_degrees(AngleUnit::Degrees),
        )
    }

    /// Parse an `hr:min:sec` RA string and a `deg:min:sec` DEC string.
    pub fn parse(ra: &str, dec: &str) -> Result<Self, CoordError> {
        let ra = Sexagesimal::parse(ra, AngleUnit::Hours)?;
        let dec = Sexagesimal::parse(dec, AngleUnit::Degrees)?;
        Ok(Self::from_sexagesimal(&ra, &dec))
    }

    pub fn ra_deg(&self) -> f64 {
        self.ra_deg
    }

    pub fn dec_deg(&self) -> f64 {
        self.dec_deg
    }

    pub fn ra_hms(&self) -> Sexagesimal {
        Sexagesimal::from_degrees(self.ra_deg, AngleUnit::Hours)
    }

    pub fn dec_dms(&self) -> Sexagesimal {
        Sexagesimal::from_degrees(self.dec_deg, AngleUnit::Degrees)
    }
}

impl fmt::Display for SkyPosition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {}",
            self.ra_hms().format(AngleUnit::Hours),
            self.dec_dms().format(AngleUnit::Degrees)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::*;

    #[test]
    fn test_parse_position() {
        let pos = SkyPosition::parse("00:42:44.3", "+41:16:09").unwrap();
        assert_abs_diff_eq!(pos.ra_deg(), 10.684583333333334, epsilon = 1e-9);
        assert_abs_diff_eq!(pos.dec_deg(), 41.26916666666667, epsilon = 1e-9);
        assert_eq!(pos.to_string(), "00h42m44.30s 41d16m09.00s");
    }

    #[test]
    fn test_out_of_range_is_not_wrapped() {
        let pos = SkyPosition::new(370.0, -95.0);
        assert_eq!(pos.ra_deg(), 370.0);
        assert_eq!(pos.dec_deg(), -95.0);
    }

    #[test]
    fn test_bad_dec_propagates() {
        assert!(SkyPosition::parse("12:00:00", "-1O:00:00").is_err());
    }
}
