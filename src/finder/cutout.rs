use serde::Deserialize;

use crate::coords::SkyPosition;

/// Survey image service settings.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct CutoutSettings {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default = "default_survey")]
    pub survey: String,
    /// Field of view across the cutout, degrees
    #[serde(default = "default_fov_deg")]
    pub fov_deg: f64,
    #[serde(default = "default_pixels")]
    pub pixels: u32,
}

fn default_base_url() -> String {
    "https://skyview.gsfc.nasa.gov/cgi-bin/images".to_string()
}

fn default_survey() -> String {
    "digitized sky survey".to_string()
}

fn default_fov_deg() -> f64 {
    1.5
}

fn default_pixels() -> u32 {
    750
}

impl Default for CutoutSettings {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            survey: default_survey(),
            fov_deg: default_fov_deg(),
            pixels: default_pixels(),
        }
    }
}

/// A FITS cutout query against the survey image service.
#[derive(Debug, Clone)]
pub struct CutoutRequest<'a> {
    pub settings: &'a CutoutSettings,
    pub position: SkyPosition,
    pub fov_deg: f64,
    pub pixels: u32,
}

impl<'a> CutoutRequest<'a> {
    pub fn new(settings: &'a CutoutSettings, position: SkyPosition) -> Self {
        Self {
            settings,
            position,
            fov_deg: settings.fov_deg,
            pixels: settings.pixels,
        }
    }

    pub fn url(&self) -> String {
        format!(
            "{}?Survey={}&position={},{}&size={}&pixels={}&Return=FITS",
            self.settings.base_url,
            self.settings.survey.trim().replace(' ', "+"),
            self.position.ra_deg(),
            self.position.dec_deg(),
            self.fov_deg,
            self.pixels,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_url() {
        let settings = CutoutSettings::default();
        let request = CutoutRequest::new(&settings, SkyPosition::new(180.0, -0.5));
        assert_eq!(
            request.url(),
            "https://skyview.gsfc.nasa.gov/cgi-bin/images?Survey=digitized+sky+survey\
             &position=180,-0.5&size=1.5&pixels=750&Return=FITS"
        );
    }

    #[test]
    fn test_overridden_field() {
        let settings = CutoutSettings {
            survey: "2MASS-J".to_string(),
            ..CutoutSettings::default()
        };
        let mut request = CutoutRequest::new(&settings, SkyPosition::new(10.5, 41.25));
        request.fov_deg = 1.0;
        request.pixels = 500;
        assert!(request
            .url()
            .ends_with("Survey=2MASS-J&position=10.5,41.25&size=1&pixels=500&Return=FITS"));
    }
}
