use serde::Deserialize;
use std::path::Path;
use thiserror::Error;

use crate::finder::{CutoutSettings, InstrumentCalibration};
use crate::ingest::{CatalogOptions, RequestDefaults};
use crate::rtml::{Contact, RenderOptions};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("YAML parse error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub contact: Contact,
    #[serde(default)]
    pub instrument: InstrumentCalibration,
    #[serde(default)]
    pub cutout: CutoutSettings,
    #[serde(default)]
    pub rtml: RenderOptions,
    #[serde(default)]
    pub defaults: RequestDefaults,
    #[serde(default)]
    pub catalog: CatalogOptions,
}

impl Config {
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_str(&content)
    }

    pub fn from_str(yaml: &str) -> Result<Self, ConfigError> {
        let config: Config = serde_yaml::from_str(yaml)?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use indoc::indoc;

    #[test]
    fn test_partial_config() {
        let config = Config::from_str(indoc! {"
            contact:
              user: holtz
              email: holtz@nmsu.edu
              organization: NMSU
            instrument:
              guide_offset: {ra_arcmin: -2.0, dec_arcmin: -16.0}
            rtml:
              decimals: 4
              default_picture_description: '#nopreview '
            catalog:
              project: Messier
              constraints: {priority: 3}
              exposures:
                - {filter: B, exptime: 300, count: 1}
        "})
        .unwrap();

        assert_eq!(config.contact.organization, "NMSU");
        assert_eq!(config.instrument.guide_offset.dec_arcmin, -16.0);
        assert_eq!(config.instrument.science.width_arcmin, 36.8);
        assert_eq!(config.cutout.pixels, 750);
        assert_eq!(config.rtml.decimals, 4);
        assert_eq!(config.catalog.constraints.priority, 3);
        assert_eq!(config.catalog.constraints.airmass_max, 2.0);
        assert_eq!(config.catalog.exposures.len(), 1);
        assert_eq!(config.catalog.delimiter, '|');
        assert_eq!(config.defaults.user, "NMSU");
    }

    #[test]
    fn test_empty_config_is_default() {
        let config = Config::from_str("{}").unwrap();
        assert_eq!(config.rtml, RenderOptions::default());
        assert_eq!(config.instrument, InstrumentCalibration::default());
    }

    #[test]
    fn test_invalid_yaml() {
        assert!(matches!(
            Config::from_str("contact: [1, 2"),
            Err(ConfigError::Yaml(_))
        ));
    }
}
