use std::str::FromStr;

use serde::Deserialize;

use crate::coords::SkyPosition;

/// Contact block written once in the document header.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Contact {
    pub user: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub organization: String,
}

impl Default for Contact {
    fn default() -> Self {
        Self {
            user: "holtz".to_string(),
            email: "holtz@nmsu.edu".to_string(),
            organization: "NMSU".to_string(),
        }
    }
}

/// One filter/exposure-time/count entry of a request.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ExposureSpec {
    pub filter: String,
    #[serde(alias = "exptime")]
    pub exposure_time_s: f64,
    #[serde(default = "default_count")]
    pub count: u32,
    #[serde(default, alias = "descrip")]
    pub description: Option<String>,
}

fn default_count() -> u32 {
    1
}

impl ExposureSpec {
    pub fn new(filter: impl Into<String>, exposure_time_s: f64, count: u32) -> Self {
        Self {
            filter: filter.into(),
            exposure_time_s,
            count,
            description: None,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

/// `FILTER,SECONDS,COUNT`, as given on the command line.
impl FromStr for ExposureSpec {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parts: Vec<&str> = s.split(',').map(str::trim).collect();
        match parts.as_slice() {
            [filter, seconds, count] if !filter.is_empty() => Ok(Self::new(
                *filter,
                seconds
                    .parse()
                    .map_err(|_| format!("invalid exposure time: {seconds}"))?,
                count
                    .parse()
                    .map_err(|_| format!("invalid exposure count: {count}"))?,
            )),
            _ => Err(format!("expected FILTER,SECONDS,COUNT: {s}")),
        }
    }
}

/// Scheduling constraints of a request.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct Constraints {
    #[serde(default = "default_airmass_max", alias = "airmax")]
    pub airmass_max: f64,
    #[serde(default = "default_priority")]
    pub priority: i32,
    #[serde(default = "default_monitor")]
    pub monitor: u32,
    #[serde(default = "default_repeat")]
    pub repeat: u32,
    #[serde(default = "default_binning", alias = "bin")]
    pub binning: u32,
}

fn default_airmass_max() -> f64 {
    2.0
}

fn default_priority() -> i32 {
    5
}

fn default_monitor() -> u32 {
    3
}

fn default_repeat() -> u32 {
    1
}

fn default_binning() -> u32 {
    1
}

impl Default for Constraints {
    fn default() -> Self {
        Self {
            airmass_max: default_airmass_max(),
            priority: default_priority(),
            monitor: default_monitor(),
            repeat: default_repeat(),
            binning: default_binning(),
        }
    }
}

/// A normalized observation request, independent of its input format.
#[derive(Debug, Clone, PartialEq)]
pub struct Request {
    pub id: String,
    pub user: String,
    pub project: String,
    /// Request type label
    pub description: String,
    pub position: SkyPosition,
    pub constraints: Constraints,
    pub exposures: Vec<ExposureSpec>,
}
