//! YAML target files with exposure groups and repeated visits.
//!
//! ```yaml
//! target: M31
//! ra: "00:42:44.3"
//! dec: "+41:16:09"
//! type: galaxy
//! priority: 5
//! obsrepeat: [2, 1]
//! expgroup:
//!   - exposures:
//!       - {filter: V, exptime: 300, count: 1}
//!   - exposures:
//!       - {filter: R, exptime: 120, count: 2, descrip: "#nopreview"}
//! ```
//!
//! Several targets may share one file as separate YAML documents.

use log::debug;
use serde::Deserialize;

use crate::coords::{AngleUnit, Sexagesimal, SkyPosition};
use crate::ingest::{IngestError, RequestDefaults};
use crate::rtml::{Constraints, ExposureSpec, Request};

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum CoordinateValue {
    Degrees(f64),
    Sexagesimal(String),
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ExposureGroup {
    pub exposures: Vec<ExposureSpec>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TargetConfig {
    pub target: String,
    pub ra: CoordinateValue,
    pub dec: CoordinateValue,
    #[serde(rename = "type", default = "default_type")]
    pub kind: String,
    #[serde(default)]
    pub user: Option<String>,
    #[serde(default)]
    pub project: Option<String>,
    #[serde(default = "default_monitor")]
    pub monitor: u32,
    #[serde(default = "default_airmax")]
    pub airmax: f64,
    #[serde(default = "default_priority")]
    pub priority: i32,
    #[serde(default = "default_one")]
    pub bin: u32,
    #[serde(default = "default_one")]
    pub repeat: u32,
    pub obsrepeat: Vec<u32>,
    pub expgroup: Vec<ExposureGroup>,
}

fn default_type() -> String {
    "test".to_string()
}

fn default_monitor() -> u32 {
    Constraints::default().monitor
}

fn default_airmax() -> f64 {
    Constraints::default().airmass_max
}

fn default_priority() -> i32 {
    Constraints::default().priority
}

fn default_one() -> u32 {
    1
}

impl TargetConfig {
    pub fn position(&self) -> Result<SkyPosition, IngestError> {
        let ra = resolve(&self.target, &self.ra, AngleUnit::Hours)?;
        let dec = resolve(&self.target, &self.dec, AngleUnit::Degrees)?;
        Ok(SkyPosition::new(ra, dec))
    }

    /// Flattened exposure sequence for one visit: group 0 once, then every
    /// later group `repeat` times.
    pub fn exposures_for(&self, repeat: u32) -> Vec<ExposureSpec> {
        let mut groups = self.expgroup.iter();
        let mut exposures: Vec<ExposureSpec> = groups
            .next()
            .map(|g| g.exposures.clone())
            .unwrap_or_default();

        let rest: Vec<&ExposureSpec> = groups.flat_map(|g| g.exposures.iter()).collect();
        for _ in 0..repeat {
            exposures.extend(rest.iter().map(|&e| e.clone()));
        }
        exposures
    }

    /// One request per `obsrepeat` entry, each one priority step below the
    /// previous.
    pub fn requests(&self, defaults: &RequestDefaults) -> Result<Vec<Request>, IngestError> {
        if self.expgroup.is_empty() {
            return Err(IngestError::shape(&self.target, "expgroup is empty"));
        }
        if self.obsrepeat.is_empty() {
            return Err(IngestError::shape(&self.target, "obsrepeat is empty"));
        }

        let position = self.position()?;
        let user = self.user.clone().unwrap_or_else(|| defaults.user.clone());
        let project = self
            .project
            .clone()
            .or_else(|| defaults.project.clone())
            .unwrap_or_else(|| self.kind.clone());

        let mut requests = Vec::with_capacity(self.obsrepeat.len());
        for (visit, &repeat) in self.obsrepeat.iter().enumerate() {
            let priority = i32::try_from(visit)
                .ok()
                .and_then(|step| self.priority.checked_sub(step))
                .ok_or_else(|| {
                    IngestError::shape(
                        &self.target,
                        format!("priority {} underflows at visit {}", self.priority, visit + 1),
                    )
                })?;

            requests.push(Request {
                id: self.target.clone(),
                user: user.clone(),
                project: project.clone(),
                description: self.kind.clone(),
                position,
                constraints: Constraints {
                    airmass_max: self.airmax,
                    priority,
                    monitor: self.monitor,
                    repeat: self.repeat,
                    binning: self.bin,
                },
                exposures: self.exposures_for(repeat),
            });
        }

        debug!("{}: expanded into {} requests", self.target, requests.len());
        Ok(requests)
    }
}

fn resolve(target: &str, value: &CoordinateValue, unit: AngleUnit) -> Result<f64, IngestError> {
    match value {
        CoordinateValue::Degrees(deg) => Ok(*deg),
        CoordinateValue::Sexagesimal(text) => Sexagesimal::parse(text, unit)
            .map(|s| s.to_degrees(unit))
            .map_err(|source| IngestError::Coord {
                record: target.to_string(),
                source,
            }),
    }
}

/// Read every target document in a YAML stream and expand them in order.
/// Empty documents, such as the one after a trailing `---`, are skipped; a
/// stream without any target yields no requests.
pub fn read_structured(yaml: &str, defaults: &RequestDefaults) -> Result<Vec<Request>, IngestError> {
    let mut requests = Vec::new();
    for document in serde_yaml::Deserializer::from_str(yaml) {
        if let Some(target) = Option::<TargetConfig>::deserialize(document)? {
            requests.extend(target.requests(defaults)?);
        }
    }
    Ok(requests)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::*;
    use indoc::indoc;

    fn defaults() -> RequestDefaults {
        RequestDefaults {
            user: "NMSU".to_string(),
            project: None,
        }
    }

    const M31: &str = indoc! {r##"
        target: M31
        ra: "00:42:44.3"
        dec: "+41:16:09"
        type: galaxy
        monitor: 1
        airmax: 1.8
        priority: 5
        bin: 2
        repeat: 1
        obsrepeat: [2]
        expgroup:
          - exposures:
              - {filter: V, exptime: 300, count: 1, descrip: "#nopreview"}
          - exposures:
              - {filter: R, exptime: 120, count: 2}
    "##};

    #[test]
    fn test_expansion() {
        let requests = read_structured(M31, &defaults()).unwrap();
        assert_eq!(requests.len(), 1);

        let r = &requests[0];
        let filters: Vec<_> = r.exposures.iter().map(|e| e.filter.as_str()).collect();
        assert_eq!(filters, ["V", "R", "R"]);
        assert_eq!(r.exposures[0].description.as_deref(), Some("#nopreview"));
        assert_eq!(r.constraints.priority, 5);
        assert_eq!(r.constraints.binning, 2);
        assert_eq!(r.constraints.monitor, 1);
        assert_abs_diff_eq!(r.constraints.airmass_max, 1.8);
        assert_eq!(r.project, "galaxy");
        assert_abs_diff_eq!(r.position.ra_deg(), 10.684583333333334, epsilon = 1e-9);
    }

    #[test]
    fn test_priority_decreases_per_visit() {
        let yaml = M31.replace("obsrepeat: [2]", "obsrepeat: [2, 1, 0]");
        let requests = read_structured(&yaml, &defaults()).unwrap();

        let priorities: Vec<_> = requests.iter().map(|r| r.constraints.priority).collect();
        assert_eq!(priorities, [5, 4, 3]);

        let lengths: Vec<_> = requests.iter().map(|r| r.exposures.len()).collect();
        assert_eq!(lengths, [3, 2, 1]);
    }

    #[test]
    fn test_multiple_documents_and_decimal_coordinates() {
        let yaml = indoc! {"
            target: A
            ra: 180.0
            dec: -0.5
            obsrepeat: [1]
            expgroup:
              - exposures: [{filter: V, exptime: 10}]
            ---
            target: B
            ra: '12:00:00'
            dec: '-00:30:00'
            user: someone
            obsrepeat: [1]
            expgroup:
              - exposures: [{filter: I, exptime: 20}]
        "};
        let requests = read_structured(yaml, &defaults()).unwrap();
        assert_eq!(requests.len(), 2);
        assert_eq!(requests[0].position, requests[1].position);
        assert_eq!(requests[0].user, "NMSU");
        assert_eq!(requests[1].user, "someone");
        assert_eq!(requests[0].constraints, Constraints::default());
    }

    #[test]
    fn test_empty_groups() {
        let yaml = indoc! {"
            target: A
            ra: 1.0
            dec: 1.0
            obsrepeat: [1]
            expgroup: []
        "};
        assert!(matches!(
            read_structured(yaml, &defaults()),
            Err(IngestError::RecordShapeMismatch { .. })
        ));

        let yaml = yaml.replace("obsrepeat: [1]", "obsrepeat: []").replace(
            "expgroup: []",
            "expgroup: [{exposures: []}]",
        );
        assert!(matches!(
            read_structured(&yaml, &defaults()),
            Err(IngestError::RecordShapeMismatch { .. })
        ));
    }

    #[test]
    fn test_trailing_separator_and_empty_streams() {
        let yaml = format!("{M31}---\n");
        assert_eq!(read_structured(&yaml, &defaults()).unwrap().len(), 1);

        let yaml = format!("---\n{M31}---\n# done\n");
        assert_eq!(read_structured(&yaml, &defaults()).unwrap().len(), 1);

        assert!(read_structured("", &defaults()).unwrap().is_empty());
        assert!(read_structured("# nothing\n", &defaults()).unwrap().is_empty());
    }

    #[test]
    fn test_priority_underflow() {
        let yaml = M31
            .replace("priority: 5", "priority: -2147483648")
            .replace("obsrepeat: [2]", "obsrepeat: [1, 1]");
        assert!(matches!(
            read_structured(&yaml, &defaults()),
            Err(IngestError::RecordShapeMismatch { .. })
        ));

        let yaml = yaml.replace("obsrepeat: [1, 1]", "obsrepeat: [1]");
        let requests = read_structured(&yaml, &defaults()).unwrap();
        assert_eq!(requests[0].constraints.priority, i32::MIN);
    }

    #[test]
    fn test_bad_coordinate() {
        let yaml = M31.replace("+41:16:09", "+41:1x:09");
        assert!(matches!(
            read_structured(&yaml, &defaults()),
            Err(IngestError::Coord { .. })
        ));
    }

    #[test]
    fn test_unknown_key() {
        let yaml = M31.replace("bin: 2", "binning_factor: 2");
        assert!(matches!(
            read_structured(&yaml, &defaults()),
            Err(IngestError::Yaml(_))
        ));
    }
}
