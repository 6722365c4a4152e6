//! One target per CSV line:
//!
//! ```text
//! target,rah,ram,ras,decd,decm,decs,type,priority,monitor,airmax,repeat,bin,nrep,{filter,exptime,count}*
//! ```
//!
//! The exposure triples are repeated `nrep` times, in order.

use std::io::Read;

use csv::{ReaderBuilder, StringRecord, Trim};
use log::debug;

use crate::coords::{AngleUnit, Sexagesimal, SkyPosition};
use crate::ingest::utils::{parse_field, record_label, trimmed_fields};
use crate::ingest::{IngestError, RequestDefaults};
use crate::rtml::{Constraints, ExposureSpec, Request};

const FIXED_FIELDS: usize = 14;

pub fn read_flat<R: Read>(
    reader: R,
    defaults: &RequestDefaults,
) -> Result<Vec<Request>, IngestError> {
    let mut csv = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .comment(Some(b'#'))
        .trim(Trim::All)
        .from_reader(reader);

    let mut requests = Vec::new();
    for record in csv.records() {
        let record = record?;
        if record.iter().all(|f| f.is_empty()) {
            continue;
        }
        requests.push(parse_record(&record, defaults)?);
    }
    Ok(requests)
}

fn parse_record(record: &StringRecord, defaults: &RequestDefaults) -> Result<Request, IngestError> {
    let label = record_label(record);
    let fields = trimmed_fields(record);

    if fields.len() < FIXED_FIELDS {
        return Err(IngestError::shape(
            &label,
            format!(
                "expected at least {} fields, found {}",
                FIXED_FIELDS,
                fields.len()
            ),
        ));
    }

    let target = fields[0];
    if target.is_empty() {
        return Err(IngestError::shape(&label, "empty target name"));
    }

    let coord_err = |source| IngestError::Coord {
        record: label.clone(),
        source,
    };
    let ra = Sexagesimal::from_fields(fields[1], fields[2], fields[3], AngleUnit::Hours)
        .map_err(coord_err)?;
    let dec = Sexagesimal::from_fields(fields[4], fields[5], fields[6], AngleUnit::Degrees)
        .map_err(coord_err)?;

    let kind = fields[7];
    let constraints = Constraints {
        priority: parse_field(&label, "priority", fields[8])?,
        monitor: parse_field(&label, "monitor", fields[9])?,
        airmass_max: parse_field(&label, "airmax", fields[10])?,
        repeat: parse_field(&label, "repeat", fields[11])?,
        binning: parse_field(&label, "bin", fields[12])?,
    };
    let exposure_repeat: usize = parse_field(&label, "exposure repeat count", fields[13])?;
    if exposure_repeat == 0 {
        return Err(IngestError::shape(&label, "exposure repeat count must be at least 1"));
    }

    let triples = &fields[FIXED_FIELDS..];
    if triples.len() % 3 != 0 {
        return Err(IngestError::shape(
            &label,
            format!(
                "{} exposure fields is not a whole number of filter,exptime,count triples",
                triples.len()
            ),
        ));
    }

    let group = triples
        .chunks(3)
        .map(|t| {
            Ok(ExposureSpec::new(
                t[0],
                parse_field(&label, "exptime", t[1])?,
                parse_field(&label, "count", t[2])?,
            ))
        })
        .collect::<Result<Vec<_>, IngestError>>()?;

    let exposures: Vec<ExposureSpec> = (0..exposure_repeat)
        .flat_map(|_| group.iter().cloned())
        .collect();

    debug!("{}: {} with {} exposures", label, target, exposures.len());

    Ok(Request {
        id: target.to_string(),
        user: defaults.user.clone(),
        project: defaults
            .project
            .clone()
            .unwrap_or_else(|| kind.to_string()),
        description: kind.to_string(),
        position: SkyPosition::from_sexagesimal(&ra, &dec),
        constraints,
        exposures,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::coords::CoordError;
    use approx::*;
    use indoc::indoc;

    fn defaults() -> RequestDefaults {
        RequestDefaults {
            user: "NMSU".to_string(),
            project: None,
        }
    }

    #[test]
    fn test_reads_targets() {
        let input = indoc! {"
            # target,rah,ram,ras,decd,decm,decs,type,priority,monitor,airmax,repeat,bin,nrep,...
            Jupiter,12,0,0,-0,30,0,planet,5,3,2.5,3,1,1,V,10,1,R,5,2
            Saturn, 20,41,3.2, 18,58,20, planet, 4, 0, 2, 1, 2, 2, B,30,1
        "};

        let requests = read_flat(input.as_bytes(), &defaults()).unwrap();
        assert_eq!(requests.len(), 2);

        let jupiter = &requests[0];
        assert_eq!(jupiter.id, "Jupiter");
        assert_eq!(jupiter.user, "NMSU");
        assert_eq!(jupiter.project, "planet");
        assert_eq!(jupiter.description, "planet");
        assert_eq!(jupiter.position.ra_deg(), 180.0);
        assert_eq!(jupiter.position.dec_deg(), -0.5);
        assert_eq!(
            jupiter.constraints,
            Constraints {
                airmass_max: 2.5,
                priority: 5,
                monitor: 3,
                repeat: 3,
                binning: 1,
            }
        );
        assert_eq!(
            jupiter.exposures,
            vec![ExposureSpec::new("V", 10.0, 1), ExposureSpec::new("R", 5.0, 2)]
        );

        let saturn = &requests[1];
        assert_abs_diff_eq!(
            saturn.position.dec_deg(),
            18.0 + 58.0 / 60.0 + 20.0 / 3600.0,
            epsilon = 1e-12
        );
        assert_eq!(saturn.constraints.binning, 2);
        assert_eq!(
            saturn.exposures,
            vec![ExposureSpec::new("B", 30.0, 1), ExposureSpec::new("B", 30.0, 1)]
        );
    }

    #[test]
    fn test_project_override_and_trailing_comma() {
        let defaults = RequestDefaults {
            user: "NMSU".to_string(),
            project: Some("Planets".to_string()),
        };
        let input = "Mars,1,2,3,4,5,6,planet,1,0,2,1,1,1,V,1,1,\n";
        let requests = read_flat(input.as_bytes(), &defaults).unwrap();
        assert_eq!(requests[0].project, "Planets");
        assert_eq!(requests[0].exposures.len(), 1);
    }

    #[test]
    fn test_short_record() {
        let input = "Mars,1,2,3,4,5,6,planet,1,0,2,1,1\n";
        let err = read_flat(input.as_bytes(), &defaults()).unwrap_err();
        assert!(matches!(err, IngestError::RecordShapeMismatch { .. }), "{err}");
        assert!(err.to_string().starts_with("line 1:"));
    }

    #[test]
    fn test_partial_triple() {
        let input = "Mars,1,2,3,4,5,6,planet,1,0,2,1,1,1,V,1\n";
        assert!(matches!(
            read_flat(input.as_bytes(), &defaults()),
            Err(IngestError::RecordShapeMismatch { .. })
        ));
    }

    #[test]
    fn test_zero_exposure_repeat() {
        let input = "Mars,1,2,3,4,5,6,planet,1,0,2,1,1,0,V,1,1\n";
        assert!(matches!(
            read_flat(input.as_bytes(), &defaults()),
            Err(IngestError::RecordShapeMismatch { .. })
        ));
    }

    #[test]
    fn test_bad_numbers_are_fatal() {
        let input = "Mars,1,2,3,4,5,6,planet,high,0,2,1,1,1,V,1,1\n";
        assert!(matches!(
            read_flat(input.as_bytes(), &defaults()),
            Err(IngestError::Field {
                field: "priority",
                ..
            })
        ));

        let input = "Mars,1,x,3,4,5,6,planet,1,0,2,1,1,1,V,1,1\n";
        assert!(matches!(
            read_flat(input.as_bytes(), &defaults()),
            Err(IngestError::Coord {
                source: CoordError::InvalidCoordinateFormat(_),
                ..
            })
        ));
    }
}
