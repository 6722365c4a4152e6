//! Delimited target catalogs where every record shares one request
//! configuration; only the name and coordinates vary per record.

use std::io::Read;

use csv::{ReaderBuilder, StringRecord, Trim};
use serde::Deserialize;

use crate::coords::{AngleUnit, Sexagesimal, SkyPosition};
use crate::ingest::utils::{record_label, trimmed_fields};
use crate::ingest::IngestError;
use crate::rtml::{Constraints, ExposureSpec, Request};

/// 1-based column numbers of the catalog fields.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct CatalogColumns {
    pub name: usize,
    /// `h m s`
    pub ra: usize,
    /// `d m s`
    pub dec: usize,
}

impl Default for CatalogColumns {
    fn default() -> Self {
        Self {
            name: 2,
            ra: 3,
            dec: 4,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct CatalogOptions {
    #[serde(default = "default_label")]
    pub user: String,
    #[serde(default = "default_label")]
    pub project: String,
    #[serde(default = "default_label", rename = "type")]
    pub description: String,
    #[serde(default = "default_constraints")]
    pub constraints: Constraints,
    #[serde(default = "default_exposures")]
    pub exposures: Vec<ExposureSpec>,
    #[serde(default = "default_delimiter")]
    pub delimiter: char,
    #[serde(default)]
    pub columns: CatalogColumns,
}

fn default_label() -> String {
    "test".to_string()
}

fn default_constraints() -> Constraints {
    Constraints {
        monitor: 0,
        ..Constraints::default()
    }
}

fn default_exposures() -> Vec<ExposureSpec> {
    vec![
        ExposureSpec::new("V", 300.0, 1),
        ExposureSpec::new("I", 300.0, 1),
    ]
}

fn default_delimiter() -> char {
    '|'
}

impl Default for CatalogOptions {
    fn default() -> Self {
        Self {
            user: default_label(),
            project: default_label(),
            description: default_label(),
            constraints: default_constraints(),
            exposures: default_exposures(),
            delimiter: default_delimiter(),
            columns: CatalogColumns::default(),
        }
    }
}

pub fn read_catalog<R: Read>(
    reader: R,
    options: &CatalogOptions,
) -> Result<Vec<Request>, IngestError> {
    if !options.delimiter.is_ascii() {
        return Err(IngestError::InvalidOption(format!(
            "catalog delimiter must be ASCII, got '{}'",
            options.delimiter
        )));
    }
    let columns = options.columns;
    if [columns.name, columns.ra, columns.dec].contains(&0) {
        return Err(IngestError::InvalidOption(
            "catalog columns are numbered from 1".to_string(),
        ));
    }

    let mut csv = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .comment(Some(b'#'))
        .trim(Trim::All)
        .delimiter(options.delimiter as u8)
        .from_reader(reader);

    let mut requests = Vec::new();
    for record in csv.records() {
        let record = record?;
        if record.iter().all(|f| f.is_empty()) {
            continue;
        }
        requests.push(parse_record(&record, options)?);
    }
    Ok(requests)
}

fn parse_record(record: &StringRecord, options: &CatalogOptions) -> Result<Request, IngestError> {
    let label = record_label(record);
    let fields = trimmed_fields(record);
    let columns = options.columns;

    let column = |n: usize, what: &str| {
        fields
            .get(n - 1)
            .copied()
            .filter(|f| !f.is_empty())
            .ok_or_else(|| IngestError::shape(&label, format!("missing {} in column {}", what, n)))
    };

    let name = column(columns.name, "name")?;
    let ra = sexagesimal(&label, column(columns.ra, "RA")?, AngleUnit::Hours)?;
    let dec = sexagesimal(&label, column(columns.dec, "DEC")?, AngleUnit::Degrees)?;

    Ok(Request {
        id: name.to_string(),
        user: options.user.clone(),
        project: options.project.clone(),
        description: options.description.clone(),
        position: SkyPosition::from_sexagesimal(&ra, &dec),
        constraints: options.constraints,
        exposures: options.exposures.clone(),
    })
}

fn sexagesimal(label: &str, text: &str, unit: AngleUnit) -> Result<Sexagesimal, IngestError> {
    match text.split_whitespace().collect::<Vec<_>>().as_slice() {
        [whole, minutes, seconds] => {
            Sexagesimal::from_fields(whole, minutes, seconds, unit).map_err(|source| {
                IngestError::Coord {
                    record: label.to_string(),
                    source,
                }
            })
        }
        _ => Err(IngestError::shape(
            label,
            format!("expected three space-separated fields, got '{}'", text),
        )),
    }
}
