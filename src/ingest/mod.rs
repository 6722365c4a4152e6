mod catalog;
mod error;
mod flat;
mod structured;
mod utils;

use std::fs::{self, File};
use std::path::{Path, PathBuf};

use log::info;
use serde::Deserialize;

use crate::rtml::{Contact, Document, RenderOptions, Request};

pub use catalog::{read_catalog, CatalogColumns, CatalogOptions};
pub use error::IngestError;
pub use flat::read_flat;
pub use structured::{read_structured, CoordinateValue, ExposureGroup, TargetConfig};

/// Request labels the flat and structured inputs do not carry themselves.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct RequestDefaults {
    #[serde(default = "default_user")]
    pub user: String,
    /// Overrides the per-record type label as project name.
    #[serde(default)]
    pub project: Option<String>,
}

fn default_user() -> String {
    "NMSU".to_string()
}

impl Default for RequestDefaults {
    fn default() -> Self {
        Self {
            user: default_user(),
            project: None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputFormat {
    Flat,
    Catalog,
    Structured,
}

/// `<input-stem>.rtml` next to the input unless an output is given.
pub fn output_path(input: &Path, output: Option<PathBuf>) -> PathBuf {
    output.unwrap_or_else(|| input.with_extension("rtml"))
}

/// Read all requests from `input`. Nothing is returned unless every record
/// converts.
pub fn read_requests(
    input: &Path,
    format: InputFormat,
    defaults: &RequestDefaults,
    catalog: &CatalogOptions,
) -> Result<Vec<Request>, IngestError> {
    let requests = match format {
        InputFormat::Flat => read_flat(File::open(input)?, defaults)?,
        InputFormat::Catalog => read_catalog(File::open(input)?, catalog)?,
        InputFormat::Structured => read_structured(&fs::read_to_string(input)?, defaults)?,
    };
    info!(
        "Read {} requests from {} ({:?})",
        requests.len(),
        input.display(),
        format
    );
    Ok(requests)
}

pub fn write_rtml(
    path: &Path,
    contact: &Contact,
    options: RenderOptions,
    requests: &[Request],
) -> Result<(), IngestError> {
    let mut document = Document::create(path, contact, options)?;
    for request in requests {
        document.append(request)?;
    }
    document.close()?;
    Ok(())
}
