use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use askama::Template;
use log::{debug, info, warn};

use crate::rtml::template::{HeaderTemplate, RequestTemplate, FOOTER, RTML_VERSION};
use crate::rtml::{Contact, DocumentError, RenderOptions, Request};

/// An RTML document being written.
///
/// The header is written on open, requests are appended in order and the
/// footer is written on close. Once closed the sink is released and every
/// further operation fails without touching the output.
pub struct Document<W: Write> {
    sink: Option<W>,
    options: RenderOptions,
    appended: usize,
}

impl Document<BufWriter<File>> {
    pub fn create(
        path: &Path,
        contact: &Contact,
        options: RenderOptions,
    ) -> Result<Self, DocumentError> {
        info!("Writing RTML to {}", path.display());
        let file = File::create(path)?;
        Self::open(BufWriter::new(file), contact, options)
    }
}

impl<W: Write> Document<W> {
    pub fn open(
        mut sink: W,
        contact: &Contact,
        options: RenderOptions,
    ) -> Result<Self, DocumentError> {
        let header = HeaderTemplate {
            version: RTML_VERSION,
            contact,
        }
        .render()?;
        writeln!(sink, "{}", header)?;

        Ok(Self {
            sink: Some(sink),
            options,
            appended: 0,
        })
    }

    pub fn append(&mut self, request: &Request) -> Result<(), DocumentError> {
        let sink = self
            .sink
            .as_mut()
            .ok_or(DocumentError::InvalidDocumentState("append to"))?;

        // Render fully before writing so a failure leaves no partial request.
        let rendered = RequestTemplate::new(request, &self.options).render()?;
        writeln!(sink, "{}", rendered)?;

        self.appended += 1;
        debug!(
            "Appended request {} ({} exposures, priority {})",
            request.id,
            request.exposures.len(),
            request.constraints.priority
        );
        Ok(())
    }

    /// Write the footer, flush, and hand back the sink.
    pub fn close(&mut self) -> Result<W, DocumentError> {
        let mut sink = self
            .sink
            .take()
            .ok_or(DocumentError::InvalidDocumentState("close"))?;

        writeln!(sink, "{}", FOOTER)?;
        sink.flush()?;
        info!("Closed RTML document with {} requests", self.appended);
        Ok(sink)
    }

    pub fn is_open(&self) -> bool {
        self.sink.is_some()
    }

    pub fn appended(&self) -> usize {
        self.appended
    }
}

impl<W: Write> Drop for Document<W> {
    fn drop(&mut self) {
        if self.sink.is_some() {
            warn!(
                "RTML document dropped while open; footer not written after {} requests",
                self.appended
            );
        }
    }
}
