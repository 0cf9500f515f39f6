//! The boundary to whatever opens or shares files on behalf of the user.

use crate::export::ExportedFileRef;
use tracing::info;

/// Receives finished exports and attachment references.
///
/// Handoff is fire-and-forget: nothing is returned and the caller does not wait for the file to
/// be opened. Attachment references are passed through as stored, without checking that they
/// still resolve.
pub trait Handoff: Send + Sync {
    fn hand_off(&self, file: &ExportedFileRef);

    fn view_attachment(&self, reference: &str);
}

/// A `Handoff` for the command line, which logs the reference for the user to open.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogHandoff;

impl Handoff for LogHandoff {
    fn hand_off(&self, file: &ExportedFileRef) {
        info!(
            "Ready to {} ({}): {}",
            file.intent(),
            file.mime_type(),
            file.uri()
        );
    }

    fn view_attachment(&self, reference: &str) {
        info!("Bill file: {reference}");
    }
}
