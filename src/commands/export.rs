//! Export command handler.

use crate::commands::Out;
use crate::export::{Exporter, Intent};
use crate::handoff::Handoff;
use crate::model::Expense;
use crate::{Config, Result};
use serde::Serialize;
use tracing::debug;

/// The structured output of an export.
#[derive(Debug, Clone, Eq, PartialEq, Serialize)]
pub struct ExportSummary {
    pub uri: String,
    pub rows: usize,
    pub intent: Intent,
}

/// Reads every expense from the store, writes them to `Expenses.xlsx` in the configured
/// destination and passes the finished file to `handoff`.
///
/// An empty store is not an error: the export then holds only the header row.
///
/// # Errors
/// - Returns an error if the store cannot be read.
/// - Returns an error if the file cannot be written, in which case nothing is handed off.
pub async fn export(config: &Config, handoff: &dyn Handoff) -> Result<Out<ExportSummary>> {
    let records = config.db().list_all().await?;
    export_records(config, &records, handoff).await
}

pub(super) async fn export_records(
    config: &Config,
    records: &[Expense],
    handoff: &dyn Handoff,
) -> Result<Out<ExportSummary>> {
    let destination = config.destination()?;
    debug!(
        "Exporting {} expenses to {}",
        records.len(),
        destination.dir().display()
    );
    let file = Exporter::new().export(records, &destination).await?;
    handoff.hand_off(&file);

    let message = match file.rows() {
        0 => format!("There are no expenses yet, exported the header only to {}", file.uri()),
        1 => format!("Exported 1 expense to {}", file.uri()),
        n => format!("Exported {n} expenses to {}", file.uri()),
    };
    Ok(Out::new(
        message,
        ExportSummary {
            uri: file.uri().to_string(),
            rows: file.rows(),
            intent: file.intent(),
        },
    ))
}
