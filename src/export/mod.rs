//! The tabular exporter: turns the full list of expenses into `Expenses.xlsx` and produces the
//! reference that is handed to the external open/share surface.

mod destination;
mod sheet;
mod sink;

pub use destination::{Destination, DestinationPolicy, Intent, FILE_NAME};
pub use sheet::{HEADER, SHEET_NAME};
pub use sink::{DiskSink, Sink};

use crate::error::ExportFault;
use crate::model::Expense;
use std::sync::Arc;
use tracing::debug;
use url::Url;

/// The MIME type of the exported document.
pub const XLSX_MIME_TYPE: &str = "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet";

/// A read-only reference to a finished export.
///
/// It carries a `file://` URI and nothing that would let the receiver write to the file or
/// reach anything else on the filesystem.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct ExportedFileRef {
    uri: Url,
    intent: Intent,
    rows: usize,
}

impl ExportedFileRef {
    pub fn uri(&self) -> &Url {
        &self.uri
    }

    pub fn mime_type(&self) -> &'static str {
        XLSX_MIME_TYPE
    }

    pub fn intent(&self) -> Intent {
        self.intent
    }

    /// The number of data rows, not counting the header. Zero is a valid export.
    pub fn rows(&self) -> usize {
        self.rows
    }
}

/// Writes expense exports.
///
/// The only state is the `Sink` used for the final write, which is replaceable so that write
/// failures can be exercised.
#[derive(Debug, Clone)]
pub struct Exporter {
    sink: Arc<dyn Sink>,
}

impl Default for Exporter {
    fn default() -> Self {
        Self::new()
    }
}

impl Exporter {
    pub fn new() -> Self {
        Self::with_sink(DiskSink)
    }

    pub fn with_sink(sink: impl Sink + 'static) -> Self {
        Self {
            sink: Arc::new(sink),
        }
    }

    /// Writes `records`, in the given order, to `Expenses.xlsx` in the destination directory,
    /// creating the directory if needed and replacing any previous export.
    ///
    /// On error the destination holds whatever it held before the call.
    pub async fn export(
        &self,
        records: &[Expense],
        destination: &Destination,
    ) -> Result<ExportedFileRef, ExportFault> {
        let owned = records.to_vec();
        let bytes = tokio::task::spawn_blocking(move || sheet::render(&owned))
            .await
            .map_err(|e| ExportFault::Serialize(format!("the render task failed: {e}")))??;

        let dir = destination.dir();
        tokio::fs::create_dir_all(dir)
            .await
            .map_err(|source| ExportFault::CreateDir {
                path: dir.to_path_buf(),
                source,
            })?;
        let dir = tokio::fs::canonicalize(dir)
            .await
            .map_err(|source| ExportFault::CreateDir {
                path: dir.to_path_buf(),
                source,
            })?;

        let target = dir.join(FILE_NAME);
        sink::replace(self.sink.as_ref(), &target, &bytes).await?;
        debug!(
            "Exported {} expenses ({} bytes) to {}",
            records.len(),
            bytes.len(),
            target.display()
        );

        // Unreachable for a canonical `target`; from_file_path only rejects relative paths.
        let uri = Url::from_file_path(&target).map_err(|_| ExportFault::Reference(target))?;
        Ok(ExportedFileRef {
            uri,
            intent: destination.intent(),
            rows: records.len(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Amount, NewExpense, RecordId};
    use crate::test::read_sheet;
    use async_trait::async_trait;
    use calamine::Data;
    use std::io;
    use std::path::Path;
    use tempfile::TempDir;

    fn record(id: i64, title: &str, amount: &str) -> Expense {
        Expense::new(
            RecordId::new(id),
            NewExpense {
                title: title.to_string(),
                amount: Amount::parse_or_zero(amount),
                price: Amount::parse_or_zero(amount),
                date: format!("{id}/6/2024"),
                ..NewExpense::default()
            },
        )
    }

    /// Writes half of the document and then fails, like a disk filling up mid-write.
    #[derive(Debug)]
    struct FailingSink;

    #[async_trait]
    impl Sink for FailingSink {
        async fn write_new(&self, path: &Path, bytes: &[u8]) -> io::Result<()> {
            tokio::fs::write(path, &bytes[..bytes.len() / 2]).await?;
            Err(io::Error::other("no space left on device"))
        }
    }

    async fn dir_entries(dir: &Path) -> Vec<String> {
        let mut names = Vec::new();
        let mut entries = tokio::fs::read_dir(dir).await.unwrap();
        while let Some(entry) = entries.next_entry().await.unwrap() {
            names.push(entry.file_name().to_string_lossy().to_string());
        }
        names.sort();
        names
    }

    async fn read_rows(path: &Path) -> Vec<Vec<Data>> {
        read_sheet(&tokio::fs::read(path).await.unwrap()).1
    }

    #[tokio::test]
    async fn test_export_creates_directory_and_file() {
        let temp = TempDir::new().unwrap();
        let destination = Destination::new(temp.path().join("a").join("exports"), Intent::Share);

        let file = Exporter::new()
            .export(&[record(1, "Lunch", "250.0")], &destination)
            .await
            .unwrap();

        assert!(destination.file_path().is_file());
        assert_eq!(file.rows(), 1);
        assert_eq!(file.intent(), Intent::Share);
        assert_eq!(file.mime_type(), XLSX_MIME_TYPE);
        assert_eq!(file.uri().scheme(), "file");
        assert!(file.uri().path().ends_with("/exports/Expenses.xlsx"));
    }

    #[tokio::test]
    async fn test_export_of_nothing_is_header_only() {
        let temp = TempDir::new().unwrap();
        let destination = Destination::new(temp.path(), Intent::View);

        let file = Exporter::new().export(&[], &destination).await.unwrap();

        assert_eq!(file.rows(), 0);
        let rows = read_rows(&destination.file_path()).await;
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0][0], Data::String("ID".to_string()));
    }

    #[tokio::test]
    async fn test_second_export_replaces_the_first() {
        let temp = TempDir::new().unwrap();
        let destination = Destination::new(temp.path(), Intent::Share);
        let exporter = Exporter::new();

        exporter
            .export(&[record(1, "a", "1"), record(2, "b", "2")], &destination)
            .await
            .unwrap();
        exporter
            .export(&[record(3, "c", "3")], &destination)
            .await
            .unwrap();

        assert_eq!(dir_entries(temp.path()).await, vec![FILE_NAME.to_string()]);
        let rows = read_rows(&destination.file_path()).await;
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[1][0], Data::Float(3.0));
        assert_eq!(rows[1][1], Data::String("c".to_string()));
    }

    #[tokio::test]
    async fn test_failed_write_keeps_previous_export() {
        let temp = TempDir::new().unwrap();
        let destination = Destination::new(temp.path(), Intent::Share);
        Exporter::new()
            .export(&[record(1, "kept", "10")], &destination)
            .await
            .unwrap();
        let before = tokio::fs::read(destination.file_path()).await.unwrap();

        let result = Exporter::with_sink(FailingSink)
            .export(&[record(1, "kept", "10"), record(2, "lost", "20")], &destination)
            .await;

        assert!(matches!(result, Err(ExportFault::Write { .. })));
        assert_eq!(dir_entries(temp.path()).await, vec![FILE_NAME.to_string()]);
        let after = tokio::fs::read(destination.file_path()).await.unwrap();
        assert_eq!(before, after);
    }

    #[tokio::test]
    async fn test_failed_first_write_leaves_nothing() {
        let temp = TempDir::new().unwrap();
        let destination = Destination::new(temp.path(), Intent::Share);

        let result = Exporter::with_sink(FailingSink)
            .export(&[record(1, "x", "1")], &destination)
            .await;

        assert!(matches!(result, Err(ExportFault::Write { .. })));
        assert!(dir_entries(temp.path()).await.is_empty());
    }

    #[tokio::test]
    async fn test_uncreatable_directory_is_a_create_dir_fault() {
        let temp = TempDir::new().unwrap();
        let blocker = temp.path().join("file");
        tokio::fs::write(&blocker, "not a directory").await.unwrap();
        let destination = Destination::new(blocker.join("exports"), Intent::View);

        let result = Exporter::new().export(&[], &destination).await;

        assert!(matches!(result, Err(ExportFault::CreateDir { .. })));
    }
}
