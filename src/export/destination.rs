use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// The fixed name of the exported file. Each export replaces the previous one.
pub const FILE_NAME: &str = "Expenses.xlsx";

/// Which file area an export is written to.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    Eq,
    PartialEq,
    Hash,
    Serialize,
    Deserialize,
    clap::ValueEnum,
)]
#[serde(rename_all = "snake_case")]
pub enum DestinationPolicy {
    /// An `exports` directory inside the application's data directory. The export is handed
    /// off for sharing.
    #[default]
    Private,
    /// The user's public downloads directory. The export is handed off for viewing.
    Downloads,
}

serde_plain::derive_display_from_serialize!(DestinationPolicy);
serde_plain::derive_fromstr_from_deserialize!(DestinationPolicy);

impl DestinationPolicy {
    pub fn intent(&self) -> Intent {
        match self {
            DestinationPolicy::Private => Intent::Share,
            DestinationPolicy::Downloads => Intent::View,
        }
    }
}

/// What the external surface is asked to do with an exported file.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Intent {
    View,
    Share,
}

serde_plain::derive_display_from_serialize!(Intent);

/// A resolved export directory together with the handoff intent that goes with it.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct Destination {
    dir: PathBuf,
    intent: Intent,
}

impl Destination {
    pub fn new(dir: impl Into<PathBuf>, intent: Intent) -> Self {
        Self {
            dir: dir.into(),
            intent,
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn intent(&self) -> Intent {
        self.intent
    }

    /// The path of the exported file, `{dir}/Expenses.xlsx`.
    pub fn file_path(&self) -> PathBuf {
        self.dir.join(FILE_NAME)
    }
}

#[test]
fn test_policy_intent() {
    assert_eq!(DestinationPolicy::Private.intent(), Intent::Share);
    assert_eq!(DestinationPolicy::Downloads.intent(), Intent::View);
}

#[test]
fn test_policy_text() {
    use std::str::FromStr;
    assert_eq!(DestinationPolicy::default().to_string(), "private");
    assert_eq!(
        DestinationPolicy::from_str("downloads").unwrap(),
        DestinationPolicy::Downloads
    );
}
