//! These structs provide the CLI interface for the expenses CLI.

use crate::export::DestinationPolicy;
use crate::model::{Category, RecordId, Status};
use clap::{Parser, Subcommand};
use std::convert::Infallible;
use std::fmt::{Display, Formatter};
use std::ops::Deref;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use tracing::error;
use tracing_subscriber::filter::LevelFilter;

/// expenses: A command-line tool for recording expenses and exporting them to Excel.
///
/// Expenses are stored in a local SQLite database. Every export writes all of them, in the order
/// they were added, to a single `Expenses.xlsx` file which replaces any previous export.
#[derive(Debug, Parser, Clone)]
pub struct Args {
    #[clap(flatten)]
    common: Common,

    #[command(subcommand)]
    command: Command,
}

impl Args {
    pub fn common(&self) -> &Common {
        &self.common
    }

    pub fn command(&self) -> &Command {
        &self.command
    }
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Create the data directory, its configuration file and an empty expense database.
    ///
    /// This is the first command you should run. By default the data directory is
    /// $HOME/expenses; pass --expenses-home to put it somewhere else.
    Init(InitArgs),
    /// Record a new expense.
    Add(Box<AddArgs>),
    /// List all recorded expenses in the order they were added.
    List,
    /// Export all expenses to Expenses.xlsx and hand the file off for viewing or sharing.
    Export,
    /// Open the bill file attached to an expense.
    Bill(BillArgs),
}

/// Arguments common to all subcommands.
#[derive(Debug, Parser, Clone)]
pub struct Common {
    /// The logging verbosity. One of, from least to most verbose:
    /// off, error, warn, info, debug, trace
    ///
    /// This can be overridden by RUST_LOG.
    #[arg(long, default_value_t = LevelFilter::INFO)]
    log_level: LevelFilter,

    /// The directory where expense data and configuration is held. Defaults to ~/expenses
    #[arg(long, env = "EXPENSES_HOME", default_value_t = default_expenses_home())]
    expenses_home: DisplayPath,
}

impl Common {
    pub fn log_level(&self) -> LevelFilter {
        self.log_level
    }

    pub fn expenses_home(&self) -> &DisplayPath {
        &self.expenses_home
    }
}

/// Args for the `expenses init` command.
#[derive(Debug, Parser, Clone)]
pub struct InitArgs {
    /// Where exports are written: "private" ($EXPENSES_HOME/exports, handed off for sharing) or
    /// "downloads" (your downloads directory, handed off for viewing).
    #[arg(long, value_enum, default_value_t = DestinationPolicy::Private)]
    destination: DestinationPolicy,
}

impl InitArgs {
    pub fn destination(&self) -> DestinationPolicy {
        self.destination
    }
}

/// Args for the `expenses add` command.
///
/// Like the entry form this replaces, `--price` fills both the amount and the price of the
/// expense, and `--paid-by` fills both the payer and the name unless `--name` is given.
#[derive(Debug, Parser, Clone, Default)]
pub struct AddArgs {
    /// What the expense was for.
    #[arg(long, default_value = "")]
    pub title: String,

    /// The amount paid. Text that is not a number is recorded as 0.
    #[arg(long, default_value = "")]
    pub price: String,

    /// Who paid.
    #[arg(long, default_value = "")]
    pub paid_by: String,

    /// A label for the expense, defaults to the value of --paid-by.
    #[arg(long)]
    pub name: Option<String>,

    /// The expense category, e.g. "TRAVEL". Defaults to "F&B - IN OFFICE".
    #[arg(long)]
    pub category: Option<String>,

    /// Whether the expense has been settled.
    #[arg(long, value_enum, default_value_t = Status::Done)]
    pub status: Status,

    /// The date of the expense as D/M/YYYY. Defaults to today.
    #[arg(long)]
    pub date: Option<String>,

    /// The bill includes GST.
    #[arg(long)]
    pub gst: bool,

    /// A reference to the bill file, e.g. a path or URI. It is stored as is.
    #[arg(long, default_value = "")]
    pub bill: String,

    /// Export all expenses after recording this one.
    #[arg(long)]
    pub export: bool,
}

impl AddArgs {
    /// The category text to store.
    pub fn category_text(&self) -> String {
        self.category
            .clone()
            .unwrap_or_else(|| Category::default().to_string())
    }
}

/// Args for the `expenses bill` command.
#[derive(Debug, Parser, Clone)]
pub struct BillArgs {
    /// The ID of the expense, as shown by `expenses list`.
    id: RecordId,
}

impl BillArgs {
    pub fn id(&self) -> RecordId {
        self.id
    }
}

fn default_expenses_home() -> DisplayPath {
    DisplayPath(match dirs::home_dir() {
        Some(home) => home.join("expenses"),
        None => {
            error!(
                "There was an error when trying to get your home directory. You can get around \
                this by providing --expenses-home or EXPENSES_HOME instead of relying on the \
                default directory. If you continue using the program right now, you may have \
                problems!",
            );
            PathBuf::from("expenses")
        }
    })
}

#[derive(Debug, Default, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct DisplayPath(PathBuf);

impl From<PathBuf> for DisplayPath {
    fn from(value: PathBuf) -> Self {
        DisplayPath(value)
    }
}

impl Deref for DisplayPath {
    type Target = Path;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl AsRef<Path> for DisplayPath {
    fn as_ref(&self) -> &Path {
        &self.0
    }
}

impl Display for DisplayPath {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0.to_string_lossy())
    }
}

impl FromStr for DisplayPath {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(PathBuf::from(s)))
    }
}

impl DisplayPath {
    pub fn path(&self) -> &Path {
        &self.0
    }
}
