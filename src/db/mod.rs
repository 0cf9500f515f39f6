//! This module is responsible for reading, writing and managing the SQLite database that holds
//! the expense records.

mod migrations;

use crate::error::StorageFault;
use crate::model::{Amount, Expense, NewExpense, RecordId};
use sqlx::sqlite::{
    SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions, SqliteRow, SqliteSynchronous,
};
use sqlx::{Row, SqlitePool};
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tracing::{debug, trace};

const MAX_CONNECTIONS: u32 = 4;

const INSERT_EXPENSE: &str = "INSERT INTO expenses \
    (title, name, amount, price, category, status, paid_by, date, gst_available, bill_file_path) \
    VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)";

const SELECT_ALL_EXPENSES: &str = "SELECT \
    id, title, name, amount, price, category, status, paid_by, date, gst_available, bill_file_path \
    FROM expenses ORDER BY id ASC";

/// The expense store.
///
/// `Db` is cheap to clone; clones share the same connection pool and the same write lock, so
/// inserts from any clone are committed one at a time. Reads do not take the lock.
#[derive(Debug, Clone)]
pub struct Db {
    path: PathBuf,
    pool: SqlitePool,
    write_lock: Arc<Mutex<()>>,
}

impl Db {
    /// - Validates that no file currently exists at `path`
    /// - Creates a new SQLite file at `path`
    /// - Initializes the database schema
    /// - Returns a constructed `Db` object for further operations
    pub async fn init(path: impl AsRef<Path>, timeout: Duration) -> Result<Self, StorageFault> {
        let path = path.as_ref();
        if path.exists() {
            return Err(StorageFault::AlreadyExists(path.to_path_buf()));
        }
        let pool = connect(path, timeout, true).await?;
        migrations::bootstrap(&pool).await.map_err(migration_fault)?;
        migrations::run(&pool, 0, migrations::CURRENT_VERSION)
            .await
            .map_err(migration_fault)?;
        debug!("Initialized expense database at {}", path.display());
        Ok(Self::new(path, pool))
    }

    /// - Validates that there is a SQLite file at `path`
    /// - Creates a SQLite client
    /// - Updates the database schema with migrations if it is out-of-date
    /// - Returns a constructed `Db` object for further operations
    pub async fn load(path: impl AsRef<Path>, timeout: Duration) -> Result<Self, StorageFault> {
        let path = path.as_ref();
        if !path.is_file() {
            return Err(StorageFault::Missing(path.to_path_buf()));
        }
        let pool = connect(path, timeout, false).await?;
        let version = migrations::current_version(&pool)
            .await
            .map_err(migration_fault)?;
        if version > migrations::CURRENT_VERSION {
            return Err(StorageFault::Migration(format!(
                "the database schema version {version} is newer than the supported version {}",
                migrations::CURRENT_VERSION
            )));
        }
        migrations::run(&pool, version, migrations::CURRENT_VERSION)
            .await
            .map_err(migration_fault)?;
        Ok(Self::new(path, pool))
    }

    fn new(path: &Path, pool: SqlitePool) -> Self {
        Self {
            path: path.to_path_buf(),
            pool,
            write_lock: Arc::new(Mutex::new(())),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Stores `expense` and returns the ID assigned to it.
    ///
    /// The record is committed with `synchronous=FULL` before this returns, so it survives a
    /// process restart. On error the record must be assumed unsaved.
    pub async fn insert(&self, expense: &NewExpense) -> Result<RecordId, StorageFault> {
        let _guard = self.write_lock.lock().await;
        let result = sqlx::query(INSERT_EXPENSE)
            .bind(&expense.title)
            .bind(&expense.name)
            .bind(expense.amount.to_string())
            .bind(expense.price.to_string())
            .bind(&expense.category)
            .bind(&expense.status)
            .bind(&expense.paid_by)
            .bind(&expense.date)
            .bind(expense.gst_available)
            .bind(&expense.bill_file_path)
            .execute(&self.pool)
            .await
            .map_err(StorageFault::query("insert the expense"))?;
        let id = RecordId::new(result.last_insert_rowid());
        debug!("Inserted expense {id}");
        Ok(id)
    }

    /// Returns every stored expense in insertion order.
    ///
    /// An empty store gives an empty `Vec`; a read failure is always an error.
    pub async fn list_all(&self) -> Result<Vec<Expense>, StorageFault> {
        let rows = sqlx::query(SELECT_ALL_EXPENSES)
            .fetch_all(&self.pool)
            .await
            .map_err(StorageFault::query("read the expenses"))?;
        trace!("Read {} expense rows", rows.len());
        rows.iter().map(decode_row).collect()
    }

    /// Closes all pooled connections. Further calls on this `Db` or its clones will fail.
    pub async fn close(&self) {
        self.pool.close().await
    }
}

async fn connect(path: &Path, timeout: Duration, create: bool) -> Result<SqlitePool, StorageFault> {
    let options = SqliteConnectOptions::new()
        .filename(path)
        .create_if_missing(create)
        .journal_mode(SqliteJournalMode::Wal)
        .synchronous(SqliteSynchronous::Full)
        .busy_timeout(timeout);

    SqlitePoolOptions::new()
        .max_connections(MAX_CONNECTIONS)
        .acquire_timeout(timeout)
        .connect_with(options)
        .await
        .map_err(|source| StorageFault::Open {
            path: path.to_path_buf(),
            source,
        })
}

fn migration_fault(e: anyhow::Error) -> StorageFault {
    StorageFault::Migration(format!("{e:#}"))
}

fn decode_row(row: &SqliteRow) -> Result<Expense, StorageFault> {
    let get_err = StorageFault::query("decode an expense row");
    let id = RecordId::new(row.try_get("id").map_err(get_err)?);
    let text = |column: &'static str| -> Result<String, StorageFault> {
        row.try_get(column)
            .map_err(StorageFault::query("decode an expense row"))
    };
    let amount = |column: &'static str| -> Result<Amount, StorageFault> {
        let value = text(column)?;
        Amount::from_str(&value).map_err(|_| StorageFault::Decode { id, column, value })
    };

    let fields = NewExpense {
        title: text("title")?,
        name: text("name")?,
        amount: amount("amount")?,
        price: amount("price")?,
        category: text("category")?,
        status: text("status")?,
        paid_by: text("paid_by")?,
        date: text("date")?,
        gst_available: row
            .try_get("gst_available")
            .map_err(StorageFault::query("decode an expense row"))?,
        bill_file_path: text("bill_file_path")?,
    };
    Ok(Expense::new(id, fields))
}
