//! Types that represent the core data model: the expense record and its field types.
mod amount;
mod category;
mod expense;

pub use amount::{Amount, AmountError};
pub use category::{Category, Status};
pub use expense::{Expense, NewExpense, RecordId};
