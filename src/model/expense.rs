use crate::model::Amount;
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};
use std::num::ParseIntError;
use std::str::FromStr;

/// The store-assigned identifier of an expense.
///
/// IDs are assigned by the store, strictly increasing, and never reused.
#[derive(
    Debug, Clone, Copy, Default, Eq, PartialEq, Ord, PartialOrd, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct RecordId(i64);

impl RecordId {
    pub(crate) const fn new(id: i64) -> Self {
        Self(id)
    }

    pub fn get(&self) -> i64 {
        self.0
    }

    /// The ID widened to a float, which is how ID cells are written in exports.
    pub fn to_f64(&self) -> f64 {
        self.0 as f64
    }
}

impl Display for RecordId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        Display::fmt(&self.0, f)
    }
}

impl FromStr for RecordId {
    type Err = ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(s.trim().parse()?))
    }
}

/// An expense that has not been stored yet, so it has no ID.
///
/// All text fields are free-form and may be empty. `date` is opaque text in `D/M/YYYY` form
/// and is never parsed.
#[derive(Default, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct NewExpense {
    pub title: String,
    /// A secondary label. The input surface fills it from the same field as `paid_by`.
    pub name: String,
    pub amount: Amount,
    /// Always populated with the same value as `amount` by the input surface.
    pub price: Amount,
    pub category: String,
    pub status: String,
    pub paid_by: String,
    pub date: String,
    pub gst_available: bool,
    /// An opaque reference to an attached bill. Empty means no attachment.
    pub bill_file_path: String,
}

impl NewExpense {
    pub fn has_attachment(&self) -> bool {
        !self.bill_file_path.is_empty()
    }
}

/// A stored expense. Records are never changed once stored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct Expense {
    id: RecordId,
    #[serde(flatten)]
    fields: NewExpense,
}

impl Expense {
    pub(crate) fn new(id: RecordId, fields: NewExpense) -> Self {
        Self { id, fields }
    }

    pub fn id(&self) -> RecordId {
        self.id
    }

    pub fn title(&self) -> &str {
        &self.fields.title
    }

    pub fn name(&self) -> &str {
        &self.fields.name
    }

    pub fn amount(&self) -> Amount {
        self.fields.amount
    }

    pub fn price(&self) -> Amount {
        self.fields.price
    }

    pub fn category(&self) -> &str {
        &self.fields.category
    }

    pub fn status(&self) -> &str {
        &self.fields.status
    }

    pub fn paid_by(&self) -> &str {
        &self.fields.paid_by
    }

    pub fn date(&self) -> &str {
        &self.fields.date
    }

    pub fn gst_available(&self) -> bool {
        self.fields.gst_available
    }

    pub fn bill_file_path(&self) -> &str {
        &self.fields.bill_file_path
    }

    /// All fields except the ID.
    pub fn fields(&self) -> &NewExpense {
        &self.fields
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_id_widens_to_float() {
        assert_eq!(RecordId::new(42).to_f64(), 42.0);
    }

    #[test]
    fn test_record_id_from_str() {
        assert_eq!(RecordId::from_str(" 7 ").unwrap(), RecordId::new(7));
        assert!(RecordId::from_str("seven").is_err());
    }

    #[test]
    fn test_expense_serializes_flat() {
        let expense = Expense::new(
            RecordId::new(3),
            NewExpense {
                title: "Taxi".to_string(),
                amount: Amount::parse_or_zero("120"),
                price: Amount::parse_or_zero("120"),
                status: "PENDING".to_string(),
                ..NewExpense::default()
            },
        );
        let json = serde_json::to_value(&expense).unwrap();
        assert_eq!(json["id"], 3);
        assert_eq!(json["title"], "Taxi");
        assert_eq!(json["amount"], "120");
        assert_eq!(json["gst_available"], false);
    }

    #[test]
    fn test_has_attachment() {
        let mut expense = NewExpense::default();
        assert!(!expense.has_attachment());
        expense.bill_file_path = "content://bills/17".to_string();
        assert!(expense.has_attachment());
    }
}
