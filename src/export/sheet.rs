//! Renders expense records into an `.xlsx` document.

use crate::error::ExportFault;
use crate::model::Expense;
use rust_xlsxwriter::{RowNum, Workbook, XlsxError};

/// The name of the only sheet in the document.
pub const SHEET_NAME: &str = "Expenses";

/// The header row. Only these four fields of an expense are exported.
pub const HEADER: [&str; 4] = ["ID", "Title", "Amount", "Date"];

/// Builds the document in memory: one header row, then one row per record in the given order.
///
/// The ID and amount are written as numbers (the ID widened to a float), the title and date as
/// text. No styles or formulas are applied.
pub(crate) fn render(records: &[Expense]) -> Result<Vec<u8>, ExportFault> {
    let mut workbook = Workbook::new();
    let sheet = workbook.add_worksheet();
    sheet.set_name(SHEET_NAME).map_err(serialize_fault)?;

    for (col, title) in (0u16..).zip(HEADER) {
        sheet.write_string(0, col, title).map_err(serialize_fault)?;
    }

    for (ix, expense) in records.iter().enumerate() {
        let row = RowNum::try_from(ix + 1).map_err(|_| {
            ExportFault::Serialize(format!("too many records to export ({})", records.len()))
        })?;
        sheet
            .write_number(row, 0, expense.id().to_f64())
            .and_then(|s| s.write_string(row, 1, expense.title()))
            .and_then(|s| s.write_number(row, 2, expense.amount().to_f64()))
            .and_then(|s| s.write_string(row, 3, expense.date()))
            .map_err(serialize_fault)?;
    }

    workbook.save_to_buffer().map_err(serialize_fault)
}

fn serialize_fault(e: XlsxError) -> ExportFault {
    ExportFault::Serialize(e.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Amount, NewExpense, RecordId};
    use crate::test::read_sheet;
    use calamine::Data;

    fn record(id: i64, title: &str, amount: &str, date: &str) -> Expense {
        Expense::new(
            RecordId::new(id),
            NewExpense {
                title: title.to_string(),
                name: "Ravi".to_string(),
                amount: Amount::parse_or_zero(amount),
                price: Amount::parse_or_zero(amount),
                category: "TRAVEL".to_string(),
                status: "PENDING".to_string(),
                paid_by: "Ravi".to_string(),
                date: date.to_string(),
                gst_available: true,
                bill_file_path: "content://bills/1".to_string(),
            },
        )
    }

    fn header() -> Vec<Data> {
        HEADER.iter().map(|h| Data::String(h.to_string())).collect()
    }

    #[test]
    fn test_empty_document_has_only_the_header() {
        let bytes = render(&[]).unwrap();
        let (names, rows) = read_sheet(&bytes);
        assert_eq!(names, vec![SHEET_NAME.to_string()]);
        assert_eq!(rows, vec![header()]);
    }

    #[test]
    fn test_rows_follow_the_given_order() {
        let records = vec![
            record(1, "Lunch", "250.0", "5/3/2024"),
            record(4, "Cab", "-12.5", "15/11/2023"),
            record(2, "Screws", "0.25", "1/1/2024"),
        ];
        let (_, rows) = read_sheet(&render(&records).unwrap());
        assert_eq!(rows.len(), records.len() + 1);
        assert_eq!(rows[0], header());
        assert_eq!(
            rows[1],
            vec![
                Data::Float(1.0),
                Data::String("Lunch".to_string()),
                Data::Float(250.0),
                Data::String("5/3/2024".to_string()),
            ]
        );
        assert_eq!(
            rows[2],
            vec![
                Data::Float(4.0),
                Data::String("Cab".to_string()),
                Data::Float(-12.5),
                Data::String("15/11/2023".to_string()),
            ]
        );
        assert_eq!(rows[3][0], Data::Float(2.0));
        assert_eq!(rows[3][2], Data::Float(0.25));
    }

    #[test]
    fn test_unexported_fields_do_not_appear() {
        let (_, rows) = read_sheet(&render(&[record(1, "Bolts", "3", "2/2/2024")]).unwrap());
        assert!(rows.iter().all(|r| r.len() == HEADER.len()));
        let text: Vec<String> = rows.iter().flatten().map(|c| c.to_string()).collect();
        assert!(!text.iter().any(|t| t == "TRAVEL" || t == "Ravi"));
    }
}
