//! Add command handler.

use crate::args::AddArgs;
use crate::commands::export::export_records;
use crate::commands::Out;
use crate::handoff::Handoff;
use crate::model::{Amount, Category, NewExpense, RecordId};
use crate::{Config, Result};
use tracing::{debug, warn};

/// The date format of the entry form, e.g. `5/6/2024` for 5 June 2024.
const DATE_FORMAT: &str = "%-d/%-m/%Y";

/// Records a new expense in the store and returns its assigned ID.
///
/// When `args.export` is set, every expense, including the new one, is then exported and
/// handed off. The expense stays recorded if that export fails.
///
/// # Errors
///
/// - Returns an error if the store rejects the write, in which case nothing was recorded.
/// - Returns an error if the requested export fails.
pub async fn add_expense(
    config: &Config,
    args: AddArgs,
    handoff: &dyn Handoff,
) -> Result<Out<RecordId>> {
    let expense = new_expense(args.clone());
    if !Category::is_known(&expense.category) {
        warn!(
            "'{}' is not one of the known categories, it will be stored as is",
            expense.category
        );
    }

    let id = config.db().insert(&expense).await?;
    debug!("Recorded expense {id} '{}'", expense.title);
    let mut message = format!("Recorded expense {id} '{}'", expense.title);

    if args.export {
        let records = config.db().list_all().await?;
        let exported = export_records(config, &records, handoff).await?;
        message = format!("{message}\n{}", exported.message());
    }

    Ok(Out::new(message, id))
}

/// Builds the record the way the entry form does: one price feeds both amount fields, and the
/// payer doubles as the name unless a name is given.
fn new_expense(args: AddArgs) -> NewExpense {
    let category = args.category_text();
    let amount = Amount::parse_or_zero(&args.price);
    NewExpense {
        name: args.name.unwrap_or_else(|| args.paid_by.clone()),
        title: args.title,
        amount,
        price: amount,
        category,
        status: args.status.to_string(),
        paid_by: args.paid_by,
        date: args.date.unwrap_or_else(today),
        gst_available: args.gst,
        bill_file_path: args.bill,
    }
}

fn today() -> String {
    chrono::Local::now().format(DATE_FORMAT).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::export::FILE_NAME;
    use crate::handoff::tests::RecordingHandoff;
    use crate::model::Status;
    use crate::test::{read_sheet, TestEnv};
    use calamine::Data;

    fn lunch() -> AddArgs {
        AddArgs {
            title: "Lunch".to_string(),
            price: "250.0".to_string(),
            paid_by: "Asha".to_string(),
            date: Some("5/6/2024".to_string()),
            ..AddArgs::default()
        }
    }

    #[test]
    fn test_new_expense_fills_like_the_entry_form() {
        let expense = new_expense(lunch());
        assert_eq!(expense.name, "Asha");
        assert_eq!(expense.paid_by, "Asha");
        assert_eq!(expense.amount, expense.price);
        assert_eq!(expense.amount.to_f64(), 250.0);
        assert_eq!(expense.category, "F&B - IN OFFICE");
        assert_eq!(expense.status, "DONE");
        assert!(!expense.gst_available);
        assert_eq!(expense.bill_file_path, "");
    }

    #[test]
    fn test_new_expense_explicit_fields() {
        let expense = new_expense(AddArgs {
            name: Some("Team lunch".to_string()),
            category: Some("MISC".to_string()),
            status: Status::Pending,
            gst: true,
            bill: "/bills/1.pdf".to_string(),
            ..lunch()
        });
        assert_eq!(expense.name, "Team lunch");
        assert_eq!(expense.category, "MISC");
        assert_eq!(expense.status, "PENDING");
        assert!(expense.gst_available);
        assert_eq!(expense.bill_file_path, "/bills/1.pdf");
    }

    #[test]
    fn test_new_expense_unparsable_price_is_zero() {
        let expense = new_expense(AddArgs {
            price: "abc".to_string(),
            ..lunch()
        });
        assert!(expense.amount.is_zero());
        assert!(expense.price.is_zero());
    }

    #[test]
    fn test_new_expense_defaults_to_today() {
        let expense = new_expense(AddArgs {
            date: None,
            ..lunch()
        });
        let parts: Vec<&str> = expense.date.split('/').collect();
        assert_eq!(parts.len(), 3);
        assert!(!parts[0].starts_with('0'));
        assert!(!parts[1].starts_with('0'));
        assert_eq!(parts[2].len(), 4);
    }

    #[tokio::test]
    async fn test_add_expense() {
        let env = TestEnv::new().await;
        let config = env.config();
        let handoff = RecordingHandoff::default();

        let first = add_expense(&config, lunch(), &handoff).await.unwrap();
        let second = add_expense(&config, lunch(), &handoff).await.unwrap();

        assert_eq!(first.structure().unwrap().get(), 1);
        assert_eq!(second.structure().unwrap().get(), 2);
        assert!(handoff.files.lock().unwrap().is_empty());
        let stored = config.db().list_all().await.unwrap();
        assert_eq!(stored.len(), 2);
        assert_eq!(stored[0].title(), "Lunch");
        assert_eq!(stored[0].date(), "5/6/2024");
    }

    #[tokio::test]
    async fn test_add_expense_and_export() {
        let env = TestEnv::new().await;
        let config = env.config();
        env.insert("Taxi", "120", "4/6/2024").await;
        let handoff = RecordingHandoff::default();

        let out = add_expense(
            &config,
            AddArgs {
                export: true,
                ..lunch()
            },
            &handoff,
        )
        .await
        .unwrap();

        assert_eq!(out.structure().unwrap().get(), 2);
        assert!(out.message().contains("Exported 2 expenses"));
        assert_eq!(handoff.files.lock().unwrap().len(), 1);
        let bytes = std::fs::read(config.exports_dir().join(FILE_NAME)).unwrap();
        let (_, rows) = read_sheet(&bytes);
        assert_eq!(rows.len(), 3);
        assert_eq!(rows[2][1], Data::String("Lunch".to_string()));
    }

    #[tokio::test]
    async fn test_failed_export_keeps_the_record() {
        let env = TestEnv::new().await;
        let config = env.config();
        std::fs::write(config.exports_dir(), "not a directory").unwrap();
        let handoff = RecordingHandoff::default();

        let result = add_expense(
            &config,
            AddArgs {
                export: true,
                ..lunch()
            },
            &handoff,
        )
        .await;

        assert!(matches!(result, Err(crate::Error::Export(_))));
        assert_eq!(config.db().list_all().await.unwrap().len(), 1);
    }
}
