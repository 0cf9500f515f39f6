use crate::commands::Out;
use crate::handoff::Handoff;
use crate::model::RecordId;
use crate::{Config, Error, Result};

/// Passes the bill reference stored with expense `id` to `handoff`, exactly as stored.
///
/// # Errors
/// - `Error::UnknownExpense` if no expense has this ID.
/// - `Error::NoAttachment` if the expense was recorded without a bill.
pub async fn view_bill(config: &Config, id: RecordId, handoff: &dyn Handoff) -> Result<Out<String>> {
    let expense = config
        .db()
        .list_all()
        .await?
        .into_iter()
        .find(|e| e.id() == id)
        .ok_or(Error::UnknownExpense(id))?;

    let reference = expense.bill_file_path();
    if reference.is_empty() {
        return Err(Error::NoAttachment(id));
    }
    handoff.view_attachment(reference);
    Ok(Out::new(
        format!("Opening the bill for '{}'", expense.title()),
        reference.to_string(),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::handoff::tests::RecordingHandoff;
    use crate::model::NewExpense;
    use crate::test::TestEnv;

    #[tokio::test]
    async fn test_view_bill() {
        let env = TestEnv::new().await;
        let config = env.config();
        let id = config
            .db()
            .insert(&NewExpense {
                title: "Hotel".to_string(),
                bill_file_path: "content://bills/42".to_string(),
                ..NewExpense::default()
            })
            .await
            .unwrap();
        let handoff = RecordingHandoff::default();

        let out = view_bill(&config, id, &handoff).await.unwrap();

        assert_eq!(out.structure().unwrap(), "content://bills/42");
        assert_eq!(
            *handoff.attachments.lock().unwrap(),
            vec!["content://bills/42".to_string()]
        );
    }

    #[tokio::test]
    async fn test_view_bill_without_attachment() {
        let env = TestEnv::new().await;
        let id = env.insert("Lunch", "100", "1/1/2024").await;
        let handoff = RecordingHandoff::default();

        let result = view_bill(&env.config(), id, &handoff).await;

        assert!(matches!(result, Err(Error::NoAttachment(i)) if i == id));
        assert!(handoff.attachments.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_view_bill_unknown_id() {
        let env = TestEnv::new().await;
        let handoff = RecordingHandoff::default();

        let result = view_bill(&env.config(), RecordId::new(7), &handoff).await;

        assert!(matches!(result, Err(Error::UnknownExpense(_))));
    }
}
