use crate::commands::Out;
use crate::model::{Amount, Expense};
use crate::{Config, Result};

/// Lists every stored expense in insertion order, one line per expense in the form
/// `title - ₹amount - date`.
pub async fn list(config: &Config) -> Result<Out<Vec<Expense>>> {
    let expenses = config.db().list_all().await?;
    if expenses.is_empty() {
        return Ok(Out::new("No expenses recorded", expenses));
    }
    let message = expenses
        .iter()
        .map(list_line)
        .collect::<Vec<_>>()
        .join("\n");
    Ok(Out::new(message, expenses))
}

fn list_line(expense: &Expense) -> String {
    format!(
        "{} - ₹{} - {}",
        expense.title(),
        list_amount(expense.amount()),
        expense.date()
    )
}

/// Shortest decimal form with at least one fractional digit, e.g. `250.0`, `250.5`, `0.0`.
fn list_amount(amount: Amount) -> String {
    let value = amount.value().normalize();
    if value.scale() == 0 {
        format!("{value}.0")
    } else {
        value.to_string()
    }
}
