use client::{
    ClientError, ExpenseClient, ExpenseFields, Notice, Operation, Summary,
    format::{format_amount, format_amount_cents, format_date},
    types::{Expense, ExpenseUpdate},
};

use crate::{
    cli::Command,
    error::{AppError, Result},
};

/// Runs a client-side command. `serve` is handled by the caller.
pub async fn run(client: &ExpenseClient, command: Command) -> Result<()> {
    match command {
        Command::Login { username, password } => {
            let session = report(Operation::Login, client.login(&username, &password).await)?;
            println!("Logged in as {} (id {})", session.username, session.id);
        }
        Command::Signup { username, password } => {
            let session = report(Operation::Signup, client.signup(&username, &password).await)?;
            println!("Logged in as {} (id {})", session.username, session.id);
        }
        Command::Logout => {
            client.logout().await;
            println!("{}", Notice::success(Operation::Logout));
        }
        Command::Whoami => match client.current_user().await {
            Some(session) => println!("{} (id {})", session.username, session.id),
            None => return Err(ClientError::Unauthenticated.into()),
        },
        Command::List => {
            let expenses = client.list_expenses().await?;
            if expenses.is_empty() {
                println!("No expenses yet");
            }
            for expense in &expenses {
                println!("{}", list_line(expense));
            }
        }
        Command::Show { id } => {
            let expense = client.get_expense(&id).await?;
            print_expense(&expense);
        }
        Command::Add {
            name,
            amount,
            description,
            category,
            date,
        } => {
            let mut fields = ExpenseFields::new(&name, &amount).description(&description);
            fields.category = category;
            fields.date = date;
            let created = report(Operation::CreateExpense, client.create_expense(fields).await)?;
            println!("id {}", created.id);
        }
        Command::Edit {
            id,
            name,
            amount,
            description,
            category,
            date,
        } => {
            let patch = ExpenseUpdate {
                name,
                amount,
                description,
                category,
                date,
                ..ExpenseUpdate::default()
            };
            if patch.is_empty() {
                return Err(AppError::Usage("Nothing to update".to_string()));
            }
            report(Operation::UpdateExpense, client.update_expense(&id, patch).await)?;
        }
        Command::Delete { id } => {
            report(Operation::DeleteExpense, client.delete_expense(&id).await)?;
        }
        Command::Summary => {
            let expenses = client.list_expenses().await?;
            print_summary(&Summary::from_expenses(&expenses));
        }
        Command::Serve { .. } => {}
    }
    Ok(())
}

/// Prints the success notice, or turns the failure into one.
fn report<T>(op: Operation, result: std::result::Result<T, ClientError>) -> Result<T> {
    let notice = Notice::from_result(op, &result);
    match result {
        Ok(value) => {
            println!("{notice}");
            Ok(value)
        }
        Err(err) => {
            tracing::debug!("{op:?} failed: {err}");
            Err(AppError::Notice {
                notice,
                route: err.fallback_route(),
            })
        }
    }
}

fn list_line(expense: &Expense) -> String {
    let date = expense
        .date
        .as_deref()
        .map(format_date)
        .unwrap_or_default();
    format!(
        "{:>6}  {:<18}  {:<24}  {:<12}  {:>12}",
        expense.id,
        date,
        expense.name,
        expense.category.as_deref().unwrap_or(client::DEFAULT_CATEGORY),
        format_amount(&expense.amount)
    )
}

fn print_expense(expense: &Expense) {
    println!("{}", expense.name);
    println!("  amount:      {}", format_amount(&expense.amount));
    if let Some(category) = &expense.category {
        println!("  category:    {category}");
    }
    if let Some(date) = &expense.date {
        println!("  date:        {}", format_date(date));
    }
    if !expense.description.is_empty() {
        println!("  description: {}", expense.description);
    }
    println!("  created:     {}", format_date(&expense.created_at));
}

fn print_summary(summary: &Summary) {
    println!(
        "Total: {} across {} expenses",
        format_amount_cents(summary.total.cents()),
        summary.count
    );

    if !summary.by_category.is_empty() {
        println!("\nBy category");
        for category in &summary.by_category {
            println!(
                "  {:<16} {:>12}  ({})",
                category.category,
                format_amount_cents(category.total.cents()),
                category.count
            );
        }
    }

    if !summary.by_month.is_empty() {
        println!("\nBy month");
        for month in &summary.by_month {
            println!(
                "  {:<16} {:>12}",
                month.month,
                format_amount_cents(month.total.cents())
            );
        }
    }

    if !summary.recent.is_empty() {
        println!("\nRecent");
        for expense in &summary.recent {
            println!("{}", list_line(expense));
        }
    }

    if summary.skipped > 0 {
        println!("\n{} expenses with unreadable amounts left out", summary.skipped);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn expense() -> Expense {
        Expense {
            id: "3".to_string(),
            name: "Lunch".to_string(),
            amount: "1234.5".to_string(),
            description: String::new(),
            category: None,
            title: None,
            date: Some("2025-02-12T12:00:00.000Z".to_string()),
            payment_method: None,
            created_at: "2025-02-12T12:00:01.000Z".to_string(),
            user_id: "1".to_string(),
        }
    }

    #[test]
    fn list_line_formats_amount_and_date() {
        let line = list_line(&expense());
        assert!(line.contains("February 12, 2025"));
        assert!(line.contains("$1,234.50"));
        assert!(line.contains("Other"));
    }

    #[test]
    fn failed_operation_becomes_notice() {
        let err = report::<()>(
            Operation::CreateExpense,
            Err(ClientError::Transport("boom".to_string())),
        )
        .unwrap_err();
        assert_eq!(
            err.to_string(),
            "Error: Failed to create expense. Please try again."
        );
    }
}
