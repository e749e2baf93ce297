//! Totals computed on demand from a fetched expense list. Nothing here is
//! stored on the backend.
use std::collections::BTreeMap;

use api_types::expense::Expense;
use chrono::{DateTime, NaiveDate};

use crate::{expenses::DEFAULT_CATEGORY, money::Amount};

const RECENT_LIMIT: usize = 5;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CategoryTotal {
    pub category: String,
    pub total: Amount,
    pub count: usize,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MonthTotal {
    /// `YYYY-MM`.
    pub month: String,
    pub total: Amount,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Summary {
    pub total: Amount,
    pub count: usize,
    /// Largest total first; ties by category name.
    pub by_category: Vec<CategoryTotal>,
    /// Oldest month first. Expenses without a readable date are left out.
    pub by_month: Vec<MonthTotal>,
    /// First expenses of the list, in list order.
    pub recent: Vec<Expense>,
    /// Expenses whose amount could not be parsed or would overflow a total;
    /// not in any total.
    pub skipped: usize,
}

impl Summary {
    pub fn from_expenses(expenses: &[Expense]) -> Self {
        let mut total = Amount::ZERO;
        let mut skipped = 0;
        let mut categories: BTreeMap<String, (Amount, usize)> = BTreeMap::new();
        let mut months: BTreeMap<String, Amount> = BTreeMap::new();

        for expense in expenses {
            let amount = match expense.amount.parse::<Amount>() {
                Ok(amount) => amount,
                Err(err) => {
                    tracing::warn!(expense_id = %expense.id, "skipping amount: {err}");
                    skipped += 1;
                    continue;
                }
            };

            let category = expense
                .category
                .as_deref()
                .map(str::trim)
                .filter(|category| !category.is_empty())
                .unwrap_or(DEFAULT_CATEGORY);
            let when = expense.date.as_deref().unwrap_or(&expense.created_at);
            let month = month_of(when);

            // All three sums are checked before any is updated, so an
            // overflowing expense is left out of every total.
            let slot = categories.get(category).copied().unwrap_or((Amount::ZERO, 0));
            let month_total = month
                .as_ref()
                .map(|month| months.get(month).copied().unwrap_or(Amount::ZERO));
            let sums = (
                total.checked_add(amount),
                slot.0.checked_add(amount),
                month_total.map(|month_total| month_total.checked_add(amount)),
            );
            let (new_total, new_category, new_month) = match sums {
                (Some(t), Some(c), None) => (t, c, None),
                (Some(t), Some(c), Some(Some(m))) => (t, c, Some(m)),
                _ => {
                    tracing::warn!(expense_id = %expense.id, "skipping amount: total overflows");
                    skipped += 1;
                    continue;
                }
            };

            total = new_total;
            categories.insert(category.to_string(), (new_category, slot.1 + 1));
            if let (Some(month), Some(month_total)) = (month, new_month) {
                months.insert(month, month_total);
            }
        }

        let mut by_category: Vec<CategoryTotal> = categories
            .into_iter()
            .map(|(category, (total, count))| CategoryTotal {
                category,
                total,
                count,
            })
            .collect();
        by_category.sort_by(|a, b| {
            b.total
                .cmp(&a.total)
                .then_with(|| a.category.cmp(&b.category))
        });

        let by_month = months
            .into_iter()
            .map(|(month, total)| MonthTotal { month, total })
            .collect();

        Self {
            total,
            count: expenses.len() - skipped,
            by_category,
            by_month,
            recent: expenses.iter().take(RECENT_LIMIT).cloned().collect(),
            skipped,
        }
    }
}

fn month_of(raw: &str) -> Option<String> {
    let raw = raw.trim();
    if let Ok(parsed) = DateTime::parse_from_rfc3339(raw) {
        return Some(parsed.format("%Y-%m").to_string());
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .map(|date| date.format("%Y-%m").to_string())
}
