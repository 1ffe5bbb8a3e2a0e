use crate::db::Expense;
use serde::Serialize;
use std::collections::HashMap;

/// Totals for one calendar month.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MonthlySummary {
    #[serde(rename = "año")]
    pub year: i32,
    #[serde(rename = "mes")]
    pub month: u32,
    pub total: f64,
    #[serde(rename = "cantidad")]
    pub count: usize,
}

/// Records dated in `year`/`month`, in store order.
pub fn monthly(expenses: &[Expense], year: i32, month: u32) -> Vec<Expense> {
    expenses
        .iter()
        .filter(|e| e.year() == year && e.month() == month)
        .cloned()
        .collect()
}

/// One entry per (year, month) present in `expenses`, ordered by the first
/// record seen for that month (not chronologically).
pub fn summary(expenses: &[Expense]) -> Vec<MonthlySummary> {
    let mut slots: HashMap<(i32, u32), usize> = HashMap::new();
    let mut out: Vec<MonthlySummary> = Vec::new();

    for expense in expenses {
        let key = (expense.year(), expense.month());
        let idx = *slots.entry(key).or_insert_with(|| {
            out.push(MonthlySummary {
                year: key.0,
                month: key.1,
                total: 0.0,
                count: 0,
            });
            out.len() - 1
        });
        out[idx].total += expense.amount;
        out[idx].count += 1;
    }
    out
}
