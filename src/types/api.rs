use crate::db::Expense;
use crate::db::schema::DATE_FORMAT;
use crate::error::GastosError;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Request body for create and update.
///
/// Every field is optional at the serde level so a missing field becomes a
/// `Validation` error with a readable message instead of a rejection.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ExpenseInput {
    pub fecha: Option<String>,
    pub descripcion: Option<String>,
    pub categoria: Option<String>,
    pub monto: Option<Value>,
}

/// A validated input: everything an `Expense` needs except its id.
#[derive(Debug, Clone, PartialEq)]
pub struct ExpenseDraft {
    pub date: NaiveDate,
    pub description: String,
    pub category: String,
    pub amount: f64,
}

impl ExpenseDraft {
    pub fn into_expense(self, id: u64) -> Expense {
        Expense {
            id,
            date: self.date,
            description: self.description,
            category: self.category,
            amount: self.amount,
        }
    }
}

impl ExpenseInput {
    pub fn validate(self) -> Result<ExpenseDraft, GastosError> {
        let fecha = required(self.fecha, "fecha")?;
        let description = required(self.descripcion, "descripcion")?;
        let category = required(self.categoria, "categoria")?;
        let monto = required(self.monto, "monto")?;

        let date = NaiveDate::parse_from_str(fecha.trim(), DATE_FORMAT).map_err(|e| {
            GastosError::validation(format!(
                "fecha {fecha:?} does not match format YYYY-MM-DD: {e}"
            ))
        })?;
        let amount = parse_amount(&monto)?;

        Ok(ExpenseDraft {
            date,
            description,
            category,
            amount,
        })
    }
}

fn required<T>(field: Option<T>, name: &str) -> Result<T, GastosError> {
    field.ok_or_else(|| GastosError::validation(format!("missing field `{name}`")))
}

/// Accepts a JSON number or a string holding one. Non-finite values are rejected.
fn parse_amount(monto: &Value) -> Result<f64, GastosError> {
    let amount = match monto {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    match amount {
        Some(a) if a.is_finite() => Ok(a),
        _ => Err(GastosError::validation(format!(
            "could not convert monto to float: {monto}"
        ))),
    }
}

/// `{"success": true, "expense": {...}}`
#[derive(Debug, Serialize)]
pub struct ExpenseResponse {
    pub success: bool,
    pub expense: Expense,
}

impl ExpenseResponse {
    pub fn ok(expense: Expense) -> Self {
        Self {
            success: true,
            expense,
        }
    }
}

/// `{"success": true}`
#[derive(Debug, Serialize)]
pub struct SuccessResponse {
    pub success: bool,
}

impl SuccessResponse {
    pub fn ok() -> Self {
        Self { success: true }
    }
}
