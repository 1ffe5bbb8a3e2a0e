use crate::db::schema::DATE_FORMAT;
use crate::error::GastosError;
use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use tracing::warn;

/// One tracked spending entry.
///
/// `month` and `year` are derived from `date` on access; they are only
/// materialized in [`ExpenseRow`] when the record leaves the process.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(into = "ExpenseRow")]
pub struct Expense {
    pub id: u64,
    pub date: NaiveDate,
    pub description: String,
    pub category: String,
    pub amount: f64,
}

impl Expense {
    pub fn month(&self) -> u32 {
        self.date.month()
    }

    pub fn year(&self) -> i32 {
        self.date.year()
    }
}

/// Flat row shape shared by the CSV file and the JSON API.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExpenseRow {
    pub id: u64,
    pub fecha: String,
    pub descripcion: String,
    pub categoria: String,
    pub monto: f64,
    pub mes: u32,
    #[serde(rename = "año")]
    pub anio: i32,
}

impl From<Expense> for ExpenseRow {
    fn from(e: Expense) -> Self {
        Self {
            id: e.id,
            fecha: e.date.format(DATE_FORMAT).to_string(),
            mes: e.month(),
            anio: e.year(),
            descripcion: e.description,
            categoria: e.category,
            monto: e.amount,
        }
    }
}

impl TryFrom<ExpenseRow> for Expense {
    type Error = GastosError;

    fn try_from(row: ExpenseRow) -> Result<Self, Self::Error> {
        let date = NaiveDate::parse_from_str(&row.fecha, DATE_FORMAT).map_err(|e| {
            GastosError::validation(format!("invalid fecha {:?} for id {}: {e}", row.fecha, row.id))
        })?;
        let expense = Expense {
            id: row.id,
            date,
            description: row.descripcion,
            category: row.categoria,
            amount: row.monto,
        };
        if expense.month() != row.mes || expense.year() != row.anio {
            warn!(
                id = expense.id,
                fecha = %row.fecha,
                stored_mes = row.mes,
                stored_anio = row.anio,
                "stored month/year disagree with fecha; using fecha"
            );
        }
        Ok(expense)
    }
}
