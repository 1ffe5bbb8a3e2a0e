use axum::{Json, extract::State};
use serde_json::{Value, json};

use crate::db::Expense;
use crate::middleware::expense_request::{ApiPath, ExpensePayload};
use crate::service::aggregation::MonthlySummary;
use crate::types::api::{ExpenseResponse, SuccessResponse};
use crate::{GastosError, router::GastosState};

/// GET /api/expenses
pub async fn list_expenses(
    State(state): State<GastosState>,
) -> Result<Json<Vec<Expense>>, GastosError> {
    Ok(Json(state.expenses.list_all().await?))
}

/// POST /api/expenses
pub async fn create_expense(
    State(state): State<GastosState>,
    ExpensePayload(input): ExpensePayload,
) -> Result<Json<ExpenseResponse>, GastosError> {
    let expense = state.expenses.add(input).await?;
    Ok(Json(ExpenseResponse::ok(expense)))
}

/// GET /api/expenses/{id}
pub async fn get_expense(
    State(state): State<GastosState>,
    ApiPath(id): ApiPath<u64>,
) -> Result<Json<Expense>, GastosError> {
    Ok(Json(state.expenses.find(id).await?))
}

/// PUT /api/expenses/{id}
pub async fn update_expense(
    State(state): State<GastosState>,
    ApiPath(id): ApiPath<u64>,
    ExpensePayload(input): ExpensePayload,
) -> Result<Json<ExpenseResponse>, GastosError> {
    let expense = state.expenses.update(id, input).await?;
    Ok(Json(ExpenseResponse::ok(expense)))
}

/// DELETE /api/expenses/{id}
pub async fn delete_expense(
    State(state): State<GastosState>,
    ApiPath(id): ApiPath<u64>,
) -> Result<Json<SuccessResponse>, GastosError> {
    state.expenses.delete(id).await?;
    Ok(Json(SuccessResponse::ok()))
}

/// GET /api/expenses/monthly/{year}/{month}
pub async fn monthly_expenses(
    State(state): State<GastosState>,
    ApiPath((year, month)): ApiPath<(i32, u32)>,
) -> Result<Json<Vec<Expense>>, GastosError> {
    Ok(Json(state.expenses.monthly(year, month).await?))
}

/// GET /api/expenses/summary
pub async fn expenses_summary(
    State(state): State<GastosState>,
) -> Result<Json<Vec<MonthlySummary>>, GastosError> {
    Ok(Json(state.expenses.summary().await?))
}

pub async fn health() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}
