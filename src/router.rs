use axum::{
    Router,
    routing::{get, put},
};

use crate::handlers::expenses::{
    create_expense, delete_expense, expenses_summary, get_expense, health, list_expenses,
    monthly_expenses, update_expense,
};
use crate::service::expenses_actor::ExpensesHandle;

#[derive(Clone)]
pub struct GastosState {
    pub expenses: ExpensesHandle,
}

impl GastosState {
    pub fn new(expenses: ExpensesHandle) -> Self {
        Self { expenses }
    }
}

pub fn gastos_router(state: GastosState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/api/expenses", get(list_expenses).post(create_expense))
        .route("/api/expenses/summary", get(expenses_summary))
        .route("/api/expenses/monthly/{year}/{month}", get(monthly_expenses))
        .route(
            "/api/expenses/{id}",
            put(update_expense).delete(delete_expense).get(get_expense),
        )
        .with_state(state)
}
