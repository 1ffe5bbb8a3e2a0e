pub mod config;
pub mod db;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod router;
pub mod service;
pub mod types;

pub use db::Expense;
pub use error::GastosError;
pub use service::expense_repository::ExpenseRepository;
