//! Storage module: the expense record and its tabular file.
//!
//! Layout:
//! - `models.rs`: the `Expense` record and its on-disk / JSON row shape
//! - `schema.rs`: the header row of the backing file
//! - `csv_store.rs`: whole-file load and save

pub mod csv_store;
pub mod models;
pub mod schema;

pub use csv_store::ExpenseFile;
pub use models::{Expense, ExpenseRow};
pub use schema::HEADERS;
