pub mod aggregation;
pub mod expense_repository;
pub mod expenses_actor;
