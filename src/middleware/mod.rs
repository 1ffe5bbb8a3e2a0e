pub mod expense_request;
