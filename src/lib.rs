pub mod config;
pub mod db;
pub mod error;
pub mod form;
pub mod models;
pub mod store;
pub mod ui;
pub mod utils;
pub mod view;

// Re-export commonly used items
pub use models::expense::{Expense, ExpenseDraft};
pub use models::category::CategoryFilter;
pub use store::ExpenseStore;
pub use ui::app::App;
pub use db::{connection::DbConnection, storage::KeyValueStorage};
pub use error::{AppError, Result};
