pub mod item_service;
pub mod loan_service;

pub use item_service::{InventorySummary, ItemService};
pub use loan_service::{LoanService, LoanWithItem};
