pub mod item;
pub mod loan;
pub mod user;
