pub mod item_repository;
pub mod loan_repository;

pub use item_repository::SeaOrmItemRepository;
pub use loan_repository::SeaOrmLoanRepository;
