//! Application state containing services and shared resources

use sea_orm::DatabaseConnection;
use std::sync::Arc;

use crate::domain::{AccessPolicy, ItemRepository, LoanRepository, RolePolicy};
use crate::infrastructure::repositories::{SeaOrmItemRepository, SeaOrmLoanRepository};
use crate::services::{ItemService, LoanService};

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    /// Database connection (auth handlers query users directly)
    db: DatabaseConnection,
    /// Item registry
    pub items: ItemService,
    /// Loan lifecycle engine
    pub loans: LoanService,
}

impl AppState {
    /// Create a new AppState with repositories and services wired up
    pub fn new(db: DatabaseConnection) -> Self {
        let item_repo: Arc<dyn ItemRepository> = Arc::new(SeaOrmItemRepository::new(db.clone()));
        let loan_repo: Arc<dyn LoanRepository> = Arc::new(SeaOrmLoanRepository::new(db.clone()));
        let policy: Arc<dyn AccessPolicy> = Arc::new(RolePolicy);

        Self {
            db,
            items: ItemService::new(item_repo.clone(), policy.clone()),
            loans: LoanService::new(item_repo, loan_repo, policy),
        }
    }

    pub fn db(&self) -> &DatabaseConnection {
        &self.db
    }
}

// Allow handlers that only need the connection to extract it directly
impl axum::extract::FromRef<AppState> for DatabaseConnection {
    fn from_ref(state: &AppState) -> Self {
        state.db.clone()
    }
}
