//! Repository trait definitions
//!
//! These traits are the persistence gateway contract. Implementations live in
//! the infrastructure layer. Every status transition goes through one of the
//! `*_checked` compare-and-set primitives: the write commits only if the row
//! still carries the expected status, otherwise the caller observes `false`
//! and decides what to do — the gateway never retries on its own.

use async_trait::async_trait;

use super::DomainError;
use crate::models::item::{self, ItemCondition, ItemStatus};
use crate::models::loan::{self, LoanStatus};

/// Input for registering an item
#[derive(Debug, Clone, serde::Deserialize)]
pub struct CreateItemInput {
    pub name: String,
    pub code: String,
    pub condition: ItemCondition,
}

/// Partial update for an item
#[derive(Debug, Default, Clone, serde::Deserialize)]
pub struct UpdateItemInput {
    pub name: Option<String>,
    pub code: Option<String>,
    pub condition: Option<ItemCondition>,
    pub status: Option<ItemStatus>,
}

impl UpdateItemInput {
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.code.is_none()
            && self.condition.is_none()
            && self.status.is_none()
    }
}

/// A guest's borrow request
#[derive(Debug, Clone, serde::Deserialize)]
pub struct SubmitLoanInput {
    pub item_id: i32,
    pub borrower_name: String,
    pub borrower_class: String,
    pub duration_days: i32,
}

/// Filter parameters for listing loans
#[derive(Debug, Default, Clone, Copy)]
pub struct LoanFilter {
    pub status: Option<LoanStatus>,
    pub item_id: Option<i32>,
}

/// Repository trait for Item records
#[async_trait]
pub trait ItemRepository: Send + Sync {
    /// All items, newest first
    async fn find_all(&self) -> Result<Vec<item::Model>, DomainError>;

    async fn find_by_id(&self, id: i32) -> Result<Option<item::Model>, DomainError>;

    async fn find_by_ids(&self, ids: Vec<i32>) -> Result<Vec<item::Model>, DomainError>;

    async fn find_by_code(&self, code: &str) -> Result<Option<item::Model>, DomainError>;

    /// Insert with status `Available`. Surfaces `DuplicateCode` when the
    /// unique index on `code` rejects the row.
    async fn insert(&self, input: CreateItemInput) -> Result<item::Model, DomainError>;

    /// Conditional partial update. When `expected_status` is set the write is
    /// guarded on it; `false` means the row is missing or the guard lost.
    async fn update_checked(
        &self,
        id: i32,
        changes: UpdateItemInput,
        expected_status: Option<ItemStatus>,
    ) -> Result<bool, DomainError>;

    /// Compare-and-set on `status`. At most one of any number of concurrent
    /// callers expecting the same prior status observes `true`.
    async fn set_status_checked(
        &self,
        id: i32,
        expected: ItemStatus,
        next: ItemStatus,
    ) -> Result<bool, DomainError>;

    /// Unconditional status write; `false` when the row no longer exists.
    async fn set_status(&self, id: i32, next: ItemStatus) -> Result<bool, DomainError>;

    /// Delete only while `Available`; `false` when nothing matched (missing
    /// row or a loan got there first).
    async fn delete_available(&self, id: i32) -> Result<bool, DomainError>;
}

/// Repository trait for Loan records
#[async_trait]
pub trait LoanRepository: Send + Sync {
    /// Insert with status `Pending` and `loan_date` stamped now.
    async fn insert(&self, input: SubmitLoanInput) -> Result<loan::Model, DomainError>;

    async fn find_by_id(&self, id: i32) -> Result<Option<loan::Model>, DomainError>;

    /// Loans matching the filter, most recent loan date first
    async fn find_all(&self, filter: LoanFilter) -> Result<Vec<loan::Model>, DomainError>;

    /// Compare-and-set `Pending -> Returned`, stamping `return_date`.
    /// `false` means the loan is missing or already returned.
    async fn close_checked(&self, id: i32, return_date: &str) -> Result<bool, DomainError>;
}
