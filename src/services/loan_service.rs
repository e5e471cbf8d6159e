//! Loan Lifecycle Engine - the borrow/return state machine
//!
//! Sole writer of `Loan.status`/`Loan.return_date`, and of `Item.status`
//! during the borrow/return cycle. Every transition is a single conditional
//! write; whichever request commits first wins and the loser observes a
//! conflict. The engine never retries a lost transition on its own — blindly
//! retrying a non-idempotent state flip risks double transitions.

use std::collections::HashMap;
use std::sync::Arc;

use serde::Serialize;

use crate::domain::{
    AccessPolicy, Caller, DomainError, ItemRepository, LoanFilter, LoanRepository, SubmitLoanInput,
};
use crate::models::item::ItemStatus;
use crate::models::loan::{self, LoanStatus};

/// Loan enriched with the borrowed item's display fields.
#[derive(Debug, Clone, Serialize)]
pub struct LoanWithItem {
    pub id: i32,
    pub item_id: i32,
    pub borrower_name: String,
    pub borrower_class: String,
    pub duration_days: i32,
    pub loan_date: String,
    pub return_date: Option<String>,
    pub status: LoanStatus,
    pub item_name: String,
    pub item_code: String,
}

#[derive(Clone)]
pub struct LoanService {
    items: Arc<dyn ItemRepository>,
    loans: Arc<dyn LoanRepository>,
    policy: Arc<dyn AccessPolicy>,
}

impl LoanService {
    pub fn new(
        items: Arc<dyn ItemRepository>,
        loans: Arc<dyn LoanRepository>,
        policy: Arc<dyn AccessPolicy>,
    ) -> Self {
        Self {
            items,
            loans,
            policy,
        }
    }

    /// Submit a borrow request. Guest-reachable.
    ///
    /// The item flip `Available -> PendingApproval` is the serialization
    /// point: of N concurrent submissions on one item, exactly one wins the
    /// compare-and-set and inserts the loan; the rest observe `Conflict`.
    pub async fn submit_loan(&self, input: SubmitLoanInput) -> Result<loan::Model, DomainError> {
        let borrower_name = input.borrower_name.trim().to_owned();
        let borrower_class = input.borrower_class.trim().to_owned();
        if borrower_name.is_empty() {
            return Err(DomainError::Validation("borrower name must not be empty".into()));
        }
        if borrower_class.is_empty() {
            return Err(DomainError::Validation("borrower class must not be empty".into()));
        }
        if input.duration_days < 1 {
            return Err(DomainError::Validation(
                "loan duration must be at least one day".into(),
            ));
        }

        let item = self
            .items
            .find_by_id(input.item_id)
            .await?
            .ok_or(DomainError::NotFound)?;

        if item.status != ItemStatus::Available {
            return Err(DomainError::Conflict("item no longer available".into()));
        }

        if !self
            .items
            .set_status_checked(item.id, ItemStatus::Available, ItemStatus::PendingApproval)
            .await?
        {
            // Lost the race at commit time.
            return Err(DomainError::Conflict("item no longer available".into()));
        }

        match self
            .loans
            .insert(SubmitLoanInput {
                item_id: item.id,
                borrower_name,
                borrower_class,
                duration_days: input.duration_days,
            })
            .await
        {
            Ok(saved) => {
                tracing::info!(
                    loan_id = saved.id,
                    item_id = item.id,
                    "loan submitted, item held"
                );
                Ok(saved)
            }
            Err(e) => {
                // The borrow never became visible; put the item back.
                if let Err(undo) = self.items.set_status(item.id, ItemStatus::Available).await {
                    tracing::error!(
                        item_id = item.id,
                        error = %undo,
                        "failed to release item after loan insert error"
                    );
                }
                Err(e)
            }
        }
    }

    /// Close a loan and release its item. Staff only.
    ///
    /// The loan flip `Pending -> Returned` is the conditional write: a double
    /// close loses it and gets `Conflict`, never a second item flip.
    pub async fn close_loan(
        &self,
        caller: &Caller,
        loan_id: i32,
    ) -> Result<loan::Model, DomainError> {
        if !self.policy.is_staff(caller) {
            return Err(DomainError::PermissionDenied);
        }

        let loan = self
            .loans
            .find_by_id(loan_id)
            .await?
            .ok_or(DomainError::NotFound)?;

        let now = chrono::Utc::now().to_rfc3339();
        if !self.loans.close_checked(loan_id, &now).await? {
            return Err(DomainError::Conflict("loan already returned".into()));
        }

        // Item leg. A missing item row means it was removed out-of-band; the
        // registry forbids deleting a held item, so this is defensive only
        // and stays a no-op rather than failing the close.
        if !self
            .items
            .set_status(loan.item_id, ItemStatus::Available)
            .await?
        {
            tracing::warn!(
                loan_id,
                item_id = loan.item_id,
                "loan closed but its item no longer exists"
            );
        }

        self.loans
            .find_by_id(loan_id)
            .await?
            .ok_or(DomainError::NotFound)
    }

    /// Pending loans joined with item name/code, for display.
    pub async fn list_active_loans(&self) -> Result<Vec<LoanWithItem>, DomainError> {
        self.list_loans(LoanFilter {
            status: Some(LoanStatus::Pending),
            item_id: None,
        })
        .await
    }

    /// Loan history matching the filter, most recent first.
    pub async fn list_loans(&self, filter: LoanFilter) -> Result<Vec<LoanWithItem>, DomainError> {
        let loans = self.loans.find_all(filter).await?;

        let item_ids: Vec<i32> = loans.iter().map(|l| l.item_id).collect();
        let item_map: HashMap<i32, (String, String)> = self
            .items
            .find_by_ids(item_ids)
            .await?
            .into_iter()
            .map(|item| (item.id, (item.name, item.code)))
            .collect();

        let result = loans
            .into_iter()
            .map(|loan| {
                let (item_name, item_code) = item_map
                    .get(&loan.item_id)
                    .cloned()
                    .unwrap_or_else(|| ("Unknown".to_string(), "Unknown".to_string()));

                LoanWithItem {
                    id: loan.id,
                    item_id: loan.item_id,
                    borrower_name: loan.borrower_name,
                    borrower_class: loan.borrower_class,
                    duration_days: loan.duration_days,
                    loan_date: loan.loan_date,
                    return_date: loan.return_date,
                    status: loan.status,
                    item_name,
                    item_code,
                }
            })
            .collect();

        Ok(result)
    }
}
