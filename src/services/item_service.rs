//! Item Registry - item management without the HTTP layer
//!
//! Sole writer of `name`/`code`/`condition`, and of `status` for the staff
//! shelving moves (`Available` <-> `InStorage`). The borrow/return statuses
//! belong to the loan engine and are rejected here.

use std::sync::Arc;

use serde::Serialize;

use crate::domain::{
    AccessPolicy, Caller, CreateItemInput, DomainError, ItemRepository, UpdateItemInput,
};
use crate::models::item::{self, ItemCondition, ItemStatus};

/// Status and condition counts for the dashboard snapshot.
#[derive(Debug, Default, Clone, Serialize)]
pub struct InventorySummary {
    pub total: u64,
    pub available: u64,
    pub pending_approval: u64,
    pub on_loan: u64,
    pub in_storage: u64,
    pub condition_good: u64,
    pub condition_minor_damage: u64,
    pub condition_major_damage: u64,
}

#[derive(Clone)]
pub struct ItemService {
    items: Arc<dyn ItemRepository>,
    policy: Arc<dyn AccessPolicy>,
}

impl ItemService {
    pub fn new(items: Arc<dyn ItemRepository>, policy: Arc<dyn AccessPolicy>) -> Self {
        Self { items, policy }
    }

    fn require_staff(&self, caller: &Caller) -> Result<(), DomainError> {
        if self.policy.is_staff(caller) {
            Ok(())
        } else {
            Err(DomainError::PermissionDenied)
        }
    }

    /// Register a new item. Starts `Available`.
    pub async fn create_item(
        &self,
        caller: &Caller,
        input: CreateItemInput,
    ) -> Result<item::Model, DomainError> {
        self.require_staff(caller)?;

        let name = input.name.trim().to_owned();
        let code = input.code.trim().to_owned();
        if name.is_empty() {
            return Err(DomainError::Validation("item name must not be empty".into()));
        }
        if code.is_empty() {
            return Err(DomainError::Validation("item code must not be empty".into()));
        }

        // Friendly pre-check; the unique index on `code` is the authority
        // when two creates race.
        if self.items.find_by_code(&code).await?.is_some() {
            return Err(DomainError::DuplicateCode(code));
        }

        self.items
            .insert(CreateItemInput {
                name,
                code,
                condition: input.condition,
            })
            .await
    }

    /// Partial update of name/code/condition/status.
    ///
    /// Status writes here are the staff shelving path only: the target must
    /// be `Available` or `InStorage`, the move must be in the transition
    /// table, and the write is guarded on the status the staff member saw so
    /// a racing borrow wins cleanly.
    pub async fn update_item(
        &self,
        caller: &Caller,
        id: i32,
        changes: UpdateItemInput,
    ) -> Result<item::Model, DomainError> {
        self.require_staff(caller)?;

        if changes.is_empty() {
            return Err(DomainError::Validation("no fields to update".into()));
        }
        if let Some(name) = &changes.name {
            if name.trim().is_empty() {
                return Err(DomainError::Validation("item name must not be empty".into()));
            }
        }
        if let Some(code) = &changes.code {
            if code.trim().is_empty() {
                return Err(DomainError::Validation("item code must not be empty".into()));
            }
        }

        let current = self
            .items
            .find_by_id(id)
            .await?
            .ok_or(DomainError::NotFound)?;

        if let Some(code) = &changes.code {
            if let Some(other) = self.items.find_by_code(code.trim()).await? {
                if other.id != id {
                    return Err(DomainError::DuplicateCode(code.trim().to_owned()));
                }
            }
        }

        let mut changes = UpdateItemInput {
            name: changes.name.map(|n| n.trim().to_owned()),
            code: changes.code.map(|c| c.trim().to_owned()),
            condition: changes.condition,
            status: changes.status,
        };

        let expected_status = match changes.status {
            Some(next) if next != current.status => {
                if next.engine_reserved() {
                    return Err(DomainError::InvalidTransition(format!(
                        "status '{}' is set by the loan engine, not by item edits",
                        next.as_str()
                    )));
                }
                if current.status.engine_reserved() {
                    // Releasing a held item is closeLoan's job, not an edit's.
                    return Err(DomainError::InvalidTransition(format!(
                        "item is {}, its status belongs to the loan engine",
                        current.status.as_str()
                    )));
                }
                if !current.status.can_transition_to(next) {
                    return Err(DomainError::InvalidTransition(format!(
                        "'{}' -> '{}'",
                        current.status.as_str(),
                        next.as_str()
                    )));
                }
                // Guard on what we read: if a borrow slips in between, the
                // write misses and surfaces as a conflict below.
                Some(current.status)
            }
            Some(_) => {
                // Same status requested; drop it from the write.
                changes.status = None;
                None
            }
            None => None,
        };

        let updated = self.items.update_checked(id, changes, expected_status).await?;
        if !updated {
            return match self.items.find_by_id(id).await? {
                None => Err(DomainError::NotFound),
                Some(_) => Err(DomainError::Conflict(
                    "item changed concurrently, re-read and retry the edit".into(),
                )),
            };
        }

        self.items
            .find_by_id(id)
            .await?
            .ok_or(DomainError::NotFound)
    }

    /// Remove an item. Only permitted while `Available`; an item held by a
    /// pending loan cannot be deleted.
    pub async fn delete_item(&self, caller: &Caller, id: i32) -> Result<(), DomainError> {
        self.require_staff(caller)?;

        if self.items.delete_available(id).await? {
            return Ok(());
        }

        match self.items.find_by_id(id).await? {
            None => Err(DomainError::NotFound),
            Some(item) => Err(DomainError::Conflict(format!(
                "item is {} and cannot be deleted",
                item.status.as_str()
            ))),
        }
    }

    /// Read-only snapshot of all items, newest first.
    pub async fn list_items(&self) -> Result<Vec<item::Model>, DomainError> {
        self.items.find_all().await
    }

    pub async fn get_item(&self, id: i32) -> Result<item::Model, DomainError> {
        self.items
            .find_by_id(id)
            .await?
            .ok_or(DomainError::NotFound)
    }

    /// Counts per status and per condition.
    pub async fn inventory_summary(&self) -> Result<InventorySummary, DomainError> {
        let items = self.items.find_all().await?;

        let mut summary = InventorySummary::default();
        for item in &items {
            summary.total += 1;
            match item.status {
                ItemStatus::Available => summary.available += 1,
                ItemStatus::PendingApproval => summary.pending_approval += 1,
                ItemStatus::OnLoan => summary.on_loan += 1,
                ItemStatus::InStorage => summary.in_storage += 1,
            }
            match item.condition {
                ItemCondition::Good => summary.condition_good += 1,
                ItemCondition::MinorDamage => summary.condition_minor_damage += 1,
                ItemCondition::MajorDamage => summary.condition_major_damage += 1,
            }
        }
        Ok(summary)
    }
}
