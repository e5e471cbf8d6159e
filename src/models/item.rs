use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "items")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub name: String,
    /// Inventory code, unique within the registry (e.g. "MKR-01").
    #[sea_orm(unique)]
    pub code: String,
    pub condition: ItemCondition,
    pub status: ItemStatus,
    pub created_at: String,
    pub updated_at: String,
}

/// Physical condition of the asset.
#[derive(Copy, Clone, Debug, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(None)")]
#[serde(rename_all = "snake_case")]
pub enum ItemCondition {
    #[sea_orm(string_value = "good")]
    Good,
    #[sea_orm(string_value = "minor_damage")]
    MinorDamage,
    #[sea_orm(string_value = "major_damage")]
    MajorDamage,
}

/// Availability status of an item.
///
/// `PendingApproval` and `OnLoan` both mean "unavailable, a loan holds this
/// item"; which one an item carries records whether a guest borrow or a staff
/// action put it there. Both are reserved for the loan engine: staff edits may
/// only move an item between `Available` and `InStorage`.
#[derive(Copy, Clone, Debug, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(None)")]
#[serde(rename_all = "snake_case")]
pub enum ItemStatus {
    #[sea_orm(string_value = "available")]
    Available,
    #[sea_orm(string_value = "pending_approval")]
    PendingApproval,
    #[sea_orm(string_value = "on_loan")]
    OnLoan,
    #[sea_orm(string_value = "in_storage")]
    InStorage,
}

impl ItemStatus {
    /// States only the loan engine may write.
    pub fn engine_reserved(self) -> bool {
        matches!(self, ItemStatus::PendingApproval | ItemStatus::OnLoan)
    }

    /// The transition table. Anything not listed here is an illegal move.
    pub fn can_transition_to(self, next: ItemStatus) -> bool {
        use ItemStatus::*;
        matches!(
            (self, next),
            // Borrow cycle (engine only)
            (Available, PendingApproval)
                | (PendingApproval, OnLoan)
                | (PendingApproval, Available)
                | (OnLoan, Available)
                // Staff shelving outside the loan cycle
                | (Available, InStorage)
                | (InStorage, Available)
        )
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ItemStatus::Available => "available",
            ItemStatus::PendingApproval => "pending_approval",
            ItemStatus::OnLoan => "on_loan",
            ItemStatus::InStorage => "in_storage",
        }
    }
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::loan::Entity")]
    Loan,
}

impl Related<super::loan::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Loan.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

#[cfg(test)]
mod tests {
    use super::ItemStatus::*;

    #[test]
    fn borrow_cycle_transitions_are_legal() {
        assert!(Available.can_transition_to(PendingApproval));
        assert!(PendingApproval.can_transition_to(OnLoan));
        assert!(PendingApproval.can_transition_to(Available));
        assert!(OnLoan.can_transition_to(Available));
    }

    #[test]
    fn shelving_transitions_are_legal() {
        assert!(Available.can_transition_to(InStorage));
        assert!(InStorage.can_transition_to(Available));
    }

    #[test]
    fn illegal_moves_are_rejected() {
        // Cannot borrow an item that is not on the shelf
        assert!(!InStorage.can_transition_to(PendingApproval));
        assert!(!InStorage.can_transition_to(OnLoan));
        assert!(!OnLoan.can_transition_to(PendingApproval));
        // Cannot shelve an item a loan holds
        assert!(!PendingApproval.can_transition_to(InStorage));
        assert!(!OnLoan.can_transition_to(InStorage));
        // Self-moves are not transitions
        assert!(!Available.can_transition_to(Available));
        assert!(!InStorage.can_transition_to(InStorage));
    }

    #[test]
    fn only_loan_holding_states_are_engine_reserved() {
        assert!(PendingApproval.engine_reserved());
        assert!(OnLoan.engine_reserved());
        assert!(!Available.engine_reserved());
        assert!(!InStorage.engine_reserved());
    }
}
