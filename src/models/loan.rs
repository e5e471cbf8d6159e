use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// One borrowing episode for an item. Loans are never deleted; a returned
/// loan stays as history with `return_date` set.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "loans")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub item_id: i32,
    pub borrower_name: String,
    pub borrower_class: String,
    /// Requested loan length in days, at least 1.
    pub duration_days: i32,
    pub loan_date: String,
    pub return_date: Option<String>,
    pub status: LoanStatus,
    pub created_at: String,
    pub updated_at: String,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(None)")]
#[serde(rename_all = "snake_case")]
pub enum LoanStatus {
    #[sea_orm(string_value = "pending")]
    Pending,
    /// Terminal. A returned loan is never reopened.
    #[sea_orm(string_value = "returned")]
    Returned,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::item::Entity",
        from = "Column::ItemId",
        to = "super::item::Column::Id",
        on_update = "NoAction",
        on_delete = "NoAction"
    )]
    Item,
}

impl Related<super::item::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Item.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
