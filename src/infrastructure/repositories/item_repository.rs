//! SeaORM implementation of ItemRepository

use async_trait::async_trait;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter,
    QueryOrder, Set,
};

use crate::domain::{CreateItemInput, DomainError, ItemRepository, UpdateItemInput};
use crate::models::item::{self, ActiveModel, Column, Entity as ItemEntity, ItemStatus};

/// SQLite reports unique-index rejections as an execution error; the message
/// is stable enough to classify on.
fn is_unique_violation(err: &DbErr) -> bool {
    err.to_string().contains("UNIQUE constraint failed")
}

pub struct SeaOrmItemRepository {
    db: DatabaseConnection,
}

impl SeaOrmItemRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl ItemRepository for SeaOrmItemRepository {
    async fn find_all(&self) -> Result<Vec<item::Model>, DomainError> {
        let items = ItemEntity::find()
            .order_by_desc(Column::Id)
            .all(&self.db)
            .await?;
        Ok(items)
    }

    async fn find_by_id(&self, id: i32) -> Result<Option<item::Model>, DomainError> {
        Ok(ItemEntity::find_by_id(id).one(&self.db).await?)
    }

    async fn find_by_ids(&self, ids: Vec<i32>) -> Result<Vec<item::Model>, DomainError> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        let items = ItemEntity::find()
            .filter(Column::Id.is_in(ids))
            .all(&self.db)
            .await?;
        Ok(items)
    }

    async fn find_by_code(&self, code: &str) -> Result<Option<item::Model>, DomainError> {
        Ok(ItemEntity::find()
            .filter(Column::Code.eq(code))
            .one(&self.db)
            .await?)
    }

    async fn insert(&self, input: CreateItemInput) -> Result<item::Model, DomainError> {
        let now = chrono::Utc::now().to_rfc3339();

        let new_item = ActiveModel {
            name: Set(input.name),
            code: Set(input.code.clone()),
            condition: Set(input.condition),
            status: Set(ItemStatus::Available),
            created_at: Set(now.clone()),
            updated_at: Set(now),
            ..Default::default()
        };

        match new_item.insert(&self.db).await {
            Ok(model) => Ok(model),
            Err(e) if is_unique_violation(&e) => Err(DomainError::DuplicateCode(input.code)),
            Err(e) => Err(e.into()),
        }
    }

    async fn update_checked(
        &self,
        id: i32,
        changes: UpdateItemInput,
        expected_status: Option<ItemStatus>,
    ) -> Result<bool, DomainError> {
        let code = changes.code.clone();

        let mut active = ActiveModel {
            updated_at: Set(chrono::Utc::now().to_rfc3339()),
            ..Default::default()
        };
        if let Some(name) = changes.name {
            active.name = Set(name);
        }
        if let Some(code) = changes.code {
            active.code = Set(code);
        }
        if let Some(condition) = changes.condition {
            active.condition = Set(condition);
        }
        if let Some(status) = changes.status {
            active.status = Set(status);
        }

        let mut update = ItemEntity::update_many()
            .set(active)
            .filter(Column::Id.eq(id));
        if let Some(expected) = expected_status {
            update = update.filter(Column::Status.eq(expected));
        }

        match update.exec(&self.db).await {
            Ok(res) => Ok(res.rows_affected == 1),
            Err(e) if is_unique_violation(&e) => {
                Err(DomainError::DuplicateCode(code.unwrap_or_default()))
            }
            Err(e) => Err(e.into()),
        }
    }

    async fn set_status_checked(
        &self,
        id: i32,
        expected: ItemStatus,
        next: ItemStatus,
    ) -> Result<bool, DomainError> {
        let res = ItemEntity::update_many()
            .set(ActiveModel {
                status: Set(next),
                updated_at: Set(chrono::Utc::now().to_rfc3339()),
                ..Default::default()
            })
            .filter(Column::Id.eq(id))
            .filter(Column::Status.eq(expected))
            .exec(&self.db)
            .await?;

        Ok(res.rows_affected == 1)
    }

    async fn set_status(&self, id: i32, next: ItemStatus) -> Result<bool, DomainError> {
        let res = ItemEntity::update_many()
            .set(ActiveModel {
                status: Set(next),
                updated_at: Set(chrono::Utc::now().to_rfc3339()),
                ..Default::default()
            })
            .filter(Column::Id.eq(id))
            .exec(&self.db)
            .await?;

        Ok(res.rows_affected == 1)
    }

    async fn delete_available(&self, id: i32) -> Result<bool, DomainError> {
        let res = ItemEntity::delete_many()
            .filter(Column::Id.eq(id))
            .filter(Column::Status.eq(ItemStatus::Available))
            .exec(&self.db)
            .await?;

        Ok(res.rows_affected == 1)
    }
}
