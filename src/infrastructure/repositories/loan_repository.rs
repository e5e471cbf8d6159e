//! SeaORM implementation of LoanRepository

use async_trait::async_trait;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set,
};

use crate::domain::{DomainError, LoanFilter, LoanRepository, SubmitLoanInput};
use crate::models::loan::{self, ActiveModel, Column, Entity as LoanEntity, LoanStatus};

pub struct SeaOrmLoanRepository {
    db: DatabaseConnection,
}

impl SeaOrmLoanRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl LoanRepository for SeaOrmLoanRepository {
    async fn insert(&self, input: SubmitLoanInput) -> Result<loan::Model, DomainError> {
        let now = chrono::Utc::now().to_rfc3339();

        let new_loan = ActiveModel {
            item_id: Set(input.item_id),
            borrower_name: Set(input.borrower_name),
            borrower_class: Set(input.borrower_class),
            duration_days: Set(input.duration_days),
            loan_date: Set(now.clone()),
            return_date: Set(None),
            status: Set(LoanStatus::Pending),
            created_at: Set(now.clone()),
            updated_at: Set(now),
            ..Default::default()
        };

        Ok(new_loan.insert(&self.db).await?)
    }

    async fn find_by_id(&self, id: i32) -> Result<Option<loan::Model>, DomainError> {
        Ok(LoanEntity::find_by_id(id).one(&self.db).await?)
    }

    async fn find_all(&self, filter: LoanFilter) -> Result<Vec<loan::Model>, DomainError> {
        let mut query = LoanEntity::find();

        if let Some(status) = filter.status {
            query = query.filter(Column::Status.eq(status));
        }
        if let Some(item_id) = filter.item_id {
            query = query.filter(Column::ItemId.eq(item_id));
        }

        let loans = query
            .order_by_desc(Column::LoanDate)
            .order_by_desc(Column::Id)
            .all(&self.db)
            .await?;
        Ok(loans)
    }

    async fn close_checked(&self, id: i32, return_date: &str) -> Result<bool, DomainError> {
        let res = LoanEntity::update_many()
            .set(ActiveModel {
                status: Set(LoanStatus::Returned),
                return_date: Set(Some(return_date.to_owned())),
                updated_at: Set(chrono::Utc::now().to_rfc3339()),
                ..Default::default()
            })
            .filter(Column::Id.eq(id))
            .filter(Column::Status.eq(LoanStatus::Pending))
            .exec(&self.db)
            .await?;

        Ok(res.rows_affected == 1)
    }
}
