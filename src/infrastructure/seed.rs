use sea_orm::{ActiveModelTrait, DatabaseConnection, DbErr, EntityTrait, Set};

use crate::auth::hash_password;
use crate::models::{item, user};

/// Seed a staff account and a handful of classroom assets. Skipped when the
/// tables already hold data.
pub async fn seed_demo_data(db: &DatabaseConnection) -> Result<(), DbErr> {
    let now = chrono::Utc::now().to_rfc3339();

    if user::Entity::find().one(db).await?.is_none() {
        let staff_password = hash_password("admin").map_err(DbErr::Custom)?;
        let staff = user::ActiveModel {
            username: Set("admin".to_owned()),
            password_hash: Set(staff_password),
            role: Set("staff".to_owned()),
            created_at: Set(now.clone()),
            updated_at: Set(now.clone()),
            ..Default::default()
        };
        staff.insert(db).await?;
    }

    if item::Entity::find().one(db).await?.is_none() {
        let demo_items = [
            ("Mikroskop", "MKR-01", item::ItemCondition::Good),
            ("Proyektor", "PRJ-01", item::ItemCondition::Good),
            ("Globe", "GLB-01", item::ItemCondition::MinorDamage),
            ("Torso Anatomi", "TRS-01", item::ItemCondition::Good),
            ("Papan Catur", "CTR-01", item::ItemCondition::MajorDamage),
        ];

        for (name, code, condition) in demo_items {
            let model = item::ActiveModel {
                name: Set(name.to_owned()),
                code: Set(code.to_owned()),
                condition: Set(condition),
                status: Set(item::ItemStatus::Available),
                created_at: Set(now.clone()),
                updated_at: Set(now.clone()),
                ..Default::default()
            };
            model.insert(db).await?;
        }
    }

    Ok(())
}
