use chrono::{DateTime, Utc};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DbErr, EntityTrait, QueryFilter, QueryOrder,
    Set,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::entities::skill_type;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SkillType {
    pub id: Uuid,
    pub name: String,
    pub color: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize)]
pub struct CreateSkillType {
    pub name: String,
    pub color: String,
}

#[derive(Debug, Deserialize)]
pub struct UpdateSkillType {
    pub name: Option<String>,
    pub color: Option<String>,
}

impl SkillType {
    fn from_model(model: skill_type::Model) -> Self {
        Self {
            id: model.uuid,
            name: model.name,
            color: model.color,
            created_at: model.created_at.into(),
        }
    }

    pub async fn find_all<C: ConnectionTrait>(db: &C) -> Result<Vec<Self>, DbErr> {
        let records = skill_type::Entity::find()
            .order_by_asc(skill_type::Column::Name)
            .all(db)
            .await?;
        Ok(records.into_iter().map(Self::from_model).collect())
    }

    pub async fn find_by_id<C: ConnectionTrait>(db: &C, id: Uuid) -> Result<Option<Self>, DbErr> {
        let record = skill_type::Entity::find()
            .filter(skill_type::Column::Uuid.eq(id))
            .one(db)
            .await?;
        Ok(record.map(Self::from_model))
    }

    pub async fn create<C: ConnectionTrait>(
        db: &C,
        data: &CreateSkillType,
        id: Uuid,
    ) -> Result<Self, DbErr> {
        let active = skill_type::ActiveModel {
            uuid: Set(id),
            name: Set(data.name.clone()),
            color: Set(data.color.clone()),
            created_at: Set(Utc::now().into()),
            ..Default::default()
        };
        let model = active.insert(db).await?;
        Ok(Self::from_model(model))
    }

    pub async fn update<C: ConnectionTrait>(
        db: &C,
        id: Uuid,
        data: &UpdateSkillType,
    ) -> Result<Self, DbErr> {
        let record = skill_type::Entity::find()
            .filter(skill_type::Column::Uuid.eq(id))
            .one(db)
            .await?
            .ok_or(DbErr::RecordNotFound("Skill type not found".to_string()))?;

        let mut active: skill_type::ActiveModel = record.into();
        if let Some(name) = data.name.clone() {
            active.name = Set(name);
        }
        if let Some(color) = data.color.clone() {
            active.color = Set(color);
        }

        let updated = active.update(db).await?;
        Ok(Self::from_model(updated))
    }

    pub async fn delete<C: ConnectionTrait>(db: &C, id: Uuid) -> Result<u64, DbErr> {
        let result = skill_type::Entity::delete_many()
            .filter(skill_type::Column::Uuid.eq(id))
            .exec(db)
            .await?;
        Ok(result.rows_affected)
    }
}

#[cfg(test)]
mod tests {
    use sea_orm::Database;
    use sea_orm_migration::MigratorTrait;

    use super::*;

    async fn setup_db() -> sea_orm::DatabaseConnection {
        let db = Database::connect("sqlite::memory:").await.unwrap();
        db_migration::Migrator::up(&db, None).await.unwrap();
        db
    }

    #[tokio::test]
    async fn create_update_delete_round_trip() {
        let db = setup_db().await;

        let created = SkillType::create(
            &db,
            &CreateSkillType {
                name: "Tech".to_string(),
                color: "#0ea5e9".to_string(),
            },
            Uuid::new_v4(),
        )
        .await
        .unwrap();

        let updated = SkillType::update(
            &db,
            created.id,
            &UpdateSkillType {
                name: None,
                color: Some("#ef4444".to_string()),
            },
        )
        .await
        .unwrap();
        assert_eq!(updated.name, "Tech");
        assert_eq!(updated.color, "#ef4444");

        let rows = SkillType::delete(&db, created.id).await.unwrap();
        assert_eq!(rows, 1);
        assert!(SkillType::find_by_id(&db, created.id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn find_all_orders_by_name() {
        let db = setup_db().await;

        for name in ["Welcome", "Band", "Tech"] {
            SkillType::create(
                &db,
                &CreateSkillType {
                    name: name.to_string(),
                    color: "#64748b".to_string(),
                },
                Uuid::new_v4(),
            )
            .await
            .unwrap();
        }

        let all = SkillType::find_all(&db).await.unwrap();
        let names: Vec<_> = all.iter().map(|t| t.name.as_str()).collect();
        assert_eq!(names, vec!["Band", "Tech", "Welcome"]);
    }
}
