use chrono::{DateTime, Utc};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DbErr, EntityTrait, QueryFilter, QueryOrder,
    Set,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{entities::skill, models::ids};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Skill {
    pub id: Uuid,
    pub name: String,
    pub skill_type_id: Uuid,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize)]
pub struct CreateSkill {
    pub name: String,
    pub skill_type_id: Uuid,
}

#[derive(Debug, Deserialize)]
pub struct UpdateSkill {
    pub name: Option<String>,
    pub skill_type_id: Option<Uuid>,
}

impl Skill {
    fn from_model(model: skill::Model, skill_type_id: Uuid) -> Self {
        Self {
            id: model.uuid,
            name: model.name,
            skill_type_id,
            created_at: model.created_at.into(),
        }
    }

    pub async fn find_all<C: ConnectionTrait>(db: &C) -> Result<Vec<Self>, DbErr> {
        let records = skill::Entity::find()
            .order_by_asc(skill::Column::Name)
            .all(db)
            .await?;

        let mut skills = Vec::with_capacity(records.len());
        for model in records {
            let skill_type_uuid = ids::skill_type_uuid_by_id(db, model.skill_type_id)
                .await?
                .ok_or(DbErr::RecordNotFound("Skill type not found".to_string()))?;
            skills.push(Self::from_model(model, skill_type_uuid));
        }
        Ok(skills)
    }

    pub async fn find_by_id<C: ConnectionTrait>(db: &C, id: Uuid) -> Result<Option<Self>, DbErr> {
        let record = skill::Entity::find()
            .filter(skill::Column::Uuid.eq(id))
            .one(db)
            .await?;

        match record {
            Some(model) => {
                let skill_type_uuid = ids::skill_type_uuid_by_id(db, model.skill_type_id)
                    .await?
                    .ok_or(DbErr::RecordNotFound("Skill type not found".to_string()))?;
                Ok(Some(Self::from_model(model, skill_type_uuid)))
            }
            None => Ok(None),
        }
    }

    pub async fn create<C: ConnectionTrait>(
        db: &C,
        data: &CreateSkill,
        id: Uuid,
    ) -> Result<Self, DbErr> {
        let skill_type_row_id = ids::skill_type_id_by_uuid(db, data.skill_type_id)
            .await?
            .ok_or(DbErr::RecordNotFound("Skill type not found".to_string()))?;

        let active = skill::ActiveModel {
            uuid: Set(id),
            name: Set(data.name.clone()),
            skill_type_id: Set(skill_type_row_id),
            created_at: Set(Utc::now().into()),
            ..Default::default()
        };
        let model = active.insert(db).await?;
        Ok(Self::from_model(model, data.skill_type_id))
    }

    pub async fn update<C: ConnectionTrait>(
        db: &C,
        id: Uuid,
        data: &UpdateSkill,
    ) -> Result<Self, DbErr> {
        let record = skill::Entity::find()
            .filter(skill::Column::Uuid.eq(id))
            .one(db)
            .await?
            .ok_or(DbErr::RecordNotFound("Skill not found".to_string()))?;

        let mut active: skill::ActiveModel = record.into();
        if let Some(name) = data.name.clone() {
            active.name = Set(name);
        }
        if let Some(skill_type_id) = data.skill_type_id {
            let skill_type_row_id = ids::skill_type_id_by_uuid(db, skill_type_id)
                .await?
                .ok_or(DbErr::RecordNotFound("Skill type not found".to_string()))?;
            active.skill_type_id = Set(skill_type_row_id);
        }

        let updated = active.update(db).await?;
        let skill_type_uuid = ids::skill_type_uuid_by_id(db, updated.skill_type_id)
            .await?
            .ok_or(DbErr::RecordNotFound("Skill type not found".to_string()))?;
        Ok(Self::from_model(updated, skill_type_uuid))
    }

    pub async fn delete<C: ConnectionTrait>(db: &C, id: Uuid) -> Result<u64, DbErr> {
        let result = skill::Entity::delete_many()
            .filter(skill::Column::Uuid.eq(id))
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
    use crate::models::skill_type::{CreateSkillType, SkillType};

    async fn setup_db() -> sea_orm::DatabaseConnection {
        let db = Database::connect("sqlite::memory:").await.unwrap();
        db_migration::Migrator::up(&db, None).await.unwrap();
        db
    }

    #[tokio::test]
    async fn create_resolves_skill_type_reference() {
        let db = setup_db().await;

        let skill_type = SkillType::create(
            &db,
            &CreateSkillType {
                name: "Band".to_string(),
                color: "#f59e0b".to_string(),
            },
            Uuid::new_v4(),
        )
        .await
        .unwrap();

        let skill = Skill::create(
            &db,
            &CreateSkill {
                name: "Drums".to_string(),
                skill_type_id: skill_type.id,
            },
            Uuid::new_v4(),
        )
        .await
        .unwrap();

        let reloaded = Skill::find_by_id(&db, skill.id).await.unwrap().unwrap();
        assert_eq!(reloaded.skill_type_id, skill_type.id);
    }

    #[tokio::test]
    async fn create_with_unknown_skill_type_fails() {
        let db = setup_db().await;

        let result = Skill::create(
            &db,
            &CreateSkill {
                name: "Drums".to_string(),
                skill_type_id: Uuid::new_v4(),
            },
            Uuid::new_v4(),
        )
        .await;
        assert!(matches!(result, Err(DbErr::RecordNotFound(_))));
    }
}
