use std::collections::HashMap;

use chrono::{DateTime, Utc};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DbErr, EntityTrait, QueryFilter, QueryOrder,
    Set,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
    entities::{skill, skill_type, staff},
    models::ids,
};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Staff {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub skill_id: Uuid,
    pub is_leader: bool,
    pub created_at: DateTime<Utc>,
}

/// Roster row for the assignment grid: staff member plus the resolved skill
/// name and skill-type color used for cell tinting.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StaffWithSkill {
    pub id: Uuid,
    pub name: String,
    pub is_leader: bool,
    pub skill_name: String,
    pub skill_type_color: String,
}

#[derive(Debug, Deserialize)]
pub struct CreateStaff {
    pub name: String,
    pub email: String,
    pub skill_id: Uuid,
    #[serde(default)]
    pub is_leader: bool,
}

#[derive(Debug, Deserialize)]
pub struct UpdateStaff {
    pub name: Option<String>,
    pub email: Option<String>,
    pub skill_id: Option<Uuid>,
    pub is_leader: Option<bool>,
}

impl Staff {
    fn from_model(model: staff::Model, skill_id: Uuid) -> Self {
        Self {
            id: model.uuid,
            name: model.name,
            email: model.email,
            skill_id,
            is_leader: model.is_leader,
            created_at: model.created_at.into(),
        }
    }

    pub async fn find_all<C: ConnectionTrait>(db: &C) -> Result<Vec<Self>, DbErr> {
        let records = staff::Entity::find()
            .order_by_asc(staff::Column::Name)
            .all(db)
            .await?;

        let skill_uuids: HashMap<i64, Uuid> = skill::Entity::find()
            .all(db)
            .await?
            .into_iter()
            .map(|model| (model.id, model.uuid))
            .collect();

        let mut members = Vec::with_capacity(records.len());
        for model in records {
            let skill_uuid = skill_uuids
                .get(&model.skill_id)
                .copied()
                .ok_or(DbErr::RecordNotFound("Skill not found".to_string()))?;
            members.push(Self::from_model(model, skill_uuid));
        }
        Ok(members)
    }

    pub async fn find_by_id<C: ConnectionTrait>(db: &C, id: Uuid) -> Result<Option<Self>, DbErr> {
        let record = staff::Entity::find()
            .filter(staff::Column::Uuid.eq(id))
            .one(db)
            .await?;

        match record {
            Some(model) => {
                let skill_uuid = ids::skill_uuid_by_id(db, model.skill_id)
                    .await?
                    .ok_or(DbErr::RecordNotFound("Skill not found".to_string()))?;
                Ok(Some(Self::from_model(model, skill_uuid)))
            }
            None => Ok(None),
        }
    }

    /// Roster ordered by name, with skill name and skill-type color resolved.
    pub async fn find_all_with_skill<C: ConnectionTrait>(
        db: &C,
    ) -> Result<Vec<StaffWithSkill>, DbErr> {
        let records = staff::Entity::find()
            .order_by_asc(staff::Column::Name)
            .all(db)
            .await?;
        let skills: HashMap<i64, skill::Model> = skill::Entity::find()
            .all(db)
            .await?
            .into_iter()
            .map(|model| (model.id, model))
            .collect();
        let colors: HashMap<i64, String> = skill_type::Entity::find()
            .all(db)
            .await?
            .into_iter()
            .map(|model| (model.id, model.color))
            .collect();

        let mut roster = Vec::with_capacity(records.len());
        for model in records {
            let skill = skills
                .get(&model.skill_id)
                .ok_or(DbErr::RecordNotFound("Skill not found".to_string()))?;
            let color = colors
                .get(&skill.skill_type_id)
                .ok_or(DbErr::RecordNotFound("Skill type not found".to_string()))?;
            roster.push(StaffWithSkill {
                id: model.uuid,
                name: model.name,
                is_leader: model.is_leader,
                skill_name: skill.name.clone(),
                skill_type_color: color.clone(),
            });
        }
        Ok(roster)
    }

    pub async fn create<C: ConnectionTrait>(
        db: &C,
        data: &CreateStaff,
        id: Uuid,
    ) -> Result<Self, DbErr> {
        let skill_row_id = ids::skill_id_by_uuid(db, data.skill_id)
            .await?
            .ok_or(DbErr::RecordNotFound("Skill not found".to_string()))?;

        let active = staff::ActiveModel {
            uuid: Set(id),
            name: Set(data.name.clone()),
            email: Set(data.email.clone()),
            skill_id: Set(skill_row_id),
            is_leader: Set(data.is_leader),
            created_at: Set(Utc::now().into()),
            ..Default::default()
        };
        let model = active.insert(db).await?;
        Ok(Self::from_model(model, data.skill_id))
    }

    pub async fn update<C: ConnectionTrait>(
        db: &C,
        id: Uuid,
        data: &UpdateStaff,
    ) -> Result<Self, DbErr> {
        let record = staff::Entity::find()
            .filter(staff::Column::Uuid.eq(id))
            .one(db)
            .await?
            .ok_or(DbErr::RecordNotFound("Staff member not found".to_string()))?;

        let mut active: staff::ActiveModel = record.into();
        if let Some(name) = data.name.clone() {
            active.name = Set(name);
        }
        if let Some(email) = data.email.clone() {
            active.email = Set(email);
        }
        if let Some(skill_id) = data.skill_id {
            let skill_row_id = ids::skill_id_by_uuid(db, skill_id)
                .await?
                .ok_or(DbErr::RecordNotFound("Skill not found".to_string()))?;
            active.skill_id = Set(skill_row_id);
        }
        if let Some(is_leader) = data.is_leader {
            active.is_leader = Set(is_leader);
        }

        let updated = active.update(db).await?;
        let skill_uuid = ids::skill_uuid_by_id(db, updated.skill_id)
            .await?
            .ok_or(DbErr::RecordNotFound("Skill not found".to_string()))?;
        Ok(Self::from_model(updated, skill_uuid))
    }

    pub async fn delete<C: ConnectionTrait>(db: &C, id: Uuid) -> Result<u64, DbErr> {
        let result = staff::Entity::delete_many()
            .filter(staff::Column::Uuid.eq(id))
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
    use crate::models::{
        skill::{CreateSkill, Skill},
        skill_type::{CreateSkillType, SkillType},
    };

    async fn setup_db() -> sea_orm::DatabaseConnection {
        let db = Database::connect("sqlite::memory:").await.unwrap();
        db_migration::Migrator::up(&db, None).await.unwrap();
        db
    }

    async fn seed_skill(db: &sea_orm::DatabaseConnection, color: &str) -> Skill {
        let skill_type = SkillType::create(
            db,
            &CreateSkillType {
                name: "Band".to_string(),
                color: color.to_string(),
            },
            Uuid::new_v4(),
        )
        .await
        .unwrap();
        Skill::create(
            db,
            &CreateSkill {
                name: "Vocals".to_string(),
                skill_type_id: skill_type.id,
            },
            Uuid::new_v4(),
        )
        .await
        .unwrap()
    }

    #[tokio::test]
    async fn roster_resolves_skill_and_color() {
        let db = setup_db().await;
        let skill = seed_skill(&db, "#8b5cf6").await;

        Staff::create(
            &db,
            &CreateStaff {
                name: "Anna".to_string(),
                email: "anna@example.org".to_string(),
                skill_id: skill.id,
                is_leader: true,
            },
            Uuid::new_v4(),
        )
        .await
        .unwrap();

        let roster = Staff::find_all_with_skill(&db).await.unwrap();
        assert_eq!(roster.len(), 1);
        assert_eq!(roster[0].skill_name, "Vocals");
        assert_eq!(roster[0].skill_type_color, "#8b5cf6");
        assert!(roster[0].is_leader);
    }

    #[tokio::test]
    async fn find_all_orders_by_name() {
        let db = setup_db().await;
        let skill = seed_skill(&db, "#64748b").await;

        for name in ["Mia", "Ben", "Lena"] {
            Staff::create(
                &db,
                &CreateStaff {
                    name: name.to_string(),
                    email: format!("{}@example.org", name.to_lowercase()),
                    skill_id: skill.id,
                    is_leader: false,
                },
                Uuid::new_v4(),
            )
            .await
            .unwrap();
        }

        let members = Staff::find_all(&db).await.unwrap();
        let names: Vec<_> = members.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec!["Ben", "Lena", "Mia"]);
    }
}
