use sea_orm::{ColumnTrait, ConnectionTrait, DbErr, EntityTrait, QueryFilter, QuerySelect};
use uuid::Uuid;

use crate::entities::{event, skill, skill_type, staff, survey_request};

pub async fn skill_type_id_by_uuid<C: ConnectionTrait>(
    db: &C,
    uuid: Uuid,
) -> Result<Option<i64>, DbErr> {
    skill_type::Entity::find()
        .select_only()
        .column(skill_type::Column::Id)
        .filter(skill_type::Column::Uuid.eq(uuid))
        .into_tuple()
        .one(db)
        .await
}

pub async fn skill_type_uuid_by_id<C: ConnectionTrait>(
    db: &C,
    id: i64,
) -> Result<Option<Uuid>, DbErr> {
    skill_type::Entity::find()
        .select_only()
        .column(skill_type::Column::Uuid)
        .filter(skill_type::Column::Id.eq(id))
        .into_tuple()
        .one(db)
        .await
}

pub async fn skill_id_by_uuid<C: ConnectionTrait>(
    db: &C,
    uuid: Uuid,
) -> Result<Option<i64>, DbErr> {
    skill::Entity::find()
        .select_only()
        .column(skill::Column::Id)
        .filter(skill::Column::Uuid.eq(uuid))
        .into_tuple()
        .one(db)
        .await
}

pub async fn skill_uuid_by_id<C: ConnectionTrait>(
    db: &C,
    id: i64,
) -> Result<Option<Uuid>, DbErr> {
    skill::Entity::find()
        .select_only()
        .column(skill::Column::Uuid)
        .filter(skill::Column::Id.eq(id))
        .into_tuple()
        .one(db)
        .await
}

pub async fn staff_id_by_uuid<C: ConnectionTrait>(
    db: &C,
    uuid: Uuid,
) -> Result<Option<i64>, DbErr> {
    staff::Entity::find()
        .select_only()
        .column(staff::Column::Id)
        .filter(staff::Column::Uuid.eq(uuid))
        .into_tuple()
        .one(db)
        .await
}

pub async fn staff_uuid_by_id<C: ConnectionTrait>(
    db: &C,
    id: i64,
) -> Result<Option<Uuid>, DbErr> {
    staff::Entity::find()
        .select_only()
        .column(staff::Column::Uuid)
        .filter(staff::Column::Id.eq(id))
        .into_tuple()
        .one(db)
        .await
}

pub async fn event_id_by_uuid<C: ConnectionTrait>(
    db: &C,
    uuid: Uuid,
) -> Result<Option<i64>, DbErr> {
    event::Entity::find()
        .select_only()
        .column(event::Column::Id)
        .filter(event::Column::Uuid.eq(uuid))
        .into_tuple()
        .one(db)
        .await
}

pub async fn event_uuid_by_id<C: ConnectionTrait>(
    db: &C,
    id: i64,
) -> Result<Option<Uuid>, DbErr> {
    event::Entity::find()
        .select_only()
        .column(event::Column::Uuid)
        .filter(event::Column::Id.eq(id))
        .into_tuple()
        .one(db)
        .await
}

pub async fn survey_request_id_by_uuid<C: ConnectionTrait>(
    db: &C,
    uuid: Uuid,
) -> Result<Option<i64>, DbErr> {
    survey_request::Entity::find()
        .select_only()
        .column(survey_request::Column::Id)
        .filter(survey_request::Column::Uuid.eq(uuid))
        .into_tuple()
        .one(db)
        .await
}

pub async fn survey_request_uuid_by_id<C: ConnectionTrait>(
    db: &C,
    id: i64,
) -> Result<Option<Uuid>, DbErr> {
    survey_request::Entity::find()
        .select_only()
        .column(survey_request::Column::Uuid)
        .filter(survey_request::Column::Id.eq(id))
        .into_tuple()
        .one(db)
        .await
}

#[cfg(test)]
mod tests {
    use chrono::Utc;
    use sea_orm::{ActiveModelTrait, Database, Set};
    use sea_orm_migration::MigratorTrait;

    use super::*;

    async fn setup_db() -> sea_orm::DatabaseConnection {
        let db = Database::connect("sqlite::memory:").await.unwrap();
        db_migration::Migrator::up(&db, None).await.unwrap();
        db
    }

    #[tokio::test]
    async fn unknown_uuid_resolves_to_none() {
        let db = setup_db().await;
        let resolved = staff_id_by_uuid(&db, Uuid::new_v4()).await.unwrap();
        assert!(resolved.is_none());
    }

    #[tokio::test]
    async fn uuid_and_row_id_round_trip() {
        let db = setup_db().await;

        let uuid = Uuid::new_v4();
        let model = skill_type::ActiveModel {
            uuid: Set(uuid),
            name: Set("Band".to_string()),
            color: Set("#f59e0b".to_string()),
            created_at: Set(Utc::now().into()),
            ..Default::default()
        }
        .insert(&db)
        .await
        .unwrap();

        let row_id = skill_type_id_by_uuid(&db, uuid).await.unwrap().unwrap();
        assert_eq!(row_id, model.id);
        let round_tripped = skill_type_uuid_by_id(&db, row_id).await.unwrap().unwrap();
        assert_eq!(round_tripped, uuid);
    }
}
