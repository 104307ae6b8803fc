use chrono::{DateTime, NaiveDate, Utc};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DbErr, EntityTrait, QueryFilter, QueryOrder,
    Set,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::entities::event;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Event {
    pub id: Uuid,
    pub title: String,
    pub date: NaiveDate,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize)]
pub struct CreateEvent {
    pub title: String,
    pub date: NaiveDate,
}

#[derive(Debug, Deserialize)]
pub struct UpdateEvent {
    pub title: Option<String>,
    pub date: Option<NaiveDate>,
}

impl Event {
    fn from_model(model: event::Model) -> Self {
        Self {
            id: model.uuid,
            title: model.title,
            date: model.date,
            created_at: model.created_at.into(),
        }
    }

    pub async fn find_all<C: ConnectionTrait>(db: &C) -> Result<Vec<Self>, DbErr> {
        let records = event::Entity::find()
            .order_by_asc(event::Column::Date)
            .all(db)
            .await?;
        Ok(records.into_iter().map(Self::from_model).collect())
    }

    pub async fn find_by_id<C: ConnectionTrait>(db: &C, id: Uuid) -> Result<Option<Self>, DbErr> {
        let record = event::Entity::find()
            .filter(event::Column::Uuid.eq(id))
            .one(db)
            .await?;
        Ok(record.map(Self::from_model))
    }

    /// In-list lookup for a batch of event ids, ordered by date ascending.
    /// Unknown ids are dropped from the result rather than failing the call.
    pub async fn find_by_ids<C: ConnectionTrait>(db: &C, ids: &[Uuid]) -> Result<Vec<Self>, DbErr> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let records = event::Entity::find()
            .filter(event::Column::Uuid.is_in(ids.iter().copied()))
            .order_by_asc(event::Column::Date)
            .all(db)
            .await?;
        Ok(records.into_iter().map(Self::from_model).collect())
    }

    pub async fn create<C: ConnectionTrait>(
        db: &C,
        data: &CreateEvent,
        id: Uuid,
    ) -> Result<Self, DbErr> {
        let active = event::ActiveModel {
            uuid: Set(id),
            title: Set(data.title.clone()),
            date: Set(data.date),
            created_at: Set(Utc::now().into()),
            ..Default::default()
        };
        let model = active.insert(db).await?;
        Ok(Self::from_model(model))
    }

    pub async fn update<C: ConnectionTrait>(
        db: &C,
        id: Uuid,
        data: &UpdateEvent,
    ) -> Result<Self, DbErr> {
        let record = event::Entity::find()
            .filter(event::Column::Uuid.eq(id))
            .one(db)
            .await?
            .ok_or(DbErr::RecordNotFound("Event not found".to_string()))?;

        let mut active: event::ActiveModel = record.into();
        if let Some(title) = data.title.clone() {
            active.title = Set(title);
        }
        if let Some(date) = data.date {
            active.date = Set(date);
        }

        let updated = active.update(db).await?;
        Ok(Self::from_model(updated))
    }

    pub async fn delete<C: ConnectionTrait>(db: &C, id: Uuid) -> Result<u64, DbErr> {
        let result = event::Entity::delete_many()
            .filter(event::Column::Uuid.eq(id))
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

    fn date(s: &str) -> NaiveDate {
        s.parse().unwrap()
    }

    #[tokio::test]
    async fn find_all_orders_by_date_ascending() {
        let db = setup_db().await;

        for (title, day) in [
            ("Evening service", "2026-09-20"),
            ("Morning service", "2026-09-06"),
            ("Rehearsal", "2026-09-13"),
        ] {
            Event::create(
                &db,
                &CreateEvent {
                    title: title.to_string(),
                    date: date(day),
                },
                Uuid::new_v4(),
            )
            .await
            .unwrap();
        }

        let all = Event::find_all(&db).await.unwrap();
        let titles: Vec<_> = all.iter().map(|e| e.title.as_str()).collect();
        assert_eq!(titles, vec!["Morning service", "Rehearsal", "Evening service"]);
    }

    #[tokio::test]
    async fn find_by_ids_drops_unknown_ids() {
        let db = setup_db().await;

        let known = Event::create(
            &db,
            &CreateEvent {
                title: "Morning service".to_string(),
                date: date("2026-09-06"),
            },
            Uuid::new_v4(),
        )
        .await
        .unwrap();

        let found = Event::find_by_ids(&db, &[known.id, Uuid::new_v4()])
            .await
            .unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].id, known.id);
    }
}
