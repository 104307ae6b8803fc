use chrono::{DateTime, Utc};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DbErr, EntityTrait, QueryFilter, QueryOrder,
    Set,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
    entities::{event, survey_request, survey_request_event},
    models::{event::Event, ids},
};

/// One outstanding or completed availability ask, addressed to one staff
/// member about a fixed set of events. The token is the respondent's only
/// credential; a set `completed_at` makes the request terminal.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SurveyRequest {
    pub id: Uuid,
    pub token: String,
    pub staff_id: Uuid,
    pub sent_at: DateTime<Utc>,
    pub completed_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl SurveyRequest {
    fn from_model(model: survey_request::Model, staff_id: Uuid) -> Self {
        Self {
            id: model.uuid,
            token: model.token,
            staff_id,
            sent_at: model.sent_at.into(),
            completed_at: model.completed_at.map(Into::into),
            created_at: model.created_at.into(),
        }
    }

    pub fn is_completed(&self) -> bool {
        self.completed_at.is_some()
    }

    pub async fn create<C: ConnectionTrait>(
        db: &C,
        staff_id: Uuid,
        token: &str,
        id: Uuid,
    ) -> Result<Self, DbErr> {
        let staff_row_id = ids::staff_id_by_uuid(db, staff_id)
            .await?
            .ok_or(DbErr::RecordNotFound("Staff member not found".to_string()))?;

        let now = Utc::now();
        let active = survey_request::ActiveModel {
            uuid: Set(id),
            token: Set(token.to_string()),
            staff_id: Set(staff_row_id),
            sent_at: Set(now.into()),
            completed_at: Set(None),
            created_at: Set(now.into()),
            ..Default::default()
        };
        let model = active.insert(db).await?;
        Ok(Self::from_model(model, staff_id))
    }

    pub async fn find_by_id<C: ConnectionTrait>(db: &C, id: Uuid) -> Result<Option<Self>, DbErr> {
        let record = survey_request::Entity::find()
            .filter(survey_request::Column::Uuid.eq(id))
            .one(db)
            .await?;
        Self::resolve_staff(db, record).await
    }

    pub async fn find_by_token<C: ConnectionTrait>(
        db: &C,
        token: &str,
    ) -> Result<Option<Self>, DbErr> {
        let record = survey_request::Entity::find()
            .filter(survey_request::Column::Token.eq(token))
            .one(db)
            .await?;
        Self::resolve_staff(db, record).await
    }

    async fn resolve_staff<C: ConnectionTrait>(
        db: &C,
        record: Option<survey_request::Model>,
    ) -> Result<Option<Self>, DbErr> {
        match record {
            Some(model) => {
                let staff_uuid = ids::staff_uuid_by_id(db, model.staff_id)
                    .await?
                    .ok_or(DbErr::RecordNotFound("Staff member not found".to_string()))?;
                Ok(Some(Self::from_model(model, staff_uuid)))
            }
            None => Ok(None),
        }
    }

    /// Stamps `completed_at`, closing the request for further submissions.
    pub async fn mark_completed<C: ConnectionTrait>(db: &C, id: Uuid) -> Result<Self, DbErr> {
        let record = survey_request::Entity::find()
            .filter(survey_request::Column::Uuid.eq(id))
            .one(db)
            .await?
            .ok_or(DbErr::RecordNotFound("Survey request not found".to_string()))?;

        let staff_row_id = record.staff_id;
        let mut active: survey_request::ActiveModel = record.into();
        active.completed_at = Set(Some(Utc::now().into()));
        let updated = active.update(db).await?;

        let staff_uuid = ids::staff_uuid_by_id(db, staff_row_id)
            .await?
            .ok_or(DbErr::RecordNotFound("Staff member not found".to_string()))?;
        Ok(Self::from_model(updated, staff_uuid))
    }

    /// The events this request asks about, ordered by date ascending.
    pub async fn find_events<C: ConnectionTrait>(db: &C, id: Uuid) -> Result<Vec<Event>, DbErr> {
        let request_row_id = ids::survey_request_id_by_uuid(db, id)
            .await?
            .ok_or(DbErr::RecordNotFound("Survey request not found".to_string()))?;

        let links = survey_request_event::Entity::find()
            .filter(survey_request_event::Column::SurveyRequestId.eq(request_row_id))
            .all(db)
            .await?;
        if links.is_empty() {
            return Ok(Vec::new());
        }

        let event_row_ids: Vec<i64> = links.into_iter().map(|link| link.event_id).collect();
        let records = event::Entity::find()
            .filter(event::Column::Id.is_in(event_row_ids))
            .order_by_asc(event::Column::Date)
            .all(db)
            .await?;

        Ok(records
            .into_iter()
            .map(|model| Event {
                id: model.uuid,
                title: model.title,
                date: model.date,
                created_at: model.created_at.into(),
            })
            .collect())
    }
}

/// Join rows linking a survey request to the events it asks about. Created
/// once with the request and never mutated afterwards.
pub struct SurveyRequestEvent;

impl SurveyRequestEvent {
    pub async fn attach_many<C: ConnectionTrait>(
        db: &C,
        request_id: Uuid,
        event_ids: &[Uuid],
    ) -> Result<(), DbErr> {
        let request_row_id = ids::survey_request_id_by_uuid(db, request_id)
            .await?
            .ok_or(DbErr::RecordNotFound("Survey request not found".to_string()))?;

        for event_id in event_ids {
            let event_row_id = ids::event_id_by_uuid(db, *event_id)
                .await?
                .ok_or(DbErr::RecordNotFound("Event not found".to_string()))?;

            let active = survey_request_event::ActiveModel {
                uuid: Set(Uuid::new_v4()),
                survey_request_id: Set(request_row_id),
                event_id: Set(event_row_id),
                created_at: Set(Utc::now().into()),
                ..Default::default()
            };
            active.insert(db).await?;
        }
        Ok(())
    }
}
