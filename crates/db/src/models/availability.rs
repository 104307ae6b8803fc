use std::collections::HashMap;

use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DbErr, EntityTrait, QueryFilter, QueryOrder,
    Set,
};
use uuid::Uuid;

use crate::{
    entities::{event, staff, staff_availability, survey_request},
    models::ids,
};

/// Per-(survey request, event) availability facts recorded by respondents.
/// Rows are owned by their survey request; the unique (request, event) pair
/// makes the upsert idempotent.
pub struct Availability;

impl Availability {
    /// Writes the respondent's answer for one event, replacing any earlier
    /// answer from the same request. Safe to repeat with the same value.
    pub async fn upsert<C: ConnectionTrait>(
        db: &C,
        request_id: Uuid,
        event_id: Uuid,
        is_available: bool,
    ) -> Result<(), DbErr> {
        let request_row_id = ids::survey_request_id_by_uuid(db, request_id)
            .await?
            .ok_or(DbErr::RecordNotFound("Survey request not found".to_string()))?;
        let event_row_id = ids::event_id_by_uuid(db, event_id)
            .await?
            .ok_or(DbErr::RecordNotFound("Event not found".to_string()))?;

        let existing = staff_availability::Entity::find()
            .filter(staff_availability::Column::SurveyRequestId.eq(request_row_id))
            .filter(staff_availability::Column::EventId.eq(event_row_id))
            .one(db)
            .await?;

        match existing {
            Some(record) => {
                let mut active: staff_availability::ActiveModel = record.into();
                active.is_available = Set(is_available);
                active.update(db).await?;
            }
            None => {
                let active = staff_availability::ActiveModel {
                    uuid: Set(Uuid::new_v4()),
                    survey_request_id: Set(request_row_id),
                    event_id: Set(event_row_id),
                    is_available: Set(is_available),
                    created_at: Set(Utc::now().into()),
                    ..Default::default()
                };
                active.insert(db).await?;
            }
        }
        Ok(())
    }

    /// Answers already saved for one request, keyed by event id. Supports
    /// resuming a partially filled form.
    pub async fn find_by_request<C: ConnectionTrait>(
        db: &C,
        request_id: Uuid,
    ) -> Result<HashMap<Uuid, bool>, DbErr> {
        let request_row_id = ids::survey_request_id_by_uuid(db, request_id)
            .await?
            .ok_or(DbErr::RecordNotFound("Survey request not found".to_string()))?;

        let rows = staff_availability::Entity::find()
            .filter(staff_availability::Column::SurveyRequestId.eq(request_row_id))
            .all(db)
            .await?;
        if rows.is_empty() {
            return Ok(HashMap::new());
        }

        let event_uuids: HashMap<i64, Uuid> = event::Entity::find()
            .filter(event::Column::Id.is_in(rows.iter().map(|row| row.event_id)))
            .all(db)
            .await?
            .into_iter()
            .map(|model| (model.id, model.uuid))
            .collect();

        let mut answers = HashMap::with_capacity(rows.len());
        for row in rows {
            let event_uuid = event_uuids
                .get(&row.event_id)
                .copied()
                .ok_or(DbErr::RecordNotFound("Event not found".to_string()))?;
            answers.insert(event_uuid, row.is_available);
        }
        Ok(answers)
    }

    /// The effective answer for one (staff, event) pair, or `None` when no
    /// request ever answered it. When several requests exist, the most
    /// recent one (by sent_at, then row id) that answered this event wins.
    pub async fn find_for_pair<C: ConnectionTrait>(
        db: &C,
        staff_id: Uuid,
        event_id: Uuid,
    ) -> Result<Option<bool>, DbErr> {
        let Some(staff_row_id) = ids::staff_id_by_uuid(db, staff_id).await? else {
            return Ok(None);
        };
        let Some(event_row_id) = ids::event_id_by_uuid(db, event_id).await? else {
            return Ok(None);
        };

        let requests = survey_request::Entity::find()
            .filter(survey_request::Column::StaffId.eq(staff_row_id))
            .order_by_desc(survey_request::Column::SentAt)
            .order_by_desc(survey_request::Column::Id)
            .all(db)
            .await?;

        for request in requests {
            let row = staff_availability::Entity::find()
                .filter(staff_availability::Column::SurveyRequestId.eq(request.id))
                .filter(staff_availability::Column::EventId.eq(event_row_id))
                .one(db)
                .await?;
            if let Some(row) = row {
                return Ok(Some(row.is_available));
            }
        }
        Ok(None)
    }

    /// All availability facts folded into staff id → event id → available.
    ///
    /// Availability rows do not carry a staff id; it is resolved through the
    /// owning survey request. Requests are applied in (sent_at, row id)
    /// order, so when a staff member has answered the same event in several
    /// requests the latest answer wins.
    pub async fn staff_event_map<C: ConnectionTrait>(
        db: &C,
    ) -> Result<HashMap<Uuid, HashMap<Uuid, bool>>, DbErr> {
        let requests = survey_request::Entity::find()
            .order_by_asc(survey_request::Column::SentAt)
            .order_by_asc(survey_request::Column::Id)
            .all(db)
            .await?;
        if requests.is_empty() {
            return Ok(HashMap::new());
        }

        let staff_uuids: HashMap<i64, Uuid> = staff::Entity::find()
            .all(db)
            .await?
            .into_iter()
            .map(|model| (model.id, model.uuid))
            .collect();
        let event_uuids: HashMap<i64, Uuid> = event::Entity::find()
            .all(db)
            .await?
            .into_iter()
            .map(|model| (model.id, model.uuid))
            .collect();

        let mut rows_by_request: HashMap<i64, Vec<staff_availability::Model>> = HashMap::new();
        for row in staff_availability::Entity::find().all(db).await? {
            rows_by_request
                .entry(row.survey_request_id)
                .or_default()
                .push(row);
        }

        let mut map: HashMap<Uuid, HashMap<Uuid, bool>> = HashMap::new();
        for request in requests {
            let Some(rows) = rows_by_request.remove(&request.id) else {
                continue;
            };
            let Some(staff_uuid) = staff_uuids.get(&request.staff_id).copied() else {
                // Staff member deleted since the survey ran; nothing to show.
                continue;
            };
            let entry = map.entry(staff_uuid).or_default();
            for row in rows {
                let Some(event_uuid) = event_uuids.get(&row.event_id).copied() else {
                    continue;
                };
                entry.insert(event_uuid, row.is_available);
            }
        }
        Ok(map)
    }
}

#[cfg(test)]
mod tests {
    use sea_orm::Database;
    use sea_orm_migration::MigratorTrait;

    use super::*;
    use crate::models::{
        event::{CreateEvent, Event},
        skill::{CreateSkill, Skill},
        skill_type::{CreateSkillType, SkillType},
        staff::{CreateStaff, Staff},
        survey_request::{SurveyRequest, SurveyRequestEvent},
    };

    async fn setup_db() -> sea_orm::DatabaseConnection {
        let db = Database::connect("sqlite::memory:").await.unwrap();
        db_migration::Migrator::up(&db, None).await.unwrap();
        db
    }

    async fn seed_staff(db: &sea_orm::DatabaseConnection, name: &str) -> Staff {
        let skill_type = SkillType::create(
            db,
            &CreateSkillType {
                name: format!("{name} type"),
                color: "#64748b".to_string(),
            },
            Uuid::new_v4(),
        )
        .await
        .unwrap();
        let skill = Skill::create(
            db,
            &CreateSkill {
                name: format!("{name} skill"),
                skill_type_id: skill_type.id,
            },
            Uuid::new_v4(),
        )
        .await
        .unwrap();
        Staff::create(
            db,
            &CreateStaff {
                name: name.to_string(),
                email: format!("{}@example.org", name.to_lowercase()),
                skill_id: skill.id,
                is_leader: false,
            },
            Uuid::new_v4(),
        )
        .await
        .unwrap()
    }

    async fn seed_event(db: &sea_orm::DatabaseConnection, title: &str, day: &str) -> Event {
        Event::create(
            db,
            &CreateEvent {
                title: title.to_string(),
                date: day.parse().unwrap(),
            },
            Uuid::new_v4(),
        )
        .await
        .unwrap()
    }

    #[tokio::test]
    async fn upsert_is_idempotent_per_event() {
        let db = setup_db().await;
        let staff = seed_staff(&db, "Anna").await;
        let event = seed_event(&db, "Morning service", "2026-09-06").await;
        let request = SurveyRequest::create(&db, staff.id, "tok-upsert", Uuid::new_v4())
            .await
            .unwrap();
        SurveyRequestEvent::attach_many(&db, request.id, &[event.id])
            .await
            .unwrap();

        Availability::upsert(&db, request.id, event.id, true)
            .await
            .unwrap();
        Availability::upsert(&db, request.id, event.id, true)
            .await
            .unwrap();

        let rows = staff_availability::Entity::find().all(&db).await.unwrap();
        assert_eq!(rows.len(), 1);
        assert!(rows[0].is_available);

        // A changed answer replaces the stored value, still one row.
        Availability::upsert(&db, request.id, event.id, false)
            .await
            .unwrap();
        let rows = staff_availability::Entity::find().all(&db).await.unwrap();
        assert_eq!(rows.len(), 1);
        assert!(!rows[0].is_available);
    }

    #[tokio::test]
    async fn staff_map_defaults_to_missing_entries() {
        let db = setup_db().await;
        let staff = seed_staff(&db, "Anna").await;
        let answered = seed_event(&db, "Morning service", "2026-09-06").await;
        let unanswered = seed_event(&db, "Evening service", "2026-09-20").await;
        let request = SurveyRequest::create(&db, staff.id, "tok-map", Uuid::new_v4())
            .await
            .unwrap();

        Availability::upsert(&db, request.id, answered.id, true)
            .await
            .unwrap();

        let map = Availability::staff_event_map(&db).await.unwrap();
        let for_staff = map.get(&staff.id).unwrap();
        assert_eq!(for_staff.get(&answered.id), Some(&true));
        assert_eq!(for_staff.get(&unanswered.id), None);
    }

    #[tokio::test]
    async fn latest_request_wins_per_event() {
        let db = setup_db().await;
        let staff = seed_staff(&db, "Anna").await;
        let event = seed_event(&db, "Morning service", "2026-09-06").await;

        let first = SurveyRequest::create(&db, staff.id, "tok-first", Uuid::new_v4())
            .await
            .unwrap();
        Availability::upsert(&db, first.id, event.id, true)
            .await
            .unwrap();

        let second = SurveyRequest::create(&db, staff.id, "tok-second", Uuid::new_v4())
            .await
            .unwrap();
        Availability::upsert(&db, second.id, event.id, false)
            .await
            .unwrap();

        let map = Availability::staff_event_map(&db).await.unwrap();
        assert_eq!(map.get(&staff.id).unwrap().get(&event.id), Some(&false));

        let effective = Availability::find_for_pair(&db, staff.id, event.id)
            .await
            .unwrap();
        assert_eq!(effective, Some(false));
    }

    #[tokio::test]
    async fn pair_lookup_defaults_to_none_without_answers() {
        let db = setup_db().await;
        let staff = seed_staff(&db, "Anna").await;
        let event = seed_event(&db, "Morning service", "2026-09-06").await;

        let effective = Availability::find_for_pair(&db, staff.id, event.id)
            .await
            .unwrap();
        assert_eq!(effective, None);

        // An older request's answer still applies when a newer request never
        // asked about this event.
        let first = SurveyRequest::create(&db, staff.id, "tok-old", Uuid::new_v4())
            .await
            .unwrap();
        Availability::upsert(&db, first.id, event.id, true)
            .await
            .unwrap();
        SurveyRequest::create(&db, staff.id, "tok-new", Uuid::new_v4())
            .await
            .unwrap();

        let effective = Availability::find_for_pair(&db, staff.id, event.id)
            .await
            .unwrap();
        assert_eq!(effective, Some(true));
    }
}
