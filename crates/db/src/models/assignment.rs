use std::collections::{HashMap, HashSet};

use chrono::{DateTime, Utc};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DbErr, EntityTrait, QueryFilter, Set,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
    entities::{event, event_assignment, staff},
    models::ids,
};

/// A manual per-(event, staff) decision recorded by an operator. The unique
/// (event, staff) pair backs the toggle's read-then-flip logic.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Assignment {
    pub id: Uuid,
    pub event_id: Uuid,
    pub staff_id: Uuid,
    pub assigned_at: DateTime<Utc>,
    pub assigned_by: Option<Uuid>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize)]
pub struct CreateAssignment {
    pub event_id: Uuid,
    pub staff_id: Uuid,
    pub assigned_by: Option<Uuid>,
}

impl Assignment {
    fn from_model(model: event_assignment::Model, event_id: Uuid, staff_id: Uuid) -> Self {
        Self {
            id: model.uuid,
            event_id,
            staff_id,
            assigned_at: model.assigned_at.into(),
            assigned_by: model.assigned_by,
            created_at: model.created_at.into(),
        }
    }

    pub async fn find_all<C: ConnectionTrait>(db: &C) -> Result<Vec<Self>, DbErr> {
        let records = event_assignment::Entity::find().all(db).await?;
        if records.is_empty() {
            return Ok(Vec::new());
        }

        let event_uuids: HashMap<i64, Uuid> = event::Entity::find()
            .all(db)
            .await?
            .into_iter()
            .map(|model| (model.id, model.uuid))
            .collect();
        let staff_uuids: HashMap<i64, Uuid> = staff::Entity::find()
            .all(db)
            .await?
            .into_iter()
            .map(|model| (model.id, model.uuid))
            .collect();

        let mut assignments = Vec::with_capacity(records.len());
        for model in records {
            let event_uuid = event_uuids
                .get(&model.event_id)
                .copied()
                .ok_or(DbErr::RecordNotFound("Event not found".to_string()))?;
            let staff_uuid = staff_uuids
                .get(&model.staff_id)
                .copied()
                .ok_or(DbErr::RecordNotFound("Staff member not found".to_string()))?;
            assignments.push(Self::from_model(model, event_uuid, staff_uuid));
        }
        Ok(assignments)
    }

    /// All assignments folded into event id → set of staff ids.
    pub async fn event_staff_map<C: ConnectionTrait>(
        db: &C,
    ) -> Result<HashMap<Uuid, HashSet<Uuid>>, DbErr> {
        let mut map: HashMap<Uuid, HashSet<Uuid>> = HashMap::new();
        for assignment in Self::find_all(db).await? {
            map.entry(assignment.event_id)
                .or_default()
                .insert(assignment.staff_id);
        }
        Ok(map)
    }

    pub async fn find_by_pair<C: ConnectionTrait>(
        db: &C,
        event_id: Uuid,
        staff_id: Uuid,
    ) -> Result<Option<Self>, DbErr> {
        let Some(event_row_id) = ids::event_id_by_uuid(db, event_id).await? else {
            return Ok(None);
        };
        let Some(staff_row_id) = ids::staff_id_by_uuid(db, staff_id).await? else {
            return Ok(None);
        };

        let record = event_assignment::Entity::find()
            .filter(event_assignment::Column::EventId.eq(event_row_id))
            .filter(event_assignment::Column::StaffId.eq(staff_row_id))
            .one(db)
            .await?;
        Ok(record.map(|model| Self::from_model(model, event_id, staff_id)))
    }

    pub async fn create<C: ConnectionTrait>(
        db: &C,
        data: &CreateAssignment,
        id: Uuid,
    ) -> Result<Self, DbErr> {
        let event_row_id = ids::event_id_by_uuid(db, data.event_id)
            .await?
            .ok_or(DbErr::RecordNotFound("Event not found".to_string()))?;
        let staff_row_id = ids::staff_id_by_uuid(db, data.staff_id)
            .await?
            .ok_or(DbErr::RecordNotFound("Staff member not found".to_string()))?;

        let now = Utc::now();
        let active = event_assignment::ActiveModel {
            uuid: Set(id),
            event_id: Set(event_row_id),
            staff_id: Set(staff_row_id),
            assigned_at: Set(now.into()),
            assigned_by: Set(data.assigned_by),
            created_at: Set(now.into()),
            ..Default::default()
        };
        let model = active.insert(db).await?;
        Ok(Self::from_model(model, data.event_id, data.staff_id))
    }

    pub async fn delete_by_pair<C: ConnectionTrait>(
        db: &C,
        event_id: Uuid,
        staff_id: Uuid,
    ) -> Result<u64, DbErr> {
        let Some(event_row_id) = ids::event_id_by_uuid(db, event_id).await? else {
            return Ok(0);
        };
        let Some(staff_row_id) = ids::staff_id_by_uuid(db, staff_id).await? else {
            return Ok(0);
        };

        let result = event_assignment::Entity::delete_many()
            .filter(event_assignment::Column::EventId.eq(event_row_id))
            .filter(event_assignment::Column::StaffId.eq(staff_row_id))
            .exec(db)
            .await?;
        Ok(result.rows_affected)
    }
}
