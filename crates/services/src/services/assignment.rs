use std::{
    collections::{HashMap, HashSet},
    sync::Arc,
};

use db::{
    DatabaseConnection, DbErr,
    models::{
        assignment::{Assignment, CreateAssignment},
        availability::Availability,
        event::Event,
        staff::{Staff, StaffWithSkill},
    },
};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tokio::sync::RwLock;
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum AssignmentError {
    #[error(transparent)]
    Database(#[from] DbErr),
    #[error("Staff member is not available for this event")]
    NotAvailable,
}

/// Point-in-time staff × events planning grid. Assembled from four
/// independent reads; not transactionally consistent across them.
#[derive(Debug, Clone, Serialize)]
pub struct AssignmentMatrix {
    pub events: Vec<Event>,
    pub staff: Vec<StaffWithSkill>,
    pub availability: HashMap<Uuid, HashMap<Uuid, bool>>,
    pub assignments: HashMap<Uuid, Vec<Uuid>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ToggleOutcome {
    Assigned,
    Unassigned,
}

#[derive(Default)]
struct BoardState {
    loaded: bool,
    // event id -> assigned staff ids, mirroring the store
    assignments: HashMap<Uuid, HashSet<Uuid>>,
}

/// Reconciles availability, assignments, and operator toggles.
///
/// The board keeps an owned mirror of the store's assignment map. Writes go
/// through to the store first; the mirror is patched only after a write
/// succeeds and is re-synced from the store when one fails, so a toggle
/// never acts on state the store refused. Availability is never mirrored
/// for decisions: the toggle guard reads the store, so answers submitted
/// after the grid was loaded still count.
#[derive(Clone, Default)]
pub struct AssignmentBoard {
    state: Arc<RwLock<BoardState>>,
}

impl AssignmentBoard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fetches the four grid inputs concurrently and refreshes the mirror.
    pub async fn load_matrix(
        &self,
        db: &DatabaseConnection,
    ) -> Result<AssignmentMatrix, AssignmentError> {
        let (events, staff, availability, assignments) = tokio::try_join!(
            Event::find_all(db),
            Staff::find_all_with_skill(db),
            Availability::staff_event_map(db),
            Assignment::event_staff_map(db),
        )?;

        let mut state = self.state.write().await;
        state.assignments = assignments;
        state.loaded = true;

        Ok(AssignmentMatrix {
            events,
            staff,
            availability,
            assignments: assignment_lists(&state.assignments),
        })
    }

    /// Declared availability straight from the store, defaulting to false
    /// when no record exists.
    pub async fn is_available(
        &self,
        db: &DatabaseConnection,
        staff_id: Uuid,
        event_id: Uuid,
    ) -> Result<bool, AssignmentError> {
        let available = Availability::find_for_pair(db, staff_id, event_id)
            .await?
            .unwrap_or(false);
        Ok(available)
    }

    /// Current assignment state from the mirror, defaulting to false when no
    /// record exists.
    pub async fn is_assigned(&self, staff_id: Uuid, event_id: Uuid) -> bool {
        let state = self.state.read().await;
        assigned_locked(&state, event_id, staff_id)
    }

    /// Flips the assignment for one (event, staff) pair.
    ///
    /// Assigning requires declared availability. The flip reads the mirror
    /// under the write lock, so rapid repeated toggles serialize instead of
    /// racing; the unique (event, staff) key in the store backstops anything
    /// that slips through from other writers.
    pub async fn toggle_assignment(
        &self,
        db: &DatabaseConnection,
        event_id: Uuid,
        staff_id: Uuid,
        assigned_by: Option<Uuid>,
    ) -> Result<ToggleOutcome, AssignmentError> {
        let mut state = self.state.write().await;
        if !state.loaded {
            sync_from_store(&mut state, db).await?;
        }

        if assigned_locked(&state, event_id, staff_id) {
            match Assignment::delete_by_pair(db, event_id, staff_id).await {
                Ok(_) => {
                    if let Some(staff_ids) = state.assignments.get_mut(&event_id) {
                        staff_ids.remove(&staff_id);
                    }
                    Ok(ToggleOutcome::Unassigned)
                }
                Err(err) => {
                    resync_after_write_failure(&mut state, db).await;
                    Err(err.into())
                }
            }
        } else {
            if !self.is_available(db, staff_id, event_id).await? {
                return Err(AssignmentError::NotAvailable);
            }

            let data = CreateAssignment {
                event_id,
                staff_id,
                assigned_by,
            };
            match Assignment::create(db, &data, Uuid::new_v4()).await {
                Ok(_) => {
                    state
                        .assignments
                        .entry(event_id)
                        .or_default()
                        .insert(staff_id);
                    Ok(ToggleOutcome::Assigned)
                }
                Err(err) => {
                    resync_after_write_failure(&mut state, db).await;
                    Err(err.into())
                }
            }
        }
    }
}

fn assignment_lists(assignments: &HashMap<Uuid, HashSet<Uuid>>) -> HashMap<Uuid, Vec<Uuid>> {
    assignments
        .iter()
        .map(|(event_id, staff_ids)| {
            let mut list: Vec<Uuid> = staff_ids.iter().copied().collect();
            list.sort();
            (*event_id, list)
        })
        .collect()
}

fn assigned_locked(state: &BoardState, event_id: Uuid, staff_id: Uuid) -> bool {
    state
        .assignments
        .get(&event_id)
        .is_some_and(|staff_ids| staff_ids.contains(&staff_id))
}

async fn sync_from_store(state: &mut BoardState, db: &DatabaseConnection) -> Result<(), DbErr> {
    state.assignments = Assignment::event_staff_map(db).await?;
    state.loaded = true;
    Ok(())
}

async fn resync_after_write_failure(state: &mut BoardState, db: &DatabaseConnection) {
    if let Err(err) = sync_from_store(state, db).await {
        // Mark the mirror stale so the next toggle reloads before trusting it.
        state.loaded = false;
        tracing::error!(error = %err, "Failed to re-sync assignment mirror after write failure");
    }
}
