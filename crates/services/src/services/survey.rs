use std::{collections::HashMap, sync::Arc};

use db::{
    DatabaseConnection, DbErr,
    models::{
        availability::Availability,
        event::Event,
        staff::Staff,
        survey_request::{SurveyRequest, SurveyRequestEvent},
    },
};
use rand::{Rng, distributions::Alphanumeric};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use crate::services::notify::{InviteEvent, Notifier, SurveyInvite};

const SURVEY_TOKEN_LEN: usize = 48;

#[derive(Debug, Error)]
pub enum SurveyError {
    #[error(transparent)]
    Database(#[from] DbErr),
    #[error("Survey not found")]
    NotFound,
    #[error("Survey already completed")]
    AlreadyCompleted,
}

/// What a respondent following a survey link gets to see. Completed requests
/// carry no payload; the form is closed.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum SurveyView {
    Completed,
    Open {
        staff_name: String,
        events: Vec<Event>,
        availability: HashMap<Uuid, bool>,
    },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SurveyBatchSummary {
    pub created: usize,
    pub dispatch_failures: usize,
    pub skipped_staff: Vec<Uuid>,
}

/// Drives the survey request lifecycle: batch creation with token minting
/// and invite dispatch, token resolution for the respondent form, and the
/// one-time submission that closes a request.
#[derive(Clone)]
pub struct SurveyService {
    notifier: Arc<dyn Notifier>,
    public_url: String,
}

impl SurveyService {
    pub fn new(notifier: Arc<dyn Notifier>, public_url: String) -> Self {
        Self {
            notifier,
            public_url,
        }
    }

    /// Creates one survey request per staff member, all asking about the
    /// same set of events, and dispatches one invite each.
    ///
    /// Staff ids that resolve to nothing are skipped; the batch continues.
    /// Dispatch failures are logged and counted but never roll back the
    /// persisted request. Re-running a batch intentionally creates fresh
    /// requests for the same staff members.
    pub async fn create_survey_batch(
        &self,
        db: &DatabaseConnection,
        staff_ids: &[Uuid],
        event_ids: &[Uuid],
    ) -> Result<SurveyBatchSummary, SurveyError> {
        let events = Event::find_by_ids(db, event_ids).await?;
        let linked_event_ids: Vec<Uuid> = events.iter().map(|event| event.id).collect();

        let mut summary = SurveyBatchSummary {
            created: 0,
            dispatch_failures: 0,
            skipped_staff: Vec::new(),
        };

        for staff_id in staff_ids {
            let Some(staff) = Staff::find_by_id(db, *staff_id).await? else {
                tracing::warn!(staff_id = %staff_id, "Skipping survey request for unknown staff member");
                summary.skipped_staff.push(*staff_id);
                continue;
            };

            let token = generate_token();
            let request = match SurveyRequest::create(db, staff.id, &token, Uuid::new_v4()).await {
                Ok(request) => request,
                Err(err) => {
                    tracing::error!(staff_id = %staff.id, error = %err, "Failed to create survey request");
                    continue;
                }
            };

            if let Err(err) =
                SurveyRequestEvent::attach_many(db, request.id, &linked_event_ids).await
            {
                // The request stays valid; the respondent just sees fewer
                // events than intended until the batch is re-run.
                tracing::error!(request_id = %request.id, error = %err, "Failed to link survey request events");
            }
            summary.created += 1;

            let invite = SurveyInvite {
                recipient_email: staff.email.clone(),
                recipient_name: staff.name.clone(),
                token: token.clone(),
                survey_url: self.survey_url(&token),
                events: events
                    .iter()
                    .map(|event| InviteEvent {
                        title: event.title.clone(),
                        date: event.date,
                    })
                    .collect(),
            };
            if let Err(err) = self.notifier.send_survey_invite(&invite).await {
                tracing::error!(staff_id = %staff.id, error = %err, "Failed to dispatch survey invite");
                summary.dispatch_failures += 1;
            }
        }

        Ok(summary)
    }

    /// Resolves a respondent's token to either the closed state or the open
    /// form: staff name, asked events, and any answers saved so far.
    pub async fn resolve_by_token(
        &self,
        db: &DatabaseConnection,
        token: &str,
    ) -> Result<SurveyView, SurveyError> {
        let request = SurveyRequest::find_by_token(db, token)
            .await?
            .ok_or(SurveyError::NotFound)?;

        if request.is_completed() {
            return Ok(SurveyView::Completed);
        }

        let staff = Staff::find_by_id(db, request.staff_id)
            .await?
            .ok_or(SurveyError::NotFound)?;
        let events = SurveyRequest::find_events(db, request.id).await?;
        let availability = Availability::find_by_request(db, request.id).await?;

        Ok(SurveyView::Open {
            staff_name: staff.name,
            events,
            availability,
        })
    }

    /// Records the respondent's answers and closes the request.
    ///
    /// Every event attached to the request gets a row; events missing from
    /// `answers` default to not available. The per-event upsert is
    /// idempotent, so a submission that failed halfway can simply be
    /// retried. Only after all answers are stored is `completed_at` set.
    pub async fn submit_availability(
        &self,
        db: &DatabaseConnection,
        token: &str,
        answers: &HashMap<Uuid, bool>,
    ) -> Result<(), SurveyError> {
        let request = SurveyRequest::find_by_token(db, token)
            .await?
            .ok_or(SurveyError::NotFound)?;
        if request.is_completed() {
            return Err(SurveyError::AlreadyCompleted);
        }

        let events = SurveyRequest::find_events(db, request.id).await?;
        for event in &events {
            let is_available = answers.get(&event.id).copied().unwrap_or(false);
            Availability::upsert(db, request.id, event.id, is_available).await?;
        }

        SurveyRequest::mark_completed(db, request.id).await?;
        Ok(())
    }

    fn survey_url(&self, token: &str) -> String {
        format!("{}/survey/{}", self.public_url.trim_end_matches('/'), token)
    }
}

/// Mints the bearer capability a respondent authenticates with. 48
/// alphanumeric characters keep the token URL-safe at well over 128 bits of
/// entropy.
pub fn generate_token() -> String {
    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(SURVEY_TOKEN_LEN)
        .map(char::from)
        .collect()
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use async_trait::async_trait;
    use db::models::{
        event::CreateEvent,
        skill::{CreateSkill, Skill},
        skill_type::{CreateSkillType, SkillType},
        staff::CreateStaff,
    };
    use sea_orm::{Database, EntityTrait};
    use sea_orm_migration::MigratorTrait;

    use super::*;
    use crate::services::notify::NotifyError;

    #[derive(Default)]
    struct RecordingNotifier {
        invites: Mutex<Vec<SurveyInvite>>,
        fail: bool,
    }

    impl RecordingNotifier {
        fn failing() -> Self {
            Self {
                invites: Mutex::new(Vec::new()),
                fail: true,
            }
        }

        fn sent(&self) -> Vec<SurveyInvite> {
            self.invites.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl Notifier for RecordingNotifier {
        async fn send_survey_invite(&self, invite: &SurveyInvite) -> Result<(), NotifyError> {
            self.invites.lock().unwrap().push(invite.clone());
            if self.fail {
                return Err(NotifyError::Rejected(reqwest::StatusCode::BAD_GATEWAY));
            }
            Ok(())
        }
    }

    async fn setup_db() -> DatabaseConnection {
        let db = Database::connect("sqlite::memory:").await.unwrap();
        db_migration::Migrator::up(&db, None).await.unwrap();
        db
    }

    fn service(notifier: Arc<RecordingNotifier>) -> SurveyService {
        SurveyService::new(notifier, "http://localhost:8330".to_string())
    }

    async fn seed_staff(db: &DatabaseConnection, name: &str) -> Staff {
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

    async fn seed_event(db: &DatabaseConnection, title: &str, day: &str) -> Event {
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
    async fn batch_skips_unknown_staff_and_dispatches_once() {
        let db = setup_db().await;
        let notifier = Arc::new(RecordingNotifier::default());
        let service = service(notifier.clone());

        let anna = seed_staff(&db, "Anna").await;
        let missing = Uuid::new_v4();
        let first = seed_event(&db, "Morning service", "2026-09-06").await;
        let second = seed_event(&db, "Evening service", "2026-09-20").await;

        let summary = service
            .create_survey_batch(&db, &[anna.id, missing], &[first.id, second.id])
            .await
            .unwrap();

        assert_eq!(summary.created, 1);
        assert_eq!(summary.dispatch_failures, 0);
        assert_eq!(summary.skipped_staff, vec![missing]);

        let invites = notifier.sent();
        assert_eq!(invites.len(), 1);
        assert_eq!(invites[0].recipient_email, "anna@example.org");
        assert_eq!(invites[0].events.len(), 2);
        assert!(invites[0].survey_url.contains(&invites[0].token));

        let links = db::entities::survey_request_event::Entity::find()
            .all(&db)
            .await
            .unwrap();
        assert_eq!(links.len(), 2);
    }

    #[tokio::test]
    async fn dispatch_failure_keeps_request_and_continues() {
        let db = setup_db().await;
        let notifier = Arc::new(RecordingNotifier::failing());
        let service = service(notifier.clone());

        let anna = seed_staff(&db, "Anna").await;
        let ben = seed_staff(&db, "Ben").await;
        let event = seed_event(&db, "Morning service", "2026-09-06").await;

        let summary = service
            .create_survey_batch(&db, &[anna.id, ben.id], &[event.id])
            .await
            .unwrap();

        assert_eq!(summary.created, 2);
        assert_eq!(summary.dispatch_failures, 2);
        assert_eq!(notifier.sent().len(), 2);

        // Both requests survive their failed dispatch.
        let requests = db::entities::survey_request::Entity::find()
            .all(&db)
            .await
            .unwrap();
        assert_eq!(requests.len(), 2);
    }

    #[tokio::test]
    async fn unknown_token_is_not_found() {
        let db = setup_db().await;
        let service = service(Arc::new(RecordingNotifier::default()));

        let resolved = service.resolve_by_token(&db, "no-such-token").await;
        assert!(matches!(resolved, Err(SurveyError::NotFound)));

        let submitted = service
            .submit_availability(&db, "no-such-token", &HashMap::new())
            .await;
        assert!(matches!(submitted, Err(SurveyError::NotFound)));
    }

    #[tokio::test]
    async fn submit_defaults_missing_answers_and_closes_the_request() {
        let db = setup_db().await;
        let notifier = Arc::new(RecordingNotifier::default());
        let service = service(notifier.clone());

        let anna = seed_staff(&db, "Anna").await;
        let answered = seed_event(&db, "Morning service", "2026-09-06").await;
        let unanswered = seed_event(&db, "Evening service", "2026-09-20").await;
        service
            .create_survey_batch(&db, &[anna.id], &[answered.id, unanswered.id])
            .await
            .unwrap();
        let token = notifier.sent()[0].token.clone();

        let answers = HashMap::from([(answered.id, true)]);
        service
            .submit_availability(&db, &token, &answers)
            .await
            .unwrap();

        let map = Availability::staff_event_map(&db).await.unwrap();
        let for_anna = map.get(&anna.id).unwrap();
        assert_eq!(for_anna.get(&answered.id), Some(&true));
        assert_eq!(for_anna.get(&unanswered.id), Some(&false));

        let view = service.resolve_by_token(&db, &token).await.unwrap();
        assert!(matches!(view, SurveyView::Completed));
    }

    #[tokio::test]
    async fn completed_requests_reject_resubmission_unchanged() {
        let db = setup_db().await;
        let notifier = Arc::new(RecordingNotifier::default());
        let service = service(notifier.clone());

        let anna = seed_staff(&db, "Anna").await;
        let event = seed_event(&db, "Morning service", "2026-09-06").await;
        service
            .create_survey_batch(&db, &[anna.id], &[event.id])
            .await
            .unwrap();
        let token = notifier.sent()[0].token.clone();

        let answers = HashMap::from([(event.id, true)]);
        service
            .submit_availability(&db, &token, &answers)
            .await
            .unwrap();

        let resubmitted = service.submit_availability(&db, &token, &answers).await;
        assert!(matches!(resubmitted, Err(SurveyError::AlreadyCompleted)));

        // Stored answers are untouched: one row, same value.
        let rows = db::entities::staff_availability::Entity::find()
            .all(&db)
            .await
            .unwrap();
        assert_eq!(rows.len(), 1);
        assert!(rows[0].is_available);
    }

    #[tokio::test]
    async fn open_view_resumes_partially_saved_answers() {
        let db = setup_db().await;
        let notifier = Arc::new(RecordingNotifier::default());
        let service = service(notifier.clone());

        let anna = seed_staff(&db, "Anna").await;
        let first = seed_event(&db, "Morning service", "2026-09-06").await;
        let second = seed_event(&db, "Evening service", "2026-09-20").await;
        service
            .create_survey_batch(&db, &[anna.id], &[first.id, second.id])
            .await
            .unwrap();
        let token = notifier.sent()[0].token.clone();

        let request = SurveyRequest::find_by_token(&db, &token)
            .await
            .unwrap()
            .unwrap();
        Availability::upsert(&db, request.id, first.id, true)
            .await
            .unwrap();

        match service.resolve_by_token(&db, &token).await.unwrap() {
            SurveyView::Open {
                staff_name,
                events,
                availability,
            } => {
                assert_eq!(staff_name, "Anna");
                assert_eq!(events.len(), 2);
                assert_eq!(availability.get(&first.id), Some(&true));
                assert_eq!(availability.get(&second.id), None);
            }
            SurveyView::Completed => panic!("request should still be open"),
        }
    }

    #[test]
    fn tokens_are_long_and_unique() {
        let first = generate_token();
        let second = generate_token();
        assert_eq!(first.len(), SURVEY_TOKEN_LEN);
        assert!(first.chars().all(|c| c.is_ascii_alphanumeric()));
        assert_ne!(first, second);
    }
}
