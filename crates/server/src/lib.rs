use std::sync::Arc;

use db::DBService;
use services::services::{
    assignment::AssignmentBoard, notify::Notifier, survey::SurveyService,
};

pub mod config;
pub mod error;
pub mod http;
pub mod middleware;
pub mod routes;

use config::ServerConfig;

/// Shared handler state. Every collaborator is injected explicitly at
/// construction; handlers reach them through the accessors.
#[derive(Clone)]
pub struct AppState {
    db: DBService,
    surveys: SurveyService,
    assignments: AssignmentBoard,
    config: Arc<ServerConfig>,
}

impl AppState {
    pub fn new(db: DBService, notifier: Arc<dyn Notifier>, config: ServerConfig) -> Self {
        let surveys = SurveyService::new(notifier, config.public_url.clone());
        Self {
            db,
            surveys,
            assignments: AssignmentBoard::new(),
            config: Arc::new(config),
        }
    }

    pub fn db(&self) -> &DBService {
        &self.db
    }

    pub fn surveys(&self) -> &SurveyService {
        &self.surveys
    }

    pub fn assignments(&self) -> &AssignmentBoard {
        &self.assignments
    }

    pub fn config(&self) -> &ServerConfig {
        &self.config
    }
}
