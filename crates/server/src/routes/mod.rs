pub mod assignments;
pub mod events;
pub mod health;
pub mod skill_types;
pub mod skills;
pub mod staff;
pub mod survey_requests;
pub mod surveys;
