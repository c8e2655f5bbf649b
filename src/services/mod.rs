pub mod attempt_service;
pub mod grading_service;
pub mod quiz_service;
pub mod score_service;
pub mod stats_service;
pub mod subject_service;
pub mod user_service;
