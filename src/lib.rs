pub mod config;
pub mod database;
pub mod dto;
pub mod error;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
pub mod utils;

use crate::services::{
    attempt_service::AttemptService, quiz_service::QuizService, score_service::ScoreService,
    stats_service::StatsService, subject_service::SubjectService, user_service::UserService,
};
use sqlx::PgPool;

#[derive(Clone)]
pub struct AppState {
    pub pool: PgPool,
    pub user_service: UserService,
    pub subject_service: SubjectService,
    pub quiz_service: QuizService,
    pub attempt_service: AttemptService,
    pub score_service: ScoreService,
    pub stats_service: StatsService,
}

impl AppState {
    pub fn new(pool: PgPool) -> Self {
        let user_service = UserService::new(pool.clone());
        let subject_service = SubjectService::new(pool.clone());
        let quiz_service = QuizService::new(pool.clone());
        let attempt_service = AttemptService::new(pool.clone());
        let score_service = ScoreService::new(pool.clone());
        let stats_service = StatsService::new(pool.clone());

        Self {
            pool,
            user_service,
            subject_service,
            quiz_service,
            attempt_service,
            score_service,
            stats_service,
        }
    }
}
