use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::models::quiz::QuizAvailability;

/// One quiz in the user-facing catalog, joined with its chapter and subject.
#[derive(Debug, Clone, Serialize)]
pub struct QuizCatalogEntry {
    pub id: Uuid,
    pub chapter_id: Uuid,
    pub chapter_name: String,
    pub subject_id: Uuid,
    pub subject_name: String,
    pub date_of_quiz: NaiveDate,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    pub duration_minutes: i32,
    pub question_count: i64,
    pub availability: QuizAvailability,
}

/// A question as shown to a quiz taker: no correct answer attached.
#[derive(Debug, Clone, Serialize)]
pub struct TakeQuestion {
    pub id: Uuid,
    pub statement: String,
    pub option1: String,
    pub option2: String,
    pub option3: String,
    pub option4: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct TakeQuizResponse {
    pub quiz_id: Uuid,
    pub chapter_name: String,
    pub subject_name: String,
    pub duration_minutes: i32,
    pub end_time: NaiveTime,
    pub questions: Vec<TakeQuestion>,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct AnswerPayload {
    pub question_id: Uuid,
    #[validate(range(min = 1, max = 4))]
    pub selected_option: i32,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct SubmitQuizRequest {
    #[validate(nested)]
    pub answers: Vec<AnswerPayload>,
}

#[derive(Debug, Clone, Serialize)]
pub struct SubmitQuizResponse {
    pub score_id: Uuid,
    pub quiz_id: Uuid,
    pub total_score: i32,
    pub max_score: i32,
    pub percentage: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct ScoreHistoryEntry {
    pub score_id: Uuid,
    pub quiz_id: Uuid,
    pub subject_name: String,
    pub chapter_name: String,
    pub date_of_quiz: NaiveDate,
    pub total_score: i32,
    pub max_score: i32,
    pub percentage: f64,
    pub taken_at: DateTime<Utc>,
}
