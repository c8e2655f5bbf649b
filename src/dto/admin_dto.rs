use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateSubjectPayload {
    #[validate(length(min = 1, max = 100))]
    pub name: String,
    pub description: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct UpdateSubjectPayload {
    #[validate(length(min = 1, max = 100))]
    pub name: Option<String>,
    pub description: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateChapterPayload {
    #[validate(length(min = 1, max = 100))]
    pub name: String,
    pub description: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct UpdateChapterPayload {
    #[validate(length(min = 1, max = 100))]
    pub name: Option<String>,
    pub description: Option<String>,
    pub subject_id: Option<Uuid>,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateQuizPayload {
    pub date_of_quiz: NaiveDate,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    #[validate(range(min = 1))]
    pub duration_minutes: i32,
    /// Questions may be created inline together with the quiz.
    #[validate(nested)]
    pub questions: Option<Vec<CreateQuestionPayload>>,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct UpdateQuizPayload {
    pub chapter_id: Option<Uuid>,
    pub date_of_quiz: Option<NaiveDate>,
    pub start_time: Option<NaiveTime>,
    pub end_time: Option<NaiveTime>,
    #[validate(range(min = 1))]
    pub duration_minutes: Option<i32>,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateQuestionPayload {
    #[validate(length(min = 1))]
    pub statement: String,
    #[validate(length(min = 1, max = 255))]
    pub option1: String,
    #[validate(length(min = 1, max = 255))]
    pub option2: String,
    #[validate(length(min = 1, max = 255))]
    pub option3: String,
    #[validate(length(min = 1, max = 255))]
    pub option4: String,
    #[validate(range(min = 1, max = 4))]
    pub correct_option: i32,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct UpdateQuestionPayload {
    #[validate(length(min = 1))]
    pub statement: Option<String>,
    #[validate(length(min = 1, max = 255))]
    pub option1: Option<String>,
    #[validate(length(min = 1, max = 255))]
    pub option2: Option<String>,
    #[validate(length(min = 1, max = 255))]
    pub option3: Option<String>,
    #[validate(length(min = 1, max = 255))]
    pub option4: Option<String>,
    #[validate(range(min = 1, max = 4))]
    pub correct_option: Option<i32>,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateScorePayload {
    pub user_id: Uuid,
    pub quiz_id: Uuid,
    #[validate(range(min = 0))]
    pub total_score: i32,
    #[validate(range(min = 0))]
    pub max_score: i32,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct UpdateScorePayload {
    #[validate(range(min = 0))]
    pub total_score: Option<i32>,
    #[validate(range(min = 0))]
    pub max_score: Option<i32>,
}

/// A score row together with its derived percentage.
#[derive(Debug, Clone, Serialize)]
pub struct ScoreView {
    pub id: Uuid,
    pub quiz_id: Uuid,
    pub user_id: Uuid,
    pub total_score: i32,
    pub max_score: i32,
    pub percentage: f64,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

impl From<crate::models::score::Score> for ScoreView {
    fn from(s: crate::models::score::Score) -> Self {
        let percentage = s.percentage();
        Self {
            id: s.id,
            quiz_id: s.quiz_id,
            user_id: s.user_id,
            total_score: s.total_score,
            max_score: s.max_score,
            percentage,
            created_at: s.created_at,
        }
    }
}
