use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// A multiple-choice question. `correct_option` indexes the options 1..=4.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Question {
    pub id: Uuid,
    pub quiz_id: Uuid,
    pub statement: String,
    pub option1: String,
    pub option2: String,
    pub option3: String,
    pub option4: String,
    pub correct_option: i32,
}
