use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Score {
    pub id: Uuid,
    pub quiz_id: Uuid,
    pub user_id: Uuid,
    pub total_score: i32,
    pub max_score: i32,
    pub created_at: DateTime<Utc>,
}

impl Score {
    pub fn percentage(&self) -> f64 {
        percentage(self.total_score, self.max_score)
    }
}

pub fn percentage(total: i32, max: i32) -> f64 {
    if max > 0 {
        f64::from(total) / f64::from(max) * 100.0
    } else {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn percentage_is_zero_when_max_is_zero() {
        assert_eq!(percentage(0, 0), 0.0);
        assert_eq!(percentage(5, 0), 0.0);
    }

    #[test]
    fn percentage_scales_to_hundred() {
        assert_eq!(percentage(3, 4), 75.0);
        assert_eq!(percentage(4, 4), 100.0);
        assert_eq!(percentage(0, 4), 0.0);
    }
}
