use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// A scheduled assessment for a chapter. The quiz is open to users only on
/// `date_of_quiz`, between `start_time` and `end_time` inclusive.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Quiz {
    pub id: Uuid,
    pub chapter_id: Uuid,
    pub date_of_quiz: NaiveDate,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    pub duration_minutes: i32,
}

/// Availability of a quiz relative to a point in time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QuizAvailability {
    Upcoming,
    Open,
    Closed,
}

impl Quiz {
    pub fn availability(&self, now: NaiveDateTime) -> QuizAvailability {
        let today = now.date();
        if today < self.date_of_quiz {
            return QuizAvailability::Upcoming;
        }
        if today > self.date_of_quiz {
            return QuizAvailability::Closed;
        }
        let t = now.time();
        if t < self.start_time {
            QuizAvailability::Upcoming
        } else if t > self.end_time {
            QuizAvailability::Closed
        } else {
            QuizAvailability::Open
        }
    }

    pub fn is_open(&self, now: NaiveDateTime) -> bool {
        self.availability(now) == QuizAvailability::Open
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn quiz(date: &str, start: &str, end: &str) -> Quiz {
        Quiz {
            id: Uuid::new_v4(),
            chapter_id: Uuid::new_v4(),
            date_of_quiz: date.parse().unwrap(),
            start_time: start.parse().unwrap(),
            end_time: end.parse().unwrap(),
            duration_minutes: 30,
        }
    }

    fn at(date: &str, time: &str) -> NaiveDateTime {
        format!("{}T{}", date, time).parse().unwrap()
    }

    #[test]
    fn upcoming_before_the_day_and_before_start() {
        let q = quiz("2026-03-10", "10:00:00", "11:00:00");
        assert_eq!(
            q.availability(at("2026-03-09", "23:59:00")),
            QuizAvailability::Upcoming
        );
        assert_eq!(
            q.availability(at("2026-03-10", "09:59:59")),
            QuizAvailability::Upcoming
        );
    }

    #[test]
    fn open_inside_the_window_inclusive() {
        let q = quiz("2026-03-10", "10:00:00", "11:00:00");
        assert!(q.is_open(at("2026-03-10", "10:00:00")));
        assert!(q.is_open(at("2026-03-10", "10:30:00")));
        assert!(q.is_open(at("2026-03-10", "11:00:00")));
    }

    #[test]
    fn closed_after_end_or_day() {
        let q = quiz("2026-03-10", "10:00:00", "11:00:00");
        assert_eq!(
            q.availability(at("2026-03-10", "11:00:01")),
            QuizAvailability::Closed
        );
        assert_eq!(
            q.availability(at("2026-03-11", "10:30:00")),
            QuizAvailability::Closed
        );
    }
}
