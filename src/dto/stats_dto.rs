use chrono::NaiveDate;
use serde::Serialize;
use uuid::Uuid;

/// One point on a user's performance-over-time chart.
#[derive(Debug, Clone, Serialize)]
pub struct PerformancePoint {
    pub quiz_id: Uuid,
    pub date_of_quiz: NaiveDate,
    pub percentage: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct SubjectAverage {
    pub subject_id: Uuid,
    pub subject_name: String,
    pub average_percentage: f64,
    pub attempts: i64,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct HistogramBin {
    pub lower: f64,
    pub upper: f64,
    pub count: u32,
}

/// Per-quiz participation and average score, for a chapter's quiz chart.
#[derive(Debug, Clone, Serialize)]
pub struct QuizStat {
    pub quiz_id: Uuid,
    pub date_of_quiz: NaiveDate,
    pub participants: i64,
    pub average_percentage: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct ChapterQuizStats {
    pub participation: Vec<QuizStat>,
    pub average_score_histogram: Vec<HistogramBin>,
}

#[derive(Debug, Clone, Serialize)]
pub struct AdminUserStats {
    /// Quizzes taken per user, binned.
    pub activity_histogram: Vec<HistogramBin>,
    /// Average percentage per user (users with at least one score), binned.
    pub performance_histogram: Vec<HistogramBin>,
}

#[derive(Debug, Clone, Serialize)]
pub struct AdminDashboard {
    pub subject_count: i64,
    pub chapter_count: i64,
    pub quiz_count: i64,
    pub user_count: i64,
    pub user_stats: AdminUserStats,
}

#[derive(Debug, Clone, Serialize)]
pub struct UserDashboard {
    pub performance: Vec<PerformancePoint>,
    pub subject_averages: Vec<SubjectAverage>,
    pub quizzes_taken: i64,
    pub average_percentage: f64,
}
