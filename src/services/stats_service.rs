use crate::dto::stats_dto::{
    AdminDashboard, AdminUserStats, ChapterQuizStats, HistogramBin, PerformancePoint, QuizStat,
    SubjectAverage, UserDashboard,
};
use crate::error::{Error, Result};
use chrono::NaiveDate;
use sqlx::PgPool;
use uuid::Uuid;

const PERCENT_BINS: usize = 10;

#[derive(Clone)]
pub struct StatsService {
    pool: PgPool,
}

impl StatsService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn admin_dashboard(&self) -> Result<AdminDashboard> {
        let subject_count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM subjects")
            .fetch_one(&self.pool)
            .await?;
        let chapter_count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM chapters")
            .fetch_one(&self.pool)
            .await?;
        let quiz_count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM quizzes")
            .fetch_one(&self.pool)
            .await?;
        let user_count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM users")
            .fetch_one(&self.pool)
            .await?;

        let user_stats = self.user_stats(user_count).await?;

        Ok(AdminDashboard {
            subject_count,
            chapter_count,
            quiz_count,
            user_count,
            user_stats,
        })
    }

    /// Histograms over per-user activity (quizzes taken, zero included) and
    /// per-user average percentage (only users with at least one score).
    async fn user_stats(&self, user_count: i64) -> Result<AdminUserStats> {
        #[derive(sqlx::FromRow)]
        struct Row {
            attempts: i64,
            average_percentage: f64,
        }

        let rows = sqlx::query_as::<_, Row>(
            r#"
            SELECT COUNT(*) AS attempts,
                   AVG(CASE WHEN max_score > 0
                            THEN total_score::float8 / max_score * 100
                            ELSE 0 END) AS average_percentage
            FROM scores
            GROUP BY user_id
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        let mut activity: Vec<f64> = rows.iter().map(|r| r.attempts as f64).collect();
        // Users who never took a quiz still belong in the activity chart.
        let inactive = (user_count as usize).saturating_sub(rows.len());
        activity.extend(std::iter::repeat(0.0).take(inactive));

        let max_attempts = activity.iter().cloned().fold(0.0_f64, f64::max).max(1.0);
        let performance: Vec<f64> = rows.iter().map(|r| r.average_percentage).collect();

        Ok(AdminUserStats {
            activity_histogram: histogram(&activity, PERCENT_BINS, 0.0, max_attempts),
            performance_histogram: histogram(&performance, PERCENT_BINS, 0.0, 100.0),
        })
    }

    /// Per-quiz participation and average score for one chapter, plus a
    /// histogram of the per-quiz averages.
    pub async fn chapter_quiz_stats(&self, chapter_id: Uuid) -> Result<ChapterQuizStats> {
        let chapter_exists: Option<(Uuid,)> =
            sqlx::query_as("SELECT id FROM chapters WHERE id = $1")
                .bind(chapter_id)
                .fetch_optional(&self.pool)
                .await?;
        if chapter_exists.is_none() {
            return Err(Error::NotFound("Chapter not found".to_string()));
        }

        #[derive(sqlx::FromRow)]
        struct Row {
            quiz_id: Uuid,
            date_of_quiz: NaiveDate,
            participants: i64,
            average_percentage: Option<f64>,
        }

        let rows = sqlx::query_as::<_, Row>(
            r#"
            SELECT q.id AS quiz_id, q.date_of_quiz,
                   COUNT(sc.id) AS participants,
                   AVG(CASE WHEN sc.max_score > 0
                            THEN sc.total_score::float8 / sc.max_score * 100
                            ELSE 0 END) AS average_percentage
            FROM quizzes q
            LEFT JOIN scores sc ON sc.quiz_id = q.id
            WHERE q.chapter_id = $1
            GROUP BY q.id, q.date_of_quiz
            ORDER BY q.date_of_quiz
            "#,
        )
        .bind(chapter_id)
        .fetch_all(&self.pool)
        .await?;

        let participation: Vec<QuizStat> = rows
            .into_iter()
            .map(|r| QuizStat {
                quiz_id: r.quiz_id,
                date_of_quiz: r.date_of_quiz,
                participants: r.participants,
                average_percentage: r.average_percentage.unwrap_or(0.0),
            })
            .collect();

        let averages: Vec<f64> = participation.iter().map(|q| q.average_percentage).collect();

        Ok(ChapterQuizStats {
            average_score_histogram: histogram(&averages, PERCENT_BINS, 0.0, 100.0),
            participation,
        })
    }

    /// Performance-over-time series and per-subject averages for one user.
    pub async fn user_dashboard(&self, user_id: Uuid) -> Result<UserDashboard> {
        #[derive(sqlx::FromRow)]
        struct PerfRow {
            quiz_id: Uuid,
            date_of_quiz: NaiveDate,
            total_score: i32,
            max_score: i32,
        }

        let perf_rows = sqlx::query_as::<_, PerfRow>(
            r#"
            SELECT sc.quiz_id, q.date_of_quiz, sc.total_score, sc.max_score
            FROM scores sc
            JOIN quizzes q ON q.id = sc.quiz_id
            WHERE sc.user_id = $1
            ORDER BY q.date_of_quiz, sc.created_at
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        let performance: Vec<PerformancePoint> = perf_rows
            .into_iter()
            .map(|r| PerformancePoint {
                quiz_id: r.quiz_id,
                date_of_quiz: r.date_of_quiz,
                percentage: crate::models::score::percentage(r.total_score, r.max_score),
            })
            .collect();

        #[derive(sqlx::FromRow)]
        struct SubjectRow {
            subject_id: Uuid,
            subject_name: String,
            average_percentage: f64,
            attempts: i64,
        }

        let subject_rows = sqlx::query_as::<_, SubjectRow>(
            r#"
            SELECT s.id AS subject_id, s.name AS subject_name,
                   AVG(CASE WHEN sc.max_score > 0
                            THEN sc.total_score::float8 / sc.max_score * 100
                            ELSE 0 END) AS average_percentage,
                   COUNT(sc.id) AS attempts
            FROM scores sc
            JOIN quizzes q ON q.id = sc.quiz_id
            JOIN chapters c ON c.id = q.chapter_id
            JOIN subjects s ON s.id = c.subject_id
            WHERE sc.user_id = $1
            GROUP BY s.id, s.name
            ORDER BY s.name
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        let quizzes_taken = performance.len() as i64;
        let average_percentage = if performance.is_empty() {
            0.0
        } else {
            performance.iter().map(|p| p.percentage).sum::<f64>() / performance.len() as f64
        };

        Ok(UserDashboard {
            performance,
            subject_averages: subject_rows
                .into_iter()
                .map(|r| SubjectAverage {
                    subject_id: r.subject_id,
                    subject_name: r.subject_name,
                    average_percentage: r.average_percentage,
                    attempts: r.attempts,
                })
                .collect(),
            quizzes_taken,
            average_percentage,
        })
    }
}

/// Bins `values` into `bins` equal-width buckets over `[min, max]`. Values
/// outside the range are clamped into the edge bins; an empty range gets a
/// single bucket.
pub fn histogram(values: &[f64], bins: usize, min: f64, max: f64) -> Vec<HistogramBin> {
    let bins = bins.max(1);
    let width = (max - min) / bins as f64;
    if width <= 0.0 {
        return vec![HistogramBin {
            lower: min,
            upper: max,
            count: values.len() as u32,
        }];
    }

    let mut out: Vec<HistogramBin> = (0..bins)
        .map(|i| HistogramBin {
            lower: min + width * i as f64,
            upper: min + width * (i + 1) as f64,
            count: 0,
        })
        .collect();

    for &v in values {
        let idx = ((v - min) / width).floor() as i64;
        let idx = idx.clamp(0, bins as i64 - 1) as usize;
        out[idx].count += 1;
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn histogram_distributes_values_into_bins() {
        let values = [5.0, 15.0, 15.5, 95.0, 100.0];
        let bins = histogram(&values, 10, 0.0, 100.0);
        assert_eq!(bins.len(), 10);
        assert_eq!(bins[0].count, 1);
        assert_eq!(bins[1].count, 2);
        // The top edge lands in the last bin, not past it.
        assert_eq!(bins[9].count, 2);
        assert_eq!(bins.iter().map(|b| b.count).sum::<u32>(), 5);
    }

    #[test]
    fn histogram_clamps_out_of_range_values() {
        let bins = histogram(&[-10.0, 110.0], 10, 0.0, 100.0);
        assert_eq!(bins[0].count, 1);
        assert_eq!(bins[9].count, 1);
    }

    #[test]
    fn histogram_handles_empty_input_and_empty_range() {
        let bins = histogram(&[], 10, 0.0, 100.0);
        assert!(bins.iter().all(|b| b.count == 0));

        let degenerate = histogram(&[1.0, 2.0], 10, 0.0, 0.0);
        assert_eq!(degenerate.len(), 1);
        assert_eq!(degenerate[0].count, 2);
    }

    #[test]
    fn histogram_bin_edges_cover_the_range() {
        let bins = histogram(&[], 4, 0.0, 100.0);
        assert_eq!(bins[0].lower, 0.0);
        assert_eq!(bins[3].upper, 100.0);
        assert_eq!(bins[1].lower, bins[0].upper);
    }
}
