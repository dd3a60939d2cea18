//! Grouped aggregates and window computations over resumes.
//!
//! Filters on base rows go into `WHERE`; filters on aggregates go into
//! `HAVING` or the outer query. Ordering is applied to the final projection only.

use hirelink_schema::Workload;
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, SqliteConnection};

use crate::error::HirelinkError;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct WorkloadAvgCompensation {
    #[sqlx(try_from = "String")]
    pub workload: Workload,
    pub avg_compensation: i64,
}

/// Grouping inputs: `title LIKE title_like AND compensation > min_compensation`
/// before grouping, `AVG(compensation) > min_avg` after it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AvgCompensationQuery {
    pub title_like: String,
    pub min_compensation: i64,
    pub min_avg: i64,
}

impl AvgCompensationQuery {
    /// Resumes whose title contains `needle`.
    pub fn containing(needle: &str, min_compensation: i64, min_avg: i64) -> Self {
        Self {
            title_like: format!("%{needle}%"),
            min_compensation,
            min_avg,
        }
    }
}

impl Default for AvgCompensationQuery {
    fn default() -> Self {
        Self::containing("Python", 40_000, 70_000)
    }
}

/// Average compensation per workload, rounded to the nearest integer and
/// ordered by workload tag.
pub async fn avg_compensation_by_workload(
    conn: &mut SqliteConnection,
    query: &AvgCompensationQuery,
) -> Result<Vec<WorkloadAvgCompensation>, HirelinkError> {
    let rows = sqlx::query_as::<_, WorkloadAvgCompensation>(
        r#"
        SELECT workload, CAST(ROUND(AVG(compensation)) AS INTEGER) AS avg_compensation
        FROM resumes
        WHERE title LIKE ? AND compensation > ?
        GROUP BY workload
        HAVING AVG(compensation) > ?
        ORDER BY workload
        "#,
    )
    .bind(&query.title_like)
    .bind(query.min_compensation)
    .bind(query.min_avg)
    .fetch_all(&mut *conn)
    .await?;

    Ok(rows)
}

/// One resume compared with the average of its workload partition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct CompensationDeviation {
    pub worker_id: i64,
    pub username: String,
    pub resume_id: i64,
    pub compensation: i64,
    #[sqlx(try_from = "String")]
    pub workload: Workload,
    pub avg_workload_compensation: i64,
    pub compensation_diff: i64,
}

/// Per resume: the partition-local average compensation for its workload and
/// the difference from it, largest positive deviation first.
///
/// Resumes without compensation are left out.
pub async fn compensation_deviation(
    conn: &mut SqliteConnection,
) -> Result<Vec<CompensationDeviation>, HirelinkError> {
    let rows = sqlx::query_as::<_, CompensationDeviation>(
        r#"
        WITH helper2 AS (
            SELECT
                helper1.*,
                compensation - avg_workload_compensation AS compensation_diff
            FROM (
                SELECT
                    w.id AS worker_id,
                    w.username AS username,
                    r.id AS resume_id,
                    r.compensation AS compensation,
                    r.workload AS workload,
                    CAST(ROUND(AVG(r.compensation) OVER (PARTITION BY r.workload)) AS INTEGER)
                        AS avg_workload_compensation
                FROM resumes r
                JOIN workers w ON r.worker_id = w.id
                WHERE r.compensation IS NOT NULL
            ) helper1
        )
        SELECT
            worker_id, username, resume_id, compensation, workload,
            avg_workload_compensation, compensation_diff
        FROM helper2
        ORDER BY compensation_diff DESC, resume_id
        "#,
    )
    .fetch_all(&mut *conn)
    .await?;

    Ok(rows)
}
