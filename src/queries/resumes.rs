use hirelink_schema::ResumeAddDto;
use sqlx::{Sqlite, SqliteConnection};

use crate::db::models::Resume;
use crate::db::patch::{DbPatchable, EntityPatch, ResumePatch};
use crate::error::HirelinkError;

const RESUME_COLUMNS: &str = "id, title, compensation, workload, worker_id, created_at, updated_at";

pub async fn insert_resume(
    conn: &mut SqliteConnection,
    resume: &ResumeAddDto,
) -> Result<Resume, HirelinkError> {
    let row = sqlx::query_as::<_, Resume>(&format!(
        r#"
        INSERT INTO resumes (title, compensation, workload, worker_id)
        VALUES (?, ?, ?, ?)
        RETURNING {RESUME_COLUMNS}
        "#
    ))
    .bind(&resume.title)
    .bind(resume.compensation)
    .bind(resume.workload.as_str())
    .bind(resume.worker_id)
    .fetch_one(&mut *conn)
    .await?;

    Ok(row)
}

pub async fn insert_resumes(
    conn: &mut SqliteConnection,
    resumes: &[ResumeAddDto],
) -> Result<Vec<Resume>, HirelinkError> {
    if resumes.is_empty() {
        return Ok(Vec::new());
    }
    let mut query_builder =
        sqlx::QueryBuilder::<Sqlite>::new("INSERT INTO resumes (title, compensation, workload, worker_id) ");
    query_builder.push_values(resumes, |mut b, resume| {
        b.push_bind(resume.title.as_str())
            .push_bind(resume.compensation)
            .push_bind(resume.workload.as_str())
            .push_bind(resume.worker_id);
    });
    query_builder.push(format!(" RETURNING {RESUME_COLUMNS}"));

    let mut rows = query_builder
        .build_query_as::<Resume>()
        .fetch_all(&mut *conn)
        .await?;
    rows.sort_by_key(|r| r.id);
    Ok(rows)
}

pub async fn get_resume(
    conn: &mut SqliteConnection,
    id: i64,
) -> Result<Option<Resume>, HirelinkError> {
    let row = sqlx::query_as::<_, Resume>(&format!(
        "SELECT {RESUME_COLUMNS} FROM resumes WHERE id = ?"
    ))
    .bind(id)
    .fetch_optional(&mut *conn)
    .await?;

    Ok(row)
}

pub async fn list_resumes_by_worker(
    conn: &mut SqliteConnection,
    worker_id: i64,
) -> Result<Vec<Resume>, HirelinkError> {
    let rows = sqlx::query_as::<_, Resume>(&format!(
        "SELECT {RESUME_COLUMNS} FROM resumes WHERE worker_id = ? ORDER BY id"
    ))
    .bind(worker_id)
    .fetch_all(&mut *conn)
    .await?;

    Ok(rows)
}

/// Applies `patch` (always bumping `updated_at`) and returns the stored row.
pub async fn update_resume(
    conn: &mut SqliteConnection,
    id: i64,
    patch: ResumePatch,
) -> Result<Option<Resume>, HirelinkError> {
    let affected = EntityPatch::Resume { id, patch }.apply_patch(conn).await?;
    if affected == 0 {
        return Ok(None);
    }
    get_resume(conn, id).await
}
