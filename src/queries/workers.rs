use hirelink_schema::WorkerAddDto;
use sqlx::{Sqlite, SqliteConnection};

use crate::db::models::Worker;
use crate::db::patch::{DbPatchable, EntityPatch, WorkerPatch};
use crate::error::HirelinkError;

pub async fn insert_worker(
    conn: &mut SqliteConnection,
    worker: &WorkerAddDto,
) -> Result<Worker, HirelinkError> {
    let row = sqlx::query_as::<_, Worker>(
        r#"
        INSERT INTO workers (username, phone)
        VALUES (?, ?)
        RETURNING id, username, phone
        "#,
    )
    .bind(&worker.username)
    .bind(worker.phone.as_deref())
    .fetch_one(&mut *conn)
    .await?;

    Ok(row)
}

/// Inserts several workers as one batch, returning them in input order.
pub async fn insert_workers(
    conn: &mut SqliteConnection,
    workers: &[WorkerAddDto],
) -> Result<Vec<Worker>, HirelinkError> {
    if workers.is_empty() {
        return Ok(Vec::new());
    }
    let mut query_builder = sqlx::QueryBuilder::<Sqlite>::new("INSERT INTO workers (username, phone) ");
    query_builder.push_values(workers, |mut b, worker| {
        b.push_bind(worker.username.as_str())
            .push_bind(worker.phone.as_deref());
    });
    query_builder.push(" RETURNING id, username, phone");

    let mut rows = query_builder
        .build_query_as::<Worker>()
        .fetch_all(&mut *conn)
        .await?;
    rows.sort_by_key(|w| w.id);
    Ok(rows)
}

pub async fn select_workers(conn: &mut SqliteConnection) -> Result<Vec<Worker>, HirelinkError> {
    let rows = sqlx::query_as::<_, Worker>(
        r#"
        SELECT id, username, phone
        FROM workers
        ORDER BY id
        "#,
    )
    .fetch_all(&mut *conn)
    .await?;

    Ok(rows)
}

/// `Ok(None)` when no worker has this id.
pub async fn get_worker(
    conn: &mut SqliteConnection,
    id: i64,
) -> Result<Option<Worker>, HirelinkError> {
    let row = sqlx::query_as::<_, Worker>(
        r#"
        SELECT id, username, phone
        FROM workers
        WHERE id = ?
        "#,
    )
    .bind(id)
    .fetch_optional(&mut *conn)
    .await?;

    Ok(row)
}

/// Applies `patch` and returns the stored row, or `None` for an unknown id.
pub async fn update_worker(
    conn: &mut SqliteConnection,
    id: i64,
    patch: WorkerPatch,
) -> Result<Option<Worker>, HirelinkError> {
    let affected = EntityPatch::Worker { id, patch }.apply_patch(conn).await?;
    if affected == 0 {
        return Ok(None);
    }
    get_worker(conn, id).await
}

/// Re-reads `worker` from storage in place. Returns `false` if it no longer exists.
pub async fn refresh_worker(
    conn: &mut SqliteConnection,
    worker: &mut Worker,
) -> Result<bool, HirelinkError> {
    match get_worker(conn, worker.id).await? {
        Some(fresh) => {
            *worker = fresh;
            Ok(true)
        }
        None => Ok(false),
    }
}

/// Deletes the worker; its resumes (and their applications) go with it.
pub async fn delete_worker(conn: &mut SqliteConnection, id: i64) -> Result<bool, HirelinkError> {
    let result = sqlx::query("DELETE FROM workers WHERE id = ?")
        .bind(id)
        .execute(&mut *conn)
        .await?;

    Ok(result.rows_affected() > 0)
}
