//! EntityPatch -> DbPatchable implementation.
//!
//! This sits in the `db` module because it contains SQL/table knowledge.

use async_trait::async_trait;
use sqlx::SqliteConnection;
use tracing::debug;

use crate::db::patch::{DbPatchable, EntityPatch, ResumePatch, WorkerPatch};
use crate::error::HirelinkError;

#[async_trait]
impl DbPatchable for EntityPatch {
    async fn apply_patch(&self, conn: &mut SqliteConnection) -> Result<u64, HirelinkError> {
        match self {
            EntityPatch::Worker { id, patch } => {
                let WorkerPatch { username, phone } = patch;
                let username_set = username.is_some();
                let phone_set = phone.is_some();

                let res = sqlx::query(
                    r#"
                    UPDATE workers
                    SET
                        username = COALESCE(?, username),
                        phone = COALESCE(?, phone)
                    WHERE id = ?
                    "#,
                )
                .bind(username.as_deref())
                .bind(phone.as_deref())
                .bind(id)
                .execute(&mut *conn)
                .await?;

                let affected = res.rows_affected();
                debug!(
                    table = "workers",
                    id,
                    affected,
                    username_set,
                    phone_set,
                    "db patch applied"
                );
                Ok(affected)
            }

            EntityPatch::Resume { id, patch } => {
                let ResumePatch {
                    title,
                    compensation,
                    workload,
                } = patch;
                let title_set = title.is_some();
                let compensation_set = compensation.is_some();
                let workload_set = workload.is_some();

                // updated_at moves on every write, even when no column changes.
                let res = sqlx::query(
                    r#"
                    UPDATE resumes
                    SET
                        title = COALESCE(?, title),
                        compensation = COALESCE(?, compensation),
                        workload = COALESCE(?, workload),
                        updated_at = CURRENT_TIMESTAMP
                    WHERE id = ?
                    "#,
                )
                .bind(title.as_deref())
                .bind(compensation)
                .bind(workload.map(|w| w.as_str()))
                .bind(id)
                .execute(&mut *conn)
                .await?;

                let affected = res.rows_affected();
                debug!(
                    table = "resumes",
                    id,
                    affected,
                    title_set,
                    compensation_set,
                    workload_set,
                    "db patch applied"
                );
                Ok(affected)
            }
        }
    }
}
