//! Partial-update payloads and the contract for applying them.

use async_trait::async_trait;
use hirelink_schema::Workload;
use serde::{Deserialize, Serialize};
use sqlx::SqliteConnection;

use crate::error::HirelinkError;

/// Abstraction for applying a patch payload/envelope to the database.
#[async_trait]
pub trait DbPatchable {
    /// Returns the number of rows changed; `0` means the target id does not exist.
    async fn apply_patch(&self, conn: &mut SqliteConnection) -> Result<u64, HirelinkError>;
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WorkerPatch {
    /// `None` => do not change; `Some(v)` => update
    pub username: Option<String>,
    /// `None` => do not change; `Some(v)` => update
    pub phone: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ResumePatch {
    pub title: Option<String>,
    pub compensation: Option<i64>,
    pub workload: Option<Workload>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", content = "data")]
#[serde(rename_all = "snake_case")]
pub enum EntityPatch {
    Worker { id: i64, patch: WorkerPatch },
    Resume { id: i64, patch: ResumePatch },
}

impl EntityPatch {
    pub fn id(&self) -> i64 {
        match self {
            EntityPatch::Worker { id, .. } => *id,
            EntityPatch::Resume { id, .. } => *id,
        }
    }
}

impl WorkerPatch {
    pub fn username(username: impl Into<String>) -> Self {
        Self {
            username: Some(username.into()),
            ..Default::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        self.username.is_none() && self.phone.is_none()
    }
}

impl ResumePatch {
    pub fn is_empty(&self) -> bool {
        self.title.is_none() && self.compensation.is_none() && self.workload.is_none()
    }
}
