use chrono::{DateTime, Utc};
use hirelink_schema::Workload;
use serde::{Deserialize, Serialize};
use sqlx::sqlite::SqliteRow;
use sqlx::{FromRow, Row};

use crate::db::entity::{Entity, prefixed};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, FromRow)]
pub struct Worker {
    pub id: i64,
    pub username: String,
    pub phone: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, FromRow)]
pub struct Resume {
    pub id: i64,
    pub title: String,
    pub compensation: Option<i64>,
    #[sqlx(try_from = "String")]
    pub workload: Workload,
    pub worker_id: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, FromRow)]
pub struct Vacancy {
    pub id: i64,
    pub title: String,
    pub compensation: Option<i64>,
}

/// Vacancy read with only `id` and `title`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, FromRow)]
pub struct VacancyBrief {
    pub id: i64,
    pub title: String,
}

/// A resume's reply to a vacancy. Keyed by `(resume_id, vacancy_id)`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, FromRow)]
pub struct Application {
    pub resume_id: i64,
    pub vacancy_id: i64,
    pub cover_letter: Option<String>,
}

impl Entity for Worker {
    const TABLE: &'static str = "workers";
    const COLUMNS: &'static [&'static str] = &["id", "username", "phone"];

    fn id(&self) -> i64 {
        self.id
    }

    fn decode(row: &SqliteRow, prefix: &str) -> Result<Self, sqlx::Error> {
        Ok(Self {
            id: row.try_get(prefixed(prefix, "id").as_str())?,
            username: row.try_get(prefixed(prefix, "username").as_str())?,
            phone: row.try_get(prefixed(prefix, "phone").as_str())?,
        })
    }
}

impl Entity for Resume {
    const TABLE: &'static str = "resumes";
    const COLUMNS: &'static [&'static str] = &[
        "id",
        "title",
        "compensation",
        "workload",
        "worker_id",
        "created_at",
        "updated_at",
    ];

    fn id(&self) -> i64 {
        self.id
    }

    fn decode(row: &SqliteRow, prefix: &str) -> Result<Self, sqlx::Error> {
        let workload: String = row.try_get(prefixed(prefix, "workload").as_str())?;
        Ok(Self {
            id: row.try_get(prefixed(prefix, "id").as_str())?,
            title: row.try_get(prefixed(prefix, "title").as_str())?,
            compensation: row.try_get(prefixed(prefix, "compensation").as_str())?,
            workload: Workload::try_from(workload).map_err(|e| sqlx::Error::Decode(Box::new(e)))?,
            worker_id: row.try_get(prefixed(prefix, "worker_id").as_str())?,
            created_at: row.try_get(prefixed(prefix, "created_at").as_str())?,
            updated_at: row.try_get(prefixed(prefix, "updated_at").as_str())?,
        })
    }
}

impl Entity for Vacancy {
    const TABLE: &'static str = "vacancies";
    const COLUMNS: &'static [&'static str] = &["id", "title", "compensation"];

    fn id(&self) -> i64 {
        self.id
    }

    fn decode(row: &SqliteRow, prefix: &str) -> Result<Self, sqlx::Error> {
        Ok(Self {
            id: row.try_get(prefixed(prefix, "id").as_str())?,
            title: row.try_get(prefixed(prefix, "title").as_str())?,
            compensation: row.try_get(prefixed(prefix, "compensation").as_str())?,
        })
    }
}

impl Entity for VacancyBrief {
    const TABLE: &'static str = "vacancies";
    const COLUMNS: &'static [&'static str] = &["id", "title"];

    fn id(&self) -> i64 {
        self.id
    }

    fn decode(row: &SqliteRow, prefix: &str) -> Result<Self, sqlx::Error> {
        Ok(Self {
            id: row.try_get(prefixed(prefix, "id").as_str())?,
            title: row.try_get(prefixed(prefix, "title").as_str())?,
        })
    }
}
