//! Database module: schema, row models, sessions and patches.
//!
//! Layout:
//! - `schema.rs`: SQL DDL and the destructive bootstrap
//! - `pool.rs`: pool construction and per-operation sessions
//! - `models.rs`: Rust structs mirroring DB rows
//! - `entity.rs`: table metadata used to build joins
//! - `patch.rs`: partial-update payloads

pub mod entity;
pub mod models;
pub mod patch;
pub mod pool;
pub mod schema;

mod patch_impl;

pub use entity::Entity;
pub use models::{Application, Resume, Vacancy, VacancyBrief, Worker};
pub use patch::{DbPatchable, EntityPatch, ResumePatch, WorkerPatch};
pub use pool::{Database, Session};
pub use schema::{SQLITE_INIT, TITLE_MAX_LEN};
