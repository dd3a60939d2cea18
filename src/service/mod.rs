//! Hiring service: one method per scenario.
//!
//! Every call opens its own session, runs to completion on it and commits
//! explicitly. An error (or a cancelled future) drops the session before the
//! commit, so none of that call's writes become visible.

pub mod blocking;
pub mod seed;

use ahash::AHashMap;
use hirelink_schema::{
    ResumeAddDto, ResumeRelVacanciesRepliedDto, VacancyAddDto, WorkerAddDto, WorkerDto,
    WorkerRelDto, WorkloadAvgCompensationDto, Workload,
};
use std::sync::Arc;
use tracing::{debug, info};

use crate::config::DatabaseConfig;
use crate::db::models::{Application, Resume, Vacancy, VacancyBrief, Worker};
use crate::db::patch::{ResumePatch, WorkerPatch};
use crate::db::pool::Database;
use crate::dto::resume_with_replies;
use crate::error::HirelinkError;
use crate::loading::{
    Filter, LoadOptions, LoadStrategy, Loaded, OrderBy, ParentQuery, RelationRegistry,
    load_with_relation,
};
use crate::queries::analytics::{self, AvgCompensationQuery, CompensationDeviation};
use crate::queries::{resumes, vacancies, workers};

#[derive(Debug, Clone)]
pub struct Hiring {
    db: Database,
    registry: Arc<RelationRegistry>,
}

impl Hiring {
    pub fn new(db: Database) -> Result<Self, HirelinkError> {
        Ok(Self {
            db,
            registry: Arc::new(RelationRegistry::hiring()?),
        })
    }

    pub async fn connect(cfg: &DatabaseConfig) -> Result<Self, HirelinkError> {
        Self::new(Database::connect(cfg).await?)
    }

    pub fn database(&self) -> &Database {
        &self.db
    }

    pub fn registry(&self) -> &RelationRegistry {
        &self.registry
    }

    pub async fn close(&self) {
        self.db.close().await;
    }

    // ----- schema and demo data ---------------------------------------------

    /// Drops and recreates every table. Destroys all data.
    pub async fn bootstrap(&self) -> Result<(), HirelinkError> {
        self.db.bootstrap().await
    }

    pub async fn seed_workers(&self) -> Result<Vec<Worker>, HirelinkError> {
        let mut session = self.db.session().await?;
        let rows = seed::seed_workers(&mut *session).await?;
        session.commit().await?;
        Ok(rows)
    }

    pub async fn seed_resumes(&self) -> Result<Vec<Resume>, HirelinkError> {
        let mut session = self.db.session().await?;
        let rows = seed::seed_resumes(&mut *session).await?;
        session.commit().await?;
        Ok(rows)
    }

    pub async fn seed_additional_resumes(&self) -> Result<Vec<Resume>, HirelinkError> {
        let mut session = self.db.session().await?;
        let rows = seed::seed_additional_resumes(&mut *session).await?;
        session.commit().await?;
        Ok(rows)
    }

    pub async fn seed_vacancies_and_replies(
        &self,
    ) -> Result<(Vacancy, Vec<Application>), HirelinkError> {
        let mut session = self.db.session().await?;
        let out = seed::seed_vacancies_and_replies(&mut *session).await?;
        session.commit().await?;
        Ok(out)
    }

    /// Resets the schema and loads every demo data set in one session.
    pub async fn seed_all(&self) -> Result<(), HirelinkError> {
        self.bootstrap().await?;
        let mut session = self.db.session().await?;
        seed::seed_workers(&mut *session).await?;
        seed::seed_resumes(&mut *session).await?;
        seed::seed_additional_resumes(&mut *session).await?;
        seed::seed_vacancies_and_replies(&mut *session).await?;
        session.commit().await?;
        info!("demo data loaded");
        Ok(())
    }

    // ----- workers -----------------------------------------------------------

    pub async fn insert_workers(&self, add: &[WorkerAddDto]) -> Result<Vec<Worker>, HirelinkError> {
        let mut session = self.db.session().await?;
        let rows = workers::insert_workers(&mut *session, add).await?;
        session.commit().await?;
        Ok(rows)
    }

    pub async fn select_workers(&self) -> Result<Vec<Worker>, HirelinkError> {
        let mut session = self.db.session().await?;
        let rows = workers::select_workers(&mut *session).await?;
        session.commit().await?;
        Ok(rows)
    }

    pub async fn get_worker(&self, id: i64) -> Result<Option<Worker>, HirelinkError> {
        let mut session = self.db.session().await?;
        let row = workers::get_worker(&mut *session, id).await?;
        session.commit().await?;
        Ok(row)
    }

    /// Applies the patch and returns the row as re-read inside the same session.
    pub async fn update_worker(
        &self,
        id: i64,
        patch: WorkerPatch,
    ) -> Result<Option<Worker>, HirelinkError> {
        let mut session = self.db.session().await?;
        let row = workers::update_worker(&mut *session, id, patch).await?;
        session.commit().await?;
        Ok(row)
    }

    /// Re-reads `worker` from storage. `false` when it has been deleted.
    pub async fn refresh_worker(&self, worker: &mut Worker) -> Result<bool, HirelinkError> {
        let mut session = self.db.session().await?;
        let found = workers::refresh_worker(&mut *session, worker).await?;
        session.commit().await?;
        Ok(found)
    }

    pub async fn delete_worker(&self, id: i64) -> Result<bool, HirelinkError> {
        let mut session = self.db.session().await?;
        let deleted = workers::delete_worker(&mut *session, id).await?;
        session.commit().await?;
        Ok(deleted)
    }

    // ----- resumes -----------------------------------------------------------

    pub async fn insert_resume(&self, add: &ResumeAddDto) -> Result<Resume, HirelinkError> {
        let mut session = self.db.session().await?;
        let row = resumes::insert_resume(&mut *session, add).await?;
        session.commit().await?;
        Ok(row)
    }

    pub async fn get_resume(&self, id: i64) -> Result<Option<Resume>, HirelinkError> {
        let mut session = self.db.session().await?;
        let row = resumes::get_resume(&mut *session, id).await?;
        session.commit().await?;
        Ok(row)
    }

    pub async fn update_resume(
        &self,
        id: i64,
        patch: ResumePatch,
    ) -> Result<Option<Resume>, HirelinkError> {
        let mut session = self.db.session().await?;
        let row = resumes::update_resume(&mut *session, id, patch).await?;
        session.commit().await?;
        Ok(row)
    }

    pub async fn list_resumes_by_worker(&self, worker_id: i64) -> Result<Vec<Resume>, HirelinkError> {
        let mut session = self.db.session().await?;
        let rows = resumes::list_resumes_by_worker(&mut *session, worker_id).await?;
        session.commit().await?;
        Ok(rows)
    }

    // ----- vacancies and applications ----------------------------------------

    pub async fn insert_vacancy(&self, add: &VacancyAddDto) -> Result<Vacancy, HirelinkError> {
        let mut session = self.db.session().await?;
        let row = vacancies::insert_vacancy(&mut *session, add).await?;
        session.commit().await?;
        Ok(row)
    }

    pub async fn reply_to_vacancy(
        &self,
        resume_id: i64,
        vacancy_id: i64,
        cover_letter: Option<&str>,
    ) -> Result<Application, HirelinkError> {
        let mut session = self.db.session().await?;
        let row = vacancies::reply_to_vacancy(&mut *session, resume_id, vacancy_id, cover_letter)
            .await?;
        session.commit().await?;
        Ok(row)
    }

    /// Creates the vacancy and one application per resume, all or nothing.
    pub async fn add_vacancy_and_replies(
        &self,
        add: &VacancyAddDto,
        resume_ids: &[i64],
        cover_letter: Option<&str>,
    ) -> Result<(Vacancy, Vec<Application>), HirelinkError> {
        let mut session = self.db.session().await?;
        let out =
            vacancies::add_vacancy_and_replies(&mut *session, add, resume_ids, cover_letter).await?;
        session.commit().await?;
        Ok(out)
    }

    pub async fn list_applications(&self, vacancy_id: i64) -> Result<Vec<Application>, HirelinkError> {
        let mut session = self.db.session().await?;
        let rows = vacancies::list_applications(&mut *session, vacancy_id).await?;
        session.commit().await?;
        Ok(rows)
    }

    // ----- relationship scenarios --------------------------------------------

    /// Generic entry point over the relation catalogue.
    pub async fn load<P, C>(
        &self,
        parents: &ParentQuery,
        relation: &str,
        strategy: LoadStrategy,
        options: &LoadOptions,
    ) -> Result<Loaded<P, C>, HirelinkError>
    where
        P: crate::db::Entity,
        C: crate::db::Entity,
    {
        let mut session = self.db.session().await?;
        let loaded = load_with_relation::<P, C>(
            &mut *session,
            &self.registry,
            parents,
            relation,
            strategy,
            options,
        )
        .await?;
        session.commit().await?;
        Ok(loaded)
    }

    /// Every worker with all of their resumes.
    pub async fn workers_with_resumes(
        &self,
        strategy: LoadStrategy,
    ) -> Result<Loaded<Worker, Resume>, HirelinkError> {
        self.load(&ParentQuery::all(), "resumes", strategy, &LoadOptions::default())
            .await
    }

    /// Every worker with only their part-time resumes, via the conditioned relation.
    pub async fn workers_with_parttime_resumes(
        &self,
        strategy: LoadStrategy,
    ) -> Result<Loaded<Worker, Resume>, HirelinkError> {
        self.load(
            &ParentQuery::all(),
            "resumes_parttime",
            strategy,
            &LoadOptions::default(),
        )
        .await
    }

    /// Workers having at least one resume matching `filter`, each with exactly
    /// the matching resumes.
    pub async fn workers_with_matching_resumes(
        &self,
        filter: Filter,
    ) -> Result<Loaded<Worker, Resume>, HirelinkError> {
        self.load(
            &ParentQuery::all(),
            "resumes",
            LoadStrategy::JoinWithFilter,
            &LoadOptions::filtered(filter),
        )
        .await
    }

    /// Default filter for [`Self::workers_with_matching_resumes`].
    pub fn parttime_filter() -> Filter {
        Filter::new().eq("workload", Workload::Parttime)
    }

    /// Every worker with at most `limit` resumes, picked by `order`.
    pub async fn workers_with_top_resumes(
        &self,
        limit: u32,
        order: OrderBy,
    ) -> Result<Loaded<Worker, Resume>, HirelinkError> {
        self.load(
            &ParentQuery::all(),
            "resumes",
            LoadStrategy::Joined,
            &LoadOptions::default().per_parent_limit(limit, order),
        )
        .await
    }

    // ----- projections -------------------------------------------------------

    pub async fn workers_dto(&self) -> Result<Vec<WorkerDto>, HirelinkError> {
        let rows = self.select_workers().await?;
        Ok(rows.into_iter().map(WorkerDto::from).collect())
    }

    pub async fn workers_with_resumes_dto(&self) -> Result<Vec<WorkerRelDto>, HirelinkError> {
        let loaded = self.workers_with_resumes(LoadStrategy::BatchedIn).await?;
        Ok(loaded.into_items().into_iter().map(WorkerRelDto::from).collect())
    }

    pub async fn avg_compensation_dto(
        &self,
        query: &AvgCompensationQuery,
    ) -> Result<Vec<WorkloadAvgCompensationDto>, HirelinkError> {
        let mut session = self.db.session().await?;
        let rows = analytics::avg_compensation_by_workload(&mut *session, query).await?;
        session.commit().await?;
        Ok(rows.into_iter().map(WorkloadAvgCompensationDto::from).collect())
    }

    pub async fn compensation_deviation(&self) -> Result<Vec<CompensationDeviation>, HirelinkError> {
        let mut session = self.db.session().await?;
        let rows = analytics::compensation_deviation(&mut *session).await?;
        session.commit().await?;
        Ok(rows)
    }

    /// Every resume with its owner joined in and its replied vacancies
    /// (id and title only) batched, both read on one session.
    pub async fn resumes_with_all_relationships(
        &self,
    ) -> Result<Vec<ResumeRelVacanciesRepliedDto>, HirelinkError> {
        let mut session = self.db.session().await?;
        let owners = load_with_relation::<Resume, Worker>(
            &mut *session,
            &self.registry,
            &ParentQuery::all(),
            "worker",
            LoadStrategy::Joined,
            &LoadOptions::default(),
        )
        .await?;
        let replies = load_with_relation::<Resume, VacancyBrief>(
            &mut *session,
            &self.registry,
            &ParentQuery::all(),
            "vacancies_replied",
            LoadStrategy::BatchedIn,
            &LoadOptions::default(),
        )
        .await?;
        session.commit().await?;

        let mut replied: AHashMap<i64, Vec<VacancyBrief>> = replies
            .into_items()
            .into_iter()
            .map(|w| (w.parent.id, w.related))
            .collect();

        let out = owners
            .into_items()
            .into_iter()
            .map(|loaded| {
                let vacancies = replied.remove(&loaded.parent.id).unwrap_or_default();
                resume_with_replies(loaded, vacancies)
            })
            .collect::<Result<Vec<_>, _>>()?;
        debug!(resumes = out.len(), "resumes projected with relationships");
        Ok(out)
    }
}
