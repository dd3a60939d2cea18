//! Synchronous access to the hiring service.
//!
//! [`Hiring`] owns a private tokio runtime and blocks the calling thread for
//! each call. It panics if used from inside an async context; async callers
//! use [`super::Hiring`] directly.

use hirelink_schema::{
    ResumeAddDto, ResumeRelVacanciesRepliedDto, VacancyAddDto, WorkerAddDto, WorkerDto,
    WorkerRelDto, WorkloadAvgCompensationDto,
};
use tokio::runtime::{Builder, Runtime};

use crate::config::DatabaseConfig;
use crate::db::models::{Application, Resume, Vacancy, Worker};
use crate::db::patch::{ResumePatch, WorkerPatch};
use crate::error::HirelinkError;
use crate::loading::{Filter, LoadStrategy, Loaded, OrderBy};
use crate::queries::analytics::{AvgCompensationQuery, CompensationDeviation};

pub struct Hiring {
    rt: Runtime,
    inner: super::Hiring,
}

impl Hiring {
    pub fn connect(cfg: &DatabaseConfig) -> Result<Self, HirelinkError> {
        let rt = Builder::new_multi_thread()
            .worker_threads(1)
            .thread_name("hirelink-blocking")
            .enable_all()
            .build()?;
        let inner = rt.block_on(super::Hiring::connect(cfg))?;
        Ok(Self { rt, inner })
    }

    /// The async service sharing this pool.
    pub fn as_async(&self) -> &super::Hiring {
        &self.inner
    }

    /// Closes the pool and shuts the runtime down.
    pub fn close(self) {
        self.rt.block_on(self.inner.close());
    }

    pub fn bootstrap(&self) -> Result<(), HirelinkError> {
        self.rt.block_on(self.inner.bootstrap())
    }

    pub fn seed_workers(&self) -> Result<Vec<Worker>, HirelinkError> {
        self.rt.block_on(self.inner.seed_workers())
    }

    pub fn seed_resumes(&self) -> Result<Vec<Resume>, HirelinkError> {
        self.rt.block_on(self.inner.seed_resumes())
    }

    pub fn seed_additional_resumes(&self) -> Result<Vec<Resume>, HirelinkError> {
        self.rt.block_on(self.inner.seed_additional_resumes())
    }

    pub fn seed_vacancies_and_replies(&self) -> Result<(Vacancy, Vec<Application>), HirelinkError> {
        self.rt.block_on(self.inner.seed_vacancies_and_replies())
    }

    pub fn seed_all(&self) -> Result<(), HirelinkError> {
        self.rt.block_on(self.inner.seed_all())
    }

    pub fn insert_workers(&self, add: &[WorkerAddDto]) -> Result<Vec<Worker>, HirelinkError> {
        self.rt.block_on(self.inner.insert_workers(add))
    }

    pub fn select_workers(&self) -> Result<Vec<Worker>, HirelinkError> {
        self.rt.block_on(self.inner.select_workers())
    }

    pub fn get_worker(&self, id: i64) -> Result<Option<Worker>, HirelinkError> {
        self.rt.block_on(self.inner.get_worker(id))
    }

    pub fn update_worker(&self, id: i64, patch: WorkerPatch) -> Result<Option<Worker>, HirelinkError> {
        self.rt.block_on(self.inner.update_worker(id, patch))
    }

    pub fn refresh_worker(&self, worker: &mut Worker) -> Result<bool, HirelinkError> {
        self.rt.block_on(self.inner.refresh_worker(worker))
    }

    pub fn delete_worker(&self, id: i64) -> Result<bool, HirelinkError> {
        self.rt.block_on(self.inner.delete_worker(id))
    }

    pub fn insert_resume(&self, add: &ResumeAddDto) -> Result<Resume, HirelinkError> {
        self.rt.block_on(self.inner.insert_resume(add))
    }

    pub fn get_resume(&self, id: i64) -> Result<Option<Resume>, HirelinkError> {
        self.rt.block_on(self.inner.get_resume(id))
    }

    pub fn update_resume(&self, id: i64, patch: ResumePatch) -> Result<Option<Resume>, HirelinkError> {
        self.rt.block_on(self.inner.update_resume(id, patch))
    }

    pub fn list_resumes_by_worker(&self, worker_id: i64) -> Result<Vec<Resume>, HirelinkError> {
        self.rt.block_on(self.inner.list_resumes_by_worker(worker_id))
    }

    pub fn insert_vacancy(&self, add: &VacancyAddDto) -> Result<Vacancy, HirelinkError> {
        self.rt.block_on(self.inner.insert_vacancy(add))
    }

    pub fn reply_to_vacancy(
        &self,
        resume_id: i64,
        vacancy_id: i64,
        cover_letter: Option<&str>,
    ) -> Result<Application, HirelinkError> {
        self.rt
            .block_on(self.inner.reply_to_vacancy(resume_id, vacancy_id, cover_letter))
    }

    pub fn add_vacancy_and_replies(
        &self,
        add: &VacancyAddDto,
        resume_ids: &[i64],
        cover_letter: Option<&str>,
    ) -> Result<(Vacancy, Vec<Application>), HirelinkError> {
        self.rt
            .block_on(self.inner.add_vacancy_and_replies(add, resume_ids, cover_letter))
    }

    pub fn list_applications(&self, vacancy_id: i64) -> Result<Vec<Application>, HirelinkError> {
        self.rt.block_on(self.inner.list_applications(vacancy_id))
    }

    pub fn workers_with_resumes(
        &self,
        strategy: LoadStrategy,
    ) -> Result<Loaded<Worker, Resume>, HirelinkError> {
        self.rt.block_on(self.inner.workers_with_resumes(strategy))
    }

    pub fn workers_with_parttime_resumes(
        &self,
        strategy: LoadStrategy,
    ) -> Result<Loaded<Worker, Resume>, HirelinkError> {
        self.rt
            .block_on(self.inner.workers_with_parttime_resumes(strategy))
    }

    pub fn workers_with_matching_resumes(
        &self,
        filter: Filter,
    ) -> Result<Loaded<Worker, Resume>, HirelinkError> {
        self.rt
            .block_on(self.inner.workers_with_matching_resumes(filter))
    }

    pub fn workers_with_top_resumes(
        &self,
        limit: u32,
        order: OrderBy,
    ) -> Result<Loaded<Worker, Resume>, HirelinkError> {
        self.rt
            .block_on(self.inner.workers_with_top_resumes(limit, order))
    }

    pub fn workers_dto(&self) -> Result<Vec<WorkerDto>, HirelinkError> {
        self.rt.block_on(self.inner.workers_dto())
    }

    pub fn workers_with_resumes_dto(&self) -> Result<Vec<WorkerRelDto>, HirelinkError> {
        self.rt.block_on(self.inner.workers_with_resumes_dto())
    }

    pub fn avg_compensation_dto(
        &self,
        query: &AvgCompensationQuery,
    ) -> Result<Vec<WorkloadAvgCompensationDto>, HirelinkError> {
        self.rt.block_on(self.inner.avg_compensation_dto(query))
    }

    pub fn compensation_deviation(&self) -> Result<Vec<CompensationDeviation>, HirelinkError> {
        self.rt.block_on(self.inner.compensation_deviation())
    }

    pub fn resumes_with_all_relationships(
        &self,
    ) -> Result<Vec<ResumeRelVacanciesRepliedDto>, HirelinkError> {
        self.rt
            .block_on(self.inner.resumes_with_all_relationships())
    }
}
