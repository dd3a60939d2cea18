//! Projection of loaded rows into transfer objects.
//!
//! Conversions consume data that is already in memory; they cannot reach the
//! database. Relations must be loaded before projecting.

use hirelink_schema::{
    ResumeDto, ResumeRelDto, ResumeRelVacanciesRepliedDto, VacancyBriefDto, VacancyDto,
    WorkerDto, WorkerRelDto, WorkloadAvgCompensationDto,
};

use crate::db::models::{Resume, Vacancy, VacancyBrief, Worker};
use crate::error::HirelinkError;
use crate::loading::WithRelation;
use crate::queries::analytics::WorkloadAvgCompensation;

impl From<Worker> for WorkerDto {
    fn from(w: Worker) -> Self {
        Self {
            id: w.id,
            username: w.username,
            phone: w.phone,
        }
    }
}

impl From<Resume> for ResumeDto {
    fn from(r: Resume) -> Self {
        Self {
            id: r.id,
            title: r.title,
            compensation: r.compensation,
            workload: r.workload,
            worker_id: r.worker_id,
            created_at: r.created_at,
            updated_at: r.updated_at,
        }
    }
}

impl From<Vacancy> for VacancyDto {
    fn from(v: Vacancy) -> Self {
        Self {
            id: v.id,
            title: v.title,
            compensation: v.compensation,
        }
    }
}

impl From<VacancyBrief> for VacancyBriefDto {
    fn from(v: VacancyBrief) -> Self {
        Self {
            id: v.id,
            title: v.title,
        }
    }
}

impl From<WorkloadAvgCompensation> for WorkloadAvgCompensationDto {
    fn from(row: WorkloadAvgCompensation) -> Self {
        Self {
            workload: row.workload,
            avg_compensation: row.avg_compensation,
        }
    }
}

impl From<WithRelation<Worker, Resume>> for WorkerRelDto {
    fn from(loaded: WithRelation<Worker, Resume>) -> Self {
        let (worker, resumes) = loaded.into_parts();
        Self {
            id: worker.id,
            username: worker.username,
            phone: worker.phone,
            resumes: resumes.into_iter().map(ResumeDto::from).collect(),
        }
    }
}

impl TryFrom<WithRelation<Resume, Worker>> for ResumeRelDto {
    type Error = HirelinkError;

    fn try_from(loaded: WithRelation<Resume, Worker>) -> Result<Self, Self::Error> {
        let (resume, workers) = loaded.into_parts();
        let worker = owner(resume.id, workers)?;
        Ok(Self {
            resume: resume.into(),
            worker: worker.into(),
        })
    }
}

/// Combines a resume, its owner and its replied vacancies.
pub fn resume_with_replies(
    loaded: WithRelation<Resume, Worker>,
    vacancies: Vec<VacancyBrief>,
) -> Result<ResumeRelVacanciesRepliedDto, HirelinkError> {
    let ResumeRelDto { resume, worker } = ResumeRelDto::try_from(loaded)?;
    Ok(ResumeRelVacanciesRepliedDto {
        resume,
        worker,
        vacancies_replied: vacancies.into_iter().map(VacancyBriefDto::from).collect(),
    })
}

fn owner(resume_id: i64, workers: Vec<Worker>) -> Result<Worker, HirelinkError> {
    workers
        .into_iter()
        .next()
        .ok_or_else(|| HirelinkError::NotFound(format!("owner of resume {resume_id}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use hirelink_schema::Workload;

    fn resume(id: i64, worker_id: i64) -> Resume {
        let now = Utc::now();
        Resume {
            id,
            title: "Python Analyst".to_string(),
            compensation: Some(90_000),
            workload: Workload::Fulltime,
            worker_id,
            created_at: now,
            updated_at: now,
        }
    }

    fn worker(id: i64) -> Worker {
        Worker {
            id,
            username: "Volk".to_string(),
            phone: Some("+7 900 000 00 00".to_string()),
        }
    }

    #[test]
    fn worker_rel_dto_keeps_loaded_resumes() {
        let dto = WorkerRelDto::from(WithRelation {
            parent: worker(2),
            related: vec![resume(4, 2), resume(9, 2)],
        });
        assert_eq!(dto.id, 2);
        assert_eq!(dto.phone.as_deref(), Some("+7 900 000 00 00"));
        assert_eq!(dto.resumes.iter().map(|r| r.id).collect::<Vec<_>>(), vec![4, 9]);
    }

    #[test]
    fn resume_without_loaded_owner_is_reported() {
        let err = ResumeRelDto::try_from(WithRelation {
            parent: resume(1, 5),
            related: Vec::new(),
        })
        .unwrap_err();
        assert!(matches!(err, HirelinkError::NotFound(_)));
    }

    #[test]
    fn replies_are_projected_to_brief_vacancies() {
        let dto = resume_with_replies(
            WithRelation {
                parent: resume(1, 2),
                related: vec![worker(2)],
            },
            vec![VacancyBrief {
                id: 3,
                title: "Python программист".to_string(),
            }],
        )
        .unwrap();
        assert_eq!(dto.worker.id, 2);
        assert_eq!(dto.vacancies_replied.len(), 1);
        assert_eq!(dto.vacancies_replied[0].title, "Python программист");
    }
}
