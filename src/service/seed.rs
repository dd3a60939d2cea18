//! Demo data used by the CLI and the scenario walkthrough.

use hirelink_schema::{ResumeAddDto, VacancyAddDto, WorkerAddDto, Workload};
use sqlx::SqliteConnection;
use tracing::info;

use crate::db::models::{Application, Resume, Vacancy, Worker};
use crate::error::HirelinkError;
use crate::queries::{resumes, vacancies, workers};

pub const STARTER_WORKERS: [&str; 2] = ["Bobr", "Volk"];
pub const ADDITIONAL_WORKERS: [&str; 3] = ["Artem", "Roman", "Petr"];

pub const DEMO_VACANCY_TITLE: &str = "Python программист";
pub const DEMO_VACANCY_COMPENSATION: i64 = 250_000;
/// Resumes that reply to the demo vacancy.
pub const DEMO_REPLY_RESUMES: [i64; 2] = [1, 2];

fn add_workers(names: &[&str]) -> Vec<WorkerAddDto> {
    names
        .iter()
        .map(|name| WorkerAddDto {
            username: (*name).to_string(),
            phone: None,
        })
        .collect()
}

fn resume(title: &str, compensation: i64, workload: Workload, worker_id: i64) -> ResumeAddDto {
    ResumeAddDto {
        title: title.to_string(),
        compensation: Some(compensation),
        workload,
        worker_id,
    }
}

fn worker_id(workers: &[Worker], username: &str) -> Result<i64, HirelinkError> {
    workers
        .iter()
        .find(|w| w.username == username)
        .map(|w| w.id)
        .ok_or_else(|| HirelinkError::NotFound(format!("worker {username}")))
}

pub async fn seed_workers(conn: &mut SqliteConnection) -> Result<Vec<Worker>, HirelinkError> {
    let rows = workers::insert_workers(conn, &add_workers(&STARTER_WORKERS)).await?;
    info!(count = rows.len(), "seeded workers");
    Ok(rows)
}

/// The four starter resumes. Requires the starter workers.
pub async fn seed_resumes(conn: &mut SqliteConnection) -> Result<Vec<Resume>, HirelinkError> {
    let existing = workers::select_workers(conn).await?;
    let bobr = worker_id(&existing, "Bobr")?;
    let volk = worker_id(&existing, "Volk")?;

    let rows = resumes::insert_resumes(
        conn,
        &[
            resume("Python Junior Developer", 50_000, Workload::Fulltime, bobr),
            resume("Python Разработчик", 150_000, Workload::Fulltime, bobr),
            resume("Python Data Engineer", 250_000, Workload::Parttime, volk),
            resume("Data Scientist", 300_000, Workload::Fulltime, volk),
        ],
    )
    .await?;
    info!(count = rows.len(), "seeded resumes");
    Ok(rows)
}

/// Three more workers and five more resumes for the analytics scenarios.
pub async fn seed_additional_resumes(
    conn: &mut SqliteConnection,
) -> Result<Vec<Resume>, HirelinkError> {
    let added = workers::insert_workers(conn, &add_workers(&ADDITIONAL_WORKERS)).await?;
    let artem = worker_id(&added, "Artem")?;
    let roman = worker_id(&added, "Roman")?;
    let petr = worker_id(&added, "Petr")?;

    let rows = resumes::insert_resumes(
        conn,
        &[
            resume("Python программист", 60_000, Workload::Fulltime, artem),
            resume("Machine Learning Engineer", 70_000, Workload::Parttime, artem),
            resume("Python Data Scientist", 80_000, Workload::Fulltime, roman),
            resume("Python Analyst", 90_000, Workload::Parttime, roman),
            resume("Python Junior Developer", 100_000, Workload::Fulltime, petr),
        ],
    )
    .await?;
    info!(workers = added.len(), resumes = rows.len(), "seeded additional resumes");
    Ok(rows)
}

pub async fn seed_vacancies_and_replies(
    conn: &mut SqliteConnection,
) -> Result<(Vacancy, Vec<Application>), HirelinkError> {
    let vacancy = VacancyAddDto {
        title: DEMO_VACANCY_TITLE.to_string(),
        compensation: Some(DEMO_VACANCY_COMPENSATION),
    };
    let (vacancy, replies) = vacancies::add_vacancy_and_replies(
        conn,
        &vacancy,
        &DEMO_REPLY_RESUMES,
        Some("Добрый день! Хочу у вас работать."),
    )
    .await?;
    info!(vacancy_id = vacancy.id, replies = replies.len(), "seeded vacancy");
    Ok((vacancy, replies))
}
