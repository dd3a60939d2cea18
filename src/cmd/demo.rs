use hirelink_schema::{WorkerDto, WorkerRelDto};
use serde::Serialize;
use tracing::info;

use crate::config::Config;
use crate::db::models::{Resume, Worker};
use crate::db::patch::{ResumePatch, WorkerPatch};
use crate::error::HirelinkError;
use crate::loading::{LoadStrategy, Loaded, OrderBy};
use crate::queries::analytics::AvgCompensationQuery;
use crate::service::{Hiring, blocking};

fn print_json<T: Serialize>(title: &str, value: &T) -> Result<(), HirelinkError> {
    println!("== {title}");
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn projected(loaded: Loaded<Worker, Resume>) -> Vec<WorkerRelDto> {
    loaded
        .into_items()
        .into_iter()
        .map(WorkerRelDto::from)
        .collect()
}

pub(super) fn run(cfg: &Config) -> Result<(), HirelinkError> {
    let hiring = blocking::Hiring::connect(&cfg.database)?;
    hiring.seed_all()?;

    print_json("workers", &hiring.workers_dto()?)?;

    if let Some(worker) = hiring.update_worker(2, WorkerPatch::username("Misha"))? {
        print_json("update_worker", &WorkerDto::from(worker))?;
    }
    if let Some(resume) = hiring.update_resume(
        1,
        ResumePatch {
            compensation: Some(60_000),
            ..Default::default()
        },
    )? {
        print_json("update_resume", &resume)?;
    }

    for strategy in [
        LoadStrategy::Lazy,
        LoadStrategy::Joined,
        LoadStrategy::BatchedIn,
    ] {
        let loaded = hiring.workers_with_resumes(strategy)?;
        info!(?strategy, round_trips = loaded.round_trips, "workers with resumes");
        print_json(&format!("workers_with_resumes {strategy:?}"), &projected(loaded))?;
    }

    let parttime = hiring.workers_with_parttime_resumes(LoadStrategy::BatchedIn)?;
    print_json("workers_with_parttime_resumes", &projected(parttime))?;

    let matching = hiring.workers_with_matching_resumes(Hiring::parttime_filter())?;
    print_json("workers_with_matching_resumes", &projected(matching))?;

    let top = hiring.workers_with_top_resumes(2, OrderBy::desc("compensation"))?;
    print_json("workers_with_top_resumes", &projected(top))?;

    print_json("workers_with_resumes_dto", &hiring.workers_with_resumes_dto()?)?;
    print_json(
        "avg_compensation",
        &hiring.avg_compensation_dto(&AvgCompensationQuery::default())?,
    )?;
    print_json("compensation_deviation", &hiring.compensation_deviation()?)?;
    print_json(
        "resumes_with_all_relationships",
        &hiring.resumes_with_all_relationships()?,
    )?;

    hiring.close();
    Ok(())
}
