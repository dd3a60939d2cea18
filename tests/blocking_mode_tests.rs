mod common;

use common::TempDb;
use hirelink::LoadStrategy;
use hirelink::db::WorkerPatch;
use hirelink::queries::analytics::AvgCompensationQuery;
use hirelink::service::blocking::Hiring;
use hirelink_schema::Workload;

#[test]
fn blocking_service_runs_the_scenarios() {
    let db = TempDb::new("blocking");
    let hiring = Hiring::connect(&db.config()).unwrap();
    hiring.seed_all().unwrap();

    let workers = hiring.workers_dto().unwrap();
    let names: Vec<&str> = workers.iter().map(|w| w.username.as_str()).collect();
    assert_eq!(names, vec!["Bobr", "Volk", "Artem", "Roman", "Petr"]);

    let joined = hiring.workers_with_resumes(LoadStrategy::Joined).unwrap();
    assert_eq!(joined.round_trips, 1);
    assert_eq!(joined.items.iter().map(|w| w.related.len()).sum::<usize>(), 9);

    let avg = hiring
        .avg_compensation_dto(&AvgCompensationQuery::default())
        .unwrap();
    let pairs: Vec<(Workload, i64)> = avg.iter().map(|r| (r.workload, r.avg_compensation)).collect();
    assert_eq!(
        pairs,
        vec![(Workload::Fulltime, 88_000), (Workload::Parttime, 170_000)]
    );

    let renamed = hiring
        .update_worker(2, WorkerPatch::username("Misha"))
        .unwrap()
        .unwrap();
    assert_eq!(renamed.username, "Misha");

    let resumes = hiring.resumes_with_all_relationships().unwrap();
    assert_eq!(resumes.len(), 9);
    assert_eq!(resumes[2].worker.username, "Misha");
    assert_eq!(resumes[0].vacancies_replied.len(), 1);
    assert!(resumes[2].vacancies_replied.is_empty());

    hiring.close();
}
