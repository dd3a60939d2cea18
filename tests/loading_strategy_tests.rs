mod common;

use common::TempDb;
use hirelink::db::{Resume, VacancyBrief, Worker};
use hirelink::error::HirelinkError;
use hirelink::loading::{Filter, LoadOptions, LoadStrategy, Loaded, OrderBy, ParentQuery};
use hirelink::Hiring;

fn ids(loaded: &Loaded<Worker, Resume>) -> Vec<(i64, Vec<i64>)> {
    loaded
        .items
        .iter()
        .map(|w| (w.parent.id, w.related.iter().map(|r| r.id).collect()))
        .collect()
}

async fn seeded(tag: &str) -> (TempDb, Hiring) {
    let db = TempDb::new(tag);
    let hiring = Hiring::connect(&db.config()).await.unwrap();
    hiring.seed_all().await.unwrap();
    (db, hiring)
}

#[tokio::test]
async fn strategies_agree_and_differ_only_in_round_trips() {
    let (_db, hiring) = seeded("strategies").await;

    let lazy = hiring.workers_with_resumes(LoadStrategy::Lazy).await.unwrap();
    let joined = hiring.workers_with_resumes(LoadStrategy::Joined).await.unwrap();
    let batched = hiring.workers_with_resumes(LoadStrategy::BatchedIn).await.unwrap();

    assert_eq!(lazy.items, joined.items);
    assert_eq!(joined.items, batched.items);

    assert_eq!(
        ids(&joined),
        vec![
            (1, vec![1, 2]),
            (2, vec![3, 4]),
            (3, vec![5, 6]),
            (4, vec![7, 8]),
            (5, vec![9]),
        ]
    );

    assert_eq!(lazy.round_trips, 1 + 5);
    assert_eq!(joined.round_trips, 1);
    assert_eq!(batched.round_trips, 2);
    hiring.close().await;
}

#[tokio::test]
async fn workers_without_resumes_are_kept_by_outer_strategies() {
    let (_db, hiring) = seeded("childless").await;
    let loner = hiring
        .insert_workers(&[hirelink_schema::WorkerAddDto {
            username: "Loner".to_string(),
            phone: None,
        }])
        .await
        .unwrap()
        .remove(0);

    for strategy in [LoadStrategy::Lazy, LoadStrategy::Joined, LoadStrategy::BatchedIn] {
        let loaded = hiring.workers_with_resumes(strategy).await.unwrap();
        let last = loaded.items.last().unwrap();
        assert_eq!(last.parent.id, loner.id, "{strategy:?}");
        assert!(last.related.is_empty(), "{strategy:?}");
    }
    hiring.close().await;
}

#[tokio::test]
async fn conditioned_relation_restricts_children_under_every_strategy() {
    let (_db, hiring) = seeded("parttime").await;
    let expected: Vec<(i64, Vec<i64>)> = vec![
        (1, vec![]),
        (2, vec![3]),
        (3, vec![6]),
        (4, vec![8]),
        (5, vec![]),
    ];

    for strategy in [LoadStrategy::Lazy, LoadStrategy::Joined, LoadStrategy::BatchedIn] {
        let loaded = hiring.workers_with_parttime_resumes(strategy).await.unwrap();
        assert_eq!(ids(&loaded), expected, "{strategy:?}");
    }
    hiring.close().await;
}

#[tokio::test]
async fn join_with_filter_drops_parents_without_matches() {
    let (_db, hiring) = seeded("containseager").await;

    let loaded = hiring
        .workers_with_matching_resumes(Hiring::parttime_filter())
        .await
        .unwrap();
    assert_eq!(ids(&loaded), vec![(2, vec![3]), (3, vec![6]), (4, vec![8])]);
    assert_eq!(loaded.round_trips, 1);

    let rich = hiring
        .workers_with_matching_resumes(Filter::new().gt("compensation", 200_000))
        .await
        .unwrap();
    assert_eq!(ids(&rich), vec![(2, vec![3, 4])]);
    hiring.close().await;
}

#[tokio::test]
async fn child_filter_on_outer_strategies_keeps_every_parent() {
    let (_db, hiring) = seeded("outerfilter").await;
    let options = LoadOptions::filtered(Filter::new().gt("compensation", 200_000));

    for strategy in [LoadStrategy::Lazy, LoadStrategy::Joined, LoadStrategy::BatchedIn] {
        let loaded: Loaded<Worker, Resume> = hiring
            .load(&ParentQuery::all(), "resumes", strategy, &options)
            .await
            .unwrap();
        assert_eq!(
            ids(&loaded),
            vec![(1, vec![]), (2, vec![3, 4]), (3, vec![]), (4, vec![]), (5, vec![])],
            "{strategy:?}"
        );
    }
    hiring.close().await;
}

#[tokio::test]
async fn top_resumes_per_worker_follow_the_configured_order() {
    let (_db, hiring) = seeded("topn").await;

    let best = hiring
        .workers_with_top_resumes(1, OrderBy::desc("compensation"))
        .await
        .unwrap();
    assert_eq!(
        ids(&best),
        vec![(1, vec![2]), (2, vec![4]), (3, vec![6]), (4, vec![8]), (5, vec![9])]
    );

    let cheapest = hiring
        .workers_with_top_resumes(1, OrderBy::asc("compensation"))
        .await
        .unwrap();
    assert_eq!(
        ids(&cheapest),
        vec![(1, vec![1]), (2, vec![3]), (3, vec![5]), (4, vec![7]), (5, vec![9])]
    );

    let two = hiring
        .workers_with_top_resumes(2, OrderBy::desc("compensation"))
        .await
        .unwrap();
    assert_eq!(ids(&two), ids(&hiring.workers_with_resumes(LoadStrategy::Joined).await.unwrap()));

    // the same limit through the batched strategy
    let batched: Loaded<Worker, Resume> = hiring
        .load(
            &ParentQuery::all(),
            "resumes",
            LoadStrategy::BatchedIn,
            &LoadOptions::default().per_parent_limit(1, OrderBy::desc("compensation")),
        )
        .await
        .unwrap();
    assert_eq!(batched.items, best.items);
    hiring.close().await;
}

#[tokio::test]
async fn parent_limit_and_order_apply_before_the_join() {
    let (_db, hiring) = seeded("parentlimit").await;
    let parents = ParentQuery::all().order(OrderBy::desc("id")).limit(2);

    let joined: Loaded<Worker, Resume> = hiring
        .load(&parents, "resumes", LoadStrategy::Joined, &LoadOptions::default())
        .await
        .unwrap();
    let lazy: Loaded<Worker, Resume> = hiring
        .load(&parents, "resumes", LoadStrategy::Lazy, &LoadOptions::default())
        .await
        .unwrap();

    assert_eq!(ids(&joined), vec![(5, vec![9]), (4, vec![7, 8])]);
    assert_eq!(joined.items, lazy.items);
    hiring.close().await;
}

#[tokio::test]
async fn many_to_one_and_many_to_many_relations_load() {
    let (_db, hiring) = seeded("directions").await;

    let owners: Loaded<Resume, Worker> = hiring
        .load(&ParentQuery::all(), "worker", LoadStrategy::BatchedIn, &LoadOptions::default())
        .await
        .unwrap();
    let owner_of_3 = owners.items.iter().find(|r| r.parent.id == 3).unwrap();
    assert_eq!(owner_of_3.one().map(|w| w.username.as_str()), Some("Volk"));
    assert!(owners.items.iter().all(|r| r.related.len() == 1));

    let replied: Loaded<Resume, VacancyBrief> = hiring
        .load(
            &ParentQuery::all().filter(Filter::new().eq("id", 1)),
            "vacancies_replied",
            LoadStrategy::Joined,
            &LoadOptions::default(),
        )
        .await
        .unwrap();
    assert_eq!(replied.items.len(), 1);
    assert_eq!(replied.items[0].related[0].title, "Python программист");

    let applicants: Loaded<hirelink::db::Vacancy, Resume> = hiring
        .load(&ParentQuery::all(), "resumes_replied", LoadStrategy::Lazy, &LoadOptions::default())
        .await
        .unwrap();
    let resume_ids: Vec<i64> = applicants.items[0].related.iter().map(|r| r.id).collect();
    assert_eq!(resume_ids, vec![1, 2]);
    hiring.close().await;
}

#[tokio::test]
async fn unknown_or_mismatched_relations_are_programmer_errors() {
    let (_db, hiring) = seeded("unknown").await;

    let err = hiring
        .load::<Worker, Resume>(&ParentQuery::all(), "pets", LoadStrategy::Joined, &LoadOptions::default())
        .await
        .unwrap_err();
    assert!(matches!(err, HirelinkError::UnknownRelation(name) if name == "workers.pets"));

    let err = hiring
        .load::<Worker, VacancyBrief>(&ParentQuery::all(), "resumes", LoadStrategy::Lazy, &LoadOptions::default())
        .await
        .unwrap_err();
    assert!(matches!(err, HirelinkError::RelationMismatch { .. }));

    let err = hiring
        .load::<Worker, Resume>(
            &ParentQuery::all(),
            "resumes",
            LoadStrategy::BatchedIn,
            &LoadOptions::filtered(Filter::new().eq("salary", 1)),
        )
        .await
        .unwrap_err();
    assert!(matches!(err, HirelinkError::UnknownColumn { .. }));
    hiring.close().await;
}

#[tokio::test]
async fn bad_child_filter_fails_under_every_strategy_even_without_parents() {
    let db = TempDb::new("bad-filter-empty");
    let hiring = Hiring::connect(&db.config()).await.unwrap();
    let options = LoadOptions::filtered(Filter::new().eq("salary", 1));

    for strategy in [
        LoadStrategy::Lazy,
        LoadStrategy::Joined,
        LoadStrategy::BatchedIn,
        LoadStrategy::JoinWithFilter,
    ] {
        let err = hiring
            .load::<Worker, Resume>(&ParentQuery::all(), "resumes", strategy, &options)
            .await
            .unwrap_err();
        assert!(
            matches!(&err, HirelinkError::UnknownColumn { column, .. } if column == "salary"),
            "{strategy:?}: {err:?}"
        );
    }
    hiring.close().await;
}
