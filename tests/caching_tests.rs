//! Query cache behavior: per-key caching, in-flight request deduplication,
//! invalidation after mutations, and write-error propagation.

mod support;

use assert_matches::assert_matches;
use kelasku::{GatewayError, NewDonation, NewTask, PortalClient, PortalError, WeekParity};
use serde_json::json;
use std::sync::Arc;
use std::time::Duration;
use support::FakeGateway;

fn task_rows() -> Vec<serde_json::Value> {
    vec![json!({
        "id": "t1", "judul": "Laporan Praktikum", "deskripsi": "",
        "deadline": "2026-02-10", "selesai": false,
        "mata_pelajaran": "Basis Data", "created_at": "2026-02-01T00:00:00Z"
    })]
}

#[tokio::test]
async fn repeated_queries_hit_the_cache_and_stay_identical() {
    let gateway = Arc::new(FakeGateway::new());
    gateway.set_rows("tasks", task_rows());
    let client = PortalClient::new(gateway.clone());

    let first = client.tasks().await;
    let second = client.tasks().await;

    assert_eq!(gateway.select_count("tasks"), 1);
    assert_eq!(first.source, second.source);
    assert_eq!(first.records.len(), second.records.len());
    assert_eq!(first.records[0].id, second.records[0].id);

    let stats = client.cache_stats();
    assert_eq!(stats.operations, 2);
    assert_eq!(stats.hits, 1);
    assert_eq!(stats.misses, 1);
}

#[tokio::test]
async fn fallback_results_are_cached_too() {
    let gateway = Arc::new(FakeGateway::new());
    let client = PortalClient::new(gateway.clone());

    let first = client.quotes().await;
    let second = client.quotes().await;
    assert!(first.is_fallback());
    assert!(second.is_fallback());
    assert_eq!(gateway.select_count("quotes"), 1);
}

#[tokio::test]
async fn concurrent_requesters_share_one_in_flight_fetch() {
    let gateway = Arc::new(FakeGateway::new());
    gateway.set_rows("profiles", vec![json!({"id": "s1", "nama": "Ahmad Fauzi"})]);
    gateway.set_select_delay(Duration::from_millis(50));
    let client = Arc::new(PortalClient::new(gateway.clone()));

    let (a, b, c, d) = tokio::join!(
        client.students(),
        client.students(),
        client.students(),
        client.students()
    );

    assert_eq!(gateway.select_count("profiles"), 1);
    for result in [a, b, c, d] {
        assert_eq!(result.records.len(), 1);
    }
}

#[tokio::test]
async fn schedule_parities_are_independent_cache_keys() {
    let gateway = Arc::new(FakeGateway::new());
    let client = PortalClient::new(gateway.clone());

    let ganjil = client.schedules(WeekParity::Ganjil).await;
    let genap = client.schedules(WeekParity::Genap).await;
    let ganjil_again = client.schedules(WeekParity::Ganjil).await;

    assert_eq!(gateway.select_count("schedules"), 2);
    assert!(ganjil.records.iter().all(|e| e.minggu == WeekParity::Ganjil));
    assert!(genap.records.iter().all(|e| e.minggu == WeekParity::Genap));
    assert_eq!(ganjil.records.len(), ganjil_again.records.len());
}

#[tokio::test]
async fn successful_mutation_invalidates_only_its_domain() {
    let gateway = Arc::new(FakeGateway::new());
    gateway.set_rows("tasks", task_rows());
    gateway.set_rows("quotes", vec![json!({"id": "q1", "text": "x", "author": "y"})]);
    let client = PortalClient::new(gateway.clone());

    client.tasks().await;
    client.quotes().await;

    client
        .add_task(NewTask {
            judul: "Essay Bahasa Indonesia".to_string(),
            deskripsi: String::new(),
            mata_pelajaran: "Bahasa Indonesia".to_string(),
            deadline: "2026-02-18".to_string(),
        })
        .await
        .expect("insert accepted");

    client.tasks().await;
    client.quotes().await;

    assert_eq!(gateway.select_count("tasks"), 2, "tasks refetched");
    assert_eq!(gateway.select_count("quotes"), 1, "quotes untouched");
}

#[tokio::test]
async fn task_completion_toggle_goes_through_the_gateway() {
    let gateway = Arc::new(FakeGateway::new());
    let client = PortalClient::new(gateway.clone());

    client.set_task_done("t1", true).await.expect("update accepted");
    assert_eq!(gateway.write_count(), 1);
}

#[tokio::test]
async fn required_fields_are_checked_before_the_gateway() {
    let gateway = Arc::new(FakeGateway::new());
    let client = PortalClient::new(gateway.clone());

    let err = client.add_task(NewTask::default()).await.unwrap_err();
    assert_matches!(err, PortalError::MissingField("judul"));

    let err = client
        .add_donation(NewDonation {
            siswa_id: "s1".to_string(),
            nominal: 0,
            tanggal: "2026-02-01".to_string(),
        })
        .await
        .unwrap_err();
    assert_matches!(err, PortalError::MissingField("nominal"));

    assert_eq!(gateway.write_count(), 0, "gateway never contacted");
}

#[tokio::test]
async fn write_errors_surface_and_leave_the_cache_alone() {
    let gateway = Arc::new(FakeGateway::new());
    gateway.set_rows(
        "infaq_transactions",
        vec![json!({
            "id": "d1", "siswa_id": "s1", "nominal": 10000,
            "tanggal": "2026-02-01", "created_at": "2026-02-01T00:00:00Z",
            "profiles": {"nama": "Ahmad Fauzi"}
        })],
    );
    let client = PortalClient::new(gateway.clone());

    client.donations().await;
    gateway.fail_writes(GatewayError::Backend {
        collection: "infaq_transactions".to_string(),
        status: 403,
        message: "forbidden".to_string(),
    });

    let err = client.delete_donation("d1").await.unwrap_err();
    assert_matches!(err, PortalError::Gateway(GatewayError::Backend { status: 403, .. }));

    // The failed write must not have dropped the cached result.
    client.donations().await;
    assert_eq!(gateway.select_count("infaq_transactions"), 1);
}
