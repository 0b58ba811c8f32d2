//! Fallback policy coverage: live rows pass through under normalization,
//! failed or empty reads serve the mock dataset, never a mix.

mod support;

use kelasku::{DataSource, GatewayError, PortalClient, WeekParity};
use serde_json::json;
use std::sync::Arc;
use support::FakeGateway;

fn client_with(gateway: Arc<FakeGateway>) -> PortalClient {
    PortalClient::new(gateway)
}

#[tokio::test]
async fn live_rows_are_served_verbatim() {
    let gateway = Arc::new(FakeGateway::new());
    gateway.set_rows(
        "profiles",
        vec![
            json!({"id": "s1", "nama": "Ahmad Fauzi", "gender": "L", "no_absen": 1, "avatar_url": null}),
            json!({"id": "s2", "nama": "Aisyah Putri", "gender": "P", "no_absen": 2, "avatar_url": "https://cdn.example/a.png"}),
        ],
    );
    let client = client_with(gateway);

    let students = client.students().await;
    assert_eq!(students.source, DataSource::Live);
    assert_eq!(students.records.len(), 2);
    assert_eq!(students.records[0].nama, "Ahmad Fauzi");
    assert_eq!(
        students.records[1].avatar_url.as_deref(),
        Some("https://cdn.example/a.png")
    );
}

#[tokio::test]
async fn transport_failure_serves_the_full_mock_dataset() {
    // Nothing scripted: every read reports a transport failure.
    let client = client_with(Arc::new(FakeGateway::new()));

    let students = client.students().await;
    assert!(students.is_fallback());
    assert_eq!(students.records.len(), 12);

    let tasks = client.tasks().await;
    assert!(tasks.is_fallback());
    assert_eq!(tasks.records.len(), 5);

    let quotes = client.quotes().await;
    assert!(quotes.is_fallback());
    assert_eq!(quotes.records.len(), 6);

    let gallery = client.gallery().await;
    assert!(gallery.is_fallback());
    assert_eq!(gallery.records.len(), 4);

    let groups = client.groups().await;
    assert!(groups.is_fallback());
    assert_eq!(groups.records.len(), 4);
    assert_eq!(groups.records[0].anggota.len(), 3);

    let chart = client.org_chart().await;
    assert!(chart.is_fallback());
    assert_eq!(chart.records.len(), 8);
}

#[tokio::test]
async fn empty_success_is_treated_like_failure() {
    let gateway = Arc::new(FakeGateway::new());
    gateway.set_rows("tasks", vec![]);
    let client = client_with(gateway);

    let tasks = client.tasks().await;
    assert!(tasks.is_fallback());
    assert_eq!(tasks.records.len(), 5);
    assert_eq!(tasks.records[0].judul, "Tugas Pemrograman Web - Membuat Landing Page");
}

#[tokio::test]
async fn backend_error_serves_mock_data() {
    let gateway = Arc::new(FakeGateway::new());
    gateway.set_error(
        "quotes",
        GatewayError::Backend {
            collection: "quotes".to_string(),
            status: 500,
            message: "internal".to_string(),
        },
    );
    let client = client_with(gateway);

    let quotes = client.quotes().await;
    assert!(quotes.is_fallback());
    assert_eq!(quotes.records[0].author, "Nelson Mandela");
}

#[tokio::test]
async fn schedule_fallback_flattens_the_weekly_template() {
    let client = client_with(Arc::new(FakeGateway::new()));

    let schedule = client.schedules(WeekParity::Ganjil).await;
    assert!(schedule.is_fallback());

    let first_monday = schedule
        .records
        .iter()
        .find(|entry| entry.id == "ganjil-Senin-0")
        .expect("synthetic monday id");
    assert_eq!(first_monday.mata_pelajaran, "Matematika");
    assert_eq!(first_monday.guru, "Pak Agus");
    assert_eq!(first_monday.urutan, 0);

    // Order indexes restart per day.
    let first_tuesday = schedule
        .records
        .iter()
        .find(|entry| entry.id == "ganjil-Selasa-0")
        .expect("synthetic tuesday id");
    assert_eq!(first_tuesday.urutan, 0);
    assert_eq!(first_tuesday.mata_pelajaran, "Bahasa Inggris");
}

#[tokio::test]
async fn schedule_live_rows_keep_their_ids() {
    let gateway = Arc::new(FakeGateway::new());
    gateway.set_rows(
        "schedules",
        vec![json!({
            "id": "row-1", "minggu": "genap", "hari": "Senin",
            "mata_pelajaran": "Bahasa Indonesia", "jam": "07:00 - 08:30",
            "guru": "Bu Sari", "urutan": 0
        })],
    );
    let client = client_with(gateway);

    let schedule = client.schedules(WeekParity::Genap).await;
    assert_eq!(schedule.source, DataSource::Live);
    assert_eq!(schedule.records[0].id, "row-1");
    assert_eq!(schedule.records[0].minggu, WeekParity::Genap);
}

#[tokio::test]
async fn donation_join_gaps_become_unknown_but_mock_names_pass_through() {
    let gateway = Arc::new(FakeGateway::new());
    gateway.set_rows(
        "infaq_transactions",
        vec![json!({
            "id": "d1", "siswa_id": "s9", "nominal": 10000,
            "tanggal": "2026-02-01", "created_at": "2026-02-01T08:00:00Z",
            "profiles": null
        })],
    );
    let live_client = client_with(gateway);
    let live = live_client.donations().await;
    assert_eq!(live.source, DataSource::Live);
    assert_eq!(live.records[0].siswa_nama, "Unknown");

    let mock_client = client_with(Arc::new(FakeGateway::new()));
    let fallback = mock_client.donations().await;
    assert!(fallback.is_fallback());
    assert_eq!(fallback.records[0].siswa_nama, "Ahmad Fauzi");
    assert_eq!(fallback.records.len(), 8);
}

#[tokio::test]
async fn group_membership_failure_falls_back_whole() {
    // Groups read succeeds but the membership join fails: the result must be
    // entirely mock, never live groups with missing members.
    let gateway = Arc::new(FakeGateway::new());
    gateway.set_rows("groups", vec![json!({"id": "g1", "nama": "Kelompok Live"})]);
    let client = client_with(gateway);

    let groups = client.groups().await;
    assert!(groups.is_fallback());
    assert!(groups.records.iter().all(|g| g.nama != "Kelompok Live"));
}

#[tokio::test]
async fn live_groups_join_members_and_default_unknown() {
    let gateway = Arc::new(FakeGateway::new());
    gateway.set_rows(
        "groups",
        vec![json!({"id": "g1", "nama": "Kelompok 1 - Frontend"})],
    );
    gateway.set_rows(
        "group_members",
        vec![
            json!({"id": "m1", "group_id": "g1", "profile_id": "p1", "profiles": {"nama": "Budi Santoso"}}),
            json!({"id": "m2", "group_id": "g1", "profile_id": "p2", "profiles": null}),
        ],
    );
    let client = client_with(gateway);

    let groups = client.groups().await;
    assert_eq!(groups.source, DataSource::Live);
    assert_eq!(groups.records[0].anggota, vec!["Budi Santoso", "Unknown"]);
}

#[tokio::test]
async fn org_chart_fallback_orders_from_list_position() {
    let client = client_with(Arc::new(FakeGateway::new()));

    let chart = client.org_chart().await;
    assert!(chart.is_fallback());
    assert_eq!(chart.records[0].jabatan, "Ketua Kelas");
    assert_eq!(chart.records[0].urutan, 1);
    assert_eq!(chart.records[7].jabatan, "Seksi Keamanan");
    assert_eq!(chart.records[7].urutan, 8);
}
