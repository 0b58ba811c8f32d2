//! Total normalization functions per domain.
//!
//! Each domain has two entry points: one turning raw backend rows into the
//! canonical records, and one producing the same shape from the mock
//! dataset. Malformed backend rows are dropped with a warning instead of
//! failing the whole query; missing join names default to `"Unknown"`.

use chrono::{SecondsFormat, Utc};
use serde::Deserialize;
use serde_json::Value;
use tracing::warn;

use crate::mock;
use crate::model::{
    Donation, GalleryItem, Group, Karya, OrgChartEntry, Quote, ScheduleEntry, Student, Task,
    WeekParity,
};

/// Sentinel donor/member name when the backend join resolves nothing.
pub const UNKNOWN_NAME: &str = "Unknown";

fn typed_rows<T: serde::de::DeserializeOwned>(collection: &'static str, rows: Vec<Value>) -> Vec<T> {
    rows.into_iter()
        .filter_map(|row| match serde_json::from_value::<T>(row) {
            Ok(record) => Some(record),
            Err(err) => {
                warn!(collection, %err, "dropping malformed row");
                None
            }
        })
        .collect()
}

fn now_rfc3339() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}

// ---------------------------------------------------------------------------
// students
// ---------------------------------------------------------------------------

pub fn students(rows: Vec<Value>) -> Vec<Student> {
    typed_rows("profiles", rows)
}

pub fn students_fallback() -> Vec<Student> {
    mock::SISWA
        .iter()
        .map(|siswa| Student {
            id: siswa.id.to_string(),
            nama: siswa.nama.to_string(),
            gender: siswa.gender.to_string(),
            no_absen: siswa.no_absen,
            avatar_url: None,
        })
        .collect()
}

// ---------------------------------------------------------------------------
// schedules
// ---------------------------------------------------------------------------

pub fn schedules(rows: Vec<Value>) -> Vec<ScheduleEntry> {
    typed_rows("schedules", rows)
}

/// Flatten the nested mock template (parity -> day -> lessons) into the flat
/// row shape the backend serves, synthesizing `{week}-{day}-{index}` ids and
/// using list positions as order indexes.
pub fn schedules_fallback(minggu: WeekParity) -> Vec<ScheduleEntry> {
    let Some(week) = mock::JADWAL.get(&minggu) else {
        return Vec::new();
    };
    week.iter()
        .flat_map(|(hari, lessons)| {
            lessons.iter().enumerate().map(move |(idx, lesson)| ScheduleEntry {
                id: format!("{minggu}-{hari}-{idx}"),
                minggu,
                hari: (*hari).to_string(),
                mata_pelajaran: lesson.mapel.to_string(),
                jam: lesson.jam.to_string(),
                guru: lesson.guru.to_string(),
                urutan: idx as u32,
            })
        })
        .collect()
}

// ---------------------------------------------------------------------------
// tasks
// ---------------------------------------------------------------------------

pub fn tasks(rows: Vec<Value>) -> Vec<Task> {
    typed_rows("tasks", rows)
}

pub fn tasks_fallback() -> Vec<Task> {
    let created_at = now_rfc3339();
    mock::TUGAS
        .iter()
        .map(|tugas| Task {
            id: tugas.id.to_string(),
            judul: tugas.judul.to_string(),
            deskripsi: tugas.deskripsi.to_string(),
            deadline: tugas.deadline.to_string(),
            selesai: tugas.selesai,
            mata_pelajaran: tugas.mapel.to_string(),
            created_at: created_at.clone(),
        })
        .collect()
}

// ---------------------------------------------------------------------------
// donations (infaq)
// ---------------------------------------------------------------------------

/// Raw donation row: the donor name arrives nested under the join alias.
#[derive(Debug, Deserialize)]
struct RawDonation {
    id: String,
    siswa_id: String,
    nominal: i64,
    tanggal: String,
    #[serde(default)]
    created_at: String,
    #[serde(default)]
    profiles: Option<JoinedName>,
}

#[derive(Debug, Deserialize)]
struct JoinedName {
    #[serde(default)]
    nama: Option<String>,
}

pub fn donations(rows: Vec<Value>) -> Vec<Donation> {
    typed_rows::<RawDonation>("infaq_transactions", rows)
        .into_iter()
        .map(|raw| Donation {
            id: raw.id,
            siswa_id: raw.siswa_id,
            siswa_nama: raw
                .profiles
                .and_then(|join| join.nama)
                .unwrap_or_else(|| UNKNOWN_NAME.to_string()),
            nominal: raw.nominal,
            tanggal: raw.tanggal,
            created_at: raw.created_at,
        })
        .collect()
}

/// Mock donations carry the donor name directly; the record id doubles as
/// the donor id.
pub fn donations_fallback() -> Vec<Donation> {
    let created_at = now_rfc3339();
    mock::INFAQ
        .iter()
        .map(|infaq| Donation {
            id: infaq.id.to_string(),
            siswa_id: infaq.id.to_string(),
            siswa_nama: infaq.siswa.to_string(),
            nominal: infaq.nominal,
            tanggal: infaq.tanggal.to_string(),
            created_at: created_at.clone(),
        })
        .collect()
}

// ---------------------------------------------------------------------------
// groups
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
struct RawGroup {
    id: String,
    nama: String,
    #[serde(default)]
    mapel: Option<Vec<String>>,
}

#[derive(Debug, Deserialize)]
struct RawGroupMember {
    group_id: String,
    #[serde(default)]
    profiles: Option<JoinedName>,
}

/// Join group membership rows onto their groups, substituting `"Unknown"`
/// for members whose profile join resolved nothing.
pub fn groups(group_rows: Vec<Value>, member_rows: Vec<Value>) -> Vec<Group> {
    let members = typed_rows::<RawGroupMember>("group_members", member_rows);
    typed_rows::<RawGroup>("groups", group_rows)
        .into_iter()
        .map(|raw| {
            let anggota = members
                .iter()
                .filter(|member| member.group_id == raw.id)
                .map(|member| {
                    member
                        .profiles
                        .as_ref()
                        .and_then(|join| join.nama.clone())
                        .unwrap_or_else(|| UNKNOWN_NAME.to_string())
                })
                .collect();
            Group {
                id: raw.id,
                nama: raw.nama,
                anggota,
                mapel: raw.mapel.unwrap_or_default(),
            }
        })
        .collect()
}

pub fn groups_fallback() -> Vec<Group> {
    mock::KELOMPOK
        .iter()
        .map(|kelompok| Group {
            id: kelompok.id.to_string(),
            nama: kelompok.nama.to_string(),
            anggota: kelompok.anggota.iter().map(|nama| (*nama).to_string()).collect(),
            mapel: kelompok.mapel.iter().map(|mapel| (*mapel).to_string()).collect(),
        })
        .collect()
}

// ---------------------------------------------------------------------------
// quotes
// ---------------------------------------------------------------------------

pub fn quotes(rows: Vec<Value>) -> Vec<Quote> {
    typed_rows("quotes", rows)
}

pub fn quotes_fallback() -> Vec<Quote> {
    mock::QUOTES
        .iter()
        .map(|quote| Quote {
            id: quote.id.to_string(),
            text: quote.text.to_string(),
            author: quote.author.to_string(),
        })
        .collect()
}

// ---------------------------------------------------------------------------
// gallery
// ---------------------------------------------------------------------------

pub fn gallery(rows: Vec<Value>) -> Vec<GalleryItem> {
    typed_rows("gallery", rows)
}

pub fn gallery_fallback() -> Vec<GalleryItem> {
    mock::GALERI
        .iter()
        .map(|item| GalleryItem {
            id: item.id.to_string(),
            title: item.title.to_string(),
            description: item.description.to_string(),
            image_url: None,
            created_at: item.created_at.to_string(),
        })
        .collect()
}

// ---------------------------------------------------------------------------
// org chart
// ---------------------------------------------------------------------------

pub fn org_chart(rows: Vec<Value>) -> Vec<OrgChartEntry> {
    typed_rows("class_structure", rows)
}

/// Mock entries have no explicit ordering; assign 1-based ids and order
/// indexes from their positions in the static list.
pub fn org_chart_fallback() -> Vec<OrgChartEntry> {
    mock::STRUKTUR
        .iter()
        .enumerate()
        .map(|(idx, entry)| OrgChartEntry {
            id: (idx + 1).to_string(),
            jabatan: entry.jabatan.to_string(),
            nama: entry.nama.to_string(),
            avatar_url: None,
            urutan: (idx + 1) as u32,
        })
        .collect()
}

// ---------------------------------------------------------------------------
// karya
// ---------------------------------------------------------------------------

/// Student works have no mock counterpart, so there is no fallback pair.
pub fn karya(rows: Vec<Value>) -> Vec<Karya> {
    typed_rows("karya", rows)
}
