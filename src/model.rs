use clap::ValueEnum;
use serde::{Deserialize, Serialize};

/// One category of classroom data served by the portal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, strum::Display)]
#[strum(serialize_all = "snake_case")]
pub enum Domain {
    Students,
    Schedules,
    Tasks,
    Infaq,
    Groups,
    Quotes,
    Gallery,
    OrgChart,
    Karya,
}

/// Week-parity tag selecting one of the two alternating schedule templates.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ValueEnum, strum::Display,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum WeekParity {
    /// Odd week ("minggu ganjil").
    Ganjil,
    /// Even week ("minggu genap").
    Genap,
}

/// Which source actually served a query result.
///
/// The fallback substitution is invisible in the records themselves, so the
/// tag is carried alongside them to keep the policy inspectable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DataSource {
    Live,
    Fallback,
}

/// A domain result set together with the source that produced it.
#[derive(Debug, Clone, Serialize)]
pub struct Sourced<T> {
    pub source: DataSource,
    pub records: T,
}

impl<T> Sourced<T> {
    pub fn live(records: T) -> Self {
        Self {
            source: DataSource::Live,
            records,
        }
    }

    pub fn fallback(records: T) -> Self {
        Self {
            source: DataSource::Fallback,
            records,
        }
    }

    pub fn is_fallback(&self) -> bool {
        self.source == DataSource::Fallback
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Student {
    pub id: String,
    pub nama: String,
    #[serde(default)]
    pub gender: String,
    #[serde(default)]
    pub no_absen: u32,
    #[serde(default)]
    pub avatar_url: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScheduleEntry {
    pub id: String,
    pub minggu: WeekParity,
    pub hari: String,
    pub mata_pelajaran: String,
    #[serde(default)]
    pub jam: String,
    #[serde(default)]
    pub guru: String,
    #[serde(default)]
    pub urutan: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Task {
    pub id: String,
    pub judul: String,
    #[serde(default)]
    pub deskripsi: String,
    pub deadline: String,
    #[serde(default)]
    pub selesai: bool,
    #[serde(default)]
    pub mata_pelajaran: String,
    #[serde(default)]
    pub created_at: String,
}

/// A donation ledger entry with the donor name already joined in.
#[derive(Debug, Clone, Serialize)]
pub struct Donation {
    pub id: String,
    pub siswa_id: String,
    pub siswa_nama: String,
    pub nominal: i64,
    pub tanggal: String,
    pub created_at: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct Group {
    pub id: String,
    pub nama: String,
    pub anggota: Vec<String>,
    pub mapel: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Quote {
    pub id: String,
    pub text: String,
    #[serde(default)]
    pub author: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GalleryItem {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default)]
    pub created_at: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrgChartEntry {
    pub id: String,
    pub jabatan: String,
    pub nama: String,
    /// The backing column is named `foto`.
    #[serde(default, alias = "foto")]
    pub avatar_url: Option<String>,
    #[serde(default)]
    pub urutan: u32,
}

/// Category tag on a student work. Unrecognized backend values map to
/// `Other` via [`Karya::category`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, strum::Display, strum::EnumString)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum KaryaCategory {
    Web,
    Game,
    Design,
    Mobile,
    Other,
}

/// A student work (portfolio entry). Unlike the other read domains there is
/// no mock counterpart: an empty gallery of works is a real state.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Karya {
    pub id: String,
    pub user_id: String,
    #[serde(default)]
    pub user_email: String,
    pub judul: String,
    #[serde(default)]
    pub deskripsi: String,
    #[serde(default)]
    pub kategori: String,
    #[serde(default)]
    pub link_url: Option<String>,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default)]
    pub created_at: String,
}

impl Karya {
    pub fn category(&self) -> KaryaCategory {
        self.kategori.parse().unwrap_or(KaryaCategory::Other)
    }

    /// Only an admin or the work's owner may delete it.
    pub fn can_delete(&self, session: &Session) -> bool {
        session.is_admin() || self.user_id == session.user_id
    }
}

/// Fields accepted when submitting a work. `judul` is required; empty link
/// and image URLs are stored as nulls.
#[derive(Debug, Clone)]
pub struct NewKarya {
    pub judul: String,
    pub deskripsi: String,
    pub kategori: String,
    pub link_url: String,
    pub image_url: String,
}

impl Default for NewKarya {
    fn default() -> Self {
        Self {
            judul: String::new(),
            deskripsi: String::new(),
            kategori: "web".to_string(),
            link_url: String::new(),
            image_url: String::new(),
        }
    }
}

/// Fields accepted when creating a task. `judul` and `deadline` are required.
#[derive(Debug, Clone, Default, Serialize)]
pub struct NewTask {
    pub judul: String,
    pub deskripsi: String,
    pub mata_pelajaran: String,
    pub deadline: String,
}

/// Fields accepted when recording a donation. All three are required.
#[derive(Debug, Clone, Default, Serialize)]
pub struct NewDonation {
    pub siswa_id: String,
    pub nominal: i64,
    pub tanggal: String,
}

/// Authenticated session returned by the backend after a successful sign-in.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Session {
    pub access_token: String,
    pub user_id: String,
    pub email: String,
    #[serde(default)]
    pub role: Option<String>,
}

impl Session {
    pub fn is_admin(&self) -> bool {
        self.role.as_deref() == Some("admin")
    }
}
