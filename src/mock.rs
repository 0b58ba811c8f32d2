//! Static reference data substituted whenever the remote backend is
//! unreachable or a collection comes back empty.
//!
//! The records mirror the hosted dataset for class PPLG X-1. They are raw
//! shapes; `normalize` turns them into the canonical domain records.

use indexmap::IndexMap;
use once_cell::sync::Lazy;

use crate::model::WeekParity;

pub struct MockStudent {
    pub id: &'static str,
    pub nama: &'static str,
    pub gender: &'static str,
    pub no_absen: u32,
}

pub static SISWA: &[MockStudent] = &[
    MockStudent { id: "1", nama: "Ahmad Fauzi", gender: "L", no_absen: 1 },
    MockStudent { id: "2", nama: "Aisyah Putri", gender: "P", no_absen: 2 },
    MockStudent { id: "3", nama: "Budi Santoso", gender: "L", no_absen: 3 },
    MockStudent { id: "4", nama: "Citra Dewi", gender: "P", no_absen: 4 },
    MockStudent { id: "5", nama: "Dimas Pratama", gender: "L", no_absen: 5 },
    MockStudent { id: "6", nama: "Eka Rahmawati", gender: "P", no_absen: 6 },
    MockStudent { id: "7", nama: "Farhan Rizky", gender: "L", no_absen: 7 },
    MockStudent { id: "8", nama: "Gita Ayu", gender: "P", no_absen: 8 },
    MockStudent { id: "9", nama: "Hadi Wijaya", gender: "L", no_absen: 9 },
    MockStudent { id: "10", nama: "Indah Permata", gender: "P", no_absen: 10 },
    MockStudent { id: "11", nama: "Joko Susilo", gender: "L", no_absen: 11 },
    MockStudent { id: "12", nama: "Kartika Sari", gender: "P", no_absen: 12 },
];

#[derive(Clone, Copy)]
pub struct MockLesson {
    pub mapel: &'static str,
    pub jam: &'static str,
    pub guru: &'static str,
}

/// Weekly schedule templates, keyed by parity then day. Day order matters:
/// the fallback flattening derives ids and order indexes from positions.
pub static JADWAL: Lazy<IndexMap<WeekParity, IndexMap<&'static str, Vec<MockLesson>>>> =
    Lazy::new(|| {
        let mut ganjil = IndexMap::new();
        ganjil.insert("Senin", vec![
            MockLesson { mapel: "Matematika", jam: "07:00 - 08:30", guru: "Pak Agus" },
            MockLesson { mapel: "Bahasa Indonesia", jam: "08:30 - 10:00", guru: "Bu Sari" },
            MockLesson { mapel: "Pemrograman Web", jam: "10:15 - 11:45", guru: "Pak Doni" },
            MockLesson { mapel: "Basis Data", jam: "12:30 - 14:00", guru: "Bu Rina" },
        ]);
        ganjil.insert("Selasa", vec![
            MockLesson { mapel: "Bahasa Inggris", jam: "07:00 - 08:30", guru: "Bu Lia" },
            MockLesson { mapel: "PKN", jam: "08:30 - 10:00", guru: "Pak Heru" },
            MockLesson { mapel: "Pemrograman Berorientasi Objek", jam: "10:15 - 11:45", guru: "Pak Doni" },
        ]);
        ganjil.insert("Rabu", vec![
            MockLesson { mapel: "Fisika", jam: "07:00 - 08:30", guru: "Pak Budi" },
            MockLesson { mapel: "Pemrograman Web", jam: "08:30 - 10:00", guru: "Pak Doni" },
            MockLesson { mapel: "Desain Grafis", jam: "10:15 - 11:45", guru: "Bu Ani" },
        ]);
        ganjil.insert("Kamis", vec![
            MockLesson { mapel: "Matematika", jam: "07:00 - 08:30", guru: "Pak Agus" },
            MockLesson { mapel: "Sejarah", jam: "08:30 - 10:00", guru: "Bu Maya" },
            MockLesson { mapel: "Basis Data", jam: "10:15 - 11:45", guru: "Bu Rina" },
        ]);
        ganjil.insert("Jumat", vec![
            MockLesson { mapel: "Pendidikan Agama", jam: "07:00 - 08:30", guru: "Pak Usman" },
            MockLesson { mapel: "Olahraga", jam: "08:30 - 10:00", guru: "Pak Joko" },
        ]);

        let mut genap = IndexMap::new();
        genap.insert("Senin", vec![
            MockLesson { mapel: "Bahasa Indonesia", jam: "07:00 - 08:30", guru: "Bu Sari" },
            MockLesson { mapel: "Matematika", jam: "08:30 - 10:00", guru: "Pak Agus" },
            MockLesson { mapel: "Basis Data", jam: "10:15 - 11:45", guru: "Bu Rina" },
            MockLesson { mapel: "Pemrograman Web", jam: "12:30 - 14:00", guru: "Pak Doni" },
        ]);
        genap.insert("Selasa", vec![
            MockLesson { mapel: "PKN", jam: "07:00 - 08:30", guru: "Pak Heru" },
            MockLesson { mapel: "Bahasa Inggris", jam: "08:30 - 10:00", guru: "Bu Lia" },
            MockLesson { mapel: "Desain Grafis", jam: "10:15 - 11:45", guru: "Bu Ani" },
        ]);
        genap.insert("Rabu", vec![
            MockLesson { mapel: "Pemrograman Berorientasi Objek", jam: "07:00 - 08:30", guru: "Pak Doni" },
            MockLesson { mapel: "Fisika", jam: "08:30 - 10:00", guru: "Pak Budi" },
            MockLesson { mapel: "Pemrograman Web", jam: "10:15 - 11:45", guru: "Pak Doni" },
        ]);
        genap.insert("Kamis", vec![
            MockLesson { mapel: "Sejarah", jam: "07:00 - 08:30", guru: "Bu Maya" },
            MockLesson { mapel: "Matematika", jam: "08:30 - 10:00", guru: "Pak Agus" },
            MockLesson { mapel: "Basis Data", jam: "10:15 - 11:45", guru: "Bu Rina" },
        ]);
        genap.insert("Jumat", vec![
            MockLesson { mapel: "Olahraga", jam: "07:00 - 08:30", guru: "Pak Joko" },
            MockLesson { mapel: "Pendidikan Agama", jam: "08:30 - 10:00", guru: "Pak Usman" },
        ]);

        let mut jadwal = IndexMap::new();
        jadwal.insert(WeekParity::Ganjil, ganjil);
        jadwal.insert(WeekParity::Genap, genap);
        jadwal
    });

pub struct MockInfaq {
    pub id: u32,
    pub siswa: &'static str,
    pub nominal: i64,
    pub tanggal: &'static str,
}

pub static INFAQ: &[MockInfaq] = &[
    MockInfaq { id: 1, siswa: "Ahmad Fauzi", nominal: 10_000, tanggal: "2026-02-01" },
    MockInfaq { id: 2, siswa: "Aisyah Putri", nominal: 15_000, tanggal: "2026-02-01" },
    MockInfaq { id: 3, siswa: "Budi Santoso", nominal: 5_000, tanggal: "2026-02-03" },
    MockInfaq { id: 4, siswa: "Citra Dewi", nominal: 20_000, tanggal: "2026-02-03" },
    MockInfaq { id: 5, siswa: "Ahmad Fauzi", nominal: 10_000, tanggal: "2026-02-05" },
    MockInfaq { id: 6, siswa: "Dimas Pratama", nominal: 10_000, tanggal: "2026-02-05" },
    MockInfaq { id: 7, siswa: "Eka Rahmawati", nominal: 25_000, tanggal: "2026-02-07" },
    MockInfaq { id: 8, siswa: "Farhan Rizky", nominal: 5_000, tanggal: "2026-02-07" },
];

pub struct MockTask {
    pub id: u32,
    pub judul: &'static str,
    pub deskripsi: &'static str,
    pub deadline: &'static str,
    pub selesai: bool,
    pub mapel: &'static str,
}

pub static TUGAS: &[MockTask] = &[
    MockTask {
        id: 1,
        judul: "Tugas Pemrograman Web - Membuat Landing Page",
        deskripsi: "Buat landing page responsive dengan HTML, CSS, dan JavaScript",
        deadline: "2026-02-15",
        selesai: false,
        mapel: "Pemrograman Web",
    },
    MockTask {
        id: 2,
        judul: "Laporan Praktikum Basis Data",
        deskripsi: "Buat laporan praktikum normalisasi database",
        deadline: "2026-02-10",
        selesai: true,
        mapel: "Basis Data",
    },
    MockTask {
        id: 3,
        judul: "Essay Bahasa Indonesia",
        deskripsi: "Tulis essay tentang teknologi masa depan minimal 500 kata",
        deadline: "2026-02-18",
        selesai: false,
        mapel: "Bahasa Indonesia",
    },
    MockTask {
        id: 4,
        judul: "Latihan Soal Matematika Bab 5",
        deskripsi: "Kerjakan halaman 120-125 buku paket",
        deadline: "2026-02-08",
        selesai: false,
        mapel: "Matematika",
    },
    MockTask {
        id: 5,
        judul: "Project OOP - Sistem Kasir",
        deskripsi: "Buat program kasir sederhana menggunakan Java",
        deadline: "2026-02-20",
        selesai: false,
        mapel: "PBO",
    },
];

pub struct MockGroup {
    pub id: u32,
    pub nama: &'static str,
    pub anggota: &'static [&'static str],
    /// Optional subject tags; most mock groups do not define any.
    pub mapel: &'static [&'static str],
}

pub static KELOMPOK: &[MockGroup] = &[
    MockGroup {
        id: 1,
        nama: "Kelompok 1 - Frontend",
        anggota: &["Ahmad Fauzi", "Aisyah Putri", "Budi Santoso"],
        mapel: &[],
    },
    MockGroup {
        id: 2,
        nama: "Kelompok 2 - Backend",
        anggota: &["Citra Dewi", "Dimas Pratama", "Eka Rahmawati"],
        mapel: &[],
    },
    MockGroup {
        id: 3,
        nama: "Kelompok 3 - Database",
        anggota: &["Farhan Rizky", "Gita Ayu", "Hadi Wijaya"],
        mapel: &[],
    },
    MockGroup {
        id: 4,
        nama: "Kelompok 4 - UI/UX",
        anggota: &["Indah Permata", "Joko Susilo", "Kartika Sari"],
        mapel: &[],
    },
];

pub struct MockQuote {
    pub id: u32,
    pub text: &'static str,
    pub author: &'static str,
}

pub static QUOTES: &[MockQuote] = &[
    MockQuote {
        id: 1,
        text: "Pendidikan adalah senjata paling ampuh yang bisa kamu gunakan untuk mengubah dunia.",
        author: "Nelson Mandela",
    },
    MockQuote {
        id: 2,
        text: "Belajar tanpa berpikir itu tidaklah berguna, tapi berpikir tanpa belajar itu sangatlah berbahaya.",
        author: "Konfusius",
    },
    MockQuote {
        id: 3,
        text: "Masa depan adalah milik mereka yang menyiapkan dirinya hari ini.",
        author: "Malcolm X",
    },
    MockQuote {
        id: 4,
        text: "Kesuksesan bukanlah kunci kebahagiaan. Kebahagiaanlah kunci kesuksesan.",
        author: "Albert Schweitzer",
    },
    MockQuote {
        id: 5,
        text: "Satu-satunya cara untuk melakukan pekerjaan hebat adalah dengan mencintai apa yang kamu lakukan.",
        author: "Steve Jobs",
    },
    MockQuote {
        id: 6,
        text: "Jangan pernah berhenti belajar, karena hidup tak pernah berhenti mengajarkan.",
        author: "Anonim",
    },
];

pub struct MockGalleryItem {
    pub id: &'static str,
    pub title: &'static str,
    pub description: &'static str,
    pub created_at: &'static str,
}

pub static GALERI: &[MockGalleryItem] = &[
    MockGalleryItem {
        id: "1",
        title: "Acara Pesta Ramadhan",
        description: "Kebersamaan kelas dalam merayakan Ramadhan bersama",
        created_at: "2025-03-15",
    },
    MockGalleryItem {
        id: "2",
        title: "Perpisahan Kelas X",
        description: "Momen indah saat lulus ke kelas XI",
        created_at: "2025-06-20",
    },
    MockGalleryItem {
        id: "3",
        title: "Kompetisi Olahraga Antar Kelas",
        description: "Antusiasme siswa dalam berkompetisi",
        created_at: "2025-09-10",
    },
    MockGalleryItem {
        id: "4",
        title: "Praktikum Laboratorium",
        description: "Siswa melakukan praktikum di laboratorium komputer",
        created_at: "2025-10-05",
    },
];

pub struct MockOrgChartEntry {
    pub jabatan: &'static str,
    pub nama: &'static str,
}

/// Org chart entries in display order; ids and order indexes are synthesized
/// from positions during normalization.
pub static STRUKTUR: &[MockOrgChartEntry] = &[
    MockOrgChartEntry { jabatan: "Ketua Kelas", nama: "Ahmad Fauzi" },
    MockOrgChartEntry { jabatan: "Wakil Ketua", nama: "Citra Dewi" },
    MockOrgChartEntry { jabatan: "Sekretaris 1", nama: "Aisyah Putri" },
    MockOrgChartEntry { jabatan: "Sekretaris 2", nama: "Gita Ayu" },
    MockOrgChartEntry { jabatan: "Bendahara 1", nama: "Eka Rahmawati" },
    MockOrgChartEntry { jabatan: "Bendahara 2", nama: "Indah Permata" },
    MockOrgChartEntry { jabatan: "Seksi Kebersihan", nama: "Budi Santoso" },
    MockOrgChartEntry { jabatan: "Seksi Keamanan", nama: "Dimas Pratama" },
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn students_are_sorted_by_roll_number() {
        let mut prev = 0;
        for siswa in SISWA {
            assert!(siswa.no_absen > prev, "roll numbers must ascend");
            prev = siswa.no_absen;
        }
        assert_eq!(SISWA.len(), 12);
    }

    #[test]
    fn both_parities_cover_the_school_week() {
        for (_, week) in JADWAL.iter() {
            let days: Vec<_> = week.keys().copied().collect();
            assert_eq!(days, vec!["Senin", "Selasa", "Rabu", "Kamis", "Jumat"]);
        }
    }

    #[test]
    fn first_odd_monday_lesson_is_matematika() {
        let lesson = &JADWAL[&WeekParity::Ganjil]["Senin"][0];
        assert_eq!(lesson.mapel, "Matematika");
    }
}
