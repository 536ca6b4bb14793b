// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Campus API wire types.
//!
//! Field names on the wire are fixed by the campus system and are kept
//! as-is in serialized output; the Rust names are English.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Response of the service-account login endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct LoginResponse {
    #[serde(default)]
    pub result: bool,
    #[serde(default)]
    pub error: String,
    #[serde(default)]
    pub user: Option<LoginUser>,
    #[serde(default)]
    pub token: String,
    #[serde(default)]
    pub refresh_token: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoginUser {
    #[serde(default)]
    pub user_id: u64,
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub role: String,
}

/// Envelope shared by the directory endpoints.
#[derive(Debug, Clone, Deserialize)]
pub struct Envelope<T> {
    #[serde(default)]
    pub result: String,
    pub data: Option<T>,
}

impl<T> Envelope<T> {
    /// Whether the result flag matches `expected` (case-insensitive).
    pub fn is_ok(&self, expected: &str) -> bool {
        self.result.eq_ignore_ascii_case(expected)
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct StudentList {
    #[serde(default, rename = "mahasiswa")]
    pub students: Vec<CampusStudent>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct EmployeeList {
    #[serde(default, rename = "pegawai")]
    pub employees: Vec<CampusEmployee>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct LecturerList {
    #[serde(default, rename = "dosen")]
    pub lecturers: Vec<CampusLecturer>,
}

/// Student directory entry (`library-api/mahasiswa`).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(default)]
pub struct CampusStudent {
    #[serde(rename = "dim_id")]
    pub student_record_id: u64,
    pub user_id: u64,
    #[serde(rename = "user_name")]
    pub username: String,
    pub nim: String,
    #[serde(rename = "nama")]
    pub name: String,
    pub email: String,
    #[serde(rename = "prodi_id")]
    pub study_program_id: u64,
    #[serde(rename = "prodi_name")]
    pub study_program: String,
    #[serde(rename = "fakultas")]
    pub faculty: String,
    #[serde(rename = "angkatan")]
    pub cohort_year: u32,
    pub status: String,
    #[serde(rename = "asrama")]
    pub dormitory: Option<String>,
}

/// Detailed student profile (`library-api/get-student-by-nim`).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(default)]
pub struct CampusStudentDetail {
    pub nim: String,
    #[serde(rename = "nama")]
    pub name: String,
    pub email: String,
    #[serde(rename = "tempat_lahir")]
    pub birth_place: Option<String>,
    #[serde(rename = "tgl_lahir")]
    pub birth_date: Option<String>,
    #[serde(rename = "jenis_kelamin")]
    pub gender: Option<String>,
    #[serde(rename = "alamat")]
    pub address: Option<String>,
    #[serde(rename = "hp")]
    pub phone: Option<String>,
    #[serde(rename = "prodi")]
    pub study_program: String,
    #[serde(rename = "fakultas")]
    pub faculty: String,
    #[serde(rename = "sem")]
    pub semester: u32,
    #[serde(rename = "sem_ta")]
    pub academic_year_semester: u32,
    #[serde(rename = "ta")]
    pub academic_year: String,
    #[serde(rename = "tahun_masuk")]
    pub entry_year: u32,
    #[serde(rename = "kelas")]
    pub class: Option<String>,
    #[serde(rename = "dosen_wali")]
    pub academic_advisor: Option<String>,
    #[serde(rename = "asrama")]
    pub dormitory: Option<String>,
    #[serde(rename = "nama_ayah")]
    pub father_name: Option<String>,
    #[serde(rename = "nama_ibu")]
    pub mother_name: Option<String>,
    #[serde(rename = "no_hp_ayah")]
    pub father_phone: Option<String>,
    #[serde(rename = "no_hp_ibu")]
    pub mother_phone: Option<String>,
}

/// Directory entry and detailed profile of one student.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct StudentComplete {
    pub basic_info: CampusStudent,
    pub details: CampusStudentDetail,
}

/// Employee entry (`library-api/pegawai`), used for teaching assistants.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(default)]
pub struct CampusEmployee {
    #[serde(rename = "pegawai_id")]
    pub employee_id: u64,
    pub nip: String,
    #[serde(rename = "nama")]
    pub name: String,
    pub email: String,
    #[serde(rename = "user_name")]
    pub username: String,
    pub user_id: u64,
    // The campus API emits these two keys with a trailing space.
    #[serde(rename = "alias ")]
    pub alias: Option<String>,
    #[serde(rename = "posisi ")]
    pub position: Option<String>,
    #[serde(rename = "status_pegawai")]
    pub employee_status: String,
}

/// Lecturer entry (`library-api/dosen`).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(default)]
pub struct CampusLecturer {
    #[serde(rename = "pegawai_id")]
    pub employee_id: u64,
    #[serde(rename = "dosen_id")]
    pub lecturer_id: u64,
    pub nip: String,
    #[serde(rename = "nama")]
    pub name: String,
    pub email: String,
    #[serde(rename = "prodi_id")]
    pub study_program_id: u64,
    #[serde(rename = "prodi")]
    pub study_program: String,
    #[serde(rename = "jabatan_akademik")]
    pub academic_rank_code: String,
    #[serde(rename = "jabatan_akademik_desc")]
    pub academic_rank: String,
    #[serde(rename = "jenjang_pendidikan")]
    pub education_level: String,
    pub nidn: Option<String>,
    pub user_id: u64,
}
