use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    Present,
    Absent,
}

/// One committed check-in. Records are append-only: corrections are made by
/// submitting a new record, never by editing an old one.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AttendanceRecord {
    pub date: String,
    pub status: Status,
    pub penalty: f64,
    pub arrive: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Person {
    pub attendance: Vec<AttendanceRecord>,
    pub photo: String,
    /// Uncommitted selection between mark and submit. Omitted from the
    /// document when there is none so a canonical document round-trips
    /// unchanged.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pending: Option<Status>,
}

pub type Roster = BTreeMap<String, Person>;

#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub name: String,
}

#[derive(Debug, Deserialize)]
pub struct MarkRequest {
    pub status: Status,
}

#[derive(Debug, Deserialize)]
pub struct PhotoRequest {
    pub photo: String,
}

#[derive(Debug, Deserialize)]
pub struct DeleteRequest {
    pub confirm: bool,
}

#[derive(Debug, Deserialize)]
pub struct ClosePeriodRequest {
    pub confirm: bool,
    #[serde(default)]
    pub clear: bool,
}

#[derive(Debug, Serialize)]
pub struct SubmitResponse {
    pub name: String,
    pub record: AttendanceRecord,
}

#[derive(Debug, Serialize)]
pub struct DeleteResponse {
    pub name: String,
    pub deleted: bool,
}

#[derive(Debug, Serialize)]
pub struct ClosePeriodResponse {
    pub name: String,
    pub export: String,
    pub cleared: bool,
}

#[derive(Debug, Serialize)]
pub struct PersonSummary {
    pub name: String,
    pub has_photo: bool,
    pub pending: Option<Status>,
    pub record_count: usize,
}
