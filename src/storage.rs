use crate::errors::AppError;
use crate::models::{AttendanceRecord, Person, Roster, Status};
use serde_json::Value;
use std::{env, path::Path, path::PathBuf};
use tokio::fs;
use tracing::{error, warn};

pub fn resolve_data_path() -> Result<PathBuf, std::io::Error> {
    if let Ok(path) = env::var("APP_DATA_PATH") {
        return Ok(PathBuf::from(path));
    }

    Ok(PathBuf::from("data/state.json"))
}

/// Reads the roster document. A missing file or unparseable document yields
/// an empty roster; every value inside the document is coerced to the
/// canonical person shape, so downstream code never sees a legacy one.
pub async fn load_roster(path: &Path) -> Roster {
    match fs::read(path).await {
        Ok(bytes) => match serde_json::from_slice::<Value>(&bytes) {
            Ok(value) => normalize_document(value),
            Err(err) => {
                error!("failed to parse data file: {err}");
                Roster::default()
            }
        },
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => Roster::default(),
        Err(err) => {
            error!("failed to read data file: {err}");
            Roster::default()
        }
    }
}

/// Overwrites the whole document. There is no incremental patching; every
/// mutation rewrites the roster in full.
pub async fn persist_roster(path: &Path, roster: &Roster) -> Result<(), AppError> {
    let payload = serde_json::to_vec_pretty(roster).map_err(AppError::internal)?;
    fs::write(path, payload).await.map_err(AppError::internal)?;
    Ok(())
}

/// Load, then write the normalized form straight back, so malformed historic
/// data converges to canonical shape on first access.
pub async fn load_or_init(path: &Path) -> Result<Roster, AppError> {
    let roster = load_roster(path).await;
    persist_roster(path, &roster).await?;
    Ok(roster)
}

pub fn normalize_document(value: Value) -> Roster {
    let Value::Object(map) = value else {
        warn!("data file is not an object, starting empty");
        return Roster::default();
    };

    map.into_iter()
        .map(|(name, value)| (name, normalize_person(value)))
        .collect()
}

/// Coerces one stored value into a `Person`. Accepts the legacy bare-array
/// shape and fills in missing fields of partially formed objects.
fn normalize_person(value: Value) -> Person {
    match value {
        Value::Array(records) => Person {
            attendance: normalize_records(records),
            photo: String::new(),
            pending: None,
        },
        Value::Object(mut fields) => {
            let attendance = match fields.remove("attendance") {
                Some(Value::Array(records)) => normalize_records(records),
                _ => Vec::new(),
            };
            let photo = match fields.remove("photo") {
                Some(Value::String(photo)) => photo,
                _ => String::new(),
            };
            let pending = fields
                .remove("pending")
                .as_ref()
                .and_then(Value::as_str)
                .and_then(parse_status);
            Person {
                attendance,
                photo,
                pending,
            }
        }
        other => {
            warn!("person entry has unusable shape {other}, resetting");
            Person::default()
        }
    }
}

fn normalize_records(records: Vec<Value>) -> Vec<AttendanceRecord> {
    records.into_iter().filter_map(normalize_record).collect()
}

fn normalize_record(value: Value) -> Option<AttendanceRecord> {
    let Value::Object(fields) = value else {
        warn!("dropping non-object attendance entry");
        return None;
    };

    let status = fields
        .get("status")
        .and_then(Value::as_str)
        .and_then(parse_status)
        .unwrap_or(Status::Absent);
    let arrive = match fields.get("arrive").and_then(Value::as_str) {
        Some(arrive) => arrive.to_string(),
        None => match status {
            Status::Absent => "Absent".to_string(),
            Status::Present => "On Time".to_string(),
        },
    };

    Some(AttendanceRecord {
        date: fields
            .get("date")
            .and_then(Value::as_str)
            .unwrap_or("-")
            .to_string(),
        status,
        penalty: fields.get("penalty").and_then(Value::as_f64).unwrap_or(0.0),
        arrive,
    })
}

fn parse_status(value: &str) -> Option<Status> {
    match value {
        "present" => Some(Status::Present),
        "absent" => Some(Status::Absent),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn legacy_bare_array_becomes_canonical_person() {
        let doc = json!({
            "Alice": [
                {"date": "2026-08-01", "status": "present", "penalty": -0.05, "arrive": "3 min late"}
            ]
        });

        let roster = normalize_document(doc);
        let person = &roster["Alice"];
        assert_eq!(person.photo, "");
        assert_eq!(person.attendance.len(), 1);
        assert_eq!(person.attendance[0].penalty, -0.05);
    }

    #[test]
    fn missing_fields_are_filled_in() {
        let doc = json!({
            "Bob": {"attendance": [{"date": "2026-08-02", "status": "absent"}]},
            "Cara": {"photo": "data:image/png;base64,xyz"},
            "Dan": {"attendance": "oops"}
        });

        let roster = normalize_document(doc);
        assert_eq!(roster["Bob"].photo, "");
        assert_eq!(roster["Bob"].attendance[0].arrive, "Absent");
        assert_eq!(roster["Bob"].attendance[0].penalty, 0.0);
        assert_eq!(roster["Cara"].photo, "data:image/png;base64,xyz");
        assert!(roster["Cara"].attendance.is_empty());
        assert!(roster["Dan"].attendance.is_empty());
    }

    #[test]
    fn non_object_person_value_resets_to_empty() {
        let roster = normalize_document(json!({"Eve": 42, "Fay": null}));
        assert!(roster["Eve"].attendance.is_empty());
        assert!(roster["Fay"].attendance.is_empty());
    }

    #[test]
    fn non_object_document_starts_empty() {
        assert!(normalize_document(json!([1, 2, 3])).is_empty());
        assert!(normalize_document(json!("nope")).is_empty());
    }

    #[test]
    fn pending_selection_survives_normalization() {
        let roster = normalize_document(json!({
            "Gil": {"attendance": [], "photo": "", "pending": "present"},
            "Hal": {"attendance": [], "photo": "", "pending": "later"}
        }));
        assert_eq!(roster["Gil"].pending, Some(Status::Present));
        assert_eq!(roster["Hal"].pending, None);
    }

    #[test]
    fn malformed_record_entries_are_dropped() {
        let roster = normalize_document(json!({
            "Ida": {"attendance": [
                "garbage",
                {"date": "2026-08-03", "status": "present", "penalty": 0.0, "arrive": "On Time"}
            ], "photo": ""}
        }));
        assert_eq!(roster["Ida"].attendance.len(), 1);
    }

    #[test]
    fn well_formed_document_round_trips_unchanged() {
        let doc = json!({
            "Alice": {
                "attendance": [
                    {"date": "2026-08-01", "status": "present", "penalty": -0.05, "arrive": "3 min late"},
                    {"date": "2026-08-02", "status": "absent", "penalty": 0.0, "arrive": "Absent"}
                ],
                "photo": ""
            },
            "Bob": {"attendance": [], "photo": "pic"}
        });

        let roster = normalize_document(doc.clone());
        assert_eq!(serde_json::to_value(&roster).unwrap(), doc);
    }

    #[tokio::test]
    async fn load_of_missing_or_corrupt_file_yields_empty_roster() {
        let mut path = std::env::temp_dir();
        path.push(format!("attendance_missing_{}.json", std::process::id()));
        assert!(load_roster(&path).await.is_empty());

        fs::write(&path, b"{not json").await.unwrap();
        assert!(load_roster(&path).await.is_empty());
        let _ = fs::remove_file(&path).await;
    }

    #[tokio::test]
    async fn deleted_person_stays_gone_across_save_and_load() {
        let mut path = std::env::temp_dir();
        path.push(format!("attendance_delete_{}.json", std::process::id()));

        let mut roster = Roster::default();
        roster.insert("Alice".to_string(), Person::default());
        roster.insert("Bob".to_string(), Person::default());
        persist_roster(&path, &roster).await.unwrap();

        roster.remove("Alice");
        persist_roster(&path, &roster).await.unwrap();

        let reloaded = load_roster(&path).await;
        assert!(!reloaded.contains_key("Alice"));
        assert!(reloaded.contains_key("Bob"));
        let _ = fs::remove_file(&path).await;
    }

    #[tokio::test]
    async fn load_or_init_rewrites_legacy_data_in_place() {
        let mut path = std::env::temp_dir();
        path.push(format!("attendance_selfheal_{}.json", std::process::id()));
        let legacy = json!({"Alice": [
            {"date": "2026-08-01", "status": "present", "penalty": 0.0, "arrive": "On Time"}
        ]});
        fs::write(&path, serde_json::to_vec(&legacy).unwrap())
            .await
            .unwrap();

        let roster = load_or_init(&path).await.unwrap();
        assert_eq!(roster["Alice"].attendance.len(), 1);

        let healed: Value =
            serde_json::from_slice(&fs::read(&path).await.unwrap()).unwrap();
        assert_eq!(healed["Alice"]["photo"], "");
        assert!(healed["Alice"]["attendance"].is_array());
        let _ = fs::remove_file(&path).await;
    }
}
