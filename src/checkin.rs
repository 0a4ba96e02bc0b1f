use crate::errors::AppError;
use crate::models::{AttendanceRecord, Person, Status};
use crate::penalty;
use chrono::{Local, NaiveDate, NaiveTime};
use tracing::warn;

/// History kept per person, as a rolling window ending at the commit day.
const RETENTION_DAYS: i64 = 30;

/// Records the pending selection. Re-marking overwrites; there is no history
/// of mark changes, only the value standing at submit time.
pub fn mark(person: &mut Person, status: Status) {
    person.pending = Some(status);
}

/// Commits the pending selection using the local clock.
pub fn submit(person: &mut Person) -> Result<AttendanceRecord, AppError> {
    let now = Local::now();
    submit_at(person, now.date_naive(), now.time())
}

/// Commits the pending selection as a record dated `today`, assessed at
/// `now`. Fails without touching the person when nothing is pending.
pub fn submit_at(
    person: &mut Person,
    today: NaiveDate,
    now: NaiveTime,
) -> Result<AttendanceRecord, AppError> {
    let status = person
        .pending
        .ok_or_else(|| AppError::bad_request("no selection made"))?;

    let assessment = penalty::assess(status, now);
    let record = AttendanceRecord {
        date: date_key(today),
        status,
        penalty: assessment.penalty,
        arrive: assessment.arrive,
    };

    prune_history(person, today);
    person.attendance.push(record.clone());
    person.pending = None;

    Ok(record)
}

/// Drops records dated more than `RETENTION_DAYS` calendar days before
/// `today`. Runs at write time only; records whose date no longer parses are
/// dropped as well.
pub fn prune_history(person: &mut Person, today: NaiveDate) {
    person.attendance.retain(|record| {
        match NaiveDate::parse_from_str(&record.date, "%Y-%m-%d") {
            Ok(date) => (today - date).num_days() <= RETENTION_DAYS,
            Err(_) => {
                warn!(date = %record.date, "dropping record with unparseable date");
                false
            }
        }
    });
}

pub fn date_key(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}
