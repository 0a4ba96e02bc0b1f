use crate::models::{Person, Roster, Status};
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Totals {
    pub present: usize,
    pub absent: usize,
    pub penalty: f64,
}

/// One line of the tabular view. Cells are already formatted: present and
/// absent carry fixed markers ("P"/"A") or stay empty, late is the penalty
/// to two decimal places.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReportRow {
    pub date: String,
    pub arrive: String,
    pub present: String,
    pub late: String,
    pub absent: String,
}

#[derive(Debug, Serialize)]
pub struct PersonReport {
    pub name: String,
    pub rows: Vec<ReportRow>,
    pub totals: Totals,
}

pub fn person_totals(person: &Person) -> Totals {
    let mut totals = Totals {
        present: 0,
        absent: 0,
        penalty: 0.0,
    };
    for record in &person.attendance {
        match record.status {
            Status::Present => totals.present += 1,
            Status::Absent => totals.absent += 1,
        }
        totals.penalty += record.penalty;
    }
    totals
}

/// One row per record plus the synthetic totals row appended last.
pub fn person_rows(person: &Person) -> Vec<ReportRow> {
    let totals = person_totals(person);
    let mut rows: Vec<ReportRow> = person
        .attendance
        .iter()
        .map(|record| ReportRow {
            date: record.date.clone(),
            arrive: record.arrive.clone(),
            present: match record.status {
                Status::Present => "P".to_string(),
                Status::Absent => String::new(),
            },
            late: format!("{:.2}", record.penalty),
            absent: match record.status {
                Status::Absent => "A".to_string(),
                Status::Present => String::new(),
            },
        })
        .collect();

    rows.push(ReportRow {
        date: "Total".to_string(),
        arrive: "-".to_string(),
        present: totals.present.to_string(),
        late: format!("{:.2}", totals.penalty),
        absent: totals.absent.to_string(),
    });

    rows
}

pub fn build_report(roster: &Roster) -> Vec<PersonReport> {
    roster
        .iter()
        .map(|(name, person)| PersonReport {
            name: name.clone(),
            rows: person_rows(person),
            totals: person_totals(person),
        })
        .collect()
}

/// Renders the archive document for a period-close: a title line, then the
/// full table including the totals row.
pub fn render_export(name: &str, person: &Person) -> String {
    let mut out = format!("Report: {name}\n");
    if person.attendance.is_empty() {
        out.push_str("No data available\n");
        return out;
    }

    out.push_str("Date | Arrive | Present | Late | Absent\n");
    for row in person_rows(person) {
        out.push_str(&format!(
            "{} | {} | {} | {} | {}\n",
            row.date, row.arrive, row.present, row.late, row.absent
        ));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::AttendanceRecord;

    fn history() -> Person {
        Person {
            attendance: vec![
                AttendanceRecord {
                    date: "2026-08-27".to_string(),
                    status: Status::Present,
                    penalty: 0.0,
                    arrive: "On Time".to_string(),
                },
                AttendanceRecord {
                    date: "2026-08-28".to_string(),
                    status: Status::Present,
                    penalty: -0.10,
                    arrive: "8 min late".to_string(),
                },
                AttendanceRecord {
                    date: "2026-08-29".to_string(),
                    status: Status::Absent,
                    penalty: 0.0,
                    arrive: "Absent".to_string(),
                },
            ],
            photo: String::new(),
            pending: None,
        }
    }

    #[test]
    fn totals_sum_counts_and_penalties() {
        let totals = person_totals(&history());
        assert_eq!(totals.present, 2);
        assert_eq!(totals.absent, 1);
        assert!((totals.penalty - (-0.10)).abs() < 1e-9);
    }

    #[test]
    fn rows_end_with_a_totals_row_matching_the_aggregates() {
        let person = history();
        let rows = person_rows(&person);
        assert_eq!(rows.len(), person.attendance.len() + 1);

        let total = rows.last().unwrap();
        assert_eq!(total.date, "Total");
        assert_eq!(total.arrive, "-");
        assert_eq!(total.present, "2");
        assert_eq!(total.late, "-0.10");
        assert_eq!(total.absent, "1");
    }

    #[test]
    fn rows_use_fixed_markers_and_two_decimal_penalties() {
        let rows = person_rows(&history());
        assert_eq!(rows[0].present, "P");
        assert_eq!(rows[0].absent, "");
        assert_eq!(rows[0].late, "0.00");
        assert_eq!(rows[1].late, "-0.10");
        assert_eq!(rows[2].present, "");
        assert_eq!(rows[2].absent, "A");
    }

    #[test]
    fn export_includes_title_header_and_totals() {
        let text = render_export("Alice", &history());
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "Report: Alice");
        assert_eq!(lines[1], "Date | Arrive | Present | Late | Absent");
        assert_eq!(lines[2], "2026-08-27 | On Time | P | 0.00 | ");
        assert_eq!(lines.last().unwrap(), &"Total | - | 2 | -0.10 | 1");
    }

    #[test]
    fn export_of_empty_history_says_so() {
        let text = render_export("Bob", &Person::default());
        assert_eq!(text, "Report: Bob\nNo data available\n");
    }

    #[test]
    fn report_covers_every_person() {
        let mut roster = Roster::new();
        roster.insert("Alice".to_string(), history());
        roster.insert("Bob".to_string(), Person::default());

        let report = build_report(&roster);
        assert_eq!(report.len(), 2);
        assert_eq!(report[0].name, "Alice");
        assert_eq!(report[1].rows.len(), 1);
        assert_eq!(report[1].rows[0].date, "Total");
    }
}
