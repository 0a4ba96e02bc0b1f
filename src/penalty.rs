use crate::models::Status;
use chrono::{NaiveTime, Timelike};

/// The shift starts at 17:00; a present check-in after that is late.
pub const SHIFT_START_HOUR: u32 = 17;
pub const SHIFT_START_MINUTE: u32 = 0;

/// Inclusive upper bound in minutes late, and the penalty for that tier.
/// Anything past the last bound falls into `OVERFLOW_PENALTY`.
const TIERS: [(i64, f64); 5] = [
    (5, -0.05),
    (10, -0.10),
    (15, -0.15),
    (20, -0.20),
    (25, -0.25),
];

const OVERFLOW_PENALTY: f64 = -0.30;

#[derive(Debug, Clone, PartialEq)]
pub struct Assessment {
    pub penalty: f64,
    pub arrive: String,
}

/// Minutes past shift start, negative when early. Seconds are ignored; the
/// comparison is minute-of-day against minute-of-day.
pub fn late_minutes(now: NaiveTime) -> i64 {
    let now_minutes = i64::from(now.hour()) * 60 + i64::from(now.minute());
    let start_minutes = i64::from(SHIFT_START_HOUR) * 60 + i64::from(SHIFT_START_MINUTE);
    now_minutes - start_minutes
}

/// Pure assessment of a check-in at `now`. Absent check-ins never incur a
/// lateness computation.
pub fn assess(status: Status, now: NaiveTime) -> Assessment {
    match status {
        Status::Absent => Assessment {
            penalty: 0.0,
            arrive: "Absent".to_string(),
        },
        Status::Present => assess_late(late_minutes(now)),
    }
}

fn assess_late(late: i64) -> Assessment {
    if late <= 0 {
        return Assessment {
            penalty: 0.0,
            arrive: "On Time".to_string(),
        };
    }

    let penalty = TIERS
        .iter()
        .find(|(bound, _)| late <= *bound)
        .map(|(_, penalty)| *penalty)
        .unwrap_or(OVERFLOW_PENALTY);

    Assessment {
        penalty,
        arrive: format!("{late} min late"),
    }
}
