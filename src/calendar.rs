//! Business-calendar elapsed time: only working hours on working days count.

use chrono::{Datelike, Duration, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BusinessCalendar {
    /// Start and end hour of the working day, `[7, 17]` = 07:00 to 17:00
    pub work_hours: [u32; 2],
    /// ISO weekday numbers (Mon = 1 .. Sun = 7) that are not worked
    pub weekends: Vec<u32>,
}

impl Default for BusinessCalendar {
    fn default() -> Self {
        Self {
            work_hours: [7, 17],
            weekends: vec![6, 7],
        }
    }
}

/// Seconds in `d` at microsecond resolution.
pub fn duration_seconds(d: Duration) -> f64 {
    match d.num_microseconds() {
        Some(us) => us as f64 / 1e6,
        None => d.num_seconds() as f64,
    }
}

fn at_hour(date: NaiveDate, hour: u32) -> Option<NaiveDateTime> {
    if hour >= 24 {
        date.succ_opt()?.and_hms_opt(0, 0, 0)
    } else {
        date.and_hms_opt(hour, 0, 0)
    }
}

impl BusinessCalendar {
    pub fn new(work_hours: [u32; 2], weekends: Vec<u32>) -> Self {
        Self {
            work_hours,
            weekends,
        }
    }

    pub fn is_working_day(&self, date: NaiveDate) -> bool {
        !self.weekends.contains(&date.weekday().number_from_monday())
    }

    /// Seconds between `start` and `end` that fall inside working hours.
    /// Zero when `end` is not after `start`.
    pub fn elapsed_seconds(&self, start: NaiveDateTime, end: NaiveDateTime) -> f64 {
        if end <= start || self.work_hours[0] >= self.work_hours[1] {
            return 0.0;
        }
        let mut total = Duration::zero();
        let mut day = start.date();
        let last = end.date();
        while day <= last {
            if self.is_working_day(day) {
                if let (Some(open), Some(close)) = (
                    at_hour(day, self.work_hours[0]),
                    at_hour(day, self.work_hours[1]),
                ) {
                    let from = start.max(open);
                    let to = end.min(close);
                    if to > from {
                        total += to - from;
                    }
                }
            }
            day = match day.succ_opt() {
                Some(next) => next,
                None => break,
            };
        }
        duration_seconds(total)
    }
}
