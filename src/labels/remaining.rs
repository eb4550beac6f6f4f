//! Remaining time from each event to the end of its trace.

use super::LabelOptions;
use crate::calendar::duration_seconds;
use crate::error::Result;
use crate::eventlog::{EventLog, Trace};
use chrono::{DateTime, FixedOffset};

fn seconds_between(start: DateTime<FixedOffset>, end: DateTime<FixedOffset>, opts: &LabelOptions) -> f64 {
    if opts.business_hours {
        opts.calendar
            .elapsed_seconds(start.naive_local(), end.naive_local())
    } else {
        duration_seconds(end - start)
    }
}

/// Remaining time at each of the first `limit` events of `trace`, unpadded.
pub fn trace_remaining_time(trace: &Trace, limit: usize, opts: &LabelOptions) -> Result<Vec<f64>> {
    let Some(last) = trace.last() else {
        return Ok(Vec::new());
    };
    let end = last.timestamp(&opts.timestamp_key)?;
    trace
        .events
        .iter()
        .take(limit)
        .map(|ev| Ok(seconds_between(ev.timestamp(&opts.timestamp_key)?, end, opts)))
        .collect()
}

/// Per-trace remaining times, truncated and padded to `max_len_trace`.
///
/// Padding repeats the trace's own last value; those tail entries are filler for
/// fixed-length batching, not observations. An empty trace yields an empty list.
pub fn remaining_time(log: &EventLog, max_len_trace: usize, opts: &LabelOptions) -> Result<Vec<Vec<f64>>> {
    let mut out = Vec::with_capacity(log.len());
    for trace in log {
        let mut row = trace_remaining_time(trace, max_len_trace, opts)?;
        if let Some(&last) = row.last() {
            row.resize(max_len_trace, last);
        }
        out.push(row);
    }
    Ok(out)
}

/// One label per trace of an expanded log: the span from the prefix's first to
/// its last event, 0 for an empty prefix. Row order follows `ext_log`.
pub fn prefix_remaining_time(ext_log: &EventLog, opts: &LabelOptions) -> Result<Vec<f64>> {
    ext_log
        .iter()
        .map(|prefix| match (prefix.first(), prefix.last()) {
            (Some(first), Some(last)) => Ok(seconds_between(
                first.timestamp(&opts.timestamp_key)?,
                last.timestamp(&opts.timestamp_key)?,
                opts,
            )),
            _ => Ok(0.0),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calendar::BusinessCalendar;
    use crate::eventlog::{Event, DEFAULT_ACTIVITY_KEY, DEFAULT_TIMESTAMP_KEY};
    use chrono::Duration;

    fn trace_at(base: &str, offsets: &[i64]) -> Trace {
        let base = DateTime::parse_from_rfc3339(base).unwrap();
        Trace::new(
            offsets
                .iter()
                .map(|s| {
                    Event::new()
                        .with(DEFAULT_ACTIVITY_KEY, "A")
                        .with(DEFAULT_TIMESTAMP_KEY, base + Duration::seconds(*s))
                })
                .collect(),
        )
    }

    #[test]
    fn three_events_padded_to_five() {
        let log = EventLog::new(vec![trace_at("2021-01-04T08:00:00Z", &[0, 5, 12])]);
        let y = remaining_time(&log, 5, &LabelOptions::default()).unwrap();
        assert_eq!(y, vec![vec![12.0, 7.0, 0.0, 0.0, 0.0]]);
    }

    #[test]
    fn truncates_at_max_len() {
        let log = EventLog::new(vec![trace_at("2021-01-04T08:00:00Z", &[0, 5, 12, 20])]);
        let y = remaining_time(&log, 2, &LabelOptions::default()).unwrap();
        assert_eq!(y, vec![vec![20.0, 15.0]]);
    }

    #[test]
    fn last_real_value_is_zero() {
        let log = EventLog::new(vec![
            trace_at("2021-01-04T08:00:00Z", &[0, 30, 90]),
            trace_at("2021-01-04T08:00:00Z", &[0]),
        ]);
        let y = remaining_time(&log, 3, &LabelOptions::default()).unwrap();
        assert_eq!(y[0][2], 0.0);
        assert_eq!(y[1], vec![0.0, 0.0, 0.0]);
    }

    #[test]
    fn padding_repeats_own_last_value() {
        // truncated before the final event, so the last kept value is non-zero
        let log = EventLog::new(vec![trace_at("2021-01-04T08:00:00Z", &[0, 10, 40])]);
        let y = trace_remaining_time(&log.traces[0], 2, &LabelOptions::default()).unwrap();
        assert_eq!(y, vec![40.0, 30.0]);
    }

    #[test]
    fn empty_trace_gives_empty_list() {
        let log = EventLog::new(vec![Trace::default()]);
        let y = remaining_time(&log, 4, &LabelOptions::default()).unwrap();
        assert_eq!(y, vec![Vec::<f64>::new()]);
    }

    #[test]
    fn business_hours_use_calendar() {
        // Friday 16:00 -> Monday 08:00 is two business hours
        let log = EventLog::new(vec![trace_at("2021-01-01T16:00:00+02:00", &[0, 64 * 3600])]);
        let opts = LabelOptions {
            business_hours: true,
            calendar: BusinessCalendar::default(),
            ..LabelOptions::default()
        };
        let y = remaining_time(&log, 2, &opts).unwrap();
        assert_eq!(y, vec![vec![7200.0, 0.0]]);
    }

    #[test]
    fn prefix_labels_are_prefix_spans() {
        let log = EventLog::new(vec![
            trace_at("2021-01-04T08:00:00Z", &[0, 5, 12]),
            trace_at("2021-01-04T08:00:00Z", &[0, 3]),
        ]);
        let (ext_log, _) = crate::eventlog::expand(&log);
        let y = prefix_remaining_time(&ext_log, &LabelOptions::default()).unwrap();
        assert_eq!(y, vec![0.0, 5.0, 12.0, 0.0, 3.0]);
    }

    #[test]
    fn empty_prefix_spans_zero() {
        let log = EventLog::new(vec![Trace::default()]);
        let y = prefix_remaining_time(&log, &LabelOptions::default()).unwrap();
        assert_eq!(y, vec![0.0]);
    }

    #[test]
    fn prefix_spans_in_business_hours() {
        // Friday 16:00, Monday 08:00
        let log = EventLog::new(vec![trace_at("2021-01-01T16:00:00+02:00", &[0, 64 * 3600])]);
        let (ext_log, _) = crate::eventlog::expand(&log);
        let opts = LabelOptions {
            business_hours: true,
            ..LabelOptions::default()
        };
        let y = prefix_remaining_time(&ext_log, &opts).unwrap();
        assert_eq!(y, vec![0.0, 7200.0]);
    }
}
