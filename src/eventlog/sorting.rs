//! Timestamp ordering of events and traces.

use super::{EventLog, Trace};
use crate::error::Result;

/// Returns a new log with events sorted inside each trace and traces sorted by
/// their first event. Empty traces are dropped. Both sorts are stable.
pub fn sort_by_timestamp(log: &EventLog, timestamp_key: &str) -> Result<EventLog> {
    let mut keyed = Vec::with_capacity(log.len());
    for trace in log.iter().filter(|t| !t.is_empty()) {
        let mut events = Vec::with_capacity(trace.len());
        for event in &trace.events {
            events.push((event.timestamp(timestamp_key)?, event.clone()));
        }
        events.sort_by_key(|(ts, _)| *ts);
        let first = events[0].0;
        let sorted = Trace {
            attributes: trace.attributes.clone(),
            events: events.into_iter().map(|(_, e)| e).collect(),
        };
        keyed.push((first, sorted));
    }
    keyed.sort_by_key(|(ts, _)| *ts);

    Ok(EventLog {
        attributes: log.attributes.clone(),
        traces: keyed.into_iter().map(|(_, t)| t).collect(),
    })
}
