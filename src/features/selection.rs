//! Heuristic choice of attributes when the caller gives none.

use super::AttributeGroups;
use crate::eventlog::{AttributeValue, EventLog};
use std::collections::{BTreeMap, BTreeSet};

/// Traces inspected by the heuristic.
const MAX_CASES_FOR_ATTR_SELECTION: usize = 50;
/// String attributes with this many distinct values or more are dropped.
const MAX_DIFF_OCC: f64 = MAX_CASES_FOR_ATTR_SELECTION as f64 / 4.0;

#[derive(Default)]
struct Seen {
    values: BTreeSet<String>,
    all_numeric: bool,
    all_text: bool,
    occurrences: usize,
}

impl Seen {
    fn new() -> Self {
        Self {
            all_numeric: true,
            all_text: true,
            ..Default::default()
        }
    }

    fn add(&mut self, value: &AttributeValue) {
        self.values.insert(value.to_string());
        self.all_numeric &= value.is_numeric();
        self.all_text &= value.is_text();
        self.occurrences += 1;
    }
}

/// Low-cardinality string attributes and always-present numeric attributes,
/// at trace and event level, over the first traces of the log.
pub fn select_attributes(log: &EventLog) -> AttributeGroups {
    let sample = &log.traces[..log.len().min(MAX_CASES_FOR_ATTR_SELECTION)];
    let n_events: usize = sample.iter().map(|t| t.len()).sum();

    let mut trace_attrs: BTreeMap<&str, Seen> = BTreeMap::new();
    let mut event_attrs: BTreeMap<&str, Seen> = BTreeMap::new();
    for trace in sample {
        for (k, v) in &trace.attributes {
            trace_attrs.entry(k.as_str()).or_insert_with(Seen::new).add(v);
        }
        for event in &trace.events {
            for (k, v) in event.iter() {
                event_attrs.entry(k.as_str()).or_insert_with(Seen::new).add(v);
            }
        }
    }

    let mut groups = AttributeGroups::default();
    for (name, seen) in trace_attrs {
        if seen.all_numeric && seen.occurrences == sample.len() {
            groups.num_tr_attr.push(name.to_string());
        } else if seen.all_text && (seen.values.len() as f64) < MAX_DIFF_OCC {
            groups.str_tr_attr.push(name.to_string());
        }
    }
    for (name, seen) in event_attrs {
        if seen.all_numeric && seen.occurrences == n_events {
            groups.num_ev_attr.push(name.to_string());
        } else if seen.all_text && (seen.values.len() as f64) < MAX_DIFF_OCC {
            groups.str_ev_attr.push(name.to_string());
        }
    }
    tracing::debug!(
        str_tr = groups.str_tr_attr.len(),
        str_ev = groups.str_ev_attr.len(),
        num_tr = groups.num_tr_attr.len(),
        num_ev = groups.num_ev_attr.len(),
        "attributes selected"
    );
    groups
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::eventlog::{Event, Trace, DEFAULT_ACTIVITY_KEY, DEFAULT_TIMESTAMP_KEY};
    use chrono::DateTime;

    fn event(act: &str, cost: Option<i64>, note: &str) -> Event {
        let mut e = Event::new()
            .with(DEFAULT_ACTIVITY_KEY, act)
            .with(
                DEFAULT_TIMESTAMP_KEY,
                DateTime::parse_from_rfc3339("2021-01-04T08:00:00Z").unwrap(),
            )
            .with("note", note);
        if let Some(c) = cost {
            e = e.with("cost", c);
        }
        e
    }

    #[test]
    fn picks_by_kind_cardinality_and_presence() {
        let mut traces = Vec::new();
        for i in 0..20 {
            let t = Trace::new(vec![
                event("A", Some(3), &format!("free text {}", i)),
                event("B", if i == 0 { None } else { Some(5) }, "x"),
            ])
            .with_attribute("channel", if i % 2 == 0 { "web" } else { "phone" })
            .with_attribute("amount", i as f64)
            .with_attribute("case_id", format!("c{}", i));
            traces.push(t);
        }
        let g = select_attributes(&EventLog::new(traces));

        assert_eq!(g.str_tr_attr, vec!["channel"]);
        assert_eq!(g.num_tr_attr, vec!["amount"]);
        assert_eq!(g.str_ev_attr, vec![DEFAULT_ACTIVITY_KEY]);
        // cost missing on one event, timestamps are neither string nor numeric
        assert!(g.num_ev_attr.is_empty());
    }

    #[test]
    fn empty_log_selects_nothing() {
        assert_eq!(select_attributes(&EventLog::default()), AttributeGroups::default());
    }
}
