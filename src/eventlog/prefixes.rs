//! Prefix expansion: every trace becomes all of its non-empty prefixes.

use super::EventLog;

/// Expands each trace of length n into its prefixes of length 1..=n.
///
/// The second value groups expanded-log indices by source trace, in prefix-length
/// order, so per-prefix values can be regrouped per case afterwards.
pub fn expand(log: &EventLog) -> (EventLog, Vec<Vec<usize>>) {
    let total: usize = log.iter().map(|t| t.len()).sum();
    let mut traces = Vec::with_capacity(total);
    let mut change_indexes = Vec::with_capacity(log.len());

    for trace in log {
        let mut group = Vec::with_capacity(trace.len());
        for k in 1..=trace.len() {
            group.push(traces.len());
            traces.push(trace.prefix(k));
        }
        change_indexes.push(group);
    }

    let expanded = EventLog {
        attributes: log.attributes.clone(),
        traces,
    };
    (expanded, change_indexes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::eventlog::{Event, Trace, DEFAULT_ACTIVITY_KEY};

    fn trace(acts: &[&str]) -> Trace {
        Trace::new(
            acts.iter()
                .map(|a| Event::new().with(DEFAULT_ACTIVITY_KEY, *a))
                .collect(),
        )
    }

    #[test]
    fn change_indexes_partition_expanded_rows() {
        let log = EventLog::new(vec![trace(&["A", "B", "C"]), trace(&["A"]), trace(&["B", "D"])]);
        let (ext, groups) = expand(&log);

        assert_eq!(ext.len(), 6);
        let flat: Vec<usize> = groups.iter().flatten().copied().collect();
        assert_eq!(flat, (0..6).collect::<Vec<_>>());
        assert_eq!(groups, vec![vec![0, 1, 2], vec![3], vec![4, 5]]);
    }

    #[test]
    fn prefixes_grow_one_event_at_a_time() {
        let log = EventLog::new(vec![trace(&["A", "B", "C"])]);
        let (ext, _) = expand(&log);
        let lens: Vec<usize> = ext.iter().map(Trace::len).collect();
        assert_eq!(lens, vec![1, 2, 3]);
        assert_eq!(ext.traces[2], log.traces[0]);
    }

    #[test]
    fn empty_trace_has_empty_group() {
        let log = EventLog::new(vec![Trace::default(), trace(&["A"])]);
        let (ext, groups) = expand(&log);
        assert_eq!(ext.len(), 1);
        assert_eq!(groups, vec![vec![], vec![0]]);
    }
}
