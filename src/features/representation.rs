//! Flat per-trace representation: one row per trace, one column per descriptor.

use super::{
    event_descriptor, numeric_event_descriptor, numeric_trace_descriptor, succession_descriptor,
    trace_descriptor, AttributeGroups, FeatureDictionary,
};
use crate::error::{PredictError, Result};
use crate::eventlog::{EventLog, Trace};
use ndarray::Array2;
use std::collections::BTreeSet;

fn string_trace_values(trace: &Trace, attr: &str) -> Option<String> {
    trace.attributes.get(attr).map(|v| trace_descriptor(attr, v))
}

fn string_event_values(trace: &Trace, attr: &str) -> BTreeSet<String> {
    trace
        .events
        .iter()
        .filter_map(|e| e.get(attr).map(|v| event_descriptor(attr, v)))
        .collect()
}

fn succession_values(trace: &Trace, attr: &str) -> BTreeSet<String> {
    trace
        .events
        .windows(2)
        .filter_map(|pair| match (pair[0].get(attr), pair[1].get(attr)) {
            (Some(a), Some(b)) => Some(succession_descriptor(attr, a, b)),
            _ => None,
        })
        .collect()
}

fn discover_feature_names(log: &EventLog, groups: &AttributeGroups, successor_attrs: &[String]) -> Vec<String> {
    let mut names = Vec::new();
    for attr in &groups.str_tr_attr {
        let values: BTreeSet<String> = log.iter().filter_map(|t| string_trace_values(t, attr)).collect();
        names.extend(values);
    }
    for attr in &groups.str_ev_attr {
        let values: BTreeSet<String> = log.iter().flat_map(|t| string_event_values(t, attr)).collect();
        names.extend(values);
    }
    names.extend(groups.num_tr_attr.iter().map(|a| numeric_trace_descriptor(a)));
    names.extend(groups.num_ev_attr.iter().map(|a| numeric_event_descriptor(a)));
    for attr in successor_attrs {
        let values: BTreeSet<String> = log.iter().flat_map(|t| succession_values(t, attr)).collect();
        names.extend(values);
    }
    names
}

/// Builds the design matrix of `log`.
///
/// Without `existing` the feature names are discovered from the log. With it, the
/// columns follow that ordering exactly and descriptors it lacks are dropped.
pub fn represent(
    log: &EventLog,
    groups: &AttributeGroups,
    successor_attrs: &[String],
    existing: Option<&[String]>,
) -> Result<(Array2<f64>, Vec<String>)> {
    let feature_names = match existing {
        Some(names) => names.to_vec(),
        None => discover_feature_names(log, groups, successor_attrs),
    };
    let dict = FeatureDictionary::build(&feature_names);
    let mut data = Array2::<f64>::zeros((log.len(), dict.len()));

    for (row, trace) in log.iter().enumerate() {
        let mut set = |descriptor: &str, value: f64| {
            if let Some(col) = dict.index_of(descriptor) {
                data[[row, col]] = value;
            }
        };
        for attr in &groups.str_tr_attr {
            if let Some(d) = string_trace_values(trace, attr) {
                set(&d, 1.0);
            }
        }
        for attr in &groups.str_ev_attr {
            for d in string_event_values(trace, attr) {
                set(&d, 1.0);
            }
        }
        for attr in &groups.num_tr_attr {
            let value = trace
                .attributes
                .get(attr)
                .and_then(|v| v.as_f64())
                .ok_or_else(|| PredictError::missing(attr, format!("trace {}", row)))?;
            set(&numeric_trace_descriptor(attr), value);
        }
        for attr in &groups.num_ev_attr {
            let value = trace
                .events
                .iter()
                .rev()
                .find_map(|e| e.get(attr))
                .and_then(|v| v.as_f64())
                .ok_or_else(|| PredictError::missing(attr, format!("events of trace {}", row)))?;
            set(&numeric_event_descriptor(attr), value);
        }
        for attr in successor_attrs {
            for d in succession_values(trace, attr) {
                set(&d, 1.0);
            }
        }
    }

    Ok((data, feature_names))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::eventlog::{Event, DEFAULT_ACTIVITY_KEY};

    const ACT: &str = DEFAULT_ACTIVITY_KEY;

    fn trace(acts: &[&str], costs: &[i64]) -> Trace {
        Trace::new(
            acts.iter()
                .zip(costs)
                .map(|(a, c)| Event::new().with(ACT, *a).with("cost", *c))
                .collect(),
        )
        .with_attribute("channel", "web")
    }

    fn groups() -> AttributeGroups {
        AttributeGroups {
            str_tr_attr: vec!["channel".into()],
            str_ev_attr: vec![ACT.into()],
            num_tr_attr: vec![],
            num_ev_attr: vec!["cost".into()],
        }
    }

    #[test]
    fn discovers_names_in_family_order() {
        let log = EventLog::new(vec![trace(&["B", "A"], &[1, 2]), trace(&["A", "C"], &[3, 4])]);
        let (data, names) = represent(&log, &groups(), &[ACT.to_string()], None).unwrap();
        assert_eq!(
            names,
            vec![
                "trace:channel@web",
                "event:concept:name@A",
                "event:concept:name@B",
                "event:concept:name@C",
                "event:cost",
                "succession:concept:name@A#C",
                "succession:concept:name@B#A",
            ]
        );
        assert_eq!(data.shape(), &[2, 7]);
        assert_eq!(data.row(0).to_vec(), vec![1.0, 1.0, 1.0, 0.0, 2.0, 0.0, 1.0]);
        assert_eq!(data.row(1).to_vec(), vec![1.0, 1.0, 0.0, 1.0, 4.0, 1.0, 0.0]);
    }

    #[test]
    fn existing_names_drop_unseen_descriptors() {
        let train = EventLog::new(vec![trace(&["A", "B"], &[1, 2])]);
        let (_, names) = represent(&train, &groups(), &[ACT.to_string()], None).unwrap();

        let test = EventLog::new(vec![trace(&["A", "Z"], &[7, 9])]);
        let (data, same) = represent(&test, &groups(), &[ACT.to_string()], Some(names.as_slice())).unwrap();
        assert_eq!(same, names);
        assert_eq!(data.ncols(), names.len());
        // event Z and succession A#Z have no column
        let row: Vec<f64> = data.row(0).to_vec();
        assert_eq!(row.iter().filter(|v| **v == 1.0).count(), 2);
        assert_eq!(row[names.iter().position(|n| n == "event:cost").unwrap()], 9.0);
    }

    #[test]
    fn missing_numeric_attribute_fails() {
        let t = Trace::new(vec![Event::new().with(ACT, "A")]);
        let err = represent(&EventLog::new(vec![t]), &groups(), &[], None).unwrap_err();
        assert!(matches!(err, PredictError::MissingAttribute { .. }));
    }
}
