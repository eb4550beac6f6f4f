//! Ground-truth remaining-time labels and their logarithmic scaling.

mod normalize;
mod remaining;

pub use normalize::{denormalize, group_by_case, normalize, normalize_value};
pub use remaining::{prefix_remaining_time, remaining_time, trace_remaining_time};

use crate::calendar::BusinessCalendar;
use crate::eventlog::DEFAULT_TIMESTAMP_KEY;

/// How remaining time is measured.
#[derive(Debug, Clone, PartialEq)]
pub struct LabelOptions {
    pub timestamp_key: String,
    /// Business seconds (calendar below) instead of wall-clock seconds
    pub business_hours: bool,
    pub calendar: BusinessCalendar,
}

impl Default for LabelOptions {
    fn default() -> Self {
        Self {
            timestamp_key: DEFAULT_TIMESTAMP_KEY.to_string(),
            business_hours: false,
            calendar: BusinessCalendar::default(),
        }
    }
}
