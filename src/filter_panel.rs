//! Filter panel: sport selector, minimum value slider and match search.
//!
//! The panel never owns state. Each control emits a [`FilterChange`] which
//! the page applies to its current [`FilterState`].

use crate::config::{FILTER_SPORTS, VALUE_SLIDER_MAX, VALUE_SLIDER_MIN, VALUE_SLIDER_STEP};
use crate::query::FilterState;

/// Update emitted by one of the panel's controls
#[derive(Debug, Clone, PartialEq)]
pub enum FilterChange {
    Sport(String),
    Value(f64),
    Search(String),
}

impl FilterChange {
    /// New filter state with this change applied
    pub fn apply(self, filters: &FilterState) -> FilterState {
        let mut next = filters.clone();
        match self {
            FilterChange::Sport(sport) => next.sport = sport,
            FilterChange::Value(value) => next.value = snap_value(value),
            FilterChange::Search(search) => next.search = search,
        }
        next
    }
}

/// Clamp to the slider range and round to the nearest step
pub fn snap_value(value: f64) -> f64 {
    if !value.is_finite() {
        return VALUE_SLIDER_MIN;
    }
    let clamped = value.clamp(VALUE_SLIDER_MIN, VALUE_SLIDER_MAX);
    let steps = ((clamped - VALUE_SLIDER_MIN) / VALUE_SLIDER_STEP).round();
    (VALUE_SLIDER_MIN + steps * VALUE_SLIDER_STEP).min(VALUE_SLIDER_MAX)
}

/// Sports listed in the dropdown
pub fn sport_options() -> &'static [&'static str] {
    FILTER_SPORTS
}

/// Slider caption
pub fn value_label(filters: &FilterState) -> String {
    format!("Min Value ({}%)", filters.value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_changes_touch_one_field() {
        let filters = FilterState::default();

        let next = FilterChange::Sport("Tennis".to_string()).apply(&filters);
        assert_eq!(next.sport, "Tennis");
        assert_eq!(next.value, filters.value);
        assert_eq!(next.search, filters.search);

        let next = FilterChange::Search("match 1".to_string()).apply(&next);
        assert_eq!(next.sport, "Tennis");
        assert_eq!(next.search, "match 1");

        let next = FilterChange::Value(7.5).apply(&next);
        assert_eq!(next.value, 7.5);
        assert_eq!(next.search, "match 1");
    }

    #[test]
    fn test_value_snaps_to_slider() {
        assert_eq!(snap_value(2.26), 2.5);
        assert_eq!(snap_value(2.24), 2.0);
        assert_eq!(snap_value(-3.0), 0.0);
        assert_eq!(snap_value(40.0), 15.0);
        assert_eq!(snap_value(f64::NAN), 0.0);
    }

    #[test]
    fn test_options_and_label() {
        assert_eq!(sport_options(), &["All", "Football", "Basketball", "Tennis"]);
        assert_eq!(value_label(&FilterState::default()), "Min Value (2%)");
    }
}
