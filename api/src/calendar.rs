//! Client-side reshaping of calendar listings: optional state filter plus an
//! id-keyed dictionary over whatever survives the filter.

use crate::{CalendarEntry, CalendarResponse, CalendarResults};
use log::warn;
use serde_json::Value;
use std::collections::BTreeMap;

/// Filter a calendar response by `state` and index the result by tournament id.
///
/// A missing response or a response without a `calendar` field yields the
/// empty result. A blank `state` means no filter; any other value is matched
/// exactly, untrimmed. Entries whose state is not a string never match.
/// Entries without an id stay
/// in the filtered list but are left out of the dictionary.
pub fn filter_calendar(response: Option<CalendarResponse>, state: Option<&str>) -> CalendarResults {
    let Some(calendar) = response.and_then(|r| r.calendar) else {
        return CalendarResults::default();
    };

    let calendar: Vec<CalendarEntry> = match state.filter(|s| !s.trim().is_empty()) {
        Some(state) => calendar
            .into_iter()
            .filter(|entry| entry.state() == Some(state))
            .collect(),
        None => calendar,
    };

    let dictionary = index_by_id(&calendar);
    CalendarResults {
        calendar: Some(calendar),
        dictionary: Some(dictionary),
    }
}

/// Build an id → entry map in list order; a repeated id keeps the later entry.
pub fn index_by_id(calendar: &[CalendarEntry]) -> BTreeMap<String, CalendarEntry> {
    let mut dictionary = BTreeMap::new();
    for (position, entry) in calendar.iter().enumerate() {
        match entry.id_key() {
            Some(key) => {
                dictionary.insert(key, entry.clone());
            }
            None => warn!("calendar entry at position {position} has no tournament id; not indexed"),
        }
    }
    dictionary
}

impl CalendarResults {
    /// Decode a raw calendar payload and filter it. `null` (an empty body)
    /// counts as no response.
    pub fn from_value(raw: Value, state: Option<&str>) -> serde_json::Result<Self> {
        if raw.is_null() {
            return Ok(filter_calendar(None, state));
        }
        let response: CalendarResponse = serde_json::from_value(raw)?;
        Ok(filter_calendar(Some(response), state))
    }

    /// True when the service returned no calendar at all.
    pub fn is_empty(&self) -> bool {
        self.calendar.is_none()
    }

    pub fn total_entries(&self) -> usize {
        self.calendar.as_ref().map_or(0, Vec::len)
    }

    pub fn get(&self, id: &str) -> Option<&CalendarEntry> {
        self.dictionary.as_ref()?.get(id)
    }

    /// Filtered entries that could not be indexed because they carry no id.
    pub fn unindexed(&self) -> impl Iterator<Item = &CalendarEntry> {
        self.calendar
            .iter()
            .flatten()
            .filter(|entry| entry.id_key().is_none())
    }
}
