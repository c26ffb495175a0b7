// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Cumulative device state.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::report::{PRODUCT_FIELD, ReportUpdate};

/// Reserved field reflecting transport connectivity.
pub const ONLINE_FIELD: &str = "Online";

/// Last known values reported by a charging station.
///
/// The state is a flat map from the station's field names (kept verbatim,
/// e.g. `"Max curr"`) to their normalized values. Fields accumulate over a
/// session: merging an update only overwrites the keys it carries, nothing
/// is cleared implicitly.
///
/// # Examples
///
/// ```
/// use kecontact::state::DeviceState;
/// use serde_json::json;
///
/// let mut state = DeviceState::new();
/// state.merge_fields(json!({"a": 1}).as_object().unwrap());
/// state.merge_fields(json!({"b": 2}).as_object().unwrap());
/// state.merge_fields(json!({"a": 3}).as_object().unwrap());
///
/// assert_eq!(state.get("a"), Some(&json!(3)));
/// assert_eq!(state.get("b"), Some(&json!(2)));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DeviceState {
    fields: Map<String, Value>,
}

impl DeviceState {
    /// Creates a new empty device state.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    // ========== Merging ==========

    /// Merges a report into the state in place.
    ///
    /// Every field of the update overwrites the stored value; fields not in
    /// the update are kept.
    pub fn merge(&mut self, update: &ReportUpdate) {
        self.merge_fields(update.fields());
    }

    /// Returns a new state with the report merged, leaving `self` untouched.
    #[must_use]
    pub fn merged(&self, update: &ReportUpdate) -> Self {
        let mut next = self.clone();
        next.merge(update);
        next
    }

    /// Merges raw fields into the state in place.
    pub fn merge_fields(&mut self, fields: &Map<String, Value>) {
        for (key, value) in fields {
            self.fields.insert(key.clone(), value.clone());
        }
    }

    /// Removes every field, including `Online`.
    pub fn clear(&mut self) {
        self.fields.clear();
    }

    // ========== Connectivity ==========

    /// Returns `true` if the station is marked online.
    ///
    /// A fresh state is not online until the first datagram arrives.
    #[must_use]
    pub fn is_online(&self) -> bool {
        self.get_bool(ONLINE_FIELD).unwrap_or(false)
    }

    /// Sets the `Online` field.
    pub fn set_online(&mut self, online: bool) {
        self.fields
            .insert(ONLINE_FIELD.to_string(), Value::Bool(online));
    }

    // ========== Field access ==========

    /// Gets a field by its wire name.
    #[must_use]
    pub fn get(&self, field: &str) -> Option<&Value> {
        self.fields.get(field)
    }

    /// Gets a numeric field.
    #[must_use]
    pub fn get_f64(&self, field: &str) -> Option<f64> {
        self.get(field).and_then(Value::as_f64)
    }

    /// Gets a text field.
    #[must_use]
    pub fn get_str(&self, field: &str) -> Option<&str> {
        self.get(field).and_then(Value::as_str)
    }

    /// Gets a boolean field.
    #[must_use]
    pub fn get_bool(&self, field: &str) -> Option<bool> {
        self.get(field).and_then(Value::as_bool)
    }

    /// Returns `true` if the field is known.
    #[must_use]
    pub fn contains(&self, field: &str) -> bool {
        self.fields.contains_key(field)
    }

    /// Returns the number of known fields.
    #[must_use]
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Returns `true` if nothing is known yet.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Iterates over all known fields.
    pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.fields.iter()
    }

    /// Returns the underlying field map.
    #[must_use]
    pub fn as_map(&self) -> &Map<String, Value> {
        &self.fields
    }

    // ========== Well-known fields ==========

    /// Station model from report 1 (e.g. `"KEBA P30"`).
    #[must_use]
    pub fn product(&self) -> Option<&str> {
        self.get_str(PRODUCT_FIELD)
    }

    /// Hardware current limit in amps from report 2.
    #[must_use]
    pub fn max_current(&self) -> Option<f64> {
        self.get_f64("Max curr")
    }

    /// Active power from report 3.
    #[must_use]
    pub fn power(&self) -> Option<f64> {
        self.get_f64("P")
    }

    /// Energy of the current charging session from report 3.
    #[must_use]
    pub fn session_energy(&self) -> Option<f64> {
        self.get_f64("E pres")
    }

    /// Total energy counter from report 3.
    #[must_use]
    pub fn total_energy(&self) -> Option<i64> {
        self.get("E total").and_then(Value::as_i64)
    }
}

impl From<Map<String, Value>> for DeviceState {
    fn from(fields: Map<String, Value>) -> Self {
        Self { fields }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::message::{MessageCategory, classify};
    use serde_json::json;

    fn fields(value: &Value) -> &Map<String, Value> {
        value.as_object().unwrap()
    }

    fn report(payload: &str) -> ReportUpdate {
        match classify(payload).unwrap() {
            MessageCategory::Report(update) => update,
            other => panic!("expected a report, got {other:?}"),
        }
    }

    #[test]
    fn new_state_is_empty_and_offline() {
        let state = DeviceState::new();
        assert!(state.is_empty());
        assert!(!state.is_online());
    }

    #[test]
    fn merge_is_union_with_overwrite() {
        let mut state = DeviceState::new();
        state.merge_fields(fields(&json!({"a": 1})));
        state.merge_fields(fields(&json!({"b": 2})));
        assert_eq!(state.as_map(), fields(&json!({"a": 1, "b": 2})));

        state.merge_fields(fields(&json!({"a": 3})));
        assert_eq!(state.as_map(), fields(&json!({"a": 3, "b": 2})));
    }

    #[test]
    fn merged_leaves_original_untouched() {
        let mut state = DeviceState::new();
        state.set_online(true);
        let update = report(r#"{"ID": "2", "Max curr": 32000}"#);

        let next = state.merged(&update);

        assert_eq!(state.len(), 1);
        assert_eq!(next.max_current(), Some(32.0));
        assert!(next.is_online());
        assert_eq!(next.get_str("ID"), Some("2"));
    }

    #[test]
    fn merge_keeps_fields_of_other_reports() {
        let mut state = DeviceState::new();
        state.merge(&report(r#"{"ID": "1", "Product": "KC-P20-ES240030-000"}"#));
        state.merge(&report(r#"{"ID": "3", "P": 3680000, "E total": 770000}"#));

        assert_eq!(state.product(), Some("KEBA P20"));
        assert_eq!(state.power(), Some(3.68));
        assert_eq!(state.total_energy(), Some(77));
        assert_eq!(state.get_str("ID"), Some("3"));
    }

    #[test]
    fn online_flag_round_trips() {
        let mut state = DeviceState::new();
        state.set_online(true);
        assert!(state.is_online());
        state.set_online(false);
        assert!(!state.is_online());
        assert_eq!(state.get(ONLINE_FIELD), Some(&json!(false)));
    }

    #[test]
    fn clear_removes_everything() {
        let mut state = DeviceState::from(fields(&json!({"a": 1, "Online": true})).clone());
        state.clear();
        assert!(state.is_empty());
    }

    #[test]
    fn serializes_as_flat_object() {
        let mut state = DeviceState::new();
        state.set_online(true);
        state.merge_fields(fields(&json!({"E pres": 1.5})));

        let json = serde_json::to_value(&state).unwrap();
        assert_eq!(json, json!({"Online": true, "E pres": 1.5}));
    }
}
