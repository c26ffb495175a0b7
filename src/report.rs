// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Decoding of structured KEBA reports.
//!
//! The station answers `report 1`, `report 2` and `report 3` commands (and
//! periodically broadcasts) flat JSON objects tagged with an `ID` field:
//!
//! - `"1"` - device identity (product string, serial, firmware)
//! - `"2"` - limits and configuration (currents in mA, energy limit)
//! - `"3"` - live metering (phase currents, power, energy counters)
//!
//! Field names are kept verbatim, including their spaces (`"Max curr"`,
//! `"E pres"`). Only the fields listed per report are normalized, everything
//! else passes through as received.
//!
//! # Examples
//!
//! ```
//! use kecontact::report::{ReportId, decode_report};
//! use serde_json::json;
//!
//! let object = json!({"ID": "3", "I1": 16000, "E total": 123456});
//! let update = decode_report(object.as_object().unwrap().clone()).unwrap();
//!
//! assert_eq!(update.id(), &ReportId::Metering);
//! assert_eq!(update.get("I1"), Some(&json!(16.0)));
//! assert_eq!(update.get("E total"), Some(&json!(12)));
//! ```

use std::fmt;

use serde_json::{Map, Value};

use crate::error::ParseError;
use crate::units::Scale;

/// Name of the discriminator field carried by every report.
pub const ID_FIELD: &str = "ID";

/// Name of the free-text product field of report 1.
pub const PRODUCT_FIELD: &str = "Product";

/// Fields normalized in report 2.
const LIMITS_FIELDS: &[(&str, Scale)] = &[
    ("Max curr", Scale::MILLI),
    ("Curr HW", Scale::MILLI),
    ("Curr user", Scale::MILLI),
    ("Curr FS", Scale::MILLI),
    ("Curr timer", Scale::MILLI),
    ("Setenergy", Scale::TEN_THOUSANDTH_ROUNDED),
];

/// Fields normalized in report 3.
const METERING_FIELDS: &[(&str, Scale)] = &[
    ("I1", Scale::MILLI),
    ("I2", Scale::MILLI),
    ("I3", Scale::MILLI),
    ("P", Scale::MILLIONTH_ROUNDED),
    ("PF", Scale::MILLI),
    ("E pres", Scale::TEN_THOUSANDTH_ROUNDED),
    ("E total", Scale::TEN_THOUSANDTH_TRUNCATED),
];

/// Report type, decided once from the `ID` field.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ReportId {
    /// Report 1: device identity.
    Identity,
    /// Report 2: current limits and energy setpoint.
    Limits,
    /// Report 3: live metering.
    Metering,
    /// Any other ID, forwarded without normalization.
    Other(String),
}

impl ReportId {
    /// Returns the wire representation of the ID.
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Identity => "1",
            Self::Limits => "2",
            Self::Metering => "3",
            Self::Other(id) => id,
        }
    }

    /// Returns the fields this report normalizes and how.
    #[must_use]
    pub fn scaled_fields(&self) -> &'static [(&'static str, Scale)] {
        match self {
            Self::Limits => LIMITS_FIELDS,
            Self::Metering => METERING_FIELDS,
            Self::Identity | Self::Other(_) => &[],
        }
    }

    fn from_value(value: &Value) -> Self {
        match value {
            Value::String(id) => Self::from(id.as_str()),
            // A non-string ID never matches a known report
            other => Self::Other(other.to_string()),
        }
    }
}

impl From<&str> for ReportId {
    fn from(id: &str) -> Self {
        match id {
            "1" => Self::Identity,
            "2" => Self::Limits,
            "3" => Self::Metering,
            other => Self::Other(other.to_string()),
        }
    }
}

impl fmt::Display for ReportId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Station model recognized from the report 1 product string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProductModel {
    /// KEBA KeContact P30.
    KebaP30,
    /// KEBA KeContact P20.
    KebaP20,
    /// BMW-branded wallbox.
    BmwWallbox,
}

impl ProductModel {
    /// Recognizes the model from a raw product string.
    ///
    /// Matching is by substring in the order `P30`, `P20`, `BMW`; the first
    /// hit wins.
    ///
    /// # Examples
    ///
    /// ```
    /// use kecontact::report::ProductModel;
    ///
    /// assert_eq!(
    ///     ProductModel::from_product_string("KC-P30-EC240422-E00"),
    ///     Some(ProductModel::KebaP30)
    /// );
    /// assert_eq!(ProductModel::from_product_string("unknown"), None);
    /// ```
    #[must_use]
    pub fn from_product_string(product: &str) -> Option<Self> {
        if product.contains("P30") {
            Some(Self::KebaP30)
        } else if product.contains("P20") {
            Some(Self::KebaP20)
        } else if product.contains("BMW") {
            Some(Self::BmwWallbox)
        } else {
            None
        }
    }

    /// Returns the display name stored in the device state.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::KebaP30 => "KEBA P30",
            Self::KebaP20 => "KEBA P20",
            Self::BmwWallbox => "BMW Wallbox",
        }
    }
}

impl fmt::Display for ProductModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Normalized fields of one decoded report.
///
/// Produced per datagram, merged into the device state and then dropped.
#[derive(Debug, Clone, PartialEq)]
pub struct ReportUpdate {
    id: ReportId,
    fields: Map<String, Value>,
    missing_fields: Vec<String>,
}

impl ReportUpdate {
    /// Returns the report type.
    #[must_use]
    pub fn id(&self) -> &ReportId {
        &self.id
    }

    /// Returns a field of the update.
    #[must_use]
    pub fn get(&self, field: &str) -> Option<&Value> {
        self.fields.get(field)
    }

    /// Returns all fields of the update, `ID` included.
    #[must_use]
    pub fn fields(&self) -> &Map<String, Value> {
        &self.fields
    }

    /// Returns the expected fields that were absent or not usable.
    ///
    /// These fields were left untouched; the rest of the report still
    /// applies.
    #[must_use]
    pub fn missing_fields(&self) -> &[String] {
        &self.missing_fields
    }

    /// Returns `true` if every expected field was present and normalized.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.missing_fields.is_empty()
    }

    /// Fails if any expected field was absent or not usable.
    ///
    /// # Errors
    ///
    /// Returns `ParseError::MissingField` naming every affected field.
    pub fn check_complete(&self) -> Result<(), ParseError> {
        if self.is_complete() {
            Ok(())
        } else {
            Err(ParseError::MissingField(self.missing_fields.join(", ")))
        }
    }

    /// Consumes the update, returning its fields.
    #[must_use]
    pub fn into_fields(self) -> Map<String, Value> {
        self.fields
    }
}

/// Decodes a parsed report object.
///
/// Returns `None` if the object has no `ID` field. Missing or non-numeric
/// expected fields never fail the decode; they are recorded in
/// [`ReportUpdate::missing_fields`] and left as received.
#[must_use]
pub fn decode_report(mut fields: Map<String, Value>) -> Option<ReportUpdate> {
    let id = ReportId::from_value(fields.get(ID_FIELD)?);
    let mut missing_fields = Vec::new();

    if id == ReportId::Identity {
        relabel_product(&mut fields, &mut missing_fields);
    }

    for &(name, scale) in id.scaled_fields() {
        match fields.get(name).map(Value::as_f64) {
            Some(Some(raw)) => {
                fields.insert(name.to_string(), scale.apply(raw));
            }
            _ => missing_fields.push(name.to_string()),
        }
    }

    if !missing_fields.is_empty() {
        tracing::warn!(
            id = %id,
            missing = ?missing_fields,
            "Could not extract all report data for KEBA charging station"
        );
    }

    Some(ReportUpdate {
        id,
        fields,
        missing_fields,
    })
}

fn relabel_product(fields: &mut Map<String, Value>, missing_fields: &mut Vec<String>) {
    let Some(Value::String(product)) = fields.get(PRODUCT_FIELD) else {
        missing_fields.push(PRODUCT_FIELD.to_string());
        return;
    };

    if let Some(model) = ProductModel::from_product_string(product) {
        fields.insert(PRODUCT_FIELD.to_string(), Value::from(model.as_str()));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn decode(value: Value) -> ReportUpdate {
        let Value::Object(map) = value else {
            panic!("test payload must be an object");
        };
        decode_report(map).unwrap()
    }

    #[test]
    fn report_id_from_str() {
        assert_eq!(ReportId::from("1"), ReportId::Identity);
        assert_eq!(ReportId::from("2"), ReportId::Limits);
        assert_eq!(ReportId::from("3"), ReportId::Metering);
        assert_eq!(ReportId::from("100"), ReportId::Other("100".to_string()));
    }

    #[test]
    fn report_id_display_round_trips() {
        assert_eq!(ReportId::Limits.to_string(), "2");
        assert_eq!(ReportId::Other("101".to_string()).to_string(), "101");
    }

    #[test]
    fn product_precedence() {
        assert_eq!(
            ProductModel::from_product_string("P20 P30 BMW"),
            Some(ProductModel::KebaP30)
        );
        assert_eq!(
            ProductModel::from_product_string("BMW-P20"),
            Some(ProductModel::KebaP20)
        );
        assert_eq!(
            ProductModel::from_product_string("BMW-10-EC2405B2-E1R"),
            Some(ProductModel::BmwWallbox)
        );
        assert_eq!(ProductModel::from_product_string("p30 lowercase"), None);
    }

    #[test]
    fn identity_report_relabels_product() {
        let update = decode(json!({
            "ID": "1",
            "Product": "KC-P30-EC240422-E00",
            "Serial": "16314582",
            "Firmware": "P30 v 3.10.16"
        }));

        assert_eq!(update.id(), &ReportId::Identity);
        assert_eq!(update.get("Product"), Some(&json!("KEBA P30")));
        assert_eq!(update.get("Serial"), Some(&json!("16314582")));
        assert_eq!(update.get("Firmware"), Some(&json!("P30 v 3.10.16")));
        assert!(update.is_complete());
    }

    #[test]
    fn identity_report_keeps_unknown_product() {
        let update = decode(json!({"ID": "1", "Product": "Some other box"}));

        assert_eq!(update.get("Product"), Some(&json!("Some other box")));
        assert!(update.is_complete());
    }

    #[test]
    fn identity_report_without_product() {
        let update = decode(json!({"ID": "1", "Serial": "123"}));

        assert_eq!(update.get("Serial"), Some(&json!("123")));
        assert!(update.get("Product").is_none());
        assert_eq!(update.missing_fields(), ["Product"]);
    }

    #[test]
    fn limits_report_normalizes_all_fields() {
        let update = decode(json!({
            "ID": "2",
            "State": 3,
            "Max curr": 32000,
            "Curr HW": 20000,
            "Curr user": 16000,
            "Curr FS": 0,
            "Curr timer": 6000,
            "Setenergy": 100_000,
            "Enable sys": 1
        }));

        assert_eq!(update.id(), &ReportId::Limits);
        assert_eq!(update.get("Max curr"), Some(&json!(32.0)));
        assert_eq!(update.get("Curr HW"), Some(&json!(20.0)));
        assert_eq!(update.get("Curr user"), Some(&json!(16.0)));
        assert_eq!(update.get("Curr FS"), Some(&json!(0.0)));
        assert_eq!(update.get("Curr timer"), Some(&json!(6.0)));
        assert_eq!(update.get("Setenergy"), Some(&json!(10.0)));
        assert_eq!(update.get("State"), Some(&json!(3)));
        assert_eq!(update.get("Enable sys"), Some(&json!(1)));
        assert_eq!(update.get("ID"), Some(&json!("2")));
        assert!(update.is_complete());
    }

    #[test]
    fn limits_report_missing_setenergy() {
        let update = decode(json!({
            "ID": "2",
            "Max curr": 32000,
            "Curr HW": 20000,
            "Curr user": 16000,
            "Curr FS": 10000
        }));

        assert_eq!(update.get("Max curr"), Some(&json!(32.0)));
        assert_eq!(update.get("Curr HW"), Some(&json!(20.0)));
        assert_eq!(update.get("Curr user"), Some(&json!(16.0)));
        assert_eq!(update.get("Curr FS"), Some(&json!(10.0)));
        assert!(update.get("Setenergy").is_none());
        assert_eq!(update.missing_fields(), ["Curr timer", "Setenergy"]);

        let err = update.check_complete().unwrap_err();
        assert_eq!(err.to_string(), "missing field in report: Curr timer, Setenergy");
    }

    #[test]
    fn metering_report_normalizes_all_fields() {
        let update = decode(json!({
            "ID": "3",
            "U1": 230,
            "I1": 16000,
            "I2": 15500,
            "I3": 0,
            "P": 11_040_000,
            "PF": 998,
            "E pres": 123_456,
            "E total": 123_456
        }));

        assert_eq!(update.get("I1"), Some(&json!(16.0)));
        assert_eq!(update.get("I2"), Some(&json!(15.5)));
        assert_eq!(update.get("I3"), Some(&json!(0.0)));
        assert_eq!(update.get("P"), Some(&json!(11.04)));
        assert_eq!(update.get("PF"), Some(&json!(0.998)));
        assert_eq!(update.get("E pres"), Some(&json!(12.35)));
        assert_eq!(update.get("E total"), Some(&json!(12)));
        assert_eq!(update.get("U1"), Some(&json!(230)));
        assert!(update.is_complete());
    }

    #[test]
    fn rounding_near_half_hundredths() {
        let update = decode(json!({"ID": "3", "E pres": 50, "P": 15000}));
        assert_eq!(update.get("E pres"), Some(&json!(0.01)));
        assert_eq!(update.get("P"), Some(&json!(0.01)));

        let update = decode(json!({"ID": "2", "Setenergy": 26750}));
        assert_eq!(update.get("Setenergy"), Some(&json!(2.67)));
    }

    #[test]
    fn non_numeric_field_is_left_verbatim() {
        let update = decode(json!({"ID": "3", "I1": "n/a", "I2": 1000}));

        assert_eq!(update.get("I1"), Some(&json!("n/a")));
        assert_eq!(update.get("I2"), Some(&json!(1.0)));
        assert!(update.missing_fields().contains(&"I1".to_string()));
    }

    #[test]
    fn unknown_report_passes_through() {
        let update = decode(json!({"ID": "100", "Curr HW": 32000, "E start": 5}));

        assert_eq!(update.id(), &ReportId::Other("100".to_string()));
        assert_eq!(update.get("Curr HW"), Some(&json!(32000)));
        assert_eq!(update.get("E start"), Some(&json!(5)));
        assert!(update.is_complete());
    }

    #[test]
    fn numeric_id_is_not_a_known_report() {
        let update = decode(json!({"ID": 2, "Max curr": 32000}));

        assert_eq!(update.id(), &ReportId::Other("2".to_string()));
        assert_eq!(update.get("Max curr"), Some(&json!(32000)));
    }

    #[test]
    fn object_without_id_is_not_a_report() {
        let map = json!({"Product": "KC-P30"}).as_object().cloned().unwrap();
        assert!(decode_report(map).is_none());
    }
}
