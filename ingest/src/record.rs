//! The persisted adjustment record and its wire form.
//!
//! Field names are abbreviated to single letters on the wire because the
//! document store saves field names with every entry:
//!
//! ```json
//! {"g":1,"b":42,"r":7,"a":1,"i":"guid-123","c":3,"m":9,"v":10.5,"t":1700000000}
//! ```

use serde::{Deserialize, Serialize};

/// Subject gender category, stored as an integer code.
#[derive(Clone, Copy, Debug, Deserialize, PartialEq, Eq, Serialize)]
#[serde(try_from = "i64", into = "i64")]
pub enum Gender {
    Unspecified = 0,
    Female = 1,
    Male = 2,
}

impl TryFrom<i64> for Gender {
    type Error = String;

    fn try_from(code: i64) -> Result<Self, Self::Error> {
        match code {
            0 => Ok(Gender::Unspecified),
            1 => Ok(Gender::Female),
            2 => Ok(Gender::Male),
            other => Err(format!("unknown gender code: {other}")),
        }
    }
}

impl From<Gender> for i64 {
    fn from(gender: Gender) -> i64 {
        gender as i64
    }
}

/// One size-adjustment event as reported by a client.
///
/// A record exists in memory for the duration of one request: decoded once,
/// handed unmodified to the store, and immutable after a successful insert.
/// Unknown wire fields are ignored on decode.
#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub struct AdjustmentRecord {
    /// Subject gender
    #[serde(rename = "g")]
    pub gender: Gender,
    /// Retailer/brand identifier
    #[serde(rename = "b")]
    pub brand: i64,
    /// Geographic region identifier
    #[serde(rename = "r")]
    pub region: i64,
    /// Size-step delta, e.g. +1, 0, -1
    #[serde(rename = "a")]
    pub adjustment: i64,
    /// Client-generated installation identifier (GUID)
    #[serde(rename = "i")]
    pub app_id: String,
    /// Measurement-conversion identifier
    #[serde(rename = "c")]
    pub conversion: i64,
    /// Measurement-kind identifier
    #[serde(rename = "m")]
    pub measurement: i64,
    /// Measurement value in default units
    #[serde(rename = "v")]
    pub value: f64,
    /// Client-reported event time, unix seconds
    #[serde(rename = "t")]
    pub time: i64,
}

impl AdjustmentRecord {
    /// Field-level validation seam.
    ///
    /// Identifier fields (brand, region, conversion, measurement) are
    /// accepted without range checks; only what the decode itself enforces
    /// is guaranteed. Stricter checks belong here, not in the pipeline.
    pub fn validate(&self) -> Result<(), crate::errors::Rejection> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const WIRE_JSON: &str =
        r#"{"g":1,"b":42,"r":7,"a":1,"i":"guid-123","c":3,"m":9,"v":10.5,"t":1700000000}"#;

    fn sample_record() -> AdjustmentRecord {
        AdjustmentRecord {
            gender: Gender::Female,
            brand: 42,
            region: 7,
            adjustment: 1,
            app_id: "guid-123".to_string(),
            conversion: 3,
            measurement: 9,
            value: 10.5,
            time: 1_700_000_000,
        }
    }

    #[test]
    fn test_decode_wire_json() {
        let record: AdjustmentRecord = serde_json::from_str(WIRE_JSON).unwrap();
        assert_eq!(record, sample_record());
    }

    #[test]
    fn test_round_trip() {
        let encoded = serde_json::to_string(&sample_record()).unwrap();
        let decoded: AdjustmentRecord = serde_json::from_str(&encoded).unwrap();
        assert_eq!(decoded, sample_record());
    }

    #[test]
    fn test_missing_field_fails_decode() {
        // Same payload with "t" removed
        let json = r#"{"g":1,"b":42,"r":7,"a":1,"i":"guid-123","c":3,"m":9,"v":10.5}"#;
        assert!(serde_json::from_str::<AdjustmentRecord>(json).is_err());
    }

    #[test]
    fn test_unknown_fields_ignored() {
        let json = r#"{"g":2,"b":1,"r":1,"a":-1,"i":"x","c":1,"m":1,"v":0.0,"t":0,"extra":true}"#;
        let record: AdjustmentRecord = serde_json::from_str(json).unwrap();
        assert_eq!(record.gender, Gender::Male);
        assert_eq!(record.adjustment, -1);
    }

    #[test]
    fn test_gender_codes() {
        assert_eq!(Gender::try_from(0).unwrap(), Gender::Unspecified);
        assert_eq!(Gender::try_from(1).unwrap(), Gender::Female);
        assert_eq!(Gender::try_from(2).unwrap(), Gender::Male);
        assert!(Gender::try_from(3).is_err());
        assert_eq!(i64::from(Gender::Male), 2);
    }

    #[test]
    fn test_negative_adjustment_round_trip() {
        let mut record = sample_record();
        record.adjustment = -1;
        let encoded = serde_json::to_string(&record).unwrap();
        let decoded: AdjustmentRecord = serde_json::from_str(&encoded).unwrap();
        assert_eq!(decoded.adjustment, -1);
    }
}
