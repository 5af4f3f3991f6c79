//! Conversion history records

use chrono::{DateTime, Local, NaiveDateTime, TimeZone};
use serde::{Deserialize, Deserializer, Serialize, de};

/// A single completed conversion. Records are never edited after creation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConversionRecord {
    #[serde(deserialize_with = "deserialize_timestamp")]
    pub timestamp: DateTime<Local>,
    pub from_currency: String,
    pub to_currency: String,
    pub amount: f64,
    pub result: f64,
    #[serde(default)]
    pub rate: Option<f64>,
    #[serde(rename = "demo", default)]
    pub is_demo: bool,
}

impl ConversionRecord {
    /// Creates a record stamped with the current local time.
    pub fn new(
        from_currency: &str,
        to_currency: &str,
        amount: f64,
        result: f64,
        rate: Option<f64>,
        is_demo: bool,
    ) -> Self {
        Self {
            timestamp: Local::now(),
            from_currency: from_currency.to_string(),
            to_currency: to_currency.to_string(),
            amount,
            result,
            rate,
            is_demo,
        }
    }
}

/// Accepts RFC 3339 timestamps and offset-less ISO 8601 ones, the latter read
/// as local time.
fn deserialize_timestamp<'de, D>(deserializer: D) -> Result<DateTime<Local>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    if let Ok(dt) = DateTime::parse_from_rfc3339(&raw) {
        return Ok(dt.with_timezone(&Local));
    }

    let naive = NaiveDateTime::parse_from_str(&raw, "%Y-%m-%dT%H:%M:%S%.f")
        .map_err(|e| de::Error::custom(format!("invalid timestamp '{raw}': {e}")))?;
    Local
        .from_local_datetime(&naive)
        .earliest()
        .ok_or_else(|| de::Error::custom(format!("nonexistent local time '{raw}'")))
}
