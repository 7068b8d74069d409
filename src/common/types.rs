use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

/// Label shown (and stored) when a fan leaves the display name blank.
pub const ANONYMOUS_FAN: &str = "anonymous fan";

/// A latitude/longitude pair in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub lat: f64,
    pub lng: f64,
}

impl Coordinates {
    pub const fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }
}

/// A note pinned on the board, as returned by the store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    #[serde(deserialize_with = "opaque_id")]
    pub id: String,
    pub lat: f64,
    pub lng: f64,
    pub message: String,
    #[serde(default)]
    pub display_name: Option<String>,
    #[serde(deserialize_with = "store_timestamp")]
    pub created_at: DateTime<Utc>,
}

impl Message {
    pub fn position(&self) -> Coordinates {
        Coordinates::new(self.lat, self.lng)
    }

    /// Name to show on the marker popup.
    pub fn author(&self) -> &str {
        match self.display_name.as_deref().map(str::trim) {
            Some(name) if !name.is_empty() => name,
            _ => ANONYMOUS_FAN,
        }
    }
}

/// Insert payload for a new message; `id` and `created_at` come from the store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MessageDraft {
    pub lat: f64,
    pub lng: f64,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
}

impl MessageDraft {
    pub fn position(&self) -> Coordinates {
        Coordinates::new(self.lat, self.lng)
    }
}

// Row ids may be uuid strings or bigint numbers depending on the table.
fn opaque_id<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    match serde_json::Value::deserialize(deserializer)? {
        serde_json::Value::String(id) => Ok(id),
        serde_json::Value::Number(id) => Ok(id.to_string()),
        other => Err(serde::de::Error::custom(format!(
            "unsupported message id: {other}"
        ))),
    }
}

// `timestamp` columns come back without an offset; those are read as UTC.
fn store_timestamp<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    if let Ok(at) = DateTime::parse_from_rfc3339(&raw) {
        return Ok(at.with_timezone(&Utc));
    }
    ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"]
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(&raw, format).ok())
        .map(|at| at.and_utc())
        .ok_or_else(|| serde::de::Error::custom(format!("unsupported created_at: {raw}")))
}
