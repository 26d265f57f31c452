/// Serde helpers that write `SystemTime` as RFC 3339 strings.
///
/// Used with `#[serde(with = "...")]` so exported reports carry readable
/// timestamps instead of the default `{secs_since_epoch, nanos_since_epoch}`
/// struct.
use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::time::SystemTime;

pub fn serialize<S: Serializer>(time: &SystemTime, serializer: S) -> Result<S::Ok, S::Error> {
    DateTime::<Utc>::from(*time).serialize(serializer)
}

pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<SystemTime, D::Error> {
    DateTime::<Utc>::deserialize(deserializer).map(SystemTime::from)
}

/// Same as the parent module, for `Option<SystemTime>` fields.
pub mod option {
    use super::*;

    pub fn serialize<S: Serializer>(
        time: &Option<SystemTime>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        time.map(DateTime::<Utc>::from).serialize(serializer)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Option<SystemTime>, D::Error> {
        Option::<DateTime<Utc>>::deserialize(deserializer).map(|t| t.map(SystemTime::from))
    }
}
