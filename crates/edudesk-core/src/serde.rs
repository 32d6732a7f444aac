use serde::{Deserialize, Deserializer};
use uuid::Uuid;

/// Deserializes an optional UUID, treating an empty string as absent.
///
/// Query strings such as `?region_id=` arrive as empty strings rather than
/// missing keys.
pub fn deserialize_optional_uuid<'de, D>(deserializer: D) -> Result<Option<Uuid>, D::Error>
where
    D: Deserializer<'de>,
{
    let opt: Option<String> = Option::deserialize(deserializer)?;
    match opt {
        Some(s) if s.is_empty() => Ok(None),
        Some(s) => Uuid::parse_str(&s)
            .map(Some)
            .map_err(serde::de::Error::custom),
        None => Ok(None),
    }
}
