//! UTC timestamps at second precision, written with a trailing `Z`.

use chrono::{DateTime, NaiveDateTime, SubsecRound, Utc};

const FORMAT: &str = "%Y-%m-%dT%H:%M:%SZ";

/// Current time truncated to whole seconds.
pub fn utc_now() -> DateTime<Utc> {
    Utc::now().trunc_subsecs(0)
}

/// Format as `2025-11-18T13:58:26Z`.
pub fn to_iso(dt: DateTime<Utc>) -> String {
    dt.format(FORMAT).to_string()
}

/// Parse an ISO-8601 timestamp.
///
/// Accepts both `Z` and `+00:00` suffixes (and any other offset), as well as a
/// bare local-less form which is read as UTC. Returns `None` when unparseable.
pub fn parse_iso(value: &str) -> Option<DateTime<Utc>> {
    let cleaned = value.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(cleaned) {
        return Some(dt.with_timezone(&Utc).trunc_subsecs(0));
    }
    NaiveDateTime::parse_from_str(cleaned, "%Y-%m-%dT%H:%M:%S%.f")
        .ok()
        .map(|naive| naive.and_utc().trunc_subsecs(0))
}

/// Parse a timestamp, falling back to `now` on unparseable input.
pub fn parse_or(value: &str, now: DateTime<Utc>) -> DateTime<Utc> {
    parse_iso(value).unwrap_or(now)
}

/// Serde adapter for required timestamp fields.
pub mod iso {
    use chrono::{DateTime, Utc};
    use serde::{de, Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(dt: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&super::to_iso(*dt))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<DateTime<Utc>, D::Error> {
        let raw = String::deserialize(deserializer)?;
        super::parse_iso(&raw).ok_or_else(|| de::Error::custom(format!("invalid timestamp: {raw}")))
    }
}

/// Serde adapter for optional timestamp fields.
pub mod iso_opt {
    use chrono::{DateTime, Utc};
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(
        dt: &Option<DateTime<Utc>>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        match dt {
            Some(dt) => serializer.serialize_str(&super::to_iso(*dt)),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Option<DateTime<Utc>>, D::Error> {
        let raw = Option::<String>::deserialize(deserializer)?;
        Ok(raw.as_deref().and_then(super::parse_iso))
    }
}
