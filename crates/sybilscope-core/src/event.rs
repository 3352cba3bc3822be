//! Interaction event data model.
//!
//! Events are the engine's only input. Each record names an actor, a target,
//! an action, a platform, and an instant, plus optional profile and
//! transaction attributes. Deserialization is deliberately lenient: the
//! ingestion side exchanges records in whatever self-describing serialization
//! it has, so booleans, counts, amounts, links, and timestamps all coerce
//! from their common string spellings. A timestamp that fails to parse marks
//! the event time-invalid rather than rejecting it; temporal detectors skip
//! such events while structural detectors keep them.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

// ============================================================================
// Event
// ============================================================================

/// A single social or on-chain interaction record.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Event {
    /// Instant of the interaction (UTC). `None` marks the event time-invalid.
    #[serde(deserialize_with = "de_instant")]
    pub timestamp: Option<DateTime<Utc>>,
    /// Short platform identifier (e.g. `farcaster`, `base`).
    pub platform: String,
    /// Short action identifier (e.g. `follow`, `tap`, `transfer`).
    pub action: String,
    /// Opaque identifier of the acting account.
    pub actor: String,
    /// Opaque identifier of the acted-upon entity.
    pub target: String,
    /// Actor bio text, if the record carries profile data.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bio: Option<String>,
    /// Profile links; accepts a JSON array or a whitespace/comma string.
    #[serde(deserialize_with = "de_links", skip_serializing_if = "Vec::is_empty")]
    pub links: Vec<String>,
    /// Actor follower count at observation time.
    #[serde(deserialize_with = "de_count", skip_serializing_if = "Option::is_none")]
    pub follower_count: Option<u64>,
    /// Actor following count at observation time.
    #[serde(deserialize_with = "de_count", skip_serializing_if = "Option::is_none")]
    pub following_count: Option<u64>,
    /// When the acting account was created.
    #[serde(deserialize_with = "de_instant", skip_serializing_if = "Option::is_none")]
    pub actor_created_at: Option<DateTime<Utc>>,
    /// Platform verification flag; coerces from `"true"|"1"|"yes"` spellings.
    #[serde(deserialize_with = "de_bool", skip_serializing_if = "Option::is_none")]
    pub verified: Option<bool>,
    /// Free-form location string.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    /// Transaction amount, for value-bearing actions.
    #[serde(deserialize_with = "de_amount", skip_serializing_if = "Option::is_none")]
    pub amount: Option<f64>,
    /// Transaction hash, for on-chain actions.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tx_hash: Option<String>,
    /// Block number, for on-chain actions.
    #[serde(deserialize_with = "de_count", skip_serializing_if = "Option::is_none")]
    pub block_number: Option<u64>,
    /// Opaque payload carried through untouched.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub meta: Option<Value>,
    /// Target kind hint from the ingestor (e.g. `account`, `cast`, `app`).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target_type: Option<String>,
}

impl Event {
    /// Create a minimal timed event.
    #[must_use]
    pub fn new(
        timestamp: DateTime<Utc>,
        platform: impl Into<String>,
        action: impl Into<String>,
        actor: impl Into<String>,
        target: impl Into<String>,
    ) -> Self {
        Self {
            timestamp: Some(timestamp),
            platform: platform.into(),
            action: action.into(),
            actor: actor.into(),
            target: target.into(),
            ..Self::default()
        }
    }

    /// Create an event with an unparseable (invalid) timestamp.
    #[must_use]
    pub fn untimed(
        platform: impl Into<String>,
        action: impl Into<String>,
        actor: impl Into<String>,
        target: impl Into<String>,
    ) -> Self {
        Self {
            timestamp: None,
            platform: platform.into(),
            action: action.into(),
            actor: actor.into(),
            target: target.into(),
            ..Self::default()
        }
    }

    /// Set the actor bio.
    #[must_use]
    pub fn with_bio(mut self, bio: impl Into<String>) -> Self {
        self.bio = Some(bio.into());
        self
    }

    /// Set the explicit profile links.
    #[must_use]
    pub fn with_links(mut self, links: Vec<String>) -> Self {
        self.links = links;
        self
    }

    /// Set follower/following counts.
    #[must_use]
    pub fn with_counts(mut self, followers: u64, following: u64) -> Self {
        self.follower_count = Some(followers);
        self.following_count = Some(following);
        self
    }

    /// Set the account creation instant.
    #[must_use]
    pub fn with_created_at(mut self, created_at: DateTime<Utc>) -> Self {
        self.actor_created_at = Some(created_at);
        self
    }

    /// Set the transaction amount.
    #[must_use]
    pub fn with_amount(mut self, amount: f64) -> Self {
        self.amount = Some(amount);
        self
    }

    /// Set the transaction hash.
    #[must_use]
    pub fn with_tx_hash(mut self, tx_hash: impl Into<String>) -> Self {
        self.tx_hash = Some(tx_hash.into());
        self
    }

    /// Set the target-type hint.
    #[must_use]
    pub fn with_target_type(mut self, target_type: impl Into<String>) -> Self {
        self.target_type = Some(target_type.into());
        self
    }

    /// Whether the event carries a parseable timestamp.
    #[must_use]
    pub fn is_time_valid(&self) -> bool {
        self.timestamp.is_some()
    }

    /// Timestamp in epoch milliseconds, if time-valid.
    #[must_use]
    pub fn ts_millis(&self) -> Option<i64> {
        self.timestamp.map(|t| t.timestamp_millis())
    }

    /// Whether the record carries any profile attribute worth folding.
    #[must_use]
    pub fn has_profile_fields(&self) -> bool {
        self.bio.is_some()
            || !self.links.is_empty()
            || self.follower_count.is_some()
            || self.following_count.is_some()
            || self.actor_created_at.is_some()
            || self.verified.is_some()
            || self.location.is_some()
    }
}

// ============================================================================
// Lenient parsing
// ============================================================================

/// Parse an ISO-8601-ish instant in UTC.
///
/// Accepts RFC 3339, `T`- or space-separated naive datetimes (taken as UTC),
/// and bare dates. Returns `None` for anything else; callers treat that as
/// time-invalid rather than an error.
#[must_use]
pub fn parse_instant(raw: &str) -> Option<DateTime<Utc>> {
    let s = raw.trim();
    if s.is_empty() {
        return None;
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc));
    }
    for fmt in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(s, fmt) {
            return Some(naive.and_utc());
        }
    }
    if let Ok(date) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
        return Some(date.and_hms_opt(0, 0, 0)?.and_utc());
    }
    None
}

/// Parse an epoch number as an instant, treating magnitudes >= 1e12 as
/// milliseconds and anything smaller as seconds.
fn epoch_to_instant(n: i64) -> Option<DateTime<Utc>> {
    if n.abs() >= 1_000_000_000_000 {
        DateTime::from_timestamp_millis(n)
    } else {
        DateTime::from_timestamp(n, 0)
    }
}

/// Coerce a wire value to a boolean per the ingestion contract:
/// `"true" | "1" | "yes"` are true, `"false" | "0" | "no"` are false,
/// anything else is absent.
#[must_use]
pub fn coerce_bool(value: &Value) -> Option<bool> {
    match value {
        Value::Bool(b) => Some(*b),
        Value::Number(n) => match n.as_i64() {
            Some(1) => Some(true),
            Some(0) => Some(false),
            _ => None,
        },
        Value::String(s) => match s.trim().to_ascii_lowercase().as_str() {
            "true" | "1" | "yes" => Some(true),
            "false" | "0" | "no" => Some(false),
            _ => None,
        },
        _ => None,
    }
}

fn de_instant<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.and_then(|v| match v {
        Value::String(s) => parse_instant(&s),
        Value::Number(n) => n
            .as_i64()
            .or_else(|| n.as_f64().map(|f| f as i64))
            .and_then(epoch_to_instant),
        _ => None,
    }))
}

fn de_bool<'de, D>(deserializer: D) -> Result<Option<bool>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.as_ref().and_then(coerce_bool))
}

fn de_count<'de, D>(deserializer: D) -> Result<Option<u64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.and_then(|v| match v {
        Value::Number(n) => n.as_u64().or_else(|| n.as_f64().map(|f| f.max(0.0) as u64)),
        Value::String(s) => s.trim().parse::<u64>().ok(),
        _ => None,
    }))
}

fn de_amount<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.and_then(|v| match v {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }))
}

fn de_links<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.map(coerce_links).unwrap_or_default())
}

/// Coerce a wire value into a link list: a JSON array of strings, a string
/// holding JSON-array text, or a whitespace/comma-separated string.
#[must_use]
pub fn coerce_links(value: Value) -> Vec<String> {
    match value {
        Value::Array(items) => items
            .into_iter()
            .filter_map(|v| match v {
                Value::String(s) => Some(s),
                _ => None,
            })
            .collect(),
        Value::String(s) => {
            let trimmed = s.trim();
            if trimmed.starts_with('[') {
                if let Ok(parsed) = serde_json::from_str::<Vec<String>>(trimmed) {
                    return parsed;
                }
            }
            trimmed
                .split(|c: char| c.is_whitespace() || c == ',')
                .filter(|part| !part.is_empty())
                .map(str::to_string)
                .collect()
        }
        _ => Vec::new(),
    }
}
