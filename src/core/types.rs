use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Typed errors for the types subsystem
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TypesError {
    #[error("Invalid UID '{0}': expected 5 to 12 digits")]
    InvalidUid(String),
    #[error("Invalid time window: start {start} is after end {end}")]
    InvalidWindow {
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    },
}

impl From<TypesError> for crate::core::errors::ExchangeError {
    fn from(e: TypesError) -> Self {
        Self::InvalidParameters(e.to_string())
    }
}

/// Exchange-assigned user identifier: 5 to 12 ASCII digits.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct Uid(String);

impl Uid {
    pub const MIN_LEN: usize = 5;
    pub const MAX_LEN: usize = 12;

    /// Validate raw user input. Surrounding whitespace is not trimmed.
    pub fn parse(raw: &str) -> Result<Self, TypesError> {
        let valid = (Self::MIN_LEN..=Self::MAX_LEN).contains(&raw.len())
            && raw.bytes().all(|b| b.is_ascii_digit());

        if valid {
            Ok(Self(raw.to_string()))
        } else {
            Err(TypesError::InvalidUid(raw.to_string()))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl FromStr for Uid {
    type Err = TypesError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for Uid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Supported partner exchanges
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Exchange {
    Bitget,
    Bitunix,
}

impl Exchange {
    /// Lowercase identifier used in logs and tracing fields
    pub const fn id(self) -> &'static str {
        match self {
            Self::Bitget => "bitget",
            Self::Bitunix => "bitunix",
        }
    }
}

impl fmt::Display for Exchange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bitget => write!(f, "Bitget"),
            Self::Bitunix => write!(f, "Bitunix"),
        }
    }
}

/// Normalized answer of an exchange's referral check.
///
/// A negative answer is a value, not an error: transport and authentication
/// failures travel as `ExchangeError` instead.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum VerificationResult {
    Verified {
        uid: Uid,
        register_time: Option<DateTime<Utc>>,
    },
    NotVerified {
        uid: Uid,
        reason: String,
    },
}

impl VerificationResult {
    pub fn verified(uid: Uid, register_time: Option<DateTime<Utc>>) -> Self {
        Self::Verified { uid, register_time }
    }

    pub fn not_verified(uid: Uid, reason: impl Into<String>) -> Self {
        Self::NotVerified {
            uid,
            reason: reason.into(),
        }
    }

    pub const fn is_verified(&self) -> bool {
        matches!(self, Self::Verified { .. })
    }

    pub const fn uid(&self) -> &Uid {
        match self {
            Self::Verified { uid, .. } | Self::NotVerified { uid, .. } => uid,
        }
    }

    pub const fn register_time(&self) -> Option<DateTime<Utc>> {
        match self {
            Self::Verified { register_time, .. } => *register_time,
            Self::NotVerified { .. } => None,
        }
    }
}

/// Trade volume sums per window
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VolumeSummary {
    pub total_volume: Decimal,
    pub last_month_volume: Decimal,
    pub current_month_volume: Decimal,
}

/// Half-open time range `[start, end)` sent to an exchange's volume query.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeWindow {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl TimeWindow {
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> Result<Self, TypesError> {
        if start > end {
            return Err(TypesError::InvalidWindow { start, end });
        }
        Ok(Self { start, end })
    }

    pub fn overlaps(&self, other: &Self) -> bool {
        self.start < other.end && other.start < self.end
    }

    pub fn encloses(&self, other: &Self) -> bool {
        self.start <= other.start && other.end <= self.end
    }
}

/// Conversion helpers for loosely typed exchange payloads
pub mod conversion {
    use super::*;
    use chrono::{NaiveDateTime, TimeZone};
    use serde::Deserializer;
    use serde_json::Value;

    /// Epoch values below this are taken as seconds rather than millis.
    const SECONDS_EPOCH_CUTOFF: u64 = 100_000_000_000;

    /// Parse a volume field, treating missing or non-numeric values as zero
    #[inline]
    pub fn value_to_volume(value: Option<&Value>) -> Decimal {
        match value {
            Some(Value::String(s)) => string_to_decimal(s),
            Some(Value::Number(n)) => string_to_decimal(&n.to_string()),
            _ => Decimal::ZERO,
        }
    }

    /// Sum volumes, `None` if the total leaves the `Decimal` range
    pub fn checked_volume_sum<I>(volumes: I) -> Option<Decimal>
    where
        I: IntoIterator<Item = Decimal>,
    {
        volumes
            .into_iter()
            .try_fold(Decimal::ZERO, |acc, volume| acc.checked_add(volume))
    }

    /// Convert string to Decimal with fallback
    #[inline]
    pub fn string_to_decimal(s: &str) -> Decimal {
        let trimmed = s.trim();
        trimmed
            .parse::<Decimal>()
            .or_else(|_| Decimal::from_scientific(trimmed))
            .unwrap_or(Decimal::ZERO)
    }

    /// Epoch seconds or millis to UTC
    pub fn epoch_to_datetime(epoch: i64) -> Option<DateTime<Utc>> {
        if epoch.unsigned_abs() < SECONDS_EPOCH_CUTOFF {
            Utc.timestamp_opt(epoch, 0).single()
        } else {
            Utc.timestamp_millis_opt(epoch).single()
        }
    }

    /// Parse a registration time given as epoch (number or digit string),
    /// RFC 3339, or `YYYY-MM-DD HH:MM:SS` in UTC.
    pub fn value_to_datetime(value: &Value) -> Option<DateTime<Utc>> {
        match value {
            Value::Number(n) => n.as_i64().and_then(epoch_to_datetime),
            Value::String(s) => string_to_datetime(s),
            _ => None,
        }
    }

    pub fn string_to_datetime(s: &str) -> Option<DateTime<Utc>> {
        let s = s.trim();
        if s.is_empty() {
            return None;
        }
        if let Ok(epoch) = s.parse::<i64>() {
            return epoch_to_datetime(epoch);
        }
        if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
            return Some(dt.with_timezone(&Utc));
        }
        NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S")
            .ok()
            .map(|naive| naive.and_utc())
    }

    /// Deserialize a JSON string or integer into a `String`
    pub fn de_string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
    where
        D: Deserializer<'de>,
    {
        match Value::deserialize(deserializer)? {
            Value::String(s) => Ok(s),
            Value::Number(n) => Ok(n.to_string()),
            other => Err(serde::de::Error::custom(format!(
                "expected string or number, got {}",
                other
            ))),
        }
    }
}
