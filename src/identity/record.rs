//! Identity record and its wire representations.
//!
//! DESIGN
//! ======
//! User ids arrive as JSON integers from some endpoints and as numeric
//! strings from durable storage. Both are normalized to [`UserId`] at the
//! boundary so "is this mine?" checks always compare numbers.

#[cfg(test)]
#[path = "record_test.rs"]
mod record_test;

use std::fmt;
use std::str::FromStr;

use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

// =============================================================================
// USER ID
// =============================================================================

/// Canonical numeric user identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct UserId(pub i64);

impl UserId {
    #[must_use]
    pub fn get(self) -> i64 {
        self.0
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for UserId {
    type Err = String;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        raw.trim().parse::<i64>().map(Self).map_err(|_| format!("invalid user id: {raw:?}"))
    }
}

impl From<i64> for UserId {
    fn from(value: i64) -> Self {
        Self(value)
    }
}

impl Serialize for UserId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_i64(self.0)
    }
}

impl<'de> Deserialize<'de> for UserId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = serde_json::Value::deserialize(deserializer)?;
        match value {
            serde_json::Value::Number(number) => {
                if let Some(int) = number.as_i64() {
                    return Ok(Self(int));
                }
                #[allow(clippy::cast_precision_loss, clippy::cast_possible_truncation)]
                if let Some(float) = number.as_f64()
                    && float.is_finite()
                    && float.fract() == 0.0
                    && float >= i64::MIN as f64
                    && float < i64::MAX as f64
                {
                    return Ok(Self(float as i64));
                }
                Err(D::Error::custom("expected integer-compatible user id"))
            }
            serde_json::Value::String(raw) => raw.parse().map_err(D::Error::custom),
            _ => Err(D::Error::custom("expected number or numeric string for user id")),
        }
    }
}

// =============================================================================
// ROLE
// =============================================================================

/// Server-assigned role. No other values are valid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Role {
    #[serde(rename = "ROLE_USER")]
    User,
    #[serde(rename = "ROLE_ADMIN")]
    Admin,
}

impl Role {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::User => "ROLE_USER",
            Self::Admin => "ROLE_ADMIN",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = String;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw {
            "ROLE_USER" => Ok(Self::User),
            "ROLE_ADMIN" => Ok(Self::Admin),
            other => Err(format!("unknown role: {other:?}")),
        }
    }
}

// =============================================================================
// IDENTITY RECORD
// =============================================================================

/// The client's belief about who is logged in.
///
/// [`IdentityRecord::new`] and deserialization both reject an empty username.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct IdentityRecord {
    pub user_id: UserId,
    pub username: String,
    pub role: Role,
}

impl IdentityRecord {
    /// # Errors
    ///
    /// Returns an error message if `username` is blank.
    pub fn new(user_id: UserId, username: impl Into<String>, role: Role) -> Result<Self, String> {
        let username = username.into();
        if username.trim().is_empty() {
            return Err("username must not be empty".to_owned());
        }
        Ok(Self { user_id, username, role })
    }
}

/// Login payload: `{userId, username, role, ...}`; extra fields are ignored.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct LoginPayload {
    user_id: UserId,
    username: String,
    role: Role,
}

impl<'de> Deserialize<'de> for IdentityRecord {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let payload = LoginPayload::deserialize(deserializer)?;
        Self::new(payload.user_id, payload.username, payload.role).map_err(D::Error::custom)
    }
}
