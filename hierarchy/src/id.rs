use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

const MAX_ID_LEN: usize = 64;

/// Identifier of any hierarchy record.
///
/// Database rows use integer keys and the REST API hands out opaque strings
/// (`"42"`, `"64f1c2..."`), so the engine keeps identifiers as validated strings.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct EntityId(String);

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IdError {
    #[error("identifier is empty")]
    Empty,
    #[error("identifier is longer than 64 characters ({0})")]
    TooLong(usize),
    #[error("identifier contains invalid character {0:?}")]
    InvalidChar(char),
}

impl EntityId {
    pub fn parse(raw: &str) -> Result<Self, IdError> {
        let raw = raw.trim();
        if raw.is_empty() {
            return Err(IdError::Empty);
        }
        if raw.len() > MAX_ID_LEN {
            return Err(IdError::TooLong(raw.len()));
        }
        if let Some(c) = raw
            .chars()
            .find(|c| !(c.is_ascii_alphanumeric() || *c == '-' || *c == '_'))
        {
            return Err(IdError::InvalidChar(c));
        }
        Ok(Self(raw.to_owned()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Integer form used by the database layer, if the id is numeric.
    pub fn as_i64(&self) -> Option<i64> {
        self.0.parse().ok()
    }
}

impl FromStr for EntityId {
    type Err = IdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for EntityId {
    type Error = IdError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<EntityId> for String {
    fn from(id: EntityId) -> Self {
        id.0
    }
}

impl From<i64> for EntityId {
    fn from(id: i64) -> Self {
        Self(id.to_string())
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_object_ids_and_numbers() {
        assert_eq!(EntityId::parse("64f1c2aa09").unwrap().as_str(), "64f1c2aa09");
        assert_eq!(EntityId::parse(" 17 ").unwrap().as_i64(), Some(17));
        assert_eq!(EntityId::from(5).as_str(), "5");
    }

    #[test]
    fn rejects_malformed_values() {
        assert_eq!(EntityId::parse("   "), Err(IdError::Empty));
        assert_eq!(EntityId::parse("b1; drop"), Err(IdError::InvalidChar(';')));
        assert!(matches!(
            EntityId::parse(&"x".repeat(65)),
            Err(IdError::TooLong(65))
        ));
    }

    #[test]
    fn deserializes_through_validation() {
        let ok: EntityId = serde_json::from_str("\"s1\"").unwrap();
        assert_eq!(ok.as_str(), "s1");
        assert!(serde_json::from_str::<EntityId>("\"a b\"").is_err());
    }
}
