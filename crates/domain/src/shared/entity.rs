use serde::{de::Visitor, Deserialize, Serialize};
use std::{fmt::Display, str::FromStr};
use thiserror::Error;

pub trait Entity {
    fn id(&self) -> &ID;
}

/// Row identifier. Ids are assigned by the storage layer and are always positive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ID(i64);

impl ID {
    pub fn new(id: i64) -> Result<Self, InvalidIDError> {
        if id < 1 {
            return Err(InvalidIDError::NotPositive(id));
        }
        Ok(Self(id))
    }

    pub fn inner(self) -> i64 {
        self.0
    }
}

impl From<i64> for ID {
    /// Only used for values read back from storage, which are positive by construction
    fn from(id: i64) -> Self {
        Self(id)
    }
}

impl Display for ID {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Error, Debug, PartialEq)]
pub enum InvalidIDError {
    #[error("ID: {0} is malformed")]
    Malformed(String),
    #[error("ID: {0} must be a positive integer")]
    NotPositive(i64),
}

impl FromStr for ID {
    type Err = InvalidIDError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let id = s
            .trim()
            .parse::<i64>()
            .map_err(|_| InvalidIDError::Malformed(s.to_string()))?;
        Self::new(id)
    }
}

impl Serialize for ID {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_i64(self.0)
    }
}

impl<'de> Deserialize<'de> for ID {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        struct IDVisitor;

        impl<'de> Visitor<'de> for IDVisitor {
            type Value = ID;

            fn expecting(&self, formatter: &mut std::fmt::Formatter) -> std::fmt::Result {
                formatter.write_str("A positive integer id, or its string representation")
            }

            fn visit_i64<E>(self, value: i64) -> Result<ID, E>
            where
                E: serde::de::Error,
            {
                ID::new(value).map_err(|e| E::custom(e.to_string()))
            }

            fn visit_u64<E>(self, value: u64) -> Result<ID, E>
            where
                E: serde::de::Error,
            {
                let value = i64::try_from(value)
                    .map_err(|_| E::custom(format!("Malformed id: {}", value)))?;
                self.visit_i64(value)
            }

            fn visit_str<E>(self, value: &str) -> Result<ID, E>
            where
                E: serde::de::Error,
            {
                value
                    .parse::<ID>()
                    .map_err(|_| E::custom(format!("Malformed id: {}", value)))
            }
        }

        deserializer.deserialize_any(IDVisitor)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn parses_ids() {
        assert_eq!("1".parse::<ID>().unwrap(), ID::from(1));
        assert_eq!(" 42".parse::<ID>().unwrap(), ID::from(42));
        assert_eq!(
            "0".parse::<ID>().unwrap_err(),
            InvalidIDError::NotPositive(0)
        );
        assert!("-3".parse::<ID>().is_err());
        assert!("abc".parse::<ID>().is_err());
    }

    #[test]
    fn deserializes_numbers_and_strings() {
        let id: ID = serde_json::from_str("7").unwrap();
        assert_eq!(id, ID::from(7));
        let id: ID = serde_json::from_str("\"8\"").unwrap();
        assert_eq!(id, ID::from(8));
        assert!(serde_json::from_str::<ID>("-1").is_err());
    }
}
