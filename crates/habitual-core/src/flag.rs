//! The backend stores booleans as SQLite integers, so some flags arrive as
//! `0`/`1` and others as `true`/`false` depending on the route.

use serde::de::{self, Deserializer, Unexpected, Visitor};
use std::fmt;

struct FlagVisitor;

impl<'de> Visitor<'de> for FlagVisitor {
    type Value = bool;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a boolean or a 0/1 integer")
    }

    fn visit_bool<E: de::Error>(self, v: bool) -> Result<bool, E> {
        Ok(v)
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<bool, E> {
        match v {
            0 => Ok(false),
            1 => Ok(true),
            other => Err(E::invalid_value(Unexpected::Signed(other), &self)),
        }
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<bool, E> {
        match v {
            0 => Ok(false),
            1 => Ok(true),
            other => Err(E::invalid_value(Unexpected::Unsigned(other), &self)),
        }
    }

    fn visit_unit<E: de::Error>(self) -> Result<bool, E> {
        Ok(false)
    }
}

pub(crate) fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<bool, D::Error> {
    d.deserialize_any(FlagVisitor)
}

#[cfg(test)]
mod tests {
    use serde::Deserialize;

    #[derive(Deserialize)]
    struct Row {
        #[serde(deserialize_with = "super::deserialize")]
        flag: bool,
    }

    fn parse(json: &str) -> Result<bool, serde_json::Error> {
        serde_json::from_str::<Row>(json).map(|r| r.flag)
    }

    #[test]
    fn accepts_bools_and_sqlite_integers() {
        assert!(parse(r#"{"flag": true}"#).unwrap());
        assert!(parse(r#"{"flag": 1}"#).unwrap());
        assert!(!parse(r#"{"flag": 0}"#).unwrap());
        assert!(!parse(r#"{"flag": null}"#).unwrap());
    }

    #[test]
    fn rejects_other_integers() {
        assert!(parse(r#"{"flag": 2}"#).is_err());
    }
}
