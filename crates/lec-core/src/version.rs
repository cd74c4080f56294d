//! Structured material version.
//!
//! A version is a `(major, minor)` pair. Each recorded completion bumps the
//! minor component; major is only ever set explicitly. The `vMAJOR.MINOR`
//! string form exists for display and JSON only.

use std::borrow::Cow;
use std::fmt;
use std::str::FromStr;

use schemars::{JsonSchema, Schema, SchemaGenerator, json_schema};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::errors::CoreError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MaterialVersion {
    pub major: u32,
    pub minor: u32,
}

impl MaterialVersion {
    /// Version assigned when a material is first recorded.
    pub const INITIAL: Self = Self::new(1, 0);

    #[must_use]
    pub const fn new(major: u32, minor: u32) -> Self {
        Self { major, minor }
    }

    /// The version that follows this one on the next recorded completion.
    #[must_use]
    pub const fn next_minor(self) -> Self {
        Self {
            major: self.major,
            minor: self.minor.saturating_add(1),
        }
    }
}

impl Default for MaterialVersion {
    fn default() -> Self {
        Self::INITIAL
    }
}

impl fmt::Display for MaterialVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "v{}.{}", self.major, self.minor)
    }
}

impl FromStr for MaterialVersion {
    type Err = CoreError;

    /// Accepts `v1.2` and `1.2`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let raw = s.trim();
        let raw = raw.strip_prefix('v').unwrap_or(raw);
        let invalid = || CoreError::Validation(format!("invalid version '{s}'"));

        let (major, minor) = raw.split_once('.').ok_or_else(invalid)?;
        let major = major.parse::<u32>().map_err(|_| invalid())?;
        let minor = minor.parse::<u32>().map_err(|_| invalid())?;
        Ok(Self::new(major, minor))
    }
}

impl Serialize for MaterialVersion {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for MaterialVersion {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

impl JsonSchema for MaterialVersion {
    fn schema_name() -> Cow<'static, str> {
        Cow::Borrowed("MaterialVersion")
    }

    fn json_schema(_generator: &mut SchemaGenerator) -> Schema {
        json_schema!({
            "type": "string",
            "pattern": "^v[0-9]+\\.[0-9]+$"
        })
    }
}
