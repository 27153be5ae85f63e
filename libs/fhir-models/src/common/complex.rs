//! Shared FHIR datatypes and serde helpers

use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

/// Publication status of a conformance or terminology resource
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PublicationStatus {
    #[default]
    Draft,
    Active,
    Retired,
    Unknown,
}

impl PublicationStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Draft => "draft",
            Self::Active => "active",
            Self::Retired => "retired",
            Self::Unknown => "unknown",
        }
    }
}

impl fmt::Display for PublicationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for PublicationStatus {
    type Err = crate::common::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "draft" => Ok(Self::Draft),
            "active" => Ok(Self::Active),
            "retired" => Ok(Self::Retired),
            "unknown" => Ok(Self::Unknown),
            other => Err(crate::common::Error::InvalidFieldValue(format!(
                "status '{other}' (expected draft | active | retired | unknown)"
            ))),
        }
    }
}

/// Treats an explicit JSON `null` the same as a missing element.
///
/// Servers built on permissive models emit `"display": null` for unset
/// optional strings; the typed models keep those as empty values instead.
pub(crate) fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Option::unwrap_or_default)
}
