use std::fmt;
use std::str::FromStr;

use serde::Serialize;

use crate::Payload;

const UNAVAILABLE: &str = "Unavailable";

/// Mobile platform reported with the identification payload.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Platform {
    Android,
    Ios,
}

impl Platform {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Android => "android",
            Self::Ios => "ios",
        }
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Platform {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "android" => Ok(Self::Android),
            "ios" => Ok(Self::Ios),
            other => Err(format!("unknown platform '{other}', expected android or ios")),
        }
    }
}

/// Device and app descriptors gathered by the platform layer.
///
/// `None` fields are sent as `"Unavailable"`.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct DeviceIdentifiers {
    #[serde(serialize_with = "or_unavailable")]
    pub name: Option<String>,
    #[serde(serialize_with = "or_unavailable")]
    pub model: Option<String>,
    #[serde(serialize_with = "or_unavailable")]
    pub localized_model: Option<String>,
    #[serde(serialize_with = "or_unavailable")]
    pub system_name: Option<String>,
    #[serde(serialize_with = "or_unavailable")]
    pub system_version: Option<String>,
    #[serde(serialize_with = "or_unavailable")]
    pub identifier_for_vendor: Option<String>,
    #[serde(serialize_with = "or_unavailable")]
    pub region_code: Option<String>,
    #[serde(serialize_with = "or_unavailable")]
    pub language_code: Option<String>,
    #[serde(serialize_with = "or_unavailable")]
    pub currency_code: Option<String>,
    #[serde(serialize_with = "or_unavailable")]
    pub current_locale: Option<String>,
    pub preferred_languages: Vec<String>,
    #[serde(serialize_with = "or_unavailable")]
    pub current_time_zone: Option<String>,
    #[serde(serialize_with = "or_unavailable")]
    pub bundle_identifier: Option<String>,
    #[serde(serialize_with = "or_unavailable")]
    pub app_version: Option<String>,
    #[serde(serialize_with = "or_unavailable")]
    pub app_build: Option<String>,
}

fn or_unavailable<S>(value: &Option<String>, serializer: S) -> Result<S::Ok, S::Error>
where
    S: serde::Serializer,
{
    serializer.serialize_str(value.as_deref().unwrap_or(UNAVAILABLE))
}

/// Body of `PUT /api/v1/identification`.
#[derive(Debug, Serialize)]
pub struct IdentificationBody<'a> {
    pub project_id: &'a str,
    pub identifier: &'a str,
    pub identifiers: &'a DeviceIdentifiers,
    pub metadata: &'a Payload,
    pub platform: Platform,
}

/// Body of `PUT /api/v1/metadata`.
#[derive(Debug, Serialize)]
pub struct MetadataBody<'a> {
    pub project_id: &'a str,
    pub identifier: &'a str,
    pub metadata: &'a Payload,
}
