//! Data models for entities that carry observation time periods

use crate::period::Interval;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Field names as they appear in request and response payloads
pub mod fields {
    pub const ID: &str = "id";
    pub const NAME: &str = "name";
    pub const DESCRIPTION: &str = "description";
    pub const DEFINITION: &str = "definition";
    pub const PHENOMENON_TIME: &str = "phenomenonTime";
    pub const RESULT_TIME: &str = "resultTime";
    pub const VALID_TIME: &str = "validTime";
    pub const RESULT: &str = "result";
}

/// Entity type enumeration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum EntityType {
    ObservedProperty,
    Observation,
    Datastream,
}

impl EntityType {
    /// All known entity types
    pub const ALL: [EntityType; 3] = [
        EntityType::ObservedProperty,
        EntityType::Observation,
        EntityType::Datastream,
    ];

    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ObservedProperty => "ObservedProperty",
            Self::Observation => "Observation",
            Self::Datastream => "Datastream",
        }
    }

    /// Table the entity is stored in
    #[must_use]
    pub fn table(&self) -> &'static str {
        match self {
            Self::ObservedProperty => "observedproperty",
            Self::Observation => "observation",
            Self::Datastream => "datastream",
        }
    }

    /// Payload fields the entity exposes
    #[must_use]
    pub fn fields(&self) -> &'static [&'static str] {
        match self {
            Self::ObservedProperty => &[
                fields::ID,
                fields::NAME,
                fields::DESCRIPTION,
                fields::DEFINITION,
            ],
            Self::Observation => &[
                fields::ID,
                fields::PHENOMENON_TIME,
                fields::RESULT_TIME,
                fields::VALID_TIME,
                fields::RESULT,
            ],
            Self::Datastream => &[
                fields::ID,
                fields::NAME,
                fields::DESCRIPTION,
                fields::PHENOMENON_TIME,
                fields::RESULT_TIME,
            ],
        }
    }
}

impl fmt::Display for EntityType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Observed property entity
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ObservedProperty {
    #[serde(rename = "@iot.id", default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub definition: String,
}

/// Observation entity
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Observation {
    #[serde(rename = "@iot.id", default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    /// Period during which the observed phenomenon took place
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phenomenon_time: Option<Interval>,
    /// Instant the result was produced
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result_time: Option<DateTime<Utc>>,
    /// Period during which the result may be used
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub valid_time: Option<Interval>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result: Option<serde_json::Value>,
}

impl Observation {
    /// Interval fields rendered as database range literals, keyed by payload field
    #[must_use]
    pub fn period_columns(&self) -> Vec<(&'static str, String)> {
        period_columns(&[
            (fields::PHENOMENON_TIME, self.phenomenon_time.as_ref()),
            (fields::VALID_TIME, self.valid_time.as_ref()),
        ])
    }
}

/// Datastream entity
///
/// Phenomenon and result times are aggregated periods spanning the
/// datastream's observations.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Datastream {
    #[serde(rename = "@iot.id", default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phenomenon_time: Option<Interval>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result_time: Option<Interval>,
}

impl Datastream {
    /// Interval fields rendered as database range literals, keyed by payload field
    #[must_use]
    pub fn period_columns(&self) -> Vec<(&'static str, String)> {
        period_columns(&[
            (fields::PHENOMENON_TIME, self.phenomenon_time.as_ref()),
            (fields::RESULT_TIME, self.result_time.as_ref()),
        ])
    }
}

fn period_columns(periods: &[(&'static str, Option<&Interval>)]) -> Vec<(&'static str, String)> {
    periods
        .iter()
        .filter_map(|(field, interval)| interval.map(|i| (*field, i.to_db_period())))
        .collect()
}
