//! Period Core - ISO-8601 interval codec for observation time periods
//!
//! Observation times (`phenomenonTime`, `resultTime`, `validTime`) reach the API
//! as ISO-8601 intervals and are persisted as timestamp range literals. This
//! library converts between the two grammars and materializes entities from
//! query rows through typed column mappings.
//!
//! # Features
//!
//! - **Period codec**: [`to_iso8601`] and [`to_db_period`], pure and thread-safe
//! - **Typed intervals**: [`Interval`] with serde support as an ISO-8601 string
//! - **Row mapping**: [`RowMapper`] tables built once from [`AliasMappings`]
//! - **Configuration**: YAML/JSON files with environment overrides
//! - **Observability**: structured logging through `tracing`
//!
//! # Quick Start
//!
//! ```
//! use period_core::{to_db_period, to_iso8601, Interval};
//!
//! let db = to_db_period("2014-03-01T15:00:00+02:00/2015-05-11T15:30:00Z").unwrap();
//! assert_eq!(db, r#"["2014-03-01 13:00:00+00","2015-05-11 15:30:00+00"]"#);
//!
//! let iso = to_iso8601(&db).unwrap();
//! assert_eq!(iso, "2014-03-01T13:00:00.000Z/2015-05-11T15:30:00.000Z");
//!
//! let interval: Interval = iso.parse().unwrap();
//! assert!(interval.start < interval.end);
//! ```

pub mod config;
pub mod error;
pub mod mappers;
pub mod models;
pub mod observability;
pub mod period;

pub use config::{load_config, AliasMappings, PeriodConfig};
pub use error::{FormatError, FormatErrorReason, PeriodError, Result};
pub use mappers::{ColumnValue, FieldSetter, Row, RowMapper};
pub use models::{fields, Datastream, EntityType, Observation, ObservedProperty};
pub use observability::{init_tracing, ObservabilityConfig, ObservabilityError};
pub use period::{
    parse_db_period, parse_db_timestamp, parse_iso_period, to_db_period, to_iso8601, Interval,
};

/// Re-export commonly used types
pub use chrono::{DateTime, Utc};
