//! Period Common - Shared grammar constants and helpers for the period codec
//!
//! # Examples
//!
//! ```
//! use chrono::{TimeZone, Utc};
//! use period_common::{format_db_timestamp, format_iso_timestamp, ISO_INTERVAL_SEPARATOR};
//!
//! let dt = Utc.with_ymd_and_hms(2014, 3, 1, 13, 0, 0).unwrap();
//! assert_eq!(format_iso_timestamp(&dt), "2014-03-01T13:00:00.000Z");
//! assert_eq!(format_db_timestamp(&dt), "2014-03-01 13:00:00+00");
//! assert_eq!(ISO_INTERVAL_SEPARATOR, '/');
//! ```

pub mod constants;
pub mod utils;

pub use constants::*;
pub use utils::*;
