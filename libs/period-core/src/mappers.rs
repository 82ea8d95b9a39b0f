//! Row mapping utilities for converting query rows to entity models
//!
//! Each entity has a finite table of `(column alias, setter)` pairs, resolved
//! once against [`AliasMappings`] when the [`RowMapper`] is built. Cells are
//! typed [`ColumnValue`]s, so a setter either receives the kind of value it
//! expects or reports a [`PeriodError::ColumnType`] error.

use crate::{
    config::AliasMappings,
    error::{PeriodError, Result},
    models::{fields, Datastream, EntityType, Observation, ObservedProperty},
    period::{parse_db_timestamp, Interval},
};
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use tracing::trace;

/// A single cell of a query result
#[derive(Debug, Clone, PartialEq)]
pub enum ColumnValue {
    Null,
    Int(i64),
    Float(f64),
    Text(String),
    Json(serde_json::Value),
}

/// A query result row as `(column, value)` pairs
pub type Row = Vec<(String, ColumnValue)>;

/// Assigns one typed cell to an entity field
pub type FieldSetter<E> = fn(&mut E, &str, ColumnValue) -> Result<()>;

impl ColumnValue {
    /// Take an integer cell
    ///
    /// # Errors
    /// Returns `ColumnType` for any other kind of cell
    pub fn into_int(self, column: &str) -> Result<i64> {
        match self {
            Self::Int(value) => Ok(value),
            _ => Err(PeriodError::column_type(column, "integer")),
        }
    }

    /// Take a text cell
    ///
    /// # Errors
    /// Returns `ColumnType` for any other kind of cell
    pub fn into_text(self, column: &str) -> Result<String> {
        match self {
            Self::Text(value) => Ok(value),
            _ => Err(PeriodError::column_type(column, "text")),
        }
    }

    /// Decode a text cell holding a stored range literal
    ///
    /// # Errors
    /// Returns `ColumnType` for non-text cells and `Format` for malformed periods
    pub fn into_interval(self, column: &str) -> Result<Interval> {
        let text = self.into_text(column)?;
        Ok(Interval::from_db_period(&text)?)
    }

    /// Decode a text cell holding a stored timestamp
    ///
    /// # Errors
    /// Returns `ColumnType` for non-text cells and `Format` for malformed timestamps
    pub fn into_instant(self, column: &str) -> Result<DateTime<Utc>> {
        let text = self.into_text(column)?;
        Ok(parse_db_timestamp(&text)?)
    }

    /// Convert any non-null cell to a JSON value
    ///
    /// # Errors
    /// Returns `ColumnType` for non-finite floats
    pub fn into_json(self, column: &str) -> Result<serde_json::Value> {
        match self {
            Self::Json(value) => Ok(value),
            Self::Int(value) => Ok(value.into()),
            Self::Float(value) => serde_json::Number::from_f64(value)
                .map(serde_json::Value::Number)
                .ok_or_else(|| PeriodError::column_type(column, "finite number")),
            Self::Text(value) => Ok(serde_json::Value::String(value)),
            Self::Null => Ok(serde_json::Value::Null),
        }
    }
}

/// Builds entities of type `E` from query rows
#[derive(Debug, Clone)]
pub struct RowMapper<E> {
    entity: EntityType,
    setters: HashMap<String, FieldSetter<E>>,
}

impl<E: Default> RowMapper<E> {
    fn build(
        entity: EntityType,
        mappings: &AliasMappings,
        table: &[(&'static str, FieldSetter<E>)],
    ) -> Result<Self> {
        let mut setters = HashMap::with_capacity(table.len());
        for (field, setter) in table {
            let alias = mappings.alias(entity, field)?;
            if setters.insert(alias.to_string(), *setter).is_some() {
                return Err(PeriodError::configuration(format!(
                    "Column alias '{alias}' is used twice for {entity}"
                )));
            }
        }
        Ok(Self { entity, setters })
    }

    /// Entity type this mapper produces
    #[must_use]
    pub fn entity(&self) -> EntityType {
        self.entity
    }

    /// Whether the mapper assigns the given column
    #[must_use]
    pub fn handles(&self, column: &str) -> bool {
        self.setters.contains_key(column)
    }

    /// Map a row to an entity
    ///
    /// Null cells and columns without a setter are skipped.
    ///
    /// # Errors
    /// Returns an error if a cell has the wrong kind or holds a malformed period
    pub fn map_row(&self, row: Row) -> Result<E> {
        let mut entity = E::default();
        for (column, value) in row {
            if value == ColumnValue::Null {
                continue;
            }
            match self.setters.get(&column) {
                Some(setter) => setter(&mut entity, &column, value)?,
                None => {
                    trace!(entity = %self.entity, column = %column, "skipping unmapped column");
                }
            }
        }
        Ok(entity)
    }

    /// Map every row, stopping at the first error
    ///
    /// # Errors
    /// Returns the first mapping error encountered
    pub fn map_rows<I>(&self, rows: I) -> Result<Vec<E>>
    where
        I: IntoIterator<Item = Row>,
    {
        rows.into_iter().map(|row| self.map_row(row)).collect()
    }
}

impl RowMapper<ObservedProperty> {
    /// Mapper for observed property rows
    ///
    /// # Errors
    /// Returns an error if a field has no alias in `mappings`
    pub fn observed_property(mappings: &AliasMappings) -> Result<Self> {
        let table: [(&'static str, FieldSetter<ObservedProperty>); 4] = [
            (fields::ID, |e, column, value| {
                e.id = Some(value.into_int(column)?);
                Ok(())
            }),
            (fields::NAME, |e, column, value| {
                e.name = value.into_text(column)?;
                Ok(())
            }),
            (fields::DESCRIPTION, |e, column, value| {
                e.description = value.into_text(column)?;
                Ok(())
            }),
            (fields::DEFINITION, |e, column, value| {
                e.definition = value.into_text(column)?;
                Ok(())
            }),
        ];
        Self::build(EntityType::ObservedProperty, mappings, &table)
    }
}

impl RowMapper<Observation> {
    /// Mapper for observation rows; period columns are decoded from range literals
    ///
    /// # Errors
    /// Returns an error if a field has no alias in `mappings`
    pub fn observation(mappings: &AliasMappings) -> Result<Self> {
        let table: [(&'static str, FieldSetter<Observation>); 5] = [
            (fields::ID, |e, column, value| {
                e.id = Some(value.into_int(column)?);
                Ok(())
            }),
            (fields::PHENOMENON_TIME, |e, column, value| {
                e.phenomenon_time = Some(value.into_interval(column)?);
                Ok(())
            }),
            (fields::RESULT_TIME, |e, column, value| {
                e.result_time = Some(value.into_instant(column)?);
                Ok(())
            }),
            (fields::VALID_TIME, |e, column, value| {
                e.valid_time = Some(value.into_interval(column)?);
                Ok(())
            }),
            (fields::RESULT, |e, column, value| {
                e.result = Some(value.into_json(column)?);
                Ok(())
            }),
        ];
        Self::build(EntityType::Observation, mappings, &table)
    }
}

impl RowMapper<Datastream> {
    /// Mapper for datastream rows; both time columns are range literals
    ///
    /// # Errors
    /// Returns an error if a field has no alias in `mappings`
    pub fn datastream(mappings: &AliasMappings) -> Result<Self> {
        let table: [(&'static str, FieldSetter<Datastream>); 5] = [
            (fields::ID, |e, column, value| {
                e.id = Some(value.into_int(column)?);
                Ok(())
            }),
            (fields::NAME, |e, column, value| {
                e.name = value.into_text(column)?;
                Ok(())
            }),
            (fields::DESCRIPTION, |e, column, value| {
                e.description = value.into_text(column)?;
                Ok(())
            }),
            (fields::PHENOMENON_TIME, |e, column, value| {
                e.phenomenon_time = Some(value.into_interval(column)?);
                Ok(())
            }),
            (fields::RESULT_TIME, |e, column, value| {
                e.result_time = Some(value.into_interval(column)?);
                Ok(())
            }),
        ];
        Self::build(EntityType::Datastream, mappings, &table)
    }
}
