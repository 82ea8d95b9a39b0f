//! Configuration management for the period codec service
//!
//! Column aliases used when materializing entities from query rows are an
//! explicit [`AliasMappings`] value, built once at startup and handed to each
//! [`RowMapper`](crate::mappers::RowMapper) that needs it.

use crate::error::{PeriodError, Result};
use crate::models::EntityType;
use crate::observability::ObservabilityConfig;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;
use tracing::{debug, info};

/// Column alias per entity type and payload field
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AliasMappings {
    entities: BTreeMap<EntityType, BTreeMap<String, String>>,
}

impl AliasMappings {
    /// Create an empty mapping table
    #[must_use]
    pub fn empty() -> Self {
        Self {
            entities: BTreeMap::new(),
        }
    }

    /// Look up the column alias of an entity field
    ///
    /// # Errors
    /// Returns `UnknownEntity` if the entity has no mappings, or a configuration
    /// error if the field is not mapped
    pub fn alias(&self, entity: EntityType, field: &str) -> Result<&str> {
        let fields = self
            .entities
            .get(&entity)
            .ok_or_else(|| PeriodError::UnknownEntity {
                entity: entity.to_string(),
            })?;
        fields.get(field).map(String::as_str).ok_or_else(|| {
            PeriodError::configuration(format!("No column alias for {entity}.{field}"))
        })
    }

    /// Set or replace the alias of an entity field
    pub fn set_alias(
        &mut self,
        entity: EntityType,
        field: impl Into<String>,
        alias: impl Into<String>,
    ) {
        self.entities
            .entry(entity)
            .or_default()
            .insert(field.into(), alias.into());
    }

    /// Merge another table into this one, the other table taking precedence
    pub fn merge_with(&mut self, other: &AliasMappings) {
        for (entity, fields) in &other.entities {
            for (field, alias) in fields {
                self.set_alias(*entity, field.clone(), alias.clone());
            }
        }
    }

    /// Validate the mapping table
    ///
    /// # Errors
    /// Returns a configuration error for unknown fields, empty aliases, or
    /// aliases used twice within one entity
    pub fn validate(&self) -> Result<()> {
        for (entity, fields) in &self.entities {
            let mut seen = BTreeSet::new();
            for (field, alias) in fields {
                if !entity.fields().contains(&field.as_str()) {
                    return Err(PeriodError::configuration(format!(
                        "Unknown field {entity}.{field}"
                    )));
                }
                if alias.is_empty() {
                    return Err(PeriodError::configuration(format!(
                        "Column alias for {entity}.{field} cannot be empty"
                    )));
                }
                if !seen.insert(alias.as_str()) {
                    return Err(PeriodError::configuration(format!(
                        "Column alias '{alias}' is used twice for {entity}"
                    )));
                }
            }
        }
        Ok(())
    }
}

impl Default for AliasMappings {
    /// Standard aliases of the form `<table>_<field>`, e.g. `observation_phenomenontime`
    fn default() -> Self {
        let mut mappings = Self::empty();
        for entity in EntityType::ALL {
            for field in entity.fields() {
                mappings.set_alias(
                    entity,
                    *field,
                    format!("{}_{}", entity.table(), field.to_lowercase()),
                );
            }
        }
        mappings
    }
}

/// Top-level configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PeriodConfig {
    pub mappings: AliasMappings,
    pub observability: ObservabilityConfig,
}

impl PeriodConfig {
    /// Create configuration from defaults and environment variables
    ///
    /// # Errors
    /// Returns an error if environment variables contain invalid values
    pub fn from_env() -> Result<Self> {
        let mut config = Self::default();
        config.apply_env()?;
        Ok(config)
    }

    /// Override settings from `PERIOD_*` environment variables
    ///
    /// # Errors
    /// Returns an error if environment variables contain invalid values
    pub fn apply_env(&mut self) -> Result<()> {
        if let Ok(level) = std::env::var("PERIOD_LOG_LEVEL") {
            if level.is_empty() {
                return Err(PeriodError::configuration("Invalid PERIOD_LOG_LEVEL value"));
            }
            self.observability.log_level = level.to_lowercase();
        }
        if let Ok(json_logs) = std::env::var("PERIOD_JSON_LOGS") {
            self.observability.json_logs = parse_bool(&json_logs);
        }
        if let Ok(service_name) = std::env::var("PERIOD_SERVICE_NAME") {
            self.observability.service_name = service_name;
        }
        Ok(())
    }

    /// Load configuration from a file
    ///
    /// YAML is used for `.yaml`/`.yml` files, JSON otherwise.
    ///
    /// # Errors
    /// Returns an error if the file cannot be read or parsed
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| {
            PeriodError::Io(std::io::Error::other(format!(
                "Failed to read config file {}: {e}",
                path.display()
            )))
        })?;

        let config = if is_yaml(path) {
            serde_yaml::from_str(&content).map_err(|e| {
                PeriodError::configuration(format!("Failed to parse YAML config: {e}"))
            })?
        } else {
            serde_json::from_str(&content).map_err(|e| {
                PeriodError::configuration(format!("Failed to parse JSON config: {e}"))
            })?
        };

        Ok(config)
    }

    /// Save configuration to a file, format chosen by extension as in [`Self::from_file`]
    ///
    /// # Errors
    /// Returns an error if the configuration cannot be serialized or written
    pub fn to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        let content = if is_yaml(path) {
            serde_yaml::to_string(self).map_err(|e| {
                PeriodError::configuration(format!("Failed to serialize YAML: {e}"))
            })?
        } else {
            serde_json::to_string_pretty(self)?
        };
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Merge with another configuration, the other taking precedence
    pub fn merge_with(&mut self, other: &PeriodConfig) {
        self.mappings.merge_with(&other.mappings);
        if !other.observability.log_level.is_empty() {
            self.observability.log_level = other.observability.log_level.clone();
        }
        if !other.observability.service_name.is_empty() {
            self.observability.service_name = other.observability.service_name.clone();
        }
        self.observability.json_logs = other.observability.json_logs;
    }

    /// Validate the configuration
    ///
    /// # Errors
    /// Returns a configuration error describing the first invalid setting
    pub fn validate(&self) -> Result<()> {
        self.observability.validate()?;
        self.mappings.validate()
    }
}

/// Load configuration: defaults, then the optional file, then the environment
///
/// # Errors
/// Returns an error if the file cannot be loaded or the result is invalid
pub fn load_config(path: Option<&Path>) -> Result<PeriodConfig> {
    let mut config = PeriodConfig::default();

    if let Some(path) = path {
        debug!("Loading configuration from file: {}", path.display());
        let file_config = PeriodConfig::from_file(path)?;
        config.merge_with(&file_config);
        info!("Loaded configuration from: {}", path.display());
    }

    config.apply_env()?;
    config.validate()?;
    debug!("Configuration validation passed");
    Ok(config)
}

fn is_yaml(path: &Path) -> bool {
    matches!(
        path.extension().and_then(|s| s.to_str()),
        Some("yaml" | "yml")
    )
}

/// Parse a boolean value from a string
fn parse_bool(value: &str) -> bool {
    let lower = value.to_lowercase();
    matches!(lower.as_str(), "true" | "1" | "yes" | "on")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::fields;
    use serial_test::serial;
    use tempfile::TempDir;

    #[test]
    fn test_default_aliases() {
        let mappings = AliasMappings::default();
        assert_eq!(
            mappings
                .alias(EntityType::Observation, fields::PHENOMENON_TIME)
                .unwrap(),
            "observation_phenomenontime"
        );
        assert_eq!(
            mappings
                .alias(EntityType::ObservedProperty, fields::DEFINITION)
                .unwrap(),
            "observedproperty_definition"
        );
        assert!(mappings.validate().is_ok());
    }

    #[test]
    fn test_alias_unknown_entity() {
        let mappings = AliasMappings::empty();
        assert!(matches!(
            mappings.alias(EntityType::Datastream, fields::NAME),
            Err(PeriodError::UnknownEntity { .. })
        ));
    }

    #[test]
    fn test_alias_unmapped_field() {
        let mappings = AliasMappings::default();
        assert!(matches!(
            mappings.alias(EntityType::ObservedProperty, fields::PHENOMENON_TIME),
            Err(PeriodError::Configuration { .. })
        ));
    }

    #[test]
    fn test_validate_rejects_duplicate_alias() {
        let mut mappings = AliasMappings::default();
        mappings.set_alias(
            EntityType::Observation,
            fields::VALID_TIME,
            "observation_phenomenontime",
        );
        assert!(mappings.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_empty_alias_and_unknown_field() {
        let mut mappings = AliasMappings::default();
        mappings.set_alias(EntityType::Observation, fields::RESULT, "");
        assert!(mappings.validate().is_err());

        let mut mappings = AliasMappings::default();
        mappings.set_alias(EntityType::Observation, "colour", "observation_colour");
        assert!(mappings.validate().is_err());
    }

    #[test]
    fn test_merge_overrides_aliases() {
        let mut base = PeriodConfig::default();
        let mut other = PeriodConfig::default();
        other
            .mappings
            .set_alias(EntityType::Observation, fields::RESULT_TIME, "o_rt");
        other.observability.log_level = "debug".to_string();
        other.observability.json_logs = true;

        base.merge_with(&other);
        assert_eq!(
            base.mappings
                .alias(EntityType::Observation, fields::RESULT_TIME)
                .unwrap(),
            "o_rt"
        );
        assert_eq!(base.observability.log_level, "debug");
        assert!(base.observability.json_logs);
    }

    #[test]
    fn test_config_to_and_from_file_json() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("period.json");
        let mut config = PeriodConfig::default();
        config.observability.service_name = "sta-server".to_string();

        config.to_file(&path).unwrap();
        let loaded = PeriodConfig::from_file(&path).unwrap();
        assert_eq!(loaded.mappings, config.mappings);
        assert_eq!(loaded.observability.service_name, "sta-server");
    }

    #[test]
    fn test_config_from_partial_yaml() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("period.yaml");
        std::fs::write(
            &path,
            "observability:\n  log_level: warn\nmappings:\n  Observation:\n    phenomenonTime: obs_pt\n",
        )
        .unwrap();

        let loaded = PeriodConfig::from_file(&path).unwrap();
        assert_eq!(loaded.observability.log_level, "warn");
        assert_eq!(
            loaded
                .mappings
                .alias(EntityType::Observation, fields::PHENOMENON_TIME)
                .unwrap(),
            "obs_pt"
        );
    }

    #[test]
    fn test_config_from_invalid_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("period.json");
        std::fs::write(&path, "{ not json").unwrap();
        assert!(matches!(
            PeriodConfig::from_file(&path),
            Err(PeriodError::Configuration { .. })
        ));
        assert!(matches!(
            PeriodConfig::from_file(dir.path().join("missing.json")),
            Err(PeriodError::Io(_))
        ));
    }

    #[test]
    #[serial]
    fn test_config_from_env() {
        std::env::set_var("PERIOD_LOG_LEVEL", "DEBUG");
        std::env::set_var("PERIOD_JSON_LOGS", "yes");
        std::env::set_var("PERIOD_SERVICE_NAME", "env-service");

        let config = PeriodConfig::from_env().unwrap();
        assert_eq!(config.observability.log_level, "debug");
        assert!(config.observability.json_logs);
        assert_eq!(config.observability.service_name, "env-service");

        std::env::remove_var("PERIOD_LOG_LEVEL");
        std::env::remove_var("PERIOD_JSON_LOGS");
        std::env::remove_var("PERIOD_SERVICE_NAME");
    }

    #[test]
    #[serial]
    fn test_load_config_merges_file_then_env() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("period.yml");
        std::fs::write(&path, "observability:\n  log_level: warn\n  json_logs: true\n").unwrap();
        std::env::set_var("PERIOD_LOG_LEVEL", "error");

        let config = load_config(Some(path.as_path())).unwrap();
        assert_eq!(config.observability.log_level, "error");
        assert!(config.observability.json_logs);
        // Untouched aliases keep their defaults
        assert_eq!(config.mappings, AliasMappings::default());

        std::env::remove_var("PERIOD_LOG_LEVEL");
    }

    #[test]
    #[serial]
    fn test_load_config_rejects_invalid_level() {
        std::env::set_var("PERIOD_LOG_LEVEL", "loud");
        assert!(load_config(None).is_err());
        std::env::remove_var("PERIOD_LOG_LEVEL");
    }

    #[test]
    fn test_parse_bool() {
        assert!(parse_bool("true"));
        assert!(parse_bool("ON"));
        assert!(parse_bool("1"));
        assert!(!parse_bool("false"));
        assert!(!parse_bool("nope"));
    }
}
