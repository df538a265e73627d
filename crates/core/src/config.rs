//! Generator options.
//!
//! Options are read from a TOML file (`wiremap.toml`) or JSON; keys are
//! camelCase and every key is optional:
//!
//! ```toml
//! role = "server"
//! typesImportPath = "./types"
//! validatorsImportPath = "./validators"
//! dtosImportPath = "./dtos"
//! interfaceNomenclature = "Service"
//! validation = "zod"
//! ```

use std::fs;
use std::path::Path;

use serde::Deserialize;
use tracing::debug;

use crate::error::ConfigError;

/// Import path of the generated mapper module.
pub const MAPPERS_IMPORT_PATH: &str = "./mappers";

/// Which end of the wire the generated code runs on.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    /// Code calling the service over HTTP.
    Client,
    /// Code implementing the service behind express routes.
    #[default]
    Server,
}

/// Library whose error type signals a validation failure.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Validation {
    /// `ZodError` from `zod`.
    #[default]
    Zod,
    /// `ValidationError` exported by the validators module.
    #[serde(other)]
    Other,
}

/// Options recognized by the generators.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GeneratorOptions {
    /// Side the generated route or client code runs on.
    pub role: Side,
    /// Module path of the internal types.
    pub types_import_path: String,
    /// Module path of the validators.
    pub validators_import_path: String,
    /// Module path of the DTO types.
    pub dtos_import_path: String,
    /// Suffix of generated service interface names.
    pub interface_nomenclature: String,
    /// Validation library.
    pub validation: Validation,
}

impl Default for GeneratorOptions {
    fn default() -> Self {
        Self {
            role: Side::Server,
            types_import_path: "./types".to_string(),
            validators_import_path: "./validators".to_string(),
            dtos_import_path: "./dtos".to_string(),
            interface_nomenclature: "Service".to_string(),
            validation: Validation::Zod,
        }
    }
}

impl GeneratorOptions {
    /// Parse options from TOML text.
    pub fn from_toml(contents: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(contents)?)
    }

    /// Parse options from JSON text.
    pub fn from_json(contents: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(contents)?)
    }

    /// Read options from a file; `.json` files are parsed as JSON, anything
    /// else as TOML.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let contents = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let is_json = path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
        debug!(path = %path.display(), is_json, "Loading generator options.");
        if is_json {
            Self::from_json(&contents)
        } else {
            Self::from_toml(&contents)
        }
    }
}
