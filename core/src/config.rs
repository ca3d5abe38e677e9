#![deny(missing_docs)]

//! # Generator Configuration
//!
//! Every knob has a default, so an empty file (or no file) is a valid config.
//! Files are read with `serde_yaml`, which also accepts JSON.

use crate::error::{AppError, AppResult};
use crate::naming::case::is_valid_identifier;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Settings of one generation run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GeneratorConfig {
    /// Protocol prefix tried by name resolution (`Rpc`).
    pub name_prefix: String,
    /// Wire prefix of experimental methods (`EXPERIMENTAL_`).
    pub experimental_prefix: String,
    /// Suffix of validator constructor names (`Schema`).
    pub validator_suffix: String,
    /// Nesting depth after which nodes render as unknown.
    pub max_depth: usize,
    /// Use the just-emitted schema declarations as known type names when no
    /// external source is configured.
    pub introspect_emitted: bool,
    /// Name of the method interface.
    pub interface_name: String,
    /// Name of the validation lookup table.
    pub validation_map_name: String,
    /// Name of the wire method-name list.
    pub method_list_name: String,
    /// Name of the wire method-name union type.
    pub method_type_name: String,
    /// File name of the type unit.
    pub types_file: String,
    /// File name of the validator unit.
    pub schemas_file: String,
    /// File name of the validation table.
    pub validation_file: String,
    /// File name of the method interface.
    pub methods_file: String,
    /// File name of the JSON manifest; `None` disables it.
    pub manifest_file: Option<String>,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            name_prefix: "Rpc".into(),
            experimental_prefix: "EXPERIMENTAL_".into(),
            validator_suffix: "Schema".into(),
            max_depth: crate::emit::DEFAULT_MAX_DEPTH,
            introspect_emitted: true,
            interface_name: "RpcMethods".into(),
            validation_map_name: "VALIDATION_SCHEMA_MAP".into(),
            method_list_name: "RPC_METHODS".into(),
            method_type_name: "RpcMethod".into(),
            types_file: "types.ts".into(),
            schemas_file: "schemas.ts".into(),
            validation_file: "validation.ts".into(),
            methods_file: "methods.ts".into(),
            manifest_file: Some("manifest.json".into()),
        }
    }
}

impl GeneratorConfig {
    /// Parses a YAML or JSON config.
    pub fn parse_str(content: &str) -> AppResult<Self> {
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        let config: Self = serde_yaml::from_str(content)
            .map_err(|e| AppError::Config(format!("Invalid config: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Reads and parses a config file.
    pub fn from_path(path: &Path) -> AppResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            AppError::Config(format!("Failed to read config {:?}: {}", path, e))
        })?;
        Self::parse_str(&content)
    }

    /// Checks that exported names and name affixes are identifiers and output
    /// files are distinct.
    pub fn validate(&self) -> AppResult<()> {
        if self.max_depth == 0 {
            return Err(AppError::Config("max_depth must be at least 1".into()));
        }

        let identifiers = [
            ("interface_name", &self.interface_name),
            ("validation_map_name", &self.validation_map_name),
            ("method_list_name", &self.method_list_name),
            ("method_type_name", &self.method_type_name),
        ];
        for (field, value) in identifiers {
            if !is_valid_identifier(value) {
                return Err(AppError::Config(format!(
                    "{} '{}' is not a valid identifier",
                    field, value
                )));
            }
        }

        let affixes = [
            ("name_prefix", &self.name_prefix),
            ("validator_suffix", &self.validator_suffix),
        ];
        for (field, value) in affixes {
            if !value.is_empty() && !is_valid_identifier(value) {
                return Err(AppError::Config(format!(
                    "{} '{}' must be empty or a valid identifier",
                    field, value
                )));
            }
        }

        let mut seen: Vec<&str> = Vec::new();
        for file in self.output_files() {
            if file.is_empty() || file.contains(['/', '\\']) {
                return Err(AppError::Config(format!(
                    "Output file name '{}' must be a plain file name",
                    file
                )));
            }
            if seen.contains(&file) {
                return Err(AppError::Config(format!(
                    "Output file name '{}' is used twice",
                    file
                )));
            }
            seen.push(file);
        }
        Ok(())
    }

    /// All configured output file names.
    pub fn output_files(&self) -> impl Iterator<Item = &str> {
        [
            Some(&self.types_file),
            Some(&self.schemas_file),
            Some(&self.validation_file),
            Some(&self.methods_file),
            self.manifest_file.as_ref(),
        ]
        .into_iter()
        .flatten()
        .map(String::as_str)
    }
}

/// Import path of a sibling output file: `types.ts` -> `./types`.
pub fn module_path(file_name: &str) -> String {
    let stem = [".d.ts", ".ts", ".mts", ".js"]
        .iter()
        .find_map(|ext| file_name.strip_suffix(ext))
        .unwrap_or(file_name);
    format!("./{}", stem)
}
