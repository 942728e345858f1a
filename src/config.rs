//! JSON argument schemas for building a `Reader` without writing Rust.

use crate::builder::{ConfigError, NameCase, ReaderBuilder};
use crate::meta::ArgKind;
use crate::reader::Reader;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::debug;

/// The only schema version understood so far.
pub const SCHEMA_VERSION: u32 = 1;

/// Errors that can occur while loading a schema.
#[derive(Debug, Error)]
pub enum SchemaError {
    #[error("failed to parse JSON schema: {0}")]
    Json(#[from] serde_json::Error),

    #[error("failed to read schema file {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("unsupported schema version {0} (supported: 1)")]
    UnsupportedSchemaVersion(u32),

    #[error("value argument '{0}' cannot have a short or long name")]
    NamedValue(String),

    #[error("argument '{name}': {source}")]
    Register { name: String, source: ConfigError },
}

fn default_max() -> u32 {
    1
}

/// Schema entry for a single argument.
#[derive(Debug, Clone, Deserialize)]
pub struct ArgSchema {
    /// The argument's id in emitted events
    pub name: String,
    #[serde(rename = "type")]
    pub kind: ArgKind,
    /// Short option character (e.g., 'v' for -v)
    pub short: Option<char>,
    /// Long option name without dashes (e.g., "verbose" for --verbose)
    pub long: Option<String>,
    /// Display name for a positional value (e.g., "FILE")
    pub value_name: Option<String>,
    /// Shorthand for `min: 1`
    #[serde(default)]
    pub required: bool,
    #[serde(default)]
    pub min: u32,
    #[serde(default = "default_max")]
    pub max: u32,
    pub help: Option<String>,
}

impl ArgSchema {
    /// The effective minimum, taking `required` into account.
    pub fn effective_min(&self) -> u32 {
        if self.required {
            self.min.max(1)
        } else {
            self.min
        }
    }
}

fn default_schema_version() -> u32 {
    SCHEMA_VERSION
}

/// Top-level schema document.
#[derive(Debug, Clone, Deserialize)]
pub struct Schema {
    #[serde(default = "default_schema_version")]
    pub schema_version: u32,
    /// Name of the program being described
    pub name: Option<String>,
    /// Compare long names without regard to case
    #[serde(default)]
    pub case_insensitive: bool,
    #[serde(default)]
    pub args: Vec<ArgSchema>,
}

impl Schema {
    /// Parse a JSON string into a Schema.
    pub fn from_json(json: &str) -> Result<Schema, SchemaError> {
        let schema: Schema = serde_json::from_str(json)?;
        Ok(schema)
    }

    /// Read and parse a JSON schema file.
    pub fn from_file(path: &Path) -> Result<Schema, SchemaError> {
        let json = std::fs::read_to_string(path).map_err(|source| SchemaError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&json)
    }

    /// Register every argument and build the reader. Ids are argument names.
    pub fn to_reader(&self) -> Result<Reader<String>, SchemaError> {
        if self.schema_version != SCHEMA_VERSION {
            return Err(SchemaError::UnsupportedSchemaVersion(self.schema_version));
        }

        let mut builder = ReaderBuilder::new_with_long_case(if self.case_insensitive {
            NameCase::Insensitive
        } else {
            NameCase::Sensitive
        });

        for arg in &self.args {
            let id = arg.name.clone();
            let min = arg.effective_min();
            let help = arg.help.as_deref();
            let long = arg.long.as_deref();
            let registered = match arg.kind {
                ArgKind::Switch => builder.switch(id, arg.short, long, min, arg.max, help),
                ArgKind::Option => builder.option(id, arg.short, long, min, arg.max, help),
                ArgKind::Value => {
                    if arg.short.is_some() || arg.long.is_some() {
                        return Err(SchemaError::NamedValue(arg.name.clone()));
                    }
                    builder.value(id, arg.value_name.as_deref(), min, arg.max, help)
                }
            };
            registered.map_err(|source| SchemaError::Register {
                name: arg.name.clone(),
                source,
            })?;
        }

        debug!(name = ?self.name, args = self.args.len(), "loaded schema");
        Ok(builder.build())
    }
}
