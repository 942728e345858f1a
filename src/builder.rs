//! Validated registration of arguments into a `Reader`.

use crate::meta::{ArgKind, ArgMeta};
use crate::reader::Reader;
use std::collections::HashMap;
use std::fmt::Debug;
use std::hash::Hash;
use thiserror::Error;
use tracing::debug;

/// Mistakes made while registering arguments.
///
/// These are programming errors; user input can never produce one.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("short argument is a control character, use one that can be typed easily: {0:?}")]
    ControlShortName(char),

    #[error("short argument was a single dash")]
    DashShortName,

    #[error("short argument has already been used: -{0}")]
    DuplicateShortName(char),

    #[error("long argument was empty or entirely whitespace")]
    BlankLongName,

    #[error("long argument may not start with a dash: {0}")]
    DashLongName(String),

    #[error("long argument may not be a single character, use a short argument instead: {0}")]
    SingleCharLongName(String),

    #[error("long argument has already been used: --{0}")]
    DuplicateLongName(String),

    #[error("argument {0} has neither a short nor a long name")]
    MissingName(String),

    #[error("argument {id} has min {min} greater than max {max}")]
    MinExceedsMax { id: String, min: u32, max: u32 },

    #[error("argument {0} was registered again with a different kind or arity")]
    DivergentArity(String),

    #[error("positional value {0} has already been registered")]
    DuplicateValue(String),
}

/// How long names are compared.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum NameCase {
    #[default]
    Sensitive,
    /// `--Verbose` and `--verbose` are the same argument.
    Insensitive,
}

impl NameCase {
    /// The lookup key for a long name under this comparison.
    pub(crate) fn key(self, name: &str) -> String {
        match self {
            NameCase::Sensitive => name.to_string(),
            NameCase::Insensitive => name.to_lowercase(),
        }
    }
}

/// Collects argument registrations and produces a `Reader`.
///
/// Every registration is validated immediately. A failed call returns an
/// error and leaves the builder exactly as it was.
#[derive(Debug, Clone)]
pub struct ReaderBuilder<TId> {
    short_args: HashMap<char, ArgMeta<TId>>,
    long_args: HashMap<String, ArgMeta<TId>>,
    ordered_values: Vec<ArgMeta<TId>>,
    ordered_all: Vec<ArgMeta<TId>>,
    long_case: NameCase,
}

impl<TId> Default for ReaderBuilder<TId> {
    fn default() -> Self {
        Self {
            short_args: HashMap::new(),
            long_args: HashMap::new(),
            ordered_values: Vec::new(),
            ordered_all: Vec::new(),
            long_case: NameCase::default(),
        }
    }
}

impl<TId> ReaderBuilder<TId>
where
    TId: Clone + Eq + Hash + Default + Debug,
{
    pub fn new() -> Self {
        Self::default()
    }

    /// An empty builder that compares long names with `case`.
    pub fn new_with_long_case(case: NameCase) -> Self {
        Self {
            long_case: case,
            ..Self::default()
        }
    }

    /// Set how long names are compared.
    ///
    /// Existing long names are re-keyed; fails with `DuplicateLongName` if two
    /// of them collide under the new comparison.
    pub fn with_long_case(&mut self, case: NameCase) -> Result<&mut Self, ConfigError> {
        let mut rekeyed = HashMap::with_capacity(self.long_args.len());
        for (key, meta) in &self.long_args {
            // An alias key may not match the long name kept on the metadata.
            let name = meta
                .long_name()
                .filter(|name| self.long_case.key(name) == *key)
                .unwrap_or(key);
            if rekeyed.insert(case.key(name), meta.clone()).is_some() {
                return Err(ConfigError::DuplicateLongName(name.to_string()));
            }
        }
        self.long_args = rekeyed;
        self.long_case = case;
        Ok(self)
    }

    /// Register a presence-only flag.
    pub fn switch(
        &mut self,
        id: TId,
        short: Option<char>,
        long: Option<&str>,
        min: u32,
        max: u32,
        help: Option<&str>,
    ) -> Result<&mut Self, ConfigError> {
        self.register(id, ArgKind::Switch, short, long, None, min, max, help)
    }

    /// Register a flag that takes the following token as its payload.
    pub fn option(
        &mut self,
        id: TId,
        short: Option<char>,
        long: Option<&str>,
        min: u32,
        max: u32,
        help: Option<&str>,
    ) -> Result<&mut Self, ConfigError> {
        self.register(id, ArgKind::Option, short, long, None, min, max, help)
    }

    /// Register a positional value. Values are matched in registration order.
    pub fn value(
        &mut self,
        id: TId,
        friendly_name: Option<&str>,
        min: u32,
        max: u32,
        help: Option<&str>,
    ) -> Result<&mut Self, ConfigError> {
        self.register(id, ArgKind::Value, None, None, friendly_name, min, max, help)
    }

    /// Snapshot the registrations into an immutable `Reader`.
    pub fn build(&self) -> Reader<TId> {
        Reader::from_tables(
            self.short_args.clone(),
            self.long_args.clone(),
            self.ordered_values.clone(),
            self.ordered_all.clone(),
            self.long_case,
        )
    }

    pub fn ordered_all(&self) -> &[ArgMeta<TId>] {
        &self.ordered_all
    }

    pub fn ordered_values(&self) -> &[ArgMeta<TId>] {
        &self.ordered_values
    }

    pub fn short_arg(&self, name: char) -> Option<&ArgMeta<TId>> {
        self.short_args.get(&name)
    }

    pub fn long_arg(&self, name: &str) -> Option<&ArgMeta<TId>> {
        self.long_args.get(&self.long_case.key(name))
    }

    #[allow(clippy::too_many_arguments)]
    fn register(
        &mut self,
        id: TId,
        kind: ArgKind,
        short: Option<char>,
        long: Option<&str>,
        value_name: Option<&str>,
        min: u32,
        max: u32,
        help: Option<&str>,
    ) -> Result<&mut Self, ConfigError> {
        // Validate everything before touching any table.
        if kind != ArgKind::Value && short.is_none() && long.is_none() {
            return Err(ConfigError::MissingName(format!("{:?}", id)));
        }
        if min > max {
            return Err(ConfigError::MinExceedsMax {
                id: format!("{:?}", id),
                min,
                max,
            });
        }
        if let Some(c) = short {
            self.check_short_name(c)?;
        }
        let long_key = match long {
            Some(name) => Some(self.check_long_name(name)?),
            None => None,
        };
        self.check_alias(&id, kind, min, max)?;

        let meta = match self.ordered_all.iter().position(|meta| *meta.id() == id) {
            Some(index) => {
                let existing = &mut self.ordered_all[index];
                existing.merge_names(short, long);
                existing.clone()
            }
            None => {
                let meta = ArgMeta::new(
                    id,
                    kind,
                    short,
                    long.map(str::to_string),
                    value_name.map(str::to_string),
                    min,
                    max,
                    help.map(str::to_string),
                );
                if kind == ArgKind::Value {
                    self.ordered_values.push(meta.clone());
                }
                self.ordered_all.push(meta.clone());
                meta
            }
        };
        debug!(id = ?meta.id(), kind = %kind, ?short, ?long, min, max, "registered argument");

        // Every name of an id resolves to the same metadata.
        for entry in self
            .short_args
            .values_mut()
            .chain(self.long_args.values_mut())
            .filter(|entry| entry.id() == meta.id())
        {
            *entry = meta.clone();
        }
        if let Some(c) = short {
            self.short_args.insert(c, meta.clone());
        }
        if let Some(key) = long_key {
            self.long_args.insert(key, meta);
        }
        Ok(self)
    }

    fn check_short_name(&self, name: char) -> Result<(), ConfigError> {
        if name.is_control() {
            return Err(ConfigError::ControlShortName(name));
        }
        if name == '-' {
            return Err(ConfigError::DashShortName);
        }
        if self.short_args.contains_key(&name) {
            return Err(ConfigError::DuplicateShortName(name));
        }
        Ok(())
    }

    /// Returns the table key for a valid long name.
    fn check_long_name(&self, name: &str) -> Result<String, ConfigError> {
        if name.trim().is_empty() {
            return Err(ConfigError::BlankLongName);
        }
        if name.starts_with('-') {
            return Err(ConfigError::DashLongName(name.to_string()));
        }
        if name.chars().count() == 1 {
            return Err(ConfigError::SingleCharLongName(name.to_string()));
        }
        let key = self.long_case.key(name);
        if self.long_args.contains_key(&key) {
            return Err(ConfigError::DuplicateLongName(name.to_string()));
        }
        Ok(key)
    }

    /// A named id may be registered more than once only with the same kind and
    /// arity. Positional values have no names to alias.
    fn check_alias(&self, id: &TId, kind: ArgKind, min: u32, max: u32) -> Result<(), ConfigError> {
        let existing = match self.ordered_all.iter().find(|meta| meta.id() == id) {
            Some(existing) => existing,
            None => return Ok(()),
        };
        if existing.kind() != kind || existing.min() != min || existing.max() != max {
            return Err(ConfigError::DivergentArity(format!("{:?}", id)));
        }
        if kind == ArgKind::Value {
            return Err(ConfigError::DuplicateValue(format!("{:?}", id)));
        }
        Ok(())
    }
}
