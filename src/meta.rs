//! Argument metadata shared by the builder and the reader.

use serde::{Deserialize, Serialize};
use std::fmt;

/// The kind of argument.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[repr(u8)]
pub enum ArgKind {
    /// A presence-only flag (e.g., -v). May repeat and may be stacked (-vvv).
    Switch = 0,
    /// A flag followed by a payload token (e.g., --output file.txt)
    Option = 1,
    /// A positional argument, identified by position rather than by name
    Value = 2,
}

impl ArgKind {
    /// The stable numeric code of this kind, used in diagnostics.
    pub fn code(self) -> u8 {
        self as u8
    }
}

impl fmt::Display for ArgKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArgKind::Switch => f.write_str("Switch"),
            ArgKind::Option => f.write_str("Option"),
            ArgKind::Value => f.write_str("Value"),
        }
    }
}

/// Everything known about one registered argument.
///
/// Immutable once created. When an argument has both a short and a long
/// name, both lookup tables hold the same metadata and share one counter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ArgMeta<TId> {
    id: TId,
    kind: ArgKind,
    short_name: Option<char>,
    long_name: Option<String>,
    value_name: Option<String>,
    min: u32,
    max: u32,
    help: Option<String>,
}

impl<TId> ArgMeta<TId> {
    /// Create metadata without validating it.
    ///
    /// `ReaderBuilder` is the checked way to produce metadata; this exists for
    /// readers assembled by hand through `Reader::from_tables`.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        id: TId,
        kind: ArgKind,
        short_name: Option<char>,
        long_name: Option<String>,
        value_name: Option<String>,
        min: u32,
        max: u32,
        help: Option<String>,
    ) -> Self {
        Self {
            id,
            kind,
            short_name,
            long_name,
            value_name,
            min,
            max,
            help,
        }
    }

    pub fn id(&self) -> &TId {
        &self.id
    }

    pub fn kind(&self) -> ArgKind {
        self.kind
    }

    pub fn short_name(&self) -> Option<char> {
        self.short_name
    }

    pub fn long_name(&self) -> Option<&str> {
        self.long_name.as_deref()
    }

    /// Friendly name of a positional value (e.g., "FILE"). Never a lookup key.
    pub fn value_name(&self) -> Option<&str> {
        self.value_name.as_deref()
    }

    /// The minimum number of times this argument should appear.
    pub fn min(&self) -> u32 {
        self.min
    }

    /// The maximum number of times this argument may appear.
    pub fn max(&self) -> u32 {
        self.max
    }

    pub fn help(&self) -> Option<&str> {
        self.help.as_deref()
    }

    /// The spelling a user would type for this argument.
    ///
    /// Prefers the long form (`--verbose`), falls back to the short form
    /// (`-v`), and returns `None` for positional values.
    pub fn canonical_flag(&self) -> Option<String> {
        if let Some(long) = &self.long_name {
            return Some(format!("--{}", long));
        }
        self.short_name.map(|c| format!("-{}", c))
    }

    /// Fill in whichever names this metadata lacks from an alias registration.
    pub(crate) fn merge_names(&mut self, short: Option<char>, long: Option<&str>) {
        if self.short_name.is_none() {
            self.short_name = short;
        }
        if self.long_name.is_none() {
            self.long_name = long.map(str::to_string);
        }
    }
}

/// An argument id paired with the maximum number of times it may appear.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IdCount<TId> {
    pub id: TId,
    pub max: u32,
}

impl<TId> IdCount<TId> {
    pub fn new(id: TId, max: u32) -> Self {
        Self { id, max }
    }
}

impl<TId: Clone> From<&ArgMeta<TId>> for IdCount<TId> {
    fn from(meta: &ArgMeta<TId>) -> Self {
        Self::new(meta.id.clone(), meta.max)
    }
}
