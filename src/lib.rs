//! argstream - classify command-line tokens into a typed event stream.
//!
//! Arguments are registered on a `ReaderBuilder`, which validates names and
//! arity up front. The resulting `Reader` turns process arguments into a lazy
//! sequence of `RawArg` events: one per token (stacked switches yield one per
//! character), with occurrence limits enforced and unknown or malformed input
//! reported as error events rather than failures.

pub mod builder;
pub mod config;
pub mod event;
pub mod meta;
pub mod parse;
pub mod reader;
pub mod values;

pub use builder::{ConfigError, NameCase, ReaderBuilder};
pub use config::{ArgSchema, Schema, SchemaError};
pub use event::{ArgState, ErrorPolicy, RawArg};
pub use meta::{ArgKind, ArgMeta, IdCount};
pub use parse::{missing_required, ParseResult, Parseable};
pub use reader::{Events, ReadErrors, Reader};
pub use values::DuplicatingValues;
