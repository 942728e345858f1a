//! Events produced by the reader.

use serde::Serialize;

/// What a single event represents.
///
/// The first six variants are successful reads; the rest describe input
/// errors, in which case the event's content is a diagnostic message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum ArgState {
    /// A positional value.
    Value,
    /// A long option and its payload (e.g., --output file.txt)
    LongOption,
    /// A short option and its payload (e.g., -o file.txt)
    ShortOption,
    /// A long switch (e.g., --verbose)
    LongSwitch,
    /// A short switch (e.g., -v)
    ShortSwitch,
    /// One switch out of a stacked sequence; -abc is shorthand for -a -b -c
    StackedSwitch,

    /// Some other error, such as metadata with a kind that cannot be a flag.
    OtherError,
    /// A short argument that was not recognized.
    ShortUnrecognized,
    /// A long argument that was not recognized.
    LongUnrecognized,
    /// A short option was found among stacked switches, e.g. "-so" with -o an option.
    ShortOptionFoundInStackedSwitches,
    /// An option appeared more often than its maximum.
    TooManyOptions,
    /// A switch appeared more often than its maximum.
    TooManySwitches,
    /// More positional values than all value arguments allow together.
    TooManyValues,
}

impl ArgState {
    /// True for the successful variants.
    pub fn is_ok(self) -> bool {
        matches!(
            self,
            ArgState::Value
                | ArgState::LongOption
                | ArgState::ShortOption
                | ArgState::LongSwitch
                | ArgState::ShortSwitch
                | ArgState::StackedSwitch
        )
    }
}

/// An argument that has been read but not yet interpreted by a consumer.
///
/// `content` holds an option's payload or a positional value, is empty for
/// switches, and carries a human-readable message for error states. `id` is
/// the default value for unrecognized and structural errors.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RawArg<TId> {
    pub id: TId,
    pub content: String,
    pub state: ArgState,
}

impl<TId> RawArg<TId> {
    pub fn new(id: TId, content: impl Into<String>, state: ArgState) -> Self {
        Self {
            id,
            content: content.into(),
            state,
        }
    }

    pub fn is_ok(&self) -> bool {
        self.state.is_ok()
    }
}

impl<TId: Default> RawArg<TId> {
    /// An event with no meaningful id.
    pub fn anonymous(content: impl Into<String>, state: ArgState) -> Self {
        Self::new(TId::default(), content, state)
    }
}

/// How a consumer reacts to error events.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ErrorPolicy {
    /// Stop pulling events at the first error.
    #[default]
    StopAtFirst,
    /// Read every token and report all errors together.
    CollectAll,
}
