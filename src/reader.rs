//! The tokenizing state machine.
//!
//! A `Reader` turns a flat sequence of command-line tokens into a lazy stream
//! of `RawArg` events. Input errors never stop the scan; they are emitted as
//! events with a non-ok `ArgState` and the reader carries on with the next
//! token.

use crate::builder::NameCase;
use crate::event::{ArgState, ErrorPolicy, RawArg};
use crate::meta::{ArgKind, ArgMeta, IdCount};
use crate::values::DuplicatingValues;
use std::collections::HashMap;
use std::hash::Hash;
use std::iter::FusedIterator;
use thiserror::Error;
use tracing::{debug, trace};

/// Input errors gathered by `Events::try_collect`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{}", join_messages(.errors))]
pub struct ReadErrors<TId> {
    pub errors: Vec<RawArg<TId>>,
}

fn join_messages<TId>(errors: &[RawArg<TId>]) -> String {
    errors
        .iter()
        .map(|e| e.content.as_str())
        .collect::<Vec<_>>()
        .join("; ")
}

/// Occurrence tracking for one argument id during a single read.
#[derive(Debug, Clone, Copy)]
struct Counter {
    kind: ArgKind,
    max: u32,
    count: u32,
}

/// Immutable lookup tables produced by `ReaderBuilder::build`.
///
/// Reading never mutates the reader, so one reader can serve any number of
/// reads, including from several threads at once.
#[derive(Debug, Clone)]
pub struct Reader<TId> {
    short_args: HashMap<char, ArgMeta<TId>>,
    long_args: HashMap<String, ArgMeta<TId>>,
    ordered_values: Vec<ArgMeta<TId>>,
    ordered_all: Vec<ArgMeta<TId>>,
    long_case: NameCase,
    value_counts: Vec<IdCount<TId>>,
    // Both name tables resolve an id to the same slot.
    slots: HashMap<TId, usize>,
    counters: Vec<Counter>,
}

impl<TId> Reader<TId>
where
    TId: Clone + Eq + Hash + Default,
{
    /// Assemble a reader from tables without any validation.
    ///
    /// Long-name keys must already be folded according to `long_case`.
    /// Metadata placed here is trusted as-is, so a `Value` in a name table is
    /// reported as `ArgState::OtherError` when it is used.
    pub fn from_tables(
        short_args: HashMap<char, ArgMeta<TId>>,
        long_args: HashMap<String, ArgMeta<TId>>,
        ordered_values: Vec<ArgMeta<TId>>,
        ordered_all: Vec<ArgMeta<TId>>,
        long_case: NameCase,
    ) -> Self {
        let mut slots = HashMap::new();
        let mut counters = Vec::new();
        for meta in ordered_all
            .iter()
            .filter(|meta| meta.kind() != ArgKind::Value)
            .chain(short_args.values())
            .chain(long_args.values())
        {
            slots.entry(meta.id().clone()).or_insert_with(|| {
                counters.push(Counter {
                    kind: meta.kind(),
                    max: meta.max(),
                    count: 0,
                });
                counters.len() - 1
            });
        }
        let value_counts = ordered_values.iter().map(IdCount::from).collect();

        debug!(
            short = short_args.len(),
            long = long_args.len(),
            values = ordered_values.len(),
            "built reader"
        );
        Self {
            short_args,
            long_args,
            ordered_values,
            ordered_all,
            long_case,
            value_counts,
            slots,
            counters,
        }
    }

    /// Classify `tokens` lazily, one event per pull.
    ///
    /// Every call starts with fresh occurrence counters and a fresh positional
    /// arity stream. The token iterator is consumed as events are pulled.
    pub fn read<I>(&self, tokens: I) -> Events<'_, TId, I::IntoIter>
    where
        I: IntoIterator,
        I::Item: Into<String>,
    {
        Events {
            reader: self,
            tokens: tokens.into_iter(),
            counters: self.counters.clone(),
            values: DuplicatingValues::new(&self.value_counts),
            stacked: Vec::new().into_iter(),
            values_only: false,
        }
    }

    /// Every argument in registration order.
    pub fn ordered_all(&self) -> &[ArgMeta<TId>] {
        &self.ordered_all
    }

    /// Positional values in registration order.
    pub fn ordered_values(&self) -> &[ArgMeta<TId>] {
        &self.ordered_values
    }

    pub fn short_arg(&self, name: char) -> Option<&ArgMeta<TId>> {
        self.short_args.get(&name)
    }

    pub fn long_arg(&self, name: &str) -> Option<&ArgMeta<TId>> {
        self.long_args.get(&self.long_case.key(name))
    }

    pub fn long_case(&self) -> NameCase {
        self.long_case
    }
}

#[derive(Debug, Clone, Copy)]
enum Form {
    Short,
    Long,
}

impl Form {
    fn switch_state(self) -> ArgState {
        match self {
            Form::Short => ArgState::ShortSwitch,
            Form::Long => ArgState::LongSwitch,
        }
    }

    fn option_state(self) -> ArgState {
        match self {
            Form::Short => ArgState::ShortOption,
            Form::Long => ArgState::LongOption,
        }
    }

    fn unrecognized(self, token: &str) -> (String, ArgState) {
        match self {
            Form::Short => (
                format!("Unrecognized short argument: {}", token),
                ArgState::ShortUnrecognized,
            ),
            Form::Long => (
                format!("Unrecognized long argument: {}", token),
                ArgState::LongUnrecognized,
            ),
        }
    }
}

/// The lazy event stream returned by `Reader::read`.
///
/// Single pass and not restartable: call `Reader::read` again to start over.
#[derive(Debug)]
pub struct Events<'r, TId, I> {
    reader: &'r Reader<TId>,
    tokens: I,
    counters: Vec<Counter>,
    values: DuplicatingValues<'r, TId>,
    // Remaining characters of a stacked-switch token such as -abc.
    stacked: std::vec::IntoIter<char>,
    values_only: bool,
}

impl<'r, TId, I> Events<'r, TId, I>
where
    TId: Clone + Eq + Hash + Default,
    I: Iterator,
    I::Item: Into<String>,
{
    /// Drain the stream, applying `policy` to error events.
    ///
    /// Returns the successful events when there were no errors. With
    /// `ErrorPolicy::StopAtFirst`, nothing after the first error is read.
    pub fn try_collect(self, policy: ErrorPolicy) -> Result<Vec<RawArg<TId>>, ReadErrors<TId>> {
        let mut events = Vec::new();
        let mut errors = Vec::new();
        for event in self {
            if event.is_ok() {
                events.push(event);
                continue;
            }
            errors.push(event);
            if policy == ErrorPolicy::StopAtFirst {
                break;
            }
        }
        if errors.is_empty() {
            Ok(events)
        } else {
            Err(ReadErrors { errors })
        }
    }

    fn classify(&mut self, token: String) -> RawArg<TId> {
        let reader = self.reader;
        if let Some(name) = token.strip_prefix("--") {
            return self.named(&token, reader.long_arg(name), Form::Long);
        }
        if let Some(rest) = token.strip_prefix('-') {
            let mut chars = rest.chars();
            match (chars.next(), chars.next()) {
                // A lone dash is a value, conventionally stdin.
                (None, _) => {}
                (Some(c), None) => return self.named(&token, reader.short_arg(c), Form::Short),
                (Some(first), Some(_)) => {
                    self.stacked = rest.chars().skip(1).collect::<Vec<_>>().into_iter();
                    return self.stacked_switch(first);
                }
            }
        }
        self.value(token)
    }

    fn named(&mut self, token: &str, meta: Option<&'r ArgMeta<TId>>, form: Form) -> RawArg<TId> {
        let Some(meta) = meta else {
            let (message, state) = form.unrecognized(token);
            return self.error(RawArg::anonymous(message, state));
        };
        match meta.kind() {
            ArgKind::Switch => {
                if self.bump(meta.id()) {
                    RawArg::new(meta.id().clone(), "", form.switch_state())
                } else {
                    self.error(RawArg::new(
                        meta.id().clone(),
                        format!("Switch was provided too many times: {}", token),
                        ArgState::TooManySwitches,
                    ))
                }
            }
            ArgKind::Option => {
                // The payload is consumed even when the option is over its limit.
                let payload: Option<String> = self.tokens.next().map(Into::into);
                if self.bump(meta.id()) {
                    RawArg::new(meta.id().clone(), payload.unwrap_or_default(), form.option_state())
                } else {
                    self.error(RawArg::new(
                        meta.id().clone(),
                        format!("Option was provided too many times: {}", token),
                        ArgState::TooManyOptions,
                    ))
                }
            }
            ArgKind::Value => self.error(invalid_kind(token, meta.kind())),
        }
    }

    fn stacked_switch(&mut self, c: char) -> RawArg<TId> {
        let reader = self.reader;
        let Some(meta) = reader.short_arg(c) else {
            return self.error(RawArg::anonymous(
                format!("Unrecognized switch found in stacked switches: {}", c),
                ArgState::ShortUnrecognized,
            ));
        };
        match meta.kind() {
            ArgKind::Switch => {
                if self.bump(meta.id()) {
                    RawArg::new(meta.id().clone(), "", ArgState::StackedSwitch)
                } else {
                    self.error(RawArg::new(
                        meta.id().clone(),
                        format!("Switch was provided too many times in stacked switches: {}", c),
                        ArgState::TooManySwitches,
                    ))
                }
            }
            // Options cannot be stacked; the next token is left alone.
            ArgKind::Option => self.error(RawArg::new(
                meta.id().clone(),
                format!("A short option was found in stacked switches: {}", c),
                ArgState::ShortOptionFoundInStackedSwitches,
            )),
            ArgKind::Value => self.error(invalid_kind(&format!("-{}", c), meta.kind())),
        }
    }

    fn value(&mut self, token: String) -> RawArg<TId> {
        match self.values.advance() {
            Some(id) => RawArg::new(id.clone(), token, ArgState::Value),
            None => self.error(RawArg::anonymous(
                format!("Too many values were provided: {}", token),
                ArgState::TooManyValues,
            )),
        }
    }

    /// Count one more occurrence of `id`; false once it exceeds its max.
    fn bump(&mut self, id: &TId) -> bool {
        let Some(&slot) = self.reader.slots.get(id) else {
            return true;
        };
        let counter = &mut self.counters[slot];
        counter.count = counter.count.saturating_add(1);
        trace!(kind = %counter.kind, count = counter.count, max = counter.max, "counted occurrence");
        counter.count <= counter.max
    }

    fn error(&self, event: RawArg<TId>) -> RawArg<TId> {
        debug!(state = ?event.state, message = %event.content, "input error");
        event
    }
}

fn invalid_kind<TId: Default>(token: &str, kind: ArgKind) -> RawArg<TId> {
    RawArg::anonymous(
        format!(
            "ArgKind value was not valid for argument \"{}\": {}",
            token,
            kind.code()
        ),
        ArgState::OtherError,
    )
}

impl<'r, TId, I> Iterator for Events<'r, TId, I>
where
    TId: Clone + Eq + Hash + Default,
    I: Iterator,
    I::Item: Into<String>,
{
    type Item = RawArg<TId>;

    fn next(&mut self) -> Option<Self::Item> {
        if let Some(c) = self.stacked.next() {
            return Some(self.stacked_switch(c));
        }
        loop {
            let token: String = self.tokens.next()?.into();
            trace!(token = %token, values_only = self.values_only, "classifying token");
            if self.values_only {
                return Some(self.value(token));
            }
            if token == "--" {
                self.values_only = true;
                continue;
            }
            return Some(self.classify(token));
        }
    }
}

impl<'r, TId, I> FusedIterator for Events<'r, TId, I>
where
    TId: Clone + Eq + Hash + Default,
    I: FusedIterator,
    I::Item: Into<String>,
{
}
