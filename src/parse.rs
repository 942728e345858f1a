//! The contract between the reader and the types that consume its events.

use crate::event::RawArg;
use crate::meta::ArgMeta;
use crate::reader::Reader;
use std::collections::HashMap;
use std::hash::Hash;

/// Outcome of folding events into a value: the value, or an error message.
pub type ParseResult<T> = Result<T, String>;

/// A type that can be assembled from reader events.
///
/// Implementors supply the reader describing their arguments and a fold over
/// the events. By convention `parse` returns the content of the first error
/// event it meets and checks required fields itself.
pub trait Parseable<TId>: Sized
where
    TId: Clone + Eq + Hash + Default,
{
    /// The reader that recognizes this type's arguments.
    fn reader() -> Reader<TId>;

    fn parse<I>(events: I) -> ParseResult<Self>
    where
        I: Iterator<Item = RawArg<TId>>;

    /// Read `tokens` with `Self::reader()` and fold the result.
    fn parse_from<T>(tokens: T) -> ParseResult<Self>
    where
        T: IntoIterator,
        T::Item: Into<String>,
    {
        let reader = Self::reader();
        Self::parse(reader.read(tokens))
    }
}

/// Arguments that occurred fewer times than their declared minimum.
///
/// Only successful events are counted. Results follow registration order.
pub fn missing_required<'r, TId>(
    reader: &'r Reader<TId>,
    events: &[RawArg<TId>],
) -> Vec<&'r ArgMeta<TId>>
where
    TId: Clone + Eq + Hash + Default,
{
    let mut seen: HashMap<&TId, u32> = HashMap::new();
    for event in events.iter().filter(|e| e.is_ok()) {
        *seen.entry(&event.id).or_insert(0) += 1;
    }

    reader
        .ordered_all()
        .iter()
        .filter(|meta| seen.get(meta.id()).copied().unwrap_or(0) < meta.min())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::ReaderBuilder;
    use crate::event::ArgState;

    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    enum Id {
        #[default]
        None,
        A,
        B,
        C,
        D,
        E,
        F,
    }

    #[derive(Debug, PartialEq)]
    struct Args {
        a: String,
        b: String,
        c: String,
        d: bool,
        e: bool,
        f: bool,
    }

    impl Parseable<Id> for Args {
        fn reader() -> Reader<Id> {
            ReaderBuilder::new()
                .option(Id::A, Some('a'), Some("alpha"), 1, 1, None)
                .unwrap()
                .option(Id::B, Some('b'), Some("bravo"), 1, 1, None)
                .unwrap()
                .option(Id::C, Some('c'), Some("charlie"), 1, 1, None)
                .unwrap()
                .switch(Id::D, Some('d'), Some("delta"), 0, 1, None)
                .unwrap()
                .switch(Id::E, Some('e'), Some("echo"), 0, 1, None)
                .unwrap()
                .switch(Id::F, Some('f'), Some("foxtrot"), 0, 1, None)
                .unwrap()
                .build()
        }

        fn parse<I>(events: I) -> ParseResult<Self>
        where
            I: Iterator<Item = RawArg<Id>>,
        {
            let (mut a, mut b, mut c) = (None, None, None);
            let (mut d, mut e, mut f) = (false, false, false);
            for event in events {
                if !event.is_ok() {
                    return Err(event.content);
                }
                match event.id {
                    Id::A => a = Some(event.content),
                    Id::B => b = Some(event.content),
                    Id::C => c = Some(event.content),
                    Id::D => d = true,
                    Id::E => e = true,
                    Id::F => f = true,
                    Id::None => return Err("No values accepted".to_string()),
                }
            }
            match (a, b, c) {
                (Some(a), Some(b), Some(c)) => Ok(Args { a, b, c, d, e, f }),
                _ => Err("Missing arguments".to_string()),
            }
        }
    }

    #[test]
    fn test_parsing_to_object() {
        let parsed = Args::parse_from([
            "-a",
            "alpha value",
            "--bravo",
            "bravo value",
            "--charlie",
            "charlie value",
            "--echo",
            "-f",
        ])
        .unwrap();
        assert_eq!(
            parsed,
            Args {
                a: "alpha value".to_string(),
                b: "bravo value".to_string(),
                c: "charlie value".to_string(),
                d: false,
                e: true,
                f: true,
            }
        );
    }

    #[test]
    fn test_first_error_becomes_the_message() {
        let err = Args::parse_from(["-a", "x", "--zulu", "-q"]).unwrap_err();
        assert_eq!(err, "Unrecognized long argument: --zulu");
    }

    #[test]
    fn test_consumer_checks_completeness() {
        let err = Args::parse_from(["-a", "x"]).unwrap_err();
        assert_eq!(err, "Missing arguments");
    }

    #[test]
    fn test_missing_required_in_registration_order() {
        let reader = Args::reader();
        let events: Vec<RawArg<Id>> = reader.read(["-b", "x", "-d"]).collect();
        let missing: Vec<Id> = missing_required(&reader, &events)
            .into_iter()
            .map(|m| *m.id())
            .collect();
        assert_eq!(missing, vec![Id::A, Id::C]);
    }

    #[test]
    fn test_missing_required_ignores_errors() {
        let reader = Args::reader();
        let events = vec![RawArg::new(
            Id::A,
            "Option was provided too many times: -a",
            ArgState::TooManyOptions,
        )];
        let missing = missing_required(&reader, &events);
        assert_eq!(missing.len(), 3);
    }

    #[test]
    fn test_missing_required_counts_values() {
        let reader = ReaderBuilder::new()
            .value(Id::A, Some("SRC"), 2, 3, None)
            .unwrap()
            .build();
        let events: Vec<RawArg<Id>> = reader.read(["one"]).collect();
        assert_eq!(missing_required(&reader, &events).len(), 1);

        let events: Vec<RawArg<Id>> = reader.read(["one", "two"]).collect();
        assert!(missing_required(&reader, &events).is_empty());
    }

    #[test]
    fn test_aliased_id_reported_once() {
        let reader = ReaderBuilder::new()
            .switch(Id::D, Some('d'), None, 1, 1, None)
            .unwrap()
            .switch(Id::D, None, Some("delta"), 1, 1, None)
            .unwrap()
            .build();
        assert_eq!(missing_required(&reader, &[]).len(), 1);
    }
}
