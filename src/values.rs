//! Expansion of positional value arity into one id per expected slot.

use crate::meta::IdCount;
use std::iter::FusedIterator;

/// Walks a list of `(id, max)` pairs, yielding each id `max` times in a row
/// before moving to the next pair.
///
/// Every positional token pulls one id from this stream. Once the stream is
/// exhausted, every declared value has reached its maximum.
#[derive(Debug, Clone)]
pub struct DuplicatingValues<'a, TId> {
    counts: &'a [IdCount<TId>],
    index: usize,
    taken: u32,
}

impl<'a, TId> DuplicatingValues<'a, TId> {
    pub fn new(counts: &'a [IdCount<TId>]) -> Self {
        Self {
            counts,
            index: 0,
            taken: 0,
        }
    }

    /// Next expected value id, or `None` when all slots are used up.
    ///
    /// Pairs with `max == 0` contribute no slots.
    pub fn advance(&mut self) -> Option<&'a TId> {
        while let Some(current) = self.counts.get(self.index) {
            if self.taken < current.max {
                self.taken += 1;
                return Some(&current.id);
            }
            self.index += 1;
            self.taken = 0;
        }
        None
    }

    /// Start over from the first pair.
    pub fn reset(&mut self) {
        self.index = 0;
        self.taken = 0;
    }
}

impl<'a, TId> Iterator for DuplicatingValues<'a, TId> {
    type Item = &'a TId;

    fn next(&mut self) -> Option<Self::Item> {
        self.advance()
    }
}

impl<TId> FusedIterator for DuplicatingValues<'_, TId> {}
