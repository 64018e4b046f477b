use std::collections::btree_map;
use std::iter::FusedIterator;
use std::rc::Rc;

use super::entry::Mre;
use super::source_group::{GsKey, SgKey};
use crate::AddressFamily;

//------------ MreRange ------------------------------------------------------

/// An iterator over a range of one of the indexes of an [Mrt](super::Mrt),
/// in the order of that index.
///
/// A range is always half-open, running from a lower bound to either an
/// upper bound or the end of the index. An empty range stands for the end
/// position of the index.
pub struct MreRange<'a, K, AF: AddressFamily, T> {
    inner: Option<btree_map::Range<'a, K, Rc<Mre<AF, T>>>>,
}

/// Range over the source-first index.
pub type SgRange<'a, AF, T = ()> = MreRange<'a, SgKey<AF>, AF, T>;

/// Range over the group-first index.
pub type GsRange<'a, AF, T = ()> = MreRange<'a, GsKey<AF>, AF, T>;

impl<'a, K, AF: AddressFamily, T> MreRange<'a, K, AF, T> {
    pub(crate) fn new(
        range: btree_map::Range<'a, K, Rc<Mre<AF, T>>>,
    ) -> Self {
        Self { inner: Some(range) }
    }

    pub(crate) fn end() -> Self {
        Self { inner: None }
    }
}

impl<'a, K, AF: AddressFamily, T> Iterator for MreRange<'a, K, AF, T> {
    type Item = &'a Rc<Mre<AF, T>>;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.as_mut()?.next().map(|(_, mre)| mre)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        match &self.inner {
            Some(range) => range.size_hint(),
            None => (0, Some(0)),
        }
    }
}

impl<K, AF: AddressFamily, T> DoubleEndedIterator for MreRange<'_, K, AF, T> {
    fn next_back(&mut self) -> Option<Self::Item> {
        self.inner.as_mut()?.next_back().map(|(_, mre)| mre)
    }
}

impl<K, AF: AddressFamily, T> FusedIterator for MreRange<'_, K, AF, T> {}
