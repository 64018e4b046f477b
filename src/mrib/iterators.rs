// Indexing the node arena with a NodeIndex cannot go out of bounds, see
// NodeArena.
#![allow(clippy::indexing_slicing)]

use std::iter::FusedIterator;

use log::trace;

use super::node::{NodeArena, NodeIndex, ROOT};
use crate::types::mrib_entry::Mrib;
use crate::AddressFamily;

//------------ MribIter ------------------------------------------------------

/// Iterator over all the entries of an [MribTable](super::MribTable).
///
/// The walk is a pre-order, depth-first traversal of the lookup trie: an
/// entry is returned before the entries for its more-specific prefixes, and
/// the 0-branch is visited before the 1-branch. So 10.0.0.0/8 comes before
/// 10.0.0.0/16, which comes before 10.128.0.0/9. This is not a sort on the
/// numerical value of the prefixes.
pub struct MribIter<'a, AF: AddressFamily> {
    nodes: &'a NodeArena<AF>,
    next: Option<NodeIndex>,
}

impl<'a, AF: AddressFamily> MribIter<'a, AF> {
    pub(crate) fn new(nodes: &'a NodeArena<AF>) -> Self {
        Self {
            nodes,
            next: Some(ROOT),
        }
    }
}

impl<'a, AF: AddressFamily> Iterator for MribIter<'a, AF> {
    type Item = &'a Mrib<AF>;

    fn next(&mut self) -> Option<Self::Item> {
        let nodes: &'a NodeArena<AF> = self.nodes;
        while let Some(idx) = self.next {
            self.next = nodes.next_in_preorder(idx);
            if let Some(mrib) = nodes[idx].mrib.as_ref() {
                trace!("mrib iter {}", mrib.dest_prefix());
                return Some(mrib);
            }
        }
        None
    }
}

impl<AF: AddressFamily> FusedIterator for MribIter<'_, AF> {}
