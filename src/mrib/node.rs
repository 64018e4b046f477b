// Indexing the node arena with a NodeIndex cannot go out of bounds, see
// NodeArena.
#![allow(clippy::indexing_slicing)]

use std::ops::{Index, IndexMut};

use log::trace;

use crate::types::mrib_entry::Mrib;
use crate::AddressFamily;

//------------ NodeIndex -----------------------------------------------------

// The position of a lookup node in the arena of its table. Indexes are only
// ever minted by the arena itself.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub(crate) struct NodeIndex(usize);

pub(crate) const ROOT: NodeIndex = NodeIndex(0);

//------------ LookupNode ----------------------------------------------------

// A node in the binary lookup trie. The node at depth `d` on the path of an
// address represents the prefix of length `d` of that address. The left
// child continues with a 0 bit, the right child with a 1 bit.
#[derive(Debug)]
pub(crate) struct LookupNode<AF: AddressFamily> {
    pub parent: Option<NodeIndex>,
    pub left: Option<NodeIndex>,
    pub right: Option<NodeIndex>,
    pub mrib: Option<Mrib<AF>>,
}

impl<AF: AddressFamily> LookupNode<AF> {
    fn new(parent: Option<NodeIndex>) -> Self {
        Self {
            parent,
            left: None,
            right: None,
            mrib: None,
        }
    }

    pub fn child(&self, bit: bool) -> Option<NodeIndex> {
        if bit {
            self.right
        } else {
            self.left
        }
    }

    pub fn set_child(&mut self, bit: bool, child: Option<NodeIndex>) {
        if bit {
            self.right = child;
        } else {
            self.left = child;
        }
    }

    // A node without children and without an entry is not on the path to
    // any stored prefix, and should be pruned.
    pub fn is_unused(&self) -> bool {
        self.left.is_none() && self.right.is_none() && self.mrib.is_none()
    }
}

//------------ NodeArena -----------------------------------------------------

// Owns all the lookup nodes of one table. The root lives in slot 0 and is
// never released. Released slots are reset and put on the free list, slots
// are never shrunk away (except by `reset`, which drops every index along
// with the nodes holding them).
#[derive(Debug)]
pub(crate) struct NodeArena<AF: AddressFamily> {
    slots: Vec<LookupNode<AF>>,
    free: Vec<NodeIndex>,
}

impl<AF: AddressFamily> NodeArena<AF> {
    pub fn new() -> Self {
        Self {
            slots: vec![LookupNode::new(None)],
            free: vec![],
        }
    }

    // Number of live nodes, the root included.
    pub fn len(&self) -> usize {
        self.slots.len() - self.free.len()
    }

    // Number of released slots waiting to be reused.
    pub fn free_len(&self) -> usize {
        self.free.len()
    }

    pub fn alloc(&mut self, parent: NodeIndex) -> NodeIndex {
        match self.free.pop() {
            Some(idx) => {
                self[idx] = LookupNode::new(Some(parent));
                idx
            }
            None => {
                self.slots.push(LookupNode::new(Some(parent)));
                NodeIndex(self.slots.len() - 1)
            }
        }
    }

    // Unlink `idx` from its parent and put its slot on the free list.
    // Returns the parent. The root is never released.
    pub fn release(&mut self, idx: NodeIndex) -> Option<NodeIndex> {
        if idx == ROOT {
            return None;
        }
        let parent = self[idx].parent?;
        if self[parent].left == Some(idx) {
            self[parent].left = None;
        } else {
            debug_assert_eq!(self[parent].right, Some(idx));
            self[parent].right = None;
        }
        debug_assert!(self[idx].is_unused());
        self[idx] = LookupNode::new(None);
        self.free.push(idx);
        Some(parent)
    }

    // Walk from `idx` towards the root, releasing every node that has become
    // unused, and stop at the first node still in use.
    pub fn prune_from(&mut self, mut idx: NodeIndex) {
        while idx != ROOT && self[idx].is_unused() {
            trace!("prune lookup node {:?}", idx);
            match self.release(idx) {
                Some(parent) => idx = parent,
                None => break,
            }
        }
    }

    // Drop all nodes but a fresh root, and hand out the entries they held.
    pub fn reset(&mut self) -> Vec<Mrib<AF>> {
        let slots = std::mem::replace(
            &mut self.slots,
            vec![LookupNode::new(None)],
        );
        self.free.clear();
        slots.into_iter().filter_map(|node| node.mrib).collect()
    }

    // The node that follows `idx` in a pre-order, depth-first walk: first
    // the node itself, then the subtree of its left child, then the subtree
    // of its right child.
    pub fn next_in_preorder(&self, idx: NodeIndex) -> Option<NodeIndex> {
        let node = &self[idx];
        if node.left.is_some() {
            return node.left;
        }
        if node.right.is_some() {
            return node.right;
        }

        // A leaf. Go up until we find an ancestor that we reached through
        // its left child, and that also has a right child.
        let mut child = idx;
        let mut parent = node.parent;
        while let Some(p) = parent {
            let pnode = &self[p];
            if pnode.left == Some(child) && pnode.right.is_some() {
                return pnode.right;
            }
            child = p;
            parent = pnode.parent;
        }
        None
    }
}

impl<AF: AddressFamily> Index<NodeIndex> for NodeArena<AF> {
    type Output = LookupNode<AF>;

    // A NodeIndex is only created by `alloc` and the arena never shrinks
    // while indexes are alive, so this cannot go out of bounds.
    #[allow(clippy::indexing_slicing)]
    fn index(&self, idx: NodeIndex) -> &Self::Output {
        &self.slots[idx.0]
    }
}

impl<AF: AddressFamily> IndexMut<NodeIndex> for NodeArena<AF> {
    #[allow(clippy::indexing_slicing)]
    fn index_mut(&mut self, idx: NodeIndex) -> &mut Self::Output {
        &mut self.slots[idx.0]
    }
}
