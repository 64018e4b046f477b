use std::cell::Cell;
use std::fmt;

use super::source_group::SourceGroup;
use crate::types::PrefixId;
use crate::AddressFamily;

//------------ Mre -----------------------------------------------------------

/// A Multicast Routing Entry: the state kept for one (S,G) pair.
///
/// The entry is owned by its creator through an `Rc`, an [Mrt](super::Mrt)
/// only holds handles to it. The entry tracks whether it is on the
/// source-first and on the group-first index of a table. After creation it
/// is unindexed, a successful insert makes it indexed, a remove (or a
/// clear of the table) makes it unindexed again.
///
/// `T` is the protocol specific state. Use a `Cell` or `RefCell` in `T` for
/// state that changes while the entry is in a table.
#[derive(Debug)]
pub struct Mre<AF: AddressFamily, T = ()> {
    source_group: SourceGroup<AF>,
    sg_indexed: Cell<bool>,
    gs_indexed: Cell<bool>,
    payload: T,
}

impl<AF: AddressFamily, T> Mre<AF, T> {
    pub fn new(source: AF, group: AF, payload: T) -> Self {
        Self {
            source_group: SourceGroup::new(source, group),
            sg_indexed: Cell::new(false),
            gs_indexed: Cell::new(false),
            payload,
        }
    }

    pub fn source_addr(&self) -> AF {
        self.source_group.source()
    }

    pub fn group_addr(&self) -> AF {
        self.source_group.group()
    }

    pub fn source_group(&self) -> SourceGroup<AF> {
        self.source_group
    }

    pub fn payload(&self) -> &T {
        &self.payload
    }

    /// Whether the entry is on both indexes of a table.
    pub fn is_indexed(&self) -> bool {
        self.sg_indexed.get() && self.gs_indexed.get()
    }

    pub(crate) fn is_on_any_index(&self) -> bool {
        self.sg_indexed.get() || self.gs_indexed.get()
    }

    pub(crate) fn set_sg_indexed(&self, indexed: bool) {
        self.sg_indexed.set(indexed);
    }

    pub(crate) fn set_gs_indexed(&self, indexed: bool) {
        self.gs_indexed.set(indexed);
    }

    /// Whether the source address lies inside `prefix`.
    pub fn is_same_prefix_s(&self, prefix: &PrefixId<AF>) -> bool {
        prefix.contains(self.source_addr())
    }

    /// Whether the group address lies inside `prefix`.
    pub fn is_same_prefix_g(&self, prefix: &PrefixId<AF>) -> bool {
        prefix.contains(self.group_addr())
    }
}

impl<AF: AddressFamily, T> fmt::Display for Mre<AF, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.source_group)
    }
}
