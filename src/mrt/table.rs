use std::collections::btree_map::{self, BTreeMap};
use std::ops::Bound;
use std::rc::Rc;

use log::{debug, trace};

use super::entry::Mre;
use super::iterators::{GsRange, MreRange, SgRange};
use super::source_group::{GsKey, SgKey, SourceGroup};
use crate::types::PrefixId;
use crate::AddressFamily;

//------------ Mrt -----------------------------------------------------------

/// A Multicast Routing Table: a set of [Mre]s, unique on their (S,G), that
/// is kept in two orders at the same time.
///
/// The source-first (sg) index orders entries on their source address and
/// then on their group address, the group-first (gs) index the other way
/// around. Both indexes always hold the same entries.
///
/// ```
/// use std::rc::Rc;
/// use xorp_mrt::{AddressFamily, IPv4};
/// use xorp_mrt::mrt::{Mre, Mrt};
///
/// let mut mrt = Mrt::<IPv4>::new();
/// let s = IPv4::from_ipaddr("10.0.0.1".parse()?);
/// let g = IPv4::from_ipaddr("224.1.0.1".parse()?);
///
/// let mre = Rc::new(Mre::new(s, g, ()));
/// assert!(mrt.insert(Rc::clone(&mre)).is_some());
/// assert!(mrt.insert(Rc::new(Mre::new(s, g, ()))).is_none());
/// assert!(mre.is_indexed());
///
/// assert!(mrt.remove(&mre));
/// assert!(mrt.is_empty());
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
#[derive(Debug)]
pub struct Mrt<AF: AddressFamily, T = ()> {
    sg_table: BTreeMap<SgKey<AF>, Rc<Mre<AF, T>>>,
    gs_table: BTreeMap<GsKey<AF>, Rc<Mre<AF, T>>>,
}

impl<AF: AddressFamily, T> Default for Mrt<AF, T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<AF: AddressFamily, T> Mrt<AF, T> {
    pub fn new() -> Self {
        Self {
            sg_table: BTreeMap::new(),
            gs_table: BTreeMap::new(),
        }
    }

    /// The number of entries.
    pub fn size(&self) -> usize {
        debug_assert_eq!(self.sg_table.len(), self.gs_table.len());
        self.sg_table.len()
    }

    pub fn is_empty(&self) -> bool {
        self.size() == 0
    }

    // ------- Mutation -----------------------------------------------------

    /// Add `mre` to both indexes, and return the handle now stored in the
    /// table.
    ///
    /// Returns None and leaves the table unchanged if an entry with the same
    /// (S,G) is already present, or if `mre` is already indexed (by this or
    /// another table). An existing entry is never replaced, remove it first.
    pub fn insert(
        &mut self,
        mre: Rc<Mre<AF, T>>,
    ) -> Option<&Rc<Mre<AF, T>>> {
        if mre.is_on_any_index() {
            debug!("insert {}: entry is already indexed", mre);
            return None;
        }

        let sg_key = SgKey::from(mre.source_group());
        let gs_key = GsKey::from(mre.source_group());

        match self.sg_table.entry(sg_key) {
            btree_map::Entry::Occupied(_) => {
                debug!("insert {}: duplicate on the sg index", mre);
                return None;
            }
            btree_map::Entry::Vacant(slot) => {
                slot.insert(Rc::clone(&mre));
            }
        }

        match self.gs_table.entry(gs_key) {
            btree_map::Entry::Occupied(_) => {
                debug!("insert {}: duplicate on the gs index", mre);
                self.sg_table.remove(&sg_key);
                return None;
            }
            btree_map::Entry::Vacant(slot) => {
                slot.insert(Rc::clone(&mre));
            }
        }

        mre.set_sg_indexed(true);
        mre.set_gs_indexed(true);
        trace!("insert {}", mre);
        self.sg_table.get(&sg_key)
    }

    /// Remove `mre` from the indexes that refer to it. An index slot that
    /// holds a different entry with the same (S,G) is not touched, so this
    /// is safe to call for an entry that is not in this table.
    ///
    /// Returns whether anything was removed.
    pub fn remove(&mut self, mre: &Rc<Mre<AF, T>>) -> bool {
        let mut removed = false;

        if let btree_map::Entry::Occupied(slot) =
            self.sg_table.entry(SgKey::from(mre.source_group()))
        {
            if Rc::ptr_eq(slot.get(), mre) {
                slot.remove();
                mre.set_sg_indexed(false);
                removed = true;
            }
        }

        if let btree_map::Entry::Occupied(slot) =
            self.gs_table.entry(GsKey::from(mre.source_group()))
        {
            if Rc::ptr_eq(slot.get(), mre) {
                slot.remove();
                mre.set_gs_indexed(false);
                removed = true;
            }
        }

        trace!("remove {}: {}", mre, removed);
        removed
    }

    /// Remove all entries. Every entry goes back to the unindexed state.
    pub fn clear(&mut self) {
        debug!("clear {} entries", self.sg_table.len());
        for mre in self.sg_table.values() {
            mre.set_sg_indexed(false);
        }
        for mre in self.gs_table.values() {
            mre.set_gs_indexed(false);
        }
        self.sg_table.clear();
        self.gs_table.clear();
    }

    // ------- Lookup -------------------------------------------------------

    pub fn find(&self, source: AF, group: AF) -> Option<&Rc<Mre<AF, T>>> {
        self.sg_table.get(&SgKey { source, group })
    }

    /// The first entry, in sg order, with source address `source`.
    pub fn find_source(&self, source: AF) -> Option<&Rc<Mre<AF, T>>> {
        self.sg_table
            .range(SgKey {
                source,
                group: AF::zero_addr(),
            }..)
            .next()
            .filter(|(key, _)| key.source == source)
            .map(|(_, mre)| mre)
    }

    /// The first entry, in gs order, with group address `group`.
    pub fn find_group(&self, group: AF) -> Option<&Rc<Mre<AF, T>>> {
        self.gs_table
            .range(GsKey {
                group,
                source: AF::zero_addr(),
            }..)
            .next()
            .filter(|(key, _)| key.group == group)
            .map(|(_, mre)| mre)
    }

    /// The first entry, in sg order, with a source address inside
    /// `prefix`.
    pub fn find_source_by_prefix(
        &self,
        prefix: &PrefixId<AF>,
    ) -> Option<&Rc<Mre<AF, T>>> {
        self.sg_table
            .range(Self::sg_lower(prefix.net())..)
            .next()
            .filter(|(key, _)| prefix.contains(key.source))
            .map(|(_, mre)| mre)
    }

    /// The first entry, in gs order, with a group address inside `prefix`.
    pub fn find_group_by_prefix(
        &self,
        prefix: &PrefixId<AF>,
    ) -> Option<&Rc<Mre<AF, T>>> {
        self.gs_table
            .range(Self::gs_lower(prefix.net())..)
            .next()
            .filter(|(key, _)| prefix.contains(key.group))
            .map(|(_, mre)| mre)
    }

    // ------- Iteration ----------------------------------------------------

    /// All entries in sg order.
    pub fn sg_iter(&self) -> SgRange<'_, AF, T> {
        MreRange::new(self.sg_table.range::<SgKey<AF>, _>(..))
    }

    /// All entries in gs order.
    pub fn gs_iter(&self) -> GsRange<'_, AF, T> {
        MreRange::new(self.gs_table.range::<GsKey<AF>, _>(..))
    }

    /// The entries with a source address inside `prefix`, in sg order.
    pub fn source_by_prefix(
        &self,
        prefix: &PrefixId<AF>,
    ) -> SgRange<'_, AF, T> {
        let upper = match prefix.successor() {
            Some(next) => Bound::Excluded(Self::sg_lower(next.net())),
            None => Bound::Unbounded,
        };
        trace!("source by prefix {}: upper {:?}", prefix, upper);
        let lower = Bound::Included(Self::sg_lower(prefix.net()));
        MreRange::new(self.sg_table.range((lower, upper)))
    }

    /// From the first entry with a source address inside `prefix` to the
    /// end of the sg index.
    pub fn source_by_prefix_begin(
        &self,
        prefix: &PrefixId<AF>,
    ) -> SgRange<'_, AF, T> {
        MreRange::new(self.sg_table.range(Self::sg_lower(prefix.net())..))
    }

    /// From the first entry past the source prefix `prefix` to the end of
    /// the sg index. Empty if there is no prefix past `prefix`.
    pub fn source_by_prefix_end(
        &self,
        prefix: &PrefixId<AF>,
    ) -> SgRange<'_, AF, T> {
        match prefix.successor() {
            Some(next) => {
                let lower = Self::sg_lower(next.net());
                MreRange::new(self.sg_table.range(lower..))
            }
            None => MreRange::end(),
        }
    }

    /// The entries with a group address inside `prefix`, in gs order.
    pub fn group_by_prefix(
        &self,
        prefix: &PrefixId<AF>,
    ) -> GsRange<'_, AF, T> {
        let upper = match prefix.successor() {
            Some(next) => Bound::Excluded(Self::gs_lower(next.net())),
            None => Bound::Unbounded,
        };
        trace!("group by prefix {}: upper {:?}", prefix, upper);
        let lower = Bound::Included(Self::gs_lower(prefix.net()));
        MreRange::new(self.gs_table.range((lower, upper)))
    }

    pub fn group_by_prefix_begin(
        &self,
        prefix: &PrefixId<AF>,
    ) -> GsRange<'_, AF, T> {
        MreRange::new(self.gs_table.range(Self::gs_lower(prefix.net())..))
    }

    pub fn group_by_prefix_end(
        &self,
        prefix: &PrefixId<AF>,
    ) -> GsRange<'_, AF, T> {
        match prefix.successor() {
            Some(next) => {
                let lower = Self::gs_lower(next.net());
                MreRange::new(self.gs_table.range(lower..))
            }
            None => MreRange::end(),
        }
    }

    /// The entries with source address `source`, in sg order.
    pub fn source_by_addr(&self, source: AF) -> SgRange<'_, AF, T> {
        let upper = match source.checked_inc() {
            Some(next) => Bound::Excluded(Self::sg_lower(next)),
            None => Bound::Unbounded,
        };
        trace!("source by addr {}: upper {:?}", source.fmt_net(), upper);
        MreRange::new(
            self.sg_table
                .range((Bound::Included(Self::sg_lower(source)), upper)),
        )
    }

    pub fn source_by_addr_begin(&self, source: AF) -> SgRange<'_, AF, T> {
        MreRange::new(self.sg_table.range(Self::sg_lower(source)..))
    }

    /// Empty for the all-ones source address.
    pub fn source_by_addr_end(&self, source: AF) -> SgRange<'_, AF, T> {
        match source.checked_inc() {
            Some(next) => {
                MreRange::new(self.sg_table.range(Self::sg_lower(next)..))
            }
            None => MreRange::end(),
        }
    }

    /// The entries with group address `group`, in gs order.
    pub fn group_by_addr(&self, group: AF) -> GsRange<'_, AF, T> {
        let upper = match group.checked_inc() {
            Some(next) => Bound::Excluded(Self::gs_lower(next)),
            None => Bound::Unbounded,
        };
        trace!("group by addr {}: upper {:?}", group.fmt_net(), upper);
        MreRange::new(
            self.gs_table
                .range((Bound::Included(Self::gs_lower(group)), upper)),
        )
    }

    pub fn group_by_addr_begin(&self, group: AF) -> GsRange<'_, AF, T> {
        MreRange::new(self.gs_table.range(Self::gs_lower(group)..))
    }

    /// Empty for the all-ones group address.
    pub fn group_by_addr_end(&self, group: AF) -> GsRange<'_, AF, T> {
        match group.checked_inc() {
            Some(next) => {
                MreRange::new(self.gs_table.range(Self::gs_lower(next)..))
            }
            None => MreRange::end(),
        }
    }

    /// From the first entry at or after (`source`, `group`) to the end of
    /// the sg index.
    pub fn source_group_by_addr_begin(
        &self,
        source: AF,
        group: AF,
    ) -> SgRange<'_, AF, T> {
        MreRange::new(
            self.sg_table
                .range(SgKey::from(SourceGroup::new(source, group))..),
        )
    }

    /// From the first entry at or after (`group`, `source`) to the end of
    /// the gs index.
    pub fn group_source_by_addr_begin(
        &self,
        source: AF,
        group: AF,
    ) -> GsRange<'_, AF, T> {
        MreRange::new(
            self.gs_table
                .range(GsKey::from(SourceGroup::new(source, group))..),
        )
    }

    // The smallest sg key with source address `source`.
    fn sg_lower(source: AF) -> SgKey<AF> {
        SgKey {
            source,
            group: AF::zero_addr(),
        }
    }

    // The smallest gs key with group address `group`.
    fn gs_lower(group: AF) -> GsKey<AF> {
        GsKey {
            group,
            source: AF::zero_addr(),
        }
    }
}

impl<AF: AddressFamily, T> Drop for Mrt<AF, T> {
    fn drop(&mut self) {
        self.clear();
    }
}

//------------ Tests ---------------------------------------------------------
