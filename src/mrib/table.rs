// Indexing the node arena with a NodeIndex cannot go out of bounds, see
// NodeArena.
#![allow(clippy::indexing_slicing)]

use log::{debug, trace};

use super::config::{MribConfig, RetentionStrategy};
use super::iterators::MribIter;
use super::node::{NodeArena, NodeIndex, ROOT};
use super::pending::{
    PendingOp, PendingTransaction, PendingTransactions, TransactionId,
};
use crate::stats::{Counters, MribStats};
use crate::types::mrib_entry::{Mrib, VifIndex};
use crate::types::PrefixId;
use crate::AddressFamily;

//------------ MribTable -----------------------------------------------------

/// A Multicast Routing Information Base table for one address family.
///
/// The table maps destination prefixes to [Mrib] entries, and answers
/// longest-prefix-match lookups for addresses with [find](Self::find). It
/// is a binary trie: looking up an address, or inserting or removing a
/// prefix, costs at most `AF::BITS` steps.
///
/// Next to the direct mutation methods, the table keeps a queue of pending
/// operations, tagged with a transaction id. These only take effect when
/// [commit_pending_transactions](Self::commit_pending_transactions) is
/// called for their id. Lookups never see pending operations.
///
/// ```
/// use std::str::FromStr;
/// use inetnum::addr::Prefix;
/// use xorp_mrt::{AddressFamily, IPv4, Mrib, PrefixId, VifIndex};
/// use xorp_mrt::mrib::MribTable;
///
/// let mut table = MribTable::<IPv4>::new();
/// let pfx = PrefixId::try_from(Prefix::from_str("10.0.0.0/8")?)?;
/// let mut mrib = Mrib::new(pfx);
/// mrib.set_next_hop_vif_index(VifIndex::new(2));
/// table.insert(mrib);
///
/// let addr = IPv4::from_ipaddr("10.1.2.3".parse()?);
/// assert_eq!(table.find(addr).map(|m| m.dest_prefix()), Some(pfx));
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
#[derive(Debug)]
pub struct MribTable<AF: AddressFamily> {
    nodes: NodeArena<AF>,
    size: usize,
    pending: PendingTransactions<AF>,
    config: MribConfig,
    removed: Vec<Mrib<AF>>,
    counters: Counters,
}

impl<AF: AddressFamily> Default for MribTable<AF> {
    fn default() -> Self {
        Self::new()
    }
}

impl<AF: AddressFamily> MribTable<AF> {
    /// Create an empty table with the default configuration, i.e. removed
    /// entries are discarded.
    pub fn new() -> Self {
        Self::new_with_config(MribConfig::default())
    }

    pub fn new_with_config(config: MribConfig) -> Self {
        Self {
            nodes: NodeArena::new(),
            size: 0,
            pending: PendingTransactions::new(),
            config,
            removed: vec![],
            counters: Counters::default(),
        }
    }

    pub fn config(&self) -> &MribConfig {
        &self.config
    }

    /// The number of entries in the table. Pending inserts are not counted.
    pub fn size(&self) -> usize {
        self.size
    }

    pub fn is_empty(&self) -> bool {
        self.size == 0
    }

    // ------- Mutation -----------------------------------------------------

    /// Insert `mrib` for its destination prefix, and return a reference to
    /// the stored entry.
    ///
    /// An existing entry for the same prefix is replaced. The old entry is
    /// disposed of like a removed entry, following the retention strategy.
    pub fn insert(&mut self, mrib: Mrib<AF>) -> &Mrib<AF> {
        let prefix = mrib.dest_prefix();
        trace!("insert {}", mrib);

        let mut cur = ROOT;
        for depth in 0..prefix.len() {
            let bit = prefix.net().bit_at(depth);
            cur = match self.nodes[cur].child(bit) {
                Some(child) => child,
                None => {
                    let child = self.nodes.alloc(cur);
                    self.nodes[cur].set_child(bit, Some(child));
                    child
                }
            };
        }

        if let Some(old) = self.nodes[cur].mrib.take() {
            trace!("replace {}", old);
            self.dispose(old);
        }

        self.size += 1;
        self.counters.inc_prefixes_count(prefix.len());
        self.nodes[cur].mrib.insert(mrib)
    }

    /// Remove the entry for exactly `dest_prefix`. A less or more specific
    /// entry is never touched. Returns whether an entry was removed;
    /// removing an absent prefix is not an error.
    pub fn remove(&mut self, dest_prefix: &PrefixId<AF>) -> bool {
        let Some(idx) = self.find_prefix_node(dest_prefix) else {
            trace!("remove {}: not found", dest_prefix);
            return false;
        };
        let Some(old) = self.nodes[idx].mrib.take() else {
            trace!("remove {}: no entry on lookup node", dest_prefix);
            return false;
        };
        trace!("remove {}", old);
        self.dispose(old);
        self.nodes.prune_from(idx);
        true
    }

    /// Remove the entry with the same destination prefix as `mrib`.
    pub fn remove_mrib(&mut self, mrib: &Mrib<AF>) -> bool {
        self.remove(&mrib.dest_prefix())
    }

    /// Remove all entries. Pending transactions are kept.
    pub fn remove_all_entries(&mut self) {
        debug!("remove all {} entries", self.size);
        for old in self.nodes.reset() {
            self.dispose(old);
        }
        debug_assert_eq!(self.size, 0);
        self.size = 0;
        self.counters.reset();
    }

    /// Remove all entries, all pending transactions, and all retained
    /// entries.
    pub fn clear(&mut self) {
        self.remove_all_entries();
        self.pending.clear();
        self.removed.clear();
    }

    /// Set the vif index of the entry for `dest_prefix`, and of every
    /// pending insert or remove for that prefix.
    pub fn update_entry_vif_index(
        &mut self,
        dest_prefix: &PrefixId<AF>,
        vif_index: VifIndex,
    ) {
        if let Some(idx) = self.find_prefix_node(dest_prefix) {
            if let Some(mrib) = self.nodes[idx].mrib.as_mut() {
                mrib.set_next_hop_vif_index(vif_index);
            }
        }
        self.pending.update_entry_vif_index(dest_prefix, vif_index);
    }

    // Account for an entry that has left the trie, and drop or retain it.
    fn dispose(&mut self, mrib: Mrib<AF>) {
        debug_assert!(self.size > 0);
        self.size -= 1;
        self.counters.dec_prefixes_count(mrib.dest_prefix().len());
        match self.config.retention {
            RetentionStrategy::Discard => {}
            RetentionStrategy::Preserve => self.removed.push(mrib),
        }
    }

    // ------- Lookup -------------------------------------------------------

    /// Find the longest prefix match for `addr`, i.e. the entry with the
    /// longest prefix that contains `addr`.
    pub fn find(&self, addr: AF) -> Option<&Mrib<AF>> {
        let mut best = self.nodes[ROOT].mrib.as_ref();
        let mut cur = ROOT;

        for depth in 0..AF::BITS {
            match self.nodes[cur].child(addr.bit_at(depth)) {
                Some(child) => {
                    cur = child;
                    if let Some(mrib) = self.nodes[cur].mrib.as_ref() {
                        best = Some(mrib);
                    }
                }
                None => break,
            }
        }

        trace!(
            "find {}: {}",
            addr.fmt_net(),
            best.map(|m| m.dest_prefix().to_string())
                .unwrap_or_else(|| "-".to_string())
        );
        best
    }

    /// Find the entry for exactly `dest_prefix`.
    pub fn find_exact(&self, dest_prefix: &PrefixId<AF>) -> Option<&Mrib<AF>> {
        self.find_prefix_node(dest_prefix)
            .and_then(|idx| self.nodes[idx].mrib.as_ref())
    }

    // The lookup node for `prefix`, if the whole path to it exists. Whether
    // that node holds an entry is up to the caller.
    fn find_prefix_node(&self, prefix: &PrefixId<AF>) -> Option<NodeIndex> {
        let mut cur = ROOT;
        for depth in 0..prefix.len() {
            cur = self.nodes[cur].child(prefix.net().bit_at(depth))?;
        }
        Some(cur)
    }

    /// Iterate over all entries, see [MribIter] for the order.
    pub fn iter(&self) -> MribIter<'_, AF> {
        MribIter::new(&self.nodes)
    }

    // ------- Pending transactions -----------------------------------------

    /// Queue the insertion of `mrib` under transaction `tid`.
    pub fn add_pending_insert(&mut self, tid: TransactionId, mrib: Mrib<AF>) {
        trace!("tid {}: pending insert {}", tid, mrib);
        self.pending.push(tid, PendingOp::Insert(mrib));
    }

    /// Queue the removal of the entry for the prefix of `mrib` under
    /// transaction `tid`.
    pub fn add_pending_remove(&mut self, tid: TransactionId, mrib: Mrib<AF>) {
        trace!("tid {}: pending remove {}", tid, mrib);
        self.pending.push(tid, PendingOp::Remove(mrib));
    }

    /// Queue the removal of all entries under transaction `tid`.
    pub fn add_pending_remove_all(&mut self, tid: TransactionId) {
        trace!("tid {}: pending remove all", tid);
        self.pending.push(tid, PendingOp::RemoveAll);
    }

    /// Apply all pending operations of transaction `tid`, in the order they
    /// were queued, and forget about them. Operations of other transactions
    /// stay queued.
    pub fn commit_pending_transactions(&mut self, tid: TransactionId) {
        let ops = self.pending.take(tid);
        debug!("tid {}: commit {} pending operation(s)", tid, ops.len());
        for op in ops {
            match op {
                PendingOp::Insert(mrib) => {
                    self.insert(mrib);
                }
                PendingOp::Remove(mrib) => {
                    self.remove(&mrib.dest_prefix());
                }
                PendingOp::RemoveAll => self.remove_all_entries(),
            }
        }
    }

    /// Drop all pending operations of transaction `tid` without applying
    /// them.
    pub fn abort_pending_transactions(&mut self, tid: TransactionId) {
        let count = self.pending.discard(tid);
        debug!("tid {}: abort {} pending operation(s)", tid, count);
    }

    pub fn abort_all_pending_transactions(&mut self) {
        debug!("abort all {} pending operation(s)", self.pending.len());
        self.pending.clear();
    }

    /// Whether any operation is queued for `tid`.
    pub fn is_pending(&self, tid: TransactionId) -> bool {
        self.pending.contains_tid(tid)
    }

    /// The number of queued operations over all transactions.
    pub fn pending_transactions_count(&self) -> usize {
        self.pending.len()
    }

    /// The queued operations over all transactions, in submission order.
    pub fn pending_transactions(
        &self,
    ) -> impl Iterator<Item = &PendingTransaction<AF>> + '_ {
        self.pending.iter()
    }

    // ------- Retention ----------------------------------------------------

    pub fn is_preserving_removed_entries(&self) -> bool {
        self.config.is_preserving()
    }

    /// Switch between retaining and discarding removed entries. Entries
    /// already on the retention list stay there.
    pub fn set_preserving_removed_entries(&mut self, preserve: bool) {
        self.config.retention = if preserve {
            RetentionStrategy::Preserve
        } else {
            RetentionStrategy::Discard
        };
    }

    /// The entries removed (or replaced) while the table was preserving,
    /// oldest first.
    pub fn removed_entries(&self) -> &[Mrib<AF>] {
        &self.removed
    }

    /// Empty the retention list and return its entries.
    pub fn take_removed_entries(&mut self) -> Vec<Mrib<AF>> {
        std::mem::take(&mut self.removed)
    }

    // ------- Statistics ---------------------------------------------------

    pub fn stats(&self) -> MribStats {
        debug_assert_eq!(self.counters.prefixes_count(), self.size);
        MribStats {
            nodes: self.nodes.len(),
            entries: self.size,
            pending: self.pending.len(),
            retained: self.removed.len(),
            prefixes: self.counters.prefix_stats(),
        }
    }
}

impl<'a, AF: AddressFamily> IntoIterator for &'a MribTable<AF> {
    type Item = &'a Mrib<AF>;
    type IntoIter = MribIter<'a, AF>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

//------------ Tests ---------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{IPv4, IPv6};

    fn pfx(net: u32, len: u8) -> PrefixId<IPv4> {
        PrefixId::new(IPv4::from(net), len)
            .unwrap_or_else(|_| PrefixId::default_route())
    }

    #[test]
    fn nodes_are_pruned_on_remove() {
        let mut table = MribTable::<IPv4>::new();
        assert_eq!(table.nodes.len(), 1);

        table.insert(Mrib::new(pfx(0x0a00_0000, 8)));
        assert_eq!(table.nodes.len(), 9);
        table.insert(Mrib::new(pfx(0x0a01_0000, 16)));
        assert_eq!(table.nodes.len(), 17);

        // The /8 node stays: it is on the path to the /16.
        assert!(table.remove(&pfx(0x0a00_0000, 8)));
        assert_eq!(table.nodes.len(), 17);

        assert!(table.remove(&pfx(0x0a01_0000, 16)));
        assert_eq!(table.nodes.len(), 1);
        assert!(table.nodes[ROOT].is_unused());
        assert_eq!(table.size(), 0);
    }

    #[test]
    fn freed_slots_are_reused() {
        let mut table = MribTable::<IPv4>::new();
        table.insert(Mrib::new(pfx(0xc000_0200, 24)));
        table.remove(&pfx(0xc000_0200, 24));
        table.insert(Mrib::new(pfx(0xc633_6400, 24)));

        assert_eq!(table.nodes.len(), 25);
        assert_eq!(table.nodes.free_len(), 0);
    }

    #[test]
    fn host_route_at_top_of_v6_space() {
        let mut table = MribTable::<IPv6>::new();
        let top = PrefixId::host(IPv6::all_ones());
        table.insert(Mrib::new(top));
        assert_eq!(table.nodes.len(), 129);
        assert_eq!(
            table.find(IPv6::all_ones()).map(|m| m.dest_prefix()),
            Some(top)
        );

        assert!(table.remove(&top));
        assert_eq!(table.nodes.len(), 1);
        assert_eq!(table.nodes.free_len(), 128);
        assert!(table.find(IPv6::all_ones()).is_none());
    }

    #[test]
    fn default_route_lives_on_the_root() {
        let mut table = MribTable::<IPv4>::new();
        table.insert(Mrib::new(PrefixId::default_route()));
        assert_eq!(table.nodes.len(), 1);
        assert!(table.find(IPv4::from(0xdead_beef_u32)).is_some());

        assert!(table.remove(&PrefixId::default_route()));
        assert!(table.find(IPv4::from(0xdead_beef_u32)).is_none());
        assert_eq!(table.nodes.len(), 1);
    }

    #[test]
    fn replace_counts_once() {
        let mut table = MribTable::<IPv4>::new();
        table.insert(Mrib::new(pfx(0x0a00_0000, 8)));
        let mut mrib = Mrib::new(pfx(0x0a00_0000, 8));
        mrib.set_metric(10);
        assert_eq!(table.insert(mrib).metric(), 10);

        assert_eq!(table.size(), 1);
        assert_eq!(table.counters.prefixes_count(), 1);
    }
}
