use std::fmt;
use std::net::IpAddr;

use inetnum::addr::Prefix;

use super::config::MribConfig;
use super::pending::TransactionId;
use super::table::MribTable;
use crate::errors::MrtError;
use crate::types::mrib_entry::{Mrib, NextHop, VifIndex};
use crate::types::PrefixId;
use crate::{AddressFamily, IPv4, IPv6};

//------------ MribRef -------------------------------------------------------

/// A reference to an entry of either address family, as returned by the
/// lookups of a [DualStackMrib].
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum MribRef<'a> {
    V4(&'a Mrib<IPv4>),
    V6(&'a Mrib<IPv6>),
}

impl MribRef<'_> {
    pub fn dest_prefix(&self) -> Prefix {
        match self {
            MribRef::V4(mrib) => mrib.dest_prefix().into(),
            MribRef::V6(mrib) => mrib.dest_prefix().into(),
        }
    }

    pub fn next_hop(&self) -> NextHop {
        match self {
            MribRef::V4(mrib) => mrib.next_hop(),
            MribRef::V6(mrib) => mrib.next_hop(),
        }
    }

    pub fn next_hop_vif_index(&self) -> VifIndex {
        match self {
            MribRef::V4(mrib) => mrib.next_hop_vif_index(),
            MribRef::V6(mrib) => mrib.next_hop_vif_index(),
        }
    }
}

impl fmt::Display for MribRef<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MribRef::V4(mrib) => write!(f, "{}", mrib),
            MribRef::V6(mrib) => write!(f, "{}", mrib),
        }
    }
}

//------------ DualStackMrib -------------------------------------------------

/// An MRIB for both IPv4 and IPv6.
///
/// Holds one [MribTable] per address family, and dispatches every
/// operation on the family of its prefix or address argument. Transaction
/// ids are shared: committing or aborting a transaction applies to the
/// pending operations of both families.
#[derive(Debug, Default)]
pub struct DualStackMrib {
    v4: MribTable<IPv4>,
    v6: MribTable<IPv6>,
}

fn mrib_for<AF: AddressFamily>(
    prefix: &Prefix,
    next_hop: &NextHop,
) -> Result<Mrib<AF>, MrtError> {
    Mrib::from_next_hop(PrefixId::try_from(*prefix)?, next_hop)
}

impl DualStackMrib {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn new_with_config(config: MribConfig) -> Self {
        Self {
            v4: MribTable::new_with_config(config),
            v6: MribTable::new_with_config(config),
        }
    }

    pub fn v4(&self) -> &MribTable<IPv4> {
        &self.v4
    }

    pub fn v6(&self) -> &MribTable<IPv6> {
        &self.v6
    }

    pub fn v4_mut(&mut self) -> &mut MribTable<IPv4> {
        &mut self.v4
    }

    pub fn v6_mut(&mut self) -> &mut MribTable<IPv6> {
        &mut self.v6
    }

    /// Insert (or replace) the entry for `prefix`. Fails with
    /// [MrtError::AddressFamilyMismatch] if the next hop address is not of
    /// the family of `prefix`.
    pub fn insert(
        &mut self,
        prefix: &Prefix,
        next_hop: &NextHop,
    ) -> Result<MribRef<'_>, MrtError> {
        match prefix.addr() {
            IpAddr::V4(_) => {
                let mrib = mrib_for::<IPv4>(prefix, next_hop)?;
                Ok(MribRef::V4(self.v4.insert(mrib)))
            }
            IpAddr::V6(_) => {
                let mrib = mrib_for::<IPv6>(prefix, next_hop)?;
                Ok(MribRef::V6(self.v6.insert(mrib)))
            }
        }
    }

    pub fn remove(&mut self, prefix: &Prefix) -> Result<bool, MrtError> {
        match prefix.addr() {
            IpAddr::V4(_) => {
                Ok(self.v4.remove(&PrefixId::try_from(*prefix)?))
            }
            IpAddr::V6(_) => {
                Ok(self.v6.remove(&PrefixId::try_from(*prefix)?))
            }
        }
    }

    /// Longest prefix match for `addr` in the table of its family.
    pub fn find(&self, addr: IpAddr) -> Option<MribRef<'_>> {
        match addr {
            IpAddr::V4(addr) => {
                self.v4.find(IPv4::from_ipaddr(addr)).map(MribRef::V4)
            }
            IpAddr::V6(addr) => {
                self.v6.find(IPv6::from_ipaddr(addr)).map(MribRef::V6)
            }
        }
    }

    pub fn find_exact(
        &self,
        prefix: &Prefix,
    ) -> Result<Option<MribRef<'_>>, MrtError> {
        match prefix.addr() {
            IpAddr::V4(_) => Ok(self
                .v4
                .find_exact(&PrefixId::try_from(*prefix)?)
                .map(MribRef::V4)),
            IpAddr::V6(_) => Ok(self
                .v6
                .find_exact(&PrefixId::try_from(*prefix)?)
                .map(MribRef::V6)),
        }
    }

    pub fn update_entry_vif_index(
        &mut self,
        prefix: &Prefix,
        vif_index: VifIndex,
    ) -> Result<(), MrtError> {
        match prefix.addr() {
            IpAddr::V4(_) => {
                let pfx = PrefixId::try_from(*prefix)?;
                self.v4.update_entry_vif_index(&pfx, vif_index);
            }
            IpAddr::V6(_) => {
                let pfx = PrefixId::try_from(*prefix)?;
                self.v6.update_entry_vif_index(&pfx, vif_index);
            }
        }
        Ok(())
    }

    // ------- Pending transactions -----------------------------------------

    pub fn add_pending_insert(
        &mut self,
        tid: TransactionId,
        prefix: &Prefix,
        next_hop: &NextHop,
    ) -> Result<(), MrtError> {
        match prefix.addr() {
            IpAddr::V4(_) => self
                .v4
                .add_pending_insert(tid, mrib_for::<IPv4>(prefix, next_hop)?),
            IpAddr::V6(_) => self
                .v6
                .add_pending_insert(tid, mrib_for::<IPv6>(prefix, next_hop)?),
        }
        Ok(())
    }

    pub fn add_pending_remove(
        &mut self,
        tid: TransactionId,
        prefix: &Prefix,
    ) -> Result<(), MrtError> {
        match prefix.addr() {
            IpAddr::V4(_) => {
                let mrib = Mrib::<IPv4>::new(PrefixId::try_from(*prefix)?);
                self.v4.add_pending_remove(tid, mrib);
            }
            IpAddr::V6(_) => {
                let mrib = Mrib::<IPv6>::new(PrefixId::try_from(*prefix)?);
                self.v6.add_pending_remove(tid, mrib);
            }
        }
        Ok(())
    }

    /// Queue the removal of all entries of both families.
    pub fn add_pending_remove_all(&mut self, tid: TransactionId) {
        self.v4.add_pending_remove_all(tid);
        self.v6.add_pending_remove_all(tid);
    }

    pub fn commit_pending_transactions(&mut self, tid: TransactionId) {
        self.v4.commit_pending_transactions(tid);
        self.v6.commit_pending_transactions(tid);
    }

    pub fn abort_pending_transactions(&mut self, tid: TransactionId) {
        self.v4.abort_pending_transactions(tid);
        self.v6.abort_pending_transactions(tid);
    }

    pub fn abort_all_pending_transactions(&mut self) {
        self.v4.abort_all_pending_transactions();
        self.v6.abort_all_pending_transactions();
    }

    pub fn is_pending(&self, tid: TransactionId) -> bool {
        self.v4.is_pending(tid) || self.v6.is_pending(tid)
    }

    pub fn pending_transactions_count(&self) -> usize {
        self.v4.pending_transactions_count()
            + self.v6.pending_transactions_count()
    }

    // ------- Whole table --------------------------------------------------

    /// The number of entries over both families.
    pub fn len(&self) -> usize {
        self.v4.size() + self.v6.size()
    }

    pub fn is_empty(&self) -> bool {
        self.v4.is_empty() && self.v6.is_empty()
    }

    pub fn clear(&mut self) {
        self.v4.clear();
        self.v6.clear();
    }

    /// All IPv4 entries, followed by all IPv6 entries, each in the order of
    /// [MribTable::iter].
    pub fn iter(&self) -> impl Iterator<Item = MribRef<'_>> + '_ {
        self.v4
            .iter()
            .map(MribRef::V4)
            .chain(self.v6.iter().map(MribRef::V6))
    }
}
