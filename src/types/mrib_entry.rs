use std::fmt;
use std::net::IpAddr;

use serde_derive::{Deserialize, Serialize};

use crate::types::errors::MrtError;
use crate::types::PrefixId;
use crate::AddressFamily;

//------------ VifIndex ------------------------------------------------------

/// The index of a virtual (multicast) interface.
#[derive(
    Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize,
    Deserialize,
)]
#[serde(transparent)]
pub struct VifIndex(u32);

impl VifIndex {
    /// The reserved value for "no interface".
    pub const INVALID: VifIndex = VifIndex(u32::MAX);

    pub const fn new(index: u32) -> Self {
        Self(index)
    }

    pub fn get(self) -> u32 {
        self.0
    }

    pub fn is_valid(self) -> bool {
        self != Self::INVALID
    }
}

impl Default for VifIndex {
    fn default() -> Self {
        Self::INVALID
    }
}

impl From<u32> for VifIndex {
    fn from(value: u32) -> Self {
        Self(value)
    }
}

impl fmt::Display for VifIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_valid() {
            write!(f, "{}", self.0)
        } else {
            write!(f, "invalid")
        }
    }
}

//------------ NextHop -------------------------------------------------------

/// The routing metadata of an [Mrib] entry, without its prefix and without
/// an address family. Used by the family-erased table.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct NextHop {
    pub addr: IpAddr,
    pub vif_index: VifIndex,
    pub metric_preference: u32,
    pub metric: u32,
}

impl NextHop {
    pub fn new(addr: IpAddr, vif_index: VifIndex) -> Self {
        Self {
            addr,
            vif_index,
            metric_preference: u32::MAX,
            metric: u32::MAX,
        }
    }

    pub fn with_metrics(mut self, metric_preference: u32, metric: u32) -> Self {
        self.metric_preference = metric_preference;
        self.metric = metric;
        self
    }
}

//------------ Mrib ----------------------------------------------------------

/// A Multicast Routing Information Base entry: the route towards a
/// destination prefix, as used for reverse-path forwarding checks.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Mrib<AF: AddressFamily> {
    dest_prefix: PrefixId<AF>,
    next_hop_addr: AF,
    next_hop_vif_index: VifIndex,
    metric_preference: u32,
    metric: u32,
}

impl<AF: AddressFamily> Mrib<AF> {
    /// An entry for `dest_prefix` without a next hop. The metrics are set
    /// to their maximum ("unreachable") value.
    pub fn new(dest_prefix: PrefixId<AF>) -> Self {
        Self {
            dest_prefix,
            next_hop_addr: AF::zero_addr(),
            next_hop_vif_index: VifIndex::INVALID,
            metric_preference: u32::MAX,
            metric: u32::MAX,
        }
    }

    pub fn new_with_next_hop(
        dest_prefix: PrefixId<AF>,
        next_hop_addr: AF,
        next_hop_vif_index: VifIndex,
        metric_preference: u32,
        metric: u32,
    ) -> Self {
        Self {
            dest_prefix,
            next_hop_addr,
            next_hop_vif_index,
            metric_preference,
            metric,
        }
    }

    /// Build an entry from family-less next hop information. Fails if the
    /// next hop address is not of the family `AF`.
    pub fn from_next_hop(
        dest_prefix: PrefixId<AF>,
        next_hop: &NextHop,
    ) -> Result<Self, MrtError> {
        Ok(Self::new_with_next_hop(
            dest_prefix,
            AF::try_from_ipaddr(next_hop.addr)?,
            next_hop.vif_index,
            next_hop.metric_preference,
            next_hop.metric,
        ))
    }

    pub fn dest_prefix(&self) -> PrefixId<AF> {
        self.dest_prefix
    }

    pub fn set_dest_prefix(&mut self, dest_prefix: PrefixId<AF>) {
        self.dest_prefix = dest_prefix;
    }

    pub fn next_hop_addr(&self) -> AF {
        self.next_hop_addr
    }

    pub fn set_next_hop_addr(&mut self, addr: AF) {
        self.next_hop_addr = addr;
    }

    pub fn next_hop_vif_index(&self) -> VifIndex {
        self.next_hop_vif_index
    }

    pub fn set_next_hop_vif_index(&mut self, vif_index: VifIndex) {
        self.next_hop_vif_index = vif_index;
    }

    pub fn metric_preference(&self) -> u32 {
        self.metric_preference
    }

    pub fn set_metric_preference(&mut self, metric_preference: u32) {
        self.metric_preference = metric_preference;
    }

    pub fn metric(&self) -> u32 {
        self.metric
    }

    pub fn set_metric(&mut self, metric: u32) {
        self.metric = metric;
    }

    /// The family-less next hop information of this entry.
    pub fn next_hop(&self) -> NextHop {
        NextHop {
            addr: self.next_hop_addr.into_ipaddr(),
            vif_index: self.next_hop_vif_index,
            metric_preference: self.metric_preference,
            metric: self.metric,
        }
    }
}

impl<AF: AddressFamily> fmt::Display for Mrib<AF> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} nexthop={} vif={} pref={} metric={}",
            self.dest_prefix,
            self.next_hop_addr.fmt_net(),
            self.next_hop_vif_index,
            self.metric_preference,
            self.metric
        )
    }
}
