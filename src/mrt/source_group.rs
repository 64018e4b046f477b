use std::cmp::Ordering;
use std::fmt;

use crate::AddressFamily;

//------------ SourceGroup ---------------------------------------------------

/// A (source, group) address pair, the identity of a multicast routing
/// entry. A (*,G) entry uses the zero address as its source.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct SourceGroup<AF: AddressFamily> {
    source: AF,
    group: AF,
}

impl<AF: AddressFamily> SourceGroup<AF> {
    pub fn new(source: AF, group: AF) -> Self {
        Self { source, group }
    }

    pub fn source(&self) -> AF {
        self.source
    }

    pub fn group(&self) -> AF {
        self.group
    }
}

impl<AF: AddressFamily> fmt::Display for SourceGroup<AF> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.source.fmt_net(), self.group.fmt_net())
    }
}

//------------ SgKey ---------------------------------------------------------

/// The key of the source-first index of an [Mrt](super::Mrt): ordered on
/// the source address, then on the group address.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct SgKey<AF: AddressFamily> {
    pub source: AF,
    pub group: AF,
}

impl<AF: AddressFamily> From<SourceGroup<AF>> for SgKey<AF> {
    fn from(sg: SourceGroup<AF>) -> Self {
        Self {
            source: sg.source,
            group: sg.group,
        }
    }
}

// The order is on the numerical (host order) value of the addresses.
impl<AF: AddressFamily> Ord for SgKey<AF> {
    fn cmp(&self, other: &Self) -> Ordering {
        (self.source.into_inner(), self.group.into_inner())
            .cmp(&(other.source.into_inner(), other.group.into_inner()))
    }
}

impl<AF: AddressFamily> PartialOrd for SgKey<AF> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

//------------ GsKey ---------------------------------------------------------

/// The key of the group-first index of an [Mrt](super::Mrt): ordered on
/// the group address, then on the source address.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct GsKey<AF: AddressFamily> {
    pub group: AF,
    pub source: AF,
}

impl<AF: AddressFamily> From<SourceGroup<AF>> for GsKey<AF> {
    fn from(sg: SourceGroup<AF>) -> Self {
        Self {
            group: sg.group,
            source: sg.source,
        }
    }
}

impl<AF: AddressFamily> Ord for GsKey<AF> {
    fn cmp(&self, other: &Self) -> Ordering {
        (self.group.into_inner(), self.source.into_inner())
            .cmp(&(other.group.into_inner(), other.source.into_inner()))
    }
}

impl<AF: AddressFamily> PartialOrd for GsKey<AF> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}
