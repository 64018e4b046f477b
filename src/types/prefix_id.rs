use std::fmt;

use num_traits::{CheckedAdd, One};

use crate::types::errors::MrtError;
use crate::AddressFamily;

//------------ PrefixId ------------------------------------------------------

/// An address prefix: a network address and a prefix length.
///
/// The address is always stored masked, i.e. all bits beyond the prefix
/// length are zero, so two `PrefixId`s for the same network compare equal
/// regardless of how they were constructed.
#[derive(Hash, Eq, PartialEq, Debug, Copy, Clone, PartialOrd, Ord)]
pub struct PrefixId<AF: AddressFamily> {
    net: AF,
    len: u8,
}

impl<AF: AddressFamily> PrefixId<AF> {
    /// Create a prefix for `net`/`len`. Host bits in `net` are cleared.
    pub fn new(net: AF, len: u8) -> Result<Self, MrtError> {
        if len > AF::BITS {
            return Err(MrtError::PrefixLengthInvalid);
        }
        Ok(Self {
            net: net.truncate_to_len(len),
            len,
        })
    }

    /// The prefix of length `len` that contains `addr`. A `len` beyond the
    /// width of the family is taken as the full width.
    pub fn from_addr_masked(addr: AF, len: u8) -> Self {
        let len = len.min(AF::BITS);
        Self {
            net: addr.truncate_to_len(len),
            len,
        }
    }

    /// The prefix that covers every address of the family (`0/0`).
    pub fn default_route() -> Self {
        Self {
            net: AF::zero_addr(),
            len: 0,
        }
    }

    /// The prefix of maximum length for `addr`.
    pub fn host(addr: AF) -> Self {
        Self {
            net: addr,
            len: AF::BITS,
        }
    }

    pub fn net(&self) -> AF {
        self.net
    }

    pub fn len(&self) -> u8 {
        self.len
    }

    pub fn is_default_route(&self) -> bool {
        self.len == 0
    }

    /// Whether `addr` lies inside this prefix.
    pub fn contains(&self, addr: AF) -> bool {
        addr.truncate_to_len(self.len) == self.net
    }

    /// The next prefix of the same length, i.e. the prefix incremented by
    /// one unit at its mask boundary: 10.0.0.0/8 becomes 11.0.0.0/8.
    ///
    /// Returns None if there is no such prefix, that is for 0/0 and for the
    /// last prefix of its length (the increment would wrap to zero).
    pub fn successor(&self) -> Option<Self> {
        if self.len == 0 {
            return None;
        }
        let shift = (AF::BITS - self.len) as usize;
        let unit = CheckedAdd::checked_add(
            &(self.net.into_inner() >> shift),
            &<AF::Inner as One>::one(),
        )?;
        let next = AF::new(unit << shift);
        if next.is_zero() {
            return None;
        }
        Some(Self {
            net: next,
            len: self.len,
        })
    }
}

impl<AF: AddressFamily> fmt::Display for PrefixId<AF> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.net.fmt_net(), self.len)
    }
}

impl<AF: AddressFamily> TryFrom<inetnum::addr::Prefix> for PrefixId<AF> {
    type Error = MrtError;

    fn try_from(value: inetnum::addr::Prefix) -> Result<Self, Self::Error> {
        Self::new(AF::try_from_ipaddr(value.addr())?, value.len())
    }
}

// There is no reasonable way for this to panic, PrefixId and inetnum's Prefix
// represent the same data in slightly different ways, and the net of a
// PrefixId never has host bits set.
#[allow(clippy::unwrap_used)]
impl<AF: AddressFamily> From<PrefixId<AF>> for inetnum::addr::Prefix {
    fn from(value: PrefixId<AF>) -> Self {
        Self::new(value.net().into_ipaddr(), value.len()).unwrap()
    }
}
