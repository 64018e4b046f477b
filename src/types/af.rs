use std::net::IpAddr;

use num_traits::{Bounded, CheckedAdd, One, PrimInt, Zero};
use zerocopy::{NetworkEndian, U128};

use crate::types::errors::MrtError;

//------------ AddressFamily (trait) ----------------------------------------
//
/// The address family of an IP address as a Trait.
///
/// Each family is a separate type, so that a table for IPv4 only ever holds
/// 4-octet addresses. The value is kept in network byte order, which makes
/// the big-endian bit numbering used by the lookup trie (bit 0 is the most
/// significant bit) the natural one.
pub trait AddressFamily:
    std::fmt::Binary
    + std::fmt::Debug
    + std::hash::Hash
    + std::fmt::Display
    + Eq
    + Copy
    + Ord
    + zerocopy::FromBytes
    + zerocopy::IntoBytes
    + zerocopy::KnownLayout
    + zerocopy::Immutable
    + zerocopy::Unaligned
{
    /// The number of bits in the byte representation of the family.
    const BITS: u8;

    /// The type actually holding the value, u32 for IPv4, and u128 for IPv6.
    type Inner: PrimInt + Into<Self> + std::fmt::Debug;

    /// The std::net that the value of self belongs to. So,
    /// [std::net::Ipv4Addr], and [std::net::Ipv6Addr] for IPv4, and IPv6
    /// respectively.
    type InnerIpAddr;

    fn new(value: Self::Inner) -> Self {
        value.into()
    }

    /// The host order integer value of self.
    fn into_inner(self) -> Self::Inner;

    fn from_ipaddr(ip_addr: Self::InnerIpAddr) -> Self;

    /// Turn self in to a [std::net::IpAddr].
    fn into_ipaddr(self) -> IpAddr;

    /// Convert a family-less address into this family. Fails if the
    /// address belongs to the other family.
    fn try_from_ipaddr(ip_addr: IpAddr) -> Result<Self, MrtError> {
        match ip_addr {
            IpAddr::V4(addr) => Self::read_from_bytes(&addr.octets())
                .map_err(|_| MrtError::AddressFamilyMismatch),
            IpAddr::V6(addr) => Self::read_from_bytes(&addr.octets())
                .map_err(|_| MrtError::AddressFamilyMismatch),
        }
    }

    fn zero_addr() -> Self {
        Self::new(<Self::Inner as Zero>::zero())
    }

    fn all_ones() -> Self {
        Self::new(<Self::Inner as Bounded>::max_value())
    }

    fn is_zero(self) -> bool {
        self.into_inner().is_zero()
    }

    /// Returns the bit at `pos`, counting from the most significant bit.
    fn bit_at(self, pos: u8) -> bool {
        debug_assert!(pos < Self::BITS);
        let one = <Self::Inner as One>::one();
        (self.into_inner() >> (Self::BITS - 1 - pos) as usize) & one == one
    }

    /// fill the bits after the specified len with zeros. Interpreted as an IP
    /// Prefix, this means that self will be truncated to the specified len.
    fn truncate_to_len(self, len: u8) -> Self {
        if len == 0 {
            return Self::zero_addr();
        }
        if len >= Self::BITS {
            return self;
        }
        let mask = <Self::Inner as Bounded>::max_value()
            << (Self::BITS - len) as usize;
        Self::new(self.into_inner() & mask)
    }

    /// Add one to self. Returns None if self is the all-ones address.
    fn checked_inc(self) -> Option<Self> {
        CheckedAdd::checked_add(
            &self.into_inner(),
            &<Self::Inner as One>::one(),
        )
        .map(Self::new)
    }

    fn fmt_net(self) -> String {
        self.into_ipaddr().to_string()
    }
}

//-------------- Ipv4 Type --------------------------------------------------

/// Exactly fitting IPv4 bytes (4 octets).
pub type IPv4 = zerocopy::U32<NetworkEndian>;

impl AddressFamily for IPv4 {
    const BITS: u8 = 32;
    type Inner = u32;
    type InnerIpAddr = std::net::Ipv4Addr;

    fn into_inner(self) -> u32 {
        u32::from(self)
    }

    fn from_ipaddr(ip_addr: Self::InnerIpAddr) -> Self {
        IPv4::from(ip_addr.octets())
    }

    fn into_ipaddr(self) -> IpAddr {
        IpAddr::V4(std::net::Ipv4Addr::from(u32::from(self)))
    }
}

//-------------- Ipv6 Type --------------------------------------------------

/// Exactly fitting IPv6 bytes (16 octets).
pub type IPv6 = U128<NetworkEndian>;

impl AddressFamily for IPv6 {
    const BITS: u8 = 128;
    type Inner = u128;
    type InnerIpAddr = std::net::Ipv6Addr;

    fn into_inner(self) -> u128 {
        u128::from(self)
    }

    fn from_ipaddr(ip_addr: Self::InnerIpAddr) -> Self {
        IPv6::from(ip_addr.octets())
    }

    fn into_ipaddr(self) -> IpAddr {
        IpAddr::V6(std::net::Ipv6Addr::from(u128::from(self)))
    }
}

