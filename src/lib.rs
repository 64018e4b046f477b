#![deny(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic,
    clippy::indexing_slicing
)]

//! Multicast routing tables, for IPv4 and IPv6.
//!
//! This crate provides the two in-memory tables at the core of a multicast
//! routing process:
//!
//! * The Multicast Routing Information Base, an [MribTable](mrib::MribTable)
//!   per address family, that answers longest-prefix-match lookups for the
//!   reverse-path forwarding check. It is a binary trie over the bits of
//!   the destination prefixes. Updates can be applied directly, or queued
//!   per transaction and applied all at once on commit.
//! * The Multicast Routing Table, an [Mrt](mrt::Mrt), that holds the
//!   per-(S,G) state of a protocol, indexed both source-first and
//!   group-first, with point, prefix and range queries in either order.
//!
//! Both tables are single-threaded data structures without any I/O. Their
//! iterators borrow the table, so a table cannot be changed while it is
//! being iterated over.
mod types;

// re-exports
pub use inetnum::addr;

// Public Interfaces on the root of the crate

/// Multicast Routing Information Base tables
pub mod mrib;

/// Multicast Routing Tables keyed on (S,G)
pub mod mrt;

/// Error types returned by the tables
pub use types::errors;

/// Trait that defines the address families IPv4 and IPv6
pub use types::af::AddressFamily;

/// The underlying value (u32) and trait impl for IPv4.
pub use types::af::IPv4;
/// The underlying value (u128) and trait impl for IPv6.
pub use types::af::IPv6;

/// A network prefix of one address family
pub use types::prefix_id::PrefixId;

/// MRIB entries and their next hop information
pub use types::mrib_entry::{Mrib, NextHop, VifIndex};

/// Statistics returned by the tables
pub use types::stats;
