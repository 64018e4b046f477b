//! The Multicast Routing Information Base.
//!
//! An [MribTable] holds the unicast-style routes that multicast routing
//! uses for reverse-path forwarding checks, for one address family. A
//! [DualStackMrib] combines a table for IPv4 and a table for IPv6.
pub mod config;

mod dual_stack;
mod iterators;
mod node;
mod pending;
mod table;

pub use dual_stack::{DualStackMrib, MribRef};
pub use iterators::MribIter;
pub use pending::{PendingOp, PendingTransaction, TransactionId};
pub use table::MribTable;
