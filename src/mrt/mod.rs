//! The Multicast Routing Table.
//!
//! An [Mrt] keeps the per-(S,G) state of a multicast routing protocol,
//! indexed both source-first and group-first, so that it can answer
//! "everything for this source" as well as "everything for this group"
//! queries, on exact addresses or on prefixes.
mod entry;
mod iterators;
mod source_group;
mod table;

pub use entry::Mre;
pub use iterators::{GsRange, MreRange, SgRange};
pub use source_group::{GsKey, SgKey, SourceGroup};
pub use table::Mrt;
