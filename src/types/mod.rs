pub(crate) mod af;
pub(crate) mod mrib_entry;
pub(crate) mod prefix_id;

pub(crate) use prefix_id::PrefixId;

pub mod errors;
pub mod stats;
