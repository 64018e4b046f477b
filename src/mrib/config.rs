//------------ Config --------------------------------------------------------

//! Configuration options for an [MribTable](super::MribTable).
//!
//! A configuration is created by instantiating [MribConfig], setting its
//! fields, and passing it to
//! [new_with_config](super::MribTable::new_with_config).
//!
//! ```
//! use xorp_mrt::IPv4;
//! use xorp_mrt::mrib::MribTable;
//! use xorp_mrt::mrib::config::{MribConfig, RetentionStrategy};
//!
//! let config = MribConfig {
//!     retention: RetentionStrategy::Preserve,
//! };
//! let table = MribTable::<IPv4>::new_with_config(config);
//! assert!(table.is_preserving_removed_entries());
//! ```

use serde_derive::{Deserialize, Serialize};

use crate::errors::MrtError;

/// Defines what happens to an entry that is removed from the table, or
/// that is replaced by a newer entry for the same prefix.
#[derive(
    Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize,
)]
#[serde(rename_all = "kebab-case")]
pub enum RetentionStrategy {
    /// Removed entries are dropped immediately.
    #[default]
    Discard,
    /// Removed entries are moved to the retention list of the table, where
    /// they stay until the table is cleared or the list is taken.
    Preserve,
}

//------------ MribConfig ----------------------------------------------------

#[derive(
    Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize,
)]
#[serde(default, deny_unknown_fields)]
pub struct MribConfig {
    pub retention: RetentionStrategy,
}

impl MribConfig {
    /// A configuration that keeps removed entries on the retention list.
    pub fn preserving() -> Self {
        Self {
            retention: RetentionStrategy::Preserve,
        }
    }

    /// Parse a configuration from JSON, e.g. `{"retention": "preserve"}`.
    /// Missing fields take their default value.
    pub fn from_json(json: &str) -> Result<Self, MrtError> {
        serde_json::from_str(json).map_err(|_| MrtError::ConfigInvalid)
    }

    pub fn is_preserving(&self) -> bool {
        self.retention == RetentionStrategy::Preserve
    }
}
