//------------ Types for Statistics -----------------------------------------

use std::fmt::{Debug, Display};

use serde_derive::Serialize;

//------------ PrefixLenCount -----------------------------------------------

/// The number of entries stored for one prefix length.
#[derive(Copy, Clone, PartialEq, Eq, Serialize)]
pub struct PrefixLenCount {
    pub len: u8,
    pub count: usize,
}

impl Debug for PrefixLenCount {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        f.write_fmt(format_args!("/{}: {}", &self.len, &self.count))
    }
}

//------------ Counters -----------------------------------------------------
//
// This is the struct that's part of the data structure of each MRIB table.
// The tables are only ever touched from one thread, so the counters are
// plain integers.

#[derive(Debug, Clone)]
pub(crate) struct Counters {
    // number of entries per prefix length, 0 up to and including 128
    prefixes: [usize; 129],
}

impl Counters {
    pub fn prefixes_count(&self) -> usize {
        self.prefixes.iter().sum()
    }

    pub fn inc_prefixes_count(&mut self, len: u8) {
        if let Some(p) = self.prefixes.get_mut(len as usize) {
            *p += 1;
        }
    }

    pub fn dec_prefixes_count(&mut self, len: u8) {
        if let Some(p) = self.prefixes.get_mut(len as usize) {
            debug_assert!(*p > 0);
            *p = p.saturating_sub(1);
        }
    }

    pub fn reset(&mut self) {
        self.prefixes = [0; 129];
    }

    pub fn prefix_stats(&self) -> Vec<PrefixLenCount> {
        self.prefixes
            .iter()
            .enumerate()
            .filter_map(|(len, count)| -> Option<PrefixLenCount> {
                if *count != 0 {
                    Some(PrefixLenCount {
                        len: len as u8,
                        count: *count,
                    })
                } else {
                    None
                }
            })
            .collect()
    }
}

impl Default for Counters {
    fn default() -> Self {
        Self { prefixes: [0; 129] }
    }
}

//------------ MribStats ----------------------------------------------------
//
// A snapshot of the counters of an MRIB table, returned to users.

#[derive(Debug, Clone, Serialize)]
pub struct MribStats {
    // number of lookup nodes in the trie, including the root
    pub(crate) nodes: usize,
    // number of committed entries
    pub(crate) entries: usize,
    // number of queued transaction operations, all tids together
    pub(crate) pending: usize,
    // number of removed entries held on the retention list
    pub(crate) retained: usize,
    pub(crate) prefixes: Vec<PrefixLenCount>,
}

impl MribStats {
    pub fn nodes(&self) -> usize {
        self.nodes
    }

    pub fn entries(&self) -> usize {
        self.entries
    }

    pub fn pending(&self) -> usize {
        self.pending
    }

    pub fn retained(&self) -> usize {
        self.retained
    }

    pub fn prefixes(&self) -> &[PrefixLenCount] {
        &self.prefixes
    }

    /// Serialize the snapshot as a JSON object.
    pub fn to_json(&self) -> serde_json::Value {
        serde_json::to_value(self).unwrap_or(serde_json::Value::Null)
    }
}

impl Display for MribStats {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "lookup nodes:\t{}", self.nodes)?;
        writeln!(f, "entries:\t{}", self.entries)?;
        writeln!(f, "pending:\t{}", self.pending)?;
        writeln!(f, "retained:\t{}", self.retained)?;
        write!(f, "per length:\t{:?}", self.prefixes)
    }
}
