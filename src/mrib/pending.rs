use crate::types::mrib_entry::{Mrib, VifIndex};
use crate::types::PrefixId;
use crate::AddressFamily;

/// The identifier of an external (configuration) transaction.
pub type TransactionId = u32;

//------------ PendingOp -----------------------------------------------------

/// A table mutation that has been queued, but not applied yet.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PendingOp<AF: AddressFamily> {
    Insert(Mrib<AF>),
    Remove(Mrib<AF>),
    RemoveAll,
}

//------------ PendingTransaction --------------------------------------------

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PendingTransaction<AF: AddressFamily> {
    tid: TransactionId,
    op: PendingOp<AF>,
}

impl<AF: AddressFamily> PendingTransaction<AF> {
    pub fn tid(&self) -> TransactionId {
        self.tid
    }

    pub fn op(&self) -> &PendingOp<AF> {
        &self.op
    }

    pub fn mrib(&self) -> Option<&Mrib<AF>> {
        match &self.op {
            PendingOp::Insert(mrib) | PendingOp::Remove(mrib) => Some(mrib),
            PendingOp::RemoveAll => None,
        }
    }
}

//------------ PendingTransactions -------------------------------------------

// All queued operations of a table, for all transaction ids, in submission
// order.
#[derive(Clone, Debug)]
pub(crate) struct PendingTransactions<AF: AddressFamily> {
    list: Vec<PendingTransaction<AF>>,
}

impl<AF: AddressFamily> PendingTransactions<AF> {
    pub fn new() -> Self {
        Self { list: vec![] }
    }

    pub fn push(&mut self, tid: TransactionId, op: PendingOp<AF>) {
        self.list.push(PendingTransaction { tid, op });
    }

    // Remove and return the operations for `tid`, in submission order. The
    // operations of the other transactions keep their relative order.
    pub fn take(&mut self, tid: TransactionId) -> Vec<PendingOp<AF>> {
        let (taken, kept): (Vec<_>, Vec<_>) = std::mem::take(&mut self.list)
            .into_iter()
            .partition(|t| t.tid == tid);
        self.list = kept;
        taken.into_iter().map(|t| t.op).collect()
    }

    // Drop the operations for `tid`. Returns how many there were.
    pub fn discard(&mut self, tid: TransactionId) -> usize {
        let before = self.list.len();
        self.list.retain(|t| t.tid != tid);
        before - self.list.len()
    }

    pub fn update_entry_vif_index(
        &mut self,
        dest_prefix: &PrefixId<AF>,
        vif_index: VifIndex,
    ) {
        for t in self.list.iter_mut() {
            match &mut t.op {
                PendingOp::Insert(mrib) | PendingOp::Remove(mrib)
                    if mrib.dest_prefix() == *dest_prefix =>
                {
                    mrib.set_next_hop_vif_index(vif_index);
                }
                _ => {}
            }
        }
    }

    pub fn contains_tid(&self, tid: TransactionId) -> bool {
        self.list.iter().any(|t| t.tid == tid)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, PendingTransaction<AF>> {
        self.list.iter()
    }

    pub fn len(&self) -> usize {
        self.list.len()
    }

    pub fn clear(&mut self) {
        self.list.clear();
    }
}
