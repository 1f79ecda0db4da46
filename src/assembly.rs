use ckb_spore_codec::Action;
use ckb_spore_config::ScriptKind;
use ckb_spore_error::Result;
use ckb_spore_skeleton::TransactionSkeleton;
use ckb_types::{
    core::{Capacity, TransactionView},
    packed::OutPoint,
};

/// How an existing object takes part in a transaction.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Resolution {
    /// Another cell guarded by the object's lock is unlocked in the
    /// transaction; the object only appears as a cell dep.
    LockProxy,
    /// The object is consumed at `input_index` and recreated unchanged at
    /// the fixed `output_index`.
    Cell {
        input_index: usize,
        output_index: usize,
    },
    /// The object owner is paid `amount` by the fixed output at
    /// `output_index`. Payments to one lock share a single output.
    Payment {
        output_index: usize,
        amount: Capacity,
    },
    /// The object is only read through a cell dep.
    CellDep,
}

/// An existing object an operation relies on.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Reference {
    pub kind: ScriptKind,
    pub id: [u8; 32],
    pub out_point: OutPoint,
    pub resolution: Resolution,
}

/// The outcome of an object operation.
#[derive(Clone, Debug)]
pub struct Assembly {
    pub skeleton: TransactionSkeleton,
    /// The created or recreated object, or the redeem output of a melt.
    pub output_index: usize,
    pub references: Vec<Reference>,
    /// Cobuild actions sealed into the trailing witness.
    pub actions: Vec<Action>,
}

impl Assembly {
    pub fn transaction(&self) -> Result<TransactionView> {
        self.skeleton.to_transaction_view()
    }

    pub fn reference(&self, kind: ScriptKind) -> Option<&Reference> {
        self.references.iter().find(|reference| reference.kind == kind)
    }
}
