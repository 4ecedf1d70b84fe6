//! # Domain Layer (Inner Hexagon)
//!
//! Pure business logic of the batch lifecycle.
//! NO I/O, NO locking, NO knowledge of how roles are administered.
//!
//! ## Components (leaves first)
//!
//! - `guard`: role and recipient checks over a `GovernanceContext`
//! - `history`: append-only per-batch audit log
//! - `batch_store`: batch records and the id counter
//! - `state` / `changeset`: atomic commits across store and log
//! - `engine`: register, transfer, split, merge, verify

pub mod batch_store;
pub mod changeset;
pub mod engine;
pub mod entities;
pub mod guard;
pub mod history;
pub mod invariants;
pub mod state;
pub mod value_objects;

pub use batch_store::BatchStore;
pub use changeset::Changeset;
pub use engine::{
    LifecycleEngine, MergeReceipt, RegisterReceipt, SplitReceipt, TransferReceipt, VerifyReceipt,
};
pub use entities::*;
pub use guard::GovernanceContext;
pub use history::HistoryLog;
pub use invariants::*;
pub use state::LedgerState;
pub use value_objects::*;
