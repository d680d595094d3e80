//! Stock movement domain module.
//!
//! This crate contains the ledger vocabulary and its invariants, implemented
//! purely as deterministic domain logic (no IO, no HTTP, no storage).

pub mod movement;

pub use movement::{
    chain_is_consistent, MovementRecord, MovementRequest, MovementType,
};
