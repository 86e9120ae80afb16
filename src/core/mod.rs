//! Core logic – the carousel selection synchronizer and the data it selects
//! over.
//!
//! Nothing in this module depends on any TUI or rendering crate.

pub mod account;
pub mod carousel;
pub mod circles;
pub mod ledger;
pub mod transaction;
pub mod transfer;
