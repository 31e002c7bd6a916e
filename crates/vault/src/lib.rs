//! Vault storage layer for cardboard
//!
//! The vault is the directory tree that holds both the documents users open
//! and the canvas files the sync engine mutates. Everything goes through the
//! [`VaultBackend`] trait so the engine can run against the real filesystem
//! or an in-memory fake in tests.

pub mod backend;
pub mod local;
pub mod memory;

pub use backend::{FileInfo, VaultBackend};
pub use local::LocalVault;
pub use memory::MemoryVault;
