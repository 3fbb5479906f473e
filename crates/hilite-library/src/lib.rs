//! # hilite-library
//!
//! An in-process [`LibraryHost`](hilite_core::LibraryHost) and JSON library
//! snapshots, so summaries can be produced against an exported library and
//! the engine can be tested without a running reference manager.

pub mod memory;
pub mod snapshot;

pub use memory::{FailurePoint, HostCall, MemoryLibrary};
pub use snapshot::LibrarySnapshot;
