//! Storage port for fragments.
//!
//! The core persists two things per `(owner_id, fragment_id)` key: the
//! metadata record and the raw data blob. This crate defines the contract
//! ([`FragmentStore`]) the core depends on and ships one backend.
//!
//! # Storage Backends
//!
//! - [`InMemoryFragmentStore`] -- `HashMap`-based store for tests and embedding
//!
//! # Design Rules
//!
//! 1. Metadata and data share one key; no fragment can alias another's blob.
//! 2. Listing returns fragments in insertion order per owner.
//! 3. Writes to one key are linearizable; [`FragmentStore::put_fragment`]
//!    makes new bytes and new metadata visible together.
//! 4. There is no cross-key ordering guarantee.
//! 5. Deleting an absent key is reported, never silently ignored.
//! 6. The store never interprets data bytes.

pub mod error;
pub mod memory;
pub mod traits;

pub use error::{StoreError, StoreResult};
pub use memory::InMemoryFragmentStore;
pub use traits::FragmentStore;
