//! Fragment entity and repository.
//!
//! This is the main entry point for applications embedding fragment
//! storage. A [`Fragment`] is a validated metadata record; the
//! [`Fragments`] repository persists fragments through an explicitly
//! supplied [`FragmentStore`](fragments_store::FragmentStore), resolves
//! extension requests against the compatibility matrix, and runs the
//! conversion engine.
//!
//! ```ignore
//! let fragments = Fragments::in_memory();
//! let owner = OwnerId::new("user1")?;
//! let fragment = fragments
//!     .create_with_data(&owner, "text/markdown", "# Hi")
//!     .await?;
//! let html = fragments.read_as(&owner, &format!("{}.html", fragment.id())).await?;
//! ```

pub mod config;
pub mod error;
pub mod fragment;
mod locks;
pub mod repository;
pub mod resolver;

pub use config::{ConfigError, FragmentsConfig};
pub use error::{ErrorKind, FragmentError, FragmentResult};
pub use fragment::{Fragment, NewFragment};
pub use repository::{FragmentList, Fragments, Rendition};
pub use resolver::{parse_identifier, resolve_extension};

// Re-export key types
pub use fragments_convert::Converted;
pub use fragments_store::{FragmentStore, InMemoryFragmentStore};
pub use fragments_types::{
    compatible_types, ContentType, Extension, FragmentId, FragmentRecord, MediaType, OwnerId,
};
