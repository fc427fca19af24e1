//! Foundation types for fragment storage.
//!
//! This crate provides the identity, media-type, and format tables used
//! throughout the workspace. Every other fragments crate depends on
//! `fragments-types`.
//!
//! # Key Types
//!
//! - [`FragmentId`] — Opaque fragment identifier (UUID v7 when generated)
//! - [`OwnerId`] — Identifier of the owning principal
//! - [`MediaType`] — The closed set of supported base media types
//! - [`ContentType`] — A declared media type string with parameters preserved
//! - [`Extension`] — File-extension tokens used to request an output format
//! - [`FragmentRecord`] — The persisted metadata record
//!
//! The format compatibility matrix lives in [`formats`].

pub mod error;
pub mod extension;
pub mod formats;
pub mod ids;
pub mod media;
pub mod record;

pub use error::TypeError;
pub use extension::{split_identifier, Extension};
pub use formats::{compatible_targets, compatible_types, is_compatible};
pub use ids::{FragmentId, OwnerId};
pub use media::{ContentType, MediaType};
pub use record::FragmentRecord;
