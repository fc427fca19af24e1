//! The fragment repository.
//!
//! [`Fragments`] is the only place that writes through the storage port.
//! Writes to one `(owner, id)` key are serialized by a per-key lock so that
//! a fragment's `size` always matches its stored bytes and `updated` only
//! moves forward.

use std::sync::Arc;

use bytes::Bytes;
use fragments_convert::{convert, Converted, Family};
use fragments_store::{FragmentStore, InMemoryFragmentStore};
use fragments_types::{ContentType, Extension, FragmentId, MediaType, OwnerId};
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::config::FragmentsConfig;
use crate::error::{FragmentError, FragmentResult};
use crate::fragment::{Fragment, NewFragment};
use crate::locks::KeyLocks;
use crate::resolver::{parse_identifier, resolve_extension};

/// An owner's fragments, as ids or full records.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum FragmentList {
    Ids(Vec<FragmentId>),
    Expanded(Vec<Fragment>),
}

impl FragmentList {
    pub fn len(&self) -> usize {
        match self {
            Self::Ids(ids) => ids.len(),
            Self::Expanded(fragments) => fragments.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn ids(&self) -> Vec<&FragmentId> {
        match self {
            Self::Ids(ids) => ids.iter().collect(),
            Self::Expanded(fragments) => fragments.iter().map(Fragment::id).collect(),
        }
    }
}

/// Bytes served for a fragment, with the type they are in.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Rendition {
    pub content_type: ContentType,
    pub data: Bytes,
}

impl Rendition {
    fn converted(converted: Converted) -> Self {
        Self {
            content_type: converted.media_type.into(),
            data: Bytes::from(converted.data),
        }
    }
}

/// Fragment repository over an explicitly supplied store.
pub struct Fragments {
    store: Arc<dyn FragmentStore>,
    locks: KeyLocks,
    config: FragmentsConfig,
}

impl Fragments {
    pub fn new(store: Arc<dyn FragmentStore>) -> Self {
        Self::with_config(store, FragmentsConfig::default())
    }

    pub fn with_config(store: Arc<dyn FragmentStore>, config: FragmentsConfig) -> Self {
        Self {
            store,
            locks: KeyLocks::default(),
            config,
        }
    }

    /// A repository backed by a fresh in-memory store.
    pub fn in_memory() -> Self {
        Self::new(Arc::new(InMemoryFragmentStore::new()))
    }

    pub fn config(&self) -> &FragmentsConfig {
        &self.config
    }

    pub fn store(&self) -> &Arc<dyn FragmentStore> {
        &self.store
    }

    // -----------------------------------------------------------------------
    // Metadata
    // -----------------------------------------------------------------------

    /// An owner's fragments in insertion order. Unknown owners yield an
    /// empty list.
    pub async fn list_by_owner(
        &self,
        owner: &OwnerId,
        expand: bool,
    ) -> FragmentResult<FragmentList> {
        if !expand {
            return Ok(FragmentList::Ids(self.store.list_ids(owner).await?));
        }
        let fragments = self
            .store
            .list_records(owner)
            .await?
            .into_iter()
            .map(Fragment::from_record)
            .collect::<FragmentResult<Vec<_>>>()?;
        Ok(FragmentList::Expanded(fragments))
    }

    pub async fn load_by_id(&self, owner: &OwnerId, id: &FragmentId) -> FragmentResult<Fragment> {
        match self.store.get_metadata(owner, id).await? {
            Some(record) => Fragment::from_record(record),
            None => Err(FragmentError::not_found(owner, id)),
        }
    }

    /// Persist the metadata, advancing `updated`.
    ///
    /// If the fragment already has stored metadata, the stored `created` and
    /// `size` are kept, and a copy declaring a different type is rejected.
    pub async fn save(&self, fragment: &mut Fragment) -> FragmentResult<()> {
        let _guard = self.locks.lock(fragment.owner_id(), fragment.id()).await;
        let next = self.current(fragment).await?.touched();
        self.store
            .put_metadata(next.owner_id(), next.id(), next.record())
            .await?;
        *fragment = next;
        Ok(())
    }

    /// Remove a fragment's metadata and data.
    pub async fn delete(&self, owner: &OwnerId, id: &FragmentId) -> FragmentResult<()> {
        let _guard = self.locks.lock(owner, id).await;
        if !self.store.delete_all(owner, id).await? {
            return Err(FragmentError::not_found(owner, id));
        }
        info!(%owner, %id, "fragment deleted");
        Ok(())
    }

    // -----------------------------------------------------------------------
    // Data
    // -----------------------------------------------------------------------

    pub async fn read_data(&self, fragment: &Fragment) -> FragmentResult<Bytes> {
        self.store
            .get_data(fragment.owner_id(), fragment.id())
            .await?
            .ok_or_else(|| FragmentError::not_found(fragment.owner_id(), fragment.id()))
    }

    /// Replace a fragment's bytes, setting `size` and advancing `updated`.
    ///
    /// On failure nothing is changed, in storage or in `fragment`.
    pub async fn write_data(
        &self,
        fragment: &mut Fragment,
        data: impl Into<Bytes>,
    ) -> FragmentResult<()> {
        let data = data.into();
        self.check_size(&data)?;
        let _guard = self.locks.lock(fragment.owner_id(), fragment.id()).await;
        *fragment = self.commit(fragment, data).await?;
        Ok(())
    }

    /// Construct, save and fill a new fragment in one step.
    pub async fn create_with_data(
        &self,
        owner: &OwnerId,
        content_type: &str,
        data: impl Into<Bytes>,
    ) -> FragmentResult<Fragment> {
        let data = data.into();
        self.check_size(&data)?;
        let fragment = Fragment::create(NewFragment::new(owner.as_str(), content_type))?;
        let _guard = self.locks.lock(fragment.owner_id(), fragment.id()).await;
        let fragment = self.commit(&fragment, data).await?;
        info!(
            %owner,
            id = %fragment.id(),
            content_type = %fragment.content_type(),
            size = fragment.size(),
            "fragment created"
        );
        Ok(fragment)
    }

    /// Replace the bytes of an existing fragment.
    ///
    /// `content_type` must equal the fragment's declared type; a fragment's
    /// type never changes after creation.
    pub async fn replace_data(
        &self,
        owner: &OwnerId,
        id: &FragmentId,
        content_type: &str,
        data: impl Into<Bytes>,
    ) -> FragmentResult<Fragment> {
        let data = data.into();
        self.check_size(&data)?;
        let _guard = self.locks.lock(owner, id).await;
        let fragment = self.load_by_id(owner, id).await?;
        if content_type.trim() != fragment.content_type().as_str() {
            warn!(
                %owner,
                %id,
                requested = content_type,
                stored = %fragment.content_type(),
                "type mismatch on replace"
            );
            return Err(FragmentError::Validation(format!(
                "type {content_type} does not match the fragment's type {}",
                fragment.content_type()
            )));
        }
        self.commit(&fragment, data).await
    }

    /// Metadata and data read under one lock, so the pair is consistent.
    pub async fn load_with_data(
        &self,
        owner: &OwnerId,
        id: &FragmentId,
    ) -> FragmentResult<(Fragment, Bytes)> {
        let _guard = self.locks.lock(owner, id).await;
        let fragment = self.load_by_id(owner, id).await?;
        let data = self.read_data(&fragment).await?;
        Ok((fragment, data))
    }

    /// Write data and matching metadata. The caller holds the key's lock.
    async fn commit(&self, fragment: &Fragment, data: Bytes) -> FragmentResult<Fragment> {
        let next = self.current(fragment).await?.resized(data.len() as u64);
        self.store.put_fragment(next.record(), data).await?;
        debug!(id = %next.id(), size = next.size(), "fragment data written");
        Ok(next)
    }

    /// The stored version of `fragment`, or `fragment` itself if nothing is
    /// stored yet. The caller holds the key's lock.
    ///
    /// `type` and `created` are fixed at creation, so the stored record wins
    /// over the caller's copy, and a copy declaring another type is refused.
    async fn current(&self, fragment: &Fragment) -> FragmentResult<Fragment> {
        let Some(stored) = self
            .store
            .get_metadata(fragment.owner_id(), fragment.id())
            .await?
        else {
            return Ok(fragment.clone());
        };
        if &stored.content_type != fragment.content_type() {
            warn!(
                owner = %fragment.owner_id(),
                id = %fragment.id(),
                requested = %fragment.content_type(),
                stored = %stored.content_type,
                "type change refused"
            );
            return Err(FragmentError::Validation(format!(
                "type {} does not match the fragment's type {}",
                fragment.content_type(),
                stored.content_type
            )));
        }
        Fragment::from_record(stored)
    }

    fn check_size(&self, data: &Bytes) -> FragmentResult<()> {
        let size = data.len() as u64;
        if size > self.config.max_data_size {
            warn!(size, limit = self.config.max_data_size, "payload too large");
            return Err(FragmentError::Validation(format!(
                "payload of {size} bytes exceeds the limit of {} bytes",
                self.config.max_data_size
            )));
        }
        Ok(())
    }

    // -----------------------------------------------------------------------
    // Conversion
    // -----------------------------------------------------------------------

    /// Render a fragment's bytes as `extension`.
    ///
    /// A target equal to the fragment's own type returns the stored bytes
    /// unchanged. Unknown extensions fail with `UnsupportedConversion`.
    pub async fn convert(
        &self,
        fragment: &Fragment,
        extension: &str,
    ) -> FragmentResult<Rendition> {
        let source = fragment.base_type();
        let target: Extension =
            extension
                .parse()
                .map_err(|_| FragmentError::UnsupportedConversion {
                    from: source,
                    extension: extension.to_string(),
                })?;
        let data = self.read_data(fragment).await?;
        self.render(fragment, target, data).await
    }

    /// Serve `<id>` or `<id>.<ext>` for an owner.
    ///
    /// Without an extension the stored bytes come back with the fragment's
    /// declared type. With one, the extension must be a compatible target
    /// of the fragment's type.
    pub async fn read_as(&self, owner: &OwnerId, identifier: &str) -> FragmentResult<Rendition> {
        let (id, token) = parse_identifier(owner, identifier)?;
        let (fragment, data) = self.load_with_data(owner, &id).await?;
        let Some(token) = token else {
            return Ok(Rendition {
                content_type: fragment.content_type().clone(),
                data,
            });
        };
        let target = resolve_extension(fragment.base_type(), token)?;
        self.render(&fragment, target, data).await
    }

    async fn render(
        &self,
        fragment: &Fragment,
        target: Extension,
        data: Bytes,
    ) -> FragmentResult<Rendition> {
        let source = fragment.base_type();
        if target.media_type() == source {
            return Ok(Rendition {
                content_type: fragment.content_type().clone(),
                data,
            });
        }
        let converted = transcode(source, target, data).await?;
        debug!(
            id = %fragment.id(),
            from = %source,
            to = %converted.media_type,
            "fragment converted"
        );
        Ok(Rendition::converted(converted))
    }
}

impl std::fmt::Debug for Fragments {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Fragments")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

/// Run the conversion engine, off the async runtime for image codecs.
async fn transcode(source: MediaType, target: Extension, data: Bytes) -> FragmentResult<Converted> {
    if !Family::of(source).is_cpu_heavy() {
        return Ok(convert(source, target, &data)?);
    }
    let converted = tokio::task::spawn_blocking(move || convert(source, target, &data))
        .await
        .map_err(|e| FragmentError::Conversion(format!("conversion task failed: {e}")))??;
    Ok(converted)
}
