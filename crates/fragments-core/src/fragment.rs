//! The fragment entity.
//!
//! A [`Fragment`] is the in-memory form of a validated metadata record. It
//! is created by [`Fragment::create`] and only changes through the
//! repository, which advances `updated` and keeps `size` in step with the
//! stored bytes.

use chrono::{DateTime, Duration, Utc};
use fragments_types::{
    compatible_targets, ContentType, FragmentId, FragmentRecord, MediaType, OwnerId,
};
use serde::{Deserialize, Serialize};

use crate::error::{FragmentError, FragmentResult};

/// Construction input for a fragment.
///
/// `owner_id`, `content_type` and `size` are required in substance; the
/// rest defaults to a fresh id and the current time.
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewFragment {
    pub owner_id: Option<String>,
    #[serde(rename = "type")]
    pub content_type: Option<String>,
    #[serde(default)]
    pub size: i64,
    pub id: Option<String>,
    pub created: Option<DateTime<Utc>>,
    pub updated: Option<DateTime<Utc>>,
}

impl NewFragment {
    pub fn new(owner_id: impl Into<String>, content_type: impl Into<String>) -> Self {
        Self {
            owner_id: Some(owner_id.into()),
            content_type: Some(content_type.into()),
            ..Self::default()
        }
    }

    pub fn with_size(mut self, size: i64) -> Self {
        self.size = size;
        self
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn with_created(mut self, at: DateTime<Utc>) -> Self {
        self.created = Some(at);
        self
    }

    pub fn with_updated(mut self, at: DateTime<Utc>) -> Self {
        self.updated = Some(at);
        self
    }
}

/// A validated fragment metadata record.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "FragmentRecord", into = "FragmentRecord")]
pub struct Fragment {
    record: FragmentRecord,
}

impl Fragment {
    /// Validate a draft into a fragment. Nothing is persisted.
    pub fn create(draft: NewFragment) -> FragmentResult<Self> {
        let owner = match draft.owner_id {
            Some(owner) if !owner.trim().is_empty() => OwnerId::new(owner)?,
            _ => return Err(FragmentError::Validation("ownerId is required".into())),
        };
        let raw_type = match draft.content_type {
            Some(t) if !t.trim().is_empty() => t,
            _ => return Err(FragmentError::Validation("type is required".into())),
        };
        let size = u64::try_from(draft.size).map_err(|_| {
            FragmentError::Validation(format!("size must not be negative, got {}", draft.size))
        })?;
        let id = match draft.id {
            Some(id) => FragmentId::parse(id)?,
            None => FragmentId::generate(),
        };

        let now = Utc::now();
        let created = draft.created.unwrap_or(now);
        let updated = draft.updated.unwrap_or_else(|| created.max(now));

        // Type support is checked last so shape errors are reported first.
        let content_type = ContentType::parse(&raw_type)?;

        Self::from_record(FragmentRecord {
            id,
            owner_id: owner,
            created,
            updated,
            content_type,
            size,
        })
    }

    /// Build a fragment from JSON metadata, as a boundary layer receives it.
    ///
    /// Shape errors (a non-numeric `size`, say) become validation failures.
    pub fn from_json(value: serde_json::Value) -> FragmentResult<Self> {
        let draft: NewFragment = serde_json::from_value(value)
            .map_err(|e| FragmentError::Validation(e.to_string()))?;
        Self::create(draft)
    }

    /// Wrap a persisted record, checking its timestamps.
    pub fn from_record(record: FragmentRecord) -> FragmentResult<Self> {
        if record.created > record.updated {
            return Err(FragmentError::Validation(format!(
                "created ({}) is after updated ({})",
                record.created, record.updated
            )));
        }
        Ok(Self { record })
    }

    pub fn id(&self) -> &FragmentId {
        &self.record.id
    }

    pub fn owner_id(&self) -> &OwnerId {
        &self.record.owner_id
    }

    pub fn created(&self) -> DateTime<Utc> {
        self.record.created
    }

    pub fn updated(&self) -> DateTime<Utc> {
        self.record.updated
    }

    /// The declared type, parameters included.
    pub fn content_type(&self) -> &ContentType {
        &self.record.content_type
    }

    pub fn size(&self) -> u64 {
        self.record.size
    }

    /// The declared type without parameters.
    pub fn base_type(&self) -> MediaType {
        self.record.content_type.media_type()
    }

    pub fn is_textual(&self) -> bool {
        self.base_type().is_textual()
    }

    /// Types this fragment can be rendered as, itself included.
    pub fn compatible_types(&self) -> &'static [MediaType] {
        compatible_targets(self.base_type())
    }

    pub fn record(&self) -> &FragmentRecord {
        &self.record
    }

    pub fn into_record(self) -> FragmentRecord {
        self.record
    }

    /// A copy with `updated` advanced, for the next metadata write.
    pub(crate) fn touched(&self) -> Self {
        let mut next = self.clone();
        next.record.updated = advance(self.record.updated);
        next
    }

    /// A copy describing new data of `size` bytes.
    pub(crate) fn resized(&self, size: u64) -> Self {
        let mut next = self.touched();
        next.record.size = size;
        next
    }
}

/// The current time, or one microsecond past `previous` if the clock has
/// not moved beyond it.
fn advance(previous: DateTime<Utc>) -> DateTime<Utc> {
    let now = Utc::now();
    if now > previous {
        now
    } else {
        previous + Duration::microseconds(1)
    }
}

impl TryFrom<FragmentRecord> for Fragment {
    type Error = FragmentError;

    fn try_from(record: FragmentRecord) -> FragmentResult<Self> {
        Self::from_record(record)
    }
}

impl From<Fragment> for FragmentRecord {
    fn from(fragment: Fragment) -> Self {
        fragment.record
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use chrono::TimeZone;
    use proptest::prelude::*;
    use serde_json::json;

    fn at(hour: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, 1, hour, 0, 0).unwrap()
    }

    // -----------------------------------------------------------------------
    // Construction
    // -----------------------------------------------------------------------

    #[test]
    fn create_with_defaults() {
        let fragment = Fragment::create(NewFragment::new("user1", "text/plain")).unwrap();
        assert_eq!(fragment.owner_id().as_str(), "user1");
        assert_eq!(fragment.size(), 0);
        assert_eq!(fragment.base_type(), MediaType::TextPlain);
        assert!(fragment.created() <= fragment.updated());
        assert!(!fragment.id().as_str().is_empty());
    }

    #[test]
    fn generated_ids_are_unique() {
        let a = Fragment::create(NewFragment::new("u", "text/plain")).unwrap();
        let b = Fragment::create(NewFragment::new("u", "text/plain")).unwrap();
        assert_ne!(a.id(), b.id());
    }

    #[test]
    fn explicit_fields_are_kept() {
        let fragment = Fragment::create(
            NewFragment::new("user1", "text/plain; charset=utf-8")
                .with_id("abc")
                .with_size(13)
                .with_created(at(1))
                .with_updated(at(2)),
        )
        .unwrap();
        assert_eq!(fragment.id().as_str(), "abc");
        assert_eq!(fragment.size(), 13);
        assert_eq!(fragment.created(), at(1));
        assert_eq!(fragment.updated(), at(2));
        assert_eq!(fragment.content_type().as_str(), "text/plain; charset=utf-8");
        assert_eq!(fragment.base_type(), MediaType::TextPlain);
    }

    #[test]
    fn missing_owner_or_type_is_validation_error() {
        let no_owner = NewFragment {
            content_type: Some("text/plain".into()),
            ..NewFragment::default()
        };
        assert_eq!(
            Fragment::create(no_owner).unwrap_err().kind(),
            ErrorKind::Validation
        );

        let no_type = NewFragment {
            owner_id: Some("u".into()),
            ..NewFragment::default()
        };
        assert_eq!(
            Fragment::create(no_type).unwrap_err().kind(),
            ErrorKind::Validation
        );

        let blank_owner = NewFragment::new("  ", "text/plain");
        assert_eq!(
            Fragment::create(blank_owner).unwrap_err().kind(),
            ErrorKind::Validation
        );
    }

    #[test]
    fn negative_size_is_validation_error() {
        let err = Fragment::create(NewFragment::new("u", "text/plain").with_size(-1)).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Validation);
    }

    #[test]
    fn unsupported_type_is_its_own_error() {
        let err = Fragment::create(NewFragment::new("u", "application/msword")).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::UnsupportedType);
    }

    #[test]
    fn malformed_type_is_validation_error() {
        let err = Fragment::create(NewFragment::new("u", "not a type")).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Validation);
    }

    #[test]
    fn shape_errors_win_over_unsupported_type() {
        let draft = NewFragment::new("u", "application/msword").with_size(-5);
        let err = Fragment::create(draft).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Validation);
    }

    #[test]
    fn created_after_updated_is_rejected() {
        let err = Fragment::create(
            NewFragment::new("u", "text/plain")
                .with_created(at(3))
                .with_updated(at(2)),
        )
        .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Validation);
    }

    #[test]
    fn future_created_without_updated_is_consistent() {
        let future = Utc::now() + Duration::hours(1);
        let fragment =
            Fragment::create(NewFragment::new("u", "text/plain").with_created(future)).unwrap();
        assert_eq!(fragment.updated(), future);
    }

    #[test]
    fn ids_with_a_dot_are_rejected() {
        let draft = NewFragment::new("u", "text/plain").with_id("a.txt");
        let err = Fragment::create(draft).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Validation);
    }

    // -----------------------------------------------------------------------
    // JSON boundary
    // -----------------------------------------------------------------------

    #[test]
    fn from_json_accepts_record_shape() {
        let fragment = Fragment::from_json(json!({
            "ownerId": "user1",
            "type": "text/markdown",
            "size": 4,
        }))
        .unwrap();
        assert_eq!(fragment.base_type(), MediaType::TextMarkdown);
        assert_eq!(fragment.size(), 4);
    }

    #[test]
    fn from_json_rejects_non_numeric_size() {
        let err = Fragment::from_json(json!({
            "ownerId": "user1",
            "type": "text/plain",
            "size": "4",
        }))
        .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Validation);
    }

    #[test]
    fn serializes_as_record() {
        let fragment = Fragment::create(
            NewFragment::new("user1", "text/plain")
                .with_id("a1")
                .with_created(at(1))
                .with_updated(at(1)),
        )
        .unwrap();
        let value = serde_json::to_value(&fragment).unwrap();
        assert_eq!(value["ownerId"], "user1");
        assert_eq!(value["type"], "text/plain");
        assert_eq!(value["size"], 0);

        let back: Fragment = serde_json::from_value(value).unwrap();
        assert_eq!(back, fragment);
    }

    // -----------------------------------------------------------------------
    // Derived properties
    // -----------------------------------------------------------------------

    #[test]
    fn derived_properties() {
        let md = Fragment::create(NewFragment::new("u", "text/markdown")).unwrap();
        assert!(md.is_textual());
        assert_eq!(
            md.compatible_types(),
            &[MediaType::TextMarkdown, MediaType::TextHtml, MediaType::TextPlain]
        );

        let png = Fragment::create(NewFragment::new("u", "image/png")).unwrap();
        assert!(!png.is_textual());
        assert_eq!(png.compatible_types().len(), 5);
    }

    #[test]
    fn touched_strictly_advances() {
        let future = Utc::now() + Duration::hours(1);
        let fragment = Fragment::create(
            NewFragment::new("u", "text/plain")
                .with_created(future)
                .with_updated(future),
        )
        .unwrap();
        let next = fragment.touched();
        assert!(next.updated() > fragment.updated());
        assert_eq!(next.created(), fragment.created());
    }

    proptest! {
        #[test]
        fn negative_sizes_never_construct(size in i64::MIN..0) {
            let result = Fragment::create(NewFragment::new("u", "text/plain").with_size(size));
            prop_assert_eq!(result.unwrap_err().kind(), ErrorKind::Validation);
        }

        #[test]
        fn non_negative_sizes_construct(size in 0..i64::MAX) {
            let draft = NewFragment::new("u", "text/plain").with_size(size);
            let fragment = Fragment::create(draft).unwrap();
            prop_assert_eq!(fragment.size(), size as u64);
        }
    }
}
