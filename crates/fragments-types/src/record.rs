use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::ids::{FragmentId, OwnerId};
use crate::media::ContentType;

/// The persisted metadata of a fragment.
///
/// This is the shape the storage layer keeps per `(owner_id, id)` key and
/// the shape callers see when they list fragments with `expand`. The field
/// names follow the public JSON representation (`ownerId`, `type`).
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FragmentRecord {
    pub id: FragmentId,
    pub owner_id: OwnerId,
    pub created: DateTime<Utc>,
    pub updated: DateTime<Utc>,
    #[serde(rename = "type")]
    pub content_type: ContentType,
    pub size: u64,
}
