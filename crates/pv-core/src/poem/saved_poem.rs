use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::ids::PoemId;
use crate::photo::DataUri;

/// A poem persisted together with its own copy of the source image.
///
/// Records are immutable once created; the only lifecycle event after
/// creation is deletion by [`PoemId`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SavedPoem {
    pub id: PoemId,
    pub image_data_url: DataUri,
    pub poem_text: String,
    pub created_at: DateTime<Utc>,
}

impl SavedPoem {
    /// Creates a record with a freshly generated id.
    pub fn new(image_data_url: DataUri, poem_text: impl Into<String>, created_at: DateTime<Utc>) -> Self {
        Self {
            id: PoemId::new(),
            image_data_url,
            poem_text: poem_text.into(),
            created_at,
        }
    }
}
