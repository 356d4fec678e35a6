use serde::{Deserialize, Serialize};

use super::id_macro::impl_id;

/// Identifier of a saved poem. Unique within a collection and never reused.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PoemId(String);

impl_id!(PoemId);
