use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use super::GenerationError;

/// Input of the poem generation gateway.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeneratePoemInput {
    /// `data:<mimetype>;base64,<encoded_data>`
    pub photo_data_uri: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeneratePoemOutput {
    pub poem: String,
}

/// Hosted generative model turning a photo into a poem.
///
/// Opaque to the core: photo in, poem text out, or an error. Calls have no
/// timeout; they resolve whenever the remote side answers.
#[async_trait]
pub trait PoemGeneratorPort: Send + Sync {
    async fn generate(&self, input: GeneratePoemInput) -> Result<GeneratePoemOutput, GenerationError>;
}
