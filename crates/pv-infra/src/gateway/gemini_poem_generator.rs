use async_trait::async_trait;
use pv_core::config::GatewayConfig;
use pv_core::photo::DataUri;
use pv_core::ports::{GeneratePoemInput, GeneratePoemOutput, GenerationError, PoemGeneratorPort};
use reqwest::Client as HttpClient;
use serde::{Deserialize, Serialize};
use tracing::{debug, error, warn};

/// Instruction sent alongside every photo.
pub const POEM_PROMPT: &str = "You are a poet laureate. Analyze the image represented by the \
following data URI and write a poem that captures its essence and key elements. The poem \
should evoke the mood and themes present in the image.";

#[derive(Debug, Serialize)]
struct GenerateContentRequest<'a> {
    contents: Vec<RequestContent<'a>>,
}

#[derive(Debug, Serialize)]
struct RequestContent<'a> {
    parts: Vec<RequestPart<'a>>,
}

#[derive(Debug, Serialize)]
#[serde(untagged)]
enum RequestPart<'a> {
    Text { text: &'a str },
    InlineData { inline_data: InlineData<'a> },
}

#[derive(Debug, Serialize)]
struct InlineData<'a> {
    mime_type: &'a str,
    data: &'a str,
}

#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Debug, Deserialize)]
struct ResponsePart {
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: String,
}

/// [`PoemGeneratorPort`] backed by the Gemini `generateContent` endpoint.
pub struct GeminiPoemGenerator {
    client: HttpClient,
    base_url: String,
    model: String,
    api_key: Option<String>,
}

impl GeminiPoemGenerator {
    pub fn new(
        base_url: impl Into<String>,
        model: impl Into<String>,
        api_key: Option<String>,
    ) -> Self {
        Self {
            client: HttpClient::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            model: model.into(),
            api_key,
        }
    }

    /// Builds the generator from config, taking the key from the environment
    /// variable the config names. A missing key is reported per call.
    pub fn from_config(config: &GatewayConfig) -> Self {
        let api_key = std::env::var(&config.api_key_env)
            .ok()
            .filter(|k| !k.trim().is_empty());
        if api_key.is_none() {
            warn!(env = %config.api_key_env, "No API key configured for poem generation");
        }
        Self::new(config.base_url.clone(), config.model.clone(), api_key)
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/v1beta/models/{}:generateContent",
            self.base_url, self.model
        )
    }
}

/// Joins the text parts of the first candidate.
fn extract_poem(response: GenerateContentResponse) -> String {
    response
        .candidates
        .into_iter()
        .next()
        .and_then(|c| c.content)
        .map(|content| {
            content
                .parts
                .into_iter()
                .filter_map(|p| p.text)
                .collect::<String>()
        })
        .unwrap_or_default()
}

fn error_message(status: reqwest::StatusCode, body: &str) -> String {
    let detail = serde_json::from_str::<ErrorEnvelope>(body)
        .map(|e| e.error.message)
        .unwrap_or_else(|_| body.trim().to_string());
    if detail.is_empty() {
        format!("model request failed with status {status}")
    } else {
        format!("model request failed with status {status}: {detail}")
    }
}

#[async_trait]
impl PoemGeneratorPort for GeminiPoemGenerator {
    async fn generate(
        &self,
        input: GeneratePoemInput,
    ) -> Result<GeneratePoemOutput, GenerationError> {
        let Some(api_key) = self.api_key.as_deref() else {
            return Err(GenerationError::Failed(
                "API key is not configured".to_string(),
            ));
        };

        let photo = DataUri::parse(&input.photo_data_uri)
            .map_err(|e| GenerationError::Failed(format!("invalid photo data URI: {e}")))?;
        let mime_type = photo.mime_type();

        let request = GenerateContentRequest {
            contents: vec![RequestContent {
                parts: vec![
                    RequestPart::Text { text: POEM_PROMPT },
                    RequestPart::InlineData {
                        inline_data: InlineData {
                            mime_type: mime_type.as_str(),
                            data: photo.payload(),
                        },
                    },
                ],
            }],
        };

        debug!(model = %self.model, mime_type = %mime_type, "Requesting poem");
        let response = self
            .client
            .post(self.endpoint())
            .header("x-goog-api-key", api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| GenerationError::Failed(format!("model request failed: {e}")))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| GenerationError::Failed(format!("reading model response failed: {e}")))?;

        if !status.is_success() {
            error!(%status, body = %body, "Model returned an error");
            return Err(GenerationError::Failed(error_message(status, &body)));
        }

        let parsed: GenerateContentResponse = serde_json::from_str(&body)
            .map_err(|e| GenerationError::Failed(format!("unexpected model response: {e}")))?;
        let poem = extract_poem(parsed);
        if poem.trim().is_empty() {
            return Err(GenerationError::EmptyOutput);
        }

        Ok(GeneratePoemOutput { poem })
    }
}
