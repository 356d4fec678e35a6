//! Self-describing `data:<mime>;base64,<payload>` strings.

use base64::{engine::general_purpose::STANDARD, Engine as _};
use serde::{Deserialize, Serialize};
use std::fmt;

use super::MimeType;

const SCHEME: &str = "data:";
const BASE64_MARKER: &str = ";base64,";

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum DataUriError {
    #[error("data URI must start with `data:`")]
    MissingScheme,
    #[error("data URI must be base64 encoded (`;base64,` marker missing)")]
    NotBase64,
    #[error("data URI has an empty MIME type")]
    EmptyMimeType,
    #[error("data URI payload is not valid base64: {0}")]
    InvalidPayload(String),
}

/// A Base64 data URI. Always well-formed once constructed.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct DataUri {
    raw: String,
    // byte offset where the payload starts
    payload_at: usize,
}

impl DataUri {
    /// Encode the full byte content as a data URI for `mime`.
    pub fn encode(mime: &MimeType, bytes: &[u8]) -> Self {
        let prefix = format!("{SCHEME}{}{BASE64_MARKER}", mime.as_str());
        let payload_at = prefix.len();
        let mut raw = prefix;
        STANDARD.encode_string(bytes, &mut raw);
        Self { raw, payload_at }
    }

    pub fn parse(s: &str) -> Result<Self, DataUriError> {
        let rest = s.strip_prefix(SCHEME).ok_or(DataUriError::MissingScheme)?;
        let marker = rest.find(BASE64_MARKER).ok_or(DataUriError::NotBase64)?;
        if marker == 0 {
            return Err(DataUriError::EmptyMimeType);
        }
        Ok(Self {
            raw: s.to_string(),
            payload_at: SCHEME.len() + marker + BASE64_MARKER.len(),
        })
    }

    pub fn mime_type(&self) -> MimeType {
        let end = self.payload_at - BASE64_MARKER.len();
        MimeType(self.raw[SCHEME.len()..end].to_string())
    }

    /// The Base64 payload without the `data:...;base64,` prefix.
    pub fn payload(&self) -> &str {
        &self.raw[self.payload_at..]
    }

    pub fn decode(&self) -> Result<Vec<u8>, DataUriError> {
        STANDARD
            .decode(self.payload())
            .map_err(|e| DataUriError::InvalidPayload(e.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.raw
    }

    pub fn into_inner(self) -> String {
        self.raw
    }
}

impl fmt::Display for DataUri {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

impl TryFrom<String> for DataUri {
    type Error = DataUriError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<DataUri> for String {
    fn from(value: DataUri) -> Self {
        value.raw
    }
}
