//! Photo ingestion domain: MIME types, data URIs, selected files and the
//! upload policy applied before any bytes are read.

mod data_uri;
mod file;
mod mime;
mod policy;

pub use data_uri::{DataUri, DataUriError};
pub use file::PhotoFile;
pub use mime::MimeType;
pub use policy::{UploadPolicy, UploadRejection, DEFAULT_MAX_UPLOAD_BYTES};
