//! `multipart/form-data` body construction.
//!
//! The whole body is assembled in memory before it is sent; there is no
//! streaming. Lines are terminated with CRLF.

use uuid::Uuid;

use crate::endpoint::{value_text, Parameters};

const CRLF: &[u8] = b"\r\n";

/// One file part of a multipart upload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MultipartFile {
    /// Form field name, e.g. `image`.
    pub field_name: String,
    pub filename: String,
    pub mime_type: String,
    pub bytes: Vec<u8>,
}

impl MultipartFile {
    pub fn new(
        field_name: impl Into<String>,
        filename: impl Into<String>,
        mime_type: impl Into<String>,
        bytes: impl Into<Vec<u8>>,
    ) -> Self {
        Self {
            field_name: field_name.into(),
            filename: filename.into(),
            mime_type: mime_type.into(),
            bytes: bytes.into(),
        }
    }

    /// A JPEG part with a random `<UUID>.jpg` filename.
    pub fn jpeg(field_name: impl Into<String>, bytes: impl Into<Vec<u8>>) -> Self {
        Self::new(
            field_name,
            format!("{}.jpg", upper_uuid()),
            "image/jpeg",
            bytes,
        )
    }
}

/// Generates a boundary token of the form `Boundary-<UUID>`.
pub fn generate_boundary() -> String {
    format!("Boundary-{}", upper_uuid())
}

/// The `Content-Type` header value for a body delimited by `boundary`.
pub fn content_type(boundary: &str) -> String {
    format!("multipart/form-data; boundary={boundary}")
}

/// Encodes scalar `fields` followed by `files` into a multipart body.
/// `null` fields are skipped.
pub fn encode_body(fields: Option<&Parameters>, files: &[MultipartFile], boundary: &str) -> Vec<u8> {
    let delimiter = format!("--{boundary}\r\n");
    let mut body = Vec::new();

    for (name, value) in fields.into_iter().flatten().filter(|(_, v)| !v.is_null()) {
        body.extend_from_slice(delimiter.as_bytes());
        body.extend_from_slice(
            format!("Content-Disposition: form-data; name=\"{name}\"\r\n\r\n").as_bytes(),
        );
        body.extend_from_slice(value_text(value).as_bytes());
        body.extend_from_slice(CRLF);
    }

    for file in files {
        body.extend_from_slice(delimiter.as_bytes());
        body.extend_from_slice(
            format!(
                "Content-Disposition: form-data; name=\"{}\"; filename=\"{}\"\r\n",
                file.field_name, file.filename
            )
            .as_bytes(),
        );
        body.extend_from_slice(format!("Content-Type: {}\r\n\r\n", file.mime_type).as_bytes());
        body.extend_from_slice(&file.bytes);
        body.extend_from_slice(CRLF);
    }

    body.extend_from_slice(format!("--{boundary}--\r\n").as_bytes());
    body
}

fn upper_uuid() -> String {
    Uuid::new_v4().to_string().to_uppercase()
}
