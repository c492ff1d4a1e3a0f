//! Cover images embedded in book records.
//!
//! Browsers post the cover as a JSON string `{"type": "<mime>", "data": "<base64>"}`
//! in the `cover` form field. It is decoded here, once, into a [`Cover`]; nothing
//! past this module sees the envelope.

use base64::{
    alphabet,
    engine::{
        general_purpose::{GeneralPurpose, GeneralPurposeConfig, STANDARD},
        DecodePaddingMode,
    },
    Engine as _,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use utoipa::ToSchema;

/// Image formats accepted as book covers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
pub enum ImageType {
    #[serde(rename = "image/jpeg")]
    Jpeg,
    #[serde(rename = "image/png")]
    Png,
    #[serde(rename = "image/gif")]
    Gif,
}

impl ImageType {
    pub const ALL: [ImageType; 3] = [ImageType::Jpeg, ImageType::Png, ImageType::Gif];

    /// MIME type string stored alongside the cover bytes
    pub fn as_mime(&self) -> &'static str {
        match self {
            ImageType::Jpeg => "image/jpeg",
            ImageType::Png => "image/png",
            ImageType::Gif => "image/gif",
        }
    }

    /// Look up an allowed MIME type; anything else is rejected
    pub fn from_mime(mime: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|t| t.as_mime() == mime)
    }
}

impl std::fmt::Display for ImageType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_mime())
    }
}

/// Why an uploaded cover was discarded
#[derive(Debug, Error)]
pub enum CoverError {
    #[error("cover payload is not valid JSON: {0}")]
    Malformed(#[from] serde_json::Error),

    #[error("unsupported cover image type: {0}")]
    UnsupportedType(String),

    #[error("cover data is not valid base64: {0}")]
    Encoding(#[from] base64::DecodeError),
}

/// Accepts padded and unpadded input
const LENIENT: GeneralPurpose = GeneralPurpose::new(
    &alphabet::STANDARD,
    GeneralPurposeConfig::new().with_decode_padding_mode(DecodePaddingMode::Indifferent),
);

/// Decode base64 the way browsers and Node produce it: either alphabet,
/// padding optional, whitespace ignored.
fn decode_lenient(data: &str) -> Result<Vec<u8>, base64::DecodeError> {
    let normalized: String = data
        .chars()
        .filter(|c| !c.is_ascii_whitespace())
        .map(|c| match c {
            '-' => '+',
            '_' => '/',
            c => c,
        })
        .collect();
    LENIENT.decode(normalized.as_bytes())
}

/// Upload envelope as sent by the browser. Extra keys (name, size...) are ignored.
#[derive(Debug, Deserialize)]
struct CoverUpload {
    #[serde(rename = "type")]
    mime: String,
    data: String,
}

/// A decoded cover image
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cover {
    pub kind: ImageType,
    pub bytes: Vec<u8>,
}

impl Cover {
    pub fn new(kind: ImageType, bytes: Vec<u8>) -> Self {
        Self { kind, bytes }
    }

    /// Decode the `cover` form field.
    ///
    /// An empty field means "no cover supplied" and yields `Ok(None)`.
    pub fn parse_upload(encoded: &str) -> Result<Option<Self>, CoverError> {
        let encoded = encoded.trim();
        if encoded.is_empty() {
            return Ok(None);
        }

        let upload: Option<CoverUpload> = serde_json::from_str(encoded)?;
        let Some(upload) = upload else {
            return Ok(None);
        };

        let kind = ImageType::from_mime(&upload.mime)
            .ok_or_else(|| CoverError::UnsupportedType(upload.mime.clone()))?;
        let bytes = decode_lenient(&upload.data)?;

        Ok(Some(Self { kind, bytes }))
    }

    /// Inline `data:` URI usable directly as an `<img src>`
    pub fn data_uri(&self) -> String {
        format!(
            "data:{};charset=utf-8;base64,{}",
            self.kind.as_mime(),
            STANDARD.encode(&self.bytes)
        )
    }
}
