use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use thiserror::Error;

use crate::{AttachmentSpec, CountError, EncodedAttachment, FailureKind, MediaType};

#[derive(Debug, Error)]
pub enum EncodeError {
    #[error("attachment exceeds size limit (max {max_bytes}, actual {actual})")]
    TooLarge { max_bytes: u64, actual: u64 },
    #[error("failed to read attachment: {0}")]
    Io(#[from] std::io::Error),
}

impl From<EncodeError> for CountError {
    fn from(err: EncodeError) -> Self {
        let message = err.to_string();
        match err {
            EncodeError::TooLarge { max_bytes, actual } => {
                CountError::new(FailureKind::TooLarge { max_bytes, actual }, message)
            }
            EncodeError::Io(_) => CountError::new(FailureKind::Unknown, message),
        }
    }
}

/// Strip a leading `data:<mime>;base64,` prefix if present. Defensive: some
/// callers pre-format payloads as data URLs.
pub fn strip_data_url_prefix(payload: &str) -> &str {
    if let Some(rest) = payload.strip_prefix("data:") {
        if let Some((_, tail)) = rest.split_once(";base64,") {
            return tail;
        }
    }
    payload
}

impl EncodedAttachment {
    /// Wrap an already base64-encoded payload, normalizing away any data-URL
    /// prefix.
    pub fn from_base64(payload: &str, media_type: MediaType) -> Self {
        Self {
            base64: strip_data_url_prefix(payload).to_string(),
            media_type,
        }
    }
}

/// One asynchronous read of the file, then base64. The declared size is
/// checked against the modality ceiling before the read, and the actual byte
/// count once more after it.
pub async fn encode_attachment(spec: &AttachmentSpec) -> Result<EncodedAttachment, EncodeError> {
    let limit = spec.media_type.size_limit();
    if spec.size_bytes > limit {
        return Err(EncodeError::TooLarge {
            max_bytes: limit,
            actual: spec.size_bytes,
        });
    }

    let bytes = tokio::fs::read(&spec.path).await?;

    let actual = bytes.len() as u64;
    if actual > limit {
        return Err(EncodeError::TooLarge {
            max_bytes: limit,
            actual,
        });
    }

    Ok(EncodedAttachment {
        base64: STANDARD.encode(&bytes),
        media_type: spec.media_type,
    })
}
