use std::fmt;
use std::path::PathBuf;

/// Orchestration run identifier, assigned by the caller at submission time.
pub type Generation = u64;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Modality {
    Text,
    Attachment,
}

/// Ceiling for image payloads enforced by the counting service.
pub const IMAGE_LIMIT_BYTES: u64 = 10 * 1024 * 1024;

/// Ceiling for PDF payloads enforced by the counting service.
pub const PDF_LIMIT_BYTES: u64 = 32 * 1024 * 1024;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaType {
    ImagePng,
    ImageJpeg,
    ImageWebp,
    ApplicationPdf,
}

impl MediaType {
    pub fn as_mime(&self) -> &'static str {
        match self {
            Self::ImagePng => "image/png",
            Self::ImageJpeg => "image/jpeg",
            Self::ImageWebp => "image/webp",
            Self::ApplicationPdf => "application/pdf",
        }
    }

    pub fn size_limit(&self) -> u64 {
        match self {
            Self::ImagePng | Self::ImageJpeg | Self::ImageWebp => IMAGE_LIMIT_BYTES,
            Self::ApplicationPdf => PDF_LIMIT_BYTES,
        }
    }

    pub fn is_pdf(&self) -> bool {
        matches!(self, Self::ApplicationPdf)
    }
}

/// File to encode and submit, described by path and declared metadata.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttachmentSpec {
    pub path: PathBuf,
    pub media_type: MediaType,
    pub size_bytes: u64,
}

/// Transport-safe attachment payload. Recomputed on every submission and
/// never cached.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodedAttachment {
    /// Base64 without any `data:` URL prefix.
    pub base64: String,
    pub media_type: MediaType,
}

/// Input carried through the debounce timer; the last snapshot of a burst
/// wins.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Snapshot {
    pub text: String,
    pub attachment: Option<AttachmentSpec>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CountError {
    pub kind: FailureKind,
    pub message: String,
}

impl CountError {
    pub(crate) fn new(kind: FailureKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FailureKind {
    /// Transport failure, including timeouts.
    Network,
    /// Endpoint returned a non-success status.
    HttpStatus(u16),
    /// Payload rejected before any network call.
    TooLarge { max_bytes: u64, actual: u64 },
    Unknown,
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailureKind::Network => write!(f, "network error"),
            FailureKind::HttpStatus(code) => write!(f, "http status {code}"),
            FailureKind::TooLarge { max_bytes, actual } => {
                write!(f, "payload too large (max {max_bytes}, actual {actual})")
            }
            FailureKind::Unknown => write!(f, "unknown error"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineEvent {
    /// The debounce quiet period elapsed uninterrupted.
    QuietPeriodElapsed { snapshot: Snapshot },
    /// One counting call finished, success or failure.
    CountFinished {
        generation: Generation,
        modality: Modality,
        result: Result<u64, CountError>,
    },
}
