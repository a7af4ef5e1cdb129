use std::path::PathBuf;

/// Ceiling for image attachments. Deployments range 5-10 MiB; the counting
/// service enforces 10 MiB.
pub const IMAGE_LIMIT_BYTES: u64 = 10 * 1024 * 1024;

/// Ceiling for PDF attachments.
pub const PDF_LIMIT_BYTES: u64 = 32 * 1024 * 1024;

/// Closed set of attachment media types the counting service accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaType {
    ImagePng,
    ImageJpeg,
    ImageWebp,
    ApplicationPdf,
}

impl MediaType {
    /// Parse a MIME string, ignoring parameters and case. Returns `None` for
    /// anything outside the supported set.
    pub fn from_mime(mime: &str) -> Option<Self> {
        let essence = mime.split(';').next().unwrap_or(mime).trim();
        if essence.eq_ignore_ascii_case("image/png") {
            Some(Self::ImagePng)
        } else if essence.eq_ignore_ascii_case("image/jpeg") {
            Some(Self::ImageJpeg)
        } else if essence.eq_ignore_ascii_case("image/webp") {
            Some(Self::ImageWebp)
        } else if essence.eq_ignore_ascii_case("application/pdf") {
            Some(Self::ApplicationPdf)
        } else {
            None
        }
    }

    pub fn as_mime(&self) -> &'static str {
        match self {
            Self::ImagePng => "image/png",
            Self::ImageJpeg => "image/jpeg",
            Self::ImageWebp => "image/webp",
            Self::ApplicationPdf => "application/pdf",
        }
    }

    /// Modality-specific size ceiling in bytes.
    pub fn size_limit(&self) -> u64 {
        match self {
            Self::ImagePng | Self::ImageJpeg | Self::ImageWebp => IMAGE_LIMIT_BYTES,
            Self::ApplicationPdf => PDF_LIMIT_BYTES,
        }
    }
}

/// A user-selected file that passed validation and entered the input state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attachment {
    pub path: PathBuf,
    pub media_type: MediaType,
    pub size_bytes: u64,
}

/// Current user input. Mutated only by the edit messages.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct InputState {
    pub text: String,
    pub attachment: Option<Attachment>,
}

/// Owned copy of the input carried through the debounce timer. Only the last
/// snapshot of a burst reaches the orchestrator.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct InputSnapshot {
    pub text: String,
    pub attachment: Option<Attachment>,
}

impl InputSnapshot {
    pub fn is_empty(&self) -> bool {
        self.text.is_empty() && self.attachment.is_none()
    }
}
