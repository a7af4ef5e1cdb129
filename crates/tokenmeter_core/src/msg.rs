use std::path::PathBuf;

use crate::{CountFailure, Generation, InputSnapshot, Modality};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Msg {
    /// User edited the prompt text (raw, per change event).
    TextEdited(String),
    /// User picked a file. The MIME string arrives unparsed; validation
    /// happens in `update` before the file enters the input state.
    AttachmentSelected {
        path: PathBuf,
        media_type: String,
        size_bytes: u64,
    },
    /// User removed the current attachment.
    AttachmentCleared,
    /// Debounce quiet period elapsed with the latest snapshot.
    QuietPeriodElapsed(InputSnapshot),
    /// Engine finished one counting call for one modality.
    CountFinished {
        generation: Generation,
        modality: Modality,
        result: Result<u64, CountFailure>,
    },
    /// UI/render tick to coalesce rendering.
    Tick,
    /// Fallback for placeholder wiring.
    NoOp,
}
