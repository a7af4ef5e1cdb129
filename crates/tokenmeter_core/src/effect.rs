use crate::{Attachment, Generation, InputSnapshot};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// (Re)arm the debounce timer with the latest input snapshot. Cancels any
    /// pending timer.
    ArmDebounce { snapshot: InputSnapshot },
    /// Submit the text modality for counting.
    CountText { generation: Generation, text: String },
    /// Encode and submit the attachment modality for counting.
    CountAttachment {
        generation: Generation,
        attachment: Attachment,
    },
}
