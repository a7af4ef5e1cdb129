//! Tokenmeter engine: attachment encoding, counting client, debounce timer
//! and effect execution.
mod client;
mod debounce;
mod encode;
mod engine;
mod types;

pub use client::{CountClient, CountSettings, HttpCountClient, TOKEN_OVERHEAD};
pub use debounce::Debouncer;
pub use encode::{encode_attachment, strip_data_url_prefix, EncodeError};
pub use engine::{EngineConfig, EngineHandle};
pub use types::{
    AttachmentSpec, CountError, EncodedAttachment, EngineEvent, FailureKind, Generation,
    MediaType, Modality, Snapshot, IMAGE_LIMIT_BYTES, PDF_LIMIT_BYTES,
};
