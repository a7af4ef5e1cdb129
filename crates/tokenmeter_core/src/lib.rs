//! Tokenmeter core: pure orchestration state machine and view-model helpers.
mod effect;
mod input;
mod msg;
mod state;
mod update;
mod view_model;

pub use effect::Effect;
pub use input::{
    Attachment, InputSnapshot, InputState, MediaType, IMAGE_LIMIT_BYTES, PDF_LIMIT_BYTES,
};
pub use msg::Msg;
pub use state::{AppState, CountFailure, DisplayStats, FailureKind, Generation, Modality};
pub use update::update;
pub use view_model::{AppViewModel, StatsView};
