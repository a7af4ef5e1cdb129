use std::fmt;

use crate::view_model::AppViewModel;
use crate::{Attachment, InputSnapshot, InputState};

/// Monotonically increasing identifier for one orchestration run. Used to
/// discard stale results.
pub type Generation = u64;

/// The two independent input kinds that can each be submitted for counting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Modality {
    Text,
    Attachment,
}

/// Typed counting failure, carried across the engine boundary as a message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CountFailure {
    pub kind: FailureKind,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FailureKind {
    Network,
    HttpStatus(u16),
    UnsupportedMediaType { media_type: String },
    TooLarge { max_bytes: u64, actual: u64 },
    Unknown,
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailureKind::Network => write!(f, "network error"),
            FailureKind::HttpStatus(code) => write!(f, "http status {code}"),
            FailureKind::UnsupportedMediaType { media_type } => {
                write!(f, "unsupported media type {media_type}")
            }
            FailureKind::TooLarge { max_bytes, actual } => {
                write!(f, "attachment too large (max {max_bytes}, actual {actual})")
            }
            FailureKind::Unknown => write!(f, "unknown error"),
        }
    }
}

/// Display values owned by the commit path; the presenter only reads.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct DisplayStats {
    /// Combined token count across modalities; `None` until a generation
    /// resolves successfully.
    pub tokens: Option<u64>,
    pub chars: usize,
    pub error: Option<String>,
}

/// Per-generation tracking of the counting calls still in flight.
#[derive(Debug, Clone, PartialEq, Eq)]
struct InFlight {
    generation: Generation,
    chars: usize,
    text_pending: bool,
    attachment_pending: bool,
    text_tokens: u64,
    attachment_tokens: u64,
    failure: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AppState {
    input: InputState,
    /// Last generation handed out. Generation 0 is never armed.
    latest_generation: Generation,
    /// Highest generation that has committed display stats.
    committed_generation: Generation,
    in_flight: Option<InFlight>,
    stats: DisplayStats,
    dirty: bool,
}

impl AppState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn view(&self) -> AppViewModel {
        AppViewModel {
            stats: self.stats.clone(),
            counting: self.in_flight.is_some(),
            attachment_name: self.input.attachment.as_ref().and_then(|att| {
                att.path
                    .file_name()
                    .map(|name| name.to_string_lossy().into_owned())
            }),
            dirty: self.dirty,
        }
    }

    /// Returns whether a render is due and clears the flag.
    pub fn consume_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }

    pub fn input(&self) -> &InputState {
        &self.input
    }

    pub(crate) fn set_text(&mut self, text: String) {
        self.input.text = text;
    }

    pub(crate) fn set_attachment(&mut self, attachment: Attachment) {
        self.input.attachment = Some(attachment);
    }

    pub(crate) fn clear_attachment(&mut self) {
        self.input.attachment = None;
    }

    pub(crate) fn snapshot(&self) -> InputSnapshot {
        InputSnapshot {
            text: self.input.text.clone(),
            attachment: self.input.attachment.clone(),
        }
    }

    /// Hand out the next generation. Arming a new generation supersedes any
    /// in-flight one; its late results are discarded on arrival.
    pub(crate) fn begin_generation(&mut self) -> Generation {
        self.latest_generation += 1;
        self.in_flight = None;
        self.latest_generation
    }

    /// Track the counting calls issued for `generation`.
    pub(crate) fn arm_counts(&mut self, generation: Generation, snapshot: &InputSnapshot) {
        self.in_flight = Some(InFlight {
            generation,
            chars: snapshot.text.chars().count(),
            text_pending: !snapshot.text.is_empty(),
            attachment_pending: snapshot.attachment.is_some(),
            text_tokens: 0,
            attachment_tokens: 0,
            failure: None,
        });
    }

    /// Record one finished counting call. Commits the aggregate once every
    /// call of the generation has completed.
    pub(crate) fn apply_count(
        &mut self,
        generation: Generation,
        modality: Modality,
        result: Result<u64, CountFailure>,
    ) {
        let Some(flight) = self.in_flight.as_mut() else {
            return;
        };
        if flight.generation != generation {
            // Stale result from a superseded generation.
            return;
        }
        match modality {
            Modality::Text => flight.text_pending = false,
            Modality::Attachment => flight.attachment_pending = false,
        }
        match result {
            Ok(tokens) => match modality {
                Modality::Text => flight.text_tokens = tokens,
                Modality::Attachment => flight.attachment_tokens = tokens,
            },
            Err(failure) => {
                // First failure wins; partial success is never shown as success.
                if flight.failure.is_none() {
                    flight.failure = Some(failure.message);
                }
            }
        }
        if !flight.text_pending && !flight.attachment_pending {
            if let Some(flight) = self.in_flight.take() {
                let stats = match flight.failure {
                    Some(message) => DisplayStats {
                        tokens: None,
                        chars: flight.chars,
                        error: Some(message),
                    },
                    None => DisplayStats {
                        tokens: Some(flight.text_tokens + flight.attachment_tokens),
                        chars: flight.chars,
                        error: None,
                    },
                };
                self.commit(flight.generation, stats);
            }
        }
    }

    /// Empty input resolves without any counting calls.
    pub(crate) fn commit_empty(&mut self, generation: Generation) {
        self.commit(
            generation,
            DisplayStats {
                tokens: None,
                chars: 0,
                error: None,
            },
        );
    }

    /// Caller-side rejection (bad media type, oversized file); no counting
    /// call was issued.
    pub(crate) fn commit_validation_failure(&mut self, generation: Generation, message: String) {
        let chars = self.input.text.chars().count();
        self.commit(
            generation,
            DisplayStats {
                tokens: None,
                chars,
                error: Some(message),
            },
        );
    }

    /// Monotonic commit: only a generation strictly newer than the last
    /// committed one may update the display stats.
    fn commit(&mut self, generation: Generation, stats: DisplayStats) {
        if generation <= self.committed_generation {
            return;
        }
        self.committed_generation = generation;
        self.stats = stats;
        self.dirty = true;
    }
}
