use crate::{AppState, Attachment, Effect, FailureKind, MediaType, Msg};

/// Pure update function: applies a message to state and returns any effects.
pub fn update(mut state: AppState, msg: Msg) -> (AppState, Vec<Effect>) {
    let effects = match msg {
        Msg::TextEdited(text) => {
            state.set_text(text);
            vec![Effect::ArmDebounce {
                snapshot: state.snapshot(),
            }]
        }
        Msg::AttachmentSelected {
            path,
            media_type,
            size_bytes,
        } => {
            let Some(media_type) = MediaType::from_mime(&media_type) else {
                // Rejected before entering the input state; no counting call.
                let generation = state.begin_generation();
                state.commit_validation_failure(
                    generation,
                    FailureKind::UnsupportedMediaType { media_type }.to_string(),
                );
                return (state, Vec::new());
            };
            let limit = media_type.size_limit();
            if size_bytes > limit {
                let generation = state.begin_generation();
                state.commit_validation_failure(
                    generation,
                    FailureKind::TooLarge {
                        max_bytes: limit,
                        actual: size_bytes,
                    }
                    .to_string(),
                );
                return (state, Vec::new());
            }
            state.set_attachment(Attachment {
                path,
                media_type,
                size_bytes,
            });
            vec![Effect::ArmDebounce {
                snapshot: state.snapshot(),
            }]
        }
        Msg::AttachmentCleared => {
            state.clear_attachment();
            vec![Effect::ArmDebounce {
                snapshot: state.snapshot(),
            }]
        }
        Msg::QuietPeriodElapsed(snapshot) => {
            let generation = state.begin_generation();
            if snapshot.is_empty() {
                state.commit_empty(generation);
                Vec::new()
            } else {
                state.arm_counts(generation, &snapshot);
                let mut effects = Vec::with_capacity(2);
                if !snapshot.text.is_empty() {
                    effects.push(Effect::CountText {
                        generation,
                        text: snapshot.text,
                    });
                }
                if let Some(attachment) = snapshot.attachment {
                    effects.push(Effect::CountAttachment {
                        generation,
                        attachment,
                    });
                }
                effects
            }
        }
        Msg::CountFinished {
            generation,
            modality,
            result,
        } => {
            state.apply_count(generation, modality, result);
            Vec::new()
        }
        Msg::Tick | Msg::NoOp => Vec::new(),
    };

    (state, effects)
}
