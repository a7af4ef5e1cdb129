use std::path::PathBuf;
use std::sync::Once;

use tokenmeter_core::{
    update, AppState, Effect, InputSnapshot, Msg, IMAGE_LIMIT_BYTES, PDF_LIMIT_BYTES,
};

fn init_logging() {
    static INIT: Once = Once::new();
    INIT.call_once(meter_logging::initialize_for_tests);
}

fn select_image(state: AppState, size_bytes: u64) -> (AppState, Vec<Effect>) {
    update(
        state,
        Msg::AttachmentSelected {
            path: PathBuf::from("photo.png"),
            media_type: "image/png".to_string(),
            size_bytes,
        },
    )
}

#[test]
fn text_edit_arms_debounce_with_latest_snapshot() {
    init_logging();
    let state = AppState::new();

    let (state, _) = update(state, Msg::TextEdited("hel".to_string()));
    let (state, effects) = update(state, Msg::TextEdited("hello".to_string()));

    assert_eq!(state.input().text, "hello");
    assert_eq!(
        effects,
        vec![Effect::ArmDebounce {
            snapshot: InputSnapshot {
                text: "hello".to_string(),
                attachment: None,
            },
        }]
    );
}

#[test]
fn valid_attachment_enters_input_state() {
    init_logging();
    let state = AppState::new();

    let (state, effects) = select_image(state, 2048);

    let attachment = state.input().attachment.clone().expect("attachment set");
    assert_eq!(attachment.size_bytes, 2048);
    assert!(matches!(effects.as_slice(), [Effect::ArmDebounce { .. }]));
    assert_eq!(state.view().attachment_name.as_deref(), Some("photo.png"));
}

#[test]
fn oversized_image_is_rejected_without_effects() {
    init_logging();
    let state = AppState::new();

    // 11 MiB against the 10 MiB ceiling.
    let (mut state, effects) = select_image(state, IMAGE_LIMIT_BYTES + 1024 * 1024);

    assert!(effects.is_empty());
    assert!(state.input().attachment.is_none());
    let view = state.view();
    assert!(view.stats.error.is_some());
    assert_eq!(view.stats.tokens, None);
    assert!(state.consume_dirty());
}

#[test]
fn oversized_pdf_is_rejected_without_effects() {
    init_logging();
    let state = AppState::new();

    let (state, effects) = update(
        state,
        Msg::AttachmentSelected {
            path: PathBuf::from("big.pdf"),
            media_type: "application/pdf".to_string(),
            size_bytes: PDF_LIMIT_BYTES + 1,
        },
    );

    assert!(effects.is_empty());
    assert!(state.input().attachment.is_none());
    assert!(state.view().stats.error.is_some());
}

#[test]
fn unsupported_media_type_is_rejected_without_effects() {
    init_logging();
    let state = AppState::new();

    let (state, effects) = update(
        state,
        Msg::AttachmentSelected {
            path: PathBuf::from("notes.txt"),
            media_type: "text/plain".to_string(),
            size_bytes: 10,
        },
    );

    assert!(effects.is_empty());
    assert!(state.input().attachment.is_none());
    let error = state.view().stats.error.expect("validation error surfaced");
    assert!(error.contains("text/plain"));
}

#[test]
fn media_type_parsing_ignores_parameters_and_case() {
    init_logging();
    let state = AppState::new();

    let (state, effects) = update(
        state,
        Msg::AttachmentSelected {
            path: PathBuf::from("photo.png"),
            media_type: "IMAGE/PNG; charset=binary".to_string(),
            size_bytes: 10,
        },
    );

    assert!(state.input().attachment.is_some());
    assert_eq!(effects.len(), 1);
}

#[test]
fn clearing_attachment_rearms_debounce() {
    init_logging();
    let state = AppState::new();
    let (state, _) = update(state, Msg::TextEdited("keep this".to_string()));
    let (state, _) = select_image(state, 2048);

    let (state, effects) = update(state, Msg::AttachmentCleared);

    assert!(state.input().attachment.is_none());
    assert_eq!(
        effects,
        vec![Effect::ArmDebounce {
            snapshot: InputSnapshot {
                text: "keep this".to_string(),
                attachment: None,
            },
        }]
    );
}
