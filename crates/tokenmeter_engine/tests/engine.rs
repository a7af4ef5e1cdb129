use std::io::Write;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use tokenmeter_engine::{
    AttachmentSpec, CountClient, CountError, EncodedAttachment, EngineConfig, EngineEvent,
    EngineHandle, FailureKind, MediaType, Modality, Snapshot,
};

#[derive(Default)]
struct FixedClient {
    text_calls: AtomicUsize,
    attachment_calls: AtomicUsize,
}

#[async_trait::async_trait]
impl CountClient for FixedClient {
    async fn count_text(&self, text: &str) -> Result<u64, CountError> {
        self.text_calls.fetch_add(1, Ordering::SeqCst);
        Ok(text.len() as u64)
    }

    async fn count_attachment(&self, _encoded: &EncodedAttachment) -> Result<u64, CountError> {
        self.attachment_calls.fetch_add(1, Ordering::SeqCst);
        Ok(340)
    }
}

fn snapshot(text: &str) -> Snapshot {
    Snapshot {
        text: text.to_string(),
        attachment: None,
    }
}

fn engine_with(client: Arc<FixedClient>, quiet_period: Duration) -> EngineHandle {
    let config = EngineConfig {
        quiet_period,
        ..EngineConfig::default()
    };
    EngineHandle::with_client(config, client)
}

fn wait_for_event(engine: &EngineHandle) -> EngineEvent {
    let deadline = Instant::now() + Duration::from_secs(5);
    loop {
        if let Some(event) = engine.try_recv() {
            return event;
        }
        assert!(
            Instant::now() < deadline,
            "timed out waiting for engine event"
        );
        std::thread::sleep(Duration::from_millis(5));
    }
}

#[test]
fn arm_burst_emits_one_event_with_last_snapshot() {
    let client = Arc::new(FixedClient::default());
    let engine = engine_with(client.clone(), Duration::from_millis(100));

    engine.arm(snapshot("a"));
    engine.arm(snapshot("ab"));
    engine.arm(snapshot("abc"));

    let event = wait_for_event(&engine);
    assert_eq!(
        event,
        EngineEvent::QuietPeriodElapsed {
            snapshot: snapshot("abc"),
        }
    );
    // Arming alone issues no counting calls.
    assert_eq!(client.text_calls.load(Ordering::SeqCst), 0);
    assert_eq!(client.attachment_calls.load(Ordering::SeqCst), 0);
}

#[test]
fn count_text_round_trips_through_the_engine() {
    let client = Arc::new(FixedClient::default());
    let engine = engine_with(client.clone(), Duration::from_millis(100));

    engine.count_text(4, "hello");

    let event = wait_for_event(&engine);
    assert_eq!(
        event,
        EngineEvent::CountFinished {
            generation: 4,
            modality: Modality::Text,
            result: Ok(5),
        }
    );
    assert_eq!(client.text_calls.load(Ordering::SeqCst), 1);
}

#[test]
fn attachment_is_encoded_then_counted() {
    let mut file = tempfile::NamedTempFile::new().expect("temp file");
    file.write_all(b"png bytes").expect("write");

    let client = Arc::new(FixedClient::default());
    let engine = engine_with(client.clone(), Duration::from_millis(100));

    engine.count_attachment(
        7,
        AttachmentSpec {
            path: file.path().to_path_buf(),
            media_type: MediaType::ImagePng,
            size_bytes: 9,
        },
    );

    let event = wait_for_event(&engine);
    assert_eq!(
        event,
        EngineEvent::CountFinished {
            generation: 7,
            modality: Modality::Attachment,
            result: Ok(340),
        }
    );
    assert_eq!(client.attachment_calls.load(Ordering::SeqCst), 1);
}

#[test]
fn encoding_failure_surfaces_as_the_attachment_result() {
    let client = Arc::new(FixedClient::default());
    let engine = engine_with(client.clone(), Duration::from_millis(100));

    engine.count_attachment(
        9,
        AttachmentSpec {
            path: "/nonexistent/photo.png".into(),
            media_type: MediaType::ImagePng,
            size_bytes: 10,
        },
    );

    let event = wait_for_event(&engine);
    match event {
        EngineEvent::CountFinished {
            generation,
            modality,
            result,
        } => {
            assert_eq!(generation, 9);
            assert_eq!(modality, Modality::Attachment);
            let err = result.unwrap_err();
            assert_eq!(err.kind, FailureKind::Unknown);
        }
        other => panic!("unexpected event: {other:?}"),
    }
    // The client was never reached.
    assert_eq!(client.attachment_calls.load(Ordering::SeqCst), 0);
}
