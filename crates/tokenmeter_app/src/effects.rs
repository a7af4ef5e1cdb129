use std::sync::mpsc;
use std::thread;
use std::time::Duration;

use meter_logging::{meter_debug, meter_info, meter_warn};
use tokenmeter_core::{Attachment, CountFailure, Effect, InputSnapshot, MediaType, Msg};
use tokenmeter_engine::{EngineConfig, EngineEvent, EngineHandle};

/// Endpoint base URL override for deployments.
const ENDPOINT_ENV: &str = "TOKENMETER_ENDPOINT";

pub struct EffectRunner {
    engine: EngineHandle,
}

impl EffectRunner {
    pub fn new(msg_tx: mpsc::Sender<Msg>) -> Self {
        let mut config = EngineConfig::default();
        if let Ok(base_url) = std::env::var(ENDPOINT_ENV) {
            config.count.base_url = base_url;
        }

        let engine = EngineHandle::new(config);
        let runner = Self { engine };
        runner.spawn_event_loop(msg_tx);
        runner
    }

    pub fn enqueue(&self, effects: Vec<Effect>) {
        for effect in effects {
            match effect {
                Effect::ArmDebounce { snapshot } => {
                    meter_debug!(
                        "ArmDebounce text_len={} attachment={}",
                        snapshot.text.len(),
                        snapshot.attachment.is_some()
                    );
                    self.engine.arm(map_snapshot(snapshot));
                }
                Effect::CountText { generation, text } => {
                    meter_info!("CountText generation={} text_len={}", generation, text.len());
                    self.engine.count_text(generation, text);
                }
                Effect::CountAttachment {
                    generation,
                    attachment,
                } => {
                    meter_info!(
                        "CountAttachment generation={} path={}",
                        generation,
                        attachment.path.display()
                    );
                    self.engine
                        .count_attachment(generation, map_attachment(attachment));
                }
            }
        }
    }

    fn spawn_event_loop(&self, msg_tx: mpsc::Sender<Msg>) {
        let engine = self.engine.clone();
        thread::spawn(move || loop {
            if let Some(event) = engine.try_recv() {
                let msg = match event {
                    EngineEvent::QuietPeriodElapsed { snapshot } => {
                        Msg::QuietPeriodElapsed(unmap_snapshot(snapshot))
                    }
                    EngineEvent::CountFinished {
                        generation,
                        modality,
                        result,
                    } => {
                        if let Err(err) = &result {
                            meter_warn!(
                                "count failed generation={} modality={:?} kind={}: {}",
                                generation,
                                modality,
                                err.kind,
                                err.message
                            );
                        }
                        Msg::CountFinished {
                            generation,
                            modality: map_modality(modality),
                            result: result.map_err(map_failure),
                        }
                    }
                };
                if msg_tx.send(msg).is_err() {
                    break;
                }
            } else {
                thread::sleep(Duration::from_millis(20));
            }
        });
    }
}

fn map_snapshot(snapshot: InputSnapshot) -> tokenmeter_engine::Snapshot {
    tokenmeter_engine::Snapshot {
        text: snapshot.text,
        attachment: snapshot.attachment.map(map_attachment),
    }
}

fn unmap_snapshot(snapshot: tokenmeter_engine::Snapshot) -> InputSnapshot {
    InputSnapshot {
        text: snapshot.text,
        attachment: snapshot.attachment.map(unmap_attachment),
    }
}

fn map_attachment(attachment: Attachment) -> tokenmeter_engine::AttachmentSpec {
    tokenmeter_engine::AttachmentSpec {
        path: attachment.path,
        media_type: map_media_type(attachment.media_type),
        size_bytes: attachment.size_bytes,
    }
}

fn unmap_attachment(spec: tokenmeter_engine::AttachmentSpec) -> Attachment {
    Attachment {
        path: spec.path,
        media_type: unmap_media_type(spec.media_type),
        size_bytes: spec.size_bytes,
    }
}

fn map_media_type(media_type: MediaType) -> tokenmeter_engine::MediaType {
    match media_type {
        MediaType::ImagePng => tokenmeter_engine::MediaType::ImagePng,
        MediaType::ImageJpeg => tokenmeter_engine::MediaType::ImageJpeg,
        MediaType::ImageWebp => tokenmeter_engine::MediaType::ImageWebp,
        MediaType::ApplicationPdf => tokenmeter_engine::MediaType::ApplicationPdf,
    }
}

fn unmap_media_type(media_type: tokenmeter_engine::MediaType) -> MediaType {
    match media_type {
        tokenmeter_engine::MediaType::ImagePng => MediaType::ImagePng,
        tokenmeter_engine::MediaType::ImageJpeg => MediaType::ImageJpeg,
        tokenmeter_engine::MediaType::ImageWebp => MediaType::ImageWebp,
        tokenmeter_engine::MediaType::ApplicationPdf => MediaType::ApplicationPdf,
    }
}

fn map_modality(modality: tokenmeter_engine::Modality) -> tokenmeter_core::Modality {
    match modality {
        tokenmeter_engine::Modality::Text => tokenmeter_core::Modality::Text,
        tokenmeter_engine::Modality::Attachment => tokenmeter_core::Modality::Attachment,
    }
}

fn map_failure(err: tokenmeter_engine::CountError) -> CountFailure {
    let kind = match err.kind {
        tokenmeter_engine::FailureKind::Network => tokenmeter_core::FailureKind::Network,
        tokenmeter_engine::FailureKind::HttpStatus(code) => {
            tokenmeter_core::FailureKind::HttpStatus(code)
        }
        tokenmeter_engine::FailureKind::TooLarge { max_bytes, actual } => {
            tokenmeter_core::FailureKind::TooLarge { max_bytes, actual }
        }
        tokenmeter_engine::FailureKind::Unknown => tokenmeter_core::FailureKind::Unknown,
    };
    CountFailure {
        kind,
        message: err.message,
    }
}
