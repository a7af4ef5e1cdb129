use std::sync::{mpsc, Arc, Mutex};
use std::thread;
use std::time::Duration;

use meter_logging::meter_debug;

use crate::client::{CountClient, HttpCountClient};
use crate::debounce::Debouncer;
use crate::encode::encode_attachment;
use crate::{
    AttachmentSpec, CountSettings, EngineEvent, Generation, Modality, Snapshot,
};

/// Deployment-facing engine configuration.
#[derive(Debug, Clone)]
pub struct EngineConfig {
    pub count: CountSettings,
    /// Debounce delay after the last input change before a counting run is
    /// triggered.
    pub quiet_period: Duration,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            count: CountSettings::default(),
            quiet_period: Duration::from_millis(300),
        }
    }
}

enum EngineCommand {
    Arm {
        snapshot: Snapshot,
    },
    CountText {
        generation: Generation,
        text: String,
    },
    CountAttachment {
        generation: Generation,
        spec: AttachmentSpec,
    },
}

/// Command side plus polled event side of the engine. The background thread
/// exits when every handle is dropped; dropping also cancels a pending
/// debounce timer.
#[derive(Clone)]
pub struct EngineHandle {
    inner: Arc<EngineInner>,
}

struct EngineInner {
    cmd_tx: mpsc::Sender<EngineCommand>,
    event_rx: Mutex<mpsc::Receiver<EngineEvent>>,
}

impl EngineHandle {
    pub fn new(config: EngineConfig) -> Self {
        let client = Arc::new(HttpCountClient::new(config.count.clone()));
        Self::with_client(config, client)
    }

    /// Engine over a caller-supplied counting client; tests inject fakes here.
    pub fn with_client(config: EngineConfig, client: Arc<dyn CountClient>) -> Self {
        let (cmd_tx, cmd_rx) = mpsc::channel();
        let (event_tx, event_rx) = mpsc::channel();
        let quiet_period = config.quiet_period;

        thread::spawn(move || {
            let runtime = tokio::runtime::Runtime::new().expect("tokio runtime");
            let mut debouncer = Debouncer::new();
            while let Ok(command) = cmd_rx.recv() {
                handle_command(
                    &runtime,
                    &mut debouncer,
                    quiet_period,
                    client.clone(),
                    event_tx.clone(),
                    command,
                );
            }
            // Command channel closed: tear the timer down before the runtime.
            debouncer.cancel();
        });

        Self {
            inner: Arc::new(EngineInner {
                cmd_tx,
                event_rx: Mutex::new(event_rx),
            }),
        }
    }

    /// Record the latest snapshot and (re)arm the quiet-period timer.
    pub fn arm(&self, snapshot: Snapshot) {
        let _ = self.inner.cmd_tx.send(EngineCommand::Arm { snapshot });
    }

    pub fn count_text(&self, generation: Generation, text: impl Into<String>) {
        let _ = self.inner.cmd_tx.send(EngineCommand::CountText {
            generation,
            text: text.into(),
        });
    }

    pub fn count_attachment(&self, generation: Generation, spec: AttachmentSpec) {
        let _ = self
            .inner
            .cmd_tx
            .send(EngineCommand::CountAttachment { generation, spec });
    }

    pub fn try_recv(&self) -> Option<EngineEvent> {
        let event_rx = self.inner.event_rx.lock().ok()?;
        event_rx.try_recv().ok()
    }
}

fn handle_command(
    runtime: &tokio::runtime::Runtime,
    debouncer: &mut Debouncer,
    quiet_period: Duration,
    client: Arc<dyn CountClient>,
    event_tx: mpsc::Sender<EngineEvent>,
    command: EngineCommand,
) {
    match command {
        EngineCommand::Arm { snapshot } => {
            meter_debug!(
                "arm debounce text_len={} attachment={}",
                snapshot.text.len(),
                snapshot.attachment.is_some()
            );
            debouncer.arm(runtime.handle(), snapshot, quiet_period, event_tx);
        }
        EngineCommand::CountText { generation, text } => {
            runtime.spawn(async move {
                let result = client.count_text(&text).await;
                let _ = event_tx.send(EngineEvent::CountFinished {
                    generation,
                    modality: Modality::Text,
                    result,
                });
            });
        }
        EngineCommand::CountAttachment { generation, spec } => {
            runtime.spawn(async move {
                // Encoding is recomputed per submission; failures surface as
                // the attachment modality's result.
                let result = match encode_attachment(&spec).await {
                    Ok(encoded) => client.count_attachment(&encoded).await,
                    Err(err) => Err(err.into()),
                };
                let _ = event_tx.send(EngineEvent::CountFinished {
                    generation,
                    modality: Modality::Attachment,
                    result,
                });
            });
        }
    }
}
