use std::sync::{mpsc, Arc};
use std::thread;
use std::time::Duration;

use tabmark_core::RequestId;
use tabmark_logging::tabmark_warn;

use crate::convert::Converter;
use crate::{EngineError, EngineEvent};

enum EngineCommand {
    Convert { request_id: RequestId, text: String },
}

/// Runs conversions on a background tokio runtime and hands results back
/// through a polled channel.
pub struct EngineHandle {
    cmd_tx: mpsc::Sender<EngineCommand>,
    event_rx: mpsc::Receiver<EngineEvent>,
}

impl EngineHandle {
    pub fn new(converter: Arc<dyn Converter>) -> Result<Self, EngineError> {
        let (cmd_tx, cmd_rx) = mpsc::channel();
        let (event_tx, event_rx) = mpsc::channel();
        let runtime = tokio::runtime::Runtime::new()?;

        thread::spawn(move || {
            while let Ok(command) = cmd_rx.recv() {
                let converter = converter.clone();
                let event_tx = event_tx.clone();
                runtime.spawn(async move {
                    handle_command(converter.as_ref(), command, event_tx).await;
                });
            }
        });

        Ok(Self { cmd_tx, event_rx })
    }

    pub fn convert(&self, request_id: RequestId, text: impl Into<String>) {
        let sent = self.cmd_tx.send(EngineCommand::Convert {
            request_id,
            text: text.into(),
        });
        if sent.is_err() {
            tabmark_warn!("Engine worker is gone; dropping request_id={}", request_id);
        }
    }

    pub fn try_recv(&self) -> Option<EngineEvent> {
        self.event_rx.try_recv().ok()
    }

    pub fn recv_timeout(&self, timeout: Duration) -> Option<EngineEvent> {
        self.event_rx.recv_timeout(timeout).ok()
    }
}

async fn handle_command(
    converter: &dyn Converter,
    command: EngineCommand,
    event_tx: mpsc::Sender<EngineEvent>,
) {
    match command {
        EngineCommand::Convert { request_id, text } => {
            let result = converter.convert(&text).await;
            let _ = event_tx.send(EngineEvent::Converted { request_id, result });
        }
    }
}
