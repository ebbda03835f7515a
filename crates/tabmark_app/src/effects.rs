use std::io::{self, Write};
use std::path::PathBuf;
use std::sync::Arc;

use tabmark_core::{Effect, Msg, TriageBucket};
use tabmark_engine::{
    write_output_file, EngineEvent, EngineHandle, RemoteConverter, RemoteSettings,
};
use tabmark_logging::{tabmark_info, tabmark_warn};

/// Executes effects from `update` and turns their outcomes back into messages.
pub struct EffectRunner {
    engine: Option<EngineHandle>,
    output: Option<PathBuf>,
}

impl EffectRunner {
    /// `output` is where `SaveOutput` writes; without one the Markdown is
    /// written to the caller's stream.
    pub fn new(engine: Option<EngineHandle>, output: Option<PathBuf>) -> Self {
        Self { engine, output }
    }

    /// A runner that sends conversions to a remote endpoint.
    pub fn remote(settings: RemoteSettings, output: Option<PathBuf>) -> anyhow::Result<Self> {
        let converter = RemoteConverter::new(settings)?;
        tabmark_info!("Converting through {}", converter.endpoint());
        let engine = EngineHandle::new(Arc::new(converter))?;
        Ok(Self::new(Some(engine), output))
    }

    pub fn run(&self, effects: Vec<Effect>, out: &mut dyn Write) -> io::Result<Vec<Msg>> {
        let mut follow_ups = Vec::new();
        for effect in effects {
            match effect {
                Effect::RequestConversion { request_id, text } => {
                    tabmark_info!(
                        "RequestConversion request_id={} text_len={}",
                        request_id,
                        text.len()
                    );
                    match &self.engine {
                        Some(engine) => engine.convert(request_id, text),
                        None => follow_ups.push(Msg::ConversionFinished {
                            request_id,
                            result: Err("no remote endpoint configured".to_string()),
                        }),
                    }
                }
                Effect::SaveOutput { markdown } => match &self.output {
                    Some(path) => {
                        let result = write_output_file(path, &markdown).map_err(|err| {
                            tabmark_warn!("Saving to {:?} failed: {}", path, err);
                            err.to_string()
                        });
                        follow_ups.push(Msg::SaveFinished(result));
                    }
                    None => out.write_all(markdown.as_bytes())?,
                },
                Effect::PresentExport {
                    bucket,
                    format,
                    text,
                } => {
                    tabmark_info!("Export bucket={:?} format={:?}", bucket, format);
                    if text.is_empty() {
                        writeln!(out, "(no {} items)", bucket_name(bucket))?;
                    } else {
                        out.write_all(text.as_bytes())?;
                    }
                }
            }
        }
        Ok(follow_ups)
    }

    /// Drains finished conversions without blocking.
    pub fn poll(&self) -> Vec<Msg> {
        let Some(engine) = &self.engine else {
            return Vec::new();
        };
        let mut inbox = Vec::new();
        while let Some(event) = engine.try_recv() {
            match event {
                EngineEvent::Converted { request_id, result } => {
                    inbox.push(Msg::ConversionFinished {
                        request_id,
                        result: result.map_err(|err| err.to_string()),
                    });
                }
            }
        }
        inbox
    }
}

pub fn bucket_name(bucket: TriageBucket) -> &'static str {
    match bucket {
        TriageBucket::Pending => "pending",
        TriageBucket::Keep => "keep",
        TriageBucket::Later => "later",
        TriageBucket::Delete => "delete",
    }
}
