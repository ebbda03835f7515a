use tabmark_logging::{tabmark_debug, tabmark_info, tabmark_warn};

use crate::view_model::Notice;
use crate::{AppState, ConversionBackend, Effect, Msg, RejectedLine, TriagePhase};

/// Pure update function: applies a message to state and returns any effects.
pub fn update(mut state: AppState, msg: Msg) -> (AppState, Vec<Effect>) {
    let effects = match msg {
        Msg::InputChanged { text, at } => {
            state.set_input(text, at);
            Vec::new()
        }
        Msg::ModeSelected(mode) => {
            if state.set_mode(mode) {
                rerender(&mut state)
            } else {
                Vec::new()
            }
        }
        Msg::LocaleSelected(locale) => {
            if state.set_locale(locale) {
                rerender(&mut state)
            } else {
                Vec::new()
            }
        }
        Msg::ConvertRequested => start_conversion(&mut state),
        Msg::Tick { now } => {
            if state.debounce_due(now) {
                start_conversion(&mut state)
            } else {
                Vec::new()
            }
        }
        Msg::ConversionFinished { request_id, result } => {
            if !state.is_latest(request_id) {
                tabmark_debug!("Discarding stale conversion result request_id={}", request_id);
                return (state, Vec::new());
            }
            state.set_in_flight(None);
            match result {
                Ok(markdown) => state.set_output(markdown, 0),
                Err(message) => {
                    // Keep the previous output on failure.
                    tabmark_warn!("Conversion request_id={} failed: {}", request_id, message);
                }
            }
            Vec::new()
        }
        Msg::SaveRequested => {
            let markdown = state.primary_output().to_string();
            if markdown.is_empty() {
                state.set_notice(Some(Notice::warning("Nothing to save yet")));
                Vec::new()
            } else {
                vec![Effect::SaveOutput { markdown }]
            }
        }
        Msg::SaveFinished(result) => {
            let notice = match result {
                Ok(path) => Notice::info(format!("Saved to {}", path.display())),
                Err(message) => Notice::error(format!("Could not save output: {message}")),
            };
            state.set_notice(Some(notice));
            Vec::new()
        }
        Msg::TriageCommitted => {
            let input = state.input().to_string();
            match state.triage_mut().start(&input) {
                Ok(rejected) => {
                    log_rejected(&rejected);
                    tabmark_info!(
                        "Triage started with {} items",
                        state.triage().items().len()
                    );
                    state.set_notice(None);
                }
                Err(err) => state.set_notice(Some(Notice::warning(err.to_string()))),
            }
            Vec::new()
        }
        Msg::TriageDisposed(disposition) => {
            match state.triage_mut().dispose(disposition) {
                Ok(TriagePhase::Complete) => {
                    tabmark_info!("Triage complete");
                }
                Ok(_) => {}
                Err(err) => state.set_notice(Some(Notice::warning(err.to_string()))),
            }
            Vec::new()
        }
        Msg::TriageReset => {
            state.triage_mut().reset();
            Vec::new()
        }
        Msg::ExportRequested { bucket, format } => {
            let text = state.triage().export(bucket, format);
            vec![Effect::PresentExport {
                bucket,
                format,
                text,
            }]
        }
        Msg::NoticeDismissed => {
            state.set_notice(None);
            Vec::new()
        }
    };

    (state, effects)
}

/// Re-render after a mode or locale change. The remote wire format carries
/// only the text, so a remote backend keeps its current output.
fn rerender(state: &mut AppState) -> Vec<Effect> {
    if state.settings().backend == ConversionBackend::Remote {
        tabmark_warn!("Remote conversion uses the server's render options; not re-requesting");
        state.set_notice(Some(Notice::warning(
            "The remote converter renders with its own mode and locale",
        )));
        return Vec::new();
    }
    start_conversion(state)
}

fn start_conversion(state: &mut AppState) -> Vec<Effect> {
    let request_id = state.next_request();
    let text = state.input().to_string();

    if text.trim().is_empty() {
        state.set_in_flight(None);
        state.set_output(String::new(), 0);
        return Vec::new();
    }

    match state.settings().backend {
        ConversionBackend::Local => {
            state.set_in_flight(None);
            state.convert_locally();
            Vec::new()
        }
        ConversionBackend::Remote => {
            state.set_in_flight(Some(request_id));
            vec![Effect::RequestConversion { request_id, text }]
        }
    }
}

pub(crate) fn log_rejected(rejected: &[RejectedLine]) {
    for line in rejected {
        tabmark_warn!(
            "Skipping line {} ({}): {:?}",
            line.line_number,
            line.reason,
            line.text
        );
    }
}
