use std::path::PathBuf;
use std::time::Instant;

use crate::{Disposition, ExportFormat, Locale, RenderMode, RequestId, TriageBucket};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Msg {
    /// The pasted text changed; arms the debounce timer.
    InputChanged { text: String, at: Instant },
    /// User picked a render mode.
    ModeSelected(RenderMode),
    /// User picked an output language.
    LocaleSelected(Locale),
    /// Convert now, skipping the debounce.
    ConvertRequested,
    /// Clock tick from the shell; fires a due debounced conversion.
    Tick { now: Instant },
    /// A remote conversion came back.
    ConversionFinished {
        request_id: RequestId,
        result: Result<String, String>,
    },
    /// User asked to save the current output.
    SaveRequested,
    /// Outcome of a save effect.
    SaveFinished(Result<PathBuf, String>),
    /// Start reviewing the current input item by item.
    TriageCommitted,
    /// Decision for the item under review.
    TriageDisposed(Disposition),
    /// Discard the triage session.
    TriageReset,
    /// Ad-hoc export of one triage bucket.
    ExportRequested {
        bucket: TriageBucket,
        format: ExportFormat,
    },
    NoticeDismissed,
}
