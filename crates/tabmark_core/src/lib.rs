//! Tabmark core: the `url | title` to Markdown transform, the triage session,
//! and the pure application state machine that drives both.
mod domain;
mod effect;
mod item;
mod locale;
mod msg;
mod render;
mod state;
mod triage;
mod update;
mod view_model;

pub use domain::{classify_domain, UNKNOWN_DOMAIN};
pub use effect::Effect;
pub use item::{parse_lines, ClassifiedLinkItem, LinkItem, ParsedInput, RejectReason, RejectedLine};
pub use locale::Locale;
pub use msg::Msg;
pub use render::{
    classify_items, convert_text, render_markdown, Conversion, HeaderFormat, RenderMode,
    RenderOptions,
};
pub use state::{AppSettings, AppState, ConversionBackend, RequestId, DEFAULT_DEBOUNCE};
pub use triage::{
    Disposition, ExportFormat, TriageBucket, TriageError, TriageItem, TriagePhase, TriageSession,
};
pub use update::update;
pub use view_model::{AppViewModel, Notice, NoticeSeverity, TriageView};
