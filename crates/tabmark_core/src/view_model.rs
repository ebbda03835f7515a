use crate::{ConversionBackend, LinkItem, Locale, RenderMode, TriagePhase};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeSeverity {
    Info,
    Warning,
    Error,
}

/// A non-fatal message for the user, held until dismissed or replaced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub severity: NoticeSeverity,
    pub text: String,
}

impl Notice {
    pub fn info(text: impl Into<String>) -> Self {
        Self {
            severity: NoticeSeverity::Info,
            text: text.into(),
        }
    }

    pub fn warning(text: impl Into<String>) -> Self {
        Self {
            severity: NoticeSeverity::Warning,
            text: text.into(),
        }
    }

    pub fn error(text: impl Into<String>) -> Self {
        Self {
            severity: NoticeSeverity::Error,
            text: text.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppViewModel {
    pub mode: RenderMode,
    pub locale: Locale,
    pub backend: ConversionBackend,
    pub output: String,
    /// Non-blank input lines dropped by the last conversion.
    pub rejected_lines: usize,
    /// A debounced or remote conversion has not landed yet.
    pub conversion_pending: bool,
    pub triage: TriageView,
    pub notice: Option<Notice>,
    pub dirty: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TriageView {
    pub phase: TriagePhase,
    pub current: Option<LinkItem>,
    pub position: Option<(usize, usize)>,
    pub pending: usize,
    pub kept: usize,
    pub later: usize,
    pub deleted: usize,
    pub markdown: String,
}
