use std::time::{Duration, Instant};

use crate::view_model::{AppViewModel, Notice, TriageView};
use crate::{
    convert_text, HeaderFormat, Locale, RenderMode, RenderOptions, TriageBucket, TriagePhase,
    TriageSession,
};

pub type RequestId = u64;

/// Quiet period after the last edit before a conversion fires.
pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(500);

/// Where conversions run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ConversionBackend {
    /// Rendered inside `update`.
    #[default]
    Local,
    /// Delegated through `Effect::RequestConversion`.
    Remote,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppSettings {
    pub mode: RenderMode,
    pub locale: Locale,
    /// Overrides the locale's default header style.
    pub header: Option<HeaderFormat>,
    pub backend: ConversionBackend,
    pub debounce: Duration,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            mode: RenderMode::default(),
            locale: Locale::default(),
            header: None,
            backend: ConversionBackend::default(),
            debounce: DEFAULT_DEBOUNCE,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppState {
    settings: AppSettings,
    input: String,
    output: String,
    rejected_lines: usize,
    deadline: Option<Instant>,
    last_request: RequestId,
    in_flight: Option<RequestId>,
    triage: TriageSession,
    notice: Option<Notice>,
    dirty: bool,
}

impl Default for AppState {
    fn default() -> Self {
        Self::with_settings(AppSettings::default())
    }
}

impl AppState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_settings(settings: AppSettings) -> Self {
        Self {
            triage: TriageSession::new(settings.locale),
            settings,
            input: String::new(),
            output: String::new(),
            rejected_lines: 0,
            deadline: None,
            last_request: 0,
            in_flight: None,
            notice: None,
            dirty: false,
        }
    }

    pub fn view(&self) -> AppViewModel {
        AppViewModel {
            mode: self.settings.mode,
            locale: self.settings.locale,
            backend: self.settings.backend,
            output: self.output.clone(),
            rejected_lines: self.rejected_lines,
            conversion_pending: self.deadline.is_some() || self.in_flight.is_some(),
            triage: self.triage_view(),
            notice: self.notice.clone(),
            dirty: self.dirty,
        }
    }

    /// Returns whether anything changed since the last call and clears the flag.
    pub fn consume_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }

    pub fn render_options(&self) -> RenderOptions {
        let options = RenderOptions::for_locale(self.settings.mode, self.settings.locale);
        match self.settings.header {
            Some(header) => options.with_header(header),
            None => options,
        }
    }

    pub(crate) fn settings(&self) -> &AppSettings {
        &self.settings
    }

    pub(crate) fn input(&self) -> &str {
        &self.input
    }

    pub(crate) fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    pub(crate) fn set_input(&mut self, text: String, at: Instant) -> bool {
        if self.input == text {
            return false;
        }
        self.input = text;
        self.deadline = Some(at + self.settings.debounce);
        self.mark_dirty();
        true
    }

    pub(crate) fn set_mode(&mut self, mode: RenderMode) -> bool {
        if self.settings.mode == mode {
            return false;
        }
        self.settings.mode = mode;
        self.mark_dirty();
        true
    }

    pub(crate) fn set_locale(&mut self, locale: Locale) -> bool {
        if self.settings.locale == locale {
            return false;
        }
        self.settings.locale = locale;
        self.triage.set_locale(locale);
        self.mark_dirty();
        true
    }

    pub(crate) fn debounce_due(&self, now: Instant) -> bool {
        self.deadline.is_some_and(|deadline| now >= deadline)
    }

    /// Clears any armed debounce and returns a fresh request id. Earlier ids
    /// become stale.
    pub(crate) fn next_request(&mut self) -> RequestId {
        self.deadline = None;
        self.last_request += 1;
        self.last_request
    }

    pub(crate) fn set_in_flight(&mut self, request_id: Option<RequestId>) {
        self.in_flight = request_id;
        self.mark_dirty();
    }

    pub(crate) fn is_latest(&self, request_id: RequestId) -> bool {
        self.in_flight == Some(request_id)
    }

    pub(crate) fn set_output(&mut self, output: String, rejected_lines: usize) {
        self.output = output;
        self.rejected_lines = rejected_lines;
        self.mark_dirty();
    }

    pub(crate) fn convert_locally(&mut self) {
        let conversion = convert_text(&self.input, &self.render_options());
        let rejected = conversion.rejected.len();
        crate::update::log_rejected(&conversion.rejected);
        self.set_output(conversion.markdown, rejected);
    }

    /// Triage Markdown once a session has completed, even when every item
    /// was deleted; the conversion output otherwise.
    pub(crate) fn primary_output(&self) -> &str {
        match self.triage.phase() {
            TriagePhase::Complete => self.triage.markdown(),
            _ => &self.output,
        }
    }

    pub(crate) fn triage(&self) -> &TriageSession {
        &self.triage
    }

    pub(crate) fn triage_mut(&mut self) -> &mut TriageSession {
        self.mark_dirty();
        &mut self.triage
    }

    pub(crate) fn set_notice(&mut self, notice: Option<Notice>) {
        if self.notice != notice {
            self.notice = notice;
            self.mark_dirty();
        }
    }

    fn triage_view(&self) -> TriageView {
        let triage = &self.triage;
        TriageView {
            phase: triage.phase(),
            current: triage.current().cloned(),
            position: triage.position(),
            pending: triage.count(TriageBucket::Pending),
            kept: triage.count(TriageBucket::Keep),
            later: triage.count(TriageBucket::Later),
            deleted: triage.count(TriageBucket::Delete),
            markdown: triage.markdown().to_string(),
        }
    }
}
