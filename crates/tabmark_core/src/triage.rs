use thiserror::Error;

use crate::item::{parse_lines, LinkItem, RejectedLine};
use crate::locale::Locale;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Disposition {
    Keep,
    Later,
    Delete,
}

/// Selection for exports: one disposition, or the items not yet reviewed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TriageBucket {
    Pending,
    Keep,
    Later,
    Delete,
}

impl TriageBucket {
    fn matches(self, disposition: Option<Disposition>) -> bool {
        matches!(
            (self, disposition),
            (TriageBucket::Pending, None)
                | (TriageBucket::Keep, Some(Disposition::Keep))
                | (TriageBucket::Later, Some(Disposition::Later))
                | (TriageBucket::Delete, Some(Disposition::Delete))
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    /// `- [title](url)`
    Markdown,
    /// `url | title`
    Pairs,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TriageItem {
    pub item: LinkItem,
    pub disposition: Option<Disposition>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TriagePhase {
    #[default]
    NotStarted,
    InProgress {
        index: usize,
    },
    Complete,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TriageError {
    #[error("input contains no usable `url | title` lines")]
    NoItems,
    #[error("a triage session is already running; reset it first")]
    AlreadyStarted,
    #[error("no item is awaiting a decision")]
    NotInProgress,
}

/// Sequential keep/later/delete review over parsed link items.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TriageSession {
    phase: TriagePhase,
    items: Vec<TriageItem>,
    markdown: String,
    locale: Locale,
}

impl TriageSession {
    pub fn new(locale: Locale) -> Self {
        Self {
            locale,
            ..Self::default()
        }
    }

    pub fn phase(&self) -> TriagePhase {
        self.phase
    }

    pub fn items(&self) -> &[TriageItem] {
        &self.items
    }

    /// Markdown produced on completion; empty in every other phase.
    pub fn markdown(&self) -> &str {
        &self.markdown
    }

    pub fn set_locale(&mut self, locale: Locale) {
        self.locale = locale;
    }

    /// Parse `text` and begin reviewing from the first item.
    ///
    /// Returns the lines that were dropped while parsing.
    pub fn start(&mut self, text: &str) -> Result<Vec<RejectedLine>, TriageError> {
        if self.phase != TriagePhase::NotStarted {
            return Err(TriageError::AlreadyStarted);
        }
        let parsed = parse_lines(text);
        if parsed.items.is_empty() {
            return Err(TriageError::NoItems);
        }
        self.items = parsed
            .items
            .into_iter()
            .map(|item| TriageItem {
                item,
                disposition: None,
            })
            .collect();
        self.phase = TriagePhase::InProgress { index: 0 };
        Ok(parsed.rejected)
    }

    pub fn current(&self) -> Option<&LinkItem> {
        match self.phase {
            TriagePhase::InProgress { index } => self.items.get(index).map(|t| &t.item),
            _ => None,
        }
    }

    /// Zero-based index of the current item and the total item count.
    pub fn position(&self) -> Option<(usize, usize)> {
        match self.phase {
            TriagePhase::InProgress { index } => Some((index, self.items.len())),
            _ => None,
        }
    }

    /// Label the current item and advance. The last decision completes the
    /// session and renders its Markdown.
    pub fn dispose(&mut self, disposition: Disposition) -> Result<TriagePhase, TriageError> {
        let TriagePhase::InProgress { index } = self.phase else {
            return Err(TriageError::NotInProgress);
        };
        let slot = self
            .items
            .get_mut(index)
            .ok_or(TriageError::NotInProgress)?;
        slot.disposition = Some(disposition);

        let next = index + 1;
        if next < self.items.len() {
            self.phase = TriagePhase::InProgress { index: next };
        } else {
            self.phase = TriagePhase::Complete;
            self.markdown = self.render_complete();
        }
        Ok(self.phase)
    }

    pub fn reset(&mut self) {
        let locale = self.locale;
        *self = Self::new(locale);
    }

    pub fn count(&self, bucket: TriageBucket) -> usize {
        self.bucket(bucket).count()
    }

    /// Render one bucket without changing the session.
    pub fn export(&self, bucket: TriageBucket, format: ExportFormat) -> String {
        let empty_title = self.locale.empty_title();
        let mut out = String::new();
        for item in self.bucket(bucket) {
            let line = match format {
                ExportFormat::Markdown => item.markdown_line(empty_title),
                ExportFormat::Pairs => item.pair_line(),
            };
            out.push_str(&line);
            out.push('\n');
        }
        out
    }

    fn bucket(&self, bucket: TriageBucket) -> impl Iterator<Item = &LinkItem> + '_ {
        self.items
            .iter()
            .filter(move |t| bucket.matches(t.disposition))
            .map(|t| &t.item)
    }

    fn render_complete(&self) -> String {
        let headed = [("# Keep", TriageBucket::Keep), ("# Later", TriageBucket::Later)];
        let sections: Vec<String> = headed
            .into_iter()
            .filter(|(_, bucket)| self.count(*bucket) > 0)
            .map(|(header, bucket)| {
                format!("{header}\n{}", self.export(bucket, ExportFormat::Markdown))
            })
            .collect();
        sections.join("\n")
    }
}
