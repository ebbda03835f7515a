use std::fmt;

const SEPARATOR: &str = " | ";

/// One `url | title` pair taken from a single input line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkItem {
    pub url: String,
    pub title: String,
}

impl LinkItem {
    pub fn new(url: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            title: title.into(),
        }
    }

    /// `- [title](url)`, substituting `empty_title` for a blank title.
    pub fn markdown_line(&self, empty_title: &str) -> String {
        let title = self.title.trim();
        let title = if title.is_empty() { empty_title } else { title };
        format!("- [{}]({})", title, self.url)
    }

    /// The original export pairing, `url | title`.
    pub fn pair_line(&self) -> String {
        format!("{}{}{}", self.url, SEPARATOR, self.title)
    }
}

/// A [`LinkItem`] tagged with the domain label it groups under.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassifiedLinkItem {
    pub item: LinkItem,
    pub domain: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RejectReason {
    MissingSeparator,
    EmptyUrl,
    EmptyTitle,
}

impl fmt::Display for RejectReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RejectReason::MissingSeparator => write!(f, "missing \" | \" separator"),
            RejectReason::EmptyUrl => write!(f, "empty url"),
            RejectReason::EmptyTitle => write!(f, "empty title"),
        }
    }
}

/// A non-blank input line that produced no item.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RejectedLine {
    /// 1-based line number in the input text.
    pub line_number: usize,
    pub text: String,
    pub reason: RejectReason,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ParsedInput {
    pub items: Vec<LinkItem>,
    pub rejected: Vec<RejectedLine>,
}

/// Parse pasted text into link items.
///
/// Only the first `" | "` on a line splits url from title; the title keeps any
/// later separators. Blank lines are skipped silently, other unusable lines
/// are reported in [`ParsedInput::rejected`]. Never fails.
pub fn parse_lines(text: &str) -> ParsedInput {
    let mut parsed = ParsedInput::default();
    for (idx, line) in text.lines().enumerate() {
        if line.trim().is_empty() {
            continue;
        }
        match parse_line(line) {
            Ok(item) => parsed.items.push(item),
            Err(reason) => parsed.rejected.push(RejectedLine {
                line_number: idx + 1,
                text: line.to_string(),
                reason,
            }),
        }
    }
    parsed
}

fn parse_line(line: &str) -> Result<LinkItem, RejectReason> {
    let (url, title) = line
        .split_once(SEPARATOR)
        .ok_or(RejectReason::MissingSeparator)?;
    let url = url.trim();
    let title = title.trim();
    if url.is_empty() {
        return Err(RejectReason::EmptyUrl);
    }
    if title.is_empty() {
        return Err(RejectReason::EmptyTitle);
    }
    Ok(LinkItem::new(url, title))
}
