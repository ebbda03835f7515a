use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::domain::classify_domain;
use crate::item::{parse_lines, ClassifiedLinkItem, LinkItem, RejectedLine};
use crate::locale::Locale;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum RenderMode {
    /// Input order, no headers.
    AsIs,
    /// Flat list ordered by (domain, url).
    Sort,
    /// One headed section per domain.
    #[default]
    Group,
}

/// Group header style.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum HeaderFormat {
    /// `# example.com_3件`
    Counter,
    /// `# example.com - 3 URLs`
    Urls,
}

impl HeaderFormat {
    pub fn header(self, domain: &str, count: usize) -> String {
        match self {
            HeaderFormat::Counter => format!("# {domain}_{count}件"),
            HeaderFormat::Urls => {
                let plural = if count == 1 { "" } else { "s" };
                format!("# {domain} - {count} URL{plural}")
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderOptions {
    pub mode: RenderMode,
    pub header: HeaderFormat,
    pub empty_title: String,
}

impl RenderOptions {
    pub fn for_locale(mode: RenderMode, locale: Locale) -> Self {
        Self {
            mode,
            header: locale.default_header(),
            empty_title: locale.empty_title().to_string(),
        }
    }

    pub fn with_header(mut self, header: HeaderFormat) -> Self {
        self.header = header;
        self
    }
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self::for_locale(RenderMode::default(), Locale::default())
    }
}

/// Result of converting a block of pasted text.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Conversion {
    pub markdown: String,
    pub rejected: Vec<RejectedLine>,
}

pub fn classify_items(items: Vec<LinkItem>) -> Vec<ClassifiedLinkItem> {
    items
        .into_iter()
        .map(|item| {
            let domain = classify_domain(&item.url);
            ClassifiedLinkItem { item, domain }
        })
        .collect()
}

/// Parse, classify and render in one pass.
pub fn convert_text(text: &str, options: &RenderOptions) -> Conversion {
    let parsed = parse_lines(text);
    let classified = classify_items(parsed.items);
    Conversion {
        markdown: render_markdown(&classified, options),
        rejected: parsed.rejected,
    }
}

/// Render classified items as Markdown.
///
/// Each line ends in `\n`. Groups are separated by one blank line with none
/// before the first or after the last. No items renders as the empty string.
pub fn render_markdown(items: &[ClassifiedLinkItem], options: &RenderOptions) -> String {
    match options.mode {
        RenderMode::AsIs => link_lines(items.iter(), &options.empty_title),
        RenderMode::Sort => {
            let mut sorted: Vec<&ClassifiedLinkItem> = items.iter().collect();
            sorted.sort_by(|a, b| {
                a.domain
                    .cmp(&b.domain)
                    .then_with(|| a.item.url.cmp(&b.item.url))
            });
            link_lines(sorted.into_iter(), &options.empty_title)
        }
        RenderMode::Group => render_groups(items, options),
    }
}

fn render_groups(items: &[ClassifiedLinkItem], options: &RenderOptions) -> String {
    let mut groups: BTreeMap<&str, Vec<&ClassifiedLinkItem>> = BTreeMap::new();
    for item in items {
        groups.entry(item.domain.as_str()).or_default().push(item);
    }

    let sections: Vec<String> = groups
        .into_iter()
        .map(|(domain, mut members)| {
            members.sort_by(|a, b| a.item.url.cmp(&b.item.url));
            let mut section = options.header.header(domain, members.len());
            section.push('\n');
            section.push_str(&link_lines(members.into_iter(), &options.empty_title));
            section
        })
        .collect();

    sections.join("\n")
}

fn link_lines<'a>(
    items: impl Iterator<Item = &'a ClassifiedLinkItem>,
    empty_title: &str,
) -> String {
    let mut out = String::new();
    for classified in items {
        out.push_str(&classified.item.markdown_line(empty_title));
        out.push('\n');
    }
    out
}
