use serde::{Deserialize, Serialize};

use crate::render::HeaderFormat;

/// Output language. Threaded explicitly into rendering; there is no global
/// locale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Locale {
    #[default]
    Ja,
    En,
}

impl Locale {
    /// Pick a locale from a POSIX-style language tag such as `en_US.UTF-8`.
    ///
    /// Only the language prefix is inspected; unsupported or missing values
    /// fall back to Japanese.
    pub fn detect(tag: Option<&str>) -> Self {
        let language = tag
            .and_then(|tag| tag.split(['_', '-', '.', '@']).next())
            .map(str::to_ascii_lowercase);
        match language.as_deref() {
            Some("en") => Locale::En,
            _ => Locale::Ja,
        }
    }

    pub fn empty_title(self) -> &'static str {
        match self {
            Locale::Ja => "--タイトルが空です--",
            Locale::En => "title is empty",
        }
    }

    pub fn default_header(self) -> HeaderFormat {
        match self {
            Locale::Ja => HeaderFormat::Counter,
            Locale::En => HeaderFormat::Urls,
        }
    }
}
