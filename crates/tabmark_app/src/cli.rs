use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use tabmark_core::{HeaderFormat, Locale, RenderMode};

/// Turn `url | title` tab exports into Markdown link lists.
#[derive(Parser, Debug)]
#[command(name = "tabmark", version)]
pub struct Cli {
    /// RON config file (defaults to ./tabmark.ron when present).
    #[arg(long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Log at debug level.
    #[arg(long, short = 'v', global = true, default_value_t = false)]
    pub verbose: bool,

    /// Also write logs to this file.
    #[arg(long, global = true, value_name = "FILE")]
    pub log_file: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Convert a list once and print or save the Markdown.
    Convert(ConvertArgs),
    /// Review items one at a time as keep / later / delete.
    Triage(TriageArgs),
    /// Re-convert a file whenever it changes.
    Watch(WatchArgs),
    /// Serve `POST /convert` over HTTP.
    Serve(ServeArgs),
}

#[derive(Args, Debug, Clone, Default)]
pub struct RenderArgs {
    #[arg(long, short = 'm', value_enum)]
    pub mode: Option<ModeArg>,

    /// Output language; defaults to the one in LC_ALL / LANG.
    #[arg(long, short = 'l', value_enum)]
    pub locale: Option<LocaleArg>,

    /// Group header style; defaults to the locale's.
    #[arg(long, value_enum)]
    pub header: Option<HeaderArg>,
}

impl RenderArgs {
    /// Whether any render flag was given on the command line.
    pub fn any_set(&self) -> bool {
        self.mode.is_some() || self.locale.is_some() || self.header.is_some()
    }
}

#[derive(Args, Debug)]
pub struct ConvertArgs {
    /// Input file; reads stdin when absent or `-`.
    pub input: Option<PathBuf>,

    #[command(flatten)]
    pub render: RenderArgs,

    /// Write the Markdown here instead of stdout.
    #[arg(long, short = 'o', value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Convert through a remote `/convert` endpoint. The server renders with
    /// its own mode, locale and header; those flags are ignored.
    #[arg(long, value_name = "URL")]
    pub remote: Option<String>,
}

#[derive(Args, Debug)]
pub struct TriageArgs {
    pub input: PathBuf,

    #[command(flatten)]
    pub render: RenderArgs,

    /// Save the finished Keep / Later Markdown here.
    #[arg(long, short = 'o', value_name = "FILE")]
    pub output: Option<PathBuf>,
}

#[derive(Args, Debug)]
pub struct WatchArgs {
    pub input: PathBuf,

    #[command(flatten)]
    pub render: RenderArgs,

    #[arg(long, short = 'o', value_name = "FILE")]
    pub output: PathBuf,

    /// Convert through a remote `/convert` endpoint; render flags are ignored.
    #[arg(long, value_name = "URL")]
    pub remote: Option<String>,

    /// Quiet period before re-converting, in milliseconds.
    #[arg(long, value_name = "MS")]
    pub debounce_ms: Option<u64>,
}

#[derive(Args, Debug)]
pub struct ServeArgs {
    /// Listen address, e.g. 127.0.0.1:8080.
    #[arg(long)]
    pub addr: Option<String>,

    #[command(flatten)]
    pub render: RenderArgs,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModeArg {
    AsIs,
    Sort,
    Group,
}

impl From<ModeArg> for RenderMode {
    fn from(value: ModeArg) -> Self {
        match value {
            ModeArg::AsIs => RenderMode::AsIs,
            ModeArg::Sort => RenderMode::Sort,
            ModeArg::Group => RenderMode::Group,
        }
    }
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum LocaleArg {
    Ja,
    En,
}

impl From<LocaleArg> for Locale {
    fn from(value: LocaleArg) -> Self {
        match value {
            LocaleArg::Ja => Locale::Ja,
            LocaleArg::En => Locale::En,
        }
    }
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum HeaderArg {
    /// `# example.com_3件`
    Counter,
    /// `# example.com - 3 URLs`
    Urls,
}

impl From<HeaderArg> for HeaderFormat {
    fn from(value: HeaderArg) -> Self {
        match value {
            HeaderArg::Counter => HeaderFormat::Counter,
            HeaderArg::Urls => HeaderFormat::Urls,
        }
    }
}
