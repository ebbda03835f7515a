//! Interactive keep / later / delete review on a line-oriented terminal.

use std::collections::VecDeque;
use std::fs;
use std::io::{self, BufRead, Write};
use std::str::FromStr;
use std::time::Instant;

use anyhow::Context;
use tabmark_core::{
    update, AppSettings, AppState, ConversionBackend, Disposition, ExportFormat, Msg,
    NoticeSeverity, TriageBucket, TriagePhase,
};

use crate::cli::TriageArgs;
use crate::config::Settings;
use crate::effects::EffectRunner;

pub fn execute(args: TriageArgs, settings: &Settings) -> anyhow::Result<()> {
    let text = fs::read_to_string(&args.input)
        .with_context(|| format!("reading {}", args.input.display()))?;

    let app_settings = AppSettings {
        backend: ConversionBackend::Local,
        ..settings.app_settings()
    };
    let mut review = TriageLoop::new(app_settings, EffectRunner::new(None, args.output));
    let stdin = io::stdin();
    let stdout = io::stdout();
    review.run(&text, stdin.lock(), &mut stdout.lock())?;
    Ok(())
}

const HELP: &str = "\
  k  keep        l  later        d  delete
  e <pending|keep|later|delete> [md|pairs]   export a bucket
  s  start again after a reset
  r  reset       q  quit         ?  help";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TriageCommand {
    Dispose(Disposition),
    Export {
        bucket: TriageBucket,
        format: ExportFormat,
    },
    Start,
    Reset,
    Help,
    Quit,
}

impl FromStr for TriageCommand {
    type Err = String;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let mut words = line.split_whitespace();
        let command = match words.next().unwrap_or_default() {
            "k" | "keep" => TriageCommand::Dispose(Disposition::Keep),
            "l" | "later" => TriageCommand::Dispose(Disposition::Later),
            "d" | "delete" => TriageCommand::Dispose(Disposition::Delete),
            "e" | "export" => {
                let bucket = match words.next() {
                    Some("pending") => TriageBucket::Pending,
                    Some("keep") => TriageBucket::Keep,
                    Some("later") => TriageBucket::Later,
                    Some("delete") => TriageBucket::Delete,
                    _ => return Err("usage: e <pending|keep|later|delete> [md|pairs]".into()),
                };
                let format = match words.next() {
                    None | Some("md") => ExportFormat::Markdown,
                    Some("pairs") => ExportFormat::Pairs,
                    Some(other) => return Err(format!("unknown export format `{other}`")),
                };
                TriageCommand::Export { bucket, format }
            }
            "s" | "start" => TriageCommand::Start,
            "r" | "reset" => TriageCommand::Reset,
            "?" | "h" | "help" => TriageCommand::Help,
            "q" | "quit" => TriageCommand::Quit,
            "" => return Err("enter a command, ? for help".into()),
            other => return Err(format!("unknown command `{other}`, ? for help")),
        };
        Ok(command)
    }
}

/// Drives the core state machine from typed commands.
pub struct TriageLoop {
    state: AppState,
    runner: EffectRunner,
}

impl TriageLoop {
    pub fn new(settings: AppSettings, runner: EffectRunner) -> Self {
        Self {
            state: AppState::with_settings(settings),
            runner,
        }
    }

    #[cfg(test)]
    pub fn state(&self) -> &AppState {
        &self.state
    }

    /// Review `text` until `q` or end of input.
    pub fn run(&mut self, text: &str, input: impl BufRead, out: &mut dyn Write) -> io::Result<()> {
        self.dispatch(
            Msg::InputChanged {
                text: text.to_string(),
                at: Instant::now(),
            },
            out,
        )?;
        self.dispatch(Msg::TriageCommitted, out)?;
        self.show(out)?;

        for line in input.lines() {
            let command = match line?.parse::<TriageCommand>() {
                Ok(command) => command,
                Err(message) => {
                    writeln!(out, "{message}")?;
                    continue;
                }
            };
            let msg = match command {
                TriageCommand::Quit => break,
                TriageCommand::Help => {
                    writeln!(out, "{HELP}")?;
                    continue;
                }
                TriageCommand::Dispose(disposition) => Msg::TriageDisposed(disposition),
                TriageCommand::Export { bucket, format } => Msg::ExportRequested { bucket, format },
                TriageCommand::Start => Msg::TriageCommitted,
                TriageCommand::Reset => Msg::TriageReset,
            };

            let was_complete = self.phase() == TriagePhase::Complete;
            self.dispatch(msg, out)?;
            if !was_complete && self.phase() == TriagePhase::Complete {
                self.dispatch(Msg::SaveRequested, out)?;
            }
            self.show(out)?;
        }
        out.flush()
    }

    fn phase(&self) -> TriagePhase {
        self.state.view().triage.phase
    }

    fn dispatch(&mut self, msg: Msg, out: &mut dyn Write) -> io::Result<()> {
        let mut queue = VecDeque::from([msg]);
        while let Some(msg) = queue.pop_front() {
            let state = std::mem::take(&mut self.state);
            let (state, effects) = update(state, msg);
            self.state = state;
            queue.extend(self.runner.run(effects, out)?);
        }
        Ok(())
    }

    fn show(&mut self, out: &mut dyn Write) -> io::Result<()> {
        let view = self.state.view();
        if let Some(notice) = &view.notice {
            let label = match notice.severity {
                NoticeSeverity::Info => "note",
                NoticeSeverity::Warning => "warning",
                NoticeSeverity::Error => "error",
            };
            writeln!(out, "{label}: {}", notice.text)?;
            self.dispatch(Msg::NoticeDismissed, out)?;
        }

        let triage = &view.triage;
        match (triage.phase, &triage.current, triage.position) {
            (TriagePhase::InProgress { .. }, Some(item), Some((index, total))) => {
                writeln!(out, "[{}/{}] {}", index + 1, total, item.title)?;
                writeln!(out, "      {}", item.url)?;
                write!(out, "(k)eep (l)ater (d)elete, ? for help > ")?;
            }
            (TriagePhase::Complete, _, _) => {
                writeln!(
                    out,
                    "Done: {} keep, {} later, {} delete.",
                    triage.kept, triage.later, triage.deleted
                )?;
                write!(out, "(e)xport (r)eset (q)uit > ")?;
            }
            _ => write!(out, "No review running: (s)tart or (q)uit > ")?,
        }
        out.flush()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tabmark_core::{Locale, RenderMode};

    const INPUT: &str = "https://a.com/1 | One\nhttps://b.com/2 | Two\nnot a link\nhttps://c.com/3 | Three\n";

    fn settings() -> AppSettings {
        AppSettings {
            mode: RenderMode::Group,
            locale: Locale::En,
            ..AppSettings::default()
        }
    }

    #[test]
    fn parses_commands() {
        assert_eq!(
            "k".parse::<TriageCommand>(),
            Ok(TriageCommand::Dispose(Disposition::Keep))
        );
        assert_eq!(
            " later ".parse::<TriageCommand>(),
            Ok(TriageCommand::Dispose(Disposition::Later))
        );
        assert_eq!(
            "e delete pairs".parse::<TriageCommand>(),
            Ok(TriageCommand::Export {
                bucket: TriageBucket::Delete,
                format: ExportFormat::Pairs
            })
        );
        assert_eq!(
            "e keep".parse::<TriageCommand>(),
            Ok(TriageCommand::Export {
                bucket: TriageBucket::Keep,
                format: ExportFormat::Markdown
            })
        );
        assert!("e".parse::<TriageCommand>().is_err());
        assert!("e keep html".parse::<TriageCommand>().is_err());
        assert!("x".parse::<TriageCommand>().is_err());
    }

    #[test]
    fn full_review_saves_keep_and_later() {
        let temp = tempfile::TempDir::new().unwrap();
        let target = temp.path().join("review.md");
        let mut review = TriageLoop::new(settings(), EffectRunner::new(None, Some(target.clone())));

        let mut out = Vec::new();
        review
            .run(INPUT, "k\nd\nl\nq\n".as_bytes(), &mut out)
            .unwrap();

        assert_eq!(
            std::fs::read_to_string(&target).unwrap(),
            "# Keep\n- [One](https://a.com/1)\n\n# Later\n- [Three](https://c.com/3)\n"
        );
        let transcript = String::from_utf8(out).unwrap();
        assert!(transcript.contains("[1/3] One"));
        assert!(transcript.contains("[3/3] Three"));
        assert!(transcript.contains("Done: 1 keep, 1 later, 1 delete."));
        assert!(transcript.contains("note: Saved to"));
    }

    #[test]
    fn export_pending_mid_review() {
        let mut review = TriageLoop::new(settings(), EffectRunner::new(None, None));
        let mut out = Vec::new();
        review
            .run(INPUT, "k\ne pending pairs\n".as_bytes(), &mut out)
            .unwrap();

        let transcript = String::from_utf8(out).unwrap();
        assert!(transcript.contains("https://b.com/2 | Two\nhttps://c.com/3 | Three\n"));
        assert_eq!(
            review.state().view().triage.phase,
            TriagePhase::InProgress { index: 1 }
        );
    }

    #[test]
    fn reset_then_start_over() {
        let mut review = TriageLoop::new(settings(), EffectRunner::new(None, None));
        let mut out = Vec::new();
        review
            .run(INPUT, "k\nr\ns\n".as_bytes(), &mut out)
            .unwrap();

        let triage = review.state().view().triage;
        assert_eq!(triage.phase, TriagePhase::InProgress { index: 0 });
        assert_eq!(triage.pending, 3);
        assert_eq!(triage.kept, 0);
    }

    #[test]
    fn nothing_to_review_is_reported() {
        let mut review = TriageLoop::new(settings(), EffectRunner::new(None, None));
        let mut out = Vec::new();
        review.run("no separators here\n", io::empty(), &mut out).unwrap();

        let transcript = String::from_utf8(out).unwrap();
        assert!(transcript.contains("warning: input contains no usable"));
        assert_eq!(review.state().view().triage.phase, TriagePhase::NotStarted);
    }
}
