//! Re-convert an input file after each edit settles and keep an output file
//! in sync.

use std::collections::VecDeque;
use std::fs;
use std::io;
use std::path::PathBuf;
use std::thread;
use std::time::{Duration, Instant};

use tabmark_core::{update, AppSettings, AppState, Effect, Msg, NoticeSeverity};
use tabmark_logging::{tabmark_error, tabmark_info, tabmark_warn};

use crate::cli::WatchArgs;
use crate::config::Settings;
use crate::effects::EffectRunner;

const POLL_INTERVAL: Duration = Duration::from_millis(100);

pub fn execute(args: WatchArgs, settings: &Settings) -> anyhow::Result<()> {
    let mut settings = settings.clone();
    if let Some(ms) = args.debounce_ms {
        settings.debounce = Duration::from_millis(ms);
    }

    let runner = match settings.remote_settings() {
        Some(remote) => EffectRunner::remote(remote, Some(args.output.clone()))?,
        None => EffectRunner::new(None, Some(args.output.clone())),
    };
    tabmark_info!(
        "Watching {:?} -> {:?} (debounce {} ms)",
        args.input,
        args.output,
        settings.debounce.as_millis()
    );

    let mut watch = WatchLoop::new(settings.app_settings(), runner, args.input);
    loop {
        watch.step(Instant::now())?;
        thread::sleep(POLL_INTERVAL);
    }
}

pub struct WatchLoop {
    state: AppState,
    runner: EffectRunner,
    input: PathBuf,
    last_seen: Option<String>,
    last_saved: Option<String>,
    read_failed: bool,
}

impl WatchLoop {
    pub fn new(settings: AppSettings, runner: EffectRunner, input: PathBuf) -> Self {
        Self {
            state: AppState::with_settings(settings),
            runner,
            input,
            last_seen: None,
            last_saved: None,
            read_failed: false,
        }
    }

    #[cfg(test)]
    pub fn state(&self) -> &AppState {
        &self.state
    }

    /// One poll: pick up edits, fire a due conversion, collect remote
    /// results and save output that changed.
    pub fn step(&mut self, now: Instant) -> io::Result<()> {
        match fs::read_to_string(&self.input) {
            Ok(text) => {
                self.read_failed = false;
                if self.last_seen.as_deref() != Some(text.as_str()) {
                    self.last_seen = Some(text.clone());
                    self.dispatch(Msg::InputChanged { text, at: now })?;
                }
            }
            Err(err) => {
                if !self.read_failed {
                    tabmark_warn!("Cannot read {:?}: {}", self.input, err);
                }
                self.read_failed = true;
            }
        }

        self.dispatch(Msg::Tick { now })?;
        for msg in self.runner.poll() {
            self.dispatch(msg)?;
        }

        let view = self.state.view();
        let unchanged = match &self.last_saved {
            Some(saved) => *saved == view.output,
            // Nothing written yet; an empty result leaves the target alone.
            None => view.output.is_empty(),
        };
        if !view.conversion_pending && !unchanged {
            if view.rejected_lines > 0 {
                tabmark_info!("{} line(s) skipped", view.rejected_lines);
            }
            if view.output.is_empty() {
                // `SaveRequested` refuses empty output; clear the file directly.
                let clear = vec![Effect::SaveOutput {
                    markdown: String::new(),
                }];
                for msg in self.runner.run(clear, &mut io::sink())? {
                    self.dispatch(msg)?;
                }
            } else {
                self.dispatch(Msg::SaveRequested)?;
            }
            self.last_saved = Some(view.output);
        }

        if let Some(notice) = self.state.view().notice {
            match notice.severity {
                NoticeSeverity::Info => tabmark_info!("{}", notice.text),
                NoticeSeverity::Warning => tabmark_warn!("{}", notice.text),
                NoticeSeverity::Error => tabmark_error!("{}", notice.text),
            }
            self.dispatch(Msg::NoticeDismissed)?;
        }
        Ok(())
    }

    fn dispatch(&mut self, msg: Msg) -> io::Result<()> {
        let mut queue = VecDeque::from([msg]);
        while let Some(msg) = queue.pop_front() {
            let state = std::mem::take(&mut self.state);
            let (state, effects) = update(state, msg);
            self.state = state;
            queue.extend(self.runner.run(effects, &mut io::sink())?);
        }
        Ok(())
    }
}
