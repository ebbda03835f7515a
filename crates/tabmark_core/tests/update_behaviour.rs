use std::path::PathBuf;
use std::sync::Once;
use std::time::{Duration, Instant};

use tabmark_core::{
    update, AppSettings, AppState, ConversionBackend, Disposition, Effect, ExportFormat, Locale,
    Msg, NoticeSeverity, RenderMode, TriageBucket, TriagePhase, DEFAULT_DEBOUNCE,
};
use pretty_assertions::assert_eq;

const INPUT: &str = "https://b.com/1 | B1\nhttps://a.com/1 | A1\n";

fn init_logging() {
    static INIT: Once = Once::new();
    INIT.call_once(tabmark_logging::initialize_for_tests);
}

fn remote_state() -> AppState {
    AppState::with_settings(AppSettings {
        backend: ConversionBackend::Remote,
        ..AppSettings::default()
    })
}

fn type_input(state: AppState, text: &str, at: Instant) -> AppState {
    let (state, effects) = update(
        state,
        Msg::InputChanged {
            text: text.to_string(),
            at,
        },
    );
    assert!(effects.is_empty());
    state
}

#[test]
fn local_conversion_waits_for_debounce() {
    init_logging();
    let t0 = Instant::now();
    let state = type_input(AppState::new(), INPUT, t0);
    assert!(state.view().conversion_pending);

    let (state, _) = update(
        state,
        Msg::Tick {
            now: t0 + Duration::from_millis(100),
        },
    );
    assert_eq!(state.view().output, "");

    let (mut state, effects) = update(
        state,
        Msg::Tick {
            now: t0 + DEFAULT_DEBOUNCE,
        },
    );
    assert!(effects.is_empty());
    let view = state.view();
    assert_eq!(
        view.output,
        "# a.com_1件\n- [A1](https://a.com/1)\n\n# b.com_1件\n- [B1](https://b.com/1)\n"
    );
    assert!(!view.conversion_pending);
    assert!(state.consume_dirty());
    assert!(!state.consume_dirty());
}

#[test]
fn rapid_edits_coalesce_into_one_request() {
    init_logging();
    let t0 = Instant::now();
    let state = type_input(remote_state(), "https://a.com | A", t0);
    let state = type_input(state, INPUT, t0 + Duration::from_millis(300));

    // The first edit's deadline has passed, but the second edit re-armed it.
    let (state, effects) = update(
        state,
        Msg::Tick {
            now: t0 + Duration::from_millis(600),
        },
    );
    assert!(effects.is_empty());

    let (state, effects) = update(
        state,
        Msg::Tick {
            now: t0 + Duration::from_millis(800),
        },
    );
    assert_eq!(
        effects,
        vec![Effect::RequestConversion {
            request_id: 1,
            text: INPUT.to_string(),
        }]
    );

    // Nothing further fires once the request is out.
    let (_state, effects) = update(
        state,
        Msg::Tick {
            now: t0 + Duration::from_secs(5),
        },
    );
    assert!(effects.is_empty());
}

#[test]
fn stale_remote_results_are_discarded() {
    init_logging();
    let t0 = Instant::now();
    let state = type_input(remote_state(), INPUT, t0);
    let (state, first) = update(state, Msg::ConvertRequested);
    let state = type_input(state, "https://c.com | C", t0);
    let (state, second) = update(state, Msg::ConvertRequested);
    assert!(matches!(first[0], Effect::RequestConversion { request_id: 1, .. }));
    assert!(matches!(second[0], Effect::RequestConversion { request_id: 2, .. }));

    let (state, _) = update(
        state,
        Msg::ConversionFinished {
            request_id: 1,
            result: Ok("old".to_string()),
        },
    );
    assert_eq!(state.view().output, "");
    assert!(state.view().conversion_pending);

    let (state, _) = update(
        state,
        Msg::ConversionFinished {
            request_id: 2,
            result: Ok("new".to_string()),
        },
    );
    assert_eq!(state.view().output, "new");
    assert!(!state.view().conversion_pending);
}

#[test]
fn failed_remote_conversion_keeps_previous_output() {
    init_logging();
    let t0 = Instant::now();
    let state = type_input(remote_state(), INPUT, t0);
    let (state, _) = update(state, Msg::ConvertRequested);
    let (state, _) = update(
        state,
        Msg::ConversionFinished {
            request_id: 1,
            result: Ok("first".to_string()),
        },
    );

    let state = type_input(state, "https://c.com | C", t0);
    let (state, _) = update(state, Msg::ConvertRequested);
    let (state, effects) = update(
        state,
        Msg::ConversionFinished {
            request_id: 2,
            result: Err("connection refused".to_string()),
        },
    );

    assert!(effects.is_empty());
    assert_eq!(state.view().output, "first");
    assert!(!state.view().conversion_pending);
}

#[test]
fn clearing_input_clears_output() {
    init_logging();
    let t0 = Instant::now();
    let state = type_input(AppState::new(), INPUT, t0);
    let (state, _) = update(state, Msg::ConvertRequested);
    assert!(!state.view().output.is_empty());

    let state = type_input(state, "", t0);
    let (state, effects) = update(state, Msg::ConvertRequested);
    assert!(effects.is_empty());
    assert_eq!(state.view().output, "");
}

#[test]
fn mode_change_reconverts_immediately() {
    init_logging();
    let t0 = Instant::now();
    let state = type_input(AppState::new(), INPUT, t0);
    let (state, _) = update(state, Msg::ModeSelected(RenderMode::AsIs));

    assert_eq!(
        state.view().output,
        "- [B1](https://b.com/1)\n- [A1](https://a.com/1)\n"
    );

    let (state, _) = update(state, Msg::LocaleSelected(Locale::En));
    assert_eq!(state.view().locale, Locale::En);
    assert_eq!(state.view().mode, RenderMode::AsIs);

    let (state, _) = update(state, Msg::ModeSelected(RenderMode::Group));
    assert!(state.view().output.starts_with("# a.com - 1 URL\n"));
}

#[test]
fn remote_backend_does_not_rerequest_on_mode_change() {
    init_logging();
    let state = type_input(remote_state(), INPUT, Instant::now());
    let (state, effects) = update(state, Msg::ConvertRequested);
    assert_eq!(effects.len(), 1);

    let (state, effects) = update(state, Msg::ModeSelected(RenderMode::Sort));
    assert!(effects.is_empty());
    assert_eq!(state.view().mode, RenderMode::Sort);
    assert_eq!(
        state.view().notice.map(|n| n.severity),
        Some(NoticeSeverity::Warning)
    );

    let (_, effects) = update(state, Msg::LocaleSelected(Locale::En));
    assert!(effects.is_empty());
}

#[test]
fn rejected_lines_are_counted() {
    init_logging();
    let t0 = Instant::now();
    let state = type_input(AppState::new(), "junk\nhttps://a.com | A\n | x\n", t0);
    let (state, _) = update(state, Msg::ConvertRequested);

    assert_eq!(state.view().rejected_lines, 2);
}

#[test]
fn save_emits_effect_and_reports_outcome() {
    init_logging();
    let (state, effects) = update(AppState::new(), Msg::SaveRequested);
    assert!(effects.is_empty());
    assert_eq!(
        state.view().notice.map(|n| n.severity),
        Some(NoticeSeverity::Warning)
    );

    let state = type_input(state, INPUT, Instant::now());
    let (state, _) = update(state, Msg::ConvertRequested);
    let (state, effects) = update(state, Msg::SaveRequested);
    assert_eq!(
        effects,
        vec![Effect::SaveOutput {
            markdown: state.view().output.clone(),
        }]
    );

    let (state, _) = update(state, Msg::SaveFinished(Err("disk full".to_string())));
    let notice = state.view().notice.expect("notice");
    assert_eq!(notice.severity, NoticeSeverity::Error);
    assert!(notice.text.contains("disk full"));

    let (state, _) = update(state, Msg::SaveFinished(Ok(PathBuf::from("out.md"))));
    assert_eq!(
        state.view().notice.map(|n| n.severity),
        Some(NoticeSeverity::Info)
    );

    let (state, _) = update(state, Msg::NoticeDismissed);
    assert_eq!(state.view().notice, None);
}

#[test]
fn triage_through_messages() {
    init_logging();
    let state = type_input(AppState::new(), INPUT, Instant::now());
    let (state, effects) = update(state, Msg::TriageCommitted);
    assert!(effects.is_empty());

    let view = state.view().triage;
    assert_eq!(view.phase, TriagePhase::InProgress { index: 0 });
    assert_eq!(view.current.map(|item| item.title), Some("B1".to_string()));

    let (state, effects) = update(
        state,
        Msg::ExportRequested {
            bucket: TriageBucket::Pending,
            format: ExportFormat::Pairs,
        },
    );
    assert_eq!(
        effects,
        vec![Effect::PresentExport {
            bucket: TriageBucket::Pending,
            format: ExportFormat::Pairs,
            text: INPUT.to_string(),
        }]
    );

    let (state, _) = update(state, Msg::TriageDisposed(Disposition::Delete));
    let (state, _) = update(state, Msg::TriageDisposed(Disposition::Keep));
    let view = state.view().triage;
    assert_eq!(view.phase, TriagePhase::Complete);
    assert_eq!(view.markdown, "# Keep\n- [A1](https://a.com/1)\n");
    assert_eq!((view.kept, view.later, view.deleted, view.pending), (1, 0, 1, 0));

    // Save picks the triage result once a session completed.
    let (state, effects) = update(state, Msg::SaveRequested);
    assert_eq!(
        effects,
        vec![Effect::SaveOutput {
            markdown: "# Keep\n- [A1](https://a.com/1)\n".to_string(),
        }]
    );

    let (state, _) = update(state, Msg::TriageReset);
    let view = state.view().triage;
    assert_eq!(view.phase, TriagePhase::NotStarted);
    assert_eq!(view.markdown, "");
    assert_eq!(view.pending, 0);
}

#[test]
fn save_after_deleting_everything_keeps_deleted_links_out() {
    init_logging();
    let state = type_input(AppState::new(), INPUT, Instant::now());
    let (state, _) = update(state, Msg::ConvertRequested);
    assert!(!state.view().output.is_empty());

    let (state, _) = update(state, Msg::TriageCommitted);
    let (state, _) = update(state, Msg::TriageDisposed(Disposition::Delete));
    let (state, _) = update(state, Msg::TriageDisposed(Disposition::Delete));
    assert_eq!(state.view().triage.phase, TriagePhase::Complete);
    assert_eq!(state.view().triage.markdown, "");

    let (state, effects) = update(state, Msg::SaveRequested);
    assert!(effects.is_empty());
    assert_eq!(
        state.view().notice.map(|n| n.severity),
        Some(NoticeSeverity::Warning)
    );

    // After a reset the conversion output is saveable again.
    let (state, _) = update(state, Msg::TriageReset);
    let (_, effects) = update(state, Msg::SaveRequested);
    assert!(matches!(effects.as_slice(), [Effect::SaveOutput { .. }]));
}

#[test]
fn triage_errors_become_notices() {
    init_logging();
    let (state, _) = update(AppState::new(), Msg::TriageDisposed(Disposition::Keep));
    assert_eq!(
        state.view().notice.map(|n| n.severity),
        Some(NoticeSeverity::Warning)
    );

    let state = type_input(state, "nothing usable", Instant::now());
    let (state, _) = update(state, Msg::TriageCommitted);
    assert_eq!(state.view().triage.phase, TriagePhase::NotStarted);
    assert!(state.view().notice.is_some());
}
