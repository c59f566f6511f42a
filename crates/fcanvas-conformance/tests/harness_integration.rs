//! Integration tests for harness lifecycle and completion signaling.

use fcanvas_conformance::{
    COMPLETION_PASS, FileCompletionSink, Harness, MemorySink, Registry, ReportEvent,
};
use fcanvas_surface::FakeHost;

fn new_harness() -> Harness {
    Harness::new(FakeHost::new().into_handle(), Registry::with_builtin_cases())
}

#[test]
fn listing_mode_names_every_case_sorted() {
    let mut harness = new_harness();
    harness.init(&[]);

    let mut sink = MemorySink::new();
    harness.on_view_ready(&mut sink);

    assert_eq!(sink.value(), Some(COMPLETION_PASS));
    match harness.report().events.as_slice() {
        [ReportEvent::AvailableCases { names }] => {
            let mut sorted = names.clone();
            sorted.sort();
            assert_eq!(*names, sorted);
            assert!(names.contains(&"Canvas2D".to_string()));
        }
        other => panic!("expected a listing event, got {other:?}"),
    }
}

#[test]
fn unknown_case_completes_with_the_error() {
    let mut harness = new_harness();
    harness.init(&[("testcase".to_string(), "NoSuchCase".to_string())]);

    let mut sink = MemorySink::new();
    harness.on_view_ready(&mut sink);

    assert_eq!(sink.value(), Some("unknown test case NoSuchCase"));
    let text = harness.report().render_text();
    assert!(text.contains("ERROR:"));
}

#[test]
fn completion_fires_exactly_once_across_ready_events() {
    let mut harness = new_harness();
    harness.init(&[("testcase".to_string(), "Canvas2D".to_string())]);

    let mut sink = MemorySink::new();
    harness.on_view_ready(&mut sink);
    harness.on_view_ready(&mut sink);
    assert_eq!(sink.count(), 1);
}

#[test]
fn file_sink_persists_the_completion_value() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("completion.txt");

    let mut harness = new_harness();
    harness.init(&[("testcase".to_string(), "Canvas2D".to_string())]);

    let mut sink = FileCompletionSink::new(path.clone());
    harness.on_view_ready(&mut sink);

    let written = std::fs::read_to_string(&path).expect("completion file");
    assert_eq!(written, format!("completion={COMPLETION_PASS}\n"));
}

#[test]
fn json_report_round_trips() {
    let mut harness = new_harness();
    harness.init(&[("testcase".to_string(), "Canvas2D".to_string())]);

    let mut sink = MemorySink::new();
    harness.on_view_ready(&mut sink);

    let json = serde_json::to_string(harness.report()).expect("serialize");
    let back: fcanvas_conformance::RunReport = serde_json::from_str(&json).expect("deserialize");
    assert_eq!(&back, harness.report());
}
