//! End-to-end run of the built-in suite against the fake host.
//!
//! This is the executable form of the contract: every scenario of every
//! registered case must pass against `FakeHost`.

use fcanvas_conformance::{COMPLETION_PASS, Harness, MemorySink, Registry, ReportEvent};
use fcanvas_surface::FakeHost;

fn run_case(name: &str) -> (Harness, MemorySink) {
    let host = FakeHost::new().into_handle();
    let mut harness = Harness::new(host, Registry::with_builtin_cases());
    harness.init(&[("testcase".to_string(), name.to_string())]);

    let mut sink = MemorySink::new();
    harness.on_view_ready(&mut sink);
    (harness, sink)
}

#[test]
fn canvas2d_suite_passes_end_to_end() {
    let (harness, sink) = run_case("Canvas2D");
    assert_eq!(
        sink.value(),
        Some(COMPLETION_PASS),
        "failures: {:?}",
        harness.errors()
    );
}

#[test]
fn canvas2d_reports_one_event_per_scenario() {
    let (harness, _sink) = run_case("Canvas2D");
    let scenarios: Vec<&str> = harness
        .report()
        .events
        .iter()
        .map(|event| match event {
            ReportEvent::Scenario { scenario, .. } => scenario.as_str(),
            other => panic!("unexpected report event: {other:?}"),
        })
        .collect();
    assert_eq!(
        scenarios,
        [
            "InvalidResource",
            "InvalidSize",
            "Humongous",
            "InitToZero",
            "Describe",
            "Paint",
            "Scroll",
            "Replace",
            "Flush",
        ]
    );
}

#[test]
fn report_text_lists_passes() {
    let (harness, _sink) = run_case("Canvas2D");
    let text = harness.report().render_text();
    assert!(text.contains("[Canvas2D] InvalidResource: PASS"));
    assert!(text.contains("[Canvas2D] Flush: PASS"));
    assert!(!text.contains("FAIL"));
}

#[test]
fn every_registered_case_passes() {
    // Discovery-driven sweep: whatever is registered must hold against the
    // fake.
    let names = Registry::with_builtin_cases().sorted_names();
    assert!(!names.is_empty());
    for name in names {
        let (harness, sink) = run_case(name);
        assert_eq!(
            sink.value(),
            Some(COMPLETION_PASS),
            "case {name} failed: {:?}",
            harness.errors()
        );
    }
}
