#![forbid(unsafe_code)]

//! Lifecycle-driven runner.
//!
//! The harness mirrors a plugin instance's life: the host constructs it,
//! feeds it `(name, value)` arguments, and later signals view readiness.
//! The first ready event triggers exactly one of: running the selected
//! case, listing the available cases, or reporting a selection error.
//! Repeated ready events are no-ops, and exactly one completion value is
//! emitted per harness lifetime for an out-of-process watcher.

use std::fmt::Write as _;
use std::fs;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use fcanvas_surface::HostHandle;

use crate::case::TestCase;
use crate::registry::Registry;

/// Argument key selecting the case to run.
pub const TESTCASE_ARG: &str = "testcase";

/// Completion value emitted when no error was recorded.
pub const COMPLETION_PASS: &str = "PASS";

/// One entry of the rendered run report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ReportEvent {
    /// A scenario finished.
    Scenario {
        case: String,
        scenario: String,
        /// `None` on pass.
        error: Option<String>,
    },
    /// No case was selected; these were available.
    AvailableCases { names: Vec<String> },
    /// Selection or initialization failed before anything could run.
    HarnessError { message: String },
}

/// Everything the harness produced during its single execution.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunReport {
    pub events: Vec<ReportEvent>,
}

impl RunReport {
    /// Render the report as human-readable lines, one per event.
    pub fn render_text(&self) -> String {
        let mut out = String::new();
        for event in &self.events {
            match event {
                ReportEvent::Scenario {
                    case,
                    scenario,
                    error,
                } => match error {
                    None => {
                        let _ = writeln!(out, "[{case}] {scenario}: PASS");
                    }
                    Some(message) => {
                        let _ = writeln!(out, "[{case}] {scenario}: FAIL: {message}");
                    }
                },
                ReportEvent::AvailableCases { names } => {
                    let _ = writeln!(out, "Available test cases:");
                    for name in names {
                        let _ = writeln!(out, "  {name}");
                    }
                }
                ReportEvent::HarnessError { message } => {
                    let _ = writeln!(out, "ERROR: {message}");
                }
            }
        }
        out
    }
}

/// Receiver of the single completion value.
pub trait CompletionSink {
    /// Deliver the terminal signal. Called at most once per harness.
    fn complete(&mut self, value: &str);
}

/// In-memory sink for tests and the default runner path.
#[derive(Debug, Default)]
pub struct MemorySink {
    completions: Vec<String>,
}

impl MemorySink {
    /// An empty sink.
    pub fn new() -> Self {
        Self::default()
    }

    /// The completion value, if one was delivered.
    pub fn value(&self) -> Option<&str> {
        self.completions.first().map(String::as_str)
    }

    /// How many times `complete` was called.
    pub fn count(&self) -> usize {
        self.completions.len()
    }
}

impl CompletionSink for MemorySink {
    fn complete(&mut self, value: &str) {
        self.completions.push(value.to_string());
    }
}

/// File-backed sink: writes `completion=<value>` for an external watcher.
#[derive(Debug)]
pub struct FileCompletionSink {
    path: PathBuf,
}

impl FileCompletionSink {
    /// Sink writing to `path`.
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }
}

impl CompletionSink for FileCompletionSink {
    fn complete(&mut self, value: &str) {
        if let Err(err) = fs::write(&self.path, format!("completion={value}\n")) {
            warn!(path = %self.path.display(), error = %err, "could not persist completion value");
        }
    }
}

/// The harness state machine.
pub struct Harness {
    registry: Registry,
    host: HostHandle,
    case: Option<Box<dyn TestCase>>,
    errors: Vec<String>,
    executed: bool,
    report: RunReport,
}

impl Harness {
    /// A fresh harness over `host` with the given case table.
    pub fn new(host: HostHandle, registry: Registry) -> Self {
        Self {
            registry,
            host,
            case: None,
            errors: Vec::new(),
            executed: false,
            report: RunReport::default(),
        }
    }

    /// Process host-provided arguments and select a case.
    ///
    /// Scans for the first `testcase` key. An empty value (or no key at
    /// all) leaves the harness in listing mode. An unknown name or a case
    /// whose `init` fails records an error; the ready event then reports it
    /// instead of running anything.
    pub fn init(&mut self, args: &[(String, String)]) {
        for (name, value) in args {
            if name == TESTCASE_ARG {
                if value.is_empty() {
                    break;
                }
                match self.registry.create(value, &self.host) {
                    None => self.append_error(format!("unknown test case {value}")),
                    Some(mut case) => match case.init() {
                        Ok(()) => {
                            info!(case = %value, "selected test case");
                            self.case = Some(case);
                        }
                        Err(err) => {
                            self.append_error(format!("test case {value} failed to initialize: {err}"));
                        }
                    },
                }
                return;
            }
        }
        // No selection: the first ready event lists the available cases.
    }

    /// Handle a view-ready lifecycle event.
    ///
    /// Only the first call does anything: it produces the report and emits
    /// the completion value through `sink`.
    pub fn on_view_ready(&mut self, sink: &mut dyn CompletionSink) {
        if self.executed {
            return;
        }
        self.executed = true;
        self.report = RunReport::default();

        if !self.errors.is_empty() {
            self.report.events.push(ReportEvent::HarnessError {
                message: format!("harness initialization failed: {}", self.errors.join(", ")),
            });
        } else if let Some(case) = self.case.as_mut() {
            let case_report = case.run();
            for scenario in &case_report.scenarios {
                self.report.events.push(ReportEvent::Scenario {
                    case: case_report.case.clone(),
                    scenario: scenario.name.clone(),
                    error: scenario.error.clone(),
                });
                if let Some(message) = &scenario.error {
                    self.errors.push(format!(
                        "{}.{} FAIL: {}",
                        case_report.case, scenario.name, message
                    ));
                }
            }
        } else {
            self.report.events.push(ReportEvent::AvailableCases {
                names: self
                    .registry
                    .sorted_names()
                    .into_iter()
                    .map(str::to_string)
                    .collect(),
            });
        }

        let value = self.completion_value();
        info!(completion = %value, "run complete");
        sink.complete(&value);
    }

    /// The terminal signal value: `PASS` or the joined error list.
    pub fn completion_value(&self) -> String {
        if self.errors.is_empty() {
            COMPLETION_PASS.to_string()
        } else {
            self.errors.join(", ")
        }
    }

    /// The report produced by the ready event.
    pub fn report(&self) -> &RunReport {
        &self.report
    }

    /// Recorded errors, in order.
    pub fn errors(&self) -> &[String] {
        &self.errors
    }

    fn append_error(&mut self, message: String) {
        warn!(message = %message, "harness error");
        self.errors.push(message);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::case::CaseReport;
    use crate::case::ScenarioResult;
    use fcanvas_surface::FakeHost;

    fn args(value: &str) -> Vec<(String, String)> {
        vec![(TESTCASE_ARG.to_string(), value.to_string())]
    }

    struct FailingInit;

    impl TestCase for FailingInit {
        fn name(&self) -> &'static str {
            "FailingInit"
        }
        fn init(&mut self) -> Result<(), String> {
            Err("missing capability".into())
        }
        fn run(&mut self) -> CaseReport {
            panic!("run must not be called after a failed init");
        }
    }

    struct OneFailure;

    impl TestCase for OneFailure {
        fn name(&self) -> &'static str {
            "OneFailure"
        }
        fn init(&mut self) -> Result<(), String> {
            Ok(())
        }
        fn run(&mut self) -> CaseReport {
            let mut report = CaseReport::new("OneFailure");
            report
                .scenarios
                .push(ScenarioResult::from_outcome("Good", Ok(())));
            report
                .scenarios
                .push(ScenarioResult::from_outcome("Bad", Err("broke".into())));
            report
        }
    }

    fn registry_with_doubles() -> Registry {
        let mut registry = Registry::new();
        registry.register("FailingInit", |_| Box::new(FailingInit));
        registry.register("OneFailure", |_| Box::new(OneFailure));
        registry
    }

    #[test]
    fn unknown_case_reports_error_completion() {
        let host = FakeHost::new().into_handle();
        let mut harness = Harness::new(host, registry_with_doubles());
        harness.init(&args("Bogus"));

        let mut sink = MemorySink::new();
        harness.on_view_ready(&mut sink);
        assert_eq!(sink.value(), Some("unknown test case Bogus"));
        assert!(matches!(
            harness.report().events.as_slice(),
            [ReportEvent::HarnessError { .. }]
        ));
    }

    #[test]
    fn empty_testcase_value_lists_cases() {
        let host = FakeHost::new().into_handle();
        let mut harness = Harness::new(host, registry_with_doubles());
        harness.init(&args(""));

        let mut sink = MemorySink::new();
        harness.on_view_ready(&mut sink);
        assert_eq!(sink.value(), Some(COMPLETION_PASS));
        assert_eq!(
            harness.report().events,
            [ReportEvent::AvailableCases {
                names: vec!["FailingInit".to_string(), "OneFailure".to_string()],
            }]
        );
    }

    #[test]
    fn no_arguments_lists_cases() {
        let host = FakeHost::new().into_handle();
        let mut harness = Harness::new(host, registry_with_doubles());
        harness.init(&[]);

        let mut sink = MemorySink::new();
        harness.on_view_ready(&mut sink);
        assert_eq!(sink.value(), Some(COMPLETION_PASS));
    }

    #[test]
    fn init_failure_skips_run() {
        let host = FakeHost::new().into_handle();
        let mut harness = Harness::new(host, registry_with_doubles());
        harness.init(&args("FailingInit"));

        let mut sink = MemorySink::new();
        harness.on_view_ready(&mut sink);
        let value = sink.value().unwrap();
        assert!(value.contains("FailingInit"));
        assert!(value.contains("missing capability"));
    }

    #[test]
    fn scenario_failures_join_into_completion() {
        let host = FakeHost::new().into_handle();
        let mut harness = Harness::new(host, registry_with_doubles());
        harness.init(&args("OneFailure"));

        let mut sink = MemorySink::new();
        harness.on_view_ready(&mut sink);
        assert_eq!(sink.value(), Some("OneFailure.Bad FAIL: broke"));

        let text = harness.report().render_text();
        assert!(text.contains("[OneFailure] Good: PASS"));
        assert!(text.contains("[OneFailure] Bad: FAIL: broke"));
    }

    #[test]
    fn ready_event_is_idempotent() {
        let host = FakeHost::new().into_handle();
        let mut harness = Harness::new(host, registry_with_doubles());
        harness.init(&args("OneFailure"));

        let mut sink = MemorySink::new();
        harness.on_view_ready(&mut sink);
        harness.on_view_ready(&mut sink);
        harness.on_view_ready(&mut sink);
        assert_eq!(sink.count(), 1);
        // Errors are not re-appended either.
        assert_eq!(harness.errors().len(), 1);
    }

    #[test]
    fn extra_arguments_before_testcase_are_ignored() {
        let host = FakeHost::new().into_handle();
        let mut harness = Harness::new(host, registry_with_doubles());
        harness.init(&[
            ("unrelated".to_string(), "value".to_string()),
            (TESTCASE_ARG.to_string(), "OneFailure".to_string()),
        ]);

        let mut sink = MemorySink::new();
        harness.on_view_ready(&mut sink);
        assert_eq!(sink.value(), Some("OneFailure.Bad FAIL: broke"));
    }

    #[test]
    fn report_serializes_to_json() {
        let report = RunReport {
            events: vec![ReportEvent::Scenario {
                case: "C".into(),
                scenario: "S".into(),
                error: None,
            }],
        };
        let json = serde_json::to_string(&report).unwrap();
        let back: RunReport = serde_json::from_str(&json).unwrap();
        assert_eq!(back, report);
    }
}
