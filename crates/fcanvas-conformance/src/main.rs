#![forbid(unsafe_code)]

//! Conformance runner.
//!
//! Drives the harness against the in-memory fake host, the same way a real
//! host would: select a case, signal readiness once, render the report.
//!
//! # Usage
//!
//! ```sh
//! cargo run -p fcanvas-conformance            # list available cases
//! cargo run -p fcanvas-conformance Canvas2D   # run one case
//! ```
//!
//! # Environment
//!
//! - `FCANVAS_TESTCASE`: case name, used when no argument is given
//! - `FCANVAS_COMPLETION_FILE`: persist `completion=<value>` to this path
//! - `FCANVAS_REPORT_JSON`: write the structured report to this path
//! - `RUST_LOG`: tracing filter (e.g. `fcanvas_surface=trace`)

use std::fs;
use std::path::PathBuf;
use std::process::ExitCode;

use tracing::error;
use tracing_subscriber::EnvFilter;

use fcanvas_conformance::{
    COMPLETION_PASS, CompletionSink, FileCompletionSink, Harness, MemorySink, Registry,
    harness::TESTCASE_ARG,
};
use fcanvas_surface::FakeHost;

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let case = std::env::args()
        .nth(1)
        .or_else(|| std::env::var("FCANVAS_TESTCASE").ok());
    let completion_file = std::env::var("FCANVAS_COMPLETION_FILE").ok().map(PathBuf::from);
    let report_json = std::env::var("FCANVAS_REPORT_JSON").ok().map(PathBuf::from);

    let host = FakeHost::new().into_handle();
    let mut harness = Harness::new(host, Registry::with_builtin_cases());

    let args = match case {
        Some(name) => vec![(TESTCASE_ARG.to_string(), name)],
        None => Vec::new(),
    };
    harness.init(&args);

    let mut sink: Box<dyn CompletionSink> = match completion_file {
        Some(path) => Box::new(FileCompletionSink::new(path)),
        None => Box::new(MemorySink::new()),
    };
    harness.on_view_ready(sink.as_mut());

    print!("{}", harness.report().render_text());

    if let Some(path) = report_json {
        match serde_json::to_string_pretty(harness.report()) {
            Ok(json) => {
                if let Err(err) = fs::write(&path, json) {
                    error!(path = %path.display(), error = %err, "could not write report");
                }
            }
            Err(err) => error!(error = %err, "could not serialize report"),
        }
    }

    let value = harness.completion_value();
    println!("completion={value}");
    if value == COMPLETION_PASS {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}
