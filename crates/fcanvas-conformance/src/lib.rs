#![forbid(unsafe_code)]

//! Conformance suite for the FrankenCanvas surface contract.
//!
//! A test case is an ordered list of scenarios, each an independent
//! assertion about host behavior that reports failure as a descriptive
//! string. The harness selects a case by name from the registry, runs it
//! once per lifetime on the first ready event, and emits a single
//! completion value for out-of-process observers.

pub mod canvas2d;
pub mod case;
pub mod harness;
pub mod registry;

pub use canvas2d::Canvas2DCase;
pub use case::{CaseReport, ScenarioResult, TestCase};
pub use harness::{
    COMPLETION_PASS, CompletionSink, FileCompletionSink, Harness, MemorySink, ReportEvent,
    RunReport,
};
pub use registry::{CaseFactory, Registry};
