#![forbid(unsafe_code)]

//! Test case contract and scenario reporting.

use serde::{Deserialize, Serialize};

/// A conformance test case: a named, ordered list of scenarios.
///
/// `init` must succeed before `run`; a case whose prerequisites are missing
/// (for example a host without the read-back capability) refuses there
/// instead of failing every scenario. `run` never aborts early: each
/// scenario's outcome is recorded and the next one starts from fresh
/// resources.
pub trait TestCase {
    /// Registry name of this case.
    fn name(&self) -> &'static str;

    /// Verify prerequisites. An error means `run` must not be called.
    fn init(&mut self) -> Result<(), String>;

    /// Execute every scenario in order, collecting all outcomes.
    fn run(&mut self) -> CaseReport;
}

/// Outcome of one scenario.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScenarioResult {
    /// Scenario name, unique within its case.
    pub name: String,
    /// `None` on pass; a human-readable diagnostic on failure.
    pub error: Option<String>,
}

impl ScenarioResult {
    /// Record an outcome from a scenario return value.
    pub fn from_outcome(name: &str, outcome: Result<(), String>) -> Self {
        Self {
            name: name.to_string(),
            error: outcome.err(),
        }
    }

    /// True when the scenario passed.
    #[inline]
    pub fn passed(&self) -> bool {
        self.error.is_none()
    }
}

/// All scenario outcomes of one case run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CaseReport {
    /// The case that produced this report.
    pub case: String,
    /// Outcomes in execution order.
    pub scenarios: Vec<ScenarioResult>,
}

impl CaseReport {
    /// Create an empty report for the named case.
    pub fn new(case: &str) -> Self {
        Self {
            case: case.to_string(),
            scenarios: Vec::new(),
        }
    }

    /// True when every scenario passed.
    pub fn passed(&self) -> bool {
        self.scenarios.iter().all(ScenarioResult::passed)
    }

    /// The failing scenarios, in execution order.
    pub fn failures(&self) -> impl Iterator<Item = &ScenarioResult> {
        self.scenarios.iter().filter(|s| !s.passed())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scenario_result_from_outcome() {
        let pass = ScenarioResult::from_outcome("A", Ok(()));
        assert!(pass.passed());
        assert_eq!(pass.error, None);

        let fail = ScenarioResult::from_outcome("B", Err("boom".into()));
        assert!(!fail.passed());
        assert_eq!(fail.error.as_deref(), Some("boom"));
    }

    #[test]
    fn case_report_passed_and_failures() {
        let mut report = CaseReport::new("Case");
        report
            .scenarios
            .push(ScenarioResult::from_outcome("A", Ok(())));
        assert!(report.passed());

        report
            .scenarios
            .push(ScenarioResult::from_outcome("B", Err("nope".into())));
        assert!(!report.passed());
        let failures: Vec<_> = report.failures().map(|s| s.name.as_str()).collect();
        assert_eq!(failures, ["B"]);
    }

    #[test]
    fn case_report_round_trips_through_json() {
        let mut report = CaseReport::new("Case");
        report
            .scenarios
            .push(ScenarioResult::from_outcome("A", Err("x".into())));
        let json = serde_json::to_string(&report).unwrap();
        let back: CaseReport = serde_json::from_str(&json).unwrap();
        assert_eq!(back, report);
    }
}
