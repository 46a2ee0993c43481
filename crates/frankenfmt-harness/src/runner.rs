//! Test execution engine.

use std::io::Write;
use std::time::Instant;

use crate::config::WidthPolicy;
use crate::diff::render_diff;
use crate::exec::execute_case;
use crate::fixtures::{FixtureCase, FixtureSet};
use crate::structured_log::{LogEmitter, LogEntry, LogLevel, Outcome, StreamKind};
use crate::verify::VerificationResult;

/// Runs fixture sets under one width policy.
pub struct TestRunner {
    /// Name of the campaign, used in log events.
    pub campaign: String,
    pub width: WidthPolicy,
}

impl TestRunner {
    #[must_use]
    pub fn new(campaign: impl Into<String>, width: WidthPolicy) -> Self {
        Self {
            campaign: campaign.into(),
            width,
        }
    }

    /// Run every case of `fixture_set` that applies to this runner's width
    /// policy.
    pub fn run(&self, fixture_set: &FixtureSet) -> Vec<VerificationResult> {
        fixture_set
            .cases
            .iter()
            .filter(|case| width_matches(self.width, &case.width))
            .map(|case| self.run_case(&fixture_set.family, case))
            .collect()
    }

    /// Like [`TestRunner::run`], emitting one log entry per case.
    pub fn run_logged<W: Write>(
        &self,
        fixture_set: &FixtureSet,
        log: &mut LogEmitter<W>,
    ) -> std::io::Result<Vec<VerificationResult>> {
        let results = self.run(fixture_set);
        for r in &results {
            let (level, outcome) = if r.passed {
                (LogLevel::Info, Outcome::Pass)
            } else if r.actual.starts_with("unsupported:") {
                (LogLevel::Error, Outcome::Error)
            } else {
                (LogLevel::Warn, Outcome::Fail)
            };
            let mut entry = LogEntry::new("", level, format!("{}.case", self.campaign))
                .with_stream(StreamKind::Fixture)
                .with_width(self.width.as_str())
                .with_case(&r.family, &r.operation, &r.case_name)
                .with_outcome(outcome)
                .with_latency_ns(r.latency_ns);
            if let Some(diff) = r.diff.as_ref().filter(|_| !r.passed) {
                entry = entry.with_details(serde_json::json!({
                    "expected": r.expected,
                    "actual": r.actual,
                    "diff": diff,
                }));
            }
            log.emit_entry(entry)?;
        }
        Ok(results)
    }

    fn run_case(&self, family: &str, case: &FixtureCase) -> VerificationResult {
        let started = Instant::now();
        let actual = match execute_case(case, self.width) {
            Ok(output) => output,
            Err(err) => format!("unsupported:{err}"),
        };
        let latency_ns = u64::try_from(started.elapsed().as_nanos()).unwrap_or(u64::MAX);

        let case_name = if case.width.eq_ignore_ascii_case("both") {
            format!("{} [{}]", case.name, self.width.as_str())
        } else {
            case.name.clone()
        };
        let passed = actual == case.expected_output;
        VerificationResult {
            family: family.to_string(),
            case_name,
            operation: case.operation.clone(),
            section: case.section.clone(),
            width: self.width.as_str().to_string(),
            passed,
            diff: (!passed).then(|| render_diff(&case.expected_output, &actual)),
            expected: case.expected_output.clone(),
            actual,
            latency_ns,
        }
    }
}

fn width_matches(active: WidthPolicy, case_width: &str) -> bool {
    let case = case_width.to_ascii_lowercase();
    case == "both" || case == active.as_str()
}
