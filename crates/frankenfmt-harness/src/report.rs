//! Report generation for verification results.

use serde::{Deserialize, Serialize};

use crate::verify::VerificationSummary;

/// A verification report over one or more fixture sets.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConformanceReport {
    pub title: String,
    /// Width policies the cases ran under, e.g. `term+bytes`.
    pub width: String,
    /// Timestamp (UTC).
    pub timestamp: String,
    pub summary: VerificationSummary,
}

impl ConformanceReport {
    /// Render the report as markdown. Failed cases get their diff appended.
    #[must_use]
    pub fn to_markdown(&self) -> String {
        let mut out = String::new();
        out.push_str(&format!("# {}\n\n", self.title));
        out.push_str(&format!("- Width: {}\n", self.width));
        out.push_str(&format!("- Timestamp: {}\n", self.timestamp));
        out.push_str(&format!("- Total: {}\n", self.summary.total));
        out.push_str(&format!("- Passed: {}\n", self.summary.passed));
        out.push_str(&format!("- Failed: {}\n\n", self.summary.failed));

        out.push_str("| Family | Case | Operation | Status |\n");
        out.push_str("|--------|------|-----------|--------|\n");
        for r in &self.summary.results {
            let status = if r.passed { "PASS" } else { "FAIL" };
            out.push_str(&format!(
                "| {} | {} | {} | {} |\n",
                r.family,
                r.case_name.replace('|', "\\|"),
                r.operation,
                status
            ));
        }

        let failures: Vec<_> = self.summary.results.iter().filter(|r| !r.passed).collect();
        if !failures.is_empty() {
            out.push_str("\n## Failures\n");
            for r in failures {
                out.push_str(&format!("\n### {} ({})\n\n", r.case_name, r.section));
                out.push_str("```diff\n");
                out.push_str(r.diff.as_deref().unwrap_or(""));
                if !out.ends_with('\n') {
                    out.push('\n');
                }
                out.push_str("```\n");
            }
        }
        out
    }

    /// Render the report as JSON.
    #[must_use]
    pub fn to_json(&self) -> String {
        serde_json::to_string_pretty(self).unwrap_or_else(|e| format!("{{\"error\": \"{e}\"}}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::verify::VerificationResult;

    fn result(name: &str, passed: bool) -> VerificationResult {
        VerificationResult {
            family: String::from("stdio/format"),
            case_name: name.to_string(),
            operation: String::from("format"),
            section: String::from("padding"),
            width: String::from("term"),
            passed,
            expected: String::from("a"),
            actual: String::from(if passed { "a" } else { "b" }),
            diff: (!passed).then(|| String::from("-a\n+b\n")),
            latency_ns: 10,
        }
    }

    #[test]
    fn markdown_lists_cases_and_failure_diffs() {
        let report = ConformanceReport {
            title: String::from("frankenfmt Fixture Report"),
            width: String::from("term+bytes"),
            timestamp: String::from("2026-10-18T00:00:00Z"),
            summary: VerificationSummary::from_results(vec![
                result("ok_case", true),
                result("bad_case", false),
            ]),
        };
        let md = report.to_markdown();
        assert!(md.starts_with("# frankenfmt Fixture Report\n"));
        assert!(md.contains("- Failed: 1\n"));
        assert!(md.contains("| stdio/format | ok_case | format | PASS |"));
        assert!(md.contains("### bad_case (padding)"));
        assert!(md.contains("```diff\n-a\n+b\n```"));

        let json: serde_json::Value = serde_json::from_str(&report.to_json()).unwrap();
        assert_eq!(json["summary"]["passed"], 1);
    }
}
