//! CLI entrypoint for the frankenfmt harness.

use std::io::Write;
use std::path::PathBuf;
use std::time::Instant;

use clap::{Parser, Subcommand};
use frankenfmt_core::format_to;
use frankenfmt_core::unicode::{utf8_term_width, validate};
use frankenfmt_harness::structured_log::{
    ArtifactIndex, LogEmitter, LogEntry, LogLevel, StreamKind, validate_log_file,
};
use frankenfmt_harness::{
    ConformanceReport, FixtureArg, FixtureSet, HarnessConfig, TestRunner, VerificationSummary,
    WidthPolicy,
};

/// Fixture and diagnostics tooling for frankenfmt.
#[derive(Debug, Parser)]
#[command(name = "frankenfmt-harness")]
#[command(about = "Fixture verification harness for frankenfmt")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Verify the core against fixture files.
    Verify {
        /// Directory containing fixture JSON files.
        #[arg(long)]
        fixture: PathBuf,
        /// Output report path (markdown). A JSON twin is written next to it.
        #[arg(long)]
        report: Option<PathBuf>,
        /// Fixed timestamp for reproducible reports.
        #[arg(long)]
        timestamp: Option<String>,
        /// Width policy to run (`term`, `bytes`). Runs both when omitted.
        #[arg(long)]
        width: Option<String>,
        /// JSONL log path (overrides FRANKENFMT_LOG).
        #[arg(long)]
        log: Option<PathBuf>,
    },
    /// Format a template with typed arguments and print the result.
    Render {
        /// Template text, e.g. 'id=$05d name=$<8s'.
        template: String,
        /// Arguments as <kind>:<value>, e.g. u32:7 str:bob char:x.
        args: Vec<String>,
        /// Width policy (overrides FRANKENFMT_WIDTH).
        #[arg(long)]
        width: Option<String>,
    },
    /// Report whether a file is valid UTF-8 and its display width.
    ValidateUtf8 {
        path: PathBuf,
    },
    /// Validate a structured JSONL log.
    ValidateLog {
        /// Log file path.
        #[arg(long)]
        log: PathBuf,
    },
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let env = HarnessConfig::from_env();

    match cli.command {
        Command::Verify {
            fixture,
            report,
            timestamp,
            width,
            log,
        } => {
            let config = env.with_overrides(None, log);
            eprintln!("Verifying against fixtures in {}", fixture.display());
            let (fixture_sets, skipped) = FixtureSet::load_dir(&fixture)?;
            for err in &skipped {
                eprintln!("Skipping {err}");
            }

            let policies = match width.as_deref() {
                Some(w) => vec![WidthPolicy::from_str_loose(w)],
                None => vec![WidthPolicy::Term, WidthPolicy::Bytes],
            };
            let started = Instant::now();
            let run_id = format!("verify-{}", std::process::id());
            let mut emitter = match &config.log_path {
                Some(path) => Some(LogEmitter::to_file(path, "frankenfmt", &run_id)?),
                None => None,
            };

            let mut results = Vec::new();
            for policy in &policies {
                let runner = TestRunner::new("fixture-verify", *policy);
                for set in &fixture_sets {
                    match emitter.as_mut() {
                        Some(log) => results.extend(runner.run_logged(set, log)?),
                        None => results.extend(runner.run(set)),
                    }
                }
            }
            results.sort_by(|a, b| {
                a.family
                    .cmp(&b.family)
                    .then_with(|| a.width.cmp(&b.width))
                    .then_with(|| a.case_name.cmp(&b.case_name))
            });

            let summary = VerificationSummary::from_results(results);
            let width_label: Vec<_> = policies.iter().map(|p| p.as_str()).collect();
            let report_doc = ConformanceReport {
                title: String::from("frankenfmt Fixture Report"),
                width: width_label.join("+"),
                timestamp: timestamp.unwrap_or_else(frankenfmt_harness::structured_log::now_utc),
                summary,
            };

            eprintln!(
                "Verification complete: total={}, passed={}, failed={}",
                report_doc.summary.total, report_doc.summary.passed, report_doc.summary.failed
            );

            let mut artifacts = Vec::new();
            if let Some(report_path) = report {
                eprintln!("Writing report to {}", report_path.display());
                let markdown = report_doc.to_markdown();
                let json = report_doc.to_json();
                std::fs::write(&report_path, &markdown)?;
                let json_path = report_path.with_extension("json");
                std::fs::write(&json_path, &json)?;

                let mut index = ArtifactIndex::new(&run_id);
                index
                    .add_bytes(report_path.display().to_string(), "report_md", markdown.as_bytes())
                    .add_bytes(json_path.display().to_string(), "report_json", json.as_bytes());
                let index_path = report_path.with_extension("artifacts.json");
                std::fs::write(&index_path, index.to_json()?)?;
                artifacts = vec![
                    report_path.display().to_string(),
                    json_path.display().to_string(),
                    index_path.display().to_string(),
                ];
            }

            if let Some(log) = emitter.as_mut() {
                let level = if report_doc.summary.all_passed() {
                    LogLevel::Info
                } else {
                    LogLevel::Error
                };
                let mut entry = LogEntry::new("", level, "fixture-verify.summary")
                    .with_stream(StreamKind::Fixture)
                    .with_duration_ms(u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX))
                    .with_details(serde_json::json!({
                        "total": report_doc.summary.total,
                        "passed": report_doc.summary.passed,
                        "failed": report_doc.summary.failed,
                        "skipped_files": skipped.len(),
                    }));
                if !artifacts.is_empty() {
                    entry = entry.with_artifacts(artifacts);
                }
                log.emit_entry(entry)?;
                log.flush()?;
            }

            if !report_doc.summary.all_passed() {
                return Err("Fixture verification failed".into());
            }
        }
        Command::Render {
            template,
            args,
            width,
        } => {
            let config = env.with_overrides(width.as_deref().map(WidthPolicy::from_str_loose), None);
            let fixture_args = args
                .iter()
                .map(|spec| FixtureArg::from_cli(spec))
                .collect::<Result<Vec<_>, _>>()?;
            let args: Vec<_> = fixture_args.iter().map(FixtureArg::as_arg).collect();

            let mut out = Vec::new();
            let mut measure = config.width;
            format_to(&mut out, &mut measure, template.as_bytes(), &args)?;
            out.pop();
            let mut stdout = std::io::stdout().lock();
            stdout.write_all(&out)?;
            stdout.write_all(b"\n")?;
        }
        Command::ValidateUtf8 { path } => {
            let data = std::fs::read(&path)?;
            match validate(&data) {
                Ok(()) => {
                    let columns = utf8_term_width(&data)
                        .map(|c| c.to_string())
                        .unwrap_or_else(|_| String::from("n/a (control characters)"));
                    println!("{}: valid, {} bytes, {} columns", path.display(), data.len(), columns);
                }
                Err(err) => {
                    return Err(format!("{}: {err}", path.display()).into());
                }
            }
        }
        Command::ValidateLog { log } => {
            let (line_count, errors) = validate_log_file(&log)?;
            if errors.is_empty() {
                println!("{}: {line_count} lines, all valid", log.display());
            } else {
                for err in &errors {
                    eprintln!("{err}");
                }
                return Err(format!(
                    "{}: {} errors in {line_count} lines",
                    log.display(),
                    errors.len()
                )
                .into());
            }
        }
    }

    Ok(())
}
