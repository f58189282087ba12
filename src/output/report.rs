use crate::corpus::RegulationSummary;
use crate::error::OutputError;
use crate::runner::{ExecutionReport, ExecutionStatus};
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};

/// Everything a run decided, as written to `regulations_<ts>.json`
#[derive(Debug, Serialize)]
pub struct RunRecord<'a> {
    pub query: &'a str,
    pub summary_file: &'a str,
    pub summary_sha256: String,
    #[serde(flatten)]
    pub report: &'a ExecutionReport,
}

#[derive(Debug, Clone)]
pub struct RunArtifacts {
    pub json_path: PathBuf,
    pub markdown_path: PathBuf,
}

/// Write the JSON record and the Markdown overview of a run
pub fn write_run_artifacts(
    results_dir: &Path,
    timestamp: &str,
    query: &str,
    summary: &RegulationSummary,
    report: &ExecutionReport,
) -> Result<RunArtifacts, OutputError> {
    fs::create_dir_all(results_dir).map_err(OutputError::CreateDir)?;

    let record = RunRecord {
        query,
        summary_file: &summary.file_name,
        summary_sha256: summary.digest(),
        report,
    };
    let json_path = results_dir.join(format!("regulations_{}.json", timestamp));
    let json = serde_json::to_string_pretty(&record)?;
    fs::write(&json_path, json).map_err(OutputError::WriteReport)?;

    let markdown_path = results_dir.join(format!("summary_{}.md", timestamp));
    fs::write(&markdown_path, build_markdown(query, report)).map_err(OutputError::WriteReport)?;

    Ok(RunArtifacts {
        json_path,
        markdown_path,
    })
}

fn build_markdown(query: &str, report: &ExecutionReport) -> String {
    let mut content = String::new();

    content.push_str("# Regulation Review\n\n");
    content.push_str(&format!("> {}\n\n", query.trim()));

    content.push_str("| Metric | Value |\n");
    content.push_str("|--------|-------|\n");
    content.push_str(&format!("| Run | `{}` |\n", report.run_id));
    content.push_str(&format!("| Status | {} |\n", format_status(report.status)));
    content.push_str(&format!("| Duration | {:.1}s |\n", report.elapsed_secs));
    content.push_str(&format!("| Reviewed | {} |\n", report.regulations.len()));
    content.push_str(&format!("| Updated | {} |\n", report.updated_count()));
    content.push_str(&format!("| Failed | {} |\n", report.failed.len()));
    content.push_str(&format!("| Dropped | {} |\n", report.dropped.len()));
    content.push_str(&format!("| Remaining | {} |\n", report.remaining.len()));
    if !report.discarded.is_empty() {
        content.push_str(&format!("| Discarded | {} |\n", report.discarded.len()));
    }
    content.push_str("\n---\n\n");

    if report.regulations.is_empty() {
        content.push_str("*No regulations reviewed*\n");
    } else {
        content.push_str("## Reviewed Regulations\n\n");
        for regulation in &report.regulations {
            let marker = if regulation.is_updated {
                "Updated"
            } else {
                "Unchanged"
            };
            content.push_str(&format!("### [{}] {}\n\n", marker, regulation.file_name));
            content.push_str(&format!("- **Hypothesis:** {}\n", regulation.hypothesis));
            content.push_str(&format!("- **Reason:** {}\n\n", regulation.reason));

            if regulation.is_updated {
                content.push_str("**Before:**\n");
                content.push_str(&format!("```\n{}\n```\n\n", regulation.original_text));
                content.push_str("**After:**\n");
                content.push_str(&format!("```\n{}\n```\n\n", regulation.updated_text));
            }

            content.push_str("---\n\n");
        }
    }

    if !report.failed.is_empty() {
        content.push_str("## Failed\n\n");
        for failed in &report.failed {
            content.push_str(&format!("- `{}`: {}\n", failed.task.file_name, failed.error));
        }
        content.push('\n');
    }

    if !report.dropped.is_empty() {
        content.push_str("## Dropped\n\n");
        for dropped in &report.dropped {
            content.push_str(&format!(
                "- `{}`: {}\n",
                dropped.task.file_name, dropped.reason
            ));
        }
        content.push('\n');
    }

    if !report.remaining.is_empty() {
        content.push_str("## Not Reviewed\n\n");
        for task in &report.remaining {
            content.push_str(&format!("- `{}`: {}\n", task.file_name, task.check_reason));
        }
        content.push('\n');
    }

    content
}

fn format_status(status: ExecutionStatus) -> &'static str {
    match status {
        ExecutionStatus::Drained => "✅ Completed",
        ExecutionStatus::TimedOut => "⏱️ Timed Out",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::planner::Task;
    use crate::runner::{FailedTask, Regulation};
    use uuid::Uuid;

    fn report() -> ExecutionReport {
        ExecutionReport {
            run_id: Uuid::nil(),
            status: ExecutionStatus::TimedOut,
            regulations: vec![
                Regulation {
                    file_name: "flextime_03.txt".to_string(),
                    original_text: "core time 11:00-15:00".to_string(),
                    updated_text: "core time 8:30-16:30".to_string(),
                    is_updated: true,
                    hypothesis: "defines core time".to_string(),
                    reason: "request moves core time".to_string(),
                },
                Regulation {
                    file_name: "22_telework.txt".to_string(),
                    original_text: String::new(),
                    updated_text: String::new(),
                    is_updated: false,
                    hypothesis: "may mention hours".to_string(),
                    reason: "no hours defined".to_string(),
                },
            ],
            completed: vec![
                Task::new("flextime_03.txt", "r"),
                Task::new("22_telework.txt", "r"),
            ],
            failed: vec![FailedTask {
                task: Task::new("missing.txt", "r"),
                error: "not found".to_string(),
            }],
            dropped: vec![],
            remaining: vec![Task::new("01_work_rules.txt", "article 26")],
            discarded: vec![],
            elapsed_secs: 12.5,
        }
    }

    #[test]
    fn test_write_run_artifacts() {
        let dir = tempfile::tempdir().unwrap();
        let results = dir.path().join("results").join("internal_regulations");
        let summary = RegulationSummary {
            file_name: "internal_regulation_summary.txt".to_string(),
            content: "data\n".to_string(),
        };

        let artifacts =
            write_run_artifacts(&results, "20261014_120000", "Move core time", &summary, &report())
                .unwrap();

        assert!(artifacts.json_path.ends_with("regulations_20261014_120000.json"));
        let json: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(&artifacts.json_path).unwrap()).unwrap();
        assert_eq!(json["query"], "Move core time");
        assert_eq!(json["summary_sha256"], summary.digest());
        assert_eq!(json["status"], "timed_out");
        assert_eq!(json["regulations"].as_array().unwrap().len(), 2);
        assert_eq!(json["remaining"][0]["file_name"], "01_work_rules.txt");

        let markdown = fs::read_to_string(&artifacts.markdown_path).unwrap();
        assert!(markdown.contains("| Updated | 1 |"));
        assert!(markdown.contains("### [Updated] flextime_03.txt"));
        assert!(markdown.contains("### [Unchanged] 22_telework.txt"));
        assert!(markdown.contains("core time 8:30-16:30"));
        assert!(markdown.contains("- `missing.txt`: not found"));
        assert!(markdown.contains("## Not Reviewed"));
    }

    #[test]
    fn test_markdown_without_regulations() {
        let mut empty = report();
        empty.regulations.clear();
        empty.status = ExecutionStatus::Drained;

        let markdown = build_markdown("q", &empty);
        assert!(markdown.contains("*No regulations reviewed*"));
        assert!(markdown.contains("✅ Completed"));
        assert!(!markdown.contains("Discarded"));
    }
}
