//! Bilingual HTML report authored by the decision service
//!
//! The Japanese report is drafted first, then optionally regenerated after a
//! self-check against its constraints, then translated to English. Each step
//! carries the prior exchange as history.

use crate::config::RetryConfig;
use crate::error::{OutputError, ProviderError};
use crate::prompt::render;
use crate::provider::{ChatMessage, ProviderOutput, Runner};
use crate::runner::{retry_transient, Regulation};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

const REPORT_PROMPT: &str = include_str!("../../prompts/report.md");
const REFLECT_PROMPT: &str = include_str!("../../prompts/reflect.md");

const REPORT_MESSAGE: &str = "Please create the report.";
const TRANSLATE_MESSAGE: &str =
    "Translate the report into English. Output only the HTML document.";

#[derive(Debug, Clone)]
pub struct CompiledReport {
    pub japanese_path: PathBuf,
    pub english_path: PathBuf,
}

pub struct ReportCompiler<'a> {
    pub runner: &'a dyn Runner,
    pub retry: &'a RetryConfig,
    pub reflection: bool,
}

impl ReportCompiler<'_> {
    async fn step(
        &self,
        step: &'static str,
        system: &str,
        message: &str,
        history: &[ChatMessage],
    ) -> Result<ProviderOutput, OutputError> {
        info!("Report: {}", step);
        let output = retry_transient(self.retry, || self.runner.submit(system, message, history))
            .await
            .map_err(|source| OutputError::Generate { step, source })?;
        if output.content.trim().is_empty() {
            return Err(OutputError::Generate {
                step,
                source: ProviderError::EmptyResponse,
            });
        }
        debug!("Report {} response:\n{}", step, output.content);
        Ok(output)
    }

    /// Render both reports and write them to `results_dir`
    pub async fn compile(
        &self,
        results_dir: &Path,
        timestamp: &str,
        query: &str,
        regulations: &[Regulation],
    ) -> Result<CompiledReport, OutputError> {
        let result = serde_json::to_string_pretty(regulations)?;
        let system = render(REPORT_PROMPT, &[("QUERY", query), ("RESULT", result.as_str())]);

        let mut japanese = self.step("draft", &system, REPORT_MESSAGE, &[]).await?;
        if self.reflection {
            japanese = self
                .step("reflection", &system, REFLECT_PROMPT, &japanese.history)
                .await?;
        }
        let english = self
            .step("translation", &system, TRANSLATE_MESSAGE, &japanese.history)
            .await?;

        fs::create_dir_all(results_dir).map_err(OutputError::CreateDir)?;
        let japanese_path = results_dir.join(format!("report_japanese_{}.html", timestamp));
        fs::write(&japanese_path, strip_html_fence(&japanese.content))
            .map_err(OutputError::WriteReport)?;
        let english_path = results_dir.join(format!("report_english_{}.html", timestamp));
        fs::write(&english_path, strip_html_fence(&english.content))
            .map_err(OutputError::WriteReport)?;

        info!("Reports written to {:?} and {:?}", japanese_path, english_path);
        Ok(CompiledReport {
            japanese_path,
            english_path,
        })
    }
}

/// Drop a surrounding ```html fence if the service added one anyway
pub fn strip_html_fence(content: &str) -> &str {
    let trimmed = content.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    let rest = rest
        .strip_prefix("html")
        .or_else(|| rest.strip_prefix("HTML"))
        .unwrap_or(rest);
    rest.strip_suffix("```").unwrap_or(rest).trim()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::provider::scripted::ScriptedRunner;

    const RETRY: RetryConfig = RetryConfig {
        max_attempts: 1,
        backoff_base_ms: 1,
    };

    fn regulations() -> Vec<Regulation> {
        vec![Regulation {
            file_name: "flextime_03.txt".to_string(),
            original_text: "core time 11:00-15:00".to_string(),
            updated_text: "core time 8:30-16:30".to_string(),
            is_updated: true,
            hypothesis: "defines core time".to_string(),
            reason: "request moves core time".to_string(),
        }]
    }

    #[test]
    fn test_strip_html_fence() {
        assert_eq!(strip_html_fence("```html\n<h1>r</h1>\n```"), "<h1>r</h1>");
        assert_eq!(strip_html_fence("```\n<p>x</p>\n```\n"), "<p>x</p>");
        assert_eq!(strip_html_fence("  <html></html>\n"), "<html></html>");
    }

    #[tokio::test]
    async fn test_compile_with_reflection() {
        let dir = tempfile::tempdir().unwrap();
        let runner = ScriptedRunner::new(vec![
            Ok("<h1>下書き</h1>".to_string()),
            Ok("```html\n<h1>改訂報告</h1>\n```".to_string()),
            Ok("<h1>Revision report</h1>".to_string()),
        ]);
        let compiler = ReportCompiler {
            runner: &runner,
            retry: &RETRY,
            reflection: true,
        };

        let report = compiler
            .compile(dir.path(), "20261014_120000", "Move core time", &regulations())
            .await
            .unwrap();

        assert_eq!(
            fs::read_to_string(&report.japanese_path).unwrap(),
            "<h1>改訂報告</h1>"
        );
        assert_eq!(
            fs::read_to_string(&report.english_path).unwrap(),
            "<h1>Revision report</h1>"
        );
        assert!(report
            .english_path
            .ends_with("report_english_20261014_120000.html"));

        let calls = runner.calls();
        assert_eq!(calls.len(), 3);
        assert!(calls[0].system.contains("core time 8:30-16:30"));
        assert!(calls[0].system.contains("Move core time"));
        assert_eq!(calls[0].history_len, 0);
        assert_eq!(calls[1].history_len, 2);
        assert_eq!(calls[2].history_len, 4);
    }

    #[tokio::test]
    async fn test_compile_without_reflection() {
        let dir = tempfile::tempdir().unwrap();
        let runner = ScriptedRunner::new(vec![
            Ok("<h1>報告</h1>".to_string()),
            Ok("<h1>Report</h1>".to_string()),
        ]);
        let compiler = ReportCompiler {
            runner: &runner,
            retry: &RETRY,
            reflection: false,
        };

        compiler
            .compile(dir.path(), "ts", "q", &regulations())
            .await
            .unwrap();

        let calls = runner.calls();
        assert_eq!(calls.len(), 2);
        assert_eq!(calls[1].message, TRANSLATE_MESSAGE);
        assert_eq!(calls[1].history_len, 2);
    }

    #[tokio::test]
    async fn test_failed_step_writes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let runner = ScriptedRunner::new(vec![
            Ok("<h1>報告</h1>".to_string()),
            Err(ProviderError::Timeout(std::time::Duration::from_secs(300))),
        ]);
        let compiler = ReportCompiler {
            runner: &runner,
            retry: &RETRY,
            reflection: true,
        };

        let err = compiler
            .compile(dir.path(), "ts", "q", &regulations())
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            OutputError::Generate {
                step: "reflection",
                ..
            }
        ));
        assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 0);
    }
}
