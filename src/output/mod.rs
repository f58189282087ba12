mod compiler;
mod report;

pub use compiler::{CompiledReport, ReportCompiler};
pub use report::{write_run_artifacts, RunArtifacts};

use chrono::Local;

/// Artifact suffix shared by every file of one run
pub fn timestamp() -> String {
    Local::now().format("%Y%m%d_%H%M%S").to_string()
}
