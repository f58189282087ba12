use crate::error::SummaryError;
use ignore::WalkBuilder;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use super::DATA_DIR;

pub const SUMMARY_FILE_NAME: &str = "internal_regulation_summary.txt";

/// Directory listing of the corpus, used as grounding context
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegulationSummary {
    pub file_name: String,
    pub content: String,
}

impl RegulationSummary {
    /// Hex sha256 of the content, to tell cached artifacts apart
    pub fn digest(&self) -> String {
        format!("{:x}", Sha256::digest(self.content.as_bytes()))
    }
}

/// Load the cached summary, or regenerate it first unless `skip_creation`
pub fn retrieve_summary(
    base_dir: &Path,
    skip_creation: bool,
) -> Result<RegulationSummary, SummaryError> {
    let summary = if skip_creation {
        load_summary_file(base_dir)?
    } else {
        info!("Creating regulation summary file");
        create_summary_file(base_dir)?
    };
    info!(
        "Regulation summary {} ({} bytes, sha256 {})",
        summary.file_name,
        summary.content.len(),
        &summary.digest()[..12]
    );
    Ok(summary)
}

/// Render `data/` and write the listing to the corpus root
pub fn create_summary_file(base_dir: &Path) -> Result<RegulationSummary, SummaryError> {
    let data_dir = base_dir.join(DATA_DIR);
    if !data_dir.is_dir() {
        return Err(SummaryError::MissingDataDir(data_dir));
    }

    let content = render_tree(&data_dir)?;
    let path = summary_path(base_dir);
    fs::write(&path, &content).map_err(|e| SummaryError::Write {
        path: path.clone(),
        source: e,
    })?;
    debug!("Wrote {}", path.display());

    Ok(RegulationSummary {
        file_name: SUMMARY_FILE_NAME.to_string(),
        content,
    })
}

pub fn load_summary_file(base_dir: &Path) -> Result<RegulationSummary, SummaryError> {
    let path = summary_path(base_dir);
    let content = fs::read_to_string(&path).map_err(|e| SummaryError::Read {
        path: path.clone(),
        source: e,
    })?;
    Ok(RegulationSummary {
        file_name: SUMMARY_FILE_NAME.to_string(),
        content,
    })
}

pub fn summary_path(base_dir: &Path) -> PathBuf {
    base_dir.join(SUMMARY_FILE_NAME)
}

struct Node {
    depth: usize,
    name: String,
    is_dir: bool,
}

/// `tree`-style listing of a directory, sorted by name, hidden entries skipped
pub fn render_tree(root: &Path) -> Result<String, SummaryError> {
    let walker = WalkBuilder::new(root)
        .standard_filters(false)
        .hidden(true) // skip hidden files
        .sort_by_file_name(|a, b| a.cmp(b))
        .build();

    let mut nodes = Vec::new();
    for entry in walker {
        let entry = entry?;
        if entry.depth() == 0 {
            continue;
        }
        nodes.push(Node {
            depth: entry.depth(),
            name: entry.file_name().to_string_lossy().to_string(),
            is_dir: entry.file_type().map(|t| t.is_dir()).unwrap_or(false),
        });
    }

    let mut out = format!("{}\n", root.display());
    let mut ancestors_last: Vec<bool> = Vec::new();
    let (mut dirs, mut files) = (0usize, 0usize);

    for (idx, node) in nodes.iter().enumerate() {
        let is_last = nodes[idx + 1..]
            .iter()
            .find(|n| n.depth <= node.depth)
            .map(|n| n.depth < node.depth)
            .unwrap_or(true);

        ancestors_last.truncate(node.depth - 1);
        for last in &ancestors_last {
            out.push_str(if *last { "    " } else { "│   " });
        }
        out.push_str(if is_last { "└── " } else { "├── " });
        out.push_str(&node.name);
        out.push('\n');
        ancestors_last.push(is_last);

        if node.is_dir {
            dirs += 1;
        } else {
            files += 1;
        }
    }

    out.push_str(&format!(
        "\n{} {}, {} {}\n",
        dirs,
        if dirs == 1 { "directory" } else { "directories" },
        files,
        if files == 1 { "file" } else { "files" }
    ));
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn corpus() -> TempDir {
        let dir = TempDir::new().unwrap();
        let data = dir.path().join(DATA_DIR);
        fs::create_dir_all(data.join("agreements")).unwrap();
        fs::create_dir_all(data.join("rules")).unwrap();
        fs::write(data.join("agreements/flextime_03.txt"), "core time 11-15").unwrap();
        fs::write(data.join("rules/01_work_rules.txt"), "article 26").unwrap();
        fs::write(data.join("rules/22_telework.txt"), "telework").unwrap();
        fs::write(data.join(".hidden"), "x").unwrap();
        dir
    }

    #[test]
    fn test_render_tree_layout() {
        let dir = corpus();
        let data = dir.path().join(DATA_DIR);
        let tree = render_tree(&data).unwrap();
        let expected_body = "\
├── agreements
│   └── flextime_03.txt
└── rules
    ├── 01_work_rules.txt
    └── 22_telework.txt

2 directories, 3 files
";
        assert!(tree.starts_with(&format!("{}\n", data.display())));
        assert!(tree.ends_with(expected_body), "got:\n{}", tree);
        assert!(!tree.contains(".hidden"));
    }

    #[test]
    fn test_missing_data_dir_is_precondition_failure() {
        let dir = TempDir::new().unwrap();
        let err = retrieve_summary(dir.path(), false).unwrap_err();
        assert!(matches!(err, SummaryError::MissingDataDir(_)));
        assert!(!summary_path(dir.path()).exists());
    }

    #[test]
    fn test_skip_path_reproduces_written_content() {
        let dir = corpus();
        let created = retrieve_summary(dir.path(), false).unwrap();
        let cached = retrieve_summary(dir.path(), true).unwrap();
        assert_eq!(created, cached);
        assert_eq!(created.digest(), cached.digest());
        assert_eq!(
            fs::read(summary_path(dir.path())).unwrap(),
            created.content.as_bytes()
        );
    }

    #[test]
    fn test_skip_without_cache_fails() {
        let dir = corpus();
        assert!(matches!(
            retrieve_summary(dir.path(), true),
            Err(SummaryError::Read { .. })
        ));
    }

    #[test]
    fn test_singular_counts() {
        let dir = TempDir::new().unwrap();
        fs::create_dir_all(dir.path().join("only")).unwrap();
        fs::write(dir.path().join("only/a.txt"), "a").unwrap();
        let tree = render_tree(dir.path()).unwrap();
        assert!(tree.ends_with("\n1 directory, 1 file\n"));
    }
}
