use crate::error::RetrievalError;
use ignore::WalkBuilder;
use std::ffi::OsStr;
use std::path::{Component, Path, PathBuf};
use tracing::debug;

use super::DATA_DIR;

/// Extensions read as UTF-8 text
const SUPPORTED_EXTENSIONS: &[&str] = &["txt", "text", "md", "markdown"];

/// Maps a task's file reference to the document's text
pub trait DocumentRetriever: Send + Sync {
    fn retrieve(&self, file_name: &str) -> Result<String, RetrievalError>;
}

/// Reads documents from `<base_dir>/data`
pub struct FsRetriever {
    data_dir: PathBuf,
}

impl FsRetriever {
    pub fn new(base_dir: &Path) -> Self {
        Self {
            data_dir: base_dir.join(DATA_DIR),
        }
    }

    fn resolve(&self, file_name: &str) -> Result<PathBuf, RetrievalError> {
        let reference = Path::new(file_name.trim());
        let valid = !file_name.trim().is_empty()
            && reference
                .components()
                .all(|c| matches!(c, Component::Normal(_) | Component::CurDir));
        if !valid {
            return Err(RetrievalError::InvalidReference(file_name.to_string()));
        }

        let direct = self.data_dir.join(reference);
        if direct.is_file() {
            return Ok(direct);
        }

        // Plans often name a file without its directory
        let base_name = reference
            .file_name()
            .ok_or_else(|| RetrievalError::InvalidReference(file_name.to_string()))?;
        let mut candidates = self.find_by_name(base_name);
        match candidates.len() {
            0 => Err(RetrievalError::NotFound(file_name.to_string())),
            1 => {
                let found = candidates.remove(0);
                debug!("Resolved '{}' to {}", file_name, found.display());
                Ok(found)
            }
            _ => Err(RetrievalError::Ambiguous {
                name: file_name.to_string(),
                candidates,
            }),
        }
    }

    fn find_by_name(&self, base_name: &OsStr) -> Vec<PathBuf> {
        let walker = WalkBuilder::new(&self.data_dir)
            .standard_filters(false)
            .sort_by_file_name(|a, b| a.cmp(b))
            .build();

        walker
            .filter_map(Result::ok)
            .filter(|e| e.file_type().map(|t| t.is_file()).unwrap_or(false))
            .filter(|e| e.file_name() == base_name)
            .map(|e| e.into_path())
            .collect()
    }
}

impl DocumentRetriever for FsRetriever {
    fn retrieve(&self, file_name: &str) -> Result<String, RetrievalError> {
        if !self.data_dir.is_dir() {
            return Err(RetrievalError::MissingDataDir(self.data_dir.clone()));
        }

        let path = self.resolve(file_name)?;
        if !is_supported(&path) {
            return Err(RetrievalError::UnsupportedFormat(file_name.to_string()));
        }

        std::fs::read_to_string(&path).map_err(|e| RetrievalError::Read { path, source: e })
    }
}

fn is_supported(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| {
            SUPPORTED_EXTENSIONS
                .iter()
                .any(|s| s.eq_ignore_ascii_case(e))
        })
        .unwrap_or(false)
}

/// In-memory corpus for tests
#[cfg(test)]
pub struct MemoryRetriever {
    documents: std::collections::HashMap<String, String>,
}

#[cfg(test)]
impl MemoryRetriever {
    pub fn new(documents: &[(&str, &str)]) -> Self {
        Self {
            documents: documents
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
        }
    }
}

#[cfg(test)]
impl DocumentRetriever for MemoryRetriever {
    fn retrieve(&self, file_name: &str) -> Result<String, RetrievalError> {
        self.documents
            .get(file_name)
            .cloned()
            .ok_or_else(|| RetrievalError::NotFound(file_name.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn corpus() -> TempDir {
        let dir = TempDir::new().unwrap();
        let data = dir.path().join(DATA_DIR);
        fs::create_dir_all(data.join("agreements")).unwrap();
        fs::create_dir_all(data.join("rules")).unwrap();
        fs::create_dir_all(data.join("archive")).unwrap();
        fs::write(data.join("agreements/flextime_03.txt"), "Core time: 11:00-15:00").unwrap();
        fs::write(data.join("rules/notes.md"), "# notes").unwrap();
        fs::write(data.join("archive/notes.md"), "# old notes").unwrap();
        fs::write(data.join("rules/01_work_rules.docx"), [0x50, 0x4b, 0x03, 0x04]).unwrap();
        dir
    }

    #[test]
    fn test_retrieve_by_relative_path() {
        let dir = corpus();
        let retriever = FsRetriever::new(dir.path());
        let text = retriever.retrieve("agreements/flextime_03.txt").unwrap();
        assert_eq!(text, "Core time: 11:00-15:00");
    }

    #[test]
    fn test_retrieve_by_base_name() {
        let dir = corpus();
        let retriever = FsRetriever::new(dir.path());
        assert!(retriever.retrieve("flextime_03.txt").is_ok());
    }

    #[test]
    fn test_ambiguous_base_name() {
        let dir = corpus();
        let retriever = FsRetriever::new(dir.path());
        match retriever.retrieve("notes.md") {
            Err(RetrievalError::Ambiguous { candidates, .. }) => assert_eq!(candidates.len(), 2),
            other => panic!("expected ambiguity, got {:?}", other),
        }
        assert_eq!(retriever.retrieve("rules/notes.md").unwrap(), "# notes");
    }

    #[test]
    fn test_unsupported_format() {
        let dir = corpus();
        let retriever = FsRetriever::new(dir.path());
        assert!(matches!(
            retriever.retrieve("rules/01_work_rules.docx"),
            Err(RetrievalError::UnsupportedFormat(_))
        ));
    }

    #[test]
    fn test_missing_file() {
        let dir = corpus();
        let retriever = FsRetriever::new(dir.path());
        assert!(matches!(
            retriever.retrieve("99_missing.txt"),
            Err(RetrievalError::NotFound(_))
        ));
    }

    #[test]
    fn test_rejects_escaping_references() {
        let dir = corpus();
        let retriever = FsRetriever::new(dir.path());
        for reference in ["../secret.txt", "/etc/passwd", "  "] {
            assert!(matches!(
                retriever.retrieve(reference),
                Err(RetrievalError::InvalidReference(_))
            ));
        }
    }

    #[test]
    fn test_missing_data_dir() {
        let dir = TempDir::new().unwrap();
        let retriever = FsRetriever::new(dir.path());
        assert!(matches!(
            retriever.retrieve("a.txt"),
            Err(RetrievalError::MissingDataDir(_))
        ));
    }
}
