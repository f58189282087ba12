//! The regulation corpus: `<base_dir>/data/**` plus the cached summary file

pub mod document;
pub mod summary;

pub use document::{DocumentRetriever, FsRetriever};
pub use summary::{retrieve_summary, RegulationSummary};

/// Subdirectory of the corpus root holding the reviewable documents
pub const DATA_DIR: &str = "data";
