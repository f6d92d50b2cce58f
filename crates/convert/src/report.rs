use crate::error::Error;
use crate::transform::Outcome;
use std::path::PathBuf;
use std::time::Duration;

/// Summary of a conversion run.
#[derive(Debug, Default)]
pub struct Report {
    /// Node resources decompressed into their own directory.
    pub nodes: u64,
    /// Node index documents decompressed to `index.json`.
    pub index_documents: u64,
    /// Files that are not node files.
    pub skipped: u64,
    /// Per-item failures, in the order they were reported.
    pub failures: Vec<Error>,
    /// Where the converted layer ended up, once finalized.
    pub served_layout: Option<PathBuf>,
    pub elapsed: Duration,
}

impl Report {
    pub(crate) fn record(&mut self, outcome: &Outcome) {
        match outcome {
            Outcome::Node { .. } => self.nodes += 1,
            Outcome::IndexDocument { .. } => self.index_documents += 1,
            Outcome::Skipped(_) => self.skipped += 1,
        }
    }

    /// Number of node files decompressed.
    pub fn transformed(&self) -> u64 {
        self.nodes + self.index_documents
    }
}
