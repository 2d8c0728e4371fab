//! Tree strategy: load the whole document into xot, then walk it

use super::{collect_candidates, project_element, read_document, RecordIter, SearchStrategy};
use crate::error::{Result, SiftError};
use crate::filter::SearchFilter;
use crate::record::ElementRecord;
use std::path::Path;
use std::time::Instant;
use tracing::debug;
use xot::{Node, Xot};

pub struct TreeStrategy;

impl SearchStrategy for TreeStrategy {
    fn name(&self) -> &'static str {
        "Tree (xot)"
    }

    fn search(&self, path: &Path, tag: &str, filter: &SearchFilter) -> Result<RecordIter> {
        let t0 = Instant::now();
        let xml = read_document(path)?;

        let mut xot = Xot::new();
        let doc = xot
            .parse(&xml)
            .map_err(|e| SiftError::parse(path, e.to_string()))?;
        let candidates = collect_candidates(&xot, doc, tag);

        debug!(
            event = "filtering",
            strategy = "tree",
            path = %path.display(),
            tag,
            candidates = candidates.len(),
            elapsed_ms = t0.elapsed().as_millis() as u64,
            "document loaded"
        );

        Ok(Box::new(TreeRecords {
            xot,
            candidates: candidates.into_iter(),
            filter: filter.clone(),
        }))
    }
}

/// Projects candidates lazily; the tree is dropped with the iterator
struct TreeRecords {
    xot: Xot,
    candidates: std::vec::IntoIter<Node>,
    filter: SearchFilter,
}

impl Iterator for TreeRecords {
    type Item = Result<ElementRecord>;

    fn next(&mut self) -> Option<Self::Item> {
        for node in self.candidates.by_ref() {
            let record = project_element(&self.xot, node);
            if self.filter.matches(&record) {
                return Some(Ok(record));
            }
        }
        None
    }
}
