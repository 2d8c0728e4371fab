//! Query strategy: compile the filter into XPath 3.1 and run it with xee-xpath

use super::{project_element, read_document, RecordIter, SearchStrategy};
use crate::error::{Result, SiftError};
use crate::filter::SearchFilter;
use crate::record::ElementRecord;
use std::cell::RefCell;
use std::path::Path;
use std::rc::Rc;
use std::time::Instant;
use tracing::debug;
use xee_xpath::{query::SequenceQuery, Documents, Item, Queries, Query};
use xot::Node;

/// Record text as XPath: non-blank child elements and text nodes, space-joined
const TEXT_EXPR: &str = "string-join((* | text())[normalize-space(.) != ''] ! string(.), ' ')";

const DOCUMENT_URI: &str = "file:///document";

// Compiled query cache. The field index and the search usually run the same
// expression back to back, so one entry per thread is enough.
thread_local! {
    static QUERY_CACHE: RefCell<Option<(String, Rc<SequenceQuery>)>> = const { RefCell::new(None) };
}

/// Quote a string as an XPath literal.
///
/// A CR is spelled out with `codepoints-to-string` since the expression
/// parser would otherwise normalize it to LF.
fn string_literal(value: &str) -> String {
    let quote = |part: &str| format!("'{}'", part.replace('\'', "''"));
    if !value.contains('\r') {
        return quote(value);
    }
    let parts: Vec<String> = value.split('\r').map(quote).collect();
    format!("concat({})", parts.join(", codepoints-to-string(13), "))
}

/// Build the XPath expression that selects matching candidates
pub fn build_query(tag: &str, filter: &SearchFilter) -> String {
    let mut xpath = format!("//*[local-name() = {}]", string_literal(tag));

    if let Some((name, value)) = filter.field() {
        xpath.push_str(&format!(
            "[*[local-name() = {}][string(.) = {}]]",
            string_literal(name),
            string_literal(value)
        ));
    }

    if let Some(keyword) = filter.keyword() {
        xpath.push_str(&format!(
            "[contains(lower-case({}), {})]",
            TEXT_EXPR,
            string_literal(&keyword.to_lowercase())
        ));
    }

    xpath
}

fn compile(xpath: &str) -> Result<Rc<SequenceQuery>> {
    QUERY_CACHE.with(|cache| {
        let mut cache = cache.borrow_mut();
        if let Some((cached_xpath, cached_query)) = cache.as_ref() {
            if cached_xpath == xpath {
                return Ok(Rc::clone(cached_query));
            }
        }

        let queries = Queries::default();
        let query = Rc::new(
            queries
                .sequence(xpath)
                .map_err(|e| SiftError::Query(e.to_string()))?,
        );
        *cache = Some((xpath.to_string(), Rc::clone(&query)));
        Ok(query)
    })
}

pub struct QueryStrategy;

impl SearchStrategy for QueryStrategy {
    fn name(&self) -> &'static str {
        "Query (XPath 3.1)"
    }

    fn search(&self, path: &Path, tag: &str, filter: &SearchFilter) -> Result<RecordIter> {
        let t0 = Instant::now();
        let xml = read_document(path)?;

        let mut documents = Documents::new();
        let doc = documents
            .add_string(
                DOCUMENT_URI
                    .try_into()
                    .map_err(|_| SiftError::Query(format!("invalid document URI {}", DOCUMENT_URI)))?,
                &xml,
            )
            .map_err(|e| SiftError::parse(path, e.to_string()))?;
        let t1 = Instant::now();

        let xpath = build_query(tag, filter);
        let query = compile(&xpath)?;
        let results = query
            .execute(&mut documents, doc)
            .map_err(|e: xee_xpath::error::Error| SiftError::Query(e.to_string()))?;

        let nodes: Vec<Node> = results
            .iter()
            .filter_map(|item| match item {
                Item::Node(node) => Some(node),
                _ => None,
            })
            .collect();

        debug!(
            event = "filtering",
            strategy = "query",
            path = %path.display(),
            xpath = %xpath,
            matches = nodes.len(),
            load_ms = (t1 - t0).as_millis() as u64,
            query_ms = t1.elapsed().as_millis() as u64,
            "query evaluated"
        );

        Ok(Box::new(QueryRecords {
            documents,
            nodes: nodes.into_iter(),
        }))
    }
}

/// Nodes already passed the filter inside the query; only projection is left
struct QueryRecords {
    documents: Documents,
    nodes: std::vec::IntoIter<Node>,
}

impl Iterator for QueryRecords {
    type Item = Result<ElementRecord>;

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.nodes.next()?;
        Some(Ok(project_element(self.documents.xot(), node)))
    }
}
