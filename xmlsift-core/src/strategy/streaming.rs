//! Streaming strategy: a single forward pass with quick-xml
//!
//! Only the immediate children of open candidates are kept in memory. A
//! candidate nested inside another one is tracked independently, and records
//! are released in start-tag order even though inner candidates close first.

use super::{normalize_newlines, RecordIter, SearchStrategy};
use crate::error::{Result, SiftError};
use crate::filter::SearchFilter;
use crate::record::{is_blank, join_text, ElementRecord};
use quick_xml::escape::unescape;
use quick_xml::events::{BytesStart, Event};
use quick_xml::name::ResolveResult;
use quick_xml::NsReader;
use std::collections::VecDeque;
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use tracing::debug;

pub struct StreamingStrategy;

impl SearchStrategy for StreamingStrategy {
    fn name(&self) -> &'static str {
        "Streaming (quick-xml)"
    }

    fn search(&self, path: &Path, tag: &str, filter: &SearchFilter) -> Result<RecordIter> {
        let file = File::open(path).map_err(|e| SiftError::from_read(path, e))?;
        let mut reader = NsReader::from_reader(BufReader::new(file));
        reader.config_mut().check_end_names = true;

        debug!(
            event = "filtering",
            strategy = "streaming",
            path = %path.display(),
            tag,
            "stream opened"
        );

        Ok(Box::new(StreamRecords {
            reader,
            buf: Vec::new(),
            path: path.to_path_buf(),
            tag: tag.to_string(),
            filter: filter.clone(),
            depth: 0,
            seen_root: false,
            open: Vec::new(),
            pending: VecDeque::new(),
            base: 0,
            finished: false,
            emitted: 0,
        }))
    }
}

/// A reader event reduced to what the matcher needs, detached from the buffer
enum Step {
    Start(String),
    Empty(String),
    End,
    Text(String),
    /// Comment or processing instruction: ends the current text run
    Break,
    Eof,
    Skip,
}

/// A candidate whose end tag has not been seen yet
struct OpenCandidate {
    /// Depth of the candidate element itself (root element = 1)
    depth: usize,
    /// Sequence number of the candidate in start-tag order
    seq: usize,
    record: ElementRecord,
    /// Child content in document order, for the record text
    pieces: Vec<String>,
    /// Character data directly inside the candidate since the last child
    run: String,
    /// Immediate child currently being read: (name, value so far)
    field: Option<(String, String)>,
}

impl OpenCandidate {
    fn flush_run(&mut self) {
        if !self.run.is_empty() {
            self.pieces.push(std::mem::take(&mut self.run));
        }
    }
}

enum Slot {
    Open,
    Done(Option<ElementRecord>),
}

struct StreamRecords {
    reader: NsReader<BufReader<File>>,
    buf: Vec<u8>,
    path: PathBuf,
    tag: String,
    filter: SearchFilter,
    depth: usize,
    seen_root: bool,
    /// Open candidates, outermost first
    open: Vec<OpenCandidate>,
    /// One slot per candidate seen and not yet released
    pending: VecDeque<Slot>,
    /// Sequence number of `pending.front()`
    base: usize,
    finished: bool,
    emitted: usize,
}

impl StreamRecords {
    fn read_step(&mut self) -> Result<Step> {
        let step = match self.reader.read_event_into(&mut self.buf) {
            Ok(event) => decode_event(event, &self.reader, &self.path),
            Err(e) => Err(SiftError::parse(
                &self.path,
                format!("{} at byte {}", e, self.reader.buffer_position()),
            )),
        };
        self.buf.clear();
        step
    }

    fn advance(&mut self) -> Result<()> {
        match self.read_step()? {
            Step::Start(name) => self.on_start(name)?,
            Step::Empty(name) => {
                self.on_start(name)?;
                self.on_end();
            }
            Step::End => self.on_end(),
            Step::Text(text) => self.on_text(&text)?,
            Step::Break => self.on_break(),
            Step::Eof => self.on_eof()?,
            Step::Skip => {}
        }
        Ok(())
    }

    fn on_start(&mut self, name: String) -> Result<()> {
        self.depth += 1;
        let depth = self.depth;

        if depth == 1 {
            if self.seen_root {
                return Err(SiftError::parse(
                    &self.path,
                    format!("second root element <{}>", name),
                ));
            }
            self.seen_root = true;
        }

        for candidate in self.open.iter_mut().filter(|c| c.depth + 1 == depth) {
            candidate.flush_run();
            candidate.field = Some((name.clone(), String::new()));
        }

        if name == self.tag {
            let seq = self.base + self.pending.len();
            self.pending.push_back(Slot::Open);
            self.open.push(OpenCandidate {
                depth,
                seq,
                record: ElementRecord::new(name),
                pieces: Vec::new(),
                run: String::new(),
                field: None,
            });
        }
        Ok(())
    }

    fn on_text(&mut self, text: &str) -> Result<()> {
        if self.depth == 0 {
            if is_blank(text) {
                return Ok(());
            }
            return Err(SiftError::parse(&self.path, "text outside the root element"));
        }

        let depth = self.depth;
        for candidate in self.open.iter_mut() {
            if candidate.depth == depth {
                candidate.run.push_str(text);
            } else if let Some((_, value)) = candidate.field.as_mut() {
                value.push_str(text);
            }
        }
        Ok(())
    }

    fn on_break(&mut self) {
        let depth = self.depth;
        for candidate in self.open.iter_mut().filter(|c| c.depth == depth) {
            candidate.flush_run();
        }
    }

    fn on_end(&mut self) {
        let depth = self.depth;

        if self.open.last().map_or(false, |c| c.depth == depth) {
            if let Some(mut candidate) = self.open.pop() {
                candidate.flush_run();
                candidate.record.text = join_text(candidate.pieces.iter().map(String::as_str));
                let record = self.filter.matches(&candidate.record).then_some(candidate.record);
                if let Some(slot) = self.pending.get_mut(candidate.seq - self.base) {
                    *slot = Slot::Done(record);
                }
            }
        }

        for candidate in self.open.iter_mut().filter(|c| c.depth + 1 == depth) {
            if let Some((name, value)) = candidate.field.take() {
                candidate.pieces.push(value.clone());
                candidate.record.fields.push((name, value));
            }
        }

        self.depth = depth.saturating_sub(1);
    }

    fn on_eof(&mut self) -> Result<()> {
        if let Some(candidate) = self.open.last() {
            return Err(SiftError::parse(
                &self.path,
                format!("unexpected end of document inside <{}>", candidate.record.node_name),
            ));
        }
        if self.depth > 0 {
            return Err(SiftError::parse(&self.path, "unexpected end of document: unclosed element"));
        }
        if !self.seen_root {
            return Err(SiftError::parse(&self.path, "no root element"));
        }
        self.finished = true;
        debug!(
            event = "filtering",
            strategy = "streaming",
            path = %self.path.display(),
            emitted = self.emitted,
            "stream finished"
        );
        Ok(())
    }

    /// Pop the next completed record, if the oldest candidate is done
    fn release(&mut self) -> Option<ElementRecord> {
        while matches!(self.pending.front(), Some(Slot::Done(_))) {
            self.base += 1;
            if let Some(Slot::Done(Some(record))) = self.pending.pop_front() {
                self.emitted += 1;
                return Some(record);
            }
        }
        None
    }
}

impl Iterator for StreamRecords {
    type Item = Result<ElementRecord>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(record) = self.release() {
                return Some(Ok(record));
            }
            if self.finished {
                return None;
            }
            if let Err(e) = self.advance() {
                self.finished = true;
                self.open.clear();
                self.pending.clear();
                return Some(Err(e));
            }
        }
    }
}

fn utf8(bytes: &[u8], path: &Path) -> Result<String> {
    std::str::from_utf8(bytes)
        .map(str::to_string)
        .map_err(|e| SiftError::parse(path, e.to_string()))
}

/// Reject a prefix with no namespace declaration in scope
fn check_prefix(resolved: ResolveResult<'_>, path: &Path) -> Result<()> {
    match resolved {
        ResolveResult::Unknown(prefix) => Err(SiftError::parse(
            path,
            format!("unknown namespace prefix '{}'", String::from_utf8_lossy(&prefix)),
        )),
        _ => Ok(()),
    }
}

/// Local name of a start tag, after checking its prefixes and attributes
fn start_name<R>(start: &BytesStart<'_>, reader: &NsReader<R>, path: &Path) -> Result<String> {
    let (resolved, local) = reader.resolve_element(start.name());
    check_prefix(resolved, path)?;

    let mut attributes = start.attributes();
    attributes.with_checks(true);
    for attribute in attributes {
        let attribute = attribute.map_err(|e| SiftError::parse(path, e.to_string()))?;
        if attribute.value.contains(&b'<') {
            return Err(SiftError::parse(path, "'<' in attribute value"));
        }
        check_prefix(reader.resolve_attribute(attribute.key).0, path)?;
        attribute
            .unescape_value()
            .map_err(|e| SiftError::parse(path, e.to_string()))?;
    }

    utf8(local.as_ref(), path)
}

fn decode_event<R>(event: Event<'_>, reader: &NsReader<R>, path: &Path) -> Result<Step> {
    let step = match event {
        Event::Start(e) => Step::Start(start_name(&e, reader, path)?),
        Event::Empty(e) => Step::Empty(start_name(&e, reader, path)?),
        Event::End(_) => Step::End,
        Event::Text(e) => {
            // line ends are normalized before references are resolved
            let raw = utf8(&e, path)?;
            let text = unescape(&normalize_newlines(&raw))
                .map_err(|e| SiftError::parse(path, e.to_string()))?
                .into_owned();
            Step::Text(text)
        }
        Event::CData(e) => {
            let text = utf8(&e.into_inner(), path)?;
            Step::Text(normalize_newlines(&text).into_owned())
        }
        Event::Comment(_) | Event::PI(_) => Step::Break,
        Event::Eof => Step::Eof,
        _ => Step::Skip,
    };
    Ok(step)
}
