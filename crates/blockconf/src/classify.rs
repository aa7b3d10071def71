//! Line classification
//!
//! Turns a configuration dump into a lazy stream of [`LineEvent`]s for one
//! resource kind. Block boundaries are decided here; decoding is left to the
//! materializer.

use crate::parents::{is_separator, is_top_level};
use crate::resource::{BlockHeader, BlockKind, Layout};
use std::collections::VecDeque;
use std::iter::Enumerate;
use std::str::Lines;

/// One classified step through a configuration dump.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LineEvent<'t> {
    /// A record opens
    BlockStart {
        /// Identity hints from the block-start line
        header: BlockHeader,
        /// 1-indexed line number
        line: usize,
    },
    /// A line sets a field of the open record
    FieldMatch {
        /// Field name
        field: &'static str,
        /// Captured text; `None` for presence flags
        raw: Option<&'t str>,
        /// 1-indexed line number
        line: usize,
    },
    /// The open record is sealed
    BlockEnd,
}

/// Iterator over the [`LineEvent`]s of one kind in a configuration dump.
pub struct Classifier<'k, 't> {
    kind: &'k dyn BlockKind,
    lines: Enumerate<Lines<'t>>,
    /// Header of the enclosing top-level block, while inside one
    block: Option<BlockHeader>,
    /// Whether a record is open; false inside a section the kind skips
    open: bool,
    /// Blockless kinds open their record on the first field line
    started: bool,
    pending: VecDeque<LineEvent<'t>>,
    finished: bool,
}

impl<'k, 't> Classifier<'k, 't> {
    /// Classify `text` for `kind`.
    pub fn new(kind: &'k dyn BlockKind, text: &'t str) -> Self {
        Self {
            kind,
            lines: text.lines().enumerate(),
            block: None,
            open: false,
            started: false,
            pending: VecDeque::new(),
            finished: false,
        }
    }

    fn step_block(&mut self, n: usize, line: &'t str) {
        if let Some(header) = self.kind.open_block(line) {
            self.close();
            self.pending.push_back(LineEvent::BlockStart {
                header: header.clone(),
                line: n,
            });
            self.block = Some(header);
            self.open = true;
            return;
        }

        if is_top_level(line) {
            self.close();
            self.block = None;
            return;
        }

        let Some(block) = &self.block else {
            return;
        };

        if let Some(section) = self.kind.open_section(line, block) {
            self.close();
            self.pending.push_back(LineEvent::BlockStart {
                header: section,
                line: n,
            });
            self.open = true;
            return;
        }

        if self.kind.ends_section(line) {
            self.close();
            return;
        }

        if self.open {
            self.push_field(n, line);
        }
    }

    fn close(&mut self) {
        if self.open {
            self.open = false;
            self.pending.push_back(LineEvent::BlockEnd);
        }
    }

    fn step_blockless(&mut self, n: usize, line: &'t str) {
        if self.kind.fields().classify(line).is_none() {
            return;
        }

        if !self.started {
            self.started = true;
            let identity = match self.kind.layout() {
                Layout::Singleton { identity } => identity,
                Layout::Keyed => self.kind.name(),
            };
            self.pending.push_back(LineEvent::BlockStart {
                header: BlockHeader::new(identity),
                line: n,
            });
        }
        self.push_field(n, line);
    }

    fn push_field(&mut self, n: usize, line: &'t str) {
        if let Some((field, raw)) = self.kind.fields().classify(line) {
            self.pending.push_back(LineEvent::FieldMatch {
                field: field.name,
                raw,
                line: n,
            });
        }
    }

    fn finish(&mut self) {
        self.finished = true;
        if self.kind.is_blockless() {
            if self.started {
                self.pending.push_back(LineEvent::BlockEnd);
            }
        } else {
            self.close();
            self.block = None;
        }
    }
}

impl<'t> Iterator for Classifier<'_, 't> {
    type Item = LineEvent<'t>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(event) = self.pending.pop_front() {
                return Some(event);
            }
            if self.finished {
                return None;
            }

            match self.lines.next() {
                Some((i, line)) => {
                    if is_separator(line) {
                        continue;
                    }
                    let line = line.trim_end();
                    if self.kind.is_blockless() {
                        self.step_blockless(i + 1, line);
                    } else {
                        self.step_block(i + 1, line);
                    }
                }
                None => self.finish(),
            }
        }
    }
}
