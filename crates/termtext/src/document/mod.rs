//! In-memory rich-text document and the editing cursor the inserter drives.
//!
//! A [`Document`] is a list of blocks (lines); each block is a list of runs
//! sharing one [`TextFormat`]. Positions count characters (Unicode scalar
//! values) across the whole document, with each block separator counting as
//! one position, so the position after the last character of block 0 is the
//! separator and block 1 starts one further.
//!
//! # Key Types
//!
//! - [`Document`] - the block/run store
//! - [`TextCursor`] - the editing operations the inserter needs
//! - [`DocumentCursor`] - a [`TextCursor`] over a `&mut Document`

use crate::model::{
    BlockSnapshot, DocumentSnapshot, RunSnapshot, SnapshotId, TextFormat, SNAPSHOT_VERSION,
};

/// Editable position in a line-structured document.
pub trait TextCursor {
    /// Current position.
    fn position(&self) -> usize;

    /// Whether text between the anchor and the position is selected.
    fn has_selection(&self) -> bool;

    /// Move right by up to `count` positions, extending the selection.
    fn select_right(&mut self, count: usize);

    /// Move to the start of the current block, clearing the selection.
    fn move_to_block_start(&mut self);

    /// Move to the end of the current line, clearing the selection.
    fn move_to_line_end(&mut self);

    /// Replace the selection (if any) with `text`.
    ///
    /// Without an explicit format the text takes the format at the cursor.
    fn insert_text(&mut self, text: &str, format: Option<&TextFormat>);

    /// Replace the selection (if any) with a block separator.
    fn insert_block(&mut self);
}

/// Text sharing one format.
#[derive(Clone, Debug, PartialEq)]
pub struct Run {
    text: String,
    format: TextFormat,
}

impl Run {
    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn format(&self) -> &TextFormat {
        &self.format
    }

    fn char_len(&self) -> usize {
        self.text.chars().count()
    }

    /// Split at a character offset, returning the tail.
    fn split_off(&mut self, offset: usize) -> Self {
        let byte = self
            .text
            .char_indices()
            .nth(offset)
            .map_or(self.text.len(), |(index, _)| index);
        Self {
            text: self.text.split_off(byte),
            format: self.format.clone(),
        }
    }
}

/// One line of the document.
#[derive(Clone, Debug, PartialEq)]
pub struct Block {
    runs: Vec<Run>,
    /// Format applied to text typed into the block while it is empty.
    char_format: TextFormat,
}

impl Block {
    fn new(char_format: TextFormat) -> Self {
        Self {
            runs: Vec::new(),
            char_format,
        }
    }

    pub fn runs(&self) -> &[Run] {
        &self.runs
    }

    pub fn text(&self) -> String {
        self.runs.iter().map(|run| run.text.as_str()).collect()
    }

    pub fn char_len(&self) -> usize {
        self.runs.iter().map(Run::char_len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.runs.iter().all(|run| run.text.is_empty())
    }

    /// Split the runs at a character offset, returning the tail runs.
    fn split_off(&mut self, offset: usize) -> Vec<Run> {
        let mut consumed = 0;
        for index in 0..self.runs.len() {
            let Some(run) = self.runs.get_mut(index) else {
                break;
            };
            let len = run.char_len();
            if offset < consumed + len {
                let tail_head = run.split_off(offset - consumed);
                let mut tail = self.runs.split_off(index + 1);
                tail.insert(0, tail_head);
                return tail;
            }
            consumed += len;
        }
        Vec::new()
    }

    fn insert(&mut self, offset: usize, text: &str, format: TextFormat) {
        let tail = self.split_off(offset);
        self.runs.push(Run {
            text: text.to_string(),
            format,
        });
        self.runs.extend(tail);
        self.normalize();
    }

    fn remove(&mut self, start: usize, end: usize) {
        let tail = self.split_off(end);
        drop(self.split_off(start));
        self.runs.extend(tail);
        self.normalize();
    }

    /// Drop empty runs and merge neighbours with equal formats.
    fn normalize(&mut self) {
        let mut merged: Vec<Run> = Vec::with_capacity(self.runs.len());
        for run in self.runs.drain(..) {
            if run.text.is_empty() {
                continue;
            }
            match merged.last_mut() {
                Some(last) if last.format == run.format => last.text.push_str(&run.text),
                _ => merged.push(run),
            }
        }
        self.runs = merged;
    }

    /// Format of the character at `offset` (0-based), if any.
    fn format_of_char(&self, offset: usize) -> Option<&TextFormat> {
        let mut consumed = 0;
        for run in &self.runs {
            let len = run.char_len();
            if offset < consumed + len {
                return Some(&run.format);
            }
            consumed += len;
        }
        None
    }
}

/// Rich-text document made of blocks of formatted runs.
#[derive(Clone, Debug, PartialEq)]
pub struct Document {
    blocks: Vec<Block>,
    base_format: TextFormat,
}

impl Default for Document {
    fn default() -> Self {
        Self::new(TextFormat::default())
    }
}

impl Document {
    /// Empty document (one empty block) whose unformatted text uses `base_format`.
    pub fn new(base_format: TextFormat) -> Self {
        Self {
            blocks: vec![Block::new(base_format.clone())],
            base_format,
        }
    }

    pub fn base_format(&self) -> &TextFormat {
        &self.base_format
    }

    /// Total length in positions, separators included.
    pub fn len(&self) -> usize {
        let chars: usize = self.blocks.iter().map(Block::char_len).sum();
        chars + self.blocks.len().saturating_sub(1)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn block_count(&self) -> usize {
        self.blocks.len()
    }

    pub fn blocks(&self) -> &[Block] {
        &self.blocks
    }

    /// Block texts joined with `'\n'`.
    pub fn plain_text(&self) -> String {
        self.blocks
            .iter()
            .map(Block::text)
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Drop all content.
    pub fn clear(&mut self) {
        self.blocks = vec![Block::new(self.base_format.clone())];
    }

    /// Cursor at `position` (clamped to the document length).
    pub fn cursor_at(&mut self, position: usize) -> DocumentCursor<'_> {
        let position = position.min(self.len());
        DocumentCursor {
            document: self,
            position,
            anchor: position,
        }
    }

    pub fn cursor_at_end(&mut self) -> DocumentCursor<'_> {
        let end = self.len();
        self.cursor_at(end)
    }

    /// Capture blocks and runs, recording `cursor` as the write position.
    pub fn snapshot(&self, cursor: usize) -> DocumentSnapshot {
        DocumentSnapshot {
            snapshot_version: SNAPSHOT_VERSION,
            snapshot_id: SnapshotId::new(),
            cursor,
            blocks: self
                .blocks
                .iter()
                .map(|block| BlockSnapshot {
                    text: block.text(),
                    runs: block
                        .runs
                        .iter()
                        .map(|run| RunSnapshot {
                            text: run.text.clone(),
                            format: run.format.clone(),
                        })
                        .collect(),
                })
                .collect(),
        }
    }

    /// Block index and offset within it for a document position.
    fn locate(&self, position: usize) -> (usize, usize) {
        let mut start = 0;
        let last = self.blocks.len().saturating_sub(1);
        for (index, block) in self.blocks.iter().enumerate() {
            let len = block.char_len();
            if position <= start + len || index == last {
                return (index, position.saturating_sub(start).min(len));
            }
            start += len + 1;
        }
        (0, 0)
    }

    fn block_start(&self, position: usize) -> usize {
        let (block, _) = self.locate(position);
        self.blocks
            .iter()
            .take(block)
            .map(|block| block.char_len() + 1)
            .sum()
    }

    fn block_end(&self, position: usize) -> usize {
        let (block, _) = self.locate(position);
        let len = self.blocks.get(block).map_or(0, Block::char_len);
        self.block_start(position) + len
    }

    /// Format the cursor would type with at `position`.
    ///
    /// The character before the position wins; at the start of a non-empty
    /// block the first character is used instead, and an empty block falls
    /// back to its own char format.
    fn format_at(&self, position: usize) -> TextFormat {
        let (index, offset) = self.locate(position);
        let Some(block) = self.blocks.get(index) else {
            return self.base_format.clone();
        };
        let char_offset = offset.saturating_sub(1);
        block
            .format_of_char(char_offset)
            .unwrap_or(&block.char_format)
            .clone()
    }

    fn remove_range(&mut self, start: usize, end: usize) {
        if start >= end {
            return;
        }
        let (first, first_offset) = self.locate(start);
        let (last, last_offset) = self.locate(end);
        if first == last {
            if let Some(block) = self.blocks.get_mut(first) {
                block.remove(first_offset, last_offset);
            }
            return;
        }
        let tail = match self.blocks.get_mut(last) {
            Some(block) => block.split_off(last_offset),
            None => Vec::new(),
        };
        self.blocks.drain(first + 1..=last);
        if let Some(block) = self.blocks.get_mut(first) {
            drop(block.split_off(first_offset));
            block.runs.extend(tail);
            block.normalize();
        }
    }

    /// Insert `text` at `position`; each `'\n'` starts a new block.
    fn insert_at(&mut self, position: usize, text: &str, format: &TextFormat) {
        let mut position = position;
        for (index, line) in text.split('\n').enumerate() {
            if index > 0 {
                self.split_block(position, format.clone());
                position += 1;
            }
            if line.is_empty() {
                continue;
            }
            let (block, offset) = self.locate(position);
            if let Some(block) = self.blocks.get_mut(block) {
                block.insert(offset, line, format.clone());
            }
            position += line.chars().count();
        }
    }

    fn split_block(&mut self, position: usize, char_format: TextFormat) {
        let (index, offset) = self.locate(position);
        let Some(block) = self.blocks.get_mut(index) else {
            return;
        };
        let mut next = Block::new(char_format);
        next.runs = block.split_off(offset);
        self.blocks.insert(index + 1, next);
    }
}

/// Cursor over a borrowed [`Document`].
#[derive(Debug)]
pub struct DocumentCursor<'d> {
    document: &'d mut Document,
    position: usize,
    anchor: usize,
}

impl DocumentCursor<'_> {
    pub fn document(&self) -> &Document {
        self.document
    }

    pub fn anchor(&self) -> usize {
        self.anchor
    }

    fn selection(&self) -> (usize, usize) {
        if self.anchor <= self.position {
            (self.anchor, self.position)
        } else {
            (self.position, self.anchor)
        }
    }

    fn collapse_to(&mut self, position: usize) {
        self.position = position;
        self.anchor = position;
    }
}

impl TextCursor for DocumentCursor<'_> {
    fn position(&self) -> usize {
        self.position
    }

    fn has_selection(&self) -> bool {
        self.anchor != self.position
    }

    fn select_right(&mut self, count: usize) {
        self.position = self.position.saturating_add(count).min(self.document.len());
    }

    fn move_to_block_start(&mut self) {
        let start = self.document.block_start(self.position);
        self.collapse_to(start);
    }

    fn move_to_line_end(&mut self) {
        let end = self.document.block_end(self.position);
        self.collapse_to(end);
    }

    fn insert_text(&mut self, text: &str, format: Option<&TextFormat>) {
        let (start, end) = self.selection();
        let format = format
            .cloned()
            .unwrap_or_else(|| self.document.format_at(start));
        self.document.remove_range(start, end);
        self.document.insert_at(start, text, &format);
        self.collapse_to(start + text.chars().count());
    }

    fn insert_block(&mut self) {
        let (start, end) = self.selection();
        let format = self.document.format_at(start);
        self.document.remove_range(start, end);
        self.document.split_block(start, format);
        self.collapse_to(start + 1);
    }
}
