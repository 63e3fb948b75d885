//! Console output sink: raw process bytes in, formatted log document out.
//!
//! [`Terminal`] ties the pieces together. Bytes go through the
//! [`Tokenizer`](crate::tokenizer::Tokenizer); SGR tokens evolve the current
//! [`TextFormat`] via [`SgrInterpreter`]; text tokens are written through the
//! carriage-return aware inserter at a write position that persists between
//! chunks. A `\r` at the very end of a text span is held back until the next
//! span, so a `\r\n` pair split across reads still acts as one line break.
//!
//! # Key Operations
//!
//! - [`Terminal::process_bytes`] - feed raw PTY output
//! - [`Terminal::snapshot`] - capture blocks, runs and the write position
//! - [`Terminal::reset_format`] - return to the session defaults
//!
//! # Example
//!
//! ```
//! use termtext::model::{Color, NamedColor, TextFormat};
//! use termtext::sgr::StaticFontCatalog;
//! use termtext::terminal::Terminal;
//!
//! let mut terminal = Terminal::new(TextFormat::default(), StaticFontCatalog::new());
//! terminal.process_bytes(b"fetch 10%\rfetch \x1b[32m100%\x1b[0m\n");
//!
//! let snapshot = terminal.snapshot();
//! assert_eq!(snapshot.lines(), vec!["fetch 100%", ""]);
//! let done = &snapshot.blocks[0].runs[1];
//! assert_eq!(done.text, "100%");
//! assert_eq!(done.format.foreground, Color::Named(NamedColor::Green));
//! ```

use crate::document::{Document, TextCursor};
use crate::insert::insert_text;
use crate::model::{DocumentSnapshot, TextFormat};
use crate::sgr::{SgrInterpreter, SgrParams, StaticFontCatalog};
use crate::tokenizer::{Token, Tokenizer};

/// Formatting console that accumulates output into a [`Document`].
#[derive(Debug)]
pub struct Terminal {
    document: Document,
    defaults: TextFormat,
    fonts: StaticFontCatalog,
    format: TextFormat,
    position: usize,
    tokenizer: Tokenizer,
    pending_return: bool,
}

impl Terminal {
    /// Create an empty console whose reset codes return to `defaults`.
    pub fn new(defaults: TextFormat, fonts: StaticFontCatalog) -> Self {
        Self {
            document: Document::new(defaults.clone()),
            format: defaults.clone(),
            defaults,
            fonts,
            position: 0,
            tokenizer: Tokenizer::new(),
            pending_return: false,
        }
    }

    /// Process a chunk of raw output.
    pub fn process_bytes(&mut self, bytes: &[u8]) {
        for token in self.tokenizer.feed(bytes) {
            match token {
                Token::Text(text) => self.write_text(text),
                Token::Sgr(params) => self.apply_sgr(&params),
            }
        }
    }

    pub fn process_str(&mut self, text: &str) {
        self.process_bytes(text.as_bytes());
    }

    /// Apply an SGR parameter list directly, as if `ESC [ params m` arrived.
    pub fn apply_sgr(&mut self, params: &SgrParams) {
        SgrInterpreter::new(&self.defaults, &self.fonts).apply(params, &mut self.format);
    }

    /// Drop the current attributes in favor of the defaults.
    pub fn reset_format(&mut self) {
        self.format = self.defaults.clone();
    }

    pub fn current_format(&self) -> &TextFormat {
        &self.format
    }

    pub fn defaults(&self) -> &TextFormat {
        &self.defaults
    }

    /// Write position in the document.
    pub fn position(&self) -> usize {
        self.position
    }

    pub fn document(&self) -> &Document {
        &self.document
    }

    pub fn plain_text(&self) -> String {
        self.document.plain_text()
    }

    /// Capture the document, including any held-back carriage return.
    pub fn snapshot(&self) -> DocumentSnapshot {
        let position = if self.pending_return {
            self.block_start_of(self.position)
        } else {
            self.position
        };
        self.document.snapshot(position)
    }

    /// Empty the document and rewind the write position.
    ///
    /// The current format is kept; call [`Terminal::reset_format`] as well
    /// to start over completely.
    pub fn clear(&mut self) {
        self.document.clear();
        self.position = 0;
        self.pending_return = false;
    }

    /// Apply a held-back carriage return, e.g. once the stream has ended.
    pub fn flush(&mut self) {
        if std::mem::take(&mut self.pending_return) {
            self.position = self.block_start_of(self.position);
        }
    }

    fn write_text(&mut self, mut text: String) {
        if std::mem::take(&mut self.pending_return) {
            text.insert(0, '\r');
        }
        if text.ends_with('\r') {
            text.pop();
            self.pending_return = true;
        }
        if text.is_empty() {
            return;
        }
        let mut cursor = self.document.cursor_at(self.position);
        insert_text(&mut cursor, &text, Some(&self.format));
        self.position = cursor.position();
    }

    fn block_start_of(&self, position: usize) -> usize {
        let mut start = 0;
        for block in self.document.blocks() {
            let end = start + block.char_len();
            if position <= end {
                return start;
            }
            start = end + 1;
        }
        start
    }
}
