//! Streaming split of raw process output into text spans and SGR sequences.
//!
//! Built on the `vte` state machine, so escape sequences and UTF-8
//! characters split across reads are reassembled. Only `ESC [ ... m` is
//! surfaced; every other CSI, OSC, DCS and ESC sequence is dropped, as are
//! C0 controls other than carriage return, line feed and tab.

use crate::sgr::SgrParams;
use tracing::trace;
use vte::{Params, Parser, Perform};

/// One unit of tokenized output, in stream order.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Token {
    /// Literal text, possibly containing `\r`, `\n` and `\t`.
    Text(String),
    /// Parameters of a Select Graphic Rendition sequence.
    Sgr(SgrParams),
}

/// Incremental tokenizer; keep one per output stream.
pub struct Tokenizer {
    parser: Parser,
}

impl std::fmt::Debug for Tokenizer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Tokenizer").finish_non_exhaustive()
    }
}

impl Default for Tokenizer {
    fn default() -> Self {
        Self::new()
    }
}

impl Tokenizer {
    pub fn new() -> Self {
        Self {
            parser: Parser::new(),
        }
    }

    /// Tokenize the next chunk of output.
    ///
    /// Incomplete escape sequences and partial UTF-8 characters at the end
    /// of `bytes` are held by the parser and completed by the next call.
    pub fn feed(&mut self, bytes: &[u8]) -> Vec<Token> {
        let mut collector = Collector::default();
        for byte in bytes {
            self.parser.advance(&mut collector, *byte);
        }
        collector.finish()
    }
}

#[derive(Default)]
struct Collector {
    tokens: Vec<Token>,
    text: String,
}

impl Collector {
    fn flush_text(&mut self) {
        if !self.text.is_empty() {
            self.tokens.push(Token::Text(std::mem::take(&mut self.text)));
        }
    }

    fn finish(mut self) -> Vec<Token> {
        self.flush_text();
        self.tokens
    }
}

impl Perform for Collector {
    fn print(&mut self, c: char) {
        self.text.push(c);
    }

    fn execute(&mut self, byte: u8) {
        match byte {
            b'\r' | b'\n' | b'\t' => self.text.push(char::from(byte)),
            _ => trace!(byte, "dropping control character"),
        }
    }

    fn csi_dispatch(&mut self, params: &Params, intermediates: &[u8], ignore: bool, action: char) {
        if action == 'm' && intermediates.is_empty() && !ignore {
            self.flush_text();
            self.tokens.push(Token::Sgr(SgrParams::from_vte(params)));
        } else {
            trace!(%action, "dropping unsupported CSI sequence");
        }
    }

    fn osc_dispatch(&mut self, _params: &[&[u8]], _bell_terminated: bool) {
        trace!("dropping OSC sequence");
    }

    fn esc_dispatch(&mut self, _intermediates: &[u8], _ignore: bool, byte: u8) {
        trace!(byte, "dropping ESC sequence");
    }
}
