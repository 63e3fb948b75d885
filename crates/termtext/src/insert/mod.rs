//! Carriage-return aware insertion of terminal text into a document.
//!
//! Terminal programs redraw progress lines with a bare `\r`: the cursor
//! returns to column zero and the following characters overwrite what is
//! already on screen. [`insert_text`] reproduces that on a [`TextCursor`]:
//! every segment is written by selecting as many existing characters as it
//! has and replacing them, so `"50%\rProgress: 75%"` leaves only the second
//! message behind.
//!
//! # Example
//!
//! ```
//! use termtext::document::Document;
//! use termtext::insert::insert_text;
//!
//! let mut document = Document::default();
//! let mut cursor = document.cursor_at_end();
//! insert_text(&mut cursor, "downloading 10%\rdownloading 99%\ndone", None);
//! assert_eq!(document.plain_text(), "downloading 99%\ndone");
//! ```

use crate::document::TextCursor;
use crate::model::TextFormat;

/// Line terminator the inserter splits on.
///
/// Windows builds split on `"\r\n"` only; elsewhere `"\n"` ends a line and
/// any `\r` before it acts as a carriage return.
#[cfg(windows)]
pub const LINE_BREAK: &str = "\r\n";
/// Line terminator the inserter splits on.
#[cfg(not(windows))]
pub const LINE_BREAK: &str = "\n";

/// Insert `text` at the cursor with overwrite-style carriage returns.
///
/// Between lines the cursor moves to the end of the current line and a new
/// block is inserted. Within a line, each `\r` rewinds to the start of the
/// block before the next segment overwrites. Empty segments are skipped, so
/// inserting `""` changes nothing.
pub fn insert_text<C>(cursor: &mut C, text: &str, format: Option<&TextFormat>)
where
    C: TextCursor + ?Sized,
{
    for (index, line) in text.split(LINE_BREAK).enumerate() {
        if index > 0 {
            cursor.move_to_line_end();
            cursor.insert_block();
        }
        insert_line(cursor, line, format);
    }
}

fn insert_line<C>(cursor: &mut C, line: &str, format: Option<&TextFormat>)
where
    C: TextCursor + ?Sized,
{
    for (index, segment) in line.split('\r').enumerate() {
        if index > 0 {
            cursor.move_to_block_start();
        }
        overwrite(cursor, segment, format);
    }
}

fn overwrite<C>(cursor: &mut C, segment: &str, format: Option<&TextFormat>)
where
    C: TextCursor + ?Sized,
{
    if segment.is_empty() {
        return;
    }
    cursor.select_right(segment.chars().count());
    cursor.insert_text(segment, format);
}

#[cfg(test)]
#[allow(clippy::indexing_slicing)]
mod tests {
    use super::*;
    use crate::document::{Document, TextCursor};
    use crate::model::{Color, NamedColor};

    fn insert_into(document: &mut Document, text: &str) -> usize {
        let mut cursor = document.cursor_at_end();
        insert_text(&mut cursor, text, None);
        cursor.position()
    }

    #[test]
    fn carriage_return_overwrites() {
        let mut document = Document::default();
        insert_into(&mut document, "A\rB");
        assert_eq!(document.plain_text(), "B");
    }

    #[test]
    fn progress_redraw_leaves_last_frame() {
        let mut document = Document::default();
        insert_into(&mut document, "50%\rProgress: 75%");
        assert_eq!(document.plain_text(), "Progress: 75%");
    }

    #[test]
    fn shorter_overwrite_keeps_tail() {
        let mut document = Document::default();
        insert_into(&mut document, "abcdef\rXY");
        assert_eq!(document.plain_text(), "XYcdef");
    }

    #[test]
    fn line_feed_starts_new_block() {
        let mut document = Document::default();
        insert_into(&mut document, "line1\nline2");
        assert_eq!(document.block_count(), 2);
        assert_eq!(document.blocks()[0].text(), "line1");
        assert_eq!(document.blocks()[1].text(), "line2");
    }

    #[test]
    fn empty_text_is_a_no_op() {
        let mut document = Document::default();
        let end = insert_into(&mut document, "seed");
        let before = document.clone();
        let mut cursor = document.cursor_at(end);
        insert_text(&mut cursor, "", None);
        assert_eq!(cursor.position(), end);
        assert_eq!(document, before);
    }

    #[test]
    fn insert_mid_document_overwrites_following_text() {
        let mut document = Document::default();
        insert_into(&mut document, "hello");
        let mut cursor = document.cursor_at(0);
        insert_text(&mut cursor, "J", None);
        assert_eq!(document.plain_text(), "Jello");
    }

    #[test]
    fn trailing_line_break_leaves_empty_block() {
        let mut document = Document::default();
        let position = insert_into(&mut document, "done\n");
        assert_eq!(document.block_count(), 2);
        assert_eq!(position, 5);
    }

    #[test]
    fn explicit_format_is_stamped_on_every_segment() {
        let red = TextFormat {
            foreground: Color::Named(NamedColor::Red),
            ..TextFormat::default()
        };
        let mut document = Document::default();
        let mut cursor = document.cursor_at_end();
        insert_text(&mut cursor, "a\rb\nc", Some(&red));
        for block in document.blocks() {
            for run in block.runs() {
                assert_eq!(run.format(), &red);
            }
        }
        assert_eq!(document.plain_text(), "b\nc");
    }

    #[cfg(not(windows))]
    #[test]
    fn crlf_rewinds_before_breaking_the_line() {
        let mut document = Document::default();
        insert_into(&mut document, "one\r\ntwo\r\n");
        assert_eq!(document.plain_text(), "one\ntwo\n");
    }
}
