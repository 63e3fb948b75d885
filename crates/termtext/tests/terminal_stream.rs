// Test module - relaxed lint rules
#![allow(clippy::indexing_slicing)]
#![allow(clippy::unwrap_used)]
#![allow(clippy::uninlined_format_args)]
#![allow(missing_docs)]

use termtext::model::{Color, FontWeight, NamedColor, TextFormat};
use termtext::render::{to_html, to_plain_text};
use termtext::sgr::StaticFontCatalog;
use termtext::terminal::Terminal;

fn terminal() -> Terminal {
    Terminal::new(TextFormat::default(), StaticFontCatalog::new())
}

/// Screen text a real VT100 shows for the same bytes.
fn vt100_text(bytes: &[u8]) -> String {
    let mut parser = vt100::Parser::new(24, 80, 0);
    parser.process(bytes);
    parser.screen().contents().trim_end().to_string()
}

#[test]
fn carriage_returns_match_a_vt100_screen() {
    let cases: [&[u8]; 4] = [
        b"downloading 10%\rdownloading 99%\r\ndone\r\n",
        b"Progress: 100%\rDone\r\n",
        b"a\r\nb\rc\r\n",
        b"\x1b[32mok\x1b[0m 1/3\r\x1b[32mok\x1b[0m 3/3\r\n",
    ];
    for bytes in cases {
        let mut terminal = terminal();
        terminal.process_bytes(bytes);
        assert_eq!(
            terminal.plain_text().trim_end(),
            vt100_text(bytes),
            "input {:?}",
            String::from_utf8_lossy(bytes)
        );
    }
}

#[test]
fn byte_at_a_time_equals_whole_stream() {
    let bytes = b"\x1b[1;38;5;196mfail\x1b[0m: 10%\r\x1b[33mwarn\x1b[0m: 90%\r\nnext \xc3\xa9\r\n";
    let mut whole = terminal();
    whole.process_bytes(bytes);

    let mut split = terminal();
    for byte in bytes {
        split.process_bytes(std::slice::from_ref(byte));
    }

    let whole = whole.snapshot();
    let split = split.snapshot();
    assert_eq!(whole.blocks, split.blocks);
    assert_eq!(whole.cursor, split.cursor);
}

#[test]
fn runs_carry_interpreted_formats() {
    let mut terminal = terminal();
    terminal.process_str("plain \x1b[1;31merror\x1b[22m red\x1b[m done");
    let snapshot = terminal.snapshot();
    let runs = &snapshot.blocks[0].runs;
    assert_eq!(runs.len(), 4);

    assert_eq!(runs[0].text, "plain ");
    assert_eq!(runs[0].format, TextFormat::default());

    assert_eq!(runs[1].text, "error");
    assert_eq!(runs[1].format.weight, FontWeight::Bold);
    assert_eq!(runs[1].format.foreground, Color::Named(NamedColor::Red));

    assert_eq!(runs[2].text, " red");
    assert_eq!(runs[2].format.weight, FontWeight::Normal);
    assert_eq!(runs[2].format.foreground, Color::Named(NamedColor::Red));

    assert_eq!(runs[3].text, " done");
    assert_eq!(runs[3].format, TextFormat::default());
}

#[test]
fn colon_truecolor_with_colorspace_sets_exact_rgb() {
    let mut terminal = terminal();
    terminal.process_str("\x1b[38:2::255:128:7mtruecolor");
    let snapshot = terminal.snapshot();
    let format = &snapshot.blocks[0].runs[0].format;
    assert_eq!(
        format.foreground,
        Color::Rgb {
            r: 255,
            g: 128,
            b: 7
        }
    );
    // The blue channel must not be reread as code 7 (reverse video).
    assert_eq!(format.background, Color::Default);
}

#[test]
fn configured_defaults_are_the_reset_target() {
    let defaults = TextFormat {
        foreground: Color::Rgb {
            r: 220,
            g: 220,
            b: 220,
        },
        ..TextFormat::default()
    };
    let mut terminal = Terminal::new(defaults.clone(), StaticFontCatalog::new());
    terminal.process_str("\x1b[35mx\x1b[0my");
    let snapshot = terminal.snapshot();
    assert_eq!(snapshot.blocks[0].runs[1].format, defaults);
}

#[test]
fn cursor_movement_sequences_do_not_leak_into_text() {
    let mut terminal = terminal();
    terminal.process_str("\x1b[2K\x1b[1Gstep 1\x1b]0;title\x07\n");
    assert_eq!(terminal.plain_text(), "step 1\n");
}

#[test]
fn snapshot_renders_to_text_and_html() {
    let mut terminal = terminal();
    terminal.process_str("\x1b[4mlink\x1b[24m & more\nline two");
    let snapshot = terminal.snapshot();
    assert_eq!(to_plain_text(&snapshot), "link & more\nline two");
    let html = to_html(&snapshot, terminal.defaults());
    assert!(html.starts_with("<pre class=\"termtext\">"));
    assert!(html.contains("<span style=\"text-decoration:underline\">link</span> &amp; more"));
    assert!(html.contains("\nline two</pre>"));
}

#[test]
fn snapshot_serializes_to_json() {
    let mut terminal = terminal();
    terminal.process_str("\x1b[38;2;1;2;3mrgb");
    let value = serde_json::to_value(terminal.snapshot()).unwrap();
    assert_eq!(value["snapshot_version"], 1);
    assert_eq!(value["cursor"], 3);
    assert_eq!(value["blocks"][0]["text"], "rgb");
    assert_eq!(
        value["blocks"][0]["runs"][0]["format"]["foreground"],
        serde_json::json!({ "rgb": { "r": 1, "g": 2, "b": 3 } })
    );
}
