//! Fixture: prints one sample per color addressing mode.
//!
//! Lines, in order: the eight normal foreground codes, the eight bright
//! foreground codes, a 256-color cube entry, a gray ramp entry and a
//! true-color sample.

// Test fixtures require special allowances - they are not production code
#![allow(clippy::print_stdout)]

use std::io::{self, Write};

fn main() -> io::Result<()> {
    let mut stdout = io::stdout();
    for code in 30..=37 {
        write!(stdout, "\x1b[{code}m{code}\x1b[0m ")?;
    }
    writeln!(stdout)?;
    for code in 90..=97 {
        write!(stdout, "\x1b[{code}m{code}\x1b[0m ")?;
    }
    writeln!(stdout)?;
    writeln!(stdout, "\x1b[38;5;123mcube\x1b[0m")?;
    writeln!(stdout, "\x1b[48;5;244mgray\x1b[0m")?;
    writeln!(stdout, "\x1b[38;2;255;128;0mtruecolor\x1b[0m")?;
    stdout.flush()
}
