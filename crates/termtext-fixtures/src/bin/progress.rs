//! Fixture: redraws a colored progress line with carriage returns.
//!
//! Usage:
//!   termtext-progress [steps] [exit_code]
//!
//! Prints `steps` frames of `fetch <n>%` on one line (default 4), then
//! `done` in green, and exits with `exit_code` (default 0).

// Test fixtures require special allowances - they are not production code
#![allow(clippy::print_stdout)]
#![allow(clippy::exit)]

use std::io::{self, Write};
use std::time::Duration;

fn main() -> io::Result<()> {
    let args: Vec<String> = std::env::args().collect();
    let steps: u32 = args.get(1).and_then(|arg| arg.parse().ok()).unwrap_or(4).max(1);
    let exit_code: i32 = args.get(2).and_then(|arg| arg.parse().ok()).unwrap_or(0);

    let mut stdout = io::stdout();
    for step in 1..=steps {
        let percent = step * 100 / steps;
        write!(stdout, "\rfetch \x1b[1;33m{percent:>3}%\x1b[0m")?;
        stdout.flush()?;
        std::thread::sleep(Duration::from_millis(10));
    }
    write!(stdout, "\r\n\x1b[32mdone\x1b[0m\r\n")?;
    stdout.flush()?;

    if exit_code != 0 {
        std::process::exit(exit_code);
    }
    Ok(())
}
