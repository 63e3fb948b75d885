//! termtext CLI: render terminal output into formatted documents.
//!
//! Renders captured bytes or a live PTY capture, resolves release index
//! URLs and prints the system requirements table.

// CLI-specific lint allowances (CLI binary, not library)
#![allow(missing_docs)]
#![allow(clippy::print_stdout)] // CLI must print to stdout
#![allow(clippy::print_stderr)] // CLI must print to stderr
#![allow(clippy::exit)] // CLI uses exit codes

use clap::{CommandFactory, Parser, Subcommand, ValueEnum};
use clap_complete::{generate, Shell};
use miette::{IntoDiagnostic, Result};
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use termtext::config::{load_config, LauncherConfig};
use termtext::model::{CaptureResult, DocumentSnapshot, TextFormat};
use termtext::release::{binary_url, index_url, parse_index};
use termtext::render::{to_html, to_plain_text};
use termtext::session::{Session, SessionConfig};
use termtext::sysreq::{requirements_table, will_run, ReleaseTarget, SystemProfile};
use termtext::terminal::Terminal;
use termtext::{ErrorCode, TermtextError, TermtextResult};
use tracing_subscriber::EnvFilter;

mod progress;

/// Color output mode
#[derive(Copy, Clone, Debug, Default, ValueEnum)]
enum ColorMode {
    /// Auto-detect based on terminal and `NO_COLOR` env
    #[default]
    Auto,
    /// Always use colors
    Always,
    /// Never use colors
    Never,
}

/// Document output format
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    /// Plain text, one line per block
    #[default]
    Text,
    /// `<pre>` element with styled spans
    Html,
    /// Document snapshot (or capture result) as JSON
    Json,
}

#[derive(Debug, Parser)]
#[command(
    name = "termtext",
    version,
    about = "Render ANSI terminal output as formatted text"
)]
struct Cli {
    /// Control color output
    #[arg(long, value_enum, default_value = "auto", global = true)]
    color: ColorMode,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Launcher configuration file (JSON, or YAML by extension)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Render captured terminal bytes
    Render {
        #[arg(long, help = "Input file (default: stdin)")]
        input: Option<PathBuf>,
        #[arg(long, value_enum, default_value = "text")]
        output: OutputFormat,
    },
    /// Run a command in a PTY and render its output
    Exec {
        #[arg(long, value_enum, default_value = "text")]
        output: OutputFormat,
        #[arg(
            long,
            default_value_t = 60_000,
            help = "Kill the command after this many milliseconds"
        )]
        timeout_ms: u64,
        #[arg(last = true, required = true)]
        command: Vec<String>,
    },
    /// Resolve the binaries listed in a release index
    Index {
        #[arg(long)]
        input: PathBuf,
        #[arg(long)]
        json: bool,
    },
    /// Check a system profile against the launcher requirements
    Sysreq {
        #[arg(long, help = "System profile (JSON)")]
        profile: PathBuf,
        #[arg(long, help = "Release target (JSON) to check compatibility with")]
        target: Option<PathBuf>,
        #[arg(long)]
        json: bool,
    },
    /// Generate shell completions for bash, zsh, or fish
    Completions {
        #[arg(value_enum, help = "Shell to generate completions for")]
        shell: Shell,
    },
}

impl Commands {
    fn json_errors(&self) -> bool {
        match self {
            Self::Render { output, .. } | Self::Exec { output, .. } => {
                *output == OutputFormat::Json
            }
            Self::Index { json, .. } | Self::Sysreq { json, .. } => *json,
            Self::Completions { .. } => false,
        }
    }
}

/// Configure color output based on CLI flag and environment
fn configure_colors(mode: ColorMode) -> bool {
    let use_color = match mode {
        ColorMode::Always => true,
        ColorMode::Never => false,
        ColorMode::Auto => {
            // Respect NO_COLOR environment variable
            if std::env::var("NO_COLOR").is_ok() {
                false
            } else {
                // Diagnostics go to stderr
                supports_color::on(supports_color::Stream::Stderr).is_some()
            }
        }
    };

    miette::set_hook(Box::new(move |_| {
        Box::new(
            miette::MietteHandlerOpts::new()
                .color(use_color)
                .unicode(use_color)
                .build(),
        )
    }))
    .ok(); // Ignore error if hook already set
    use_color
}

/// Log to stderr; `RUST_LOG` wins over `-v`.
fn init_tracing(verbose: u8, ansi: bool) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_ansi(ansi)
        .with_target(false)
        .try_init()
        .ok();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let use_color = configure_colors(cli.color);
    init_tracing(cli.verbose, use_color);
    let json = cli.command.json_errors();
    let config = cli.config.as_deref();

    let result = match cli.command {
        Commands::Render { input, output } => cmd_render(config, input.as_deref(), output),
        Commands::Exec {
            output,
            timeout_ms,
            command,
        } => cmd_exec(config, output, timeout_ms, command),
        Commands::Index { input, json } => cmd_index(config, &input, json),
        Commands::Sysreq {
            profile,
            target,
            json,
        } => cmd_sysreq(config, &profile, target.as_deref(), json),
        Commands::Completions { shell } => cmd_completions(shell),
    };

    match result {
        Ok(0) => Ok(()),
        Ok(code) => std::process::exit(code),
        Err(report) => match report.downcast_ref::<TermtextError>() {
            Some(err) => emit_error(json, err),
            None => Err(report),
        },
    }
}

// =============================================================================
// Command Handlers
// =============================================================================

/// Handle the render command.
fn cmd_render(config: Option<&Path>, input: Option<&Path>, output: OutputFormat) -> Result<i32> {
    let config = load_launcher_config(config)?;
    let bytes = match input {
        Some(path) => {
            std::fs::read(path).map_err(|err| TermtextError::io("failed to read input", err))?
        }
        None => {
            let mut bytes = Vec::new();
            io::stdin()
                .read_to_end(&mut bytes)
                .map_err(|err| TermtextError::io("failed to read stdin", err))?;
            bytes
        }
    };
    let mut terminal = Terminal::new(config.text_format()?, config.fonts.clone());
    terminal.process_bytes(&bytes);
    terminal.flush();
    emit_document(output, &terminal.snapshot(), terminal.defaults(), None)?;
    Ok(0)
}

/// Handle the exec command.
fn cmd_exec(
    config: Option<&Path>,
    output: OutputFormat,
    timeout_ms: u64,
    command: Vec<String>,
) -> Result<i32> {
    let launcher = load_launcher_config(config)?;
    let (cmd, args) = split_command(command)?;
    let defaults = launcher.text_format()?;
    let session_config = SessionConfig::new(cmd.clone())
        .args(args)
        .format(defaults.clone(), launcher.fonts.clone());

    let cancel = Arc::new(AtomicBool::new(false));
    let handler_flag = Arc::clone(&cancel);
    if let Err(err) = ctrlc::set_handler(move || handler_flag.store(true, Ordering::SeqCst)) {
        tracing::warn!(%err, "could not install interrupt handler");
    }

    let spinner = progress::CaptureSpinner::start(&cmd);
    let capture = Session::spawn(session_config).and_then(|session| {
        session.run_to_completion(Duration::from_millis(timeout_ms), Some(&cancel))
    });
    spinner.finish();
    let capture = match capture {
        Ok(capture) => capture,
        Err(err) => {
            if err.code == ErrorCode::Io && err.message.contains("open pty") {
                eprintln!(
                    "warning: PTY support appears unavailable; this is common in minimal containers"
                );
            }
            return Err(err.into());
        }
    };

    emit_document(output, &capture.document, &defaults, Some(&capture))?;

    let status = &capture.exit_status;
    if status.success {
        return Ok(0);
    }
    if output != OutputFormat::Json {
        let code = status
            .exit_code
            .map_or_else(|| "none".to_string(), |code| code.to_string());
        eprintln!(
            "error: {}: command exited unsuccessfully (exit code {code})",
            ErrorCode::ProcessExit
        );
    }
    Ok(ErrorCode::ProcessExit.exit_code())
}

/// Handle the index command.
fn cmd_index(config: Option<&Path>, input: &Path, json: bool) -> Result<i32> {
    let config = load_launcher_config(config)?;
    let body =
        std::fs::read(input).map_err(|err| TermtextError::io("failed to read index", err))?;
    let names = parse_index(&body)?;
    if json {
        let binaries: Vec<serde_json::Value> = names
            .iter()
            .map(|name| serde_json::json!({ "name": name, "url": binary_url(&config, name) }))
            .collect();
        let payload = serde_json::json!({
            "index_url": index_url(&config),
            "binaries": binaries,
        });
        println!("{}", serde_json::to_string(&payload).into_diagnostic()?);
    } else {
        for name in &names {
            println!("{}", binary_url(&config, name));
        }
    }
    Ok(0)
}

/// Handle the sysreq command.
fn cmd_sysreq(
    config: Option<&Path>,
    profile: &Path,
    target: Option<&Path>,
    json: bool,
) -> Result<i32> {
    let config = load_launcher_config(config)?;
    let profile: SystemProfile = read_json(profile, "system profile")?;
    let target: Option<ReleaseTarget> = target
        .map(|path| read_json(path, "release target"))
        .transpose()?;

    let rows = requirements_table(&profile, &config.requirements);
    let runs = target.as_ref().map(|target| will_run(&profile, target));

    if json {
        let payload = serde_json::json!({ "rows": rows, "will_run": runs });
        println!("{}", serde_json::to_string(&payload).into_diagnostic()?);
    } else {
        let name_width = rows.iter().map(|row| row.name.len()).max().unwrap_or(0);
        let required_width = rows.iter().map(|row| row.required.len()).max().unwrap_or(0);
        for row in &rows {
            let mark = if row.satisfied { "ok" } else { "--" };
            println!(
                "{mark} {:<name_width$}  {:<required_width$}  {}",
                row.name, row.required, row.actual
            );
        }
        if let Some(runs) = runs {
            println!("will run: {}", if runs { "yes" } else { "no" });
        }
    }
    // Exit 1 when the target cannot run here.
    Ok(i32::from(runs == Some(false)))
}

/// Handle the completions command.
#[allow(clippy::unnecessary_wraps)] // Consistent with other command handlers
fn cmd_completions(shell: Shell) -> Result<i32> {
    let mut cmd = Cli::command();
    let name = cmd.get_name().to_string();
    generate(shell, &mut cmd, name, &mut io::stdout());
    Ok(0)
}

// =============================================================================
// Helpers
// =============================================================================

fn load_launcher_config(path: Option<&Path>) -> TermtextResult<LauncherConfig> {
    match path {
        Some(path) => load_config(path),
        None => Ok(LauncherConfig::default()),
    }
}

fn read_json<T: serde::de::DeserializeOwned>(path: &Path, what: &str) -> TermtextResult<T> {
    let data = std::fs::read_to_string(path)
        .map_err(|err| TermtextError::io(format!("failed to read {what}"), err))?;
    serde_json::from_str(&data).map_err(|err| {
        TermtextError::protocol(
            format!("failed to parse {what}"),
            serde_json::json!({ "source": err.to_string() }),
        )
    })
}

fn split_command(mut command: Vec<String>) -> TermtextResult<(String, Vec<String>)> {
    if command.is_empty() {
        return Err(TermtextError::cli_invalid_arg("missing command"));
    }
    let cmd = command.remove(0);
    Ok((cmd, command))
}

fn emit_document(
    output: OutputFormat,
    snapshot: &DocumentSnapshot,
    defaults: &TextFormat,
    capture: Option<&CaptureResult>,
) -> Result<()> {
    match output {
        OutputFormat::Text => {
            let text = to_plain_text(snapshot);
            if text.is_empty() || text.ends_with('\n') {
                print!("{text}");
            } else {
                println!("{text}");
            }
        }
        OutputFormat::Html => print!("{}", to_html(snapshot, defaults)),
        OutputFormat::Json => {
            let payload = match capture {
                Some(capture) => serde_json::to_string(capture),
                None => serde_json::to_string(snapshot),
            }
            .into_diagnostic()?;
            println!("{payload}");
        }
    }
    Ok(())
}

fn emit_error(json: bool, err: &TermtextError) -> Result<()> {
    if json {
        let payload = serde_json::to_string(&err.to_error_info()).into_diagnostic()?;
        println!("{payload}");
    } else {
        eprintln!("error: {err}");
    }
    std::process::exit(exit_code_for_error(err));
}

fn exit_code_for_error(err: &TermtextError) -> i32 {
    err.exit_code()
}
