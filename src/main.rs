//! CLI tool to compile hybrid Python/shell sources and run them.

use std::fs;
use std::io::{self, IsTerminal, Read as _, Write as _};
use std::process::{Command, ExitCode, Stdio};

use log::{LevelFilter, debug};
use simplelog::{ColorChoice, Config, TermLogger, TerminalMode};

use pybang::Options;

struct Cli {
    source: String,
    /// Where the compiled Python goes: a path, `-` for stdout, or
    /// nothing, in which case the program is compiled and run.
    output: Option<String>,
    dry_run: bool,
    verbose: bool,
    /// Arguments forwarded to the compiled program when it is run.
    script_args: Vec<String>,
}

fn usage() -> ExitCode {
    eprintln!("Usage: pybang [options] <source> [args...]");
    eprintln!();
    eprintln!("Compiles <source> (or stdin with `-`) to Python. Without -o or -p,");
    eprintln!("the compiled program is run immediately with [args...].");
    eprintln!();
    eprintln!("Options:");
    eprintln!("  -o, --output <file>  Write the compiled program to <file> (`-` for stdout)");
    eprintln!("  -p, --python         Write the compiled program next to the source, with .py");
    eprintln!("  -n, --dry-run        Prefix every command with echo instead of running it");
    eprintln!("  -v, --verbose        Enable debug logging");
    eprintln!("  -h, --help           Show this help");
    ExitCode::from(2)
}

fn parse_cli() -> Result<Cli, Option<String>> {
    let args: Vec<String> = std::env::args().skip(1).collect();
    let mut source = None;
    let mut output = None;
    let mut python_output = false;
    let mut dry_run = false;
    let mut verbose = false;
    let mut script_args = Vec::new();

    let mut it = args.into_iter();
    while let Some(arg) = it.next() {
        if source.is_some() {
            // Everything after the source belongs to the program.
            script_args.push(arg);
            continue;
        }
        match arg.as_str() {
            "-h" | "--help" => return Err(None),
            "-o" | "--output" => {
                output = Some(
                    it.next()
                        .ok_or_else(|| Some(format!("{arg} needs a file argument")))?,
                );
            }
            "-p" | "--python" => python_output = true,
            "-n" | "--dry-run" => dry_run = true,
            "-v" | "--verbose" => verbose = true,
            "-" => source = Some(arg),
            _ if arg.starts_with('-') => {
                return Err(Some(format!("unknown option: {arg}")));
            }
            _ => source = Some(arg),
        }
    }

    let source = source.ok_or_else(|| Some("no source given".to_string()))?;
    if python_output && output.is_none() {
        output = Some(format!("{source}.py"));
    }
    Ok(Cli {
        source,
        output,
        dry_run,
        verbose,
        script_args,
    })
}

fn read_source(path: &str) -> io::Result<String> {
    if path == "-" {
        let mut buf = String::new();
        io::stdin().read_to_string(&mut buf)?;
        Ok(buf)
    } else {
        fs::read_to_string(path)
    }
}

/// Run the compiled program through `python3 -`, forwarding the
/// script arguments, and report its exit status.
fn run_compiled(code: &str, script_args: &[String]) -> io::Result<ExitCode> {
    let mut child = Command::new("python3")
        .arg("-")
        .args(script_args)
        .stdin(Stdio::piped())
        .spawn()?;
    if let Some(mut stdin) = child.stdin.take() {
        stdin.write_all(code.as_bytes())?;
    }
    let status = child.wait()?;
    debug!("program exited with {status}");
    Ok(status
        .code()
        .map_or(ExitCode::FAILURE, |code| {
            ExitCode::from(u8::try_from(code).unwrap_or(1))
        }))
}

fn main() -> ExitCode {
    let cli = match parse_cli() {
        Ok(cli) => cli,
        Err(message) => {
            if let Some(message) = message {
                eprintln!("Error: {message}");
                eprintln!();
            }
            return usage();
        }
    };

    let _ = TermLogger::init(
        if cli.verbose {
            LevelFilter::Debug
        } else {
            LevelFilter::Warn
        },
        Config::default(),
        TerminalMode::Stderr,
        ColorChoice::Auto,
    );

    let source = match read_source(&cli.source) {
        Ok(source) => source,
        Err(e) => {
            eprintln!("{}: {e}", cli.source);
            return ExitCode::FAILURE;
        }
    };

    let opts = Options {
        dry_run: cli.dry_run,
        color: cli.output.as_deref() == Some("-") && io::stdout().is_terminal(),
    };
    let code = match pybang::compile_str(&source, &opts) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("{}: {e}", cli.source);
            return ExitCode::FAILURE;
        }
    };

    match cli.output.as_deref() {
        Some("-") => {
            print!("{code}");
            ExitCode::SUCCESS
        }
        Some(path) => {
            if let Err(e) = fs::write(path, &code) {
                eprintln!("{path}: {e}");
                return ExitCode::FAILURE;
            }
            eprintln!("Compiled to {path}");
            ExitCode::SUCCESS
        }
        None => match run_compiled(&code, &cli.script_args) {
            Ok(status) => status,
            Err(e) => {
                eprintln!("python3: {e}");
                ExitCode::FAILURE
            }
        },
    }
}
