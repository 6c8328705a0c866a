//! twig - a tiny tree-walking shell
//!
//! Usage:
//!   twig              Start interactive REPL
//!   twig -c "cmd"     Execute a single command
//!   twig script.twig  Execute a script file

use std::env;
use std::fs;
use std::process::ExitCode;

use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;
use twig::ExitStatus;

const VERSION: &str = env!("CARGO_PKG_VERSION");

fn print_help() {
    println!(
        r#"twig {} - a tiny tree-walking shell

USAGE:
    twig                    Start interactive REPL
    twig -c <command>       Execute a single command
    twig <script>           Execute a script file
    twig --help             Show this help message
    twig --version          Show version

SYNTAX:
    cmd args...             Run a command
    a ; b                   Run a, then b
    a && b                  Run b only if a succeeded
    a || b                  Run b only if a failed
    a | b                   Pipe a's output into b
    a & b                   Run a and b concurrently
    cmd < in > out 2> err   Redirections (>> and 2>> append, &> both)
    NAME=value              Set a shell variable
    cd, pwd, exit, quit     Builtins"#,
        VERSION
    );
}

/// Parse command-line arguments
struct CliArgs {
    command: Option<String>,
    script: Option<String>,
    help: bool,
    version: bool,
}

fn parse_args(args: &[String]) -> CliArgs {
    let mut cli = CliArgs {
        command: None,
        script: None,
        help: false,
        version: false,
    };

    let mut i = 1; // Skip program name
    while i < args.len() {
        match args[i].as_str() {
            "-c" => {
                // Everything after -c is the command
                if i + 1 < args.len() {
                    cli.command = Some(args[i + 1..].join(" "));
                    break;
                }
            }
            "--help" | "-h" => {
                cli.help = true;
            }
            "--version" | "-V" => {
                cli.version = true;
            }
            path => {
                if !path.starts_with('-') {
                    cli.script = Some(path.to_string());
                }
            }
        }
        i += 1;
    }

    cli
}

fn main() -> ExitCode {
    let args: Vec<String> = env::args().collect();
    let cli = parse_args(&args);

    if cli.help {
        print_help();
        return ExitCode::SUCCESS;
    }

    if cli.version {
        println!("twig {}", VERSION);
        return ExitCode::SUCCESS;
    }

    if let Some(cmd) = cli.command {
        return execute_command(&cmd);
    }

    if let Some(script) = cli.script {
        return execute_script(&script);
    }

    match run_repl() {
        Ok(status) => ExitCode::from(status.exit_code()),
        Err(e) => {
            eprintln!("REPL error: {}", e);
            ExitCode::FAILURE
        }
    }
}

/// Execute a single command line
fn execute_command(cmd: &str) -> ExitCode {
    match twig::run(cmd) {
        Ok(status) => ExitCode::from(status.exit_code()),
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

/// Execute a script file, one command line at a time
fn execute_script(path: &str) -> ExitCode {
    let content = match fs::read_to_string(path) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Error reading {}: {}", path, e);
            return ExitCode::FAILURE;
        }
    };

    let mut last = ExitStatus::SUCCESS;
    for (line_num, line) in content.lines().enumerate() {
        if line.trim().is_empty() {
            continue;
        }
        match twig::run(line) {
            Ok(ExitStatus::TerminateShell) => break,
            Ok(status) => last = status,
            Err(e) => {
                eprintln!("Error at line {}: {}", line_num + 1, e);
                return ExitCode::FAILURE;
            }
        }
    }
    ExitCode::from(last.exit_code())
}

/// Run the interactive REPL
fn run_repl() -> rustyline::Result<ExitStatus> {
    let mut rl = DefaultEditor::new()?;
    let mut last = ExitStatus::SUCCESS;

    loop {
        match rl.readline("twig$ ") {
            Ok(line) => {
                let trimmed = line.trim();
                if trimmed.is_empty() {
                    continue;
                }
                let _ = rl.add_history_entry(trimmed);
                match twig::run(trimmed) {
                    Ok(ExitStatus::TerminateShell) => break,
                    Ok(status) => last = status,
                    Err(e) => {
                        eprintln!("Error: {}", e);
                        last = ExitStatus::Code(2);
                    }
                }
            }
            Err(ReadlineError::Interrupted) => continue,
            Err(ReadlineError::Eof) => break,
            Err(e) => return Err(e),
        }
    }

    Ok(last)
}
