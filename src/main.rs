use std::io::{self, Write};
use std::path::PathBuf;
use std::{env, process};

use lox::Lox;
use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;

fn history_path() -> Option<PathBuf> {
    home::home_dir().map(|home| home.join(".lox_history"))
}

fn run_file(path: &str) -> process::ExitCode {
    let mut lox = Lox::new(Box::new(io::stdout()));

    lox.run_file(path).unwrap_or_else(|error| panic!("Should have been able to read the file '{path}': {error}"));

    if lox.had_error() {
        process::ExitCode::from(65)
    } else if lox.had_runtime_error() {
        process::ExitCode::from(70)
    } else {
        process::ExitCode::SUCCESS
    }
}

/// Reads one line at a time, running it immediately and clearing error
/// state before the next prompt. An empty line is ignored — it neither
/// runs nor reprints the prompt early.
fn run_prompt() -> process::ExitCode {
    let mut lox = Lox::new(Box::new(io::stdout()));
    let mut editor = DefaultEditor::new().expect("failed to initialize the line editor");

    let history = history_path();
    if let Some(path) = &history {
        let _ = editor.load_history(path);
    }

    loop {
        match editor.readline("> ") {
            Ok(line) => {
                if line.trim().is_empty() {
                    continue;
                }

                let _ = editor.add_history_entry(&line);
                lox.run(&line);
                lox.reset_errors();
            }
            Err(ReadlineError::Interrupted | ReadlineError::Eof) => break,
            Err(error) => {
                log::error!("readline error: {error}");
                break;
            }
        }
    }

    if let Some(path) = &history {
        let _ = editor.save_history(path);
    }

    process::ExitCode::SUCCESS
}

fn main() -> process::ExitCode {
    env_logger::init();

    let args: Vec<String> = env::args().collect();

    match args.len() {
        1 => run_prompt(),
        2 => run_file(&args[1]),
        _ => {
            println!("Usage: lox [script]");
            io::stdout().flush().ok();
            process::ExitCode::from(64)
        }
    }
}
