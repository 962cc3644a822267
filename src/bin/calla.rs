use std::{fs, path::PathBuf, process};

use clap::Parser;

use calla::{CallaError, Interpreter, Repl};

#[derive(Parser)]
#[command(author, version, about = "Calla command-script interpreter")]
struct Args {
    /// Script to run in batch mode; omit it to start an interactive session
    script: Option<PathBuf>,
}

fn main() -> Result<(), CallaError> {
    let args = Args::parse();
    match args.script {
        Some(script) => {
            run_script(script);
            Ok(())
        }
        None => {
            let mut repl = Repl::new();
            repl.run()
        }
    }
}

fn run_script(path: PathBuf) {
    let source = match fs::read_to_string(&path) {
        Ok(source) => source,
        Err(err) => {
            eprintln!("cannot read script `{}`: {err}", path.display());
            process::exit(1);
        }
    };
    let mut interpreter = Interpreter::new();
    interpreter.run(&source);
}
