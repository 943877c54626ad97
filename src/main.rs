use std::path::PathBuf;

use clap::Parser as ClapParser;

use lox_interpreter as lox;

use lox::Lox;

#[derive(ClapParser, Debug)]
#[command(version, about = "Tree-walking interpreter for the Lox language", long_about = None)]
struct Cli {
    /// Path to a script to run; omit to start the interactive prompt
    script: Vec<PathBuf>,
}

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let args: Cli = Cli::parse();

    let mut lox = Lox::new();

    match args.script.as_slice() {
        [] => lox.run_prompt()?,

        [script] => {
            lox.run_file(script)?;

            if lox.had_error() {
                std::process::exit(65);
            }

            if lox.had_runtime_error() {
                std::process::exit(70);
            }
        }

        _ => {
            eprintln!("Usage: lox-interpreter [script]");
            std::process::exit(64);
        }
    }

    Ok(())
}
