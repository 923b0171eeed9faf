//! GeoDSL CLI
//!
//! Command-line interface for the GeoDSL evaluation engine

use clap::{Parser, Subcommand};
use std::path::PathBuf;

mod commands;

#[derive(Debug, Parser)]
#[command(name = "geodsl")]
#[command(about = "GeoDSL - Evaluate geometry and algebra commands", long_about = None)]
struct Cli {
    /// Session profile (TOML, or JSON with a .json extension)
    #[arg(long, global = true, value_name = "FILE")]
    profile: Option<PathBuf>,

    /// Human-readable debug logging on stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Evaluate expressions in one session
    Eval(commands::eval::EvalArgs),
    /// Run a script, one command per line
    Run(commands::script::RunArgs),
    /// List commands, optionally by category
    Commands(commands::catalog::CommandsArgs),
    /// Show the syntax hint of a command
    Syntax(commands::catalog::SyntaxArgs),
    /// Check expressions without evaluating them
    Validate(commands::validate::ValidateArgs),
}

fn main() {
    let cli = Cli::parse();

    let result = commands::open_session(cli.profile.as_deref(), cli.verbose).and_then(|algebra| {
        match cli.command {
            Commands::Eval(args) => commands::eval::execute(args, algebra),
            Commands::Run(args) => commands::script::execute(args, algebra),
            Commands::Commands(args) => commands::catalog::execute_commands(args, &algebra),
            Commands::Syntax(args) => commands::catalog::execute_syntax(args, &algebra),
            Commands::Validate(args) => commands::validate::execute(args, &algebra),
        }
    });

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
