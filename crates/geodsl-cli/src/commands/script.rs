//! Run command
//!
//! Usage: geodsl run <SCRIPT> [--keep-going] [--elements]
//!
//! Scripts hold one command per line; blank lines and lines starting with
//! `#` are skipped.

use clap::Args;
use geodsl_core::AlgebraProcessor;
use std::path::PathBuf;

use super::eval::print_elements;
use super::render;

#[derive(Debug, Args)]
pub struct RunArgs {
    /// Script file
    pub script: PathBuf,

    /// Record failing lines and continue instead of stopping
    #[arg(short, long)]
    pub keep_going: bool,

    /// Print the labeled elements after the run
    #[arg(long)]
    pub elements: bool,
}

/// Execute run command
pub fn execute(args: RunArgs, mut algebra: AlgebraProcessor) -> Result<(), Box<dyn std::error::Error>> {
    let source = std::fs::read_to_string(&args.script)?;
    let sliders = algebra.autocreate_sliders();
    let mut failures = 0usize;

    for (index, line) in source.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        match algebra.process_algebra_command_no_exception_handling(line, sliders, None) {
            Ok(result) => println!("{}", render(&result)?),
            Err(e) if args.keep_going => {
                eprintln!("line {}: {}", index + 1, e);
                failures += 1;
            }
            Err(e) => return Err(format!("line {}: {}", index + 1, e).into()),
        }
    }

    if args.elements {
        print_elements(&algebra)?;
    }

    if failures > 0 {
        return Err(format!("{} line(s) failed", failures).into());
    }
    Ok(())
}
