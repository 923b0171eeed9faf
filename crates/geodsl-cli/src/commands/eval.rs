//! Eval command
//!
//! Usage: geodsl eval <EXPR>... [--elements]

use clap::Args;
use geodsl_core::AlgebraProcessor;

use super::render;

#[derive(Debug, Args)]
pub struct EvalArgs {
    /// Expressions, evaluated in order against one construction
    #[arg(required = true)]
    pub expressions: Vec<String>,

    /// Print the labeled elements after evaluation
    #[arg(long)]
    pub elements: bool,
}

/// Execute eval command
///
/// Prints one JSON line per expression and stops at the first failure.
pub fn execute(
    args: EvalArgs,
    mut algebra: AlgebraProcessor,
) -> Result<(), Box<dyn std::error::Error>> {
    let sliders = algebra.autocreate_sliders();
    for expression in &args.expressions {
        let result =
            algebra.process_algebra_command_no_exception_handling(expression, sliders, None)?;
        println!("{}", render(&result)?);
    }

    if args.elements {
        print_elements(&algebra)?;
    }
    Ok(())
}

/// `label = [...]` per binding, in definition order
pub(crate) fn print_elements(algebra: &AlgebraProcessor) -> Result<(), serde_json::Error> {
    for (label, result) in algebra.get_all_elements() {
        println!("{} = {}", label, render(&result)?);
    }
    Ok(())
}
