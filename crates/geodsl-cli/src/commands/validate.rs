//! Validate command
//!
//! Usage: geodsl validate <EXPR>...

use clap::Args;
use geodsl_core::AlgebraProcessor;

#[derive(Debug, Args)]
pub struct ValidateArgs {
    /// Expressions to check
    #[arg(required = true)]
    pub expressions: Vec<String>,
}

/// Execute validate command
///
/// Prints `<expr>: <problem>` for every problem found.
pub fn execute(
    args: ValidateArgs,
    algebra: &AlgebraProcessor,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut total = 0usize;
    for expression in &args.expressions {
        let problems = algebra.validate_expression(expression);
        for problem in &problems {
            println!("{}: {}", expression, problem);
        }
        total += problems.len();
    }

    if total > 0 {
        return Err(format!("{} problem(s) found", total).into());
    }
    println!("ok");
    Ok(())
}
