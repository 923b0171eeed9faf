//! Catalog commands
//!
//! Usage: geodsl commands [--category <CATEGORY>] [--categories]
//!        geodsl syntax <NAME>

use clap::Args;
use geodsl_core::{AlgebraProcessor, Category};

#[derive(Debug, Args)]
pub struct CommandsArgs {
    /// Restrict to one category (tag or display name, any case)
    #[arg(short, long)]
    pub category: Option<String>,

    /// List the categories instead of the commands
    #[arg(long, conflicts_with = "category")]
    pub categories: bool,
}

#[derive(Debug, Args)]
pub struct SyntaxArgs {
    /// Command name (case-sensitive)
    pub name: String,
}

/// Execute commands command
pub fn execute_commands(
    args: CommandsArgs,
    algebra: &AlgebraProcessor,
) -> Result<(), Box<dyn std::error::Error>> {
    if args.categories {
        for category in Category::ALL {
            println!(
                "{:<16} {}",
                category.tag(),
                algebra.get_sub_command_set_name(category)
            );
        }
        return Ok(());
    }

    let category = args
        .category
        .as_deref()
        .map(str::parse::<Category>)
        .transpose()?;
    for name in algebra.list_available_commands(category) {
        println!("{}", name);
    }
    Ok(())
}

/// Execute syntax command
pub fn execute_syntax(
    args: SyntaxArgs,
    algebra: &AlgebraProcessor,
) -> Result<(), Box<dyn std::error::Error>> {
    let syntax = algebra
        .get_command_syntax(&args.name)
        .ok_or_else(|| format!("Unknown command: {}", args.name))?;
    println!("{}", syntax);
    Ok(())
}
