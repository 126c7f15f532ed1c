use anyhow::{Result, bail};
use clap::Subcommand;

use crate::CliLedger;

#[derive(Subcommand, Debug)]
pub enum CategoriesCommand {
    /// Show the category list
    List,

    /// Add a category name
    Add { name: String },
}

#[derive(Subcommand, Debug)]
pub enum RulesCommand {
    /// Show keyword rules in the order they are checked
    List,

    /// Map descriptions containing KEYWORD to CATEGORY on manual entry
    Add { keyword: String, category: String },

    /// Drop the rule for KEYWORD
    Remove { keyword: String },
}

pub fn categories(ledger: &mut CliLedger, command: CategoriesCommand) -> Result<()> {
    match command {
        CategoriesCommand::List => {
            for name in ledger.categories() {
                println!("{name}");
            }
        }
        CategoriesCommand::Add { name } => {
            if ledger.add_category(&name) {
                println!("Added category {}", name.trim());
            } else {
                println!("Category {name:?} not added (empty or already listed)");
            }
        }
    }
    Ok(())
}

pub fn rules(ledger: &mut CliLedger, command: RulesCommand) -> Result<()> {
    match command {
        RulesCommand::List => {
            if ledger.rules().is_empty() {
                println!("No rules.");
            }
            for rule in ledger.rules().iter() {
                println!("{:<20} -> {}", rule.keyword, rule.category);
            }
        }
        RulesCommand::Add { keyword, category } => {
            if !ledger.categories().iter().any(|c| *c == category) {
                tracing::warn!(%category, "rule targets a category that is not in the list");
            }
            if !ledger.add_rule(&keyword, &category) {
                bail!("rule keyword must not be empty");
            }
            println!("{} -> {}", keyword.trim().to_lowercase(), category);
        }
        RulesCommand::Remove { keyword } => match ledger.remove_rule(&keyword) {
            Some(category) => println!("Removed {keyword} -> {category}"),
            None => println!("No rule for {keyword:?}"),
        },
    }
    Ok(())
}
