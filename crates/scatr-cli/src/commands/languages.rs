//! Languages command implementation.

use anyhow::Result;
use scatr_core::LanguageTable;

use crate::config_resolver::ConfigSource;

/// Runs the languages command.
pub fn run(source: &ConfigSource) -> Result<()> {
    let table = source.load()?.languages();
    print_table(&table);
    Ok(())
}

fn print_table(table: &LanguageTable) {
    println!("Known languages:\n");
    println!("{:<12} {:<24} Comment prefixes", "Name", "Extensions");
    println!("{}", "-".repeat(64));

    for language in table.iter() {
        println!(
            "{:<12} {:<24} {}",
            language.name,
            language.extensions.join(", "),
            language.comment_prefixes.join(" ")
        );
    }

    println!("\nAdd or override a language in scatr.toml, e.g.:");
    println!("  [languages.nix]");
    println!("  extensions = [\"nix\"]");
    println!("  comment_prefixes = [\"#\"]");
}
