//! Keywords command - inspect and train the keyword dictionary.

use std::path::{Path, PathBuf};

use clap::{Args, Subcommand};
use console::style;

/// Arguments for the keywords command.
#[derive(Args)]
pub struct KeywordsArgs {
    /// Keyword override file
    #[arg(short, long, global = true)]
    keywords: Option<PathBuf>,

    #[command(subcommand)]
    command: KeywordsCommand,
}

#[derive(Subcommand)]
enum KeywordsCommand {
    /// List keywords per field
    List {
        /// Only show this field
        #[arg(short, long)]
        field: Option<String>,

        /// Print the dictionary as JSON
        #[arg(long)]
        json: bool,
    },

    /// Teach a new keyword for a field and persist it
    Add {
        /// Canonical field name (e.g., "roll_no")
        field: String,
        /// Label keyword (e.g., "Roll Number")
        keyword: String,
    },

    /// Show the keyword override file path
    Path,
}

pub fn run(args: KeywordsArgs, config_path: Option<&Path>) -> anyhow::Result<()> {
    let config = super::load_config(config_path)?;
    let path = super::keywords_path(args.keywords.as_deref(), &config);

    match args.command {
        KeywordsCommand::List { field, json } => {
            list_keywords(&config, &path, field.as_deref(), json)
        }
        KeywordsCommand::Add { field, keyword } => add_keyword(&config, &path, &field, &keyword),
        KeywordsCommand::Path => show_path(&path),
    }
}

fn list_keywords(
    config: &fieldex_core::FieldexConfig,
    path: &Path,
    field: Option<&str>,
    json: bool,
) -> anyhow::Result<()> {
    let extractor = super::build_extractor(config, Some(path));
    let dictionary = extractor.keyword_dictionary();

    if let Some(field) = field {
        let keywords = dictionary
            .keywords(field)
            .ok_or_else(|| anyhow::anyhow!("Unknown field: {}", field))?;

        if json {
            println!("{}", serde_json::to_string_pretty(keywords)?);
        } else {
            for keyword in keywords {
                println!("{}", keyword);
            }
        }
        return Ok(());
    }

    if json {
        println!("{}", serde_json::to_string_pretty(dictionary)?);
        return Ok(());
    }

    for (name, keywords) in dictionary.iter() {
        println!("{}: {}", style(name).bold(), keywords.join(", "));
    }

    let trained = extractor.overrides().len();
    if trained > 0 {
        println!();
        println!(
            "{} {} fields with trained keywords from {}",
            style("ℹ").blue(),
            trained,
            path.display()
        );
    }

    Ok(())
}

fn add_keyword(
    config: &fieldex_core::FieldexConfig,
    path: &Path,
    field: &str,
    keyword: &str,
) -> anyhow::Result<()> {
    if field.trim().is_empty() || keyword.trim().is_empty() {
        anyhow::bail!("Field and keyword must not be empty");
    }

    let mut extractor = super::build_extractor(config, Some(path));

    if !extractor.add_keyword(field, keyword) {
        anyhow::bail!(
            "Failed to save keyword '{}' for field '{}' to {}",
            keyword,
            field,
            path.display()
        );
    }

    println!(
        "{} Added '{}' to {} ({})",
        style("✓").green(),
        keyword.trim().to_lowercase(),
        field.trim().to_lowercase(),
        path.display()
    );

    Ok(())
}

fn show_path(path: &Path) -> anyhow::Result<()> {
    println!("Keyword file: {}", path.display());

    if path.exists() {
        println!("Status: {}", style("exists").green());
    } else {
        println!("Status: {}", style("not created").yellow());
        println!();
        println!("Run 'fieldex keywords add FIELD KEYWORD' to train a keyword.");
    }

    Ok(())
}
