//! Translate command - glossary-aware translation.

use std::io::Write;
use std::path::PathBuf;

use colored::Colorize;
use mocksmith::{Snapshot, WordDefinition};

use crate::cli::ProviderChoice;

#[allow(clippy::too_many_arguments)]
pub fn run(
    text: String,
    glossary: Option<PathBuf>,
    instruction: String,
    json: bool,
    provider: ProviderChoice,
    model: Option<String>,
    stream: bool,
    verbose: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let glossary: Vec<WordDefinition> = match glossary {
        Some(path) => {
            if !path.exists() {
                return Err(format!("Glossary file not found: {}", path.display()).into());
            }
            serde_json::from_str(&std::fs::read_to_string(&path)?)?
        }
        None => Vec::new(),
    };

    let engine = super::build_engine(provider, model)?;

    if verbose {
        eprintln!(
            "{} with {} glossary terms via {}",
            "Translating".cyan().bold(),
            glossary.len().to_string().white(),
            engine.provider_name()
        );
    }

    let result = if stream {
        let mut on_progress = |snapshot: Snapshot| {
            eprint!(
                "\r{} {} patterns",
                "Streaming".cyan().bold(),
                snapshot.items.len().to_string().white()
            );
            let _ = std::io::stderr().flush();
        };
        let result = engine.translate(&glossary, &instruction, &text, Some(&mut on_progress));
        eprintln!();
        result?
    } else {
        engine.translate(&glossary, &instruction, &text, None)?
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&result.translated)?);
    } else {
        println!("{} {}", "Summary:".yellow().bold(), result.translated.summary);
        for (index, pattern) in result.translated.data.iter().enumerate() {
            println!();
            println!("{} {}", format!("#{}", index + 1).white().bold(), pattern.en);
            println!("  {}", pattern.nuance.dimmed());
        }
    }

    eprintln!();
    eprintln!("Estimated cost: ${:.6}", result.price);
    Ok(())
}
