//! Requirements command - informal request to bilingual requirement definitions.

use std::io::Write;

use colored::Colorize;
use mocksmith::{RequirementKind, Snapshot};

use crate::cli::ProviderChoice;

pub fn run(
    system: String,
    request: String,
    json: bool,
    provider: ProviderChoice,
    model: Option<String>,
    stream: bool,
    verbose: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let engine = super::build_engine(provider, model)?;

    if verbose {
        eprintln!(
            "{} via {}",
            "Analyzing requirements".cyan().bold(),
            engine.provider_name()
        );
    }

    let result = if stream {
        let mut on_progress = |snapshot: Snapshot| {
            eprint!(
                "\r{} {} categories",
                "Streaming".cyan().bold(),
                snapshot.items.len().to_string().white()
            );
            let _ = std::io::stderr().flush();
        };
        let result = engine.analyze_requirements(&system, &request, Some(&mut on_progress));
        eprintln!();
        result?
    } else {
        engine.analyze_requirements(&system, &request, None)?
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&result.analysis)?);
    } else {
        println!("{} {}", "Summary:".yellow().bold(), result.analysis.summary);
        for definition in &result.analysis.requirement_definitions {
            println!();
            println!("{}", definition.category.white().bold());
            for item in &definition.items {
                println!("  [{}]", kind_label(item.kind).cyan());
                println!("    {}", item.ja);
                println!("    {}", item.en.dimmed());
            }
        }
    }

    eprintln!();
    eprintln!("Estimated cost: ${:.6}", result.price);
    Ok(())
}

fn kind_label(kind: RequirementKind) -> &'static str {
    match kind {
        RequirementKind::Functional => "functional",
        RequirementKind::NonFunctional => "non-functional",
        RequirementKind::Note => "note",
        RequirementKind::ExampleCode => "example-code",
    }
}
