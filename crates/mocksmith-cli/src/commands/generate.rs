//! Generate command - mock table data from a column schema.

use std::io::Write;
use std::path::PathBuf;

use colored::Colorize;
use mocksmith::{table_to_csv, ColumnDefinition, FormatConfig, Snapshot};

use crate::cli::{DateOrderChoice, OutputFormat, ProviderChoice};

#[allow(clippy::too_many_arguments)]
pub fn run(
    schema: PathBuf,
    request: String,
    output: Option<PathBuf>,
    format: OutputFormat,
    provider: ProviderChoice,
    model: Option<String>,
    stream: bool,
    date_order: DateOrderChoice,
    verbose: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    if !schema.exists() {
        return Err(format!("Schema file not found: {}", schema.display()).into());
    }
    let schema_text = std::fs::read_to_string(&schema)?;
    let definitions: Vec<ColumnDefinition> = serde_json::from_str(&schema_text)?;

    let engine = super::build_engine(provider, model)?;

    eprintln!(
        "{} {} columns via {}",
        "Generating".cyan().bold(),
        definitions.len().to_string().white(),
        engine.provider_name()
    );
    if verbose {
        for def in &definitions {
            eprintln!(
                "  {:20} {:10} {}",
                def.key,
                def.value_type.to_string(),
                if def.required { "required" } else { "optional" }
            );
        }
    }

    let result = if stream {
        let mut on_progress = |snapshot: Snapshot| {
            eprint!(
                "\r{} {} rows",
                "Streaming".cyan().bold(),
                snapshot.items.len().to_string().white()
            );
            let _ = std::io::stderr().flush();
        };
        let result = engine.generate_table_data(&definitions, &request, Some(&mut on_progress));
        eprintln!();
        result?
    } else {
        engine.generate_table_data(&definitions, &request, None)?
    };

    eprintln!(
        "{} {} rows (${:.6})",
        "Generated".green().bold(),
        result.table.data.len().to_string().white().bold(),
        result.price
    );
    if !result.table.summary.is_empty() {
        eprintln!("{} {}", "Summary:".yellow().bold(), result.table.summary);
    }

    let rendered = match format {
        OutputFormat::Csv => {
            let config = FormatConfig {
                date_order: date_order.into(),
                ..FormatConfig::default()
            };
            table_to_csv(&result.table, &definitions, &config)?
        }
        OutputFormat::Json => serde_json::to_string_pretty(&result.table)?,
    };

    match output {
        Some(path) => {
            std::fs::write(&path, rendered)?;
            eprintln!(
                "{} {}",
                "Saved to".green().bold(),
                path.display().to_string().white()
            );
        }
        None => println!("{}", rendered),
    }

    Ok(())
}
