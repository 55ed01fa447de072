//! Mocksmith CLI - structured generation from the command line.

mod cli;
mod commands;

use clap::Parser;
use cli::{Cli, Commands};

fn main() {
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Generate {
            schema,
            request,
            output,
            format,
            provider,
            model,
            stream,
            date_order,
        } => commands::generate::run(
            schema,
            request,
            output,
            format,
            provider,
            model,
            stream,
            date_order,
            cli.verbose,
        ),

        Commands::Requirements {
            system,
            request,
            json,
            provider,
            model,
            stream,
        } => commands::requirements::run(system, request, json, provider, model, stream, cli.verbose),

        Commands::Translate {
            text,
            glossary,
            instruction,
            json,
            provider,
            model,
            stream,
        } => commands::translate::run(
            text,
            glossary,
            instruction,
            json,
            provider,
            model,
            stream,
            cli.verbose,
        ),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
