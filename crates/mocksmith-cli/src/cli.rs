//! CLI argument definitions using clap.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

/// Mocksmith: LLM-backed structured generation
#[derive(Parser)]
#[command(name = "mocksmith")]
#[command(version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Generate mock table data from a column schema
    Generate {
        /// Path to the column schema (JSON array of column definitions)
        #[arg(value_name = "SCHEMA")]
        schema: PathBuf,

        /// Natural-language description of the data to generate
        #[arg(value_name = "REQUEST")]
        request: String,

        /// Output path (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Output format
        #[arg(short, long, default_value = "csv")]
        format: OutputFormat,

        /// Chat provider to use
        #[arg(long, default_value = "openai")]
        provider: ProviderChoice,

        /// Model to use (e.g. "gpt-4o-2024-08-06", "gpt-4o-mini")
        #[arg(long)]
        model: Option<String>,

        /// Stream the response and show progress as rows resolve
        #[arg(long)]
        stream: bool,

        /// Field order for collapsed date cells
        #[arg(long, default_value = "ymd")]
        date_order: DateOrderChoice,
    },

    /// Analyze an informal feature request into bilingual requirement definitions
    Requirements {
        /// Description of the system under analysis
        #[arg(value_name = "SYSTEM")]
        system: String,

        /// The feature request to analyze
        #[arg(value_name = "REQUEST")]
        request: String,

        /// Output as JSON instead of a readable listing
        #[arg(long)]
        json: bool,

        /// Chat provider to use
        #[arg(long, default_value = "openai")]
        provider: ProviderChoice,

        /// Model to use
        #[arg(long)]
        model: Option<String>,

        /// Stream the response and show progress
        #[arg(long)]
        stream: bool,
    },

    /// Translate text with a fixed terminology glossary
    Translate {
        /// Text to translate
        #[arg(value_name = "TEXT")]
        text: String,

        /// Path to a glossary file (JSON array of {category, ja, en})
        #[arg(short, long)]
        glossary: Option<PathBuf>,

        /// Instruction appended to the translator prompt
        #[arg(
            short,
            long,
            default_value = "Translate the following text into natural English."
        )]
        instruction: String,

        /// Output as JSON instead of a readable listing
        #[arg(long)]
        json: bool,

        /// Chat provider to use
        #[arg(long, default_value = "openai")]
        provider: ProviderChoice,

        /// Model to use
        #[arg(long)]
        model: Option<String>,

        /// Stream the response and show progress
        #[arg(long)]
        stream: bool,
    },
}

#[derive(Clone, Copy, Debug, Default, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Csv,
    Json,
}

/// Chat provider choice
#[derive(Clone, Copy, Debug, Default, ValueEnum)]
#[value(rename_all = "lowercase")]
pub enum ProviderChoice {
    /// OpenAI API (requires OPENAI_API_KEY)
    #[default]
    #[value(alias = "gpt")]
    OpenAi,
    /// Mock provider for local development
    #[value(alias = "test")]
    Mock,
}

/// Date field order for collapsed rendering
#[derive(Clone, Copy, Debug, Default, ValueEnum)]
pub enum DateOrderChoice {
    #[default]
    Ymd,
    Dmy,
    Mdy,
}

impl From<DateOrderChoice> for mocksmith::DateOrder {
    fn from(choice: DateOrderChoice) -> Self {
        match choice {
            DateOrderChoice::Ymd => mocksmith::DateOrder::Ymd,
            DateOrderChoice::Dmy => mocksmith::DateOrder::Dmy,
            DateOrderChoice::Mdy => mocksmith::DateOrder::Mdy,
        }
    }
}
