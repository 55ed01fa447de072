//! CLI command implementations.

pub mod generate;
pub mod requirements;
pub mod translate;

use mocksmith::{GenerationConfig, MockProvider, Mocksmith, OpenAiProvider};

use crate::cli::ProviderChoice;

/// Build the engine for the selected provider and model.
pub(crate) fn build_engine(
    provider: ProviderChoice,
    model: Option<String>,
) -> Result<Mocksmith, Box<dyn std::error::Error>> {
    let mut config = GenerationConfig::default();
    if let Some(model) = model {
        config.model = model;
    }
    let engine = match provider {
        ProviderChoice::OpenAi => Mocksmith::with_config(OpenAiProvider::from_env()?, config),
        ProviderChoice::Mock => Mocksmith::with_config(MockProvider::new(), config),
    };
    Ok(engine)
}
