use std::collections::BTreeMap;
use std::path::PathBuf;

use clap::Parser;
use thiserror::Error;
use tracing::info;

use crate::config::error::{LoaderError, ResolverError};
use crate::config::loader::TriggersConfig;
use crate::config::mqtt_config::MqttConfig;
use crate::config::provider::ProviderRegistry;
use crate::config::resolver::TriggerConfigResolver;
use crate::config::ConfigResolver;
use crate::logging::LoggingError;
use crate::name_resolver::{NameResolver, NameResolverError};

#[derive(Error, Debug)]
pub enum CliError {
    #[error("`{0}`")]
    Logging(#[from] LoggingError),

    #[error("`{0}`")]
    Loader(#[from] LoaderError),

    #[error("`{0}`")]
    Settings(#[from] NameResolverError),

    #[error("trigger not found: `{0}`")]
    TriggerNotFound(String),

    #[error("cannot resolve trigger `{name}`: {source}")]
    Resolver { name: String, source: ResolverError },

    #[error("cannot print resolved config: `{0}`")]
    Output(#[from] serde_yaml::Error),
}

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)] // Read from `Cargo.toml`
pub struct Cli {
    /// Triggers file to resolve
    #[arg(short, long)]
    config: PathBuf,

    /// Settings file the placeholders are resolved from, instead of the environment
    #[arg(short, long)]
    settings: Option<PathBuf>,

    /// Only resolve the trigger with this name
    #[arg(short, long)]
    trigger: Option<String>,
}

impl Cli {
    /// Parses command line arguments
    pub fn init_cli() -> Self {
        Self::parse()
    }

    pub fn get_config(&self) -> PathBuf {
        self.config.clone()
    }

    pub fn get_settings(&self) -> Option<PathBuf> {
        self.settings.clone()
    }

    pub fn get_trigger(&self) -> Option<&str> {
        self.trigger.as_deref()
    }
}

/// Resolves all the triggers of the config, or only `only` when given.
/// Stops at the first trigger that fails.
pub fn resolve_triggers<N, P>(
    triggers: &TriggersConfig,
    only: Option<&str>,
    name_resolver: &N,
    registry: &P,
) -> Result<BTreeMap<String, MqttConfig>, CliError>
where
    N: NameResolver,
    P: ProviderRegistry,
{
    let selected = match only {
        Some(name) => {
            let declaration = triggers
                .get(name)
                .ok_or_else(|| CliError::TriggerNotFound(name.to_string()))?;
            vec![(name.to_string(), declaration)]
        }
        None => triggers
            .triggers
            .iter()
            .map(|(name, declaration)| (name.clone(), declaration))
            .collect(),
    };

    selected
        .into_iter()
        .map(|(name, declaration)| {
            info!(trigger = %name, "resolving trigger");
            TriggerConfigResolver::new(declaration, name_resolver, registry)
                .resolve()
                .map(|config| (name.clone(), config))
                .map_err(|source| CliError::Resolver { name, source })
        })
        .collect()
}
