use mqtt_trigger_config::cli::{resolve_triggers, Cli, CliError};
use mqtt_trigger_config::config::loader::TriggersConfig;
use mqtt_trigger_config::logging::Logging;
use mqtt_trigger_config::{EnvNameResolver, LocalProviderRegistry, MapNameResolver};

fn main() {
    if let Err(err) = run(Cli::init_cli()) {
        eprintln!("Error: {}", err);
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<(), CliError> {
    Logging::try_init()?;

    let triggers = TriggersConfig::load(&cli.get_config())?;
    // custom providers are registered by the embedding host, none are known here
    let registry = LocalProviderRegistry::new();

    let resolved = match cli.get_settings() {
        Some(settings) => resolve_triggers(
            &triggers,
            cli.get_trigger(),
            &MapNameResolver::load(&settings)?,
            &registry,
        )?,
        None => resolve_triggers(&triggers, cli.get_trigger(), &EnvNameResolver, &registry)?,
    };

    print!("{}", serde_yaml::to_string(&resolved)?);
    Ok(())
}
