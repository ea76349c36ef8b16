use assert_matches::assert_matches;
use mqtt_trigger_config::config::mqtt_config::DEFAULT_QOS;
use mqtt_trigger_config::{
    ConfigResolver, ConnectionOptions, CreateMqttConfig, LocalProviderRegistry, MapNameResolver,
    MqttConfig, NameResolver, ProviderError, ResolverError, TopicFilter, TriggerConfigResolver,
    TriggerDeclaration,
};

struct SettingsProvider;

impl CreateMqttConfig for SettingsProvider {
    fn create(&self, name_resolver: &dyn NameResolver) -> Result<MqttConfig, ProviderError> {
        let server = name_resolver
            .resolve("MqttServer")
            .ok_or(ProviderError::from("MqttServer is not set"))?;
        Ok(MqttConfig::new(
            ConnectionOptions::new(server, 8883, "settings-provider"),
            vec![TopicFilter::new("Test", DEFAULT_QOS)],
        ))
    }
}

fn settings() -> MapNameResolver {
    [
        ("MqttServer", "broker.local"),
        ("MqttPort", "1883"),
        ("MqttUsername", "user"),
        ("MqttPassword", "secret"),
        ("MqttClientId", "client-1"),
    ]
    .into_iter()
    .collect()
}

fn registry() -> LocalProviderRegistry {
    let mut registry = LocalProviderRegistry::new();
    registry.register("settings", || Ok(Box::new(SettingsProvider)));
    registry
}

#[test]
fn inline_declaration_builds_rumqttc_options() {
    let declaration = TriggerDeclaration::inline(["devices/+/telemetry"])
        .with_server("MqttServer")
        .with_port("MqttPort")
        .with_username("MqttUsername")
        .with_password("MqttPassword")
        .with_client_id("MqttClientId");

    let config = TriggerConfigResolver::new(&declaration, &settings(), &registry())
        .resolve()
        .unwrap();
    let options = config.mqtt_options().unwrap();

    assert_eq!(options.client_id(), "client-1");
    assert_eq!(options.broker_address(), ("broker.local".to_string(), 1883));
    assert_eq!(
        options.credentials(),
        Some(("user".to_string(), "secret".to_string()))
    );
    assert_eq!(config.subscribe_filters().len(), 1);
}

#[test]
fn custom_declaration_returns_provider_config() {
    let declaration = TriggerDeclaration::custom("settings");

    let config = TriggerConfigResolver::new(&declaration, &settings(), &registry())
        .resolve()
        .unwrap();

    assert_eq!(config.options.server, "broker.local");
    assert_eq!(config.topics, vec![TopicFilter::new("Test", DEFAULT_QOS)]);
}

#[test]
fn custom_provider_error_is_normalized() {
    let declaration = TriggerDeclaration::custom("settings");
    let empty = MapNameResolver::default();

    let result = TriggerConfigResolver::new(&declaration, &empty, &registry()).resolve();

    assert_matches!(result, Err(ResolverError::InvalidCustomConfigCreator(reason)) => {
        assert!(reason.contains("MqttServer is not set"));
    });
}
