use std::collections::HashMap;

use crate::config::error::ProviderError;
use crate::config::mqtt_config::MqttConfig;
use crate::name_resolver::NameResolver;

/// CreateMqttConfig is implemented by custom providers that build the whole
/// MqttConfig of a trigger themselves. Providers log through `tracing`.
pub trait CreateMqttConfig {
    fn create(&self, name_resolver: &dyn NameResolver) -> Result<MqttConfig, ProviderError>;
}

pub type ProviderFactory =
    Box<dyn Fn() -> Result<Box<dyn CreateMqttConfig>, ProviderError> + Send + Sync>;

/// ProviderRegistry stores the factories of custom providers by key.
pub trait ProviderRegistry {
    // get returns the factory registered under the given key.
    fn get(&self, key: &str) -> Option<&ProviderFactory>;
}

#[derive(Default)]
pub struct LocalProviderRegistry(HashMap<String, ProviderFactory>);

impl ProviderRegistry for LocalProviderRegistry {
    fn get(&self, key: &str) -> Option<&ProviderFactory> {
        self.0.get(key)
    }
}

impl LocalProviderRegistry {
    pub fn new() -> Self {
        LocalProviderRegistry::default()
    }

    // registers a factory, replacing any previous one with the same key.
    pub fn register<F>(&mut self, key: impl Into<String>, factory: F)
    where
        F: Fn() -> Result<Box<dyn CreateMqttConfig>, ProviderError> + Send + Sync + 'static,
    {
        _ = self.0.insert(key.into(), Box::new(factory));
    }

    pub fn register_default<T>(&mut self, key: impl Into<String>)
    where
        T: CreateMqttConfig + Default + 'static,
    {
        self.register(key, || Ok(Box::new(T::default())));
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use crate::config::mqtt_config::{ConnectionOptions, TopicFilter, DEFAULT_QOS};
    use crate::name_resolver::tests::EchoNameResolver;

    use super::*;

    #[derive(Default)]
    pub struct TestMqttConfigProvider;

    impl CreateMqttConfig for TestMqttConfigProvider {
        fn create(&self, _name_resolver: &dyn NameResolver) -> Result<MqttConfig, ProviderError> {
            Ok(MqttConfig::new(
                ConnectionOptions::new("localhost", 1883, "TestClient"),
                vec![TopicFilter::new("Test", DEFAULT_QOS)],
            ))
        }
    }

    #[derive(Default)]
    pub struct BrokenTestMqttConfigProvider;

    impl CreateMqttConfig for BrokenTestMqttConfigProvider {
        fn create(&self, _name_resolver: &dyn NameResolver) -> Result<MqttConfig, ProviderError> {
            Err("not implemented".into())
        }
    }

    #[derive(Default)]
    pub struct PanickingTestMqttConfigProvider;

    impl CreateMqttConfig for PanickingTestMqttConfigProvider {
        fn create(&self, _name_resolver: &dyn NameResolver) -> Result<MqttConfig, ProviderError> {
            unimplemented!()
        }
    }

    #[test]
    fn register_and_get_provider() {
        let mut registry = LocalProviderRegistry::new();
        registry.register_default::<TestMqttConfigProvider>("test");

        let factory = registry.get("test").unwrap();
        let config = factory().unwrap().create(&EchoNameResolver).unwrap();

        assert_eq!(config.topics, vec![TopicFilter::new("Test", DEFAULT_QOS)]);
        assert!(registry.get("not_a_provider").is_none());
    }

    #[test]
    fn register_replaces_previous_factory() {
        let mut registry = LocalProviderRegistry::new();
        registry.register_default::<TestMqttConfigProvider>("test");
        registry.register("test", || Err("cannot build".into()));

        let factory = registry.get("test").unwrap();
        assert_eq!(
            factory().err(),
            Some(ProviderError("cannot build".to_string()))
        );
        assert_eq!(registry.keys().collect::<Vec<_>>(), vec!["test"]);
    }
}
