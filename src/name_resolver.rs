use std::collections::HashMap;
use std::path::Path;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum NameResolverError {
    #[error("error loading settings: `{0}`")]
    IOError(#[from] std::io::Error),

    #[error("error loading settings: `{0}`")]
    SerdeYamlError(#[from] serde_yaml::Error),
}

/// NameResolver maps a placeholder name to its configured value, e.g. an application setting.
/// Implementations are pure lookups.
pub trait NameResolver {
    fn resolve(&self, name: &str) -> Option<String>;
}

/// Resolves placeholders from the process environment.
#[derive(Debug, Default, Clone, Copy)]
pub struct EnvNameResolver;

impl NameResolver for EnvNameResolver {
    fn resolve(&self, name: &str) -> Option<String> {
        std::env::var(name).ok()
    }
}

/// Resolves placeholders from an in-memory map, usually loaded from a flat YAML settings file:
///   MqttServer: broker.local
///   MqttPort: "1883"
#[derive(Debug, Default, Clone, PartialEq)]
pub struct MapNameResolver(HashMap<String, String>);

impl MapNameResolver {
    pub fn load(path: &Path) -> Result<Self, NameResolverError> {
        let settings_file = std::fs::File::open(path)?;
        Ok(Self(serde_yaml::from_reader(settings_file)?))
    }
}

impl NameResolver for MapNameResolver {
    fn resolve(&self, name: &str) -> Option<String> {
        self.0.get(name).cloned()
    }
}

impl From<HashMap<String, String>> for MapNameResolver {
    fn from(settings: HashMap<String, String>) -> Self {
        Self(settings)
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for MapNameResolver {
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        Self(
            iter.into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }
}
