use std::collections::BTreeMap;
use std::path::Path;

use serde::Deserialize;
use tracing::debug;

use crate::config::error::LoaderError;
use crate::config::trigger::TriggerDeclaration;

/// TriggersConfig is the content of a triggers file: every trigger declaration by name.
#[derive(Debug, Deserialize, Default, Clone, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct TriggersConfig {
    pub triggers: BTreeMap<String, TriggerDeclaration>,
}

impl TriggersConfig {
    pub fn load(path: &Path) -> Result<Self, LoaderError> {
        debug!("loading triggers config from {}", path.display());
        let config_file = std::fs::File::open(path)?;
        Ok(serde_yaml::from_reader(config_file)?)
    }

    pub fn from_yaml(content: &str) -> Result<Self, LoaderError> {
        Ok(serde_yaml::from_str(content)?)
    }

    pub fn get(&self, name: &str) -> Option<&TriggerDeclaration> {
        self.triggers.get(name)
    }
}
