use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ResolverError {
    #[error("missing required value: `{0}`")]
    MissingRequiredValue(String),

    #[error("malformed value `{value}` for `{field}`")]
    MalformedValue { field: String, value: String },

    #[error("invalid custom config creator: `{0}`")]
    InvalidCustomConfigCreator(String),
}

/// Failure raised by a custom configuration provider, either while it is being
/// instantiated or while it creates the configuration.
#[derive(Error, Debug, Clone, PartialEq)]
#[error("{0}")]
pub struct ProviderError(pub String);

impl From<&str> for ProviderError {
    fn from(value: &str) -> Self {
        ProviderError(value.to_string())
    }
}

impl From<String> for ProviderError {
    fn from(value: String) -> Self {
        ProviderError(value)
    }
}

#[derive(Error, Debug)]
pub enum LoaderError {
    #[error("error loading triggers config: `{0}`")]
    IOError(#[from] std::io::Error),

    #[error("error loading triggers config: `{0}`")]
    SerdeYamlError(#[from] serde_yaml::Error),
}

/// Connection options rumqttc cannot be configured with.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum MqttOptionsError {
    #[error("invalid client id: `{0}`")]
    InvalidClientId(String),

    #[error("keep alive must be zero or at least one second, got `{0:?}`")]
    InvalidKeepAlive(std::time::Duration),
}
