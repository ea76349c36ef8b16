pub mod cli;
pub mod config;
pub mod logging;
pub mod name_resolver;

pub use crate::config::error::{MqttOptionsError, ProviderError, ResolverError};
pub use crate::config::mqtt_config::{ConnectionOptions, MqttConfig, TopicFilter};
pub use crate::config::provider::{CreateMqttConfig, LocalProviderRegistry, ProviderRegistry};
pub use crate::config::resolver::TriggerConfigResolver;
pub use crate::config::trigger::TriggerDeclaration;
pub use crate::config::ConfigResolver;
pub use crate::name_resolver::{EnvNameResolver, MapNameResolver, NameResolver};
