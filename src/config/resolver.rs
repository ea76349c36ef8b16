use std::any::Any;
use std::panic::{catch_unwind, AssertUnwindSafe};

use tracing::{debug, error, info_span, warn};
use uuid::Uuid;

use crate::config::error::{ProviderError, ResolverError};
use crate::config::mqtt_config::{
    ConnectionOptions, MqttConfig, TopicFilter, DEFAULT_MQTT_PORT, DEFAULT_QOS,
};
use crate::config::provider::ProviderRegistry;
use crate::config::trigger::{CustomTrigger, InlineTrigger, TriggerDeclaration};
use crate::config::ConfigResolver;
use crate::name_resolver::NameResolver;

const SERVER: &str = "server";
const PORT: &str = "port";

/// TriggerConfigResolver turns a single trigger declaration into its MqttConfig.
/// Inline declarations are resolved field by field in this order: server, port,
/// username, password, client id, topics. The first missing or malformed
/// mandatory field stops the resolution.
pub struct TriggerConfigResolver<'a, N, P>
where
    N: NameResolver,
    P: ProviderRegistry,
{
    declaration: &'a TriggerDeclaration,
    name_resolver: &'a N,
    registry: &'a P,
}

impl<'a, N, P> TriggerConfigResolver<'a, N, P>
where
    N: NameResolver,
    P: ProviderRegistry,
{
    pub fn new(declaration: &'a TriggerDeclaration, name_resolver: &'a N, registry: &'a P) -> Self {
        Self {
            declaration,
            name_resolver,
            registry,
        }
    }

    fn resolve_inline(&self, trigger: &InlineTrigger) -> Result<MqttConfig, ResolverError> {
        let server = self
            .lookup_trimmed(trigger.server.as_deref())
            .ok_or_else(|| ResolverError::MissingRequiredValue(SERVER.to_string()))?;

        let port = match placeholder(trigger.port.as_deref()) {
            None => DEFAULT_MQTT_PORT,
            Some(_) => {
                let value = self
                    .lookup_trimmed(trigger.port.as_deref())
                    .ok_or_else(|| ResolverError::MissingRequiredValue(PORT.to_string()))?;
                // 0 is not a port a broker can listen on
                value
                    .parse::<u16>()
                    .ok()
                    .filter(|port| *port != 0)
                    .ok_or_else(|| ResolverError::MalformedValue {
                        field: PORT.to_string(),
                        value,
                    })?
            }
        };
        debug!(%server, port, "resolved broker address");

        let username = self.lookup(trigger.username.as_deref());
        let password = self.lookup(trigger.password.as_deref());
        debug!(
            username_set = username.is_some(),
            password_set = password.is_some(),
            "resolved credentials"
        );

        let client_id = match self.lookup_trimmed(trigger.client_id.as_deref()) {
            Some(client_id) => client_id,
            None => {
                let client_id = Uuid::new_v4().to_string();
                warn!(%client_id, "no client id configured, generated a new one");
                client_id
            }
        };

        let topics = trigger
            .topics
            .iter()
            .map(|topic| TopicFilter::new(topic, DEFAULT_QOS))
            .collect::<Vec<_>>();
        if topics.is_empty() {
            warn!("trigger declares no topics to subscribe to");
        }

        Ok(MqttConfig::new(
            ConnectionOptions::new(server, port, client_id).with_credentials(username, password),
            topics,
        ))
    }

    fn resolve_custom(&self, trigger: &CustomTrigger) -> Result<MqttConfig, ResolverError> {
        let invalid = |reason: String| {
            error!(provider = %trigger.provider, "custom config provider failed: {}", reason);
            ResolverError::InvalidCustomConfigCreator(format!("{}: {}", trigger.provider, reason))
        };

        let factory = self
            .registry
            .get(&trigger.provider)
            .ok_or_else(|| invalid("no provider registered under this key".to_string()))?;

        let provider = guarded(factory).map_err(|e| invalid(e.to_string()))?;
        debug!(provider = %trigger.provider, "invoking custom config provider");

        let name_resolver: &dyn NameResolver = self.name_resolver;
        guarded(|| provider.create(name_resolver)).map_err(|e| invalid(e.to_string()))
    }

    fn lookup(&self, name: Option<&str>) -> Option<String> {
        placeholder(name).and_then(|name| self.name_resolver.resolve(name))
    }

    fn lookup_trimmed(&self, name: Option<&str>) -> Option<String> {
        self.lookup(name)
            .map(|value| value.trim().to_string())
            .filter(|value| !value.is_empty())
    }
}

impl<'a, N, P> ConfigResolver for TriggerConfigResolver<'a, N, P>
where
    N: NameResolver,
    P: ProviderRegistry,
{
    type Output = MqttConfig;
    type Error = ResolverError;

    fn resolve(self) -> Result<MqttConfig, ResolverError> {
        let _span = info_span!("resolve_mqtt_trigger").entered();
        match self.declaration {
            TriggerDeclaration::Inline(trigger) => self.resolve_inline(trigger),
            TriggerDeclaration::Custom(trigger) => self.resolve_custom(trigger),
        }
    }
}

// an empty placeholder name is the same as no placeholder at all
fn placeholder(name: Option<&str>) -> Option<&str> {
    name.filter(|name| !name.is_empty())
}

// runs user supplied provider code, turning a panic into a ProviderError
fn guarded<T, F>(f: F) -> Result<T, ProviderError>
where
    F: FnOnce() -> Result<T, ProviderError>,
{
    catch_unwind(AssertUnwindSafe(f)).unwrap_or_else(|payload| Err(panic_message(payload)))
}

fn panic_message(payload: Box<dyn Any + Send>) -> ProviderError {
    if let Some(message) = payload.downcast_ref::<&str>() {
        ProviderError(format!("provider panicked: {}", message))
    } else if let Some(message) = payload.downcast_ref::<String>() {
        ProviderError(format!("provider panicked: {}", message))
    } else {
        ProviderError("provider panicked".to_string())
    }
}
