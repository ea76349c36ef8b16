use serde::Deserialize;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum DeclarationError {
    #[error("a trigger declares either `topics` or `provider`, not both")]
    AmbiguousMode,

    #[error("a trigger must declare `topics` or `provider`")]
    MissingMode,

    #[error("`{0}` cannot be set on a trigger with a custom `provider`")]
    PlaceholderWithProvider(&'static str),
}

/// TriggerDeclaration describes how the MQTT configuration of a trigger is obtained.
/// It is either declared inline through placeholders that are resolved by a
/// [`NameResolver`](crate::name_resolver::NameResolver), or fully delegated to a
/// custom provider registered under a key.
///
/// Origin configuration example:
///   # Inline
///   topics: ["devices/+/telemetry"]
///   server: MqttServer
///   port: MqttPort
///   client_id: MqttClientId
///
///   # Custom
///   provider: my-provider
#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(try_from = "RawTrigger")]
pub enum TriggerDeclaration {
    Inline(InlineTrigger),
    Custom(CustomTrigger),
}

/// Placeholder names for every connection setting plus the topics to subscribe to.
/// A `None` placeholder and an empty one are both treated as not provided.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct InlineTrigger {
    pub topics: Vec<String>,
    pub server: Option<String>,
    pub port: Option<String>,
    pub username: Option<String>,
    pub password: Option<String>,
    pub client_id: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CustomTrigger {
    pub provider: String,
}

// Every field a declaration may carry, so unknown fields are reported by name
// before the mode is decided.
#[derive(Debug, Deserialize, Default)]
#[serde(deny_unknown_fields)]
struct RawTrigger {
    #[serde(default)]
    topics: Option<Vec<String>>,
    #[serde(default)]
    provider: Option<String>,
    #[serde(default)]
    server: Option<String>,
    #[serde(default)]
    port: Option<String>,
    #[serde(default)]
    username: Option<String>,
    #[serde(default)]
    password: Option<String>,
    #[serde(default)]
    client_id: Option<String>,
}

impl TryFrom<RawTrigger> for TriggerDeclaration {
    type Error = DeclarationError;

    fn try_from(raw: RawTrigger) -> Result<Self, Self::Error> {
        match (raw.topics, raw.provider) {
            (Some(_), Some(_)) => Err(DeclarationError::AmbiguousMode),
            (None, None) => Err(DeclarationError::MissingMode),
            (Some(topics), None) => Ok(TriggerDeclaration::Inline(InlineTrigger {
                topics,
                server: raw.server,
                port: raw.port,
                username: raw.username,
                password: raw.password,
                client_id: raw.client_id,
            })),
            (None, Some(provider)) => {
                let placeholders = [
                    ("server", &raw.server),
                    ("port", &raw.port),
                    ("username", &raw.username),
                    ("password", &raw.password),
                    ("client_id", &raw.client_id),
                ];
                match placeholders.iter().find(|(_, value)| value.is_some()) {
                    Some((field, _)) => Err(DeclarationError::PlaceholderWithProvider(*field)),
                    None => Ok(TriggerDeclaration::Custom(CustomTrigger { provider })),
                }
            }
        }
    }
}

impl TriggerDeclaration {
    pub fn inline<I, S>(topics: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        TriggerDeclaration::Inline(InlineTrigger {
            topics: topics.into_iter().map(Into::into).collect(),
            ..Default::default()
        })
    }

    pub fn custom(provider: impl Into<String>) -> Self {
        TriggerDeclaration::Custom(CustomTrigger {
            provider: provider.into(),
        })
    }

    pub fn with_server(self, name: impl Into<String>) -> Self {
        self.map_inline(|t| t.server = Some(name.into()))
    }

    pub fn with_port(self, name: impl Into<String>) -> Self {
        self.map_inline(|t| t.port = Some(name.into()))
    }

    pub fn with_username(self, name: impl Into<String>) -> Self {
        self.map_inline(|t| t.username = Some(name.into()))
    }

    pub fn with_password(self, name: impl Into<String>) -> Self {
        self.map_inline(|t| t.password = Some(name.into()))
    }

    pub fn with_client_id(self, name: impl Into<String>) -> Self {
        self.map_inline(|t| t.client_id = Some(name.into()))
    }

    // placeholders have no meaning for a custom declaration, so they are ignored
    fn map_inline<F: FnOnce(&mut InlineTrigger)>(self, f: F) -> Self {
        match self {
            TriggerDeclaration::Inline(mut trigger) => {
                f(&mut trigger);
                TriggerDeclaration::Inline(trigger)
            }
            custom => custom,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deserialize_inline_trigger() {
        let yaml = r#"
topics: ["a/b", "c/#"]
server: MqttServer
port: MqttPort
client_id: ""
"#;
        let declaration: TriggerDeclaration = serde_yaml::from_str(yaml).unwrap();
        let expected = TriggerDeclaration::inline(["a/b", "c/#"])
            .with_server("MqttServer")
            .with_port("MqttPort")
            .with_client_id("");

        assert_eq!(declaration, expected);
    }

    #[test]
    fn deserialize_custom_trigger() {
        let declaration: TriggerDeclaration =
            serde_yaml::from_str("provider: my-provider").unwrap();

        assert_eq!(declaration, TriggerDeclaration::custom("my-provider"));
    }

    #[test]
    fn deserialize_both_modes_fails() {
        let yaml = r#"
topics: ["a/b"]
provider: my-provider
"#;
        let err = serde_yaml::from_str::<TriggerDeclaration>(yaml).unwrap_err();
        assert!(err
            .to_string()
            .contains("a trigger declares either `topics` or `provider`, not both"));
    }

    #[test]
    fn deserialize_no_mode_fails() {
        let err = serde_yaml::from_str::<TriggerDeclaration>("server: MqttServer").unwrap_err();
        assert!(err
            .to_string()
            .contains("a trigger must declare `topics` or `provider`"));
    }

    #[test]
    fn deserialize_unknown_field_is_named() {
        let yaml = r#"
topics: ["a/b"]
sevrer: MqttServer
"#;
        let err = serde_yaml::from_str::<TriggerDeclaration>(yaml).unwrap_err();
        assert!(err.to_string().contains("unknown field `sevrer`"));
    }

    #[test]
    fn deserialize_custom_with_placeholder_fails() {
        let yaml = r#"
provider: my-provider
port: MqttPort
"#;
        let err = serde_yaml::from_str::<TriggerDeclaration>(yaml).unwrap_err();
        assert!(err
            .to_string()
            .contains("`port` cannot be set on a trigger with a custom `provider`"));
    }

    #[test]
    fn placeholders_are_ignored_for_custom_declarations() {
        let declaration = TriggerDeclaration::custom("my-provider")
            .with_server("MqttServer")
            .with_port("MqttPort");

        assert_eq!(declaration, TriggerDeclaration::custom("my-provider"));
    }
}
