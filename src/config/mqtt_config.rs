use std::time::Duration;

use rumqttc::{MqttOptions, QoS, SubscribeFilter};
use serde::{Serialize, Serializer};

use crate::config::error::MqttOptionsError;

pub const DEFAULT_MQTT_PORT: u16 = 1883;
pub const DEFAULT_KEEP_ALIVE: Duration = Duration::from_secs(60);
pub const DEFAULT_RECONNECT_DELAY: Duration = Duration::from_secs(5);
pub const DEFAULT_QOS: QoS = QoS::AtMostOnce;

const REDACTED: &str = "****";

/// MqttConfig is the resolved configuration of a trigger: how to connect to
/// the broker and which topics to subscribe to.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MqttConfig {
    pub options: ConnectionOptions,
    pub topics: Vec<TopicFilter>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ConnectionOptions {
    pub server: String,
    pub port: u16,
    pub username: Option<String>,
    #[serde(serialize_with = "serialize_redacted")]
    pub password: Option<String>,
    pub client_id: String,
    #[serde(serialize_with = "serialize_secs")]
    pub keep_alive: Duration,
    pub clean_session: bool,
    /// Delay the consumer waits before reconnecting after the connection drops.
    /// rumqttc has no such setting, it is applied by whoever drives the event loop.
    #[serde(serialize_with = "serialize_secs")]
    pub reconnect_delay: Duration,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TopicFilter {
    pub topic: String,
    #[serde(serialize_with = "serialize_qos")]
    pub qos: QoS,
}

impl ConnectionOptions {
    pub fn new(server: impl Into<String>, port: u16, client_id: impl Into<String>) -> Self {
        Self {
            server: server.into(),
            port,
            username: None,
            password: None,
            client_id: client_id.into(),
            keep_alive: DEFAULT_KEEP_ALIVE,
            clean_session: true,
            reconnect_delay: DEFAULT_RECONNECT_DELAY,
        }
    }

    pub fn with_credentials(mut self, username: Option<String>, password: Option<String>) -> Self {
        self.username = username;
        self.password = password;
        self
    }
}

impl TopicFilter {
    pub fn new(topic: impl Into<String>, qos: QoS) -> Self {
        Self {
            topic: topic.into(),
            qos,
        }
    }
}

impl MqttConfig {
    pub fn new(options: ConnectionOptions, topics: Vec<TopicFilter>) -> Self {
        Self { options, topics }
    }

    /// Builds the options the rumqttc client connects with.
    /// Credentials are only set when a username is present. Values rumqttc would
    /// reject are returned as errors.
    pub fn mqtt_options(&self) -> Result<MqttOptions, MqttOptionsError> {
        let options = &self.options;
        if options.client_id.is_empty() || options.client_id.starts_with(' ') {
            return Err(MqttOptionsError::InvalidClientId(
                options.client_id.clone(),
            ));
        }
        if !options.keep_alive.is_zero() && options.keep_alive < Duration::from_secs(1) {
            return Err(MqttOptionsError::InvalidKeepAlive(options.keep_alive));
        }

        let mut mqtt_options =
            MqttOptions::new(&options.client_id, &options.server, options.port);
        mqtt_options
            .set_keep_alive(options.keep_alive)
            .set_clean_session(options.clean_session);

        if let Some(username) = &options.username {
            mqtt_options.set_credentials(
                username,
                options.password.clone().unwrap_or_default(),
            );
        }

        Ok(mqtt_options)
    }

    pub fn subscribe_filters(&self) -> Vec<SubscribeFilter> {
        self.topics
            .iter()
            .map(|filter| SubscribeFilter::new(filter.topic.clone(), filter.qos))
            .collect()
    }
}

fn serialize_redacted<S: Serializer>(value: &Option<String>, s: S) -> Result<S::Ok, S::Error> {
    match value {
        Some(_) => s.serialize_some(REDACTED),
        None => s.serialize_none(),
    }
}

fn serialize_secs<S: Serializer>(value: &Duration, s: S) -> Result<S::Ok, S::Error> {
    s.serialize_u64(value.as_secs())
}

fn serialize_qos<S: Serializer>(value: &QoS, s: S) -> Result<S::Ok, S::Error> {
    s.serialize_u8(*value as u8)
}
