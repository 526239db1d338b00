//! Broker connection: event loop task, inbound routing and status publishing.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use rumqttc::{AsyncClient, Event, MqttOptions, Packet, QoS};
use serde_json::Value;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use stateio_app::ports::StatusPublisher;
use stateio_domain::error::StateIoError;

use crate::config::MqttConfig;
use crate::error::MqttError;
use crate::topics::{InboundTopic, Topics};

const RECONNECT_DELAY: Duration = Duration::from_secs(5);

/// A message received from the controller.
#[derive(Debug, Clone, PartialEq)]
pub enum Inbound {
    Config(Value),
    Command(Value),
}

/// Decode a publish received on `topic`.
///
/// # Errors
///
/// Returns [`MqttError::UnexpectedTopic`] for topics other than `conf` and
/// `cmnd`, or [`MqttError::PayloadParse`] when the payload isn't JSON.
pub fn decode(topics: &Topics, topic: &str, payload: &[u8]) -> Result<Inbound, MqttError> {
    let kind = topics
        .inbound(topic)
        .ok_or_else(|| MqttError::UnexpectedTopic(topic.to_string()))?;
    let json = serde_json::from_slice(payload).map_err(|source| MqttError::PayloadParse {
        topic: topic.to_string(),
        source,
    })?;
    Ok(match kind {
        InboundTopic::Config => Inbound::Config(json),
        InboundTopic::Command => Inbound::Command(json),
    })
}

/// Publishes status payloads on the `stat` topic.
///
/// Publishing never waits: while no broker session is up, or when the client
/// queue is full or closed, the call fails and the caller falls back to its
/// failover log.
#[derive(Clone)]
pub struct MqttPublisher {
    client: AsyncClient,
    topic: String,
    connected: Arc<AtomicBool>,
}

impl StatusPublisher for MqttPublisher {
    fn publish_status(&mut self, payload: &Value) -> Result<(), StateIoError> {
        if !self.connected.load(Ordering::Acquire) {
            return Err(MqttError::NotConnected.into_domain());
        }
        self.client
            .try_publish(&self.topic, QoS::AtLeastOnce, false, payload.to_string())
            .map_err(|err| MqttError::Client(err).into_domain())
    }
}

/// A running broker connection.
pub struct MqttLink {
    client: AsyncClient,
    topics: Topics,
    connected: Arc<AtomicBool>,
    task: JoinHandle<()>,
}

impl MqttLink {
    /// Connect to the broker and spawn the event loop on the current runtime.
    ///
    /// Inbound configuration and command messages are forwarded to the
    /// returned receiver in arrival order. After every (re)connect the link
    /// subscribes again and republishes `adoption` retained.
    #[must_use]
    pub fn spawn(config: &MqttConfig, adoption: &Value) -> (Self, mpsc::UnboundedReceiver<Inbound>) {
        let topics = Topics::new(config.topic_prefix.as_deref(), &config.client_id);
        let mut options =
            MqttOptions::new(&config.client_id, &config.broker_host, config.broker_port);
        options.set_keep_alive(Duration::from_secs(u64::from(config.keep_alive_secs)));
        let (client, mut eventloop) = AsyncClient::new(options, config.queue_capacity);
        let (sender, receiver) = mpsc::unbounded_channel();
        let connected = Arc::new(AtomicBool::new(false));

        let task = {
            let client = client.clone();
            let topics = topics.clone();
            let connected = Arc::clone(&connected);
            let adoption = adoption.to_string();
            tokio::spawn(async move {
                loop {
                    match eventloop.poll().await {
                        Ok(Event::Incoming(Packet::ConnAck(_))) => {
                            tracing::info!(status = %topics.status, "connected to broker");
                            connected.store(true, Ordering::Release);
                            if let Err(err) = announce(&client, &topics, &adoption) {
                                tracing::warn!(error = %err, "failed to subscribe or adopt");
                            }
                        }
                        Ok(Event::Incoming(Packet::Publish(publish))) => {
                            match decode(&topics, &publish.topic, &publish.payload) {
                                Ok(inbound) => {
                                    if sender.send(inbound).is_err() {
                                        tracing::debug!("inbound receiver dropped, stopping link");
                                        break;
                                    }
                                }
                                Err(err) => tracing::warn!(error = %err, "ignored inbound message"),
                            }
                        }
                        Ok(_) => {}
                        Err(err) => {
                            connected.store(false, Ordering::Release);
                            tracing::warn!(error = %err, "broker connection lost");
                            tokio::time::sleep(RECONNECT_DELAY).await;
                        }
                    }
                }
            })
        };

        (
            Self {
                client,
                topics,
                connected,
                task,
            },
            receiver,
        )
    }

    #[must_use]
    pub const fn topics(&self) -> &Topics {
        &self.topics
    }

    /// A status publisher sharing this connection.
    #[must_use]
    pub fn publisher(&self) -> MqttPublisher {
        MqttPublisher {
            client: self.client.clone(),
            topic: self.topics.status.clone(),
            connected: Arc::clone(&self.connected),
        }
    }

    /// Disconnect and stop the event loop.
    pub async fn shutdown(self) {
        self.connected.store(false, Ordering::Release);
        if let Err(err) = self.client.try_disconnect() {
            tracing::debug!(error = %err, "disconnect request not queued");
        }
        self.task.abort();
        let _ = self.task.await;
    }
}

fn announce(client: &AsyncClient, topics: &Topics, adoption: &str) -> Result<(), MqttError> {
    client
        .try_subscribe(&topics.config, QoS::AtLeastOnce)
        .map_err(MqttError::Client)?;
    client
        .try_subscribe(&topics.command, QoS::AtLeastOnce)
        .map_err(MqttError::Client)?;
    client
        .try_publish(&topics.adopt, QoS::AtLeastOnce, true, adoption)
        .map_err(MqttError::Client)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn topics() -> Topics {
        Topics::new(Some("oxrs"), "rack-1")
    }

    #[test]
    fn should_decode_config_and_command_payloads() {
        let topics = topics();
        assert_eq!(
            decode(&topics, "oxrs/conf/rack-1", br#"{"ioConfig":"io_64_64"}"#).unwrap(),
            Inbound::Config(json!({"ioConfig": "io_64_64"}))
        );
        assert_eq!(
            decode(&topics, "oxrs/cmnd/rack-1", br#"{"outputs":[]}"#).unwrap(),
            Inbound::Command(json!({"outputs": []}))
        );
    }

    #[test]
    fn should_reject_unknown_topic() {
        let err = decode(&topics(), "oxrs/stat/rack-1", b"{}").unwrap_err();
        assert!(matches!(err, MqttError::UnexpectedTopic(_)));
    }

    #[test]
    fn should_reject_non_json_payload() {
        let err = decode(&topics(), "oxrs/cmnd/rack-1", b"on").unwrap_err();
        assert!(matches!(err, MqttError::PayloadParse { .. }));
    }

    fn publisher(capacity: usize, connected: bool) -> (MqttPublisher, rumqttc::EventLoop) {
        let options = MqttOptions::new("test", "127.0.0.1", 1);
        let (client, eventloop) = AsyncClient::new(options, capacity);
        let publisher = MqttPublisher {
            client,
            topic: topics().status,
            connected: Arc::new(AtomicBool::new(connected)),
        };
        (publisher, eventloop)
    }

    fn status() -> Value {
        json!({"index": 65, "type": "relay", "event": "on"})
    }

    #[tokio::test]
    async fn should_refuse_publish_before_broker_session() {
        let (mut publisher, _eventloop) = publisher(64, false);
        for _ in 0..10 {
            assert!(matches!(
                publisher.publish_status(&status()),
                Err(StateIoError::Transport(_))
            ));
        }
    }

    #[tokio::test]
    async fn should_start_link_without_broker_session() {
        let config = MqttConfig {
            broker_host: "127.0.0.1".into(),
            broker_port: 1,
            ..MqttConfig::default()
        };
        let (link, _inbox) = MqttLink::spawn(&config, &json!({}));
        let mut publisher = link.publisher();
        assert!(publisher.publish_status(&status()).is_err());
        link.shutdown().await;
    }

    #[tokio::test]
    async fn should_refuse_publish_once_session_is_lost() {
        let (mut publisher, _eventloop) = publisher(64, true);
        assert!(publisher.publish_status(&status()).is_ok());
        publisher.connected.store(false, Ordering::Release);
        assert!(publisher.publish_status(&status()).is_err());
    }

    #[tokio::test]
    async fn should_fail_publish_once_queue_is_full() {
        let (mut publisher, _eventloop) = publisher(1, true);
        assert!(publisher.publish_status(&status()).is_ok());
        assert!(matches!(
            publisher.publish_status(&status()),
            Err(StateIoError::Transport(_))
        ));
    }
}
