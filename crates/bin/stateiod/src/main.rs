//! # stateiod: the stateio daemon
//!
//! Composition root that wires the expander bank, the MQTT link and the
//! runtime together and runs the polling loop.
//!
//! ## Responsibilities
//! - Parse configuration (config file, env vars)
//! - Install the tracing subscriber
//! - Boot the runtime (bus scan, partition, channel defaults, schemas)
//! - Connect to the broker and publish the adoption payload
//! - Feed inbound messages to the runtime and poll every device, one step at
//!   a time, until SIGINT
//!
//! ## Dependency rule
//! This is the **only** crate that depends on all other crates.
//! It is the wiring layer; no domain logic belongs here.

mod config;
mod settings;

use anyhow::Context;
use serde_json::Value;
use tokio::sync::mpsc;
use tracing_subscriber::EnvFilter;

use stateio_adapter_mqtt::adoption::adoption_payload;
use stateio_adapter_mqtt::{Firmware, Inbound, MqttLink, MqttPublisher};
use stateio_adapter_virtual::{BasicOutputExecutor, EdgeInputClassifier, VirtualBus};
use stateio_app::ports::{NoDisplay, StatusPublisher};
use stateio_app::runtime::{Runtime, RuntimeParts};
use stateio_domain::error::StateIoError;

use crate::config::Config;
use crate::settings::FileSettingsStore;

/// The status publisher handed to the runtime.
enum Upstream {
    Broker(MqttPublisher),
    Detached,
}

#[derive(Debug, thiserror::Error)]
#[error("no broker connection")]
struct Detached;

impl StatusPublisher for Upstream {
    fn publish_status(&mut self, payload: &Value) -> Result<(), StateIoError> {
        match self {
            Self::Broker(publisher) => publisher.publish_status(payload),
            Self::Detached => Err(StateIoError::transport(Detached)),
        }
    }
}

fn firmware() -> Firmware {
    Firmware {
        name: "stateio expander daemon".to_string(),
        short_name: "stateio".to_string(),
        maker: "OXRS".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let config = Config::load().context("failed to load configuration")?;

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_new(&config.logging.filter).unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let mut runtime = Runtime::boot(RuntimeParts {
        bus: VirtualBus::new(config.bus.presence()),
        classifier: EdgeInputClassifier::new(),
        executor: BasicOutputExecutor::new(),
        publisher: Upstream::Detached,
        display: NoDisplay,
        settings: FileSettingsStore::new(&config.settings.path),
    });

    let (link, mut inbox) = if config.mqtt.enabled {
        let adoption = adoption_payload(&firmware(), runtime.schemas());
        let (link, inbox) = MqttLink::spawn(&config.mqtt, &adoption);
        *runtime.publisher_mut() = Upstream::Broker(link.publisher());
        tracing::info!(
            broker = %format_args!("{}:{}", config.mqtt.broker_host, config.mqtt.broker_port),
            status = %link.topics().status,
            "mqtt link started"
        );
        (Some(link), inbox)
    } else {
        tracing::warn!("mqtt disabled, status goes to the failover log");
        let (_, inbox) = mpsc::unbounded_channel::<Inbound>();
        (None, inbox)
    };

    let mut ticker = tokio::time::interval(config.bus.poll_interval());
    ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
    let shutdown = tokio::signal::ctrl_c();
    tokio::pin!(shutdown);

    loop {
        tokio::select! {
            result = &mut shutdown => {
                result.context("failed to listen for shutdown signal")?;
                tracing::info!("shutting down");
                break;
            }
            _ = ticker.tick() => {
                while let Ok(inbound) = inbox.try_recv() {
                    match inbound {
                        Inbound::Config(json) => {
                            runtime.handle_config(&json);
                        }
                        Inbound::Command(json) => {
                            runtime.handle_command(&json);
                        }
                    }
                }
                runtime.poll();
            }
        }
    }

    if let Some(link) = link {
        link.shutdown().await;
    }
    Ok(())
}
