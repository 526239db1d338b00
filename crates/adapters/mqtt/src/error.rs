//! MQTT adapter error types.

use stateio_domain::error::StateIoError;

/// Errors specific to the MQTT adapter.
#[derive(Debug, thiserror::Error)]
pub enum MqttError {
    /// No broker session is established yet, or it was lost.
    #[error("MQTT client not connected")]
    NotConnected,

    /// The rumqttc client refused the request (queue full or closed).
    #[error("MQTT client error")]
    Client(#[source] rumqttc::ClientError),

    /// Failed to parse an incoming MQTT payload as JSON.
    #[error("failed to parse MQTT payload on `{topic}`")]
    PayloadParse {
        topic: String,
        #[source]
        source: serde_json::Error,
    },

    /// A payload arrived on a topic the link doesn't handle.
    #[error("unexpected topic `{0}`")]
    UnexpectedTopic(String),
}

impl MqttError {
    /// Convert into a [`StateIoError::Transport`] for propagation across port
    /// boundaries.
    #[must_use]
    pub fn into_domain(self) -> StateIoError {
        StateIoError::transport(self)
    }
}

impl From<MqttError> for StateIoError {
    fn from(err: MqttError) -> Self {
        err.into_domain()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_display_not_connected_error() {
        assert_eq!(MqttError::NotConnected.to_string(), "MQTT client not connected");
    }

    #[test]
    fn should_display_unexpected_topic() {
        let err = MqttError::UnexpectedTopic("stat/rack".into());
        assert_eq!(err.to_string(), "unexpected topic `stat/rack`");
    }

    #[test]
    fn should_convert_to_transport_error() {
        let err: StateIoError = MqttError::UnexpectedTopic("x".into()).into();
        assert!(matches!(err, StateIoError::Transport(_)));
    }

    #[test]
    fn should_display_payload_parse_error() {
        let json_err = serde_json::from_str::<serde_json::Value>("{{bad").unwrap_err();
        let err = MqttError::PayloadParse {
            topic: "conf/rack".into(),
            source: json_err,
        };
        assert_eq!(err.to_string(), "failed to parse MQTT payload on `conf/rack`");
    }
}
