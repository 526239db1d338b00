//! Topic layout: `[prefix/]{conf,cmnd,stat,adopt}/{client_id}`.

/// The four topics of one client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Topics {
    pub config: String,
    pub command: String,
    pub status: String,
    pub adopt: String,
}

/// Which inbound stream a topic belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InboundTopic {
    Config,
    Command,
}

impl Topics {
    #[must_use]
    pub fn new(prefix: Option<&str>, client_id: &str) -> Self {
        let topic = |kind: &str| match prefix.map(|p| p.trim_end_matches('/')) {
            Some(prefix) if !prefix.is_empty() => format!("{prefix}/{kind}/{client_id}"),
            _ => format!("{kind}/{client_id}"),
        };
        Self {
            config: topic("conf"),
            command: topic("cmnd"),
            status: topic("stat"),
            adopt: topic("adopt"),
        }
    }

    /// Classify an inbound topic.
    #[must_use]
    pub fn inbound(&self, topic: &str) -> Option<InboundTopic> {
        if topic == self.config {
            Some(InboundTopic::Config)
        } else if topic == self.command {
            Some(InboundTopic::Command)
        } else {
            None
        }
    }
}
