use sitehost_core_types::{Namespace, SiteSummary};
use tokio::sync::mpsc;
use tracing::{info, warn};

/// What the external metadata registry is told after a successful mutation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RegistryEvent {
    Recorded(SiteSummary),
    Forgotten(Namespace),
}

/// Outbound boundary to the metadata registry. The core never reads from it.
pub trait RegistrySink: Send + Sync {
    fn emit(&self, event: RegistryEvent);
}

/// Default sink: the registry lives elsewhere, so events are only logged.
#[derive(Clone, Copy, Debug, Default)]
pub struct TracingRegistrySink;

impl RegistrySink for TracingRegistrySink {
    fn emit(&self, event: RegistryEvent) {
        match event {
            RegistryEvent::Recorded(summary) => info!(
                target: "sitehost::registry",
                namespace = %summary.namespace,
                url = %summary.url,
                files = summary.file_count,
                primary = summary.primary_type.as_deref().unwrap_or("-"),
                "site recorded"
            ),
            RegistryEvent::Forgotten(namespace) => {
                info!(target: "sitehost::registry", namespace = %namespace, "site forgotten")
            }
        }
    }
}

/// Forwards events to an async consumer that persists them.
#[derive(Clone, Debug)]
pub struct ChannelRegistrySink {
    tx: mpsc::UnboundedSender<RegistryEvent>,
}

impl ChannelRegistrySink {
    pub fn new() -> (Self, mpsc::UnboundedReceiver<RegistryEvent>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }
}

impl RegistrySink for ChannelRegistrySink {
    fn emit(&self, event: RegistryEvent) {
        if self.tx.send(event).is_err() {
            warn!(target: "sitehost::registry", "registry consumer dropped; event discarded");
        }
    }
}
