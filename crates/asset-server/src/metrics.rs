use once_cell::sync::Lazy;
use prometheus::{core::Collector, opts, IntCounterVec, Registry};
use tracing::error;

static SERVE_TOTAL: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        opts!("sitehost_serve_total", "Asset requests grouped by outcome"),
        &["outcome"],
    )
    .unwrap()
});

fn register<C>(registry: &Registry, collector: C)
where
    C: Collector + Clone + Send + Sync + 'static,
{
    if let Err(err) = registry.register(Box::new(collector.clone())) {
        if !matches!(err, prometheus::Error::AlreadyReg) {
            error!(?err, "failed to register serve metric");
        }
    }
}

pub fn register_metrics(registry: &Registry) {
    register(registry, SERVE_TOTAL.clone());
}

/// `outcome` is `ok`, `fallback`, `unresolved` or an error code.
pub fn record(outcome: &str) {
    SERVE_TOTAL.with_label_values(&[outcome]).inc();
}
