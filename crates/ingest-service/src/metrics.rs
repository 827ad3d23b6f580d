use once_cell::sync::Lazy;
use prometheus::{core::Collector, histogram_opts, opts, Histogram, IntCounterVec, Registry};
use tracing::error;

static INGEST_TOTAL: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        opts!("sitehost_ingest_total", "Site mutations grouped by mode and outcome"),
        &["mode", "outcome"],
    )
    .unwrap()
});

static INGEST_FILES: Lazy<Histogram> = Lazy::new(|| {
    Histogram::with_opts(histogram_opts!(
        "sitehost_ingest_files",
        "Objects written per successful ingestion",
        vec![1.0, 5.0, 25.0, 100.0, 500.0, 2_500.0, 10_000.0]
    ))
    .unwrap()
});

fn register<C>(registry: &Registry, collector: C)
where
    C: Collector + Clone + Send + Sync + 'static,
{
    if let Err(err) = registry.register(Box::new(collector.clone())) {
        if !matches!(err, prometheus::Error::AlreadyReg) {
            error!(?err, "failed to register ingest metric");
        }
    }
}

pub fn register_metrics(registry: &Registry) {
    register(registry, INGEST_TOTAL.clone());
    register(registry, INGEST_FILES.clone());
}

/// `mode` is `create`, `replace`, `rename` or `delete`; `outcome` is `ok` or an error code.
pub fn record(mode: &str, outcome: &str) {
    INGEST_TOTAL.with_label_values(&[mode, outcome]).inc();
}

pub fn observe_files(count: usize) {
    INGEST_FILES.observe(count as f64);
}
