//! # Telemetry
//!
//! Progress notices, cancellation notices and the shutdown path are always
//! logged to the console through `tracing_subscriber::fmt`. The log level is
//! taken from `RUST_LOG` and defaults to `info`.
//!
//! ## Feature matrix
//!
//! - `metrics`: Enables OpenTelemetry run metrics (counters and a histogram),
//!   exported to stdout every few seconds and once more on shutdown.
//!
//! ## Example usage
//!
//! ```bash
//! RUST_LOG=debug cargo run --features metrics -- --num-jobs 20
//! ```

use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

#[cfg(feature = "metrics")]
use opentelemetry::{
    InstrumentationScope, KeyValue,
    metrics::{Counter, Histogram, Meter},
};
#[cfg(feature = "metrics")]
use opentelemetry_sdk::{Resource, metrics as sdkmetrics};
#[cfg(feature = "metrics")]
use std::sync::OnceLock;

pub struct TelemetryProviders {
    #[cfg(feature = "metrics")]
    pub meter_provider: sdkmetrics::SdkMeterProvider,
}

pub fn init_telemetry() -> anyhow::Result<TelemetryProviders> {
    #[cfg(feature = "metrics")]
    let meter_provider = init_metrics();

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .with(
            tracing_subscriber::fmt::layer()
                .with_thread_ids(true)
                .with_target(false)
                .with_timer(tracing_subscriber::fmt::time::ChronoLocal::rfc_3339()),
        )
        .try_init()?;

    #[cfg(feature = "metrics")]
    {
        opentelemetry::global::set_meter_provider(meter_provider.clone());
        let scope = InstrumentationScope::builder("drainpool")
            .with_version(env!("CARGO_PKG_VERSION"))
            .build();
        init_metric_handles(opentelemetry::global::meter_with_scope(scope));
    }

    Ok(TelemetryProviders {
        #[cfg(feature = "metrics")]
        meter_provider,
    })
}

/// Flushes and stops exporters. Errors are reported on stderr since the
/// subscriber may already be unusable.
pub fn shutdown_telemetry(_providers: TelemetryProviders) {
    #[cfg(feature = "metrics")]
    {
        if let Err(err) = _providers.meter_provider.force_flush() {
            eprintln!("Error flushing metrics: {err:#?}");
        }
        if let Err(err) = _providers.meter_provider.shutdown() {
            eprintln!("Error shutting down meter: {err:#?}");
        }
    }
}

#[cfg(feature = "metrics")]
fn init_metrics() -> sdkmetrics::SdkMeterProvider {
    let resource = Resource::builder()
        .with_service_name("drainpool")
        .with_attribute(KeyValue::new("service.version", env!("CARGO_PKG_VERSION")))
        .build();

    let exporter = opentelemetry_stdout::MetricExporter::default();
    let reader = sdkmetrics::PeriodicReader::builder(exporter)
        .with_interval(std::time::Duration::from_secs(5))
        .build();

    sdkmetrics::SdkMeterProvider::builder()
        .with_resource(resource)
        .with_reader(reader)
        .build()
}

// Metric handles - only compiled when metrics feature is enabled
#[cfg(feature = "metrics")]
static JOBS_PROCESSED: OnceLock<Counter<u64>> = OnceLock::new();
#[cfg(feature = "metrics")]
static JOBS_FAILED: OnceLock<Counter<u64>> = OnceLock::new();
#[cfg(feature = "metrics")]
static JOBS_DROPPED: OnceLock<Counter<u64>> = OnceLock::new();
#[cfg(feature = "metrics")]
static RUN_DURATION_MS: OnceLock<Histogram<f64>> = OnceLock::new();

#[cfg(feature = "metrics")]
fn init_metric_handles(meter: Meter) {
    let _ = JOBS_PROCESSED.set(
        meter
            .u64_counter("jobs_processed")
            .with_description("Jobs whose every stage completed")
            .build(),
    );

    let _ = JOBS_FAILED.set(
        meter
            .u64_counter("jobs_failed")
            .with_description("Jobs dequeued but not completed")
            .build(),
    );

    let _ = JOBS_DROPPED.set(
        meter
            .u64_counter("jobs_dropped")
            .with_description("Jobs never enqueued because of cancellation")
            .build(),
    );

    let _ = RUN_DURATION_MS.set(
        meter
            .f64_histogram("run_duration")
            .with_unit("ms")
            .with_description("End-to-end run duration")
            .build(),
    );
}

// Convenience functions that compile to no-ops when metrics are disabled
#[cfg(feature = "metrics")]
pub fn record_run(processed: u64, failed: u64, dropped: u64, duration_ms: f64) {
    if let Some(counter) = JOBS_PROCESSED.get() {
        counter.add(processed, &[]);
    }
    if let Some(counter) = JOBS_FAILED.get() {
        counter.add(failed, &[]);
    }
    if let Some(counter) = JOBS_DROPPED.get() {
        counter.add(dropped, &[]);
    }
    if let Some(histogram) = RUN_DURATION_MS.get() {
        histogram.record(duration_ms, &[]);
    }
}

#[cfg(not(feature = "metrics"))]
pub fn record_run(_processed: u64, _failed: u64, _dropped: u64, _duration_ms: f64) {}
