use std::sync::Once;

use metrics::{Unit, describe_counter};
use tracing_error::ErrorLayer;
use tracing_subscriber::{
    EnvFilter, fmt,
    layer::{Layer, SubscriberExt},
    util::SubscriberInitExt,
};

use crate::cache::metric_names;
use crate::config::{LogFormat, LoggingSettings};

use super::error::InfraError;

static METRIC_DESCRIPTIONS: Once = Once::new();

/// Install a global tracing subscriber using the provided logging settings.
pub fn init(logging: &LoggingSettings) -> Result<(), InfraError> {
    describe_metrics();

    let env_filter = EnvFilter::builder()
        .with_default_directive(logging.level.into())
        .from_env_lossy();

    let fmt_layer = match logging.format {
        LogFormat::Json => fmt::layer()
            .json()
            .with_current_span(true)
            .with_span_list(true)
            .with_target(true)
            .boxed(),
        LogFormat::Compact => fmt::layer().compact().with_target(true).boxed(),
    };

    tracing_subscriber::registry()
        .with(env_filter)
        .with(ErrorLayer::default())
        .with(fmt_layer)
        .try_init()
        .map_err(|err| {
            InfraError::telemetry(format!("failed to install tracing subscriber: {err}"))
        })
}

/// Register descriptions for the cache counters with the installed metrics recorder.
pub fn describe_metrics() {
    METRIC_DESCRIPTIONS.call_once(|| {
        describe_counter!(
            metric_names::HIT,
            Unit::Count,
            "Total number of cache hits, labelled by region."
        );
        describe_counter!(
            metric_names::MISS,
            Unit::Count,
            "Total number of cache misses, labelled by region."
        );
        describe_counter!(
            metric_names::EVICT,
            Unit::Count,
            "Total number of single-key cache evictions, labelled by region."
        );
        describe_counter!(
            metric_names::CLEAR,
            Unit::Count,
            "Total number of wholesale region clears, labelled by region."
        );
        describe_counter!(
            metric_names::ERROR,
            Unit::Count,
            "Total number of swallowed cache backend failures, labelled by region and operation."
        );
    });
}
